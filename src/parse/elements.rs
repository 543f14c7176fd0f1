use super::reader::MshReader;
use crate::array::Rows;
use crate::mesh::{ElementBlock, ElementType};
use crate::prelude::*;
use crate::utils;

use std::collections::{BTreeMap, BTreeSet};

/// `$Elements` in the entity block layout
pub(crate) fn parse_elements<R: BufRead>(
    reader: &mut MshReader<R>,
    blocks: &mut Vec<ElementBlock>,
) -> Result<(), ParseError> {
    let num_blocks = reader.size("number of element blocks")?;
    let num_elements = reader.size("number of elements")?;
    let _min_tag = reader.size("minimum element tag")?;
    let _max_tag = reader.size("maximum element tag")?;

    log::debug!("reading {} elements in {} blocks", num_elements, num_blocks);

    let mut total = 0u64;
    for _ in 0..num_blocks {
        let entity_dim = reader.int("entity dimension")?;
        let entity_tag = reader.int("entity tag")?;
        let element_type = reader.element_type()?;
        let count = reader.size("number of elements in block")?;

        if !(0..=3).contains(&entity_dim) {
            return Err(reader.malformed(format!("element block on an entity of dimension {}", entity_dim)));
        }

        // every record is the element tag followed by its nodes
        let width = element_type.num_nodes() + 1;
        let values = count
            .checked_mul(width as u64)
            .ok_or_else(|| reader.malformed("element count overflows"))?;
        let mut records = Vec::new();
        reader.sizes(values, &mut records, "element record")?;

        let mut block = ElementBlock::new(entity_dim, entity_tag, element_type);
        block.tags.reserve(utils::capacity(count, 1));
        let mut connectivity = Vec::with_capacity(records.len() - records.len() / width);
        for record in records.chunks_exact(width) {
            block.tags.push(record[0]);
            connectivity.extend_from_slice(&record[1..]);
        }
        block.connectivity = Rows::from_vec(width - 1, connectivity)
            .map_err(|err| reader.malformed(err.to_string()))?;

        log::trace!(
            "element block on entity ({}, {}): {} x {}",
            entity_dim,
            entity_tag,
            count,
            element_type
        );

        total += count;
        blocks.push(block);
    }

    if total != num_elements {
        return Err(reader.count_mismatch("number of elements", num_elements, total));
    }

    Ok(())
}

/// Bookkeeping for the legacy layout, where each element carries its own tags
#[derive(Debug, Default)]
pub(crate) struct LegacyElements {
    /// physical tags seen for every `(dim, entity tag)`, sorted
    pub(crate) physical_tags: BTreeMap<(i32, i32), BTreeSet<i32>>,
}

impl LegacyElements {
    /// add one element, extending the last block when it has the same type and entity
    fn push(
        &mut self,
        blocks: &mut Vec<ElementBlock>,
        element_type: ElementType,
        tag: u64,
        tags: &[i32],
        nodes: &[u64],
    ) {
        let entity_dim = element_type.dimension();
        let entity_tag = match tags {
            [] => 1,
            [only] => *only,
            [physical, elementary, ..] => {
                if *physical != 0 {
                    self.physical_tags
                        .entry((entity_dim, *elementary))
                        .or_default()
                        .insert(*physical);
                }
                *elementary
            }
        };

        let extend_last = matches!(
            blocks.last(),
            Some(last) if last.element_type == element_type && last.entity_tag == entity_tag
        );
        if !extend_last {
            blocks.push(ElementBlock::new(entity_dim, entity_tag, element_type));
        }

        if let Some(block) = blocks.last_mut() {
            block.tags.push(tag);
            block.connectivity.extend_from_slice(nodes);
        }
    }
}

/// `$Elements` in the legacy flat layout.
///
/// Text files list `tag type num_tags tags... nodes...` per element; binary files
/// group elements under `type count num_tags` headers. Either way consecutive
/// elements of the same type on the same entity end up in one block.
pub(crate) fn parse_legacy_elements<R: BufRead>(
    reader: &mut MshReader<R>,
    blocks: &mut Vec<ElementBlock>,
    legacy: &mut LegacyElements,
) -> Result<(), ParseError> {
    let count = reader.ascii_count("number of elements")?;
    log::debug!("reading {} legacy elements", count);

    let mut tags = Vec::new();
    let mut nodes = Vec::new();

    if !reader.is_binary() {
        for _ in 0..count {
            let tag = reader.int_tag("element tag")?;
            let element_type = reader.element_type()?;
            let num_tags = legacy_count(reader, "number of element tags")?;

            tags.clear();
            reader.ints(num_tags, &mut tags, "element tag")?;
            nodes.clear();
            read_legacy_nodes(reader, element_type, &mut nodes)?;

            legacy.push(blocks, element_type, tag, &tags, &nodes);
        }

        return Ok(());
    }

    let mut processed = 0u64;
    while processed < count {
        let element_type = reader.element_type()?;
        let in_group = legacy_count(reader, "number of elements in group")?;
        let num_tags = legacy_count(reader, "number of element tags")?;

        if processed + in_group > count {
            return Err(reader.count_mismatch("number of elements", count, processed + in_group));
        }

        for _ in 0..in_group {
            let tag = reader.int_tag("element tag")?;
            tags.clear();
            reader.ints(num_tags, &mut tags, "element tag")?;
            nodes.clear();
            read_legacy_nodes(reader, element_type, &mut nodes)?;

            legacy.push(blocks, element_type, tag, &tags, &nodes);
        }

        processed += in_group;
    }

    Ok(())
}

fn legacy_count<R: BufRead>(reader: &mut MshReader<R>, what: &str) -> Result<u64, ParseError> {
    let count = reader.int(what)?;
    utils::cast(count).ok_or_else(|| reader.malformed(format!("negative {}: {}", what, count)))
}

fn read_legacy_nodes<R: BufRead>(
    reader: &mut MshReader<R>,
    element_type: ElementType,
    nodes: &mut Vec<u64>,
) -> Result<(), ParseError> {
    for _ in 0..element_type.num_nodes() {
        nodes.push(reader.int_tag("node tag")?);
    }
    Ok(())
}

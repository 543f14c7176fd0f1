use super::reader::MshReader;
use crate::array::Rows;
use crate::mesh::{coordinate_width, NodeBlock};
use crate::prelude::*;
use crate::utils;

/// `$Nodes` in the entity block layout
pub(crate) fn parse_nodes<R: BufRead>(
    reader: &mut MshReader<R>,
    blocks: &mut Vec<NodeBlock>,
) -> Result<(), ParseError> {
    let num_blocks = reader.size("number of node blocks")?;
    let num_nodes = reader.size("number of nodes")?;
    // both are recomputed from the blocks when writing
    let _min_tag = reader.size("minimum node tag")?;
    let _max_tag = reader.size("maximum node tag")?;

    log::debug!("reading {} nodes in {} blocks", num_nodes, num_blocks);

    let mut total = 0u64;
    for _ in 0..num_blocks {
        let entity_dim = reader.int("entity dimension")?;
        let entity_tag = reader.int("entity tag")?;
        let parametric = match reader.int("parametric flag")? {
            0 => false,
            1 => true,
            other => return Err(reader.malformed(format!("parametric flag must be 0 or 1, found {}", other))),
        };
        let count = reader.size("number of nodes in block")?;

        if !(0..=3).contains(&entity_dim) {
            return Err(reader.malformed(format!("node block on an entity of dimension {}", entity_dim)));
        }

        let width = coordinate_width(entity_dim, parametric);

        let mut tags = Vec::new();
        reader.sizes(count, &mut tags, "node tag")?;

        let values = count
            .checked_mul(width as u64)
            .ok_or_else(|| reader.malformed("node count overflows"))?;
        let mut coordinates = Vec::new();
        reader.floats(values, &mut coordinates, "node coordinate")?;

        log::trace!(
            "node block on entity ({}, {}): {} nodes",
            entity_dim,
            entity_tag,
            count
        );

        total += count;
        blocks.push(NodeBlock {
            entity_dim,
            entity_tag,
            parametric,
            tags,
            coordinates: Rows::from_vec(width, coordinates)
                .map_err(|err| reader.malformed(err.to_string()))?,
        });
    }

    if total != num_nodes {
        return Err(reader.count_mismatch("number of nodes", num_nodes, total));
    }

    Ok(())
}

/// `$Nodes` in the legacy flat layout: a single list of `tag x y z` records.
///
/// The block is attached to entity `(0, 0)` until the elements have been read.
pub(crate) fn parse_legacy_nodes<R: BufRead>(
    reader: &mut MshReader<R>,
    blocks: &mut Vec<NodeBlock>,
) -> Result<(), ParseError> {
    let count = reader.ascii_count("number of nodes")?;
    log::debug!("reading {} legacy nodes", count);

    if count == 0 {
        return Ok(());
    }

    let mut block = NodeBlock::new(0, 0);
    block.tags.reserve(utils::capacity(count, 1));

    let mut xyz = Vec::with_capacity(3);
    for _ in 0..count {
        block.tags.push(reader.int_tag("node tag")?);

        xyz.clear();
        reader.floats(3, &mut xyz, "node coordinate")?;
        block.coordinates.extend_from_slice(&xyz);
    }

    blocks.push(block);
    Ok(())
}

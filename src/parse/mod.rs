//! reading and parsing msh files
//!
//! [`parse_msh`] reads a whole document from any buffered source; [`read_msh`]
//! opens a file path first. Both accept the text and binary encodings of the
//! 2.2 and 4.1 layouts, as declared by the `$MeshFormat` header, along with the
//! `$NanoSplineFormat` / `$Curves` / `$Patches` sections of the NanoSpline extension.

mod data;
mod elements;
mod entities;
mod error;
mod format;
mod nodes;
mod periodic;
mod reader;
mod spline;

pub use error::{
    CountMismatch, EndiannessMismatch, Io, Location, MalformedSection, MissingHeader, ParseError,
    TruncatedFile, UnknownElementType, UnsupportedVersion,
};

use crate::array::DataKind;
use crate::mesh::Entity;
use crate::prelude::*;
use elements::LegacyElements;
use reader::MshReader;

use std::collections::HashMap;
use std::path::Path;

/// read in and parse an entire msh file for a given path
pub fn read_msh<P: AsRef<Path>>(path: P) -> Result<Document, Error> {
    let file = std::fs::File::open(path)?;
    let buf_reader = std::io::BufReader::new(file);

    Ok(parse_msh(buf_reader)?)
}

/// parse a msh document from a buffered byte source
///
/// The source is only borrowed for the duration of the call (pass `&mut reader`
/// to keep using it afterwards); nothing is retained once the document is returned.
///
/// ## Example
///
/// ```
/// let text = "$MeshFormat\n4.1 0 8\n$EndMeshFormat\n\
///             $Nodes\n1 1 1 1\n0 1 0 1\n1\n0.5 0 0\n$EndNodes\n";
///
/// let doc = msh::parse_msh(text.as_bytes()).unwrap();
/// assert_eq!(doc.num_nodes(), 1);
/// assert_eq!(doc.node_blocks[0].coordinates.view()[[0, 0]], 0.5);
/// ```
pub fn parse_msh<R: BufRead>(source: R) -> Result<Document, ParseError> {
    let mut reader = MshReader::new(source);

    let mut doc = Document::new(format::parse_header(&mut reader)?);
    let legacy = doc.format.version.is_legacy();
    let mut legacy_elements = LegacyElements::default();

    while let Some(line) = reader.next_line()? {
        let marker = line.trim();
        if marker.is_empty() {
            continue;
        }

        let name = match marker.strip_prefix('$') {
            Some(name) => name.to_string(),
            None => {
                return Err(reader.malformed(format!(
                    "expected a section marker, found `{}`",
                    marker
                )))
            }
        };

        reader.enter(&name);
        log::debug!("parsing section ${}", name);

        match name.as_str() {
            "MeshFormat" => return Err(reader.malformed("a second `$MeshFormat` header")),
            "PhysicalNames" => entities::parse_physical_names(&mut reader, &mut doc.physical_names)?,
            "Entities" if legacy => {
                return Err(reader.malformed("`$Entities` is not part of the 2.2 layout"))
            }
            "Entities" => entities::parse_entities(&mut reader, &mut doc.entities)?,
            "Nodes" if legacy => nodes::parse_legacy_nodes(&mut reader, &mut doc.node_blocks)?,
            "Nodes" => nodes::parse_nodes(&mut reader, &mut doc.node_blocks)?,
            "Elements" if legacy => elements::parse_legacy_elements(
                &mut reader,
                &mut doc.element_blocks,
                &mut legacy_elements,
            )?,
            "Elements" => elements::parse_elements(&mut reader, &mut doc.element_blocks)?,
            "Periodic" if legacy => {
                periodic::parse_legacy_periodic(&mut reader, &mut doc.periodic_links)?
            }
            "Periodic" => periodic::parse_periodic(&mut reader, &mut doc.periodic_links)?,
            "NanoSplineFormat" => {
                doc.nanospline_version = Some(spline::parse_nanospline_format(&mut reader)?)
            }
            "Curves" => spline::parse_curves(&mut reader, &mut doc.curves)?,
            "Patches" => spline::parse_patches(&mut reader, &mut doc.patches)?,
            other => match DataKind::from_section_name(other) {
                Some(kind) => doc.data_sections.push(data::parse_data(&mut reader, kind)?),
                None => {
                    log::warn!("skipping unsupported section ${}", other);
                    reader.skip_section(other)?;
                    reader.leave();
                    continue;
                }
            },
        }

        reader.expect_end(&name)?;
        reader.leave();
    }

    if legacy {
        finish_legacy(&mut doc, legacy_elements);
    }

    log::debug!(
        "parsed {} nodes in {} blocks, {} elements in {} blocks, {} data sections, {} curves, {} patches",
        doc.num_nodes(),
        doc.node_blocks.len(),
        doc.num_elements(),
        doc.element_blocks.len(),
        doc.data_sections.len(),
        doc.curves.len(),
        doc.patches.len()
    );

    Ok(doc)
}

/// fill in what the legacy layout only implies once every section has been read
///
/// Each node block is attached to the entity of the last element that references
/// its first node, and every entity that carried a physical tag gets an [`Entity`]
/// record.
fn finish_legacy(doc: &mut Document, legacy: LegacyElements) {
    let mut owners: HashMap<u64, (i32, i32)> = doc
        .node_blocks
        .iter()
        .filter_map(|block| block.tags.first())
        .map(|&tag| (tag, (0, 0)))
        .collect();

    for block in &doc.element_blocks {
        for node in block.connectivity.as_slice() {
            if let Some(owner) = owners.get_mut(node) {
                *owner = (block.entity_dim, block.entity_tag);
            }
        }
    }

    for block in &mut doc.node_blocks {
        if let Some((dim, tag)) = block.tags.first().and_then(|tag| owners.get(tag)) {
            block.entity_dim = *dim;
            block.entity_tag = *tag;
        }
    }

    for ((dim, tag), physical_tags) in legacy.physical_tags {
        if doc.entity(dim, tag).is_none() {
            let entity = Entity::new(dim, tag, [0.; 3], [0.; 3])
                .with_physical_tags(physical_tags.into_iter().collect());
            doc.entities.push(entity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_sections_are_skipped() {
        let text = "$MeshFormat\n4.1 0 8\n$EndMeshFormat\n\
                    $GhostElements\n1\n1 2 1 3\n$EndGhostElements\n\
                    $Comments\nanything $at all\n$EndComments\n\
                    $Nodes\n0 0 0 0\n$EndNodes\n";
        let doc = parse_msh(text.as_bytes()).unwrap();
        assert!(doc.node_blocks.is_empty());
        assert!(doc.data_sections.is_empty());
    }

    #[test]
    fn nanospline_sections_in_a_legacy_file() {
        let text = "$MeshFormat\n2.2 0 8\n$EndMeshFormat\n\
                    $NanoSplineFormat\n1.0\n$EndNanoSplineFormat\n\
                    $Curves\n1\n1 0 1 2 4 0\n0 0 0\n1 0 0\n0\n0\n1\n1\n$EndCurves\n\
                    $Patches\n0\n$EndPatches\n";
        let doc = parse_msh(text.as_bytes()).unwrap();
        assert_eq!(doc.nanospline_version.as_deref(), Some("1.0"));
        assert_eq!(doc.curves.len(), 1);
        assert_eq!(doc.curves[0].num_control_points(), 2);
        assert!(doc.patches.is_empty());
    }

    #[test]
    fn missing_end_marker() {
        let text = "$MeshFormat\n4.1 0 8\n$EndMeshFormat\n\
                    $Nodes\n0 0 0 0\n$Elements\n0 0 0 0\n$EndElements\n";
        let err = parse_msh(text.as_bytes()).unwrap_err();
        assert!(matches!(err, ParseError::MalformedSection(_)));
        assert_eq!(err.section(), Some("Nodes"));
    }

    #[test]
    fn stray_text_between_sections() {
        let text = "$MeshFormat\n4.1 0 8\n$EndMeshFormat\nhello\n";
        assert!(matches!(
            parse_msh(text.as_bytes()),
            Err(ParseError::MalformedSection(_))
        ));
    }

    #[test]
    fn legacy_entities_are_rejected() {
        let text = "$MeshFormat\n2.2 0 8\n$EndMeshFormat\n$Entities\n0 0 0 0\n$EndEntities\n";
        let err = parse_msh(text.as_bytes()).unwrap_err();
        assert!(matches!(err, ParseError::MalformedSection(_)));
        assert_eq!(err.section(), Some("Entities"));
    }

    #[test]
    fn legacy_document_is_completed() {
        let text = "$MeshFormat\n2.2 0 8\n$EndMeshFormat\n\
                    $Nodes\n3\n1 0 0 0\n2 1 0 0\n3 0 1 0\n$EndNodes\n\
                    $Elements\n2\n1 1 2 0 5 1 2\n2 2 2 3 6 1 2 3\n$EndElements\n";
        let doc = parse_msh(text.as_bytes()).unwrap();

        assert_eq!(doc.node_blocks.len(), 1);
        assert_eq!(
            (doc.node_blocks[0].entity_dim, doc.node_blocks[0].entity_tag),
            (2, 6)
        );

        assert_eq!(doc.element_blocks.len(), 2);
        assert_eq!(doc.entities.len(), 1);
        assert_eq!(doc.entity(2, 6).map(|e| e.physical_tags.clone()), Some(vec![3]));
    }
}

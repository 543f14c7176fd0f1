#![doc = include_str!("../README.md")]

pub mod array;
mod data;
pub mod mesh;
pub mod parse;
pub mod prelude;
mod traits;
mod utils;
mod write_msh;

pub use data::Document;

pub use mesh::{ByteOrder, IntSize, MeshFormat, Version};
pub use mesh::{Curve, Patch};
pub use mesh::{ElementBlock, ElementType, Entity, NodeBlock, PeriodicLink, PhysicalName};

pub use array::{DataHeader, DataKind, DataSection, RowLength, Rows};

pub use traits::{Array, Numeric};
pub use write_msh::{write_msh, write_msh_file, write_msh_with, InvalidDocument, WriteOptions};

pub use parse::{parse_msh, read_msh, ParseError};

pub use ndarray;

/// general purpose error enumeration for possible causes of failure.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("An io error occured: `{0}`")]
    Io(#[from] std::io::Error),
    #[error("Error while parsing msh file: {0}")]
    Parse(#[from] parse::ParseError),
    #[error("Refusing to write an inconsistent document: {0}")]
    InvalidDocument(#[from] write_msh::InvalidDocument),
}

/// How the section bodies of a file are stored
///
/// Section markers (`$Nodes`, `$EndNodes`, ...) are always text; this only
/// selects how the numbers between them are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Encoding {
    #[default]
    Ascii,
    Binary,
}

impl Encoding {
    /// the `file-type` flag stored in the `$MeshFormat` header
    pub fn file_type(&self) -> i32 {
        match self {
            Self::Ascii => 0,
            Self::Binary => 1,
        }
    }

    pub fn from_file_type(file_type: i32) -> Option<Self> {
        match file_type {
            0 => Some(Self::Ascii),
            1 => Some(Self::Binary),
            _ => None,
        }
    }

    pub fn is_binary(&self) -> bool {
        matches!(self, Self::Binary)
    }
}

#[cfg(test)]
pub(crate) mod helpers {
    //! small documents shared by the unit tests
    use crate::prelude::*;

    /// the unit square split into two triangles, with a line on its lower edge
    pub(crate) fn square() -> Document {
        let mut doc = Document::default();

        doc.physical_names.push(PhysicalName::new(2, 1, "domain".into()));
        doc.physical_names.push(PhysicalName::new(1, 2, "bottom".into()));

        doc.entities.push(Entity::new(1, 1, [0., 0., 0.], [1., 0., 0.]).with_physical_tags(vec![2]));
        doc.entities.push(
            Entity::new(2, 1, [0., 0., 0.], [1., 1., 0.])
                .with_physical_tags(vec![1])
                .with_boundary_tags(vec![1]),
        );

        let mut nodes = NodeBlock::new(2, 1);
        nodes.push(1, &[0., 0., 0.]).unwrap();
        nodes.push(2, &[1., 0., 0.]).unwrap();
        nodes.push(3, &[1., 1., 0.]).unwrap();
        nodes.push(4, &[0., 1., 0.]).unwrap();
        doc.node_blocks.push(nodes);

        let mut lines = ElementBlock::new(1, 1, ElementType::Line2);
        lines.push(1, &[1, 2]).unwrap();
        doc.element_blocks.push(lines);

        let mut triangles = ElementBlock::new(2, 1, ElementType::Triangle3);
        triangles.push(2, &[1, 2, 3]).unwrap();
        triangles.push(3, &[1, 3, 4]).unwrap();
        doc.element_blocks.push(triangles);

        doc
    }
}

//! Common traits and types that are useful for working with `msh` documents
#![allow(unused_imports)]

pub use crate::array::{DataHeader, DataKind, DataSection, Rows};
pub use crate::data::Document;
pub use crate::mesh::{
    ByteOrder, Curve, ElementBlock, ElementType, Entity, IntSize, MeshFormat, NodeBlock, Patch,
    PeriodicLink, PhysicalName, Version,
};
pub use crate::traits::{Array, Numeric};
pub use crate::write_msh::WriteOptions;
pub use crate::Encoding;

pub(crate) use crate::parse::ParseError;
pub(crate) use crate::Error;
pub(crate) use std::io::{BufRead, Write};

pub(crate) use derive_more::{Constructor, Display, From};

//! container types for the numeric payloads read from / written to files

mod data_section;
mod rows;

pub use data_section::{DataHeader, DataKind, DataSection};
pub use rows::{RowIter, RowLength, Rows};

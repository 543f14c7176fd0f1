//! The mesh model: header metadata, geometric entities, node and element blocks

mod element_type;
mod elements;
mod entity;
mod format;
mod nodes;
mod periodic;
mod spline;

pub use element_type::ElementType;
pub use elements::ElementBlock;
pub use entity::{Entity, PhysicalName};
pub use format::{ByteOrder, IntSize, MeshFormat, Version};
pub use nodes::NodeBlock;
pub use periodic::PeriodicLink;
pub use spline::{Curve, Patch, NANOSPLINE_VERSION};

pub(crate) use nodes::coordinate_width;

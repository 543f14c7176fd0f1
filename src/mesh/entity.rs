use crate::prelude::*;

/// A named physical group: `(dim, tag) -> name`
#[derive(Debug, Clone, PartialEq, Eq, Constructor)]
pub struct PhysicalName {
    pub dim: i32,
    pub tag: i32,
    pub name: String,
}

/// A geometric entity (point, curve, surface or volume) of the model the mesh
/// was generated from.
///
/// Points only have a position, which is stored as a degenerate bounding box
/// (`min == max`) and never have boundary entities.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub dim: i32,
    pub tag: i32,
    pub min: [f64; 3],
    pub max: [f64; 3],
    /// tags of the physical groups this entity belongs to
    pub physical_tags: Vec<i32>,
    /// tags of the bounding entities of dimension `dim - 1` (signed by orientation)
    pub boundary_tags: Vec<i32>,
}

impl Entity {
    pub fn new(dim: i32, tag: i32, min: [f64; 3], max: [f64; 3]) -> Self {
        Self {
            dim,
            tag,
            min,
            max,
            physical_tags: Vec::new(),
            boundary_tags: Vec::new(),
        }
    }

    /// a point entity at `position`
    pub fn point(tag: i32, position: [f64; 3]) -> Self {
        Self::new(0, tag, position, position)
    }

    pub fn with_physical_tags(mut self, physical_tags: Vec<i32>) -> Self {
        self.physical_tags = physical_tags;
        self
    }

    pub fn with_boundary_tags(mut self, boundary_tags: Vec<i32>) -> Self {
        self.boundary_tags = boundary_tags;
        self
    }

    pub fn is_point(&self) -> bool {
        self.dim == 0
    }
}

use super::ElementType;
use crate::array::{RowLength, Rows};

/// Elements of a single type classified on one geometric entity
///
/// Every row of `connectivity` holds the node tags of one element, so the row
/// width is always `element_type.num_nodes()`.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementBlock {
    pub entity_dim: i32,
    pub entity_tag: i32,
    pub element_type: ElementType,
    pub tags: Vec<u64>,
    pub connectivity: Rows<u64>,
}

impl ElementBlock {
    pub fn new(entity_dim: i32, entity_tag: i32, element_type: ElementType) -> Self {
        Self {
            entity_dim,
            entity_tag,
            element_type,
            tags: Vec::new(),
            connectivity: Rows::new(element_type.num_nodes()),
        }
    }

    /// append one element given its tag and node tags
    pub fn push(&mut self, tag: u64, nodes: &[u64]) -> Result<(), RowLength> {
        self.connectivity.push_row(nodes)?;
        self.tags.push(tag);
        Ok(())
    }

    pub fn num_elements(&self) -> usize {
        self.tags.len()
    }

    pub fn nodes_per_element(&self) -> usize {
        self.element_type.num_nodes()
    }

    /// `(tag, node tags)` of every element in block order
    pub fn iter(&self) -> impl Iterator<Item = (u64, &[u64])> + '_ {
        self.tags.iter().copied().zip(self.connectivity.iter_rows())
    }
}

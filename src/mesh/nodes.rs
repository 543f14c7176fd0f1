use crate::array::{RowLength, Rows};

/// The nodes classified on one geometric entity
///
/// Coordinates are stored one node per row. Without parametric coordinates a row
/// is `x y z`; with them it is followed by `entity_dim` parametric values
/// (`u` on curves, `u v` on surfaces, `u v w` in volumes).
///
/// ## Example
///
/// ```
/// let mut block = msh::NodeBlock::new(2, 1);
/// block.push(1, &[0.0, 0.0, 0.0]).unwrap();
/// block.push(2, &[1.0, 0.0, 0.0]).unwrap();
///
/// assert_eq!(block.num_nodes(), 2);
/// assert_eq!(block.coordinates.view().dim(), (2, 3));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct NodeBlock {
    pub entity_dim: i32,
    pub entity_tag: i32,
    pub parametric: bool,
    pub tags: Vec<u64>,
    pub coordinates: Rows<f64>,
}

impl NodeBlock {
    /// empty block of plain `x y z` nodes
    pub fn new(entity_dim: i32, entity_tag: i32) -> Self {
        Self {
            entity_dim,
            entity_tag,
            parametric: false,
            tags: Vec::new(),
            coordinates: Rows::new(3),
        }
    }

    /// empty block whose nodes also carry parametric coordinates
    pub fn parametric(entity_dim: i32, entity_tag: i32) -> Self {
        Self {
            parametric: true,
            coordinates: Rows::new(coordinate_width(entity_dim, true)),
            ..Self::new(entity_dim, entity_tag)
        }
    }

    /// append a node. `coordinates` must have [`coordinate_width`](Self::coordinate_width) entries
    pub fn push(&mut self, tag: u64, coordinates: &[f64]) -> Result<(), RowLength> {
        self.coordinates.push_row(coordinates)?;
        self.tags.push(tag);
        Ok(())
    }

    pub fn num_nodes(&self) -> usize {
        self.tags.len()
    }

    /// number of values stored per node
    pub fn coordinate_width(&self) -> usize {
        coordinate_width(self.entity_dim, self.parametric)
    }

    /// `(tag, coordinates)` of every node in block order
    pub fn iter(&self) -> impl Iterator<Item = (u64, &[f64])> + '_ {
        self.tags.iter().copied().zip(self.coordinates.iter_rows())
    }
}

pub(crate) fn coordinate_width(entity_dim: i32, parametric: bool) -> usize {
    if parametric {
        3 + entity_dim.clamp(0, 3) as usize
    } else {
        3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parametric_widths() {
        assert_eq!(NodeBlock::new(3, 1).coordinate_width(), 3);
        assert_eq!(NodeBlock::parametric(0, 1).coordinate_width(), 3);
        assert_eq!(NodeBlock::parametric(1, 1).coordinate_width(), 4);
        assert_eq!(NodeBlock::parametric(2, 1).coordinate_width(), 5);

        let mut block = NodeBlock::parametric(2, 4);
        assert!(block.push(1, &[0., 0., 0.]).is_err());
        block.push(1, &[0., 0., 0., 0.25, 0.5]).unwrap();
        assert_eq!(block.iter().next(), Some((1, &[0., 0., 0., 0.25, 0.5][..])));
    }
}

use crate::array::{DataKind, DataSection};
use crate::mesh::{
    Curve, ElementBlock, Entity, MeshFormat, NodeBlock, Patch, PeriodicLink, PhysicalName,
};
use crate::utils;

/// A complete msh document
///
/// This is a plain value: it is filled in file order by [`parse_msh`](crate::parse_msh)
/// or built up by hand before being handed to [`write_msh`](crate::write_msh). Every
/// buffer is owned by the document, and the `ndarray` views handed out by
/// [`Rows::view`](crate::Rows::view) borrow from it.
///
/// ## Example
///
/// ```
/// use msh::{Document, ElementBlock, ElementType, NodeBlock};
///
/// let mut doc = Document::default();
///
/// let mut nodes = NodeBlock::new(2, 1);
/// nodes.push(1, &[0.0, 0.0, 0.0]).unwrap();
/// nodes.push(2, &[1.0, 0.0, 0.0]).unwrap();
/// nodes.push(3, &[0.0, 1.0, 0.0]).unwrap();
/// doc.node_blocks.push(nodes);
///
/// let mut triangles = ElementBlock::new(2, 1, ElementType::Triangle3);
/// triangles.push(1, &[1, 2, 3]).unwrap();
/// doc.element_blocks.push(triangles);
///
/// let mut bytes = Vec::new();
/// msh::write_msh(&mut bytes, &doc).unwrap();
///
/// let parsed = msh::parse_msh(bytes.as_slice()).unwrap();
/// assert_eq!(parsed, doc);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Document {
    pub format: MeshFormat,
    pub physical_names: Vec<PhysicalName>,
    pub entities: Vec<Entity>,
    pub node_blocks: Vec<NodeBlock>,
    pub element_blocks: Vec<ElementBlock>,
    pub periodic_links: Vec<PeriodicLink>,
    pub data_sections: Vec<DataSection>,
    /// version from `$NanoSplineFormat`, if the file had one
    pub nanospline_version: Option<String>,
    pub curves: Vec<Curve>,
    pub patches: Vec<Patch>,
}

impl Document {
    pub fn new(format: MeshFormat) -> Self {
        Self {
            format,
            ..Self::default()
        }
    }

    /// total number of nodes over every block
    pub fn num_nodes(&self) -> usize {
        self.node_blocks.iter().map(NodeBlock::num_nodes).sum()
    }

    /// total number of elements over every block
    pub fn num_elements(&self) -> usize {
        self.element_blocks.iter().map(ElementBlock::num_elements).sum()
    }

    /// smallest and largest node tag, `(0, 0)` without nodes
    pub fn node_tag_range(&self) -> (u64, u64) {
        utils::tag_range(self.node_blocks.iter().flat_map(|block| block.tags.iter()))
    }

    /// smallest and largest element tag, `(0, 0)` without elements
    pub fn element_tag_range(&self) -> (u64, u64) {
        utils::tag_range(self.element_blocks.iter().flat_map(|block| block.tags.iter()))
    }

    pub fn entity(&self, dim: i32, tag: i32) -> Option<&Entity> {
        self.entities
            .iter()
            .find(|entity| entity.dim == dim && entity.tag == tag)
    }

    pub fn physical_name(&self, dim: i32, tag: i32) -> Option<&str> {
        self.physical_names
            .iter()
            .find(|name| name.dim == dim && name.tag == tag)
            .map(|name| name.name.as_str())
    }

    pub fn entities_of_dim(&self, dim: i32) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(move |entity| entity.dim == dim)
    }

    fn data_of_kind(&self, kind: DataKind) -> impl Iterator<Item = &DataSection> {
        self.data_sections
            .iter()
            .filter(move |section| section.kind == kind)
    }

    /// every `$NodeData` section, in document order
    pub fn node_data(&self) -> impl Iterator<Item = &DataSection> {
        self.data_of_kind(DataKind::Node)
    }

    /// every `$ElementData` section, in document order
    pub fn element_data(&self) -> impl Iterator<Item = &DataSection> {
        self.data_of_kind(DataKind::Element)
    }

    /// every `$ElementNodeData` section, in document order
    pub fn element_node_data(&self) -> impl Iterator<Item = &DataSection> {
        self.data_of_kind(DataKind::ElementNode)
    }
}

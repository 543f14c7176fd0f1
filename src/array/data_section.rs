use super::{RowLength, Rows};
use std::fmt;

/// What the entries of a data section are attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataKind {
    /// one entry per node (`$NodeData`)
    Node,
    /// one entry per element (`$ElementData`)
    Element,
    /// one entry per element, with a value set for each of its nodes (`$ElementNodeData`)
    ElementNode,
}

impl DataKind {
    /// the section name used in the file, without the leading `$`
    pub fn section_name(&self) -> &'static str {
        match self {
            Self::Node => "NodeData",
            Self::Element => "ElementData",
            Self::ElementNode => "ElementNodeData",
        }
    }

    pub fn from_section_name(name: &str) -> Option<Self> {
        match name {
            "NodeData" => Some(Self::Node),
            "ElementData" => Some(Self::Element),
            "ElementNodeData" => Some(Self::ElementNode),
            _ => None,
        }
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.section_name())
    }
}

/// The tagged header of a data section
///
/// By convention the first string tag is the field name and the second (optional)
/// one names an interpolation scheme; the first real tag is the time value; the
/// integer tags hold the time step, the number of components, the number of entries
/// and optionally a partition index, in that order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataHeader {
    pub string_tags: Vec<String>,
    pub real_tags: Vec<f64>,
    pub int_tags: Vec<i64>,
}

/// A field attached to nodes, elements, or the nodes of elements
///
/// Values are stored row-per-entry. For [`DataKind::Node`] and [`DataKind::Element`]
/// a row holds `components` values; for [`DataKind::ElementNode`] a row holds
/// `components` values for each of the `nodes_per_element` nodes of the element,
/// node after node.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSection {
    pub kind: DataKind,
    pub header: DataHeader,
    /// ids of the node or element each entry belongs to
    pub tags: Vec<u64>,
    pub components: usize,
    /// only meaningful for [`DataKind::ElementNode`]; zero until the first entry is known
    pub nodes_per_element: usize,
    pub values: Rows<f64>,
}

impl DataSection {
    /// empty section for a field `name` at a given time value / time step.
    ///
    /// The header tags are filled in and kept current by [`push_entry`](Self::push_entry).
    pub fn new(kind: DataKind, name: &str, time: f64, time_step: i64, components: usize) -> Self {
        let header = DataHeader {
            string_tags: vec![name.to_string()],
            real_tags: vec![time],
            int_tags: vec![time_step, components as i64, 0],
        };

        let width = match kind {
            DataKind::ElementNode => 0,
            _ => components,
        };

        Self {
            kind,
            header,
            tags: Vec::new(),
            components,
            nodes_per_element: 0,
            values: Rows::new(width),
        }
    }

    /// append the values for one node / element.
    ///
    /// For element-node data the first entry fixes the number of nodes per element
    /// (`values.len() / components`); every later entry must have the same length.
    pub fn push_entry(&mut self, tag: u64, values: &[f64]) -> Result<(), RowLength> {
        if self.kind == DataKind::ElementNode && self.nodes_per_element == 0 {
            if self.components == 0 || values.is_empty() || values.len() % self.components != 0
            {
                return Err(RowLength::new(self.components, values.len()));
            }

            self.nodes_per_element = values.len() / self.components;
            self.values = Rows::new(values.len());
        }

        self.values.push_row(values)?;
        self.tags.push(tag);

        if let Some(entries) = self.header.int_tags.get_mut(2) {
            *entries = self.tags.len() as i64;
        }

        Ok(())
    }

    /// the field name (first string tag)
    pub fn name(&self) -> Option<&str> {
        self.header.string_tags.first().map(String::as_str)
    }

    /// the time value (first real tag)
    pub fn time(&self) -> Option<f64> {
        self.header.real_tags.first().copied()
    }

    /// the time step index (first integer tag)
    pub fn time_step(&self) -> Option<i64> {
        self.header.int_tags.first().copied()
    }

    pub fn num_entries(&self) -> usize {
        self.tags.len()
    }

    pub fn num_components(&self) -> usize {
        self.components
    }

    /// number of values stored for every entry
    pub fn entry_width(&self) -> usize {
        match self.kind {
            DataKind::ElementNode => self.components * self.nodes_per_element,
            _ => self.components,
        }
    }

    /// `(tag, values)` for the `i`th entry
    pub fn entry(&self, i: usize) -> Option<(u64, &[f64])> {
        let tag = *self.tags.get(i)?;
        let values = self.values.row(i).unwrap_or(&[]);
        Some((tag, values))
    }
}

use crate::array::{DataKind, DataSection};
use crate::mesh::{coordinate_width, Curve, ElementBlock, Entity, NodeBlock, Patch, NANOSPLINE_VERSION};
use crate::prelude::*;
use crate::utils;

use std::collections::HashSet;
use std::path::Path;

/// Overrides applied to a document's [`MeshFormat`] when it is written
///
/// Every field left as `None` keeps the value stored in `Document::format`, so the
/// default options write a document back the way it was read.
///
/// ## Example
///
/// ```
/// use msh::{Document, Encoding, IntSize, WriteOptions};
///
/// let doc = Document::default();
/// let options = WriteOptions::default()
///     .encoding(Encoding::Binary)
///     .int_size(IntSize::Four);
///
/// let mut bytes = Vec::new();
/// msh::write_msh_with(&mut bytes, &doc, &options).unwrap();
/// assert!(bytes.starts_with(b"$MeshFormat\n4.1 1 4\n"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WriteOptions {
    pub version: Option<Version>,
    pub encoding: Option<Encoding>,
    pub int_size: Option<IntSize>,
    pub byte_order: Option<ByteOrder>,
}

impl WriteOptions {
    pub fn version(mut self, version: Version) -> Self {
        self.version = Some(version);
        self
    }

    pub fn encoding(mut self, encoding: Encoding) -> Self {
        self.encoding = Some(encoding);
        self
    }

    pub fn int_size(mut self, int_size: IntSize) -> Self {
        self.int_size = Some(int_size);
        self
    }

    pub fn byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = Some(byte_order);
        self
    }

    /// the format that results from applying these options to `format`
    pub fn apply(&self, format: &MeshFormat) -> MeshFormat {
        MeshFormat {
            version: self.version.unwrap_or(format.version),
            encoding: self.encoding.unwrap_or(format.encoding),
            int_size: self.int_size.unwrap_or(format.int_size),
            byte_order: self.byte_order.unwrap_or(format.byte_order),
        }
    }
}

/// A document that cannot be written without producing a corrupt or lossy file
#[derive(Debug, thiserror::Error)]
pub enum InvalidDocument {
    #[error("msh version {0} cannot be written, only 2.2 and 4.1 are supported")]
    UnsupportedVersion(Version),
    #[error("{what} has dimension {dim}, which is not between 0 and 3")]
    Dimension { what: &'static str, dim: i32 },
    #[error("physical tag {tag} is named more than once in dimension {dim}")]
    DuplicatePhysicalName { dim: i32, tag: i32 },
    #[error("point entity {tag} must have min == max and no bounding entities")]
    PointEntity { tag: i32 },
    #[error("{what} {index} has {tags} tags but {rows} rows")]
    RowCount {
        what: &'static str,
        index: usize,
        tags: usize,
        rows: usize,
    },
    #[error("{what} {index} stores {actual} values per row, expected {expected}")]
    RowWidth {
        what: &'static str,
        index: usize,
        expected: usize,
        actual: usize,
    },
    #[error("node block {index} has parametric coordinates, which the 2.2 layout cannot store")]
    LegacyParametric { index: usize },
    #[error("data section {index} has no components")]
    NoComponents { index: usize },
    #[error("{what} {value} does not fit in a {bytes} byte integer")]
    IntegerOverflow {
        what: &'static str,
        value: u64,
        bytes: usize,
    },
    #[error("nanospline version `{0}` must be a single non empty word")]
    SplineVersion(String),
}

/// Write a document to a `Writer` using the format stored in the document
pub fn write_msh<W: Write>(writer: W, doc: &Document) -> Result<(), Error> {
    write_msh_with(writer, doc, &WriteOptions::default())
}

/// Write a document to a file at `path`, creating or truncating it
pub fn write_msh_file<P: AsRef<Path>>(path: P, doc: &Document) -> Result<(), Error> {
    let file = std::fs::File::create(path)?;
    let writer = std::io::BufWriter::new(file);

    write_msh(writer, doc)
}

/// Write a document with some of its format settings overridden
///
/// The document is checked before anything is written, so an inconsistent
/// document fails with [`InvalidDocument`] and leaves the writer untouched.
pub fn write_msh_with<W: Write>(
    writer: W,
    doc: &Document,
    options: &WriteOptions,
) -> Result<(), Error> {
    let format = options.apply(&doc.format);
    validate(doc, &format)?;

    log::debug!(
        "writing msh {} {:?} file with {} nodes and {} elements",
        format.version,
        format.encoding,
        doc.num_nodes(),
        doc.num_elements()
    );

    let mut writer = MshWriter::new(writer, format);
    writer.mesh_format()?;

    if !doc.physical_names.is_empty() {
        writer.physical_names(doc)?;
    }

    if format.version.is_legacy() {
        writer.legacy_nodes(doc)?;
        writer.legacy_elements(doc)?;
        if !doc.periodic_links.is_empty() {
            writer.legacy_periodic(doc)?;
        }
    } else {
        if !doc.entities.is_empty() {
            writer.entities(doc)?;
        }
        writer.nodes(doc)?;
        writer.elements(doc)?;
        if !doc.periodic_links.is_empty() {
            writer.periodic(doc)?;
        }
    }

    for section in &doc.data_sections {
        writer.data(section)?;
    }

    if doc.nanospline_version.is_some() || !doc.curves.is_empty() || !doc.patches.is_empty() {
        writer.nanospline_format(doc)?;
    }
    if !doc.curves.is_empty() {
        writer.curves(doc)?;
    }
    if !doc.patches.is_empty() {
        writer.patches(doc)?;
    }

    writer.inner.flush()?;
    Ok(())
}

//
// validation
//

fn check_dim(what: &'static str, dim: i32) -> Result<(), InvalidDocument> {
    if (0..=3).contains(&dim) {
        Ok(())
    } else {
        Err(InvalidDocument::Dimension { what, dim })
    }
}

fn check_rows(
    what: &'static str,
    index: usize,
    tags: usize,
    rows: usize,
    expected: usize,
    actual: usize,
) -> Result<(), InvalidDocument> {
    if expected != actual {
        return Err(InvalidDocument::RowWidth {
            what,
            index,
            expected,
            actual,
        });
    }

    if tags != rows {
        return Err(InvalidDocument::RowCount {
            what,
            index,
            tags,
            rows,
        });
    }

    Ok(())
}

fn check_fits<'a, I>(what: &'static str, values: I, limit: u64, bytes: usize) -> Result<(), InvalidDocument>
where
    I: IntoIterator<Item = &'a u64>,
{
    match values.into_iter().find(|&&value| value > limit) {
        Some(&value) => Err(InvalidDocument::IntegerOverflow { what, value, bytes }),
        None => Ok(()),
    }
}

/// control points are `x y z`, or `x y z w` when weighted
fn check_control_points(what: &'static str, index: usize, width: usize) -> Result<(), InvalidDocument> {
    match width {
        3 | 4 => Ok(()),
        actual => Err(InvalidDocument::RowWidth {
            what,
            index,
            expected: 3,
            actual,
        }),
    }
}

fn validate(doc: &Document, format: &MeshFormat) -> Result<(), InvalidDocument> {
    if !format.version.is_supported() {
        return Err(InvalidDocument::UnsupportedVersion(format.version));
    }
    let legacy = format.version.is_legacy();

    let mut named = HashSet::new();
    for name in &doc.physical_names {
        check_dim("physical name", name.dim)?;
        if !named.insert((name.dim, name.tag)) {
            return Err(InvalidDocument::DuplicatePhysicalName {
                dim: name.dim,
                tag: name.tag,
            });
        }
    }

    if !legacy {
        for entity in &doc.entities {
            check_dim("entity", entity.dim)?;
            if entity.is_point() && (entity.min != entity.max || !entity.boundary_tags.is_empty()) {
                return Err(InvalidDocument::PointEntity { tag: entity.tag });
            }
        }
    }

    for (index, block) in doc.node_blocks.iter().enumerate() {
        check_dim("node block", block.entity_dim)?;
        if legacy && block.parametric {
            return Err(InvalidDocument::LegacyParametric { index });
        }
        check_rows(
            "node block",
            index,
            block.tags.len(),
            block.coordinates.rows(),
            coordinate_width(block.entity_dim, block.parametric),
            block.coordinates.width(),
        )?;
    }

    for (index, block) in doc.element_blocks.iter().enumerate() {
        check_dim("element block", block.entity_dim)?;
        check_rows(
            "element block",
            index,
            block.tags.len(),
            block.connectivity.rows(),
            block.element_type.num_nodes(),
            block.connectivity.width(),
        )?;
    }

    for link in &doc.periodic_links {
        check_dim("periodic link", link.entity_dim)?;
    }

    for (index, section) in doc.data_sections.iter().enumerate() {
        if section.components == 0 {
            return Err(InvalidDocument::NoComponents { index });
        }
        if section.kind == DataKind::ElementNode && section.nodes_per_element == 0 && !section.tags.is_empty() {
            return Err(InvalidDocument::RowWidth {
                what: "data section",
                index,
                expected: section.components,
                actual: 0,
            });
        }
        check_rows(
            "data section",
            index,
            section.tags.len(),
            section.values.rows(),
            section.entry_width(),
            section.values.width(),
        )?;
    }

    if let Some(version) = &doc.nanospline_version {
        if version.is_empty() || version.contains(char::is_whitespace) {
            return Err(InvalidDocument::SplineVersion(version.clone()));
        }
    }
    for (index, curve) in doc.curves.iter().enumerate() {
        check_control_points("curve", index, curve.control_points.width())?;
    }
    for (index, patch) in doc.patches.iter().enumerate() {
        check_control_points("patch", index, patch.control_points.width())?;
    }

    if !format.is_binary() {
        return Ok(());
    }

    // binary records have fixed widths
    let int_limit = i32::MAX as u64;
    for section in &doc.data_sections {
        check_fits("data entry tag", &section.tags, int_limit, 4)?;
    }

    let (limit, bytes) = if legacy {
        (int_limit, 4)
    } else {
        (format.int_size.max_value(), format.int_size.bytes())
    };

    for block in &doc.node_blocks {
        check_fits("node tag", &block.tags, limit, bytes)?;
    }
    for block in &doc.element_blocks {
        check_fits("element tag", &block.tags, limit, bytes)?;
        check_fits("node tag", block.connectivity.as_slice(), limit, bytes)?;
    }
    if !legacy {
        for link in &doc.periodic_links {
            check_fits("periodic node tag", link.node_pairs.iter().flatten(), limit, bytes)?;
        }
        let counts = [doc.num_nodes() as u64, doc.num_elements() as u64];
        check_fits("count", &counts, limit, bytes)?;
    }

    Ok(())
}

//
// serialization
//

fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for ch in text.chars() {
        if ch == '"' || ch == '\\' {
            quoted.push('\\');
        }
        quoted.push(ch);
    }
    quoted.push('"');
    quoted
}

/// Section writer that lays numbers out either as text lines or packed records
///
/// In text mode consecutive values share a line until [`end_line`](Self::end_line);
/// in binary mode they are packed back to back and the line break is only written
/// before the closing `$End<Name>` marker.
struct MshWriter<W> {
    inner: W,
    format: MeshFormat,
    line_open: bool,
}

impl<W: Write> MshWriter<W> {
    fn new(inner: W, format: MeshFormat) -> Self {
        Self {
            inner,
            format,
            line_open: false,
        }
    }

    fn is_binary(&self) -> bool {
        self.format.is_binary()
    }

    fn begin(&mut self, name: &str) -> Result<(), Error> {
        writeln!(self.inner, "${}", name)?;
        Ok(())
    }

    fn finish(&mut self, name: &str) -> Result<(), Error> {
        if self.line_open {
            self.inner.write_all(b"\n")?;
            self.line_open = false;
        }
        writeln!(self.inner, "$End{}", name)?;
        Ok(())
    }

    /// a full line of text, written as is in either encoding
    fn text_line(&mut self, text: &str) -> Result<(), Error> {
        writeln!(self.inner, "{}", text)?;
        self.line_open = false;
        Ok(())
    }

    /// close a line left open by a binary payload so a text header can follow
    fn break_line(&mut self) -> Result<(), Error> {
        if self.line_open {
            self.inner.write_all(b"\n")?;
            self.line_open = false;
        }
        Ok(())
    }

    fn end_line(&mut self) -> Result<(), Error> {
        if !self.is_binary() && self.line_open {
            self.inner.write_all(b"\n")?;
            self.line_open = false;
        }
        Ok(())
    }

    fn values<T: Numeric>(&mut self, values: &[T]) -> Result<(), Error> {
        if values.is_empty() {
            return Ok(());
        }

        if self.is_binary() {
            values.write_binary(&mut self.inner, self.format.byte_order)?;
        } else {
            if self.line_open {
                self.inner.write_all(b" ")?;
            }
            values.write_ascii(&mut self.inner)?;
        }

        self.line_open = true;
        Ok(())
    }

    /// `size_t` fields, narrowed to 4 bytes when the header asks for it
    fn sizes(&mut self, values: &[u64]) -> Result<(), Error> {
        if !self.is_binary() || self.format.int_size == IntSize::Eight {
            return self.values(values);
        }

        let narrow = values
            .iter()
            .map(|&value| {
                utils::cast::<u32, _>(value).ok_or(InvalidDocument::IntegerOverflow {
                    what: "size",
                    value,
                    bytes: 4,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.values(&narrow)
    }

    /// tags stored as 4 byte `int` records in binary files
    fn int_tags(&mut self, values: &[u64]) -> Result<(), Error> {
        if !self.is_binary() {
            return self.values(values);
        }

        let narrow = values
            .iter()
            .map(|&value| {
                utils::cast::<i32, _>(value).ok_or(InvalidDocument::IntegerOverflow {
                    what: "tag",
                    value,
                    bytes: 4,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        self.values(&narrow)
    }

    /// a table of `size_t` values, one row per line in text mode
    fn size_rows(&mut self, values: &[u64], width: usize) -> Result<(), Error> {
        if self.is_binary() || width == 0 {
            return self.sizes(values);
        }

        for row in values.chunks(width) {
            self.sizes(row)?;
            self.end_line()?;
        }
        Ok(())
    }

    fn float_rows(&mut self, values: &[f64], width: usize) -> Result<(), Error> {
        if self.is_binary() || width == 0 {
            return self.values(values);
        }

        for row in values.chunks(width) {
            self.values(row)?;
            self.end_line()?;
        }
        Ok(())
    }

    fn mesh_format(&mut self) -> Result<(), Error> {
        let format = self.format;

        self.begin("MeshFormat")?;
        self.text_line(&format!(
            "{} {} {}",
            format.version,
            format.encoding.file_type(),
            format.int_size.bytes()
        ))?;

        if format.is_binary() {
            [1i32][..].write_binary(&mut self.inner, format.byte_order)?;
            self.line_open = true;
        }

        self.finish("MeshFormat")
    }

    fn physical_names(&mut self, doc: &Document) -> Result<(), Error> {
        self.begin("PhysicalNames")?;
        self.text_line(&doc.physical_names.len().to_string())?;
        for name in &doc.physical_names {
            self.text_line(&format!("{} {} {}", name.dim, name.tag, quote(&name.name)))?;
        }
        self.finish("PhysicalNames")
    }

    fn entity(&mut self, entity: &Entity) -> Result<(), Error> {
        self.values(&[entity.tag])?;
        self.values(&entity.min)?;
        if !entity.is_point() {
            self.values(&entity.max)?;
        }

        self.sizes(&[entity.physical_tags.len() as u64])?;
        self.values(&entity.physical_tags)?;

        if !entity.is_point() {
            self.sizes(&[entity.boundary_tags.len() as u64])?;
            self.values(&entity.boundary_tags)?;
        }

        self.end_line()
    }

    fn entities(&mut self, doc: &Document) -> Result<(), Error> {
        self.begin("Entities")?;

        let counts: Vec<u64> = (0..4)
            .map(|dim| doc.entities_of_dim(dim).count() as u64)
            .collect();
        self.sizes(&counts)?;
        self.end_line()?;

        for dim in 0..4 {
            for entity in doc.entities_of_dim(dim) {
                self.entity(entity)?;
            }
        }

        self.finish("Entities")
    }

    fn node_block(&mut self, block: &NodeBlock) -> Result<(), Error> {
        self.values(&[block.entity_dim, block.entity_tag, block.parametric as i32])?;
        self.sizes(&[block.num_nodes() as u64])?;
        self.end_line()?;

        self.size_rows(&block.tags, 1)?;
        self.float_rows(block.coordinates.as_slice(), block.coordinates.width())
    }

    fn nodes(&mut self, doc: &Document) -> Result<(), Error> {
        self.begin("Nodes")?;

        let (min, max) = doc.node_tag_range();
        self.sizes(&[doc.node_blocks.len() as u64, doc.num_nodes() as u64, min, max])?;
        self.end_line()?;

        for block in &doc.node_blocks {
            self.node_block(block)?;
        }

        self.finish("Nodes")
    }

    fn element_block(&mut self, block: &ElementBlock) -> Result<(), Error> {
        self.values(&[
            block.entity_dim,
            block.entity_tag,
            block.element_type.code(),
        ])?;
        self.sizes(&[block.num_elements() as u64])?;
        self.end_line()?;

        let width = block.nodes_per_element() + 1;
        let mut records = Vec::with_capacity(block.num_elements() * width);
        for (tag, nodes) in block.iter() {
            records.push(tag);
            records.extend_from_slice(nodes);
        }

        self.size_rows(&records, width)
    }

    fn elements(&mut self, doc: &Document) -> Result<(), Error> {
        self.begin("Elements")?;

        let (min, max) = doc.element_tag_range();
        self.sizes(&[
            doc.element_blocks.len() as u64,
            doc.num_elements() as u64,
            min,
            max,
        ])?;
        self.end_line()?;

        for block in &doc.element_blocks {
            self.element_block(block)?;
        }

        self.finish("Elements")
    }

    fn periodic(&mut self, doc: &Document) -> Result<(), Error> {
        self.begin("Periodic")?;
        self.sizes(&[doc.periodic_links.len() as u64])?;
        self.end_line()?;

        for link in &doc.periodic_links {
            self.values(&[link.entity_dim, link.entity_tag, link.master_tag])?;
            self.end_line()?;

            self.sizes(&[link.affine.len() as u64])?;
            self.values(&link.affine)?;
            self.end_line()?;

            self.sizes(&[link.node_pairs.len() as u64])?;
            self.end_line()?;
            let pairs: Vec<u64> = link.node_pairs.iter().flatten().copied().collect();
            self.size_rows(&pairs, 2)?;
        }

        self.finish("Periodic")
    }

    fn legacy_nodes(&mut self, doc: &Document) -> Result<(), Error> {
        self.begin("Nodes")?;
        self.text_line(&doc.num_nodes().to_string())?;

        for block in &doc.node_blocks {
            for (tag, xyz) in block.iter() {
                self.int_tags(&[tag])?;
                self.values(xyz)?;
                self.end_line()?;
            }
        }

        self.finish("Nodes")
    }

    fn legacy_elements(&mut self, doc: &Document) -> Result<(), Error> {
        self.begin("Elements")?;
        self.text_line(&doc.num_elements().to_string())?;

        for block in &doc.element_blocks {
            let physical = doc
                .entity(block.entity_dim, block.entity_tag)
                .and_then(|entity| entity.physical_tags.first().copied())
                .unwrap_or(0);

            if self.is_binary() && block.num_elements() > 0 {
                let count = utils::cast::<i32, _>(block.num_elements()).ok_or(
                    InvalidDocument::IntegerOverflow {
                        what: "element count",
                        value: block.num_elements() as u64,
                        bytes: 4,
                    },
                )?;
                self.values(&[block.element_type.code(), count, 2])?;
            }

            for (tag, nodes) in block.iter() {
                self.int_tags(&[tag])?;
                if !self.is_binary() {
                    self.values(&[block.element_type.code(), 2])?;
                }
                self.values(&[physical, block.entity_tag])?;
                self.int_tags(nodes)?;
                self.end_line()?;
            }
        }

        self.finish("Elements")
    }

    fn legacy_periodic(&mut self, doc: &Document) -> Result<(), Error> {
        self.begin("Periodic")?;
        self.text_line(&doc.periodic_links.len().to_string())?;

        for link in &doc.periodic_links {
            self.text_line(&format!(
                "{} {} {}",
                link.entity_dim, link.entity_tag, link.master_tag
            ))?;

            if !link.affine.is_empty() {
                let mut line = String::from("Affine");
                for value in &link.affine {
                    line.push(' ');
                    value.push_ascii(&mut line);
                }
                self.text_line(&line)?;
            }

            self.text_line(&link.node_pairs.len().to_string())?;
            for [slave, master] in &link.node_pairs {
                self.text_line(&format!("{} {}", slave, master))?;
            }
        }

        self.finish("Periodic")
    }

    fn data(&mut self, section: &DataSection) -> Result<(), Error> {
        let name = section.kind.section_name();
        self.begin(name)?;

        let header = &section.header;
        self.text_line(&header.string_tags.len().to_string())?;
        for tag in &header.string_tags {
            self.text_line(&quote(tag))?;
        }

        self.text_line(&header.real_tags.len().to_string())?;
        for &tag in &header.real_tags {
            let mut line = String::new();
            tag.push_ascii(&mut line);
            self.text_line(&line)?;
        }

        let mut int_tags = header.int_tags.clone();
        if int_tags.len() < 3 {
            int_tags.resize(3, 0);
        }
        int_tags[1] = section.components as i64;
        int_tags[2] = section.num_entries() as i64;

        self.text_line(&int_tags.len().to_string())?;
        for tag in &int_tags {
            self.text_line(&tag.to_string())?;
        }

        for (i, &tag) in section.tags.iter().enumerate() {
            self.int_tags(&[tag])?;
            if section.kind == DataKind::ElementNode {
                let nodes = utils::cast::<i32, _>(section.nodes_per_element).ok_or(
                    InvalidDocument::IntegerOverflow {
                        what: "number of nodes per element",
                        value: section.nodes_per_element as u64,
                        bytes: 4,
                    },
                )?;
                self.values(&[nodes])?;
            }
            self.values(section.values.row(i).unwrap_or(&[]))?;
            self.end_line()?;
        }

        self.finish(name)
    }

    fn nanospline_format(&mut self, doc: &Document) -> Result<(), Error> {
        self.begin("NanoSplineFormat")?;
        self.text_line(doc.nanospline_version.as_deref().unwrap_or(NANOSPLINE_VERSION))?;
        self.finish("NanoSplineFormat")
    }

    /// headers stay text in binary files, each followed by its packed control
    /// points and knots
    fn curve(&mut self, curve: &Curve) -> Result<(), Error> {
        self.break_line()?;
        self.text_line(&format!(
            "{} {} {} {} {} {}",
            curve.tag,
            curve.curve_type,
            curve.degree,
            curve.num_control_points(),
            curve.knots.len(),
            curve.is_rational() as u8
        ))?;

        let points = &curve.control_points;
        self.float_rows(points.as_slice(), points.width())?;
        self.float_rows(&curve.knots, 1)
    }

    fn curves(&mut self, doc: &Document) -> Result<(), Error> {
        self.begin("Curves")?;
        self.text_line(&doc.curves.len().to_string())?;
        for curve in &doc.curves {
            self.curve(curve)?;
        }
        self.finish("Curves")
    }

    fn patch(&mut self, patch: &Patch) -> Result<(), Error> {
        self.break_line()?;
        self.text_line(&format!(
            "{} {} {} {} {} {} {} {}",
            patch.tag,
            patch.patch_type,
            patch.degree_u,
            patch.degree_v,
            patch.num_control_points(),
            patch.u_knots.len(),
            patch.v_knots.len(),
            patch.is_rational() as u8
        ))?;

        let points = &patch.control_points;
        self.float_rows(points.as_slice(), points.width())?;
        self.float_rows(&patch.u_knots, 1)?;
        self.float_rows(&patch.v_knots, 1)
    }

    fn patches(&mut self, doc: &Document) -> Result<(), Error> {
        self.begin("Patches")?;
        self.text_line(&doc.patches.len().to_string())?;
        for patch in &doc.patches {
            self.patch(patch)?;
        }
        self.finish("Patches")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::helpers::square;

    fn ascii(doc: &Document) -> String {
        let mut bytes = Vec::new();
        write_msh(&mut bytes, doc).unwrap();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn ascii_layout() {
        let text = ascii(&square());

        assert!(text.starts_with("$MeshFormat\n4.1 0 8\n$EndMeshFormat\n"));
        assert!(text.contains("$PhysicalNames\n2\n2 1 \"domain\"\n1 2 \"bottom\"\n$EndPhysicalNames\n"));
        assert!(text.contains("$Nodes\n1 4 1 4\n2 1 0 4\n1\n2\n3\n4\n0.0 0.0 0.0\n"));
        assert!(text.contains("$Elements\n2 3 1 3\n1 1 1 1\n1 1 2\n2 1 2 2\n2 1 2 3\n3 1 3 4\n$EndElements\n"));
        assert!(text.contains("$Entities\n0 1 1 0\n1 0.0 0.0 0.0 1.0 0.0 0.0 1 2 0\n"));
    }

    #[test]
    fn empty_document_is_well_formed() {
        let text = ascii(&Document::default());
        assert_eq!(
            text,
            "$MeshFormat\n4.1 0 8\n$EndMeshFormat\n\
             $Nodes\n0 0 0 0\n$EndNodes\n\
             $Elements\n0 0 0 0\n$EndElements\n"
        );
    }

    #[test]
    fn legacy_ascii_layout() {
        let mut doc = square();
        doc.format.version = Version::V2_2;
        let text = ascii(&doc);

        assert!(!text.contains("$Entities"));
        assert!(text.contains("$Nodes\n4\n1 0.0 0.0 0.0\n"));
        assert!(text.contains("$Elements\n3\n1 1 2 2 1 1 2\n2 2 2 1 1 1 2 3\n"));
    }

    #[test]
    fn data_int_tags_are_recomputed() {
        let mut doc = Document::default();
        let mut data = DataSection::new(DataKind::Node, "p", 1.5, 4, 1);
        data.push_entry(1, &[2.0]).unwrap();
        data.header.int_tags = vec![4];
        doc.data_sections.push(data);

        let text = ascii(&doc);
        assert!(text.contains("$NodeData\n1\n\"p\"\n1\n1.5\n3\n4\n1\n1\n1 2.0\n$EndNodeData\n"));
    }

    #[test]
    fn inconsistent_documents_are_not_written() {
        let mut doc = square();
        doc.element_blocks[1].element_type = ElementType::Quadrangle4;
        let mut bytes = Vec::new();
        let err = write_msh(&mut bytes, &doc).unwrap_err();
        assert!(matches!(err, Error::InvalidDocument(InvalidDocument::RowWidth { .. })));
        assert!(bytes.is_empty());

        let mut doc = square();
        doc.node_blocks[0].tags.pop();
        assert!(matches!(
            write_msh(&mut Vec::new(), &doc),
            Err(Error::InvalidDocument(InvalidDocument::RowCount { .. }))
        ));

        let mut doc = square();
        doc.entities.push(Entity::new(0, 9, [0.; 3], [1.; 3]));
        assert!(matches!(
            write_msh(&mut Vec::new(), &doc),
            Err(Error::InvalidDocument(InvalidDocument::PointEntity { tag: 9 }))
        ));

        let mut doc = square();
        doc.physical_names.push(PhysicalName::new(2, 1, "again".into()));
        assert!(write_msh(&mut Vec::new(), &doc).is_err());

        let mut doc = square();
        doc.node_blocks[0] = NodeBlock::parametric(2, 1);
        let legacy = WriteOptions::default().version(Version::V2_2);
        assert!(matches!(
            write_msh_with(&mut Vec::new(), &doc, &legacy),
            Err(Error::InvalidDocument(InvalidDocument::LegacyParametric { index: 0 }))
        ));

        let doc = square();
        let old = WriteOptions::default().version(Version::new(4, 0));
        assert!(write_msh_with(&mut Vec::new(), &doc, &old).is_err());
    }

    #[test]
    fn dimensions_are_checked() {
        let mut doc = square();
        doc.element_blocks.push(ElementBlock::new(7, 1, ElementType::Triangle3));
        let mut bytes = Vec::new();
        assert!(matches!(
            write_msh(&mut bytes, &doc),
            Err(Error::InvalidDocument(InvalidDocument::Dimension {
                what: "element block",
                dim: 7
            }))
        ));
        assert!(bytes.is_empty());

        let mut doc = square();
        doc.periodic_links.push(PeriodicLink::new(-5, 1, 2));
        for version in [Version::V4_1, Version::V2_2] {
            let options = WriteOptions::default().version(version);
            assert!(matches!(
                write_msh_with(&mut Vec::new(), &doc, &options),
                Err(Error::InvalidDocument(InvalidDocument::Dimension {
                    what: "periodic link",
                    dim: -5
                }))
            ));
        }
    }

    #[test]
    fn spline_layout() {
        let mut doc = Document::default();
        let mut curve = Curve::new(1, 0, 1, false);
        curve.push_control_point(&[0., 0., 0.]).unwrap();
        curve.push_control_point(&[1., 0., 0.]).unwrap();
        curve.knots = vec![0., 0., 1., 1.];
        doc.curves.push(curve);

        let text = ascii(&doc);
        assert!(text.ends_with(
            "$NanoSplineFormat\n1.0\n$EndNanoSplineFormat\n\
             $Curves\n1\n1 0 1 2 4 0\n0.0 0.0 0.0\n1.0 0.0 0.0\n0.0\n0.0\n1.0\n1.0\n$EndCurves\n"
        ));
        assert!(!text.contains("$Patches"));

        // binary payloads end their line before the next header
        doc.curves.push(Curve::new(2, 0, 1, true));
        let mut bytes = Vec::new();
        let options = WriteOptions::default().encoding(Encoding::Binary);
        write_msh_with(&mut bytes, &doc, &options).unwrap();
        let payload = [0.0f64, 0., 0., 1., 0., 0., 0., 0., 1., 1.];
        let mut expected = b"$Curves\n2\n1 0 1 2 4 0\n".to_vec();
        for value in payload {
            expected.extend_from_slice(&value.to_ne_bytes());
        }
        expected.extend_from_slice(b"\n2 0 1 0 0 1\n$EndCurves\n");
        assert!(bytes.ends_with(&expected));
    }

    #[test]
    fn spline_checks() {
        let mut doc = Document::default();
        doc.nanospline_version = Some("1 .0".into());
        assert!(matches!(
            write_msh(&mut Vec::new(), &doc),
            Err(Error::InvalidDocument(InvalidDocument::SplineVersion(_)))
        ));

        let mut doc = Document::default();
        let mut patch = Patch::new(1, 0, 1, 1, false);
        patch.control_points = crate::array::Rows::new(2);
        doc.patches.push(patch);
        assert!(matches!(
            write_msh(&mut Vec::new(), &doc),
            Err(Error::InvalidDocument(InvalidDocument::RowWidth {
                what: "patch",
                actual: 2,
                ..
            }))
        ));
    }

    #[test]
    fn narrow_integers_are_checked() {
        let mut doc = square();
        doc.node_blocks[0].tags[0] = u32::MAX as u64 + 1;

        let four = WriteOptions::default()
            .encoding(Encoding::Binary)
            .int_size(IntSize::Four);
        assert!(matches!(
            write_msh_with(&mut Vec::new(), &doc, &four),
            Err(Error::InvalidDocument(InvalidDocument::IntegerOverflow { .. }))
        ));

        let eight = four.int_size(IntSize::Eight);
        write_msh_with(&mut Vec::new(), &doc, &eight).unwrap();

        // text files have no width limit
        write_msh(&mut Vec::new(), &doc).unwrap();
    }
}

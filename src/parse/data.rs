use super::reader::MshReader;
use crate::array::{DataHeader, DataKind, DataSection, Rows};
use crate::prelude::*;
use crate::utils;

/// the tag header of a data section, which is text in every encoding
fn parse_header<R: BufRead>(reader: &mut MshReader<R>) -> Result<DataHeader, ParseError> {
    let mut header = DataHeader::default();

    let count: u64 = reader.ascii("number of string tags")?;
    for _ in 0..count {
        header.string_tags.push(reader.quoted()?);
    }

    let count: u64 = reader.ascii("number of real tags")?;
    for _ in 0..count {
        header.real_tags.push(reader.ascii("real tag")?);
    }

    let count: u64 = reader.ascii("number of integer tags")?;
    for _ in 0..count {
        header.int_tags.push(reader.ascii("integer tag")?);
    }

    Ok(header)
}

/// `$NodeData`, `$ElementData` or `$ElementNodeData`
pub(crate) fn parse_data<R: BufRead>(
    reader: &mut MshReader<R>,
    kind: DataKind,
) -> Result<DataSection, ParseError> {
    let header = parse_header(reader)?;

    let (components, entries) = match header.int_tags.as_slice() {
        [_, components, entries, ..] => (*components, *entries),
        _ => {
            return Err(reader.malformed(format!(
                "data sections need at least 3 integer tags, found {}",
                header.int_tags.len()
            )))
        }
    };

    let components: usize = utils::cast(components)
        .filter(|&components| components > 0)
        .ok_or_else(|| reader.malformed(format!("invalid number of components: {}", components)))?;
    let entries: u64 = utils::cast(entries)
        .ok_or_else(|| reader.malformed(format!("invalid number of entries: {}", entries)))?;

    if reader.is_binary() {
        reader.newline()?;
    }

    log::debug!(
        "reading {} `{}` with {} entries of {} components",
        kind,
        header.string_tags.first().map(String::as_str).unwrap_or(""),
        entries,
        components
    );

    let mut tags = Vec::with_capacity(utils::capacity(entries, 1));
    let mut values = Vec::new();
    let mut nodes_per_element = 0;

    for _ in 0..entries {
        tags.push(reader.int_tag("entry tag")?);

        let mut width = components;
        if kind == DataKind::ElementNode {
            let nodes = reader.int("number of nodes per element")?;
            let nodes: usize = utils::cast(nodes)
                .filter(|&nodes| nodes > 0)
                .ok_or_else(|| reader.malformed(format!("invalid number of nodes per element: {}", nodes)))?;

            if nodes_per_element == 0 {
                nodes_per_element = nodes;
            } else if nodes != nodes_per_element {
                return Err(reader.malformed(format!(
                    "entries with {} and {} nodes per element in one section",
                    nodes_per_element, nodes
                )));
            }

            width = components
                .checked_mul(nodes)
                .ok_or_else(|| reader.malformed("entry width overflows"))?;
        }

        reader.floats(width as u64, &mut values, "data value")?;
    }

    let width = match kind {
        DataKind::ElementNode => components
            .checked_mul(nodes_per_element)
            .ok_or_else(|| reader.malformed("entry width overflows"))?,
        _ => components,
    };

    Ok(DataSection {
        kind,
        header,
        tags,
        components,
        nodes_per_element,
        values: Rows::from_vec(width, values).map_err(|err| reader.malformed(err.to_string()))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_data() {
        let text = b"1\n\"temperature\"\n1\n0.5\n3\n0\n1\n2\n4 10.5\n9 -1\n";
        let mut reader = MshReader::new(&text[..]);
        let data = parse_data(&mut reader, DataKind::Node).unwrap();

        assert_eq!(data.name(), Some("temperature"));
        assert_eq!(data.time(), Some(0.5));
        assert_eq!(data.tags, vec![4, 9]);
        assert_eq!(data.values.as_slice(), &[10.5, -1.]);
    }

    #[test]
    fn element_node_data() {
        let text = b"1\n\"u\"\n0\n3\n0\n2\n1\n3 2 1 2 3 4\n";
        let mut reader = MshReader::new(&text[..]);
        let data = parse_data(&mut reader, DataKind::ElementNode).unwrap();

        assert_eq!(data.nodes_per_element, 2);
        assert_eq!(data.entry_width(), 4);
        assert_eq!(data.entry(0), Some((3, &[1., 2., 3., 4.][..])));
    }

    #[test]
    fn hybrid_element_node_data_is_rejected() {
        let text = b"0\n0\n3\n0\n1\n2\n1 2 1 2\n2 3 1 2 3\n";
        let mut reader = MshReader::new(&text[..]);
        assert!(matches!(
            parse_data(&mut reader, DataKind::ElementNode),
            Err(ParseError::MalformedSection(_))
        ));
    }

    #[test]
    fn huge_entry_width_is_malformed() {
        let text = b"0\n0\n3\n0\n4611686018427387904\n1\n1 4 0\n";
        let mut reader = MshReader::new(&text[..]);
        let err = parse_data(&mut reader, DataKind::ElementNode).unwrap_err();
        assert!(matches!(err, ParseError::MalformedSection(_)));
    }

    #[test]
    fn header_requirements() {
        for text in [&b"0\n0\n2\n0\n1\n"[..], &b"0\n0\n3\n0\n0\n1\n"[..]] {
            let mut reader = MshReader::new(text);
            assert!(matches!(
                parse_data(&mut reader, DataKind::Node),
                Err(ParseError::MalformedSection(_))
            ));
        }
    }
}

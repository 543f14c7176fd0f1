use super::reader::MshReader;
use crate::mesh::PeriodicLink;
use crate::prelude::*;
use crate::utils;

/// `$Periodic` in the entity block layout
pub(crate) fn parse_periodic<R: BufRead>(
    reader: &mut MshReader<R>,
    links: &mut Vec<PeriodicLink>,
) -> Result<(), ParseError> {
    let count = reader.size("number of periodic links")?;

    for _ in 0..count {
        let entity_dim = reader.int("entity dimension")?;
        let entity_tag = reader.int("entity tag")?;
        let master_tag = reader.int("master entity tag")?;
        if !(0..=3).contains(&entity_dim) {
            return Err(reader.malformed(format!("periodic link on an entity of dimension {}", entity_dim)));
        }
        let mut link = PeriodicLink::new(entity_dim, entity_tag, master_tag);

        let num_affine = reader.size("number of affine values")?;
        reader.floats(num_affine, &mut link.affine, "affine value")?;

        let num_nodes = reader.size("number of corresponding nodes")?;
        let values = num_nodes
            .checked_mul(2)
            .ok_or_else(|| reader.malformed("node count overflows"))?;
        let mut pairs = Vec::new();
        reader.sizes(values, &mut pairs, "node tag")?;
        link.node_pairs = pairs.chunks_exact(2).map(|pair| [pair[0], pair[1]]).collect();

        links.push(link);
    }

    log::debug!("read {} periodic links", count);
    Ok(())
}

/// `$Periodic` in the legacy layout, which is text even in binary files.
///
/// Each link may carry an `Affine` line with the transformation before its node count.
pub(crate) fn parse_legacy_periodic<R: BufRead>(
    reader: &mut MshReader<R>,
    links: &mut Vec<PeriodicLink>,
) -> Result<(), ParseError> {
    let count: u64 = reader.ascii("number of periodic links")?;

    for _ in 0..count {
        let entity_dim = reader.ascii("entity dimension")?;
        let entity_tag = reader.ascii("entity tag")?;
        let master_tag = reader.ascii("master entity tag")?;
        let mut link = PeriodicLink::new(entity_dim, entity_tag, master_tag);

        let mut token = reader.token()?;
        if token == "Affine" {
            for word in reader.rest_of_line()?.split_ascii_whitespace() {
                let value: f64 = word
                    .parse()
                    .map_err(|_| reader.malformed(format!("expected affine value, found `{}`", word)))?;
                link.affine.push(value);
            }
            token = reader.token()?;
        }

        let num_nodes: u64 = token
            .parse()
            .map_err(|_| reader.malformed(format!("expected number of nodes, found `{}`", token)))?;

        link.node_pairs.reserve(utils::capacity(num_nodes, 1));
        for _ in 0..num_nodes {
            let slave: u64 = reader.ascii("node tag")?;
            let master: u64 = reader.ascii("master node tag")?;
            link.node_pairs.push([slave, master]);
        }

        links.push(link);
    }

    log::debug!("read {} legacy periodic links", count);
    Ok(())
}

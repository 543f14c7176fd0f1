use super::reader::MshReader;
use crate::mesh::{Entity, PhysicalName};
use crate::prelude::*;
use crate::utils;

/// `$PhysicalNames`, which is text in every encoding
pub(crate) fn parse_physical_names<R: BufRead>(
    reader: &mut MshReader<R>,
    names: &mut Vec<PhysicalName>,
) -> Result<(), ParseError> {
    let count: u64 = reader.ascii("number of physical names")?;
    names.reserve(utils::capacity(count, 1));

    for _ in 0..count {
        let dim: i32 = reader.ascii("physical dimension")?;
        let tag: i32 = reader.ascii("physical tag")?;
        let name = reader.quoted()?;

        if !(0..=3).contains(&dim) {
            return Err(reader.malformed(format!("physical name `{}` has dimension {}", name, dim)));
        }

        if names.iter().any(|other| other.dim == dim && other.tag == tag) {
            return Err(reader.malformed(format!(
                "physical tag {} is named twice in dimension {}",
                tag, dim
            )));
        }

        names.push(PhysicalName::new(dim, tag, name));
    }

    log::trace!("read {} physical names", count);
    Ok(())
}

/// `$Entities`: points, curves, surfaces and volumes, in that order
pub(crate) fn parse_entities<R: BufRead>(
    reader: &mut MshReader<R>,
    entities: &mut Vec<Entity>,
) -> Result<(), ParseError> {
    let mut counts = [0u64; 4];
    for count in counts.iter_mut() {
        *count = reader.size("number of entities")?;
    }

    for (dim, &count) in counts.iter().enumerate() {
        let dim = dim as i32;

        for _ in 0..count {
            let tag = reader.int("entity tag")?;

            let mut bounds = Vec::with_capacity(6);
            let num_bounds = if dim == 0 { 3 } else { 6 };
            reader.floats(num_bounds, &mut bounds, "entity coordinate")?;

            let (min, max) = if dim == 0 {
                let point = [bounds[0], bounds[1], bounds[2]];
                (point, point)
            } else {
                (
                    [bounds[0], bounds[1], bounds[2]],
                    [bounds[3], bounds[4], bounds[5]],
                )
            };

            let mut entity = Entity::new(dim, tag, min, max);

            let num_physical = reader.size("number of physical tags")?;
            reader.ints(num_physical, &mut entity.physical_tags, "physical tag")?;

            if dim > 0 {
                let num_boundary = reader.size("number of bounding entities")?;
                reader.ints(num_boundary, &mut entity.boundary_tags, "bounding entity tag")?;
            }

            entities.push(entity);
        }
    }

    log::debug!(
        "read {} points, {} curves, {} surfaces, {} volumes",
        counts[0],
        counts[1],
        counts[2],
        counts[3]
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names() {
        let mut reader = MshReader::new(&b"2\n1 2 \"inlet\"\n3 1 \"fluid domain\"\n"[..]);
        let mut names = Vec::new();
        parse_physical_names(&mut reader, &mut names).unwrap();

        assert_eq!(names[0], PhysicalName::new(1, 2, "inlet".into()));
        assert_eq!(names[1].name, "fluid domain");
    }

    #[test]
    fn duplicate_and_out_of_range_names() {
        let mut names = Vec::new();
        let mut reader = MshReader::new(&b"2\n1 2 \"a\"\n1 2 \"b\"\n"[..]);
        assert!(matches!(
            parse_physical_names(&mut reader, &mut names),
            Err(ParseError::MalformedSection(_))
        ));

        let mut names = Vec::new();
        let mut reader = MshReader::new(&b"1\n4 1 \"a\"\n"[..]);
        assert!(parse_physical_names(&mut reader, &mut names).is_err());
    }

    #[test]
    fn ascii_entities() {
        let text = b"1 1 0 0\n\
            7 0.5 0 0 1 3\n\
            2 0 0 0 1 0 0 0 2 1 -7\n";
        let mut reader = MshReader::new(&text[..]);
        let mut entities = Vec::new();
        parse_entities(&mut reader, &mut entities).unwrap();

        assert_eq!(entities.len(), 2);
        assert_eq!(entities[0], Entity::point(7, [0.5, 0., 0.]).with_physical_tags(vec![3]));
        assert_eq!(entities[1].max, [1., 0., 0.]);
        assert!(entities[1].physical_tags.is_empty());
        assert_eq!(entities[1].boundary_tags, vec![1, -7]);
    }
}

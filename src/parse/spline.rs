use super::reader::MshReader;
use crate::array::Rows;
use crate::mesh::{Curve, Patch};
use crate::prelude::*;

/// `$NanoSplineFormat`, a single version token
pub(crate) fn parse_nanospline_format<R: BufRead>(reader: &mut MshReader<R>) -> Result<String, ParseError> {
    let version = reader.token()?;
    log::debug!("nanospline format {}", version);
    Ok(version)
}

/// headers are text in either encoding. In binary files the line break after a
/// header starts its packed control points and knots
fn control_points<R: BufRead>(
    reader: &mut MshReader<R>,
    count: u64,
    rational: bool,
) -> Result<Rows<f64>, ParseError> {
    let width = if rational { 4 } else { 3 };
    let values = count
        .checked_mul(width as u64)
        .ok_or_else(|| reader.malformed("control point count overflows"))?;

    let mut data = Vec::new();
    reader.floats(values, &mut data, "control point coordinate")?;
    Rows::from_vec(width, data).map_err(|err| reader.malformed(err.to_string()))
}

fn knots<R: BufRead>(reader: &mut MshReader<R>, count: u64) -> Result<Vec<f64>, ParseError> {
    let mut knots = Vec::new();
    reader.floats(count, &mut knots, "knot")?;
    Ok(knots)
}

pub(crate) fn parse_curves<R: BufRead>(reader: &mut MshReader<R>, curves: &mut Vec<Curve>) -> Result<(), ParseError> {
    let count: u64 = reader.ascii("number of curves")?;

    for _ in 0..count {
        let tag = reader.ascii("curve tag")?;
        let curve_type = reader.ascii("curve type")?;
        let degree = reader.ascii("curve degree")?;
        let num_control_points: u64 = reader.ascii("number of control points")?;
        let num_knots: u64 = reader.ascii("number of knots")?;
        let with_weights: u64 = reader.ascii("weight flag")?;
        if reader.is_binary() {
            reader.newline()?;
        }

        let mut curve = Curve::new(tag, curve_type, degree, with_weights > 0);
        curve.control_points = control_points(reader, num_control_points, with_weights > 0)?;
        curve.knots = knots(reader, num_knots)?;
        curves.push(curve);
    }

    log::debug!("read {} curves", count);
    Ok(())
}

pub(crate) fn parse_patches<R: BufRead>(reader: &mut MshReader<R>, patches: &mut Vec<Patch>) -> Result<(), ParseError> {
    let count: u64 = reader.ascii("number of patches")?;

    for _ in 0..count {
        let tag = reader.ascii("patch tag")?;
        let patch_type = reader.ascii("patch type")?;
        let degree_u = reader.ascii("u degree")?;
        let degree_v = reader.ascii("v degree")?;
        let num_control_points: u64 = reader.ascii("number of control points")?;
        let num_u_knots: u64 = reader.ascii("number of u knots")?;
        let num_v_knots: u64 = reader.ascii("number of v knots")?;
        let with_weights: u64 = reader.ascii("weight flag")?;
        if reader.is_binary() {
            reader.newline()?;
        }

        let mut patch = Patch::new(tag, patch_type, degree_u, degree_v, with_weights > 0);
        patch.control_points = control_points(reader, num_control_points, with_weights > 0)?;
        patch.u_knots = knots(reader, num_u_knots)?;
        patch.v_knots = knots(reader, num_v_knots)?;
        patches.push(patch);
    }

    log::debug!("read {} patches", count);
    Ok(())
}

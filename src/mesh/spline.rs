use crate::array::{RowLength, Rows};

/// Version written in `$NanoSplineFormat` when a document carries splines but
/// no version of its own
pub const NANOSPLINE_VERSION: &str = "1.0";

/// number of values per control point: `x y z`, plus `w` for rational splines
fn point_width(rational: bool) -> usize {
    if rational {
        4
    } else {
        3
    }
}

/// A spline curve from the `$Curves` section of the NanoSpline extension
///
/// Every row of `control_points` is one control point.
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    pub tag: u64,
    pub curve_type: u64,
    pub degree: u64,
    pub control_points: Rows<f64>,
    pub knots: Vec<f64>,
}

impl Curve {
    pub fn new(tag: u64, curve_type: u64, degree: u64, rational: bool) -> Self {
        Self {
            tag,
            curve_type,
            degree,
            control_points: Rows::new(point_width(rational)),
            knots: Vec::new(),
        }
    }

    /// append one control point (`[x, y, z]`, or `[x, y, z, w]` when rational)
    pub fn push_control_point(&mut self, point: &[f64]) -> Result<(), RowLength> {
        self.control_points.push_row(point)
    }

    /// true when every control point carries a weight
    pub fn is_rational(&self) -> bool {
        self.control_points.width() == 4
    }

    pub fn num_control_points(&self) -> usize {
        self.control_points.rows()
    }
}

/// A tensor product spline patch from the `$Patches` section of the NanoSpline extension
#[derive(Debug, Clone, PartialEq)]
pub struct Patch {
    pub tag: u64,
    pub patch_type: u64,
    pub degree_u: u64,
    pub degree_v: u64,
    pub control_points: Rows<f64>,
    pub u_knots: Vec<f64>,
    pub v_knots: Vec<f64>,
}

impl Patch {
    pub fn new(tag: u64, patch_type: u64, degree_u: u64, degree_v: u64, rational: bool) -> Self {
        Self {
            tag,
            patch_type,
            degree_u,
            degree_v,
            control_points: Rows::new(point_width(rational)),
            u_knots: Vec::new(),
            v_knots: Vec::new(),
        }
    }

    pub fn push_control_point(&mut self, point: &[f64]) -> Result<(), RowLength> {
        self.control_points.push_row(point)
    }

    pub fn is_rational(&self) -> bool {
        self.control_points.width() == 4
    }

    pub fn num_control_points(&self) -> usize {
        self.control_points.rows()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn control_point_width_follows_weights() {
        let mut curve = Curve::new(1, 0, 2, false);
        curve.push_control_point(&[0., 0., 0.]).unwrap();
        assert!(curve.push_control_point(&[0., 0., 0., 1.]).is_err());
        assert!(!curve.is_rational());
        assert_eq!(curve.num_control_points(), 1);

        let mut patch = Patch::new(1, 0, 1, 1, true);
        patch.push_control_point(&[0., 0., 0., 0.5]).unwrap();
        assert!(patch.is_rational());
        assert_eq!(patch.control_points.shape(), (1, 4));
    }
}

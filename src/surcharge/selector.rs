use nalgebra as na;
use serde::{Deserialize, Serialize};

use crate::geometry::Polygon3;

/// Sample-in-shadow containment tolerance, in wall-plane units (meters).
pub const CONTAINMENT_TOL: f64 = 1e-2;

/// Orthonormal local frame of a receiving sample; `k` is the outward normal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LocalFrame {
    pub i: na::Vector3<f64>,
    pub j: na::Vector3<f64>,
    pub k: na::Vector3<f64>,
}

impl LocalFrame {
    /// Frame with `k` as the outward normal, `i` horizontal in the surface
    /// and `j` completing the right-handed triad (up on a vertical wall).
    /// `None` when `k` is zero or vertical.
    pub fn from_outward_normal(outward: na::Vector3<f64>) -> Option<Self> {
        let k = na::Unit::try_new(outward, 1e-12)?.into_inner();
        if k.z.abs() > 1.0 - 1e-9 {
            return None;
        }
        let i = na::Vector3::z().cross(&k).normalize();
        let j = k.cross(&i);
        Some(Self { i, j, k })
    }
}

/// A receiving-surface sample point with its tributary area.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplePoint {
    pub id: u32,

    /// Position on the receiving surface (meters)
    pub position: na::Point3<f64>,

    /// Tributary area (m²)
    pub tributary_area: f64,

    pub frame: LocalFrame,
}

/// Samples whose positions fall inside the shadow, paired with their
/// tributary areas, plus the loaded-area ratio.
///
/// The ratio is the covered tributary area over the shadow area; coarse
/// grids can overcount the shadow, so it is clamped to [0, 1]. A degenerate
/// (zero-area) shadow selects nothing.
pub fn select_loaded_samples(
    shadow: &Polygon3,
    samples: &[SamplePoint],
) -> (Vec<(usize, f64)>, f64) {
    let shadow_area = shadow.area();
    if shadow_area <= f64::EPSILON {
        return (Vec::new(), 0.0);
    }

    let mut selected = Vec::new();
    let mut loaded_area = 0.0;
    for (index, sample) in samples.iter().enumerate() {
        if shadow.contains(&sample.position, CONTAINMENT_TOL) {
            selected.push((index, sample.tributary_area));
            loaded_area += sample.tributary_area;
        }
    }

    let ratio = (loaded_area / shadow_area).clamp(0.0, 1.0);
    (selected, ratio)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Plane;
    use approx::assert_relative_eq;

    fn wall_square() -> Polygon3 {
        let wall = Plane::new(na::Point3::origin(), na::Vector3::y()).unwrap();
        Polygon3::new(
            vec![
                na::Point3::new(2.0, 0.0, 2.0),
                na::Point3::new(-2.0, 0.0, 2.0),
                na::Point3::new(-2.0, 0.0, 0.0),
                na::Point3::new(2.0, 0.0, 0.0),
            ],
            wall,
        )
        .unwrap()
    }

    fn sample(id: u32, x: f64, z: f64, area: f64) -> SamplePoint {
        SamplePoint {
            id,
            position: na::Point3::new(x, 0.0, z),
            tributary_area: area,
            frame: LocalFrame::from_outward_normal(na::Vector3::y()).unwrap(),
        }
    }

    #[test]
    fn test_frame_is_right_handed() {
        let frame = LocalFrame::from_outward_normal(na::Vector3::y()).unwrap();

        assert_relative_eq!(frame.i.cross(&frame.j).dot(&frame.k), 1.0, epsilon = 1e-12);
        assert_relative_eq!(frame.j.z, 1.0, epsilon = 1e-12);
        assert!(LocalFrame::from_outward_normal(na::Vector3::z()).is_none());
    }

    #[test]
    fn test_selection_and_ratio() {
        let shadow = wall_square();
        let samples = vec![
            sample(1, -1.0, 0.5, 1.0),
            sample(2, 1.0, 0.5, 1.0),
            sample(3, 3.0, 0.5, 1.0),  // outside
            sample(4, 0.0, 1.5, 1.0),
            sample(5, 0.0, -1.0, 1.0), // below
        ];

        let (selected, ratio) = select_loaded_samples(&shadow, &samples);

        assert_eq!(
            selected.iter().map(|(i, _)| *i).collect::<Vec<_>>(),
            vec![0, 1, 3]
        );
        assert_relative_eq!(ratio, 3.0 / 8.0, epsilon = 1e-12);
    }

    #[test]
    fn test_boundary_tolerance_is_inclusive() {
        let shadow = wall_square();
        let samples = vec![sample(1, 2.005, 1.0, 1.0)];

        let (selected, _) = select_loaded_samples(&shadow, &samples);
        assert_eq!(selected.len(), 1);
    }

    #[test]
    fn test_ratio_clamps_at_full_coverage() {
        let shadow = wall_square();
        // Four coarse cells claiming 4 m² each over an 8 m² shadow
        let samples = vec![
            sample(1, -1.0, 0.5, 4.0),
            sample(2, 1.0, 0.5, 4.0),
            sample(3, -1.0, 1.5, 4.0),
            sample(4, 1.0, 1.5, 4.0),
        ];

        let (_, ratio) = select_loaded_samples(&shadow, &samples);
        assert_relative_eq!(ratio, 1.0);
    }

    #[test]
    fn test_degenerate_shadow_selects_nothing() {
        let wall = Plane::new(na::Point3::origin(), na::Vector3::y()).unwrap();
        let p = na::Point3::new(0.0, 0.0, 1.0);
        let shadow = Polygon3::new(vec![p, p, p], wall).unwrap();

        let samples = vec![sample(1, 0.0, 1.0, 1.0)];
        let (selected, ratio) = select_loaded_samples(&shadow, &samples);

        assert!(selected.is_empty());
        assert_relative_eq!(ratio, 0.0);
    }
}

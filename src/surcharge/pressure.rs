use serde::{Deserialize, Serialize};

use super::distributor::ForceAssignment;
use super::selector::SamplePoint;

/// Local pressures at one sample: normal plus the two tangential
/// components, in pascals.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElementPressure {
    pub id: u32,
    pub normal: f64,
    pub tangential_i: f64,
    pub tangential_j: f64,
}

impl ElementPressure {
    pub fn zero(id: u32) -> Self {
        Self {
            id,
            normal: 0.0,
            tangential_i: 0.0,
            tangential_j: 0.0,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.normal == 0.0 && self.tangential_i == 0.0 && self.tangential_j == 0.0
    }
}

/// Convert assigned forces into local pressures.
///
/// Tangential components are clamped, sign preserved, at the Coulomb bound
/// `|normal| · tan(delta)`. Samples with no force or (near) zero tributary
/// area report zero pressure.
pub fn convert_pressures(
    assignment: &ForceAssignment,
    samples: &[SamplePoint],
    delta: f64,
) -> Vec<ElementPressure> {
    let tan_delta = delta.tan();

    samples
        .iter()
        .map(|sample| {
            let area = sample.tributary_area;
            match assignment.get(sample.id) {
                Some(force) if area > f64::EPSILON => {
                    let normal = force.dot(&sample.frame.k) / area;
                    let cap = normal.abs() * tan_delta;
                    ElementPressure {
                        id: sample.id,
                        normal,
                        tangential_i: (force.dot(&sample.frame.i) / area).clamp(-cap, cap),
                        tangential_j: (force.dot(&sample.frame.j) / area).clamp(-cap, cap),
                    }
                }
                _ => ElementPressure::zero(sample.id),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surcharge::selector::LocalFrame;
    use approx::assert_relative_eq;
    use nalgebra as na;

    fn sample(id: u32, area: f64) -> SamplePoint {
        SamplePoint {
            id,
            position: na::Point3::origin(),
            tributary_area: area,
            frame: LocalFrame::from_outward_normal(na::Vector3::y()).unwrap(),
        }
    }

    fn assignment_with(id: u32, force: na::Vector3<f64>) -> ForceAssignment {
        let mut assignment = ForceAssignment::default();
        assignment.push(id, force);
        assignment
    }

    #[test]
    fn test_normal_pressure_from_force() {
        let samples = vec![sample(1, 2.0)];
        let assignment = assignment_with(1, na::Vector3::new(0.0, -20_000.0, 0.0));

        let pressures = convert_pressures(&assignment, &samples, 20.0_f64.to_radians());

        assert_relative_eq!(pressures[0].normal, -10_000.0);
        assert_relative_eq!(pressures[0].tangential_i, 0.0);
        assert_relative_eq!(pressures[0].tangential_j, 0.0);
    }

    #[test]
    fn test_tangential_cap() {
        let delta = 20.0_f64.to_radians();
        let samples = vec![sample(1, 1.0)];
        // Strong in-plane components that must be clipped
        let assignment = assignment_with(1, na::Vector3::new(9_000.0, -10_000.0, -7_000.0));

        let pressures = convert_pressures(&assignment, &samples, delta);
        let cap = 10_000.0 * delta.tan();

        // frame: i = -X, j = +Z for an outward +Y normal
        assert_relative_eq!(pressures[0].normal, -10_000.0);
        assert_relative_eq!(pressures[0].tangential_i, -cap, epsilon = 1e-9);
        assert_relative_eq!(pressures[0].tangential_j, -cap, epsilon = 1e-9);
        assert!(pressures[0].tangential_i.abs() <= cap + 1e-9);
    }

    #[test]
    fn test_zero_area_reports_zero() {
        let samples = vec![sample(1, 0.0)];
        let assignment = assignment_with(1, na::Vector3::new(0.0, -1000.0, 0.0));

        let pressures = convert_pressures(&assignment, &samples, 0.3);
        assert!(pressures[0].is_zero());
    }

    #[test]
    fn test_unassigned_sample_reports_zero() {
        let samples = vec![sample(1, 1.0), sample(2, 1.0)];
        let assignment = assignment_with(1, na::Vector3::new(0.0, -1000.0, 0.0));

        let pressures = convert_pressures(&assignment, &samples, 0.3);
        assert!(!pressures[0].is_zero());
        assert!(pressures[1].is_zero());
    }
}

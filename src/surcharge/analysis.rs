//! Surcharge pressure analysis for retaining structures
//!
//! # Coordinate system
//!
//! All spatial calculations use a right-handed coordinate system with
//! **+Z up**; X and Y span the horizontal plane (a convenient choice is X
//! along the wall face and Y pointing from the wall into the backfill).
//! The vertical spread axis is always global +Z.
//!
//! # Internal units
//!
//! All `Point3` and `Vector3` coordinates are stored in **METERS**, forces
//! in **NEWTONS** and angles in **RADIANS**.
//!
//! Public APIs accept UOM types and convert at boundaries.

use nalgebra as na;
use std::fmt;

use serde::Serialize;

use crate::geometry::{Plane, Polygon3};
use crate::types::*;

use super::distributor::{self, ForceAssignment};
use super::load::HorizontalLoad;
use super::pressure::{self, ElementPressure};
use super::selector::{self, LocalFrame, SamplePoint};
use super::shadow;

#[derive(Debug, thiserror::Error)]
pub enum SurchargeError {
    #[error("Line load endpoints coincide")]
    DegenerateLine,

    #[error("Area load needs at least 3 contour vertices, found {found}")]
    TooFewAreaVertices { found: usize },

    #[error("Load has a zero force vector")]
    ZeroForce,

    #[error("Sample {id} has negative tributary area ({area} m²)")]
    NegativeTributaryArea { id: u32, area: f64 },
}

/// Recoverable geometric conditions, carried in the result and mirrored to
/// the log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SurchargeWarning {
    /// A ray from this load vertex never reaches the wall plane in the load
    /// direction.
    RayMissedWall { vertex: usize },

    /// The load direction has no horizontal component to span the spread
    /// frame.
    DegenerateSpreadFrame,

    /// The vertical line through the shadow centroid crossed the outline
    /// more than twice.
    AmbiguousVerticalClip { crossings: usize },

    /// No usable vertical segment through the shadow centroid.
    DegenerateVerticalClip,

    /// The loaded sample layout cannot balance the resultant moment
    /// exactly.
    UnbalancedMoment,
}

impl fmt::Display for SurchargeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SurchargeWarning::RayMissedWall { vertex } => write!(
                f,
                "spread ray from load vertex {vertex} does not reach the wall in the load direction"
            ),
            SurchargeWarning::DegenerateSpreadFrame => {
                write!(f, "load direction has no horizontal component to span the spread frame")
            }
            SurchargeWarning::AmbiguousVerticalClip { crossings } => write!(
                f,
                "vertical line through the shadow centroid crosses the outline {crossings} times, keeping the extreme pair"
            ),
            SurchargeWarning::DegenerateVerticalClip => {
                write!(f, "no vertical segment through the shadow centroid, using the centroid itself")
            }
            SurchargeWarning::UnbalancedMoment => {
                write!(f, "loaded sample layout cannot balance the resultant moment exactly")
            }
        }
    }
}

/// Pressure analysis of one surcharge load against one receiving surface.
#[derive(Debug, Clone)]
pub struct SurchargeAnalysis {
    /// The surcharge load
    pub load: HorizontalLoad,

    /// Receiving surface plane (e.g. the wall face)
    pub wall: Plane,

    /// Soil effective friction angle φ (radians)
    pub soil_friction: f64,

    /// Wall-soil interface friction angle δ (radians)
    pub interface_friction: f64,

    /// Receiving-surface sample points
    pub samples: Vec<SamplePoint>,
}

/// Result of a surcharge analysis.
#[derive(Debug, Clone, Serialize)]
pub struct SurchargeResult {
    /// Per-sample local pressures; every sample appears, unloaded ones with
    /// zero entries.
    pub pressures: Vec<ElementPressure>,

    /// Covered tributary area over shadow area, in [0, 1].
    pub loaded_area_ratio: f64,

    /// Loaded-region outline on the wall plane, when construction
    /// succeeded.
    pub shadow: Option<Polygon3>,

    /// Per-sample force vectors (newtons).
    pub assignment: ForceAssignment,

    /// Sum of the assigned forces (newtons).
    pub resultant: na::Vector3<f64>,

    pub warnings: Vec<SurchargeWarning>,
}

impl SurchargeAnalysis {
    /// Create a new analysis
    ///
    /// # Arguments
    /// * `load` - Surcharge load (footprint + force vector)
    /// * `wall` - Receiving surface plane
    /// * `soil_friction` - Soil effective friction angle φ
    /// * `interface_friction` - Wall-soil interface friction angle δ
    pub fn new(
        load: HorizontalLoad,
        wall: Plane,
        soil_friction: FrictionAngle,
        interface_friction: WallFrictionAngle,
    ) -> Self {
        Self {
            load,
            wall,
            soil_friction: soil_friction.get::<radian>(),
            interface_friction: interface_friction.get::<radian>(),
            samples: Vec::new(),
        }
    }

    /// Add a receiving-surface sample point
    pub fn add_sample(
        &mut self,
        id: u32,
        position: na::Point3<f64>,
        tributary_area: TributaryArea,
        frame: LocalFrame,
    ) {
        self.samples.push(SamplePoint {
            id,
            position,
            tributary_area: tributary_area.get::<square_meter>(),
            frame,
        });
    }

    pub fn add_samples(&mut self, samples: impl IntoIterator<Item = SamplePoint>) {
        self.samples.extend(samples);
    }

    /// Run the pipeline: shadow projection, sample selection, force
    /// distribution and pressure conversion.
    ///
    /// Degenerate geometry is not an error: the load simply has no effect
    /// on this surface and the result says why in `warnings`.
    pub fn calculate_pressures(&self) -> Result<SurchargeResult, SurchargeError> {
        self.load.geometry.validate()?;
        if self.load.force.norm() < 1e-12 {
            return Err(SurchargeError::ZeroForce);
        }
        for sample in &self.samples {
            if sample.tributary_area < 0.0 {
                return Err(SurchargeError::NegativeTributaryArea {
                    id: sample.id,
                    area: sample.tributary_area,
                });
            }
        }

        let (vertices, weights) = self.load.geometry.projection_inputs(&self.wall);
        let outcome = shadow::project_shadow(
            &vertices,
            &weights,
            self.load.force,
            self.soil_friction,
            &self.wall,
        );
        let mut warnings = outcome.warnings;

        let shadow_polygon = match outcome.shadow {
            Some(polygon) => polygon,
            None => return Ok(SurchargeResult::no_effect(&self.samples, warnings)),
        };

        let (selected, loaded_area_ratio) =
            selector::select_loaded_samples(&shadow_polygon, &self.samples);
        let (assignment, distribution_warnings) = distributor::distribute_force(
            self.load.force,
            loaded_area_ratio,
            &selected,
            &self.samples,
            &shadow_polygon,
        );
        warnings.extend(distribution_warnings);

        let pressures =
            pressure::convert_pressures(&assignment, &self.samples, self.interface_friction);
        let resultant = assignment.total();

        Ok(SurchargeResult {
            pressures,
            loaded_area_ratio,
            shadow: Some(shadow_polygon),
            assignment,
            resultant,
            warnings,
        })
    }
}

impl SurchargeResult {
    fn no_effect(samples: &[SamplePoint], warnings: Vec<SurchargeWarning>) -> Self {
        Self {
            pressures: samples.iter().map(|s| ElementPressure::zero(s.id)).collect(),
            loaded_area_ratio: 0.0,
            shadow: None,
            assignment: ForceAssignment::default(),
            resultant: na::Vector3::zeros(),
            warnings,
        }
    }

    /// Magnitude of the resultant of the assigned forces
    pub fn resultant_force(&self) -> Force {
        Force::new::<newton>(self.resultant.norm())
    }

    /// Largest absolute normal pressure over all samples
    pub fn max_normal_pressure(&self) -> Pressure {
        let max = self
            .pressures
            .iter()
            .map(|p| p.normal.abs())
            .fold(0.0, f64::max);
        Pressure::new::<pascal>(max)
    }

    /// Format results for display
    pub fn summary(&self) -> String {
        let mut s = String::new();
        s.push_str("Surcharge Pressure Analysis:\n");
        s.push_str(&format!(
            "\nLoaded area ratio: {:.3}\n",
            self.loaded_area_ratio
        ));
        s.push_str(&format!(
            " Resultant: {}\n",
            DisplayForce(self.resultant_force())
        ));
        s.push_str(&format!(
            " Max normal pressure: {}\n",
            DisplayWallPressure(self.max_normal_pressure())
        ));
        for warning in &self.warnings {
            s.push_str(&format!(" Warning: {}\n", warning));
        }

        s.push_str("\nLoaded samples:\n");
        for p in self.pressures.iter().filter(|p| !p.is_zero()) {
            s.push_str(&format!(
                " {}: normal {:.1} Pa, tangential ({:.1}, {:.1}) Pa\n",
                p.id, p.normal, p.tangential_i, p.tangential_j
            ));
        }
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surcharge::load::LoadGeometry;
    use approx::assert_relative_eq;

    fn wall() -> Plane {
        Plane::new(na::Point3::origin(), na::Vector3::y()).unwrap()
    }

    /// 8 m wide, 4 m tall wall face on a 1 m grid (32 cells of 1 m²)
    fn wall_samples() -> Vec<SamplePoint> {
        let frame = LocalFrame::from_outward_normal(na::Vector3::y()).unwrap();
        let mut samples = Vec::new();
        let mut id = 0;
        for row in 0..4 {
            for col in 0..8 {
                id += 1;
                samples.push(SamplePoint {
                    id,
                    position: na::Point3::new(-3.5 + col as f64, 0.0, 0.5 + row as f64),
                    tributary_area: 1.0,
                    frame,
                });
            }
        }
        samples
    }

    fn analysis_for(load: HorizontalLoad) -> SurchargeAnalysis {
        let mut analysis = SurchargeAnalysis::new(
            load,
            wall(),
            Angle::new::<degree>(30.0),
            Angle::new::<degree>(20.0),
        );
        analysis.add_samples(wall_samples());
        analysis
    }

    #[test]
    fn test_point_load_toward_wall() {
        // 100 kN pushing against the wall from 2 m behind it
        let load = HorizontalLoad::new(
            LoadGeometry::Point(na::Point3::new(0.0, 2.0, 3.0)),
            na::Vector3::new(0.0, -100_000.0, 0.0),
        );
        let result = analysis_for(load).calculate_pressures().unwrap();

        assert!(result.warnings.is_empty());

        // Shadow quad spans x ∈ [-2, 2], z ∈ [3 - 2·tan60°, 3 - 2·tan30°];
        // that covers the 8 cells at |x| < 2, z ∈ {0.5, 1.5}
        let shadow_area = 4.0 * 2.0 * (60.0_f64.to_radians().tan() - 30.0_f64.to_radians().tan());
        assert_relative_eq!(
            result.loaded_area_ratio,
            8.0 / shadow_area,
            epsilon = 1e-9
        );

        let loaded: Vec<_> = result.pressures.iter().filter(|p| !p.is_zero()).collect();
        assert_eq!(loaded.len(), 8);

        // The resultant is a strictly positive fraction of the applied load
        let resultant = result.resultant_force().get::<newton>();
        assert!(resultant > 0.0 && resultant < 100_000.0);
        assert_relative_eq!(resultant, result.loaded_area_ratio * 100_000.0, epsilon = 1e-3);

        // Sum of forces matches the scaled load vector
        let expected = na::Vector3::new(0.0, -100_000.0 * result.loaded_area_ratio, 0.0);
        assert_relative_eq!((result.resultant - expected).norm(), 0.0, epsilon = 1e-3);

        // Coulomb cap everywhere
        let tan_delta = 20.0_f64.to_radians().tan();
        for p in &result.pressures {
            assert!(p.tangential_i.abs() <= p.normal.abs() * tan_delta + 1e-9);
            assert!(p.tangential_j.abs() <= p.normal.abs() * tan_delta + 1e-9);
        }
    }

    #[test]
    fn test_point_load_away_from_wall() {
        let load = HorizontalLoad::new(
            LoadGeometry::Point(na::Point3::new(0.0, 2.0, 3.0)),
            na::Vector3::new(0.0, 100_000.0, 0.0),
        );
        let result = analysis_for(load).calculate_pressures().unwrap();

        assert!(result.shadow.is_none());
        assert_relative_eq!(result.loaded_area_ratio, 0.0);
        assert!(result.pressures.iter().all(|p| p.is_zero()));
        assert_eq!(
            result.warnings,
            vec![SurchargeWarning::RayMissedWall { vertex: 0 }]
        );
        assert_relative_eq!(result.resultant.norm(), 0.0);
    }

    #[test]
    fn test_area_load_covering_whole_wall() {
        // Wall-parallel rectangle 0.2 m behind the face, sized so its
        // shadow reaches 0.05 m past every wall edge
        let drop = 0.2 * 30.0_f64.to_radians().tan();
        let contour = vec![
            na::Point3::new(-3.85, 0.2, 4.05 + drop),
            na::Point3::new(3.85, 0.2, 4.05 + drop),
            na::Point3::new(3.85, 0.2, -0.05 + drop),
            na::Point3::new(-3.85, 0.2, -0.05 + drop),
        ];
        let load = HorizontalLoad::new(
            LoadGeometry::Area(contour),
            na::Vector3::new(0.0, -100_000.0, 0.0),
        );
        let result = analysis_for(load).calculate_pressures().unwrap();

        assert!(result.warnings.is_empty());

        // All 32 cells are covered; the shadow is 8.1 m × 4.1 m
        assert_relative_eq!(result.loaded_area_ratio, 32.0 / (8.1 * 4.1), epsilon = 1e-6);
        assert!(result.loaded_area_ratio > 0.95);
        assert!(result.pressures.iter().all(|p| !p.is_zero()));

        let resultant = result.resultant_force().get::<newton>();
        assert!(resultant > 95_000.0);
        assert!(resultant <= 100_000.0 + 1e-6);
    }

    #[test]
    fn test_line_load_between_point_and_area() {
        let load = HorizontalLoad::new(
            LoadGeometry::Line {
                a: na::Point3::new(-1.0, 1.0, 3.0),
                b: na::Point3::new(-1.0, 3.0, 3.0),
            },
            na::Vector3::new(0.0, -50_000.0, 0.0),
        );
        let result = analysis_for(load).calculate_pressures().unwrap();

        assert!(result.shadow.is_some());
        assert!(result.loaded_area_ratio > 0.0);
        let expected = na::Vector3::new(0.0, -50_000.0 * result.loaded_area_ratio, 0.0);
        assert_relative_eq!((result.resultant - expected).norm(), 0.0, epsilon = 1e-3);
    }

    #[test]
    fn test_invalid_inputs_are_rejected() {
        let zero_force = SurchargeAnalysis::new(
            HorizontalLoad::new(
                LoadGeometry::Point(na::Point3::new(0.0, 2.0, 1.0)),
                na::Vector3::zeros(),
            ),
            wall(),
            Angle::new::<degree>(30.0),
            Angle::new::<degree>(20.0),
        );
        assert!(matches!(
            zero_force.calculate_pressures(),
            Err(SurchargeError::ZeroForce)
        ));

        let bad_line = SurchargeAnalysis::new(
            HorizontalLoad::new(
                LoadGeometry::Line {
                    a: na::Point3::new(0.0, 1.0, 1.0),
                    b: na::Point3::new(0.0, 1.0, 1.0),
                },
                na::Vector3::new(0.0, -1.0, 0.0),
            ),
            wall(),
            Angle::new::<degree>(30.0),
            Angle::new::<degree>(20.0),
        );
        assert!(matches!(
            bad_line.calculate_pressures(),
            Err(SurchargeError::DegenerateLine)
        ));

        let mut bad_sample = analysis_for(HorizontalLoad::new(
            LoadGeometry::Point(na::Point3::new(0.0, 2.0, 3.0)),
            na::Vector3::new(0.0, -1000.0, 0.0),
        ));
        bad_sample.samples[0].tributary_area = -1.0;
        assert!(matches!(
            bad_sample.calculate_pressures(),
            Err(SurchargeError::NegativeTributaryArea { id: 1, .. })
        ));
    }

    #[test]
    fn test_summary_formats() {
        let load = HorizontalLoad::new(
            LoadGeometry::Point(na::Point3::new(0.0, 2.0, 3.0)),
            na::Vector3::new(0.0, -100_000.0, 0.0),
        );
        let result = analysis_for(load).calculate_pressures().unwrap();
        let summary = result.summary();

        assert!(summary.contains("Loaded area ratio"));
        assert!(summary.contains("Resultant"));
    }
}

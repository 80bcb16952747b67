use nalgebra as na;
use serde::{Deserialize, Serialize};

use crate::geometry::Plane;
use crate::types::*;

use super::analysis::SurchargeError;

/// Footprint of a surcharge load behind the wall.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LoadGeometry {
    /// Concentrated load at a single point
    Point(na::Point3<f64>),

    /// Load along a segment
    Line {
        a: na::Point3<f64>,
        b: na::Point3<f64>,
    },

    /// Load over a polygonal footprint (at least 3 contour vertices)
    Area(Vec<na::Point3<f64>>),
}

impl LoadGeometry {
    pub fn validate(&self) -> Result<(), SurchargeError> {
        match self {
            LoadGeometry::Point(_) => Ok(()),
            LoadGeometry::Line { a, b } => {
                if (b - a).norm() < 1e-9 {
                    Err(SurchargeError::DegenerateLine)
                } else {
                    Ok(())
                }
            }
            LoadGeometry::Area(contour) => {
                if contour.len() < 3 {
                    Err(SurchargeError::TooFewAreaVertices {
                        found: contour.len(),
                    })
                } else {
                    Ok(())
                }
            }
        }
    }

    pub fn vertices(&self) -> Vec<na::Point3<f64>> {
        match self {
            LoadGeometry::Point(p) => vec![*p],
            LoadGeometry::Line { a, b } => vec![*a, *b],
            LoadGeometry::Area(contour) => contour.clone(),
        }
    }

    /// Average of the feature vertices.
    pub fn centroid(&self) -> na::Point3<f64> {
        let vertices = self.vertices();
        let sum: na::Vector3<f64> = vertices.iter().map(|p| p.coords).sum();
        na::Point3::from(sum / vertices.len() as f64)
    }

    /// Vertex list plus per-vertex interpolation weight between the nearest
    /// (0) and farthest (1) vertex from `wall`.
    ///
    /// Point loads expand to a twin pair at weights 0 and 1, the two faces
    /// of the spread cone. Line endpoints are reordered nearest first. When
    /// every vertex is equidistant from the wall the area weights collapse
    /// to 0.
    pub fn projection_inputs(&self, wall: &Plane) -> (Vec<na::Point3<f64>>, Vec<f64>) {
        match self {
            LoadGeometry::Point(p) => (vec![*p, *p], vec![0.0, 1.0]),
            LoadGeometry::Line { a, b } => {
                if wall.distance(a) <= wall.distance(b) {
                    (vec![*a, *b], vec![0.0, 1.0])
                } else {
                    (vec![*b, *a], vec![0.0, 1.0])
                }
            }
            LoadGeometry::Area(contour) => {
                let distances: Vec<f64> = contour.iter().map(|p| wall.distance(p)).collect();
                let nearest = distances.iter().cloned().fold(f64::INFINITY, f64::min);
                let farthest = distances.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
                let span = farthest - nearest;

                let weights = distances
                    .iter()
                    .map(|d| if span < 1e-9 { 0.0 } else { (d - nearest) / span })
                    .collect();
                (contour.clone(), weights)
            }
        }
    }
}

/// A surcharge load: footprint plus force vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HorizontalLoad {
    pub geometry: LoadGeometry,

    /// Force vector in newtons, global frame. Need not be exactly
    /// horizontal, but points from the load toward the receiving surface.
    pub force: na::Vector3<f64>,
}

impl HorizontalLoad {
    pub fn new(geometry: LoadGeometry, force: na::Vector3<f64>) -> Self {
        Self { geometry, force }
    }

    /// Build from a force magnitude and a direction; `None` when the
    /// direction is (numerically) zero.
    pub fn from_magnitude(
        geometry: LoadGeometry,
        magnitude: Force,
        direction: na::Vector3<f64>,
    ) -> Option<Self> {
        let direction = na::Unit::try_new(direction, 1e-12)?;
        Some(Self {
            geometry,
            force: direction.into_inner() * magnitude.get::<newton>(),
        })
    }

    pub fn magnitude(&self) -> Force {
        Force::new::<newton>(self.force.norm())
    }
}

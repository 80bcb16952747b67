use nalgebra as na;
use std::f64::consts::FRAC_PI_4;

use crate::geometry::{ON_PLANE_TOL, Plane, Polygon3, Ray, axis_rotation_rad, vertical_axis, vertical_rotation_rad};

use super::analysis::SurchargeWarning;

/// Horizontal spread half-angle. The diffusion rule fixes this at 45°
/// regardless of the soil friction angle.
pub const HORIZONTAL_HALF_ANGLE: f64 = FRAC_PI_4;

/// Vertical spread angle for a vertex at interpolation weight `lambda`.
///
/// The underlying spread angle blends from φ at the nearest vertex
/// (`lambda` = 0) to 45° + φ/2 at the farthest (`lambda` = 1); the result
/// then carries the horizontal-projection correction `sin(45°)`.
pub fn vertical_spread_angle(lambda: f64, phi: f64) -> f64 {
    let base = phi + lambda * (FRAC_PI_4 + 0.5 * phi - phi);
    (base.tan() * HORIZONTAL_HALF_ANGLE.sin()).atan()
}

/// Shadow construction result: the loaded-region outline, or nothing when a
/// required ray never reaches the wall.
#[derive(Debug, Clone)]
pub struct ShadowOutcome {
    pub shadow: Option<Polygon3>,
    pub warnings: Vec<SurchargeWarning>,
}

impl ShadowOutcome {
    fn failed(warning: SurchargeWarning) -> Self {
        log::warn!("shadow projection failed: {warning}");
        Self {
            shadow: None,
            warnings: vec![warning],
        }
    }
}

/// Project the spread footprint of a load onto the wall plane.
///
/// Every vertex casts two rays, the load direction tilted down about the
/// horizontal spread axis by its vertical spread angle and then swung about
/// the vertical axis by ±45°; the rotations are applied in that order and do
/// not commute. The shadow is the convex outline of the ray intersections.
/// Vertices already on the wall map to themselves.
pub fn project_shadow(
    vertices: &[na::Point3<f64>],
    weights: &[f64],
    direction: na::Vector3<f64>,
    phi: f64,
    wall: &Plane,
) -> ShadowOutcome {
    let dir = match na::Unit::try_new(direction, 1e-12) {
        Some(dir) => dir,
        None => return ShadowOutcome::failed(SurchargeWarning::DegenerateSpreadFrame),
    };

    // Every vertex must see the wall along the raw load direction
    for (index, vertex) in vertices.iter().enumerate() {
        if wall.distance(vertex) < ON_PLANE_TOL {
            continue;
        }
        if Ray::from_unit(*vertex, dir).intersect_plane(wall).is_none() {
            return ShadowOutcome::failed(SurchargeWarning::RayMissedWall { vertex: index });
        }
    }

    // Vertical reference plane through the load centroid, its wall
    // intersection and the vertical axis; its horizontal trace is the tilt
    // axis for the vertical spread
    let pivot = {
        let sum: na::Vector3<f64> = vertices.iter().map(|p| p.coords).sum();
        na::Point3::from(sum / vertices.len() as f64)
    };
    let toward = if wall.distance(&pivot) < ON_PLANE_TOL {
        dir.into_inner()
    } else {
        match Ray::from_unit(pivot, dir).intersect_plane(wall) {
            Some(hit) => hit - pivot,
            None => return ShadowOutcome::failed(SurchargeWarning::DegenerateSpreadFrame),
        }
    };
    let tilt_axis = match na::Unit::try_new(vertical_axis().cross(&toward), 1e-9) {
        Some(axis) => axis,
        None => return ShadowOutcome::failed(SurchargeWarning::DegenerateSpreadFrame),
    };

    let mut spread_points: Vec<na::Point3<f64>> = Vec::with_capacity(2 * vertices.len());
    for (index, (vertex, lambda)) in vertices.iter().zip(weights).enumerate() {
        if wall.distance(vertex) < ON_PLANE_TOL {
            // Already on the wall: the spread collapses onto the vertex
            spread_points.push(*vertex);
            spread_points.push(*vertex);
            continue;
        }

        let tilt = axis_rotation_rad(tilt_axis, vertical_spread_angle(*lambda, phi));
        for sign in [1.0, -1.0] {
            let swing = vertical_rotation_rad(sign * HORIZONTAL_HALF_ANGLE);
            // Tilt first, then swing; the composition order is significant
            let spread_dir = swing * (tilt * dir.into_inner());
            let hit = Ray::new(*vertex, spread_dir).and_then(|ray| ray.intersect_plane(wall));
            match hit {
                Some(hit) => spread_points.push(hit),
                None => {
                    return ShadowOutcome::failed(SurchargeWarning::RayMissedWall {
                        vertex: index,
                    });
                }
            }
        }
    }

    ShadowOutcome {
        shadow: Polygon3::convex_hull(&spread_points, *wall),
        warnings: Vec::new(),
    }
}

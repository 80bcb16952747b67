use nalgebra as na;

use crate::geometry::plane::Plane;

/// A half-line: origin plus unit direction.
#[derive(Debug, Clone, Copy)]
pub struct Ray {
    pub origin: na::Point3<f64>,
    pub direction: na::Unit<na::Vector3<f64>>,
}

impl Ray {
    /// Returns `None` when `direction` is (numerically) zero.
    pub fn new(origin: na::Point3<f64>, direction: na::Vector3<f64>) -> Option<Self> {
        na::Unit::try_new(direction, 1e-12).map(|direction| Self { origin, direction })
    }

    pub fn from_unit(origin: na::Point3<f64>, direction: na::Unit<na::Vector3<f64>>) -> Self {
        Self { origin, direction }
    }

    pub fn point_at(&self, t: f64) -> na::Point3<f64> {
        self.origin + self.direction.into_inner() * t
    }

    /// Intersection with `plane` in the forward direction only.
    ///
    /// Returns `None` when the ray is parallel to the plane or the plane
    /// lies behind the origin.
    pub fn intersect_plane(&self, plane: &Plane) -> Option<na::Point3<f64>> {
        let d = self.direction.into_inner();
        let denom = plane.normal().dot(&d);
        if denom.abs() < 1e-12 {
            return None;
        }

        let t = -plane.signed_distance(&self.origin) / denom;
        if t < 0.0 {
            return None;
        }

        Some(self.point_at(t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_forward_intersection() {
        let plane = Plane::new(na::Point3::origin(), na::Vector3::y()).unwrap();
        let ray = Ray::new(na::Point3::new(1.0, 2.0, 3.0), na::Vector3::new(0.0, -1.0, 0.0))
            .unwrap();

        let hit = ray.intersect_plane(&plane).unwrap();
        assert_relative_eq!(hit.x, 1.0);
        assert_relative_eq!(hit.y, 0.0);
        assert_relative_eq!(hit.z, 3.0);
    }

    #[test]
    fn test_plane_behind_origin() {
        let plane = Plane::new(na::Point3::origin(), na::Vector3::y()).unwrap();
        let ray =
            Ray::new(na::Point3::new(1.0, 2.0, 3.0), na::Vector3::new(0.0, 1.0, 0.0)).unwrap();

        assert!(ray.intersect_plane(&plane).is_none());
    }

    #[test]
    fn test_parallel_ray() {
        let plane = Plane::new(na::Point3::origin(), na::Vector3::y()).unwrap();
        let ray =
            Ray::new(na::Point3::new(0.0, 2.0, 0.0), na::Vector3::new(1.0, 0.0, 0.0)).unwrap();

        assert!(ray.intersect_plane(&plane).is_none());
    }
}

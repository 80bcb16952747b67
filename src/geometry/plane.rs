use nalgebra as na;
use serde::Serialize;

/// Points closer than this to a plane count as lying on it (meters).
pub const ON_PLANE_TOL: f64 = 1e-6;

/// An oriented plane given by a point on it and a unit normal.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Plane {
    origin: na::Point3<f64>,
    normal: na::Unit<na::Vector3<f64>>,
}

impl Plane {
    /// Returns `None` when `normal` is (numerically) zero.
    pub fn new(origin: na::Point3<f64>, normal: na::Vector3<f64>) -> Option<Self> {
        na::Unit::try_new(normal, 1e-12).map(|normal| Self { origin, normal })
    }

    /// Plane through three points; `None` when they are collinear.
    pub fn from_points(
        a: na::Point3<f64>,
        b: na::Point3<f64>,
        c: na::Point3<f64>,
    ) -> Option<Self> {
        Self::new(a, (b - a).cross(&(c - a)))
    }

    pub fn origin(&self) -> na::Point3<f64> {
        self.origin
    }

    pub fn normal(&self) -> na::Unit<na::Vector3<f64>> {
        self.normal
    }

    /// Signed distance, positive on the side the normal points to.
    pub fn signed_distance(&self, point: &na::Point3<f64>) -> f64 {
        self.normal.dot(&(point - self.origin))
    }

    pub fn distance(&self, point: &na::Point3<f64>) -> f64 {
        self.signed_distance(point).abs()
    }

    pub fn contains(&self, point: &na::Point3<f64>) -> bool {
        self.distance(point) < ON_PLANE_TOL
    }

    /// Orthogonal projection onto the plane.
    pub fn project(&self, point: &na::Point3<f64>) -> na::Point3<f64> {
        point - self.normal.into_inner() * self.signed_distance(point)
    }

    /// Deterministic orthonormal in-plane frame `(e1, e2)` with
    /// `e1 × e2 = normal`.
    pub fn basis(&self) -> (na::Vector3<f64>, na::Vector3<f64>) {
        let n = self.normal.into_inner();
        let helper = if n.z.abs() < 0.9 {
            na::Vector3::z()
        } else {
            na::Vector3::x()
        };
        let e1 = helper.cross(&n).normalize();
        let e2 = n.cross(&e1);
        (e1, e2)
    }

    /// Coordinates of `point` in the plane frame (the out-of-plane component
    /// is dropped).
    pub fn to_local(&self, point: &na::Point3<f64>) -> (f64, f64) {
        let (e1, e2) = self.basis();
        let d = point - self.origin;
        (d.dot(&e1), d.dot(&e2))
    }

    /// Inverse of [`Plane::to_local`]; always lands on the plane.
    pub fn from_local(&self, u: f64, v: f64) -> na::Point3<f64> {
        let (e1, e2) = self.basis();
        self.origin + e1 * u + e2 * v
    }
}

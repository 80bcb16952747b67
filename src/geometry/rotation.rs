use crate::types::*;
use nalgebra as na;

/// The global vertical axis (+Z, up).
pub fn vertical_axis() -> na::Unit<na::Vector3<f64>> {
    na::Vector3::z_axis()
}

/// Rotation about the global vertical axis
pub fn vertical_rotation(angle: Angle) -> na::Rotation3<f64> {
    vertical_rotation_rad(angle.get::<radian>())
}

/// Rotation about the global vertical axis, angle in radians
pub fn vertical_rotation_rad(theta: f64) -> na::Rotation3<f64> {
    na::Rotation3::from_axis_angle(&vertical_axis(), theta)
}

/// Rotation about an arbitrary axis
pub fn axis_rotation(axis: na::Unit<na::Vector3<f64>>, angle: Angle) -> na::Rotation3<f64> {
    axis_rotation_rad(axis, angle.get::<radian>())
}

/// Rotation about an arbitrary axis, angle in radians
pub fn axis_rotation_rad(axis: na::Unit<na::Vector3<f64>>, theta: f64) -> na::Rotation3<f64> {
    na::Rotation3::from_axis_angle(&axis, theta)
}

/// Ordered composition: `first` is applied before `second`.
///
/// Rotations about different axes do not commute, so the order matters.
pub fn compose(second: &na::Rotation3<f64>, first: &na::Rotation3<f64>) -> na::Rotation3<f64> {
    second * first
}

use glam::{DVec2, IVec2};

use crate::camera_model::CameraModel;

/// Stand-in for a zero lateral component of the centroid-tip vector.
pub const ZERO_OFFSET_EPSILON: f64 = 1e-10;

/// Largest apparent heading error caused by the raised tip of a cone,
/// measured on the robot camera.
pub const MAX_TIP_ERROR: f64 = 19.14 * std::f64::consts::PI / 180.0;

/// Heading of a cone on the ground plane, in radians.
///
/// 0 means the tip points straight away from the robot. Positive angles mean
/// the tip lies to the right of the centroid, so a tip directly right of the
/// centroid gives `+pi/2` and a tip pointing back at the robot gives `pi`.
pub fn cone_angle(centroid: DVec2, tip: DVec2) -> f64 {
    let mut offset = tip - centroid;
    if offset.x == 0.0 {
        offset.x = ZERO_OFFSET_EPSILON;
    }
    offset.x.atan2(offset.y)
}

/// Apparent heading error at `angle` for a camera pitched at `pitch`.
///
/// The error vanishes when looking straight down or when the cone points
/// straight ahead, and pulls the heading back towards zero otherwise.
fn tip_error(angle: f64, pitch: f64, max_tip_error: f64) -> f64 {
    -angle.signum() * max_tip_error * pitch.cos() * angle.abs().sin()
}

/// Compensates the heading for the projection of the raised cone tip onto the
/// ground plane.
///
/// The pitch is taken from the ray through `centroid_pixel`. The correction is
/// evaluated once on the raw angle and then again on the preliminary result.
pub fn apply_tip_error_correction(
    angle: f64,
    centroid_pixel: IVec2,
    camera: &CameraModel,
    max_tip_error: f64,
) -> f64 {
    let pitch = camera.absolute_angle(centroid_pixel).y;
    let preliminary = angle + tip_error(angle, pitch, max_tip_error);
    angle + tip_error(preliminary, pitch, max_tip_error)
}

/// Point on the segment from `centroid` to `tip`.
///
/// `proximity_to_base` of 1 yields the centroid, 0 yields the tip.
pub fn cone_midpoint(centroid: DVec2, tip: DVec2, proximity_to_base: f64) -> DVec2 {
    centroid * proximity_to_base + tip * (1.0 - proximity_to_base)
}

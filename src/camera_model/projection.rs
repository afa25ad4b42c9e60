use glam::{DVec2, DVec3, IVec2};
use serde::{Deserialize, Serialize};

/// Smallest tangent used as a divisor when intersecting a view ray with the
/// ground. Level rays land very far away instead of producing infinities.
pub const MIN_GROUND_TANGENT: f64 = 1e-10;

/// How the lateral ground distance is derived from the yaw of a view ray.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LateralModel {
    /// `x = y * tan(yaw)`.
    Planar,
    /// `x = sqrt(height^2 + y^2) * tan(yaw)`, the distance along the ray's
    /// vertical plane times the tangent of the yaw.
    #[default]
    Hypotenuse,
}

/// Angle between a pixel and the camera boresight.
///
/// Returns `(yaw, pitch)` in radians. Positive yaw is produced by pixels in
/// the right half of the image, positive pitch by pixels in the upper half.
/// The image midpoint uses integer division of the resolution.
pub fn angle_from_center(pixel: IVec2, resolution: IVec2, fov: DVec2) -> DVec2 {
    let midpoint = resolution / 2;
    let from_center = pixel - midpoint;
    let positive_y_up = IVec2::new(from_center.x, -from_center.y);
    let fraction = positive_y_up.as_dvec2() / resolution.as_dvec2();
    fraction * fov
}

/// Ground-plane displacement of the point seen at `pixel`, relative to the
/// robot centre.
///
/// `camera_offset` is the camera position (`x` right, `y` forwards, `z` height
/// above the ground) and `camera_angle` its yaw and pitch. The result is
/// `(lateral, forward)`, `x` positive to the right and `y` positive in front of
/// the robot.
///
/// A ray level with the horizon has no ground intersection; the tangent is
/// clamped to [`MIN_GROUND_TANGENT`] so the result is a very large but finite
/// distance in front of the robot. Rays above the horizon intersect the ground
/// behind the camera and give negative forward distances.
pub fn pixel_to_ground_offset(
    pixel: IVec2,
    resolution: IVec2,
    fov: DVec2,
    camera_offset: DVec3,
    camera_angle: DVec2,
    lateral: LateralModel,
) -> DVec2 {
    let angle = camera_angle + angle_from_center(pixel, resolution, fov);

    let depression = -angle.y;
    let mut tan_depression = depression.tan();
    if tan_depression.abs() < MIN_GROUND_TANGENT {
        log::warn!("view ray for {} is level with the horizon", pixel);
        tan_depression = if tan_depression < 0.0 {
            -MIN_GROUND_TANGENT
        } else {
            MIN_GROUND_TANGENT
        };
    }

    let height = camera_offset.z;
    let y = height / tan_depression;
    let x = match lateral {
        LateralModel::Planar => y * angle.x.tan(),
        LateralModel::Hypotenuse => height.hypot(y) * angle.x.tan(),
    };

    DVec2::new(x + camera_offset.x, y + camera_offset.y)
}

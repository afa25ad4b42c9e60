pub mod projection;

pub use projection::*;

use glam::{DVec2, DVec3, IVec2};
use serde::{Deserialize, Serialize};

/// Fixed mounting and optics of the robot camera.
///
/// * `resolution` - pixel width and height of the frames handed to the detector.
/// * `fov` - horizontal and vertical field of view in radians.
/// * `offset` - camera position relative to the robot centre: `x` is positive
///   to the right, `y` positive forwards, `z` the height above the ground.
/// * `angle` - camera yaw and pitch in radians relative to the robot body.
///   Negative pitch looks down.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraModel {
    pub resolution: IVec2,
    pub fov: DVec2,
    pub offset: DVec3,
    pub angle: DVec2,
}

impl Default for CameraModel {
    /// 3.6mm ELP module on the competition robot. The resolution includes the
    /// one pixel border the preprocessor adds on each side.
    fn default() -> Self {
        CameraModel::from_degrees(
            IVec2::new(640, 480) + IVec2::new(2, 2),
            DVec2::new(54.18, 39.93),
            DVec3::new(0.0, -6.75, 52.0),
            DVec2::new(0.0, -60.0),
        )
    }
}

impl CameraModel {
    pub fn from_degrees(
        resolution: IVec2,
        fov_degrees: DVec2,
        offset: DVec3,
        angle_degrees: DVec2,
    ) -> CameraModel {
        CameraModel {
            resolution,
            fov: DVec2::new(fov_degrees.x.to_radians(), fov_degrees.y.to_radians()),
            offset,
            angle: DVec2::new(angle_degrees.x.to_radians(), angle_degrees.y.to_radians()),
        }
    }

    pub fn image_center(&self) -> IVec2 {
        self.resolution / 2
    }

    pub fn height(&self) -> f64 {
        self.offset.z
    }

    /// Yaw and pitch of `pixel` in the robot frame.
    pub fn absolute_angle(&self, pixel: IVec2) -> DVec2 {
        self.angle + angle_from_center(pixel, self.resolution, self.fov)
    }

    pub fn ground_offset(&self, pixel: IVec2, lateral: LateralModel) -> DVec2 {
        pixel_to_ground_offset(pixel, self.resolution, self.fov, self.offset, self.angle, lateral)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.resolution.x <= 0 || self.resolution.y <= 0 {
            return Err(format!("resolution must be positive, got {}", self.resolution));
        }
        if !(self.fov.x > 0.0 && self.fov.y > 0.0) {
            return Err(format!("fov must be positive, got {}", self.fov));
        }
        if !self.offset.is_finite() || !self.angle.is_finite() {
            return Err("camera offset and angle must be finite".to_string());
        }
        Ok(())
    }
}

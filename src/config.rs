use serde::{Deserialize, Serialize};

use crate::camera_model::{CameraModel, LateralModel};
use crate::contours::SelectionPolicy;
use crate::corners::CornerConfig;
use crate::error::{ConeError, Result};
use crate::heading::MAX_TIP_ERROR;
use crate::preprocess::PreprocessConfig;

/// Every tunable of the detection pipeline.
///
/// Missing fields in a JSON file fall back to the defaults below, which are
/// the values used on the competition robot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    pub camera: CameraModel,
    pub min_contour_area: f64,
    pub max_contour_area: f64,
    pub selection: SelectionPolicy,
    pub lateral: LateralModel,
    pub corners: CornerConfig,
    pub correction_enabled: bool,
    pub max_tip_error: f64,
    pub preprocess: PreprocessConfig,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            camera: CameraModel::default(),
            min_contour_area: 2750.0,
            max_contour_area: 9250.0,
            selection: SelectionPolicy::MostCentral,
            lateral: LateralModel::Hypotenuse,
            corners: CornerConfig::default(),
            correction_enabled: true,
            max_tip_error: MAX_TIP_ERROR,
            preprocess: PreprocessConfig::default(),
        }
    }
}

impl DetectorConfig {
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(ConeError::InvalidConfig(msg));

        self.camera.validate().map_err(ConeError::InvalidConfig)?;
        if !(self.min_contour_area > 0.0) {
            return invalid(format!(
                "min_contour_area must be positive, got {}",
                self.min_contour_area
            ));
        }
        if !(self.min_contour_area <= self.max_contour_area) {
            return invalid(format!(
                "min_contour_area {} exceeds max_contour_area {}",
                self.min_contour_area, self.max_contour_area
            ));
        }
        let c = &self.corners;
        if !(c.tip_region_ratio > 0.0 && c.tip_region_ratio <= 1.0) {
            return invalid(format!(
                "tip_region_ratio must be in (0, 1], got {}",
                c.tip_region_ratio
            ));
        }
        if !(c.near_distance >= 0.0 && c.close_distance >= 0.0) {
            return invalid("corner distances must be non-negative".to_string());
        }
        let p = &self.preprocess;
        if p.hsv_ranges.is_empty() {
            return invalid("at least one hsv range is required".to_string());
        }
        if p.hsv_ranges.iter().any(|r| !(r.weight.is_finite() && r.weight >= 0.0)) {
            return invalid("hsv range weights must be finite and non-negative".to_string());
        }
        if !self.max_tip_error.is_finite() {
            return invalid("max_tip_error must be finite".to_string());
        }
        Ok(())
    }
}

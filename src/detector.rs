use glam::IVec2;
use image::GrayImage;
use serde::Serialize;

use crate::config::DetectorConfig;
use crate::contours::{extract_contours, select_cone_contour};
use crate::corners::{group_corners, refine_tip};
use crate::geometry::{contour_centroid, farthest_point};
use crate::heading::{apply_tip_error_correction, cone_angle};
use crate::types::{Contour, CornerGroup, ObjectPose};

/// Everything the pipeline derived for one frame, including the intermediate
/// geometry used for debug overlays.
#[derive(Debug, Clone, Serialize)]
pub struct ConeDetection {
    pub pose: ObjectPose,
    pub contour: Contour,
    pub corner_groups: Vec<CornerGroup>,
    pub rough_tip: IVec2,
}

/// Outcome of a frame when the caller keeps the last pose on a miss.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FrameResult {
    pub found: bool,
    pub pose: Option<ObjectPose>,
}

/// Position and heading of the cone from an already selected contour.
///
/// `None` when the contour is empty or encloses no area.
pub fn compute_cone_details(contour: &[IVec2], config: &DetectorConfig) -> Option<ConeDetection> {
    let centroid = contour_centroid(contour)?;
    let rough_tip = farthest_point(contour, centroid)?;

    let corner_groups = group_corners(contour, centroid, rough_tip, &config.corners);
    let tip = refine_tip(&corner_groups, rough_tip, &config.corners);

    let camera = &config.camera;
    let centroid_position = camera.ground_offset(centroid, config.lateral);
    let tip_position = camera.ground_offset(tip, config.lateral);

    let raw_angle = cone_angle(centroid_position, tip_position);
    let angle = if config.correction_enabled {
        apply_tip_error_correction(raw_angle, centroid, camera, config.max_tip_error)
    } else {
        raw_angle
    };
    log::trace!(
        "centroid {} rough tip {} tip {} groups {} raw angle {:.4} angle {:.4}",
        centroid,
        rough_tip,
        tip,
        corner_groups.len(),
        raw_angle,
        angle
    );

    Some(ConeDetection {
        pose: ObjectPose::new(centroid_position, tip_position, centroid, tip, angle),
        contour: contour.to_vec(),
        corner_groups,
        rough_tip,
    })
}

/// Runs contour selection and the geometric pipeline on a binary mask.
pub fn detect_cone_detailed(mask: &GrayImage, config: &DetectorConfig) -> Option<ConeDetection> {
    let contours = extract_contours(mask);
    let index = select_cone_contour(
        &contours,
        config.min_contour_area,
        config.max_contour_area,
        config.selection,
        config.camera.resolution,
    );
    let Some(index) = index else {
        log::debug!("no cone contour among {} candidates", contours.len());
        return None;
    };
    compute_cone_details(&contours[index], config)
}

/// Cone pose in a binary mask, or `None` when no contour qualifies.
pub fn detect_cone(mask: &GrayImage, config: &DetectorConfig) -> Option<ObjectPose> {
    detect_cone_detailed(mask, config).map(|d| d.pose)
}

/// Like [`detect_cone`], reporting `previous` as the pose when nothing is
/// found in this frame.
pub fn detect_cone_or_previous(
    mask: &GrayImage,
    config: &DetectorConfig,
    previous: Option<&ObjectPose>,
) -> FrameResult {
    resolve_with_previous(detect_cone(mask, config), previous)
}

pub fn resolve_with_previous(
    detected: Option<ObjectPose>,
    previous: Option<&ObjectPose>,
) -> FrameResult {
    match detected {
        Some(pose) => FrameResult {
            found: true,
            pose: Some(pose),
        },
        None => FrameResult {
            found: false,
            pose: previous.copied(),
        },
    }
}

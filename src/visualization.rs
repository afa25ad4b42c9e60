use ab_glyph::{FontVec, PxScale};
use glam::IVec2;
use image::{Rgb, RgbImage};
use imageproc::drawing::{
    draw_cross_mut, draw_hollow_circle_mut, draw_line_segment_mut, draw_text_mut,
};

use crate::corners::CornerConfig;
use crate::detector::ConeDetection;
use crate::geometry::distance;
use crate::types::ObjectPose;

const GREEN: Rgb<u8> = Rgb([0, 255, 0]);
const RED: Rgb<u8> = Rgb([255, 0, 0]);
const MAGENTA: Rgb<u8> = Rgb([255, 0, 255]);

/// Distinct colour per corner group.
pub fn group_color(idx: usize) -> Rgb<u8> {
    let c = colorous::CATEGORY10[idx % colorous::CATEGORY10.len()];
    Rgb([c.r, c.g, c.b])
}

/// Ground position and heading in degrees, as printed on the overlay.
pub fn pose_caption(pose: &ObjectPose) -> String {
    let c = pose.centroid_position();
    format!("X:{:.6}, Y:{:.6}, A:{:.6}", c.x, c.y, pose.angle_degrees())
}

fn to_f32(p: IVec2) -> (f32, f32) {
    (p.x as f32, p.y as f32)
}

/// Draws the detection on a copy of `frame`.
///
/// `border` is the padding the preprocessor added around the mask; detection
/// coordinates are shifted back by it. The pose caption is only written when
/// a font is given.
pub fn draw_detection(
    frame: &RgbImage,
    detection: Option<&ConeDetection>,
    corners: &CornerConfig,
    border: i32,
    font: Option<&FontVec>,
) -> RgbImage {
    let mut canvas = frame.clone();
    let Some(detection) = detection else {
        return canvas;
    };
    let shift = IVec2::splat(border);
    let centroid = detection.pose.centroid_pixel() - shift;
    let tip = detection.pose.tip_pixel() - shift;

    // tip region
    let radius = distance(centroid, tip) * corners.tip_region_ratio;
    draw_hollow_circle_mut(&mut canvas, (centroid.x, centroid.y), radius as i32, GREEN);

    for (idx, group) in detection.corner_groups.iter().enumerate() {
        let color = group_color(idx);
        for p in &group.points {
            let p = *p - shift;
            draw_cross_mut(&mut canvas, color, p.x, p.y);
        }
    }

    let n = detection.contour.len();
    for i in 0..n {
        let a = detection.contour[i] - shift;
        let b = detection.contour[(i + 1) % n] - shift;
        draw_line_segment_mut(&mut canvas, to_f32(a), to_f32(b), MAGENTA);
    }

    draw_line_segment_mut(&mut canvas, to_f32(tip), to_f32(centroid), RED);

    if let Some(font) = font {
        let text = pose_caption(&detection.pose);
        draw_text_mut(&mut canvas, GREEN, 20, 25, PxScale::from(24.0), font, &text);
    }
    canvas
}

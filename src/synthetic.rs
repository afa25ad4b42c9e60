//! Synthetic cone silhouettes for regression data and tests.

use glam::DVec2;
use image::{GrayImage, Luma};

fn edge(a: DVec2, b: DVec2, p: DVec2) -> f64 {
    (b - a).perp_dot(p - a)
}

/// Sets every pixel whose centre lies inside or on the triangle `abc`.
pub fn fill_triangle(mask: &mut GrayImage, a: DVec2, b: DVec2, c: DVec2) {
    let (w, h) = mask.dimensions();
    let min = a.min(b).min(c).floor().max(DVec2::ZERO);
    let max = a.max(b).max(c).ceil().min(DVec2::new(w as f64 - 1.0, h as f64 - 1.0));
    if min.x > max.x || min.y > max.y {
        return;
    }
    for y in min.y as u32..=max.y as u32 {
        for x in min.x as u32..=max.x as u32 {
            let p = DVec2::new(x as f64, y as f64);
            let e0 = edge(a, b, p);
            let e1 = edge(b, c, p);
            let e2 = edge(c, a, p);
            let inside = (e0 >= 0.0 && e1 >= 0.0 && e2 >= 0.0) || (e0 <= 0.0 && e1 <= 0.0 && e2 <= 0.0);
            if inside {
                mask.put_pixel(x, y, Luma([255]));
            }
        }
    }
}

/// Top-down cone silhouette as a filled isosceles triangle.
///
/// `apex` is the tip, `base_center` the midpoint of the base edge, and
/// `base_width` the length of the base edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConeSilhouette {
    pub apex: DVec2,
    pub base_center: DVec2,
    pub base_width: f64,
}

impl ConeSilhouette {
    /// Silhouette centred on `center` whose tip points along `heading`
    /// radians, measured clockwise from straight up in the image.
    pub fn from_heading(center: DVec2, length: f64, base_width: f64, heading: f64) -> Self {
        let axis = DVec2::new(heading.sin(), -heading.cos());
        ConeSilhouette {
            apex: center + axis * (length * 2.0 / 3.0),
            base_center: center - axis * (length / 3.0),
            base_width,
        }
    }

    pub fn corners(&self) -> [DVec2; 3] {
        let axis = (self.apex - self.base_center).normalize_or_zero();
        let half = axis.perp() * (self.base_width / 2.0);
        [self.apex, self.base_center + half, self.base_center - half]
    }

    pub fn area(&self) -> f64 {
        (self.apex - self.base_center).length() * self.base_width / 2.0
    }

    pub fn render(&self, width: u32, height: u32) -> GrayImage {
        let mut mask = GrayImage::new(width, height);
        let [a, b, c] = self.corners();
        fill_triangle(&mut mask, a, b, c);
        mask
    }
}

//! Colour segmentation and cleanup producing the binary mask the detector
//! traces contours on.

use image::{GrayImage, Luma, RgbImage};
use imageproc::distance_transform::Norm;
use serde::{Deserialize, Serialize};

/// One HSV band of the cone colour and its share of the merged mask.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HsvRange {
    /// Lower bound, hue in `[0, 180)` as 8-bit OpenCV stores it.
    pub lower: [u8; 3],
    pub upper: [u8; 3],
    /// 1.0 contributes a full 255 for pixels inside the band.
    pub weight: f32,
}

impl HsvRange {
    pub fn new(lower: [u8; 3], upper: [u8; 3], weight: f32) -> HsvRange {
        HsvRange {
            lower,
            upper,
            weight,
        }
    }

    pub fn contains(&self, hsv: [u8; 3]) -> bool {
        (0..3).all(|i| hsv[i] >= self.lower[i] && hsv[i] <= self.upper[i])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessConfig {
    /// Bands whose weighted masks are summed, saturating at 255.
    pub hsv_ranges: Vec<HsvRange>,
    /// Square kernel sizes; even sizes are raised to the next odd size.
    pub mask_erosion: u32,
    pub mask_dilation: u32,
    pub blur_sigma: f32,
    /// Blurred mask values at or above this become foreground.
    pub mask_threshold: u8,
    /// Trace the Canny outline of the mask instead of the mask itself.
    pub use_edges: bool,
    pub canny_low: f32,
    pub canny_high: f32,
    pub contour_dilation: u32,
    pub contour_erosion: u32,
    /// Constant background border added on every side.
    pub border: u32,
}

impl Default for PreprocessConfig {
    fn default() -> Self {
        Self {
            hsv_ranges: vec![
                // middle
                HsvRange::new([8, 150, 130], [30, 255, 255], 1.0),
                // highlight
                HsvRange::new([4, 40, 240], [30, 255, 255], 1.0),
                // low light
                HsvRange::new([3, 255, 104], [31, 255, 255], 1.0),
            ],
            mask_erosion: 11,
            mask_dilation: 11,
            blur_sigma: 1.5,
            mask_threshold: 120,
            use_edges: true,
            canny_low: 50.0,
            canny_high: 150.0,
            contour_dilation: 5,
            contour_erosion: 3,
            border: 1,
        }
    }
}

pub fn ceiling_to_odd(n: u32) -> u32 {
    if n % 2 == 0 { n + 1 } else { n }
}

/// 8-bit HSV with hue halved into `[0, 180)`.
pub fn rgb_to_hsv(rgb: [u8; 3]) -> [u8; 3] {
    let [r, g, b] = rgb.map(|c| c as f32);
    let v = r.max(g).max(b);
    let min = r.min(g).min(b);
    let diff = v - min;

    let s = if v == 0.0 { 0.0 } else { 255.0 * diff / v };
    let mut h = if diff == 0.0 {
        0.0
    } else if v == r {
        60.0 * (g - b) / diff
    } else if v == g {
        120.0 + 60.0 * (b - r) / diff
    } else {
        240.0 + 60.0 * (r - g) / diff
    };
    if h < 0.0 {
        h += 360.0;
    }
    [
        ((h / 2.0).round() as u32 % 180) as u8,
        s.round() as u8,
        v as u8,
    ]
}

/// Weighted sum of the in-range masks of every band, saturated to 255.
pub fn weighted_hsv_mask(frame: &RgbImage, ranges: &[HsvRange]) -> GrayImage {
    GrayImage::from_fn(frame.width(), frame.height(), |x, y| {
        let hsv = rgb_to_hsv(frame.get_pixel(x, y).0);
        let total: f32 = ranges
            .iter()
            .filter(|r| r.contains(hsv))
            .map(|r| r.weight * 255.0)
            .sum();
        Luma([total.round().clamp(0.0, 255.0) as u8])
    })
}

fn square_radius(kernel_size: u32) -> u8 {
    (ceiling_to_odd(kernel_size) / 2).min(u8::MAX as u32) as u8
}

pub fn square_erode(mask: &GrayImage, kernel_size: u32) -> GrayImage {
    match square_radius(kernel_size) {
        0 => mask.clone(),
        k => imageproc::morphology::erode(mask, Norm::LInf, k),
    }
}

pub fn square_dilate(mask: &GrayImage, kernel_size: u32) -> GrayImage {
    match square_radius(kernel_size) {
        0 => mask.clone(),
        k => imageproc::morphology::dilate(mask, Norm::LInf, k),
    }
}

pub fn binarize(image: &GrayImage, threshold: u8) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        Luma([if image.get_pixel(x, y)[0] >= threshold { 255 } else { 0 }])
    })
}

pub fn add_border(image: &GrayImage, border: u32) -> GrayImage {
    if border == 0 {
        return image.clone();
    }
    let mut out = GrayImage::new(image.width() + 2 * border, image.height() + 2 * border);
    image::imageops::replace(&mut out, image, border as i64, border as i64);
    out
}

/// Colour frame to binary cone mask.
pub fn preprocess(frame: &RgbImage, config: &PreprocessConfig) -> GrayImage {
    let mask = weighted_hsv_mask(frame, &config.hsv_ranges);
    let mask = square_erode(&mask, config.mask_erosion);
    let mask = square_dilate(&mask, config.mask_dilation);

    let blurred = if config.blur_sigma > 0.0 {
        imageproc::filter::gaussian_blur_f32(&mask, config.blur_sigma)
    } else {
        mask
    };
    let digitized = binarize(&blurred, config.mask_threshold);

    let shape = if config.use_edges {
        let edges = imageproc::edges::canny(&digitized, config.canny_low, config.canny_high);
        let dilated = square_dilate(&edges, config.contour_dilation);
        square_erode(&dilated, config.contour_erosion)
    } else {
        digitized
    };

    add_border(&shape, config.border)
}

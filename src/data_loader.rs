use std::path::{Path, PathBuf};
use std::time::Instant;

use ab_glyph::FontVec;
use glob::glob;
use image::{GrayImage, ImageReader, RgbImage};
use indicatif::ParallelProgressIterator;
use rayon::prelude::*;

use crate::config::DetectorConfig;
use crate::detector::{ConeDetection, detect_cone_detailed};
use crate::error::{ConeError, Result};
use crate::preprocess::{binarize, preprocess};
use crate::visualization::draw_detection;

/// What the frames in a folder contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum FrameKind {
    /// Camera frames that still need colour segmentation.
    Color,
    /// Ready binary masks; any value of 128 or more is foreground.
    Mask,
}

/// Detection result of one frame of a batch.
#[derive(Debug, Clone)]
pub struct FrameOutput {
    pub index: usize,
    pub path: PathBuf,
    pub detection: Option<ConeDetection>,
    pub preprocess_ms: f64,
    pub detect_ms: f64,
}

fn img_filter(rp: glob::GlobResult) -> Option<PathBuf> {
    if let Ok(p) = rp {
        for ext in &[".png", ".jpg", ".jpeg"] {
            if p.as_os_str().to_string_lossy().to_lowercase().ends_with(ext) {
                return Some(p);
            }
        }
    }
    None
}

/// Image files directly inside `folder`, sorted by path.
pub fn list_frames(folder: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let folder = folder.as_ref();
    if !folder.is_dir() {
        return Err(ConeError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} is not a directory", folder.display()),
        )));
    }
    let pattern = format!("{}/*", folder.display());
    let mut sorted_path: Vec<PathBuf> = glob(&pattern)?.filter_map(img_filter).collect();
    sorted_path.sort();
    log::trace!("{} frames in {}", sorted_path.len(), folder.display());
    Ok(sorted_path)
}

pub fn load_rgb(path: &Path) -> Result<RgbImage> {
    let img = ImageReader::open(path)?
        .decode()
        .map_err(|source| ConeError::Image {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(img.to_rgb8())
}

/// TrueType or OpenType font for the overlay caption.
pub fn load_font(path: impl AsRef<Path>) -> Result<FontVec> {
    let bytes = std::fs::read(path)?;
    Ok(FontVec::try_from_vec(bytes)?)
}

/// Loads a frame and turns it into the binary mask the detector expects.
pub fn load_mask(path: &Path, kind: FrameKind, config: &DetectorConfig) -> Result<(RgbImage, GrayImage)> {
    let rgb = load_rgb(path)?;
    let mask = match kind {
        FrameKind::Color => preprocess(&rgb, &config.preprocess),
        FrameKind::Mask => binarize(&image::DynamicImage::ImageRgb8(rgb.clone()).to_luma8(), 128),
    };
    Ok((rgb, mask))
}

fn process_one(
    index: usize,
    path: &Path,
    kind: FrameKind,
    config: &DetectorConfig,
    overlay_dir: Option<&Path>,
    font: Option<&FontVec>,
) -> FrameOutput {
    let start = Instant::now();
    let loaded = load_mask(path, kind, config);
    let preprocess_ms = start.elapsed().as_secs_f64() * 1e3;

    let (rgb, mask) = match loaded {
        Ok(v) => v,
        Err(e) => {
            log::warn!("skipping {}: {}", path.display(), e);
            return FrameOutput {
                index,
                path: path.to_path_buf(),
                detection: None,
                preprocess_ms,
                detect_ms: 0.0,
            };
        }
    };
    let (w, h) = mask.dimensions();
    let res = config.camera.resolution;
    if w as i32 != res.x || h as i32 != res.y {
        log::warn!(
            "{} is {}x{} but the camera resolution is {}x{}",
            path.display(),
            w,
            h,
            res.x,
            res.y
        );
    }

    let start = Instant::now();
    let detection = detect_cone_detailed(&mask, config);
    let detect_ms = start.elapsed().as_secs_f64() * 1e3;
    log::debug!(
        "frame {}: preprocess {:.3} ms, detect {:.3} ms, found {}",
        index,
        preprocess_ms,
        detect_ms,
        detection.is_some()
    );

    if let Some(dir) = overlay_dir {
        let border = match kind {
            FrameKind::Color => config.preprocess.border as i32,
            FrameKind::Mask => 0,
        };
        let overlay = draw_detection(&rgb, detection.as_ref(), &config.corners, border, font);
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| format!("{:06}", index));
        let out = dir.join(format!("{}_overlay.png", name));
        if let Err(e) = overlay.save(&out) {
            log::warn!("failed to write {}: {}", out.display(), e);
        }
    }

    FrameOutput {
        index,
        path: path.to_path_buf(),
        detection,
        preprocess_ms,
        detect_ms,
    }
}

/// Runs the detector on every frame.
///
/// Frames are independent, so they are processed in parallel; the output is
/// in the order of `paths`.
pub fn process_frames(
    paths: &[PathBuf],
    kind: FrameKind,
    config: &DetectorConfig,
    overlay_dir: Option<&Path>,
    font: Option<&FontVec>,
) -> Vec<FrameOutput> {
    let mut outputs: Vec<FrameOutput> = paths
        .par_iter()
        .enumerate()
        .progress_count(paths.len() as u64)
        .map(|(index, path)| process_one(index, path, kind, config, overlay_dir, font))
        .collect();
    outputs.sort_by_key(|o| o.index);
    outputs
}

use glam::IVec2;
use image::GrayImage;
use serde::{Deserialize, Serialize};

use crate::geometry::{PolygonMoments, distance};
use crate::types::Contour;

/// How one contour is chosen among those that pass the area filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    Biggest,
    Smallest,
    /// Centroid nearest to the image centre.
    #[default]
    MostCentral,
    /// Same choice as `MostCentral`; kept as a separate name for deployments
    /// that configured it. Area does not break ties.
    MostCentralThenSmallest,
}

/// Traces every boundary of the non-zero regions of `mask`.
///
/// Outer borders and hole borders are all returned, without hierarchy and
/// with every boundary pixel kept.
pub fn extract_contours(mask: &GrayImage) -> Vec<Contour> {
    imageproc::contours::find_contours::<i32>(mask)
        .into_iter()
        .map(|c| c.points.iter().map(|p| IVec2::new(p.x, p.y)).collect())
        .filter(|c: &Contour| !c.is_empty())
        .collect()
}

/// Contour with its moments, computed once.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    index: usize,
    area: f64,
    centroid: IVec2,
}

fn candidates(contours: &[Contour], min_area: f64, max_area: f64) -> Vec<Candidate> {
    contours
        .iter()
        .enumerate()
        .filter_map(|(index, contour)| {
            let moments = PolygonMoments::from_contour(contour);
            let area = moments.area();
            if area < min_area || area > max_area {
                return None;
            }
            // zero area has no centroid, whatever the configured bounds
            let centroid = moments.centroid()?;
            Some(Candidate {
                index,
                area,
                centroid,
            })
        })
        .collect()
}

/// Indices of the contours whose area lies in `[min_area, max_area]`.
///
/// Contours enclosing no area are always dropped.
pub fn filter_by_area(contours: &[Contour], min_area: f64, max_area: f64) -> Vec<usize> {
    candidates(contours, min_area, max_area)
        .iter()
        .map(|c| c.index)
        .collect()
}

/// Picks the cone contour.
///
/// Returns an index into `contours`, or `None` when nothing survives the area
/// filter. On ties the contour seen first wins.
pub fn select_cone_contour(
    contours: &[Contour],
    min_area: f64,
    max_area: f64,
    policy: SelectionPolicy,
    resolution: IVec2,
) -> Option<usize> {
    let candidates = candidates(contours, min_area, max_area);
    log::trace!(
        "{} of {} contours within area [{}, {}]",
        candidates.len(),
        contours.len(),
        min_area,
        max_area
    );
    let (first, rest) = candidates.split_first()?;

    let chosen = match policy {
        SelectionPolicy::Biggest => pick_min_by(first, rest, |c| -c.area),
        SelectionPolicy::Smallest => pick_min_by(first, rest, |c| c.area),
        SelectionPolicy::MostCentral | SelectionPolicy::MostCentralThenSmallest => {
            let center = resolution / 2;
            pick_min_by(first, rest, |c| distance(c.centroid, center))
        }
    };
    Some(chosen.index)
}

fn pick_min_by<'a>(
    first: &'a Candidate,
    rest: &'a [Candidate],
    key: impl Fn(&Candidate) -> f64,
) -> &'a Candidate {
    let mut best = first;
    let mut best_key = key(first);
    for c in rest {
        let k = key(c);
        if k < best_key {
            best_key = k;
            best = c;
        }
    }
    best
}

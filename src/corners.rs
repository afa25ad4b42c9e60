//! Corner grouping around the cone tip and tip refinement.
//!
//! The farthest contour point from the centroid is a noisy tip estimate: seen
//! from a shallow angle the tip silhouette is rounded or split into several
//! apparent corners. The contour points near the tip are clustered into
//! corner groups and the number of groups decides how the tip is rebuilt.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::geometry::distance;
use crate::types::CornerGroup;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CornerConfig {
    /// Fraction of the centroid-tip distance beyond which a contour point
    /// belongs to the tip region.
    pub tip_region_ratio: f64,
    /// Maximum gap between index-adjacent tip points of one group.
    pub near_distance: f64,
    /// Gap under which tip points join a group even when not index-adjacent.
    pub close_distance: f64,
    /// Rows by which the highest corner must lead the second highest to be
    /// taken on its own.
    pub dominant_row_gap: i32,
}

impl Default for CornerConfig {
    fn default() -> Self {
        Self {
            tip_region_ratio: 0.85,
            near_distance: 15.0,
            close_distance: 6.0,
            dominant_row_gap: 5,
        }
    }
}

/// Clusters the tip-region points of `contour` into corner groups.
///
/// When the scan starts and ends inside the tip region the first and last
/// groups are one physical corner split by the wrap-around of the closed
/// contour, and are merged.
pub fn group_corners(
    contour: &[IVec2],
    centroid: IVec2,
    rough_tip: IVec2,
    config: &CornerConfig,
) -> Vec<CornerGroup> {
    let mut groups = scan_corner_groups(contour, centroid, rough_tip, config);
    merge_wrapped_groups(&mut groups, contour);
    log::trace!("{} corner groups", groups.len());
    groups
}

/// Single in-order pass over `contour` without the wrap-around merge.
///
/// A point is in the tip region when its distance from `centroid` is at least
/// `tip_region_ratio` times the centroid-tip distance. It joins the current
/// group when it directly follows the group's last point in the contour and
/// lies within `near_distance`, or when it lies within `close_distance` of it
/// regardless of order.
pub fn scan_corner_groups(
    contour: &[IVec2],
    centroid: IVec2,
    rough_tip: IVec2,
    config: &CornerConfig,
) -> Vec<CornerGroup> {
    let threshold = distance(centroid, rough_tip) * config.tip_region_ratio;

    let mut groups: Vec<CornerGroup> = Vec::new();
    for (i, &point) in contour.iter().enumerate() {
        if distance(point, centroid) < threshold {
            continue;
        }

        let Some(previous) = groups.last().and_then(CornerGroup::last) else {
            groups.push(CornerGroup::new(point));
            continue;
        };

        let continuation = i > 0 && contour[i - 1] == previous;
        let gap = distance(point, previous);
        if (continuation && gap < config.near_distance) || gap < config.close_distance {
            if let Some(current) = groups.last_mut() {
                current.points.push(point);
            }
        } else {
            groups.push(CornerGroup::new(point));
        }
    }
    groups
}

/// Appends the last group to the first when the first group starts at the
/// first contour point and the last group ends at the last one.
pub fn merge_wrapped_groups(groups: &mut Vec<CornerGroup>, contour: &[IVec2]) {
    if groups.len() < 2 {
        return;
    }
    let starts_at_front = groups.first().and_then(CornerGroup::first) == contour.first().copied();
    let ends_at_back = groups.last().and_then(CornerGroup::last) == contour.last().copied();
    if starts_at_front && ends_at_back {
        if let Some(tail) = groups.pop() {
            groups[0].points.extend(tail.points);
        }
    }
}

/// Topmost point of each group, in group order.
pub fn topmost_in_each_group(groups: &[CornerGroup]) -> Vec<IVec2> {
    groups.iter().filter_map(CornerGroup::topmost).collect()
}

/// The two highest points among `points`, highest first. On equal rows the
/// earlier point ranks higher.
pub fn two_highest(points: &[IVec2]) -> Option<(IVec2, IVec2)> {
    let mut ranked: Vec<IVec2> = points.to_vec();
    ranked.sort_by_key(|p| p.y);
    match ranked.as_slice() {
        [first, second, ..] => Some((*first, *second)),
        _ => None,
    }
}

/// Rebuilds the tip from the corner groups.
///
/// * fewer than 4 groups: `rough_tip` is kept.
/// * 4 groups: the topmost point of the highest group when it leads the
///   second highest by more than `dominant_row_gap` rows, else the midpoint
///   of both.
/// * 5 groups: the highest of the group averages.
/// * more than 5 groups: the highest row among all tip points, at the mean
///   column of all tip points.
pub fn refine_tip(groups: &[CornerGroup], rough_tip: IVec2, config: &CornerConfig) -> IVec2 {
    match groups.len() {
        0..=3 => rough_tip,
        4 => {
            let tops = topmost_in_each_group(groups);
            let Some((highest, second)) = two_highest(&tops) else {
                return rough_tip;
            };
            if highest.y - second.y < -config.dominant_row_gap {
                highest
            } else {
                (highest + second) / 2
            }
        }
        5 => groups
            .iter()
            .filter_map(CornerGroup::average)
            .reduce(|best, p| if p.y < best.y { p } else { best })
            .unwrap_or(rough_tip),
        _ => {
            let points = groups.iter().flat_map(|g| g.points.iter());
            let (count, sum_x, top_row) = points.fold(
                (0usize, 0.0f64, i32::MAX),
                |(count, sum_x, top_row), p| (count + 1, sum_x + p.x as f64, top_row.min(p.y)),
            );
            if count == 0 {
                return rough_tip;
            }
            IVec2::new((sum_x / count as f64) as i32, top_row)
        }
    }
}

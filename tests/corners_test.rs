use cone_orientation::corners::{
    CornerConfig, group_corners, merge_wrapped_groups, refine_tip, scan_corner_groups,
    two_highest,
};
use cone_orientation::types::CornerGroup;
use glam::IVec2;

const CENTROID: IVec2 = IVec2::new(0, 0);
const ROUGH_TIP: IVec2 = IVec2::new(0, -100);

fn p(x: i32, y: i32) -> IVec2 {
    IVec2::new(x, y)
}

fn groups_of(points: &[&[(i32, i32)]]) -> Vec<CornerGroup> {
    points
        .iter()
        .map(|g| CornerGroup {
            points: g.iter().map(|&(x, y)| p(x, y)).collect(),
        })
        .collect()
}

/// One single-point group per topmost point.
fn tops(points: &[(i32, i32)]) -> Vec<CornerGroup> {
    points
        .iter()
        .map(|&(x, y)| CornerGroup::new(p(x, y)))
        .collect()
}

#[test]
fn test_points_below_threshold_are_ignored() {
    let config = CornerConfig::default();
    let contour = vec![p(0, -10), p(0, -84), p(0, -100), p(0, -20)];
    let groups = scan_corner_groups(&contour, CENTROID, ROUGH_TIP, &config);
    assert_eq!(groups, groups_of(&[&[(0, -100)]]));
}

#[test]
fn test_adjacent_points_join_within_near_distance() {
    let config = CornerConfig::default();
    // gap of about 11.2, adjacent in the contour
    let contour = vec![p(0, -20), p(0, -100), p(10, -95), p(0, -20)];
    let groups = scan_corner_groups(&contour, CENTROID, ROUGH_TIP, &config);
    assert_eq!(groups, groups_of(&[&[(0, -100), (10, -95)]]));

    // same gap across an excluded point starts a new group
    let contour = vec![p(0, -20), p(0, -100), p(0, -10), p(10, -95), p(0, -20)];
    let groups = scan_corner_groups(&contour, CENTROID, ROUGH_TIP, &config);
    assert_eq!(groups, groups_of(&[&[(0, -100)], &[(10, -95)]]));
}

#[test]
fn test_close_points_join_across_excluded_points() {
    let config = CornerConfig::default();
    let contour = vec![p(0, -100), p(0, -10), p(3, -99)];
    let groups = scan_corner_groups(&contour, CENTROID, ROUGH_TIP, &config);
    assert_eq!(groups, groups_of(&[&[(0, -100), (3, -99)]]));

    let contour = vec![p(0, -100), p(0, -10), p(10, -96)];
    let groups = scan_corner_groups(&contour, CENTROID, ROUGH_TIP, &config);
    assert_eq!(groups.len(), 2);
}

#[test]
fn test_wrap_around_groups_are_merged() {
    let config = CornerConfig::default();
    let contour = vec![
        p(0, -100),
        p(1, -99),
        p(0, -40),
        p(60, -80),
        p(0, -40),
        p(-1, -99),
    ];

    let scanned = scan_corner_groups(&contour, CENTROID, ROUGH_TIP, &config);
    assert_eq!(scanned.len(), 3);

    let groups = group_corners(&contour, CENTROID, ROUGH_TIP, &config);
    assert_eq!(
        groups,
        groups_of(&[&[(0, -100), (1, -99), (-1, -99)], &[(60, -80)]])
    );
}

#[test]
fn test_no_merge_when_scan_does_not_wrap() {
    let contour = vec![p(0, -40), p(0, -100), p(0, -40), p(60, -80)];
    let mut groups = groups_of(&[&[(0, -100)], &[(60, -80)]]);
    merge_wrapped_groups(&mut groups, &contour);
    assert_eq!(groups.len(), 2);

    let mut single = groups_of(&[&[(0, -40)]]);
    merge_wrapped_groups(&mut single, &contour);
    assert_eq!(single.len(), 1);
}

#[test]
fn test_two_highest_is_stable() {
    let points = vec![p(90, 50), p(0, 10), p(100, 50), p(10, 10)];
    assert_eq!(two_highest(&points), Some((p(0, 10), p(10, 10))));
    assert_eq!(two_highest(&[p(1, 1)]), None);
}

#[test]
fn test_refine_fewer_than_four_groups_keeps_rough_tip() {
    let config = CornerConfig::default();
    assert_eq!(refine_tip(&[], ROUGH_TIP, &config), ROUGH_TIP);
    let groups = tops(&[(0, 1), (5, 2), (9, 3)]);
    assert_eq!(refine_tip(&groups, ROUGH_TIP, &config), ROUGH_TIP);
}

#[test]
fn test_refine_four_groups() {
    let config = CornerConfig::default();

    // two corners level with each other: midpoint
    let groups = tops(&[(0, 10), (10, 10), (90, 50), (100, 50)]);
    assert_eq!(refine_tip(&groups, ROUGH_TIP, &config), p(5, 10));

    // one corner clearly above the rest
    let groups = tops(&[(0, 2), (10, 10), (90, 50), (100, 50)]);
    assert_eq!(refine_tip(&groups, ROUGH_TIP, &config), p(0, 2));

    // a lead of exactly the gap is not enough
    let groups = tops(&[(0, 5), (10, 10), (90, 50), (100, 50)]);
    assert_eq!(refine_tip(&groups, ROUGH_TIP, &config), p(5, 7));
}

#[test]
fn test_refine_four_groups_uses_topmost_point_of_each_group() {
    let config = CornerConfig::default();
    let groups = groups_of(&[
        &[(0, 30), (2, 1), (4, 30)],
        &[(10, 20)],
        &[(90, 50)],
        &[(100, 50)],
    ]);
    assert_eq!(refine_tip(&groups, ROUGH_TIP, &config), p(2, 1));
}

#[test]
fn test_refine_five_groups() {
    let config = CornerConfig::default();
    let groups = groups_of(&[
        &[(10, 20), (12, 22)],
        &[(10, 12), (12, 14)],
        &[(30, 40)],
        &[(40, 50)],
        &[(0, 13)],
    ]);
    assert_eq!(refine_tip(&groups, ROUGH_TIP, &config), p(11, 13));
}

#[test]
fn test_refine_many_groups() {
    let config = CornerConfig::default();
    let groups = tops(&[(20, 5), (22, 9), (18, 30), (24, 40), (20, 50), (22, 60)]);
    assert_eq!(refine_tip(&groups, ROUGH_TIP, &config), p(21, 5));
}

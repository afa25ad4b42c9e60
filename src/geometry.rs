//! Pixel-space geometry shared by contour selection and corner grouping.
//!
//! Contour moments follow the polygon (Green's theorem) formulation, so the
//! area and centroid of a traced boundary do not depend on where the tracing
//! started.

use glam::IVec2;

/// Euclidean distance between two pixels.
///
/// Coordinates are widened to `i64` before subtracting, so any pair of
/// pixels gives a finite distance.
pub fn distance(a: IVec2, b: IVec2) -> f64 {
    let dx = (a.x as i64 - b.x as i64) as f64;
    let dy = (a.y as i64 - b.y as i64) as f64;
    (dx * dx + dy * dy).sqrt()
}

/// Returns the point of `points` farthest from `base`.
///
/// The first point wins on ties. `None` for an empty slice.
pub fn farthest_point(points: &[IVec2], base: IVec2) -> Option<IVec2> {
    let (first, rest) = points.split_first()?;
    let mut farthest = *first;
    let mut farthest_distance = distance(base, *first);
    for p in rest {
        let d = distance(base, *p);
        if d > farthest_distance {
            farthest_distance = d;
            farthest = *p;
        }
    }
    Some(farthest)
}

/// Mean of a group of pixels, truncated toward zero.
pub fn average_point(points: &[IVec2]) -> Option<IVec2> {
    if points.is_empty() {
        return None;
    }
    let (sum_x, sum_y) = points.iter().fold((0.0f64, 0.0f64), |(sx, sy), p| {
        (sx + p.x as f64, sy + p.y as f64)
    });
    let n = points.len() as f64;
    Some(IVec2::new((sum_x / n) as i32, (sum_y / n) as i32))
}

/// Spatial moments of a closed polygon up to first order, kept as the exact
/// integer sums `2 * m00`, `6 * m10` and `6 * m01`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PolygonMoments {
    twice_m00: i64,
    six_m10: i64,
    six_m01: i64,
}

impl PolygonMoments {
    pub fn from_contour(contour: &[IVec2]) -> PolygonMoments {
        let n = contour.len();
        if n < 3 {
            return PolygonMoments::default();
        }
        let mut moments = PolygonMoments::default();
        for i in 0..n {
            let p = contour[i].as_i64vec2();
            let q = contour[(i + 1) % n].as_i64vec2();
            let cross = p.x * q.y - q.x * p.y;
            moments.twice_m00 += cross;
            moments.six_m10 += (p.x + q.x) * cross;
            moments.six_m01 += (p.y + q.y) * cross;
        }
        moments
    }

    /// Signed area, positive for counter-clockwise winding in a y-up frame.
    pub fn m00(&self) -> f64 {
        self.twice_m00 as f64 / 2.0
    }

    pub fn m10(&self) -> f64 {
        self.six_m10 as f64 / 6.0
    }

    pub fn m01(&self) -> f64 {
        self.six_m01 as f64 / 6.0
    }

    /// Unsigned enclosed area.
    pub fn area(&self) -> f64 {
        self.m00().abs()
    }

    /// `(m10 / m00, m01 / m00)` truncated to integer pixels, `None` when the
    /// polygon encloses no area.
    pub fn centroid(&self) -> Option<IVec2> {
        if self.twice_m00 == 0 {
            return None;
        }
        let denom = (3 * self.twice_m00) as f64;
        Some(IVec2::new(
            (self.six_m10 as f64 / denom) as i32,
            (self.six_m01 as f64 / denom) as i32,
        ))
    }
}

/// Shoelace area of a closed contour.
pub fn contour_area(contour: &[IVec2]) -> f64 {
    PolygonMoments::from_contour(contour).area()
}

/// Moment-based centroid of a closed contour.
pub fn contour_centroid(contour: &[IVec2]) -> Option<IVec2> {
    PolygonMoments::from_contour(contour).centroid()
}

use glam::{DVec2, IVec2};
use serde::{Deserialize, Serialize};

/// Closed boundary of a connected region, in tracing order.
pub type Contour = Vec<IVec2>;

/// Contiguous run of tip-region contour points approximating one apparent
/// corner of the cone silhouette.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CornerGroup {
    pub points: Vec<IVec2>,
}

impl CornerGroup {
    pub fn new(first: IVec2) -> CornerGroup {
        CornerGroup {
            points: vec![first],
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first(&self) -> Option<IVec2> {
        self.points.first().copied()
    }

    pub fn last(&self) -> Option<IVec2> {
        self.points.last().copied()
    }

    /// Point with the smallest row (highest on screen). First one wins on ties.
    pub fn topmost(&self) -> Option<IVec2> {
        let (first, rest) = self.points.split_first()?;
        Some(rest.iter().fold(*first, |best, p| if p.y < best.y { *p } else { best }))
    }

    pub fn average(&self) -> Option<IVec2> {
        crate::geometry::average_point(&self.points)
    }
}

/// Cone position and heading for one frame.
///
/// Ground positions are `(lateral, forward)` offsets from the robot centre in
/// the units of the camera offset; `x` is positive to the right and `y` in
/// front of the robot. `angle` is in radians, 0 when the tip points straight
/// away from the robot and positive when the tip is right of the centroid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObjectPose {
    centroid_position: DVec2,
    tip_position: DVec2,
    centroid_pixel: IVec2,
    tip_pixel: IVec2,
    angle: f64,
}

impl ObjectPose {
    pub fn new(
        centroid_position: DVec2,
        tip_position: DVec2,
        centroid_pixel: IVec2,
        tip_pixel: IVec2,
        angle: f64,
    ) -> ObjectPose {
        ObjectPose {
            centroid_position,
            tip_position,
            centroid_pixel,
            tip_pixel,
            angle,
        }
    }

    pub fn centroid_position(&self) -> DVec2 {
        self.centroid_position
    }

    pub fn tip_position(&self) -> DVec2 {
        self.tip_position
    }

    pub fn centroid_pixel(&self) -> IVec2 {
        self.centroid_pixel
    }

    pub fn tip_pixel(&self) -> IVec2 {
        self.tip_pixel
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    pub fn angle_degrees(&self) -> f64 {
        self.angle.to_degrees()
    }

    /// Ground point on the centroid-tip segment, see [`crate::heading::cone_midpoint`].
    pub fn midpoint(&self, proximity_to_base: f64) -> DVec2 {
        crate::heading::cone_midpoint(self.centroid_position, self.tip_position, proximity_to_base)
    }
}

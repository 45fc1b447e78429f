use crate::math::{Point, Real};
use crate::query::{PointProjection, PointQuery};
use crate::shape::VolumeGrid;

impl PointQuery for VolumeGrid {
    /// Projects `pt` on the zero level set by a single step along the distance gradient.
    ///
    /// This is exact for true signed distance fields and an approximation otherwise.
    fn project_local_point(&self, pt: &Point<Real>, solid: bool) -> PointProjection {
        let dist = self.signed_distance(pt);
        let inside = dist <= 0.0;

        if inside && solid {
            return PointProjection::new(true, *pt);
        }

        let grad = self.distance_gradient(pt);
        let proj = match grad.try_normalize(crate::math::DEFAULT_EPSILON) {
            Some(dir) => pt - dir * dist,
            None => *pt,
        };

        PointProjection::new(inside, proj)
    }

    fn distance_to_local_point(&self, pt: &Point<Real>, solid: bool) -> Real {
        let dist = self.signed_distance(pt);
        if solid {
            dist.max(0.0)
        } else {
            dist
        }
    }
}

use crate::math::{Point, Real};
use crate::query::{PointProjection, PointQuery};
use crate::shape::Segment;

impl PointQuery for Segment {
    #[inline]
    fn project_local_point(&self, pt: &Point<Real>, _: bool) -> PointProjection {
        let (proj, _) = self.project_local_point_and_get_location(pt);
        PointProjection::new(proj == *pt, proj)
    }
}

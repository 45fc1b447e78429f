use crate::math::Real;
use super::ray_aabb::ray_aabb_interval;
use crate::query::{Ray, RayCast};
use crate::shape::VolumeGrid;

const BISECTION_STEPS: usize = 40;

impl RayCast for VolumeGrid {
    /// Marches the ray through the grid box until the interpolated field becomes non-positive,
    /// then refines the crossing by bisection.
    ///
    /// The marching step is half the smallest cell size, so level-set features thinner than
    /// that may be missed.
    fn cast_local_ray(&self, ray: &Ray, max_time_of_impact: Real, solid: bool) -> Option<Real> {
        if self.is_empty() || ray.dir.norm_squared() == 0.0 {
            return None;
        }

        let field = |t: Real| self.signed_distance(&ray.point_at(t));
        let inside_at_start = field(0.0) <= 0.0;

        if inside_at_start && solid {
            return Some(0.0);
        }

        let (entry, exit) = ray_aabb_interval(self.bbox(), ray)?;
        if entry > max_time_of_impact {
            return None;
        }

        if !inside_at_start && field(entry) <= 0.0 {
            return Some(entry);
        }

        let exit = exit.min(max_time_of_impact);
        let h = self.cell_size();
        let step = 0.5 * h.x.min(h.y).min(h.z).max(Real::EPSILON) / ray.dir.norm();
        let crossed = |t: Real| (field(t) <= 0.0) != inside_at_start;

        let mut prev = entry;
        let mut t = entry;

        while t < exit {
            t = (t + step).min(exit);

            if crossed(t) {
                let mut lo = prev;
                let mut hi = t;
                for _ in 0..BISECTION_STEPS {
                    let mid = (lo + hi) * 0.5;
                    if crossed(mid) {
                        hi = mid;
                    } else {
                        lo = mid;
                    }
                }

                return Some(hi);
            }

            prev = t;
        }

        None
    }
}

#[cfg(test)]
mod test {
    use crate::bounding_volume::Aabb;
    use crate::math::{Point, Real, Vector};
    use crate::query::{Ray, RayCast};
    use crate::shape::VolumeGrid;

    // Signed distance field of a ball of radius 1 centered at the origin.
    fn ball_grid() -> VolumeGrid {
        let bbox = Aabb::new(Point::new(-2.0, -2.0, -2.0), Point::new(2.0, 2.0, 2.0));
        let mut grid = VolumeGrid::new(bbox, [40, 40, 40]);
        for i in 0..40 {
            for j in 0..40 {
                for k in 0..40 {
                    let c = grid.cell_center(i, j, k);
                    grid.set(i, j, k, c.coords.norm() - 1.0).unwrap();
                }
            }
        }
        grid
    }

    #[test]
    fn ray_hits_grid_level_set() {
        let grid = ball_grid();
        let ray = Ray::new(Point::new(-5.0, 0.0, 0.0), Vector::x());
        let toi = grid.cast_local_ray(&ray, Real::MAX, true).unwrap();
        assert_relative_eq!(toi, 4.0, epsilon = 0.05);

        let inside = Ray::new(Point::origin(), Vector::x());
        assert_eq!(grid.cast_local_ray(&inside, Real::MAX, true), Some(0.0));

        let miss = Ray::new(Point::new(-5.0, 1.8, 0.0), Vector::x());
        assert!(grid.cast_local_ray(&miss, Real::MAX, true).is_none());
    }
}

use std::mem;

use crate::bounding_volume::Aabb;
use crate::math::{Real, DIM};
use crate::query::{Ray, RayCast};
use num::Zero;

/// The parameter interval `[tmin, tmax]` (with `tmin >= 0`) during which `ray` is inside `aabb`.
pub(crate) fn ray_aabb_interval(aabb: &Aabb, ray: &Ray) -> Option<(Real, Real)> {
    let mut tmin: Real = 0.0;
    let mut tmax: Real = Real::MAX;

    for i in 0usize..DIM {
        if ray.dir[i].is_zero() {
            if ray.origin[i] < aabb.mins[i] || ray.origin[i] > aabb.maxs[i] {
                return None;
            }
        } else {
            let denom = 1.0 / ray.dir[i];
            let mut inter_with_near_halfspace = (aabb.mins[i] - ray.origin[i]) * denom;
            let mut inter_with_far_halfspace = (aabb.maxs[i] - ray.origin[i]) * denom;

            if inter_with_near_halfspace > inter_with_far_halfspace {
                mem::swap(
                    &mut inter_with_near_halfspace,
                    &mut inter_with_far_halfspace,
                )
            }

            tmin = tmin.max(inter_with_near_halfspace);
            tmax = tmax.min(inter_with_far_halfspace);

            if tmin > tmax {
                // This covers the case where tmax is negative because tmin is
                // initialized at zero.
                return None;
            }
        }
    }

    Some((tmin, tmax))
}

impl RayCast for Aabb {
    fn cast_local_ray(&self, ray: &Ray, max_time_of_impact: Real, solid: bool) -> Option<Real> {
        let (tmin, tmax) = ray_aabb_interval(self, ray)?;
        let toi = if tmin.is_zero() && !solid { tmax } else { tmin };
        (toi <= max_time_of_impact).then_some(toi)
    }
}

#[cfg(test)]
mod test {
    use crate::bounding_volume::Aabb;
    use crate::math::{Point, Real, Vector};
    use crate::query::{Ray, RayCast};

    #[test]
    fn ray_aabb_hits_and_misses() {
        let aabb = Aabb::new(Point::new(-1.0, -1.0, -1.0), Point::new(1.0, 1.0, 1.0));
        let ray = Ray::new(Point::new(-5.0, 0.5, 0.0), Vector::x());
        assert_eq!(aabb.cast_local_ray(&ray, Real::MAX, true), Some(4.0));
        assert_eq!(aabb.cast_local_ray(&ray, 3.0, true), None);

        let miss = Ray::new(Point::new(-5.0, 1.5, 0.0), Vector::x());
        assert_eq!(aabb.cast_local_ray(&miss, Real::MAX, true), None);

        let inside = Ray::new(Point::origin(), Vector::y());
        assert_eq!(aabb.cast_local_ray(&inside, Real::MAX, true), Some(0.0));
        assert_eq!(aabb.cast_local_ray(&inside, Real::MAX, false), Some(1.0));
    }
}

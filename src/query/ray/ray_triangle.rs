use crate::math::{Point, Real, Vector};
use crate::query::{Ray, RayCast};
use crate::shape::Triangle;

impl RayCast for Triangle {
    #[inline]
    fn cast_local_ray(&self, ray: &Ray, max_time_of_impact: Real, _: bool) -> Option<Real> {
        let (toi, _) = local_ray_intersection_with_triangle(&self.a, &self.b, &self.c, ray)?;
        (toi <= max_time_of_impact).then_some(toi)
    }
}

/// Computes the intersection between a triangle and a ray.
///
/// If an intersection is found, the time of impact and the barycentric coordinates of the
/// intersection point are returned.
pub fn local_ray_intersection_with_triangle(
    a: &Point<Real>,
    b: &Point<Real>,
    c: &Point<Real>,
    ray: &Ray,
) -> Option<(Real, Vector<Real>)> {
    let ab = *b - *a;
    let ac = *c - *a;

    // normal
    let n = ab.cross(&ac);
    let d = n.dot(&ray.dir);

    // the normal and the ray direction are parallel
    if d == 0.0 {
        return None;
    }

    let ap = ray.origin - *a;
    let t = ap.dot(&n);

    // the ray does not intersect the halfspace defined by the triangle
    if (t < 0.0 && d < 0.0) || (t > 0.0 && d > 0.0) {
        return None;
    }

    let d = d.abs();

    //
    // intersection: compute barycentric coordinates
    //
    let e = -ray.dir.cross(&ap);

    let mut v;
    let mut w;
    let toi;

    if t < 0.0 {
        v = -ac.dot(&e);

        if v < 0.0 || v > d {
            return None;
        }

        w = ab.dot(&e);

        if w < 0.0 || v + w > d {
            return None;
        }

        let invd = 1.0 / d;
        toi = -t * invd;
        v *= invd;
        w *= invd;
    } else {
        v = ac.dot(&e);

        if v < 0.0 || v > d {
            return None;
        }

        w = -ab.dot(&e);

        if w < 0.0 || v + w > d {
            return None;
        }

        let invd = 1.0 / d;
        toi = t * invd;
        v *= invd;
        w *= invd;
    }

    Some((toi, Vector::new(-v - w + 1.0, v, w)))
}

#[cfg(test)]
mod test {
    use crate::math::{Point, Real, Vector};
    use crate::query::{Ray, RayCast};
    use crate::shape::Triangle;

    #[test]
    fn ray_triangle_from_both_sides() {
        let tri = Triangle::new(
            Point::new(0.0, 0.0, 0.0),
            Point::new(1.0, 0.0, 0.0),
            Point::new(0.0, 1.0, 0.0),
        );

        let above = Ray::new(Point::new(0.25, 0.25, 2.0), -Vector::z());
        assert_relative_eq!(tri.cast_local_ray(&above, Real::MAX, true).unwrap(), 2.0);

        let below = Ray::new(Point::new(0.25, 0.25, -3.0), Vector::z());
        assert_relative_eq!(tri.cast_local_ray(&below, Real::MAX, true).unwrap(), 3.0);

        let outside = Ray::new(Point::new(0.75, 0.75, 2.0), -Vector::z());
        assert!(tri.cast_local_ray(&outside, Real::MAX, true).is_none());
    }
}

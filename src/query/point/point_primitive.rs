use crate::bounding_volume::Aabb;
use crate::math::{Point, Real, Vector};
use crate::query::{PointProjection, PointQuery};
use crate::shape::{Primitive, Segment};

impl PointQuery for Primitive {
    fn project_local_point(&self, pt: &Point<Real>, solid: bool) -> PointProjection {
        match self {
            Primitive::Point(p) => PointProjection::new(p == pt, *p),
            Primitive::Segment { a, b } => Segment::new(*a, *b).project_local_point(pt, solid),
            Primitive::Sphere { center, radius } => {
                let dir = pt - center;
                let dist = dir.norm();
                let inside = dist <= *radius;

                if inside && solid {
                    PointProjection::new(true, *pt)
                } else if dist > 0.0 {
                    PointProjection::new(inside, center + dir * (*radius / dist))
                } else {
                    // Any boundary point is a valid projection of the center.
                    PointProjection::new(true, center + Vector::x() * *radius)
                }
            }
            Primitive::Aabb { mins, maxs } => {
                let (proj, inside) = Aabb::new(*mins, *maxs).project_local_point(pt);
                if inside && solid {
                    PointProjection::new(true, *pt)
                } else {
                    PointProjection::new(inside, proj)
                }
            }
        }
    }
}

#[cfg(test)]
mod test {
    use crate::math::{Point, Real};
    use crate::query::PointQuery;
    use crate::shape::Primitive;

    #[test]
    fn point_to_sphere_distance_is_exact() {
        let sphere = Primitive::sphere(Point::new(1.0, 2.0, 3.0), 0.5);
        let mut rng = oorandom::Rand64::new(1234);

        for _ in 0..100 {
            let pt = Point::new(
                rng.rand_float() * 10.0 - 5.0,
                rng.rand_float() * 10.0 - 5.0,
                rng.rand_float() * 10.0 - 5.0,
            );
            let expected = na::distance(&pt, &Point::new(1.0, 2.0, 3.0)) - 0.5;
            assert_relative_eq!(sphere.distance_to_local_point(&pt, false), expected, epsilon = 1.0e-12);
        }
    }

    #[test]
    fn point_inside_aabb_has_negative_distance() {
        let aabb = Primitive::aabb(Point::new(-1.0, -1.0, -1.0), Point::new(1.0, 1.0, 1.0));
        let d: Real = aabb.distance_to_local_point(&Point::new(0.5, 0.0, 0.0), false);
        assert_relative_eq!(d, -0.5);
        assert!(aabb.contains_local_point(&Point::new(0.5, 0.0, 0.0)));
        assert_relative_eq!(aabb.distance_to_local_point(&Point::new(3.0, 0.0, 0.0), false), 2.0);
    }
}

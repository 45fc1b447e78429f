//! Distance between primitives, and between a triangle and a primitive.

use crate::math::{Isometry, Point, Real};
use crate::query::distance::distance_point::{primitive_point, segment_point, triangle_point};
use crate::query::distance::distance_support_map::{
    penetration, segment_segment_closest_points, segment_triangle_intersection,
    support_map_support_map, touching_at, PolytopeFeatures,
};
use crate::query::proximity::Proximity;
use crate::shape::{Primitive, Segment, SupportMap, Triangle};

/// The lower-dimensional core of a primitive that is a core swept by a ball.
#[derive(Copy, Clone, Debug)]
pub(crate) enum RoundCore {
    Point(Point<Real>),
    Segment(Segment),
}

impl RoundCore {
    /// The core and radius of `prim`, or `None` for boxes.
    pub fn of(prim: &Primitive) -> Option<(RoundCore, Real)> {
        match prim {
            Primitive::Point(p) => Some((RoundCore::Point(*p), 0.0)),
            Primitive::Sphere { center, radius } => Some((RoundCore::Point(*center), *radius)),
            Primitive::Segment { a, b } => Some((RoundCore::Segment(Segment::new(*a, *b)), 0.0)),
            Primitive::Aabb { .. } => None,
        }
    }

    pub fn transformed(&self, pos: &Isometry<Real>) -> Self {
        match self {
            RoundCore::Point(p) => RoundCore::Point(pos * p),
            RoundCore::Segment(s) => RoundCore::Segment(s.transformed(pos)),
        }
    }

    /// Closest points between two cores expressed in the same frame.
    pub fn closest_points(&self, other: &Self) -> Proximity {
        match (self, other) {
            (RoundCore::Point(p1), RoundCore::Point(p2)) => Proximity::between_points(*p1, *p2),
            (RoundCore::Segment(s1), RoundCore::Point(p2)) => {
                Proximity::between_points(segment_point(s1, p2).point1, *p2)
            }
            (RoundCore::Point(p1), RoundCore::Segment(s2)) => {
                Proximity::between_points(*p1, segment_point(s2, p1).point1)
            }
            (RoundCore::Segment(s1), RoundCore::Segment(s2)) => {
                let (p1, p2) = segment_segment_closest_points(s1, s2);
                Proximity::between_points(p1, p2)
            }
        }
    }
}

fn below(prox: Proximity, max_dist: Real) -> Option<Proximity> {
    (prox.dist < max_dist).then_some(prox)
}

/// Signed distance between two solid convex shapes.
///
/// On intersection, the penetration is measured along the best candidate axis built from
/// the features of both shapes (`features2` being already expressed in the frame of `g1`).
pub(crate) fn convex_convex<G1, G2>(
    g1: &G1,
    g2: &G2,
    pos12: &Isometry<Real>,
    max_dist: Real,
    features1: PolytopeFeatures,
    features2: PolytopeFeatures,
    fallback: Point<Real>,
) -> Option<Proximity>
where
    G1: SupportMap,
    G2: SupportMap,
{
    support_map_support_map(g1, g2, pos12, max_dist, || {
        let axes = features1.separating_axes(&features2);
        penetration(g1, g2, pos12, &axes).unwrap_or_else(|| touching_at(fallback))
    })
}

/// Signed distance between two primitives, `prim2` being placed by `pos12` in the frame of
/// `prim1`.
pub(crate) fn primitive_primitive(
    prim1: &Primitive,
    prim2: &Primitive,
    pos12: &Isometry<Real>,
    max_dist: Real,
) -> Option<Proximity> {
    match (RoundCore::of(prim1), RoundCore::of(prim2)) {
        (Some((core1, r1)), Some((core2, r2))) => {
            let prox = core1.closest_points(&core2.transformed(pos12));
            below(prox.padded(r1, r2), max_dist)
        }
        (None, Some((RoundCore::Point(c2), r2))) => {
            below(primitive_point(prim1, &(pos12 * c2)).padded(0.0, r2), max_dist)
        }
        (Some((RoundCore::Point(c1), r1)), None) => {
            let prox = primitive_point(prim2, &pos12.inverse_transform_point(&c1))
                .flipped()
                .transform_by(pos12);
            below(prox.padded(r1, 0.0), max_dist)
        }
        _ => convex_convex(
            prim1,
            prim2,
            pos12,
            max_dist,
            PolytopeFeatures::of_primitive(prim1),
            PolytopeFeatures::of_primitive(prim2).transformed(pos12),
            pos12 * prim2.local_aabb().center(),
        ),
    }
}

/// Distance between a triangle (first object) and a primitive placed by `pos12` in the frame
/// of the triangle.
///
/// The triangle is a surface: a primitive crossing it is at distance zero unless it is
/// solid, in which case the penetration depth is reported.
pub(crate) fn triangle_primitive(
    tri: &Triangle,
    prim: &Primitive,
    pos12: &Isometry<Real>,
    max_dist: Real,
) -> Option<Proximity> {
    match RoundCore::of(prim) {
        Some((RoundCore::Point(c), r)) => below(triangle_point(tri, &(pos12 * c)).padded(0.0, r), max_dist),
        Some((RoundCore::Segment(seg), _)) => {
            let seg = seg.transformed(pos12);
            support_map_support_map(tri, &seg, &Isometry::identity(), max_dist, || {
                let pt = segment_triangle_intersection(&seg, tri)
                    .unwrap_or_else(|| triangle_point(tri, &seg.a).point1);
                touching_at(pt)
            })
        }
        None => convex_convex(
            tri,
            prim,
            pos12,
            max_dist,
            PolytopeFeatures::of_triangle(tri),
            PolytopeFeatures::of_primitive(prim).transformed(pos12),
            tri.center(),
        ),
    }
}

#[cfg(test)]
mod test {
    use super::{primitive_primitive, triangle_primitive};
    use crate::math::{Isometry, Point, Real, Vector};
    use crate::shape::{Primitive, Triangle};

    #[test]
    fn sphere_sphere_is_exact() {
        let s = Primitive::sphere(Point::origin(), 1.0);
        let pos12 = Isometry::translation(3.0, 0.0, 0.0);
        let prox = primitive_primitive(&s, &s, &pos12, Real::MAX).unwrap();
        assert_relative_eq!(prox.dist, 1.0);
        assert_relative_eq!(prox.point1, Point::new(1.0, 0.0, 0.0));
        assert_relative_eq!(prox.point2, Point::new(2.0, 0.0, 0.0));

        let pos12 = Isometry::translation(1.5, 0.0, 0.0);
        let prox = primitive_primitive(&s, &s, &pos12, Real::MAX).unwrap();
        assert_relative_eq!(prox.dist, -0.5);
        assert!(primitive_primitive(&s, &s, &Isometry::translation(3.0, 0.0, 0.0), 0.5).is_none());
    }

    #[test]
    fn overlapping_boxes_report_penetration() {
        let b = Primitive::aabb(Point::new(-1.0, -1.0, -1.0), Point::new(1.0, 1.0, 1.0));
        let pos12 = Isometry::translation(1.5, 0.2, 0.0);
        let prox = primitive_primitive(&b, &b, &pos12, Real::MAX).unwrap();
        assert_relative_eq!(prox.dist, -0.5, epsilon = 1.0e-9);
        assert_relative_eq!(prox.normal, Vector::x(), epsilon = 1.0e-9);
    }

    #[test]
    fn sphere_inside_box() {
        let b = Primitive::aabb(Point::new(-1.0, -1.0, -1.0), Point::new(1.0, 1.0, 1.0));
        let s = Primitive::sphere(Point::origin(), 0.5);
        let pos12 = Isometry::translation(0.0, 0.0, 0.25);
        let prox = primitive_primitive(&b, &s, &pos12, Real::MAX).unwrap();
        assert_relative_eq!(prox.dist, -1.25, epsilon = 1.0e-12);

        let flipped = primitive_primitive(&s, &b, &pos12.inverse(), Real::MAX).unwrap();
        assert_relative_eq!(flipped.dist, -1.25, epsilon = 1.0e-12);
        assert_relative_eq!(flipped.normal, -prox.normal, epsilon = 1.0e-12);
    }

    #[test]
    fn segment_through_a_triangle_touches_it() {
        let tri = Triangle::new(
            Point::new(-1.0, -1.0, 0.0),
            Point::new(1.0, -1.0, 0.0),
            Point::new(0.0, 1.0, 0.0),
        );
        let seg = Primitive::segment(Point::new(0.0, 0.0, -1.0), Point::new(0.0, 0.0, 1.0));
        let prox = triangle_primitive(&tri, &seg, &Isometry::identity(), Real::MAX).unwrap();
        assert_relative_eq!(prox.dist, 0.0, epsilon = 1.0e-9);
        assert_relative_eq!(prox.point1, Point::origin(), epsilon = 1.0e-6);

        let ball = Primitive::sphere(Point::new(0.0, 0.0, 2.0), 0.5);
        let prox = triangle_primitive(&tri, &ball, &Isometry::identity(), Real::MAX).unwrap();
        assert_relative_eq!(prox.dist, 1.5, epsilon = 1.0e-12);
    }
}

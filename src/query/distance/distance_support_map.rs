//! Distance between convex shapes described by support maps.

use smallvec::SmallVec;

use crate::math::{Isometry, Point, Real, UnitVector, Vector, DEFAULT_EPSILON};
use crate::query::gjk::{self, GJKResult, VoronoiSimplex};
use crate::query::proximity::Proximity;
use crate::query::sat;
use crate::query::{local_ray_intersection_with_triangle, Ray};
use crate::shape::{Primitive, Segment, SupportMap, Triangle};

/// Candidate separating axes of a pair of convex polytopes.
pub(crate) type SeparatingAxes = SmallVec<[Vector<Real>; 24]>;

/// The face normals and edge directions of a convex polytope, used to build separating axes.
#[derive(Default)]
pub(crate) struct PolytopeFeatures {
    pub face_normals: SmallVec<[Vector<Real>; 3]>,
    pub edge_dirs: SmallVec<[Vector<Real>; 3]>,
}

impl PolytopeFeatures {
    pub fn of_triangle(tri: &Triangle) -> Self {
        PolytopeFeatures {
            face_normals: [tri.scaled_normal()].into_iter().collect(),
            edge_dirs: [tri.b - tri.a, tri.c - tri.b, tri.a - tri.c].into_iter().collect(),
        }
    }

    pub fn of_segment(seg: &Segment) -> Self {
        PolytopeFeatures {
            face_normals: SmallVec::new(),
            edge_dirs: [seg.scaled_direction()].into_iter().collect(),
        }
    }

    /// The features of a box primitive. Point-like and round primitives have none.
    pub fn of_primitive(prim: &Primitive) -> Self {
        match prim {
            Primitive::Aabb { .. } => PolytopeFeatures {
                face_normals: [Vector::x(), Vector::y(), Vector::z()].into_iter().collect(),
                edge_dirs: [Vector::x(), Vector::y(), Vector::z()].into_iter().collect(),
            },
            Primitive::Segment { a, b } => Self::of_segment(&Segment::new(*a, *b)),
            _ => PolytopeFeatures::default(),
        }
    }

    pub fn transformed(mut self, pos: &Isometry<Real>) -> Self {
        self.face_normals.iter_mut().for_each(|n| *n = pos * *n);
        self.edge_dirs.iter_mut().for_each(|e| *e = pos * *e);
        self
    }

    /// The candidate separating axes between `self` and `other`, both in the same frame.
    pub fn separating_axes(&self, other: &Self) -> SeparatingAxes {
        let mut axes: SeparatingAxes = self
            .face_normals
            .iter()
            .chain(other.face_normals.iter())
            .copied()
            .collect();

        for e1 in &self.edge_dirs {
            for e2 in &other.edge_dirs {
                axes.push(e1.cross(e2));
            }
        }

        axes
    }
}

/// Computes the proximity of two convex shapes, `g2` being placed by `pos12` in the frame of
/// `g1`.
///
/// Returns `None` if the shapes are further than `max_dist` apart. When they intersect, the
/// proximity is given by `on_intersection`.
pub(crate) fn support_map_support_map<G1, G2>(
    g1: &G1,
    g2: &G2,
    pos12: &Isometry<Real>,
    max_dist: Real,
    on_intersection: impl FnOnce() -> Proximity,
) -> Option<Proximity>
where
    G1: ?Sized + SupportMap,
    G2: ?Sized + SupportMap,
{
    let mut simplex = VoronoiSimplex::new();
    gjk::initial_simplex(pos12, g1, g2, &mut simplex);

    match gjk::closest_points(pos12, g1, g2, max_dist, &mut simplex) {
        GJKResult::ClosestPoints(p1, p2, normal) => {
            let dist = na::distance(&p1, &p2);
            (dist < max_dist).then(|| Proximity::new(dist, p1, p2, normal.into_inner()))
        }
        GJKResult::NoIntersection(_) => None,
        GJKResult::Intersection => Some(on_intersection()),
    }
}

/// The penetration of two intersecting convex shapes, measured along the candidate axis
/// of largest separation.
///
/// Returns `None` if no candidate axis is usable.
pub(crate) fn penetration<G1, G2>(
    g1: &G1,
    g2: &G2,
    pos12: &Isometry<Real>,
    axes: &[Vector<Real>],
) -> Option<Proximity>
where
    G1: SupportMap,
    G2: SupportMap,
{
    let mut best: Option<(Real, UnitVector<Real>)> = None;

    for axis in axes {
        if let Some(axis) = UnitVector::try_new(*axis, 1.0e-6) {
            for axis in [axis, -axis] {
                let sep = sat::support_map_support_map_compute_separation(g1, g2, pos12, &axis);
                if best.map(|b| sep > b.0).unwrap_or(true) {
                    best = Some((sep, axis));
                }
            }
        }
    }

    best.map(|(sep, axis)| penetration_along(g2, pos12, sep.min(0.0), &axis))
}

/// The proximity of two shapes penetrating by `-sep` along `axis`.
pub(crate) fn penetration_along<G2: ?Sized + SupportMap>(
    g2: &G2,
    pos12: &Isometry<Real>,
    sep: Real,
    axis: &UnitVector<Real>,
) -> Proximity {
    let point2 = g2.support_point_toward(pos12, &-*axis);
    let point1 = point2 - axis.into_inner() * sep;
    Proximity::new(sep, point1, point2, axis.into_inner())
}

/// A contact of unknown depth at `pt`.
pub(crate) fn touching_at(pt: Point<Real>) -> Proximity {
    Proximity::new(0.0, pt, pt, Vector::zeros())
}

/// The closest points between two segments.
pub(crate) fn segment_segment_closest_points(
    seg1: &Segment,
    seg2: &Segment,
) -> (Point<Real>, Point<Real>) {
    // Inspired by Real-Time Collision Detection by Christer Ericson.
    let d1 = seg1.b - seg1.a;
    let d2 = seg2.b - seg2.a;
    let r = seg1.a - seg2.a;

    let a = d1.norm_squared();
    let e = d2.norm_squared();
    let f = d2.dot(&r);

    let mut s;
    let mut t;

    let _eps = DEFAULT_EPSILON;
    if a <= _eps && e <= _eps {
        s = 0.0;
        t = 0.0;
    } else if a <= _eps {
        s = 0.0;
        t = na::clamp(f / e, 0.0, 1.0);
    } else {
        let c = d1.dot(&r);
        if e <= _eps {
            t = 0.0;
            s = na::clamp(-c / a, 0.0, 1.0);
        } else {
            let b = d1.dot(&d2);
            let ae = a * e;
            let bb = b * b;
            let denom = ae - bb;

            // Use absolute and ulps error to test collinearity.
            if denom > _eps && !ulps_eq!(ae, bb) {
                s = na::clamp((b * f - c * e) / denom, 0.0, 1.0);
            } else {
                s = 0.0;
            }

            t = (b * s + f) / e;

            if t < 0.0 {
                t = 0.0;
                s = na::clamp(-c / a, 0.0, 1.0);
            } else if t > 1.0 {
                t = 1.0;
                s = na::clamp((b - c) / a, 0.0, 1.0);
            }
        }
    }

    (seg1.point_at(s), seg2.point_at(t))
}

/// The point where a segment crosses a triangle, if any.
pub(crate) fn segment_triangle_intersection(seg: &Segment, tri: &Triangle) -> Option<Point<Real>> {
    let ray = Ray::new(seg.a, seg.b - seg.a);
    let (toi, _) = local_ray_intersection_with_triangle(&tri.a, &tri.b, &tri.c, &ray)?;
    (toi <= 1.0).then(|| ray.point_at(toi))
}

/// A point shared by two intersecting triangles.
pub(crate) fn triangle_triangle_intersection(tri1: &Triangle, tri2: &Triangle) -> Point<Real> {
    tri1.edges()
        .iter()
        .find_map(|e| segment_triangle_intersection(e, tri2))
        .or_else(|| {
            tri2.edges()
                .iter()
                .find_map(|e| segment_triangle_intersection(e, tri1))
        })
        // Coplanar overlap: the triangles share a patch, use a point of the first one.
        .unwrap_or_else(|| tri1.center())
}

/// Unsigned distance between two triangles expressed in the same frame.
pub(crate) fn triangle_triangle(tri1: &Triangle, tri2: &Triangle, max_dist: Real) -> Option<Proximity> {
    support_map_support_map(tri1, tri2, &Isometry::identity(), max_dist, || {
        touching_at(triangle_triangle_intersection(tri1, tri2))
    })
}

#[cfg(test)]
mod test {
    use super::{segment_segment_closest_points, triangle_triangle};
    use crate::math::{Point, Real};
    use crate::shape::{Segment, Triangle};

    #[test]
    fn crossing_segments() {
        let s1 = Segment::new(Point::new(-1.0, 0.0, 0.0), Point::new(1.0, 0.0, 0.0));
        let s2 = Segment::new(Point::new(0.5, -1.0, 2.0), Point::new(0.5, 1.0, 2.0));
        let (p1, p2) = segment_segment_closest_points(&s1, &s2);
        assert_relative_eq!(p1, Point::new(0.5, 0.0, 0.0), epsilon = 1.0e-12);
        assert_relative_eq!(p2, Point::new(0.5, 0.0, 2.0), epsilon = 1.0e-12);
    }

    #[test]
    fn stacked_triangles() {
        let tri1 = Triangle::new(Point::origin(), Point::new(1.0, 0.0, 0.0), Point::new(0.0, 1.0, 0.0));
        let tri2 = Triangle::new(
            Point::new(0.0, 0.0, 0.5),
            Point::new(1.0, 0.0, 0.5),
            Point::new(0.0, 1.0, 0.5),
        );
        let prox = triangle_triangle(&tri1, &tri2, Real::MAX).unwrap();
        assert_relative_eq!(prox.dist, 0.5, epsilon = 1.0e-6);
        assert!(triangle_triangle(&tri1, &tri2, 0.25).is_none());
    }

    #[test]
    fn crossing_triangles_touch() {
        let tri1 = Triangle::new(
            Point::new(-1.0, -1.0, 0.0),
            Point::new(1.0, -1.0, 0.0),
            Point::new(0.0, 1.0, 0.0),
        );
        let tri2 = Triangle::new(
            Point::new(0.0, 0.0, -1.0),
            Point::new(0.0, 0.0, 1.0),
            Point::new(0.0, 2.0, 0.0),
        );
        let prox = triangle_triangle(&tri1, &tri2, Real::MAX).unwrap();
        assert_relative_eq!(prox.dist, 0.0, epsilon = 1.0e-9);
        assert_relative_eq!(prox.point1.z, 0.0, epsilon = 1.0e-6);
    }
}

//! Proximity between a shape (first object) and a point (second object).

use crate::math::{Point, Real, Vector, DEFAULT_EPSILON};
use crate::query::proximity::Proximity;
use crate::query::{PointProjection, PointQuery};
use crate::shape::{ConvexPolyhedron, Primitive, Segment, Triangle, VolumeGrid};

/// Builds a proximity from the projection of `pt` on the boundary of a shape.
///
/// `fallback_normal` is used when `pt` lies exactly on the boundary.
pub(crate) fn from_projection(
    proj: PointProjection,
    pt: &Point<Real>,
    fallback_normal: Vector<Real>,
) -> Proximity {
    let delta = pt - proj.point;
    let dist = delta.norm();

    if dist > 0.0 {
        let dir = delta / dist;
        if proj.is_inside {
            Proximity::new(-dist, proj.point, *pt, -dir)
        } else {
            Proximity::new(dist, proj.point, *pt, dir)
        }
    } else {
        Proximity::new(0.0, proj.point, *pt, fallback_normal)
    }
}

/// Signed distance from a primitive to a point.
pub(crate) fn primitive_point(prim: &Primitive, pt: &Point<Real>) -> Proximity {
    from_projection(prim.project_local_point(pt, false), pt, Vector::zeros())
}

/// Unsigned distance from a segment to a point.
pub(crate) fn segment_point(seg: &Segment, pt: &Point<Real>) -> Proximity {
    let (proj, _) = seg.project_local_point_and_get_location(pt);
    from_projection(PointProjection::new(false, proj), pt, Vector::zeros())
}

/// Unsigned distance from a triangle to a point.
pub(crate) fn triangle_point(tri: &Triangle, pt: &Point<Real>) -> Proximity {
    let (proj, _) = tri.project_local_point_and_get_location(pt);
    let normal = tri.normal().map(|n| n.into_inner()).unwrap_or_else(Vector::zeros);
    from_projection(PointProjection::new(false, proj), pt, normal)
}

/// Signed distance from a convex polyhedron to a point.
pub(crate) fn polyhedron_point(poly: &ConvexPolyhedron, pt: &Point<Real>) -> Proximity {
    from_projection(poly.project_local_point(pt, false), pt, Vector::zeros())
}

/// Signed distance from the zero level set of a volume grid to a point.
///
/// The closest point is estimated by a step along the distance gradient.
pub(crate) fn grid_point(grid: &VolumeGrid, pt: &Point<Real>) -> Proximity {
    let dist = grid.signed_distance(pt);
    let normal = grid
        .distance_gradient(pt)
        .try_normalize(DEFAULT_EPSILON)
        .unwrap_or_else(Vector::zeros);

    Proximity::new(dist, pt - normal * dist, *pt, normal)
}

#[cfg(test)]
mod test {
    use super::{primitive_point, triangle_point};
    use crate::math::{Point, Vector};
    use crate::shape::{Primitive, Triangle};

    #[test]
    fn point_inside_a_box_points_out_of_the_closest_face() {
        let aabb = Primitive::aabb(Point::new(-1.0, -1.0, -1.0), Point::new(1.0, 1.0, 1.0));
        let prox = primitive_point(&aabb, &Point::new(0.8, 0.0, 0.1));
        assert_relative_eq!(prox.dist, -0.2, epsilon = 1.0e-12);
        assert_relative_eq!(prox.normal, Vector::x(), epsilon = 1.0e-12);
        assert_relative_eq!(prox.point1 + prox.normal * prox.dist, prox.point2, epsilon = 1.0e-12);
    }

    #[test]
    fn point_on_a_triangle_uses_its_normal() {
        let tri = Triangle::new(Point::origin(), Point::new(1.0, 0.0, 0.0), Point::new(0.0, 1.0, 0.0));
        let prox = triangle_point(&tri, &Point::new(0.25, 0.25, 0.0));
        assert_eq!(prox.dist, 0.0);
        assert_relative_eq!(prox.normal, Vector::z(), epsilon = 1.0e-12);

        let below = triangle_point(&tri, &Point::new(0.25, 0.25, -2.0));
        assert_relative_eq!(below.dist, 2.0, epsilon = 1.0e-12);
        assert_relative_eq!(below.normal, -Vector::z(), epsilon = 1.0e-12);
    }
}

use crate::math::{Isometry, Real};
use crate::query::distance::distance_support_map::{
    penetration_along, support_map_support_map, touching_at,
};
use crate::query::proximity::Proximity;
use crate::query::sat;
use crate::shape::ConvexPolyhedron;

/// Signed distance between two convex polyhedra.
///
/// The penetration depth of intersecting polyhedra is found by SAT. It is reported as zero
/// if both polyhedra are flat.
pub(crate) fn polyhedron_polyhedron(
    poly1: &ConvexPolyhedron,
    poly2: &ConvexPolyhedron,
    pos12: &Isometry<Real>,
    max_dist: Real,
) -> Option<Proximity> {
    support_map_support_map(poly1, poly2, pos12, max_dist, || {
        match sat::polyhedron_polyhedron_find_max_separation(poly1, poly2, pos12) {
            Some((sep, axis)) => penetration_along(poly2, pos12, sep.min(0.0), &axis),
            None => touching_at(poly1.local_aabb().center()),
        }
    })
}

#[cfg(test)]
mod test {
    use super::polyhedron_polyhedron;
    use crate::math::{Isometry, Point, Real, Vector};
    use crate::shape::ConvexPolyhedron;

    fn tetrahedron() -> ConvexPolyhedron {
        ConvexPolyhedron::from_points(&[
            Point::origin(),
            Point::new(1.0, 0.0, 0.0),
            Point::new(0.0, 1.0, 0.0),
            Point::new(0.0, 0.0, 1.0),
        ])
    }

    #[test]
    fn separated_tetrahedra() {
        let t = tetrahedron();
        let pos12 = Isometry::translation(0.0, 0.0, -2.0);
        let prox = polyhedron_polyhedron(&t, &t, &pos12, Real::MAX).unwrap();
        assert_relative_eq!(prox.dist, 1.0, epsilon = 1.0e-9);
        assert_relative_eq!(prox.normal, -Vector::z(), epsilon = 1.0e-9);
    }

    #[test]
    fn penetrating_tetrahedra() {
        let t = tetrahedron();
        let pos12 = Isometry::translation(0.0, 0.0, 0.25);
        let prox = polyhedron_polyhedron(&t, &t, &pos12, Real::MAX).unwrap();
        assert!(prox.dist < 0.0);
        assert_relative_eq!(prox.point1 + prox.normal * prox.dist, prox.point2, epsilon = 1.0e-9);
    }
}

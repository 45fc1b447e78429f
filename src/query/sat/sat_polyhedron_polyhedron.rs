use crate::math::{Isometry, Real, UnitVector};
use crate::query::sat::support_map_support_map_compute_separation;
use crate::shape::ConvexPolyhedron;

/// Finds the candidate axis along which two convex polyhedra are the most separated.
///
/// `poly2` is positioned by `pos12` in the local frame of `poly1`. Returns the separation
/// (negative when the polyhedra penetrate) and the axis, pointing from `poly1` toward `poly2`.
/// Returns `None` if no candidate axis exists, i.e., both polyhedra are degenerate.
pub fn polyhedron_polyhedron_find_max_separation(
    poly1: &ConvexPolyhedron,
    poly2: &ConvexPolyhedron,
    pos12: &Isometry<Real>,
) -> Option<(Real, UnitVector<Real>)> {
    let mut best: Option<(Real, UnitVector<Real>)> = None;
    let mut test_axis = |axis: UnitVector<Real>| {
        let sep = support_map_support_map_compute_separation(poly1, poly2, pos12, &axis);
        if best.map(|b| sep > b.0).unwrap_or(true) {
            best = Some((sep, axis));
        }
    };

    for n1 in poly1.separating_normals() {
        test_axis(*n1);
    }

    for n2 in poly2.separating_normals() {
        test_axis(-(pos12 * *n2));
    }

    for e1 in poly1.edge_directions() {
        for e2 in poly2.edge_directions() {
            let e2 = pos12 * *e2;
            if let Some(axis) = UnitVector::try_new(e1.cross(&e2), 1.0e-6) {
                test_axis(axis);
                test_axis(-axis);
            }
        }
    }

    best
}

#[cfg(test)]
mod test {
    use super::polyhedron_polyhedron_find_max_separation;
    use crate::math::{Isometry, Point, Real, Vector};
    use crate::shape::ConvexPolyhedron;

    fn cube(half: Real) -> ConvexPolyhedron {
        let mut pts = vec![];
        for i in 0..8 {
            let sign = |b: i32| if (i >> b) & 1 == 1 { half } else { -half };
            pts.push(Point::new(sign(0), sign(1), sign(2)));
        }
        ConvexPolyhedron::from_points(&pts)
    }

    #[test]
    fn sat_penetrating_cubes() {
        let c = cube(1.0);
        let pos12 = Isometry::translation(1.5, 0.1, 0.0);
        let (sep, axis) = polyhedron_polyhedron_find_max_separation(&c, &c, &pos12).unwrap();
        assert_relative_eq!(sep, -0.5, epsilon = 1.0e-9);
        assert_relative_eq!(axis.into_inner(), Vector::x(), epsilon = 1.0e-9);
    }

    #[test]
    fn sat_separated_cubes() {
        let c = cube(1.0);
        let pos12 = Isometry::translation(0.0, 0.0, -3.0);
        let (sep, axis) = polyhedron_polyhedron_find_max_separation(&c, &c, &pos12).unwrap();
        assert_relative_eq!(sep, 1.0, epsilon = 1.0e-9);
        assert_relative_eq!(axis.into_inner(), -Vector::z(), epsilon = 1.0e-9);
    }
}

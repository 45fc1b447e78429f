//! The Gilbert-Johnson-Keerthi distance algorithm.

use na::Unit;

use crate::math::{Isometry, Point, Real, Vector, DIM};
use crate::query::gjk::{CSOPoint, ConstantPoint, VoronoiSimplex};
use crate::shape::SupportMap;

/// Results of the GJK algorithm.
///
/// All points and vectors are expressed in the local-space of the first shape.
#[derive(Clone, Debug, PartialEq)]
pub enum GJKResult {
    /// The shapes are intersecting.
    Intersection,
    /// The closest points on each shape, and the unit direction from the first shape toward
    /// the second.
    ClosestPoints(Point<Real>, Point<Real>, Unit<Vector<Real>>),
    /// The shapes are further apart than the requested maximum distance. The vector is a
    /// separating axis.
    NoIntersection(Unit<Vector<Real>>),
}

/// The absolute tolerance used by the GJK algorithm.
pub fn eps_tol() -> Real {
    let _eps = crate::math::DEFAULT_EPSILON;
    _eps * 10.0
}

/// Initializes `simplex` with a support point of the CSO of `g1` and `g2`.
pub fn initial_simplex<G1, G2>(pos12: &Isometry<Real>, g1: &G1, g2: &G2, simplex: &mut VoronoiSimplex)
where
    G1: ?Sized + SupportMap,
    G2: ?Sized + SupportMap,
{
    let dir = if pos12.translation.vector.norm_squared() > 0.0 {
        -pos12.translation.vector
    } else {
        Vector::x()
    };
    simplex.reset(CSOPoint::from_shapes(pos12, g1, g2, &dir));
}

/// Projects `pt` on the convex shape `g`, in the local frame of `g`.
///
/// Returns `None` if `pt` is inside of `g`.
pub fn project_point<G: ?Sized + SupportMap>(g: &G, pt: &Point<Real>) -> Option<Point<Real>> {
    let pos12 = Isometry::identity();
    let point = ConstantPoint(*pt);
    let mut simplex = VoronoiSimplex::new();
    initial_simplex(&pos12, g, &point, &mut simplex);

    match closest_points(&pos12, g, &point, Real::MAX, &mut simplex) {
        GJKResult::ClosestPoints(p, _, _) => Some(p),
        _ => None,
    }
}

fn result(points_and_coords: impl Iterator<Item = (CSOPoint, Real)>) -> (Point<Real>, Point<Real>) {
    let mut res = (Point::origin(), Point::origin());

    for (point, coord) in points_and_coords {
        res.0 += point.orig1.coords * coord;
        res.1 += point.orig2.coords * coord;
    }

    res
}

fn current_result(simplex: &VoronoiSimplex) -> (Point<Real>, Point<Real>) {
    result(simplex.points_and_coords().map(|(p, c)| (*p, c)))
}

fn prev_result(simplex: &VoronoiSimplex) -> (Point<Real>, Point<Real>) {
    result(simplex.prev_points_and_coords().map(|(p, c)| (*p, c)))
}

/// Computes the closest points between two convex shapes.
///
/// `g2` is positioned by `pos12` in the local frame of `g1`. The `simplex` must have been
/// initialized, e.g., by [`initial_simplex`]. If the shapes are further than `max_dist` apart,
/// `GJKResult::NoIntersection` may be returned early.
pub fn closest_points<G1, G2>(
    pos12: &Isometry<Real>,
    g1: &G1,
    g2: &G2,
    max_dist: Real,
    simplex: &mut VoronoiSimplex,
) -> GJKResult
where
    G1: ?Sized + SupportMap,
    G2: ?Sized + SupportMap,
{
    let _eps_tol: Real = eps_tol();
    let _eps_rel: Real = _eps_tol.sqrt();

    let mut proj = simplex.project_origin_and_reduce();

    let mut old_dir;

    if let Some(proj_dir) = Unit::try_new(proj.coords, 0.0) {
        old_dir = -proj_dir;
    } else {
        return GJKResult::Intersection;
    }

    let mut max_bound = Real::MAX;
    let mut dir;
    let mut niter = 0;

    loop {
        let old_max_bound = max_bound;

        if let Some((new_dir, dist)) = Unit::try_new_and_get(-proj.coords, _eps_tol) {
            dir = new_dir;
            max_bound = dist;
        } else {
            // The origin is on the simplex.
            return GJKResult::Intersection;
        }

        if max_bound >= old_max_bound {
            // Upper bounds inconsistencies: the previous simplex was better.
            let (p1, p2) = prev_result(simplex);
            return GJKResult::ClosestPoints(p1, p2, old_dir);
        }

        let cso_point = CSOPoint::from_shapes(pos12, g1, g2, &dir);
        let min_bound = -dir.dot(&cso_point.point.coords);

        if !min_bound.is_finite() {
            return GJKResult::NoIntersection(dir);
        }

        if min_bound > max_dist {
            return GJKResult::NoIntersection(dir);
        } else if max_bound - min_bound <= _eps_rel * max_bound {
            // The distance found has a good enough precision.
            let (p1, p2) = current_result(simplex);
            return GJKResult::ClosestPoints(p1, p2, dir);
        }

        if !simplex.add_point(cso_point) {
            let (p1, p2) = current_result(simplex);
            return GJKResult::ClosestPoints(p1, p2, dir);
        }

        old_dir = dir;
        proj = simplex.project_origin_and_reduce();

        if simplex.dimension() == DIM {
            if min_bound >= _eps_tol {
                let (p1, p2) = prev_result(simplex);
                return GJKResult::ClosestPoints(p1, p2, old_dir);
            } else {
                // Point inside of the cso.
                return GJKResult::Intersection;
            }
        }

        niter += 1;

        if niter == 100 {
            log::warn!("GJK did not converge after {niter} iterations");
            let (p1, p2) = current_result(simplex);
            return GJKResult::ClosestPoints(p1, p2, dir);
        }
    }
}

#[cfg(test)]
mod test {
    use super::{closest_points, initial_simplex, project_point, GJKResult};
    use crate::math::{Isometry, Point, Real};
    use crate::query::gjk::VoronoiSimplex;
    use crate::shape::{ConvexPolyhedron, Primitive};

    fn cube(center: Point<Real>, half: Real) -> ConvexPolyhedron {
        let mut pts = vec![];
        for i in 0..8 {
            let sign = |b: i32| if (i >> b) & 1 == 1 { half } else { -half };
            pts.push(center + crate::math::Vector::new(sign(0), sign(1), sign(2)));
        }
        ConvexPolyhedron::from_points(&pts)
    }

    #[test]
    fn gjk_separated_cubes() {
        let c1 = cube(Point::origin(), 1.0);
        let c2 = cube(Point::origin(), 1.0);
        let pos12 = Isometry::translation(5.0, 0.5, 0.0);
        let mut simplex = VoronoiSimplex::new();
        initial_simplex(&pos12, &c1, &c2, &mut simplex);

        match closest_points(&pos12, &c1, &c2, Real::MAX, &mut simplex) {
            GJKResult::ClosestPoints(p1, p2, n) => {
                assert_relative_eq!(na::distance(&p1, &p2), 3.0, epsilon = 1.0e-6);
                assert_relative_eq!(n.x, 1.0, epsilon = 1.0e-6);
            }
            res => panic!("unexpected GJK result: {res:?}"),
        }
    }

    #[test]
    fn gjk_intersecting_cubes() {
        let c1 = cube(Point::origin(), 1.0);
        let c2 = cube(Point::origin(), 1.0);
        let pos12 = Isometry::translation(1.5, 0.2, -0.3);
        let mut simplex = VoronoiSimplex::new();
        initial_simplex(&pos12, &c1, &c2, &mut simplex);
        assert_eq!(
            closest_points(&pos12, &c1, &c2, Real::MAX, &mut simplex),
            GJKResult::Intersection
        );
    }

    #[test]
    fn gjk_max_dist_early_exit() {
        let c1 = cube(Point::origin(), 1.0);
        let c2 = cube(Point::origin(), 1.0);
        let pos12 = Isometry::translation(10.0, 0.0, 0.0);
        let mut simplex = VoronoiSimplex::new();
        initial_simplex(&pos12, &c1, &c2, &mut simplex);
        assert!(matches!(
            closest_points(&pos12, &c1, &c2, 1.0, &mut simplex),
            GJKResult::NoIntersection(_)
        ));
    }

    #[test]
    fn gjk_point_projection_on_segment() {
        let segment = Primitive::segment(Point::new(-1.0, 0.0, 0.0), Point::new(1.0, 0.0, 0.0));
        let proj = project_point(&segment, &Point::new(0.5, 2.0, 0.0)).unwrap();
        assert_relative_eq!(proj, Point::new(0.5, 0.0, 0.0), epsilon = 1.0e-6);
    }
}

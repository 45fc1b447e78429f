use crate::math::{Point, Real};

/// Computes the centroid of a set of points.
///
/// Returns the origin if `pts` is empty.
pub fn center(pts: &[Point<Real>]) -> Point<Real> {
    if pts.is_empty() {
        return Point::origin();
    }

    let denom = 1.0 / (pts.len() as Real);
    let mut sum = Point::origin().coords;

    for pt in pts {
        sum += pt.coords;
    }

    Point::from(sum * denom)
}

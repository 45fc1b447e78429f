use crate::math::{Point, Real, Vector};

/// Returns the index of the support point of a list of points.
pub fn support_point_id(direction: &Vector<Real>, points: &[Point<Real>]) -> Option<usize> {
    indexed_support_point_id(direction, points, 0..points.len())
}

/// Returns the index of the support point of an indexed list of points.
pub fn indexed_support_point_id<I>(
    direction: &Vector<Real>,
    points: &[Point<Real>],
    idx: I,
) -> Option<usize>
where
    I: IntoIterator<Item = usize>,
{
    let mut argmax = None;
    let mut max = -Real::MAX;

    for i in idx {
        let dot = direction.dot(&points[i].coords);

        if dot > max {
            argmax = Some(i);
            max = dot;
        }
    }

    argmax
}

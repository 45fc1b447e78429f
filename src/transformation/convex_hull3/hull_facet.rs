use crate::math::{Point, Real, Vector};

/// A triangular facet of a hull under construction.
#[derive(Debug)]
pub struct HullFacet {
    pub valid: bool,
    pub pts: [usize; 3],
    pub normal: Vector<Real>,
    /// Points strictly above this facet, not yet part of the hull.
    pub outside_points: Vec<usize>,
    pub furthest_point: usize,
    pub furthest_distance: Real,
}

impl HullFacet {
    pub fn new(p1: usize, p2: usize, p3: usize, points: &[Point<Real>]) -> HullFacet {
        let p1p2 = points[p2] - points[p1];
        let p1p3 = points[p3] - points[p1];
        let normal = p1p2.cross(&p1p3);

        HullFacet {
            valid: true,
            pts: [p1, p2, p3],
            normal: normal.try_normalize(0.0).unwrap_or(normal),
            outside_points: Vec::new(),
            furthest_point: usize::MAX,
            furthest_distance: 0.0,
        }
    }

    pub fn distance_to_point(&self, point: usize, points: &[Point<Real>]) -> Real {
        self.normal.dot(&(points[point] - points[self.pts[0]]))
    }

    pub fn add_outside_point(&mut self, pid: usize, distance: Real) {
        if distance > self.furthest_distance {
            self.furthest_distance = distance;
            self.furthest_point = pid;
        }

        self.outside_points.push(pid);
    }

    /// The directed edges `(pts[i], pts[i + 1])` of this facet.
    pub fn edges(&self) -> [(usize, usize); 3] {
        [
            (self.pts[0], self.pts[1]),
            (self.pts[1], self.pts[2]),
            (self.pts[2], self.pts[0]),
        ]
    }
}

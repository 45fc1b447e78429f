use crate::math::{Matrix, Point, Real};
use crate::query::gjk::{self, CSOPoint};
use crate::shape::{Segment, SegmentPointLocation, Triangle, TrianglePointLocation};
use arrayvec::ArrayVec;

/// A simplex of dimension up to 3 using Voronoï regions for computing point projections.
#[derive(Clone, Debug, Default)]
pub struct VoronoiSimplex {
    vertices: ArrayVec<CSOPoint, 4>,
    proj: ArrayVec<Real, 4>,
    prev_vertices: ArrayVec<CSOPoint, 4>,
    prev_proj: ArrayVec<Real, 4>,
}

impl VoronoiSimplex {
    /// Creates a new empty simplex.
    pub fn new() -> VoronoiSimplex {
        VoronoiSimplex::default()
    }

    /// Resets this simplex to a single point.
    pub fn reset(&mut self, pt: CSOPoint) {
        self.vertices.clear();
        self.vertices.push(pt);
        self.proj.clear();
        self.proj.push(1.0);
        self.prev_vertices.clone_from(&self.vertices);
        self.prev_proj.clone_from(&self.proj);
    }

    /// Adds a point to this simplex.
    ///
    /// Returns `false` if the point is too close to a vertex of the simplex, or if the simplex
    /// is already a tetrahedron.
    pub fn add_point(&mut self, pt: CSOPoint) -> bool {
        if self.vertices.is_full()
            || self
                .vertices
                .iter()
                .any(|v| (v.point - pt.point).norm_squared() < gjk::eps_tol())
        {
            return false;
        }

        self.prev_vertices.clone_from(&self.vertices);
        self.prev_proj.clone_from(&self.proj);
        self.vertices.push(pt);
        true
    }

    /// The dimension of the smallest subspace that can contain this simplex.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.vertices.len().saturating_sub(1)
    }

    /// The i-th point of this simplex.
    #[inline]
    pub fn point(&self, i: usize) -> &CSOPoint {
        &self.vertices[i]
    }

    /// The barycentric coordinate of the `i`-th point computed by the last call to
    /// `project_origin_and_reduce`.
    #[inline]
    pub fn proj_coord(&self, i: usize) -> Real {
        self.proj[i]
    }

    /// The points of this simplex and their barycentric coordinates before the last call to
    /// `add_point`.
    pub fn prev_points_and_coords(&self) -> impl Iterator<Item = (&CSOPoint, Real)> {
        self.prev_vertices.iter().zip(self.prev_proj.iter().copied())
    }

    /// The points of this simplex and their barycentric coordinates.
    pub fn points_and_coords(&self) -> impl Iterator<Item = (&CSOPoint, Real)> {
        self.vertices.iter().zip(self.proj.iter().copied())
    }

    fn keep(&mut self, ids: &[usize], coords: &[Real]) {
        let kept: ArrayVec<CSOPoint, 4> = ids.iter().map(|i| self.vertices[*i]).collect();
        self.vertices = kept;
        self.proj = coords.iter().copied().collect();
    }

    fn reduce_to_triangle(&mut self, ids: [usize; 3]) -> Point<Real> {
        let tri = Triangle::new(
            self.vertices[ids[0]].point,
            self.vertices[ids[1]].point,
            self.vertices[ids[2]].point,
        );
        let (proj, location) = tri.project_local_point_and_get_location(&Point::origin());

        match location {
            TrianglePointLocation::OnVertex(i) => self.keep(&[ids[i as usize]], &[1.0]),
            TrianglePointLocation::OnEdge(0, uv) => self.keep(&[ids[0], ids[1]], &uv),
            TrianglePointLocation::OnEdge(1, uv) => self.keep(&[ids[1], ids[2]], &uv),
            TrianglePointLocation::OnEdge(_, uv) => self.keep(&[ids[0], ids[2]], &uv),
            TrianglePointLocation::OnFace(bcoords) => self.keep(&ids, &bcoords),
        }

        proj
    }

    /// Projects the origin on the boundary of this simplex and reduces `self` to the smallest
    /// subsimplex containing the projection.
    ///
    /// Returns the result of the projection, or `Point::origin()` if the origin lies inside of
    /// the simplex. The state of the simplex before the last added point can be retrieved with
    /// [`Self::prev_points_and_coords`].
    pub fn project_origin_and_reduce(&mut self) -> Point<Real> {
        match self.vertices.len() {
            0 => Point::origin(),
            1 => {
                self.proj.clear();
                self.proj.push(1.0);
                self.vertices[0].point
            }
            2 => {
                let seg = Segment::new(self.vertices[0].point, self.vertices[1].point);
                let (proj, location) = seg.project_local_point_and_get_location(&Point::origin());

                match location {
                    SegmentPointLocation::OnVertex(i) => self.keep(&[i as usize], &[1.0]),
                    SegmentPointLocation::OnEdge(uv) => self.keep(&[0, 1], &uv),
                }

                proj
            }
            3 => self.reduce_to_triangle([0, 1, 2]),
            _ => self.reduce_tetrahedron(),
        }
    }

    fn reduce_tetrahedron(&mut self) -> Point<Real> {
        // Each face, with the vertex opposite to it.
        const FACES: [([usize; 3], usize); 4] = [
            ([1, 2, 3], 0),
            ([0, 2, 3], 1),
            ([0, 1, 3], 2),
            ([0, 1, 2], 3),
        ];

        let pts: [Point<Real>; 4] = [
            self.vertices[0].point,
            self.vertices[1].point,
            self.vertices[2].point,
            self.vertices[3].point,
        ];

        let mut best: Option<(Real, [usize; 3])> = None;

        for (face, opposite) in FACES {
            let [i, j, k] = face;
            let n = (pts[j] - pts[i]).cross(&(pts[k] - pts[i]));
            let side_origin = -n.dot(&pts[i].coords);
            let side_opposite = n.dot(&(pts[opposite] - pts[i]));

            // The face is only visible from the origin if they are on opposite sides of it.
            // A flat tetrahedron makes every face a candidate.
            if side_origin * side_opposite < 0.0 || side_opposite == 0.0 {
                let tri = Triangle::new(pts[i], pts[j], pts[k]);
                let (proj, _) = tri.project_local_point_and_get_location(&Point::origin());
                let dist = proj.coords.norm_squared();

                if best.map(|b| dist < b.0).unwrap_or(true) {
                    best = Some((dist, face));
                }
            }
        }

        if let Some((_, face)) = best {
            return self.reduce_to_triangle(face);
        }

        // The origin is inside of the tetrahedron.
        let m = Matrix::from_columns(&[pts[1] - pts[0], pts[2] - pts[0], pts[3] - pts[0]]);
        match m.try_inverse() {
            Some(inv) => {
                let l = inv * (-pts[0].coords);
                self.proj = [1.0 - l.x - l.y - l.z, l.x, l.y, l.z].into();
                Point::origin()
            }
            None => self.reduce_to_triangle([0, 1, 2]),
        }
    }
}

#[cfg(test)]
mod test {
    use super::VoronoiSimplex;
    use crate::math::{Point, Real};
    use crate::query::gjk::CSOPoint;

    fn cso(x: Real, y: Real, z: Real) -> CSOPoint {
        CSOPoint::new(Point::new(x, y, z), Point::origin())
    }

    #[test]
    fn tetrahedron_containing_the_origin() {
        let mut simplex = VoronoiSimplex::new();
        simplex.reset(cso(1.0, 0.0, -1.0));
        assert!(simplex.add_point(cso(-1.0, 1.0, -1.0)));
        assert!(simplex.add_point(cso(-1.0, -1.0, -1.0)));
        assert!(simplex.add_point(cso(0.0, 0.0, 1.0)));

        let proj = simplex.project_origin_and_reduce();
        assert_eq!(proj, Point::origin());
        assert_eq!(simplex.dimension(), 3);

        let sum: Real = simplex.points_and_coords().map(|(_, c)| c).sum();
        assert_relative_eq!(sum, 1.0, epsilon = 1.0e-12);
    }

    #[test]
    fn tetrahedron_reduced_to_closest_face() {
        let mut simplex = VoronoiSimplex::new();
        simplex.reset(cso(1.0, 0.0, 1.0));
        assert!(simplex.add_point(cso(-1.0, 1.0, 1.0)));
        assert!(simplex.add_point(cso(-1.0, -1.0, 1.0)));
        assert!(simplex.add_point(cso(0.0, 0.0, 3.0)));

        let proj = simplex.project_origin_and_reduce();
        assert_relative_eq!(proj, Point::new(0.0, 0.0, 1.0), epsilon = 1.0e-12);
        assert_eq!(simplex.dimension(), 2);
    }
}

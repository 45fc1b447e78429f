use crate::bounding_volume::Aabb;
use crate::math::{Point, Real, UnitVector, Vector};
use crate::shape::{SupportMap, Triangle, TriangleMesh};
use crate::transformation::try_convex_hull;
use crate::utils::{support_point_id, SortedPair};
use std::collections::HashSet;

/// The polytope bounding the convex hull of a point set.
///
/// Faces are triangles oriented outward. When the generating points are collinear, coplanar,
/// or fewer than four, the polyhedron is *degenerate*: it keeps every generating point as a
/// vertex but has no face, so it still has a support function but no interior.
#[derive(Clone, Debug)]
pub struct ConvexPolyhedron {
    vertices: Vec<Point<Real>>,
    faces: Vec<[u32; 3]>,
    face_normals: Vec<UnitVector<Real>>,
    /// Face normals with near-parallel duplicates removed.
    separating_normals: Vec<UnitVector<Real>>,
    /// Edge directions with near-parallel duplicates removed.
    edge_directions: Vec<UnitVector<Real>>,
}

impl ConvexPolyhedron {
    /// Computes the polyhedron bounding the convex hull of `points`.
    pub fn from_points(points: &[Point<Real>]) -> Self {
        match try_convex_hull(points) {
            Ok((vertices, faces)) => Self::from_hull(vertices, faces),
            Err(err) => {
                log::debug!("degenerate convex hull of {} points: {}", points.len(), err);
                ConvexPolyhedron {
                    vertices: points.to_vec(),
                    faces: Vec::new(),
                    face_normals: Vec::new(),
                    separating_normals: Vec::new(),
                    edge_directions: Vec::new(),
                }
            }
        }
    }

    fn from_hull(vertices: Vec<Point<Real>>, faces: Vec<[u32; 3]>) -> Self {
        let mut face_normals = Vec::with_capacity(faces.len());
        let mut kept_faces = Vec::with_capacity(faces.len());

        for face in faces {
            let tri = Triangle::new(
                vertices[face[0] as usize],
                vertices[face[1] as usize],
                vertices[face[2] as usize],
            );

            // Slivers from coplanar input points carry no orientation information.
            if let Some(normal) = tri.normal() {
                face_normals.push(normal);
            } else {
                face_normals.push(UnitVector::new_unchecked(Vector::zeros()));
            }
            kept_faces.push(face);
        }

        let mut separating_normals = Vec::new();
        for n in &face_normals {
            if n.norm_squared() > 0.0 {
                push_unique_direction(&mut separating_normals, *n, false);
            }
        }

        let mut edges = HashSet::new();
        let mut edge_directions = Vec::new();
        for face in &kept_faces {
            for k in 0..3 {
                let edge = SortedPair::new(face[k], face[(k + 1) % 3]);
                if edges.insert(edge) {
                    let dir = vertices[edge.high() as usize] - vertices[edge.low() as usize];
                    if let Some(dir) = UnitVector::try_new(dir, crate::math::DEFAULT_EPSILON) {
                        push_unique_direction(&mut edge_directions, dir, true);
                    }
                }
            }
        }

        ConvexPolyhedron {
            vertices,
            faces: kept_faces,
            face_normals,
            separating_normals,
            edge_directions,
        }
    }

    /// The vertices of this polyhedron.
    #[inline]
    pub fn vertices(&self) -> &[Point<Real>] {
        &self.vertices
    }

    /// The outward triangular faces of this polyhedron.
    #[inline]
    pub fn faces(&self) -> &[[u32; 3]] {
        &self.faces
    }

    /// The outward normal of each face. Zero for sliver faces.
    #[inline]
    pub fn face_normals(&self) -> &[UnitVector<Real>] {
        &self.face_normals
    }

    /// The distinct face normal directions.
    #[inline]
    pub fn separating_normals(&self) -> &[UnitVector<Real>] {
        &self.separating_normals
    }

    /// The distinct edge directions, up to sign.
    #[inline]
    pub fn edge_directions(&self) -> &[UnitVector<Real>] {
        &self.edge_directions
    }

    /// Does this polyhedron enclose no volume?
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.faces.is_empty()
    }

    /// The `i`-th face as a triangle.
    pub fn face(&self, i: usize) -> Triangle {
        let f = self.faces[i];
        Triangle::new(
            self.vertices[f[0] as usize],
            self.vertices[f[1] as usize],
            self.vertices[f[2] as usize],
        )
    }

    /// The bounding box of the vertices.
    pub fn local_aabb(&self) -> Aabb {
        Aabb::from_points(&self.vertices)
    }

    /// The largest signed distance from `pt` to the supporting plane of a face, and that face.
    ///
    /// For a point inside the polyhedron this is minus its depth.
    pub fn max_face_distance(&self, pt: &Point<Real>) -> Option<(Real, usize)> {
        let mut best: Option<(Real, usize)> = None;

        for (i, (face, normal)) in self.faces.iter().zip(&self.face_normals).enumerate() {
            if normal.norm_squared() == 0.0 {
                continue;
            }

            let dist = normal.dot(&(pt - self.vertices[face[0] as usize]));
            if best.map(|b| dist > b.0).unwrap_or(true) {
                best = Some((dist, i));
            }
        }

        best
    }

    /// Tests if `pt` is inside this polyhedron or on its boundary.
    pub fn contains_local_point(&self, pt: &Point<Real>) -> bool {
        !self.is_degenerate()
            && self
                .max_face_distance(pt)
                .map(|(d, _)| d <= 0.0)
                .unwrap_or(false)
    }

    /// The enclosed volume.
    pub fn volume(&self) -> Real {
        self.to_trimesh().volume()
    }

    /// The boundary of this polyhedron as a triangle mesh.
    pub fn to_trimesh(&self) -> TriangleMesh {
        TriangleMesh::new(self.vertices.clone(), self.faces.clone()).unwrap_or_default()
    }
}

fn push_unique_direction(dirs: &mut Vec<UnitVector<Real>>, dir: UnitVector<Real>, up_to_sign: bool) {
    let parallel = |d: &UnitVector<Real>| {
        let dot = d.dot(&dir);
        let dot = if up_to_sign { dot.abs() } else { dot };
        dot > 1.0 - 1.0e-9
    };

    if !dirs.iter().any(parallel) {
        dirs.push(dir);
    }
}

impl SupportMap for ConvexPolyhedron {
    #[inline]
    fn local_support_point(&self, dir: &Vector<Real>) -> Point<Real> {
        support_point_id(dir, &self.vertices)
            .map(|id| self.vertices[id])
            .unwrap_or_else(Point::origin)
    }
}

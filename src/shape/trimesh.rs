use crate::bounding_volume::Aabb;
use crate::error::GeometryError;
use crate::math::{Matrix, Point, Real, Vector};
use crate::shape::Triangle;
use crate::utils::SortedPair;
use std::collections::HashMap;

/// A triangle mesh: an ordered vertex list and an ordered list of index triplets.
///
/// Triangles are expected to be counter-clockwise when seen from outside, which only matters
/// for volume computation and inside/outside classification of closed meshes.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct TriangleMesh {
    vertices: Vec<Point<Real>>,
    indices: Vec<[u32; 3]>,
}

impl TriangleMesh {
    /// Creates a new triangle mesh, checking that every index refers to an existing vertex.
    pub fn new(vertices: Vec<Point<Real>>, indices: Vec<[u32; 3]>) -> Result<Self, GeometryError> {
        let nverts = vertices.len();

        if let Some(bad) = indices
            .iter()
            .flatten()
            .find(|i| **i as usize >= nverts)
        {
            return Err(GeometryError::MalformedData(format!(
                "triangle index {bad} out of range for {nverts} vertices"
            )));
        }

        Ok(TriangleMesh { vertices, indices })
    }

    /// Creates a triangle mesh from flattened coordinate and index lists.
    pub fn from_flat(vertices: &[Real], indices: &[u32]) -> Result<Self, GeometryError> {
        if vertices.len() % 3 != 0 || indices.len() % 3 != 0 {
            return Err(GeometryError::MalformedData(
                "flattened vertex and index lists must have a length multiple of 3".to_string(),
            ));
        }

        let vertices = vertices
            .chunks_exact(3)
            .map(|c| Point::new(c[0], c[1], c[2]))
            .collect();
        let indices = indices
            .chunks_exact(3)
            .map(|c| [c[0], c[1], c[2]])
            .collect();
        Self::new(vertices, indices)
    }

    /// The vertex buffer of this mesh.
    #[inline]
    pub fn vertices(&self) -> &[Point<Real>] {
        &self.vertices
    }

    /// The index buffer of this mesh.
    #[inline]
    pub fn indices(&self) -> &[[u32; 3]] {
        &self.indices
    }

    /// The vertex coordinates, flattened.
    pub fn flat_vertices(&self) -> Vec<Real> {
        self.vertices
            .iter()
            .flat_map(|p| [p.x, p.y, p.z])
            .collect()
    }

    /// The triangle indices, flattened.
    pub fn flat_indices(&self) -> Vec<u32> {
        self.indices.iter().flatten().copied().collect()
    }

    /// The number of triangles of this mesh.
    #[inline]
    pub fn num_triangles(&self) -> usize {
        self.indices.len()
    }

    /// Does this mesh contain no triangle?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Get the `i`-th triangle of this mesh.
    #[inline]
    pub fn triangle(&self, i: u32) -> Triangle {
        let idx = self.indices[i as usize];
        Triangle::new(
            self.vertices[idx[0] as usize],
            self.vertices[idx[1] as usize],
            self.vertices[idx[2] as usize],
        )
    }

    /// An iterator through all the triangles of this mesh.
    pub fn triangles(&self) -> impl ExactSizeIterator<Item = Triangle> + '_ {
        (0..self.indices.len() as u32).map(move |i| self.triangle(i))
    }

    /// The axis-aligned bounding box of the vertices of this mesh.
    pub fn local_aabb(&self) -> Aabb {
        Aabb::from_points(&self.vertices)
    }

    /// Translates every vertex of this mesh.
    pub fn translate(&mut self, t: &Vector<Real>) {
        self.vertices.iter_mut().for_each(|pt| *pt += t);
    }

    /// Applies the affine map `x -> linear * x + t` to every vertex.
    ///
    /// Triangle windings are reversed if the map is a reflection, so a closed mesh stays
    /// oriented outward.
    pub fn transform(&mut self, linear: &Matrix<Real>, t: &Vector<Real>) {
        self.vertices
            .iter_mut()
            .for_each(|pt| *pt = Point::from(linear * pt.coords + t));

        if linear.determinant() < 0.0 {
            self.reverse();
        }
    }

    /// Reverse the orientation of every triangle.
    pub fn reverse(&mut self) {
        self.indices.iter_mut().for_each(|idx| idx.swap(0, 1));
    }

    /// Appends a second triangle mesh to this triangle mesh.
    pub fn append(&mut self, rhs: &TriangleMesh) {
        let base_id = self.vertices.len() as u32;
        self.vertices.extend_from_slice(rhs.vertices());
        self.indices.extend(
            rhs.indices()
                .iter()
                .map(|idx| [idx[0] + base_id, idx[1] + base_id, idx[2] + base_id]),
        );
    }

    /// The signed volume enclosed by this mesh.
    ///
    /// Only meaningful for closed meshes; positive when the triangles are oriented outward.
    pub fn volume(&self) -> Real {
        self.triangles()
            .map(|tri| tri.a.coords.dot(&tri.b.coords.cross(&tri.c.coords)))
            .sum::<Real>()
            / 6.0
    }

    /// The mean, over all triangles, of the longest edge length.
    pub fn average_triangle_diameter(&self) -> Real {
        if self.indices.is_empty() {
            return 0.0;
        }

        self.triangles().map(|tri| tri.diameter()).sum::<Real>() / self.indices.len() as Real
    }

    /// Checks that every edge is shared by exactly two triangles traversing it in opposite
    /// directions.
    pub fn is_watertight(&self) -> bool {
        if self.indices.is_empty() {
            return false;
        }

        // For each undirected edge: (number of uses, sum of orientations).
        let mut edges: HashMap<SortedPair<u32>, (u32, i32)> = HashMap::new();

        for idx in &self.indices {
            for k in 0..3 {
                let (i, j) = (idx[k], idx[(k + 1) % 3]);
                if i == j {
                    return false;
                }

                let entry = edges.entry(SortedPair::new(i, j)).or_insert((0, 0));
                entry.0 += 1;
                entry.1 += if i < j { 1 } else { -1 };
            }
        }

        edges.values().all(|(count, orient)| *count == 2 && *orient == 0)
    }
}

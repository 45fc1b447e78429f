use std::collections::HashMap;

use crate::math::{Point, Real};
use crate::shape::{TriangleMesh, VolumeGrid};
use crate::utils::SortedPair;

/// Decomposition of a cube into six tetrahedra sharing its main diagonal.
///
/// Corners are numbered `dx + 2 * dy + 4 * dz`. Adjacent cubes split their common faces
/// along the same diagonal, so the tetrahedra form a conforming mesh.
const CUBE_TETRAHEDRA: [[usize; 4]; 6] = [
    [0, 1, 3, 7],
    [0, 1, 5, 7],
    [0, 2, 3, 7],
    [0, 2, 6, 7],
    [0, 4, 5, 7],
    [0, 4, 6, 7],
];

struct IsoSurfaceBuilder<'a> {
    grid: &'a VolumeGrid,
    level: Real,
    vertices: Vec<Point<Real>>,
    indices: Vec<[u32; 3]>,
    edge_vertices: HashMap<SortedPair<usize>, u32>,
}

impl IsoSurfaceBuilder<'_> {
    fn node(&self, id: usize) -> (Point<Real>, Real) {
        let [i, j, k] = self.grid.cell_coords(id);
        (self.grid.cell_center(i, j, k), self.grid.values()[id])
    }

    fn is_above(&self, id: usize) -> bool {
        self.grid.values()[id] > self.level
    }

    /// The surface vertex on the lattice edge between two nodes on opposite sides of the
    /// level, shared by every tetrahedron containing that edge.
    fn edge_vertex(&mut self, n1: usize, n2: usize) -> u32 {
        let key = SortedPair::new(n1, n2);
        if let Some(id) = self.edge_vertices.get(&key) {
            return *id;
        }

        let (p1, v1) = self.node(key.low());
        let (p2, v2) = self.node(key.high());
        let t = ((self.level - v1) / (v2 - v1)).clamp(0.0, 1.0);
        let id = self.vertices.len() as u32;
        self.vertices.push(p1 + (p2 - p1) * t);
        let _ = self.edge_vertices.insert(key, id);
        id
    }

    fn is_positively_oriented(&self, tet: [usize; 4]) -> bool {
        let p = tet.map(|id| self.node(id).0);
        (p[1] - p[0]).cross(&(p[2] - p[0])).dot(&(p[3] - p[0])) > 0.0
    }

    fn push_triangle(&mut self, tri: [(usize, usize); 3]) {
        let tri = tri.map(|(n1, n2)| self.edge_vertex(n1, n2));
        self.indices.push(tri);
    }

    /// Emits the part of the level set crossing a tetrahedron, with normals pointing toward
    /// increasing values.
    fn tetrahedron(&mut self, tet: [usize; 4]) {
        let (above, below): (Vec<usize>, Vec<usize>) = tet.iter().copied().partition(|id| self.is_above(*id));

        match (above.len(), below.len()) {
            (1, 3) | (3, 1) => {
                let (lone, others, lone_above) = if above.len() == 1 {
                    (above[0], below, true)
                } else {
                    (below[0], above, false)
                };

                let (p, a, mut b, mut c) = (lone, others[0], others[1], others[2]);
                if !self.is_positively_oriented([p, a, b, c]) {
                    std::mem::swap(&mut b, &mut c);
                }

                // With (p, a, b, c) positively oriented, (pa, pb, pc) faces away from p.
                if lone_above {
                    self.push_triangle([(p, a), (p, c), (p, b)]);
                } else {
                    self.push_triangle([(p, a), (p, b), (p, c)]);
                }
            }
            (2, 2) => {
                let (a, b) = (above[0], above[1]);
                let (mut c, mut d) = (below[0], below[1]);
                if !self.is_positively_oriented([a, b, c, d]) {
                    std::mem::swap(&mut c, &mut d);
                }

                self.push_triangle([(a, c), (b, c), (b, d)]);
                self.push_triangle([(a, c), (b, d), (a, d)]);
            }
            _ => {}
        }
    }
}

/// Extracts the level set `value == level` of a grid by marching tetrahedra.
///
/// The lattice joins the cell centers, each lattice cube being split into six tetrahedra.
/// Vertices lying on the same lattice edge are welded and triangles are oriented so that
/// their normals point toward increasing values.
pub fn volume_grid_to_trimesh(grid: &VolumeGrid, level: Real) -> TriangleMesh {
    let [nx, ny, nz] = grid.dims();
    let mut builder = IsoSurfaceBuilder {
        grid,
        level,
        vertices: Vec::new(),
        indices: Vec::new(),
        edge_vertices: HashMap::new(),
    };

    if nx < 2 || ny < 2 || nz < 2 {
        return TriangleMesh::default();
    }

    for i in 0..nx - 1 {
        for j in 0..ny - 1 {
            for k in 0..nz - 1 {
                let corners: [usize; 8] = std::array::from_fn(|c| {
                    grid.linear_index(i + (c & 1), j + ((c >> 1) & 1), k + ((c >> 2) & 1))
                });

                for tet in CUBE_TETRAHEDRA {
                    builder.tetrahedron(tet.map(|c| corners[c]));
                }
            }
        }
    }

    log::debug!(
        "extracted a level set of {} triangles from a {}x{}x{} grid",
        builder.indices.len(),
        nx,
        ny,
        nz
    );

    TriangleMesh::new(builder.vertices, builder.indices).unwrap_or_default()
}

#[cfg(test)]
mod test {
    use super::volume_grid_to_trimesh;
    use crate::bounding_volume::Aabb;
    use crate::math::Point;
    use crate::shape::VolumeGrid;

    #[test]
    fn sphere_level_set_is_closed_and_outward() {
        let bbox = Aabb::new(Point::new(-2.0, -2.0, -2.0), Point::new(2.0, 2.0, 2.0));
        let mut grid = VolumeGrid::new(bbox, [20, 20, 20]);
        for i in 0..20 {
            for j in 0..20 {
                for k in 0..20 {
                    let d = grid.cell_center(i, j, k).coords.norm() - 1.0;
                    grid.set(i, j, k, d).unwrap();
                }
            }
        }

        let mesh = volume_grid_to_trimesh(&grid, 0.0);
        assert!(mesh.is_watertight());
        let exact = 4.0 / 3.0 * std::f64::consts::PI;
        assert!((mesh.volume() - exact).abs() < 0.1 * exact);
    }

    #[test]
    fn flat_grids_have_no_surface() {
        let bbox = Aabb::new(Point::origin(), Point::new(1.0, 1.0, 1.0));
        let grid = VolumeGrid::new(bbox, [1, 5, 5]);
        assert!(volume_grid_to_trimesh(&grid, 0.0).is_empty());
    }
}

//! Signed distance fields sampled from meshes and primitives.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::bounding_volume::{Aabb, BoundingVolume};
use crate::error::GeometryError;
use crate::math::{Point, Real, Vector};
use crate::partitioning::Bvh;
use crate::query::{
    local_ray_intersection_with_triangle, mesh_point, primitive_point, DistanceOptions, Ray,
    RayCast,
};
use crate::shape::{Primitive, TriangleMesh, VolumeGrid};

const MAX_CELLS: usize = 1 << 27;

/// Directions of the inside/outside votes: the coordinate axes, slightly tilted so that rays
/// cast from lattice points do not run along mesh edges.
const PARITY_DIRECTIONS: [[Real; 3]; 3] = [
    [1.0, 0.001_31, 0.002_17],
    [0.001_73, 1.0, 0.001_01],
    [0.001_19, 0.001_57, 1.0],
];

/// A zero-filled grid of cubic cells of size `cell_size` covering `bbox` enlarged by `margin`
/// cells on each side.
fn lattice(bbox: &Aabb, cell_size: Real, margin: usize) -> Result<VolumeGrid, GeometryError> {
    if !(cell_size > 0.0) {
        return Err(GeometryError::InvalidParameter(format!(
            "the grid resolution must be positive, got {cell_size}"
        )));
    }

    let bbox = bbox.loosened(cell_size * margin as Real);
    let extents = bbox.extents();
    // Absorbs the rounding errors of extents that are a multiple of the cell size.
    let dims = [0, 1, 2].map(|d| ((extents[d] / cell_size * (1.0 - 1.0e-9)).ceil() as usize).max(1));

    if dims.iter().try_fold(1usize, |acc, n| acc.checked_mul(*n)).map_or(true, |n| n > MAX_CELLS) {
        return Err(GeometryError::InvalidParameter(format!(
            "a grid resolution of {cell_size} would need {dims:?} cells"
        )));
    }

    let maxs = bbox.mins + Vector::from(dims.map(|n| n as Real * cell_size));
    Ok(VolumeGrid::new(Aabb::new(bbox.mins, maxs), dims))
}

fn fill(grid: &mut VolumeGrid, value_at: impl Fn(&Point<Real>) -> Real + Sync) {
    let centers: Vec<_> = (0..grid.num_cells())
        .map(|id| {
            let [i, j, k] = grid.cell_coords(id);
            grid.cell_center(i, j, k)
        })
        .collect();

    #[cfg(feature = "parallel")]
    let values: Vec<Real> = centers.par_iter().map(&value_at).collect();
    #[cfg(not(feature = "parallel"))]
    let values: Vec<Real> = centers.iter().map(&value_at).collect();

    for (id, value) in values.into_iter().enumerate() {
        let [i, j, k] = grid.cell_coords(id);
        let _ = grid.set(i, j, k, value);
    }
}

/// Is `pt` inside a closed mesh? Majority vote of the crossing parities of three rays.
fn is_inside(mesh: &TriangleMesh, bvh: &Bvh, pt: &Point<Real>) -> bool {
    let votes = PARITY_DIRECTIONS
        .iter()
        .filter(|dir| {
            let ray = Ray::new(*pt, Vector::from(**dir));
            let crossings = bvh
                .leaves(|node| node.aabb().cast_local_ray(&ray, Real::MAX, true).is_some())
                .filter(|i| {
                    let tri = mesh.triangle(*i);
                    local_ray_intersection_with_triangle(&tri.a, &tri.b, &tri.c, &ray).is_some()
                })
                .count();
            crossings % 2 == 1
        })
        .count();

    votes >= 2
}

/// Samples the signed distance to a watertight mesh at the centers of cubic cells of size
/// `cell_size`, negative inside.
///
/// The grid covers the mesh box enlarged by two cells on each side.
pub fn trimesh_to_volume_grid(mesh: &TriangleMesh, cell_size: Real) -> Result<VolumeGrid, GeometryError> {
    if !mesh.is_watertight() {
        return Err(GeometryError::MalformedData(
            "only watertight meshes can be converted to volume grids".to_string(),
        ));
    }

    let mut grid = lattice(&mesh.local_aabb(), cell_size, 2)?;
    let bvh = Bvh::from_leaves(
        mesh.triangles()
            .enumerate()
            .map(|(i, tri)| (i as u32, tri.local_aabb())),
    );
    let opts = DistanceOptions::exact(Real::INFINITY);

    fill(&mut grid, |pt| {
        let dist = mesh_point(mesh, &bvh, pt, &opts).map_or(Real::MAX, |p| p.dist);
        if is_inside(mesh, &bvh, pt) {
            -dist
        } else {
            dist
        }
    });

    log::debug!(
        "sampled the distance to a mesh of {} triangles on a {:?} grid",
        mesh.num_triangles(),
        grid.dims()
    );
    Ok(grid)
}

/// Samples the signed distance to a primitive at the centers of cubic cells of size
/// `cell_size`, covering the primitive box enlarged by two cells on each side.
pub fn primitive_to_volume_grid(prim: &Primitive, cell_size: Real) -> Result<VolumeGrid, GeometryError> {
    let mut grid = lattice(&prim.local_aabb(), cell_size, 2)?;
    fill(&mut grid, |pt| primitive_point(prim, pt).dist);
    log::debug!("sampled a {} on a {:?} grid", prim.type_name(), grid.dims());
    Ok(grid)
}

#[cfg(test)]
mod test {
    use super::{primitive_to_volume_grid, trimesh_to_volume_grid};
    use crate::math::Point;
    use crate::shape::{Primitive, TriangleMesh};
    use crate::transformation::to_trimesh::aabb_to_trimesh;

    #[test]
    fn cube_distance_field() {
        let mesh = aabb_to_trimesh(&Point::origin(), &Point::new(1.0, 1.0, 1.0));
        let grid = trimesh_to_volume_grid(&mesh, 0.1).unwrap();
        assert_eq!(grid.dims(), [14, 14, 14]);

        // Cell (7, 7, 7) is centered at (0.55, 0.55, 0.55).
        assert_relative_eq!(grid.get(7, 7, 7).unwrap(), -0.45, epsilon = 1.0e-9);
        // Cell (0, 7, 7) is centered at (-0.15, 0.55, 0.55).
        assert_relative_eq!(grid.get(0, 7, 7).unwrap(), 0.15, epsilon = 1.0e-9);
    }

    #[test]
    fn open_meshes_are_rejected() {
        let mesh = TriangleMesh::new(
            vec![Point::origin(), Point::new(1.0, 0.0, 0.0), Point::new(0.0, 1.0, 0.0)],
            vec![[0, 1, 2]],
        )
        .unwrap();
        assert!(trimesh_to_volume_grid(&mesh, 0.1).is_err());
    }

    #[test]
    fn sphere_distance_field() {
        let sphere = Primitive::sphere(Point::origin(), 1.0);
        let grid = primitive_to_volume_grid(&sphere, 0.25).unwrap();
        assert!(grid.signed_distance(&Point::origin()) < -0.7);
        assert_relative_eq!(grid.signed_distance(&Point::new(1.0, 0.0, 0.0)), 0.0, epsilon = 0.05);
        assert!(primitive_to_volume_grid(&sphere, 0.0).is_err());
    }
}

//! Distance backends, one per pair of geometry variants.
//!
//! Every backend works in the frame of its first object, with the second one placed by
//! `pos12`, and ignores margins: those are applied by the dispatcher.

use crate::geometry::{GeometryData, StoredGeometry};
use crate::math::{Isometry, Real};
use crate::query::proximity::{DistanceOptions, Proximity};

pub(crate) use self::distance_mesh::mesh_point;
pub(crate) use self::distance_point::{
    grid_point, polyhedron_point, primitive_point, triangle_point,
};
pub(crate) use self::distance_primitive::{primitive_primitive, RoundCore};
pub(crate) use self::distance_support_map::triangle_triangle;

mod distance_convex_hull;
mod distance_mesh;
mod distance_point;
mod distance_point_cloud;
mod distance_primitive;
mod distance_support_map;
mod distance_volume_grid;

use self::distance_convex_hull::polyhedron_polyhedron;
use self::distance_mesh::{mesh_mesh, mesh_point_cloud, mesh_primitive};
use self::distance_point_cloud::{point_cloud_grid, point_cloud_point_cloud, point_cloud_primitive};
use self::distance_volume_grid::grid_primitive;

/// The closest points between two non-group geometries, `g2` being placed by `pos12` in the
/// frame of `g1`.
///
/// Returns `None` if they are at least `opts.max_dist` apart, if either is empty, or if the
/// pair has no distance backend.
pub(crate) fn local_distance(
    g1: &StoredGeometry,
    g2: &StoredGeometry,
    pos12: &Isometry<Real>,
    opts: &DistanceOptions,
) -> Option<Proximity> {
    use GeometryData as D;

    let max_dist = opts.max_dist;

    match (g1.data()?, g2.data()?) {
        (D::Primitive(p1), D::Primitive(p2)) => primitive_primitive(p1, p2, pos12, max_dist),
        (D::TriangleMesh(m1), D::TriangleMesh(m2)) => {
            mesh_mesh(m1, &*g1.bvh()?, m2, &*g2.bvh()?, pos12, opts)
        }
        (D::TriangleMesh(m), D::Primitive(p)) => mesh_primitive(m, &*g1.bvh()?, p, pos12, opts),
        (D::TriangleMesh(m), D::PointCloud(pc)) => mesh_point_cloud(m, &*g1.bvh()?, pc, pos12, opts),
        (D::PointCloud(pc), D::Primitive(p)) => {
            point_cloud_primitive(pc, &*g1.point_index()?, p, pos12, max_dist)
        }
        (D::PointCloud(pc), D::VolumeGrid(grid)) => point_cloud_grid(pc, grid, pos12, max_dist),
        (D::PointCloud(pc1), D::PointCloud(pc2)) => {
            point_cloud_point_cloud(pc1, pc2, &*g2.point_index()?, pos12, max_dist)
        }
        (D::VolumeGrid(grid), D::Primitive(p)) => grid_primitive(grid, p, pos12, max_dist),
        (D::ConvexHull(_), D::ConvexHull(_)) => {
            polyhedron_polyhedron(&*g1.polyhedron()?, &*g2.polyhedron()?, pos12, max_dist)
        }
        (D::Primitive(_), D::TriangleMesh(_))
        | (D::Primitive(_), D::PointCloud(_))
        | (D::Primitive(_), D::VolumeGrid(_))
        | (D::PointCloud(_), D::TriangleMesh(_))
        | (D::VolumeGrid(_), D::PointCloud(_)) => {
            local_distance(g2, g1, &pos12.inverse(), opts).map(|p| p.transform_by(pos12).flipped())
        }
        _ => None,
    }
}

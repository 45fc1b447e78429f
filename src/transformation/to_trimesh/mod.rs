//! Triangle mesh generation from the other geometry representations.
//!
//! Curved primitives are discretized with a target edge length. Volume grids are polygonized
//! at an iso-level by marching tetrahedra. Structured point clouds are triangulated along
//! their rows and columns.

pub use self::point_cloud_to_trimesh::point_cloud_to_trimesh;
pub use self::primitive_to_trimesh::{aabb_to_trimesh, primitive_to_trimesh, sphere_to_trimesh};
pub use self::volume_grid_to_trimesh::volume_grid_to_trimesh;

mod point_cloud_to_trimesh;
mod primitive_to_trimesh;
mod volume_grid_to_trimesh;

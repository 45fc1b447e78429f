//! Shapes supported by proxima3d.
//!
//! This module holds the passive data containers wrapped by a
//! [`Geometry`](crate::geometry::Geometry) ([`Primitive`], [`TriangleMesh`], [`PointCloud`],
//! [`VolumeGrid`], [`ConvexHull`]) as well as the convex building blocks used by the query
//! algorithms.

pub use self::convex_hull::ConvexHull;
pub use self::convex_polyhedron::ConvexPolyhedron;
pub use self::point_cloud::PointCloud;
pub use self::primitive::Primitive;
pub use self::segment::{Segment, SegmentPointLocation};
pub use self::support_map::SupportMap;
pub use self::triangle::{Triangle, TrianglePointLocation};
pub use self::trimesh::TriangleMesh;
pub use self::volume_grid::VolumeGrid;

mod convex_hull;
mod convex_polyhedron;
mod point_cloud;
mod primitive;
mod segment;
mod support_map;
mod triangle;
mod trimesh;
mod volume_grid;

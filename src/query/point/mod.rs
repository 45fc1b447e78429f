//! Point inclusion and projection.

pub use self::point_query::{PointProjection, PointQuery};

mod point_convex_polyhedron;
mod point_primitive;
mod point_query;
mod point_segment;
mod point_triangle;
mod point_volume_grid;

//! Application of the Separating Axis Theorem (SAT).
//!
//! Two convex polyhedra are disjoint iff their projections on one of the candidate axes (the
//! face normals of each polyhedron and the cross products of their edge directions) are
//! disjoint. When they intersect, the candidate axis with the largest (least negative)
//! separation gives the penetration depth and the contact normal.

pub use self::sat_polyhedron_polyhedron::polyhedron_polyhedron_find_max_separation;
pub use self::sat_support_map_support_map::support_map_support_map_compute_separation;

mod sat_polyhedron_polyhedron;
mod sat_support_map_support_map;

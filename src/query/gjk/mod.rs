//! The GJK algorithm for distance computation between convex shapes.

pub use self::cso_point::CSOPoint;
pub use self::gjk::{closest_points, eps_tol, initial_simplex, project_point, GJKResult};
pub use self::special_support_maps::ConstantPoint;
pub use self::voronoi_simplex::VoronoiSimplex;

mod cso_point;
mod gjk;
mod special_support_maps;
mod voronoi_simplex;

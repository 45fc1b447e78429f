//! Ray-casting related definitions and implementations.

pub use self::ray::{Ray, RayCast};
pub use self::ray_ball::{ray_toi_with_ball, ray_toi_with_capsule};
pub use self::ray_triangle::local_ray_intersection_with_triangle;

mod ray;
mod ray_aabb;
mod ray_ball;
mod ray_convex_polyhedron;
mod ray_primitive;
mod ray_triangle;
mod ray_volume_grid;

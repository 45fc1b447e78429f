//! Proximity queries between geometries.
//!
//! The entry points are the methods of [`Geometry`](crate::geometry::Geometry): collision
//! tests, distances, point distances, ray casts, contacts and support points. They are
//! routed here to a backend selected from the variants of their operands.
//!
//! Lower-level building blocks are exposed as well:
//!
//! * [`RayCast`] for ray-casting on individual shapes.
//! * [`PointQuery`] for point projection on individual shapes.
//! * the [`gjk`] and [`sat`] modules for convex-convex queries.

pub use self::point::{PointProjection, PointQuery};
pub use self::ray::{
    local_ray_intersection_with_triangle, ray_toi_with_ball, ray_toi_with_capsule, Ray, RayCast,
};
pub use self::settings::{ContactQueryResult, DistanceQueryResult, DistanceQuerySettings};

pub(crate) use self::contact::query_contacts;
pub(crate) use self::distance::{mesh_point, primitive_point};
pub(crate) use self::dispatcher::{
    point_distance, query_collides, query_distance, ray_cast, support,
};
pub(crate) use self::proximity::{DistanceOptions, Posed};

mod contact;
mod dispatcher;
mod distance;
pub mod gjk;
mod point;
mod proximity;
mod ray;
pub mod sat;
mod settings;

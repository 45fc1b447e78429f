//! The geometry handle and the versioned storage it wraps.
//!
//! A [`Geometry`] holds (or aliases) a [`StoredGeometry`], which pairs a [`GeometryData`]
//! with a version counter and the [`AccelerationCache`] built from that version. Handles
//! also carry the current transform and the collision margin applied to every query.

pub use self::acceleration_cache::{AccelerationCache, CacheRef};
pub use self::geometry::Geometry;
pub use self::geometry_data::GeometryData;
pub use self::geometry_type::GeometryType;
pub use self::stored_geometry::{SharedGeometry, StoredGeometry};

mod acceleration_cache;
mod geometry;
mod geometry_data;
mod geometry_queries;
mod geometry_type;
mod stored_geometry;

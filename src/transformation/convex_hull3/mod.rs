pub use self::convex_hull::{convex_hull, try_convex_hull};
pub use self::error::ConvexHullError;
use self::hull_facet::HullFacet;

mod convex_hull;
mod error;
mod hull_facet;

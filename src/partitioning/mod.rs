//! Spatial partitioning tools.

pub use self::bvh::{Bvh, BvhLeafCost, BvhNode, BvhNodeWide, Leaves, TraversalAction};
pub use self::point_index::PointIndex;

mod bvh;
mod point_index;

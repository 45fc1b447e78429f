pub use bvh_traverse::{BvhLeafCost, Leaves, TraversalAction};
pub use bvh_tree::{Bvh, BvhNode, BvhNodeWide};

mod bvh_binned_build;
mod bvh_queries;
mod bvh_traverse;
mod bvh_traverse_bvtt;
mod bvh_tree;

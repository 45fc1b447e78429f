use super::bvh_tree::BvhNodeWide;
use super::{Bvh, BvhNode};
use crate::bounding_volume::{Aabb, BoundingVolume};
use crate::math::Real;

impl Bvh {
    /// Builds the subtree rooted at `target_node_id` from `leaves`, splitting them along the
    /// axis of largest centroid spread with a binned surface area heuristic.
    pub(super) fn rebuild_range_binned(&mut self, target_node_id: u32, leaves: &mut [BvhNode]) {
        const NUM_BINS: usize = 8;
        const BIN_EPSILON: Real = 1.0e-5;

        let mut bins = [BvhBin::default(); NUM_BINS];

        assert!(leaves.len() > 1);

        let centroids: Vec<_> = leaves.iter().map(|node| node.center()).collect();
        let centroid_aabb = Aabb::from_points(&centroids);
        let bins_axis = centroid_aabb.extents().imax();
        let bins_range = [centroid_aabb.mins[bins_axis], centroid_aabb.maxs[bins_axis]];

        // Compute bins characteristics.
        let width = bins_range[1] - bins_range[0];
        let k1 = if width > 0.0 {
            NUM_BINS as Real * (1.0 - BIN_EPSILON) / width
        } else {
            0.0
        };
        let k0 = bins_range[0];
        let bin_of = |node: &BvhNode| ((k1 * (node.center()[bins_axis] - k0)) as usize).min(NUM_BINS - 1);

        for leaf in &*leaves {
            let bin = &mut bins[bin_of(leaf)];
            bin.aabb.merge(&leaf.aabb());
            bin.leaf_count += 1;
        }

        // Select the best splitting plane (there are NUM_BINS - 1 splitting planes) based on SAH.
        let mut right_merges = bins;
        let mut right_acc = bins[NUM_BINS - 1];

        for i in 1..NUM_BINS - 1 {
            right_acc.aabb.merge(&right_merges[NUM_BINS - 1 - i].aabb);
            right_acc.leaf_count += right_merges[NUM_BINS - 1 - i].leaf_count;
            right_merges[NUM_BINS - 1 - i] = right_acc;
        }

        let mut best_cost = Real::MAX;
        let mut best_plane = 0;
        let mut left_merge = bins[0];
        let mut best_leaf_count = bins[0].leaf_count;

        for i in 0..NUM_BINS - 1 {
            let right = &right_merges[i + 1];

            let cost = left_merge.cost() + right.cost();
            if cost < best_cost {
                best_cost = cost;
                best_plane = i;
                best_leaf_count = left_merge.leaf_count;
            }

            left_merge.aabb.merge(&bins[i + 1].aabb);
            left_merge.leaf_count += bins[i + 1].leaf_count;
        }

        let mut mid = best_leaf_count as usize;

        // In degenerate cases where all the node end up on the same bin,
        // just split the range in two.
        if mid == 0 || mid == leaves.len() {
            mid = leaves.len() / 2;
        } else {
            leaves.sort_by_key(|leaf| bin_of(leaf) > best_plane);
        }

        let (left_leaves, right_leaves) = leaves.split_at_mut(mid);

        let left = self.build_child(left_leaves);
        let right = self.build_child(right_leaves);
        let target = &mut self.nodes[target_node_id as usize];
        target.left = left;
        target.right = right;
    }

    fn build_child(&mut self, leaves: &mut [BvhNode]) -> BvhNode {
        if leaves.len() == 1 {
            leaves[0]
        } else {
            let child_id = self.nodes.len() as u32;
            self.nodes.push(BvhNodeWide::zeros());
            self.rebuild_range_binned(child_id, leaves);
            self.nodes[child_id as usize].merged(child_id)
        }
    }
}

#[derive(Copy, Clone, Debug)]
struct BvhBin {
    aabb: Aabb,
    leaf_count: u32,
}

impl BvhBin {
    fn cost(&self) -> Real {
        if self.leaf_count == 0 {
            0.0
        } else {
            self.aabb.half_area() * self.leaf_count as Real
        }
    }
}

impl Default for BvhBin {
    fn default() -> Self {
        Self {
            aabb: Aabb::new_invalid(),
            leaf_count: 0,
        }
    }
}

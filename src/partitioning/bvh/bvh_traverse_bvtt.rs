use super::bvh_traverse::BvhLeafCost;
use super::{Bvh, BvhNode};
use crate::bounding_volume::{Aabb, BoundingVolume};
use crate::math::{Isometry, Real};
use ordered_float::OrderedFloat;
use smallvec::SmallVec;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

const TRAVERSAL_STACK_SIZE: usize = 32;

/// A pair of nodes waiting in the priority queue of [`Bvh::find_best_pair`].
struct PendingPair {
    cost: OrderedFloat<Real>,
    // Insertion order, so that equal costs are popped first-in first-out.
    seq: u64,
    node1: BvhNode,
    node2: BvhNode,
}

impl PartialEq for PendingPair {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for PendingPair {}

impl PartialOrd for PendingPair {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PendingPair {
    // Reversed: `BinaryHeap` is a max-heap and we pop the cheapest pair first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl Bvh {
    fn node_children(&self, node: &BvhNode) -> [&BvhNode; 2] {
        self.nodes[node.children as usize].as_array()
    }

    /*
     * Traversal of a tree against another tree.
     */
    /// Traverses the Bounding Volume Test Tree of `self` against `other`.
    ///
    /// `other` is expressed in the local frame of `self` through `pos12`. The closure `f` is
    /// called on each pair of leaves whose AABBs intersect once both are enlarged by `margin`.
    pub fn traverse_bvtt(
        &self,
        other: &Bvh,
        pos12: &Isometry<Real>,
        margin: Real,
        f: &mut impl FnMut(u32, u32),
    ) {
        let mut stack: SmallVec<[(&BvhNode, &BvhNode); TRAVERSAL_STACK_SIZE]> = SmallVec::new();

        for node1 in self.root_children() {
            for node2 in other.root_children() {
                stack.push((node1, node2));
            }
        }

        while let Some((node1, node2)) = stack.pop() {
            let aabb1 = node1.aabb().loosened(margin);
            let aabb2 = node2.aabb().transform_by(pos12).loosened(margin);

            if !aabb1.intersects(&aabb2) {
                continue;
            }

            match (node1.is_leaf(), node2.is_leaf()) {
                (true, true) => f(node1.children, node2.children),
                (false, true) => {
                    for child in self.node_children(node1) {
                        stack.push((child, node2));
                    }
                }
                (true, false) => {
                    for child in other.node_children(node2) {
                        stack.push((node1, child));
                    }
                }
                (false, false) => {
                    // Descend into the largest node first.
                    if aabb1.half_area() >= aabb2.half_area() {
                        for child in self.node_children(node1) {
                            stack.push((child, node2));
                        }
                    } else {
                        for child in other.node_children(node2) {
                            stack.push((node1, child));
                        }
                    }
                }
            }
        }
    }

    /// Best-first search for the pair of leaves (one from `self`, one from `other`) with the
    /// smallest cost.
    ///
    /// `other` is expressed in the local frame of `self` through `pos12`. `aabb_cost` is given
    /// the AABB of a node of `self` and the AABB of a node of `other` (already expressed in the
    /// frame of `self`) and must return a lower bound of the cost of every leaf pair below
    /// them. Only pairs with a cost strictly smaller than `max_cost` are reported, and the
    /// first minimal pair found wins ties.
    pub fn find_best_pair<L: BvhLeafCost>(
        &self,
        other: &Bvh,
        pos12: &Isometry<Real>,
        max_cost: Real,
        aabb_cost: impl Fn(&Aabb, &Aabb) -> Real,
        mut leaf_cost: impl FnMut(u32, u32, Real) -> Option<L>,
    ) -> Option<((u32, u32), L)> {
        let mut queue = BinaryHeap::new();
        let mut seq = 0u64;
        let mut best = None;
        let mut best_cost = max_cost;

        let mut push = |queue: &mut BinaryHeap<PendingPair>,
                        node1: &BvhNode,
                        node2: &BvhNode,
                        best_cost: Real| {
            let cost = aabb_cost(&node1.aabb(), &node2.aabb().transform_by(pos12));
            if cost < best_cost {
                queue.push(PendingPair {
                    cost: OrderedFloat(cost),
                    seq,
                    node1: *node1,
                    node2: *node2,
                });
                seq += 1;
            }
        };

        for node1 in self.root_children() {
            for node2 in other.root_children() {
                push(&mut queue, node1, node2, best_cost);
            }
        }

        while let Some(pair) = queue.pop() {
            if pair.cost.0 >= best_cost {
                break;
            }

            let node1 = &pair.node1;
            let node2 = &pair.node2;

            match (node1.is_leaf(), node2.is_leaf()) {
                (true, true) => {
                    if let Some(val) = leaf_cost(node1.children, node2.children, best_cost) {
                        if val.cost() < best_cost {
                            best_cost = val.cost();
                            best = Some(((node1.children, node2.children), val));
                        }
                    }
                }
                (false, true) => {
                    for child in self.node_children(node1) {
                        push(&mut queue, child, node2, best_cost);
                    }
                }
                (true, false) => {
                    for child in other.node_children(node2) {
                        push(&mut queue, node1, child, best_cost);
                    }
                }
                (false, false) => {
                    if node1.aabb().half_area() >= node2.aabb().half_area() {
                        for child in self.node_children(node1) {
                            push(&mut queue, child, node2, best_cost);
                        }
                    } else {
                        for child in other.node_children(node2) {
                            push(&mut queue, node1, child, best_cost);
                        }
                    }
                }
            }
        }

        best
    }
}

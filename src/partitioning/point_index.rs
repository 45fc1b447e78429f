use crate::bounding_volume::Aabb;
use crate::math::{Point, Real};
use ordered_float::OrderedFloat;
use rstar::primitives::GeomWithData;
use rstar::{ParentNode, RTree, RTreeNode, SelectionFunction, AABB};
use std::cmp::Reverse;
use std::collections::BinaryHeap;

type IndexedPoint = GeomWithData<[Real; 3], u32>;

fn to_point(p: &[Real; 3]) -> Point<Real> {
    Point::new(p[0], p[1], p[2])
}

fn envelope_to_aabb(envelope: &AABB<[Real; 3]>) -> Aabb {
    Aabb::new(to_point(&envelope.lower()), to_point(&envelope.upper()))
}

/// Selects the points inside of a ball.
struct SelectInBall {
    center: Point<Real>,
    radius: Real,
}

impl SelectionFunction<IndexedPoint> for SelectInBall {
    fn should_unpack_parent(&self, envelope: &AABB<[Real; 3]>) -> bool {
        envelope_to_aabb(envelope).distance_to_local_point(&self.center) <= self.radius
    }

    fn should_unpack_leaf(&self, leaf: &IndexedPoint) -> bool {
        na::distance(&to_point(leaf.geom()), &self.center) <= self.radius
    }
}

/// Selects the points inside of an AABB.
struct SelectInAabb(Aabb);

impl SelectionFunction<IndexedPoint> for SelectInAabb {
    fn should_unpack_parent(&self, envelope: &AABB<[Real; 3]>) -> bool {
        let envelope = envelope_to_aabb(envelope);
        (0..3).all(|i| envelope.mins[i] <= self.0.maxs[i] && envelope.maxs[i] >= self.0.mins[i])
    }

    fn should_unpack_leaf(&self, leaf: &IndexedPoint) -> bool {
        self.0.contains_local_point(&to_point(leaf.geom()))
    }
}

/// A spatial index over the points of a point cloud, backed by an R*-tree.
#[derive(Clone, Debug, Default)]
pub struct PointIndex {
    tree: RTree<IndexedPoint>,
}

impl PointIndex {
    /// Bulk-loads an index over `points`. Each point is identified by its position in the slice.
    pub fn new(points: &[Point<Real>]) -> Self {
        let entries = points
            .iter()
            .enumerate()
            .map(|(i, pt)| IndexedPoint::new([pt.x, pt.y, pt.z], i as u32))
            .collect();
        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// The number of indexed points.
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Is this index empty?
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// The indexed point closest to `pt`, with its distance to `pt`.
    ///
    /// Only points strictly closer than `max_dist` are considered.
    pub fn nearest(&self, pt: &Point<Real>, max_dist: Real) -> Option<(u32, Real)> {
        let mut best = None;
        let mut best_dist = max_dist;
        let mut nodes: Vec<&ParentNode<IndexedPoint>> = vec![self.tree.root()];
        let mut queue = BinaryHeap::new();
        queue.push(Reverse((OrderedFloat(0.0), 0)));

        while let Some(Reverse((OrderedFloat(lower_bound), id))) = queue.pop() {
            if lower_bound >= best_dist {
                break;
            }

            let node = nodes[id];
            for child in node.children() {
                match child {
                    RTreeNode::Leaf(entry) => {
                        let dist = na::distance(pt, &to_point(entry.geom()));
                        if dist < best_dist {
                            best_dist = dist;
                            best = Some((entry.data, dist));
                        }
                    }
                    RTreeNode::Parent(parent) => {
                        let dist = envelope_to_aabb(&parent.envelope()).distance_to_local_point(pt);
                        if dist < best_dist {
                            queue.push(Reverse((OrderedFloat(dist), nodes.len())));
                            nodes.push(parent);
                        }
                    }
                }
            }
        }

        best
    }

    /// Iterates through the indexed points at distance at most `radius` from `pt`.
    pub fn within_distance(&self, pt: &Point<Real>, radius: Real) -> impl Iterator<Item = u32> + '_ {
        self.tree
            .locate_with_selection_function(SelectInBall {
                center: *pt,
                radius,
            })
            .map(|entry| entry.data)
    }

    /// Iterates through the indexed points contained in `aabb`.
    pub fn in_aabb(&self, aabb: &Aabb) -> impl Iterator<Item = u32> + '_ {
        self.tree
            .locate_with_selection_function(SelectInAabb(*aabb))
            .map(|entry| entry.data)
    }
}

use crate::bounding_volume::{Aabb, BoundingVolume};
use crate::math::{Point, Real};

/// A node (internal or leaf) of a BVH.
///
/// A leaf stores, in `children`, the index of the primitive it bounds. An internal node
/// stores the index of the [`BvhNodeWide`] holding its two children.
#[derive(Copy, Clone, Debug)]
pub struct BvhNode {
    pub(super) mins: Point<Real>,
    pub(super) children: u32,
    pub(super) maxs: Point<Real>,
    pub(super) leaf_count: u32,
}

impl BvhNode {
    #[inline(always)]
    pub(super) fn zeros() -> Self {
        Self {
            mins: Point::origin(),
            children: 0,
            maxs: Point::origin(),
            leaf_count: 0,
        }
    }

    /// Initializes a leaf.
    #[inline(always)]
    pub fn leaf(aabb: Aabb, leaf_data: u32) -> BvhNode {
        Self {
            mins: aabb.mins,
            maxs: aabb.maxs,
            children: leaf_data,
            leaf_count: 1,
        }
    }

    /// If this node is a leaf, returns its associated index provided at construction time.
    #[inline(always)]
    pub fn leaf_data(&self) -> Option<u32> {
        self.is_leaf().then_some(self.children)
    }

    /// Is this node a leaf?
    #[inline(always)]
    pub fn is_leaf(&self) -> bool {
        self.leaf_count == 1
    }

    /// The number of leaves under this node.
    #[inline(always)]
    pub fn leaf_count(&self) -> u32 {
        self.leaf_count
    }

    #[inline(always)]
    pub(super) fn merged(&self, other: &Self, children: u32) -> Self {
        Self {
            mins: self.mins.inf(&other.mins),
            children,
            maxs: self.maxs.sup(&other.maxs),
            leaf_count: self.leaf_count + other.leaf_count,
        }
    }

    /// The AABB bounding this node.
    #[inline]
    pub fn aabb(&self) -> Aabb {
        Aabb {
            mins: self.mins,
            maxs: self.maxs,
        }
    }

    /// The center of the AABB bounding this node.
    #[inline]
    pub fn center(&self) -> Point<Real> {
        na::center(&self.mins, &self.maxs)
    }

    /// Tests if the AABBs of two nodes intersect.
    #[inline]
    pub fn intersects(&self, other: &Self) -> bool {
        self.aabb().intersects(&other.aabb())
    }
}

/// A pair of tree nodes.
///
/// Both `left` and `right` are valid except when the tree contains a single leaf, in which
/// case only `left` is.
#[derive(Copy, Clone, Debug)]
pub struct BvhNodeWide {
    pub(super) left: BvhNode,
    pub(super) right: BvhNode,
}

impl BvhNodeWide {
    #[inline(always)]
    pub(super) fn zeros() -> Self {
        Self {
            left: BvhNode::zeros(),
            right: BvhNode::zeros(),
        }
    }

    /// The two nodes in `self` seen as an array.
    #[inline(always)]
    pub fn as_array(&self) -> [&BvhNode; 2] {
        [&self.left, &self.right]
    }

    /// Merges both nodes into a single node pointing at `my_id`.
    #[inline(always)]
    pub(super) fn merged(&self, my_id: u32) -> BvhNode {
        self.left.merged(&self.right, my_id)
    }
}

/// A Bounding Volume Hierarchy over a set of primitives identified by `u32` indices.
///
/// The tree is binary, built top-down with a binned surface area heuristic, and immutable
/// once built: geometries rebuild it from scratch when their data change.
#[derive(Clone, Debug, Default)]
pub struct Bvh {
    pub(super) nodes: Vec<BvhNodeWide>,
}

impl Bvh {
    /// Builds a BVH from the AABBs of its leaves.
    pub fn from_leaves(leaves: impl IntoIterator<Item = (u32, Aabb)>) -> Self {
        let mut leaves: Vec<_> = leaves
            .into_iter()
            .map(|(id, aabb)| BvhNode::leaf(aabb, id))
            .collect();
        let mut result = Bvh::default();

        match leaves.len() {
            0 => {}
            1 => {
                let mut root = BvhNodeWide::zeros();
                root.left = leaves[0];
                result.nodes.push(root);
            }
            _ => {
                result.nodes.push(BvhNodeWide::zeros());
                result.rebuild_range_binned(0, &mut leaves);
            }
        }

        result
    }

    /// Does this tree contain no leaf?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The number of leaves of this tree.
    pub fn leaf_count(&self) -> u32 {
        self.nodes
            .first()
            .map(|root| root.left.leaf_count + root.right.leaf_count)
            .unwrap_or(0)
    }

    /// The AABB bounding everything in this tree.
    pub fn root_aabb(&self) -> Aabb {
        match self.nodes.first() {
            None => Aabb::new_invalid(),
            Some(root) if root.right.leaf_count == 0 => root.left.aabb(),
            Some(root) => root.left.aabb().merged(&root.right.aabb()),
        }
    }

    /// The nodes that descend from the root, i.e. `left` and, if present, `right`.
    pub(super) fn root_children(&self) -> impl Iterator<Item = &BvhNode> {
        self.nodes
            .first()
            .into_iter()
            .flat_map(|root| root.as_array())
            .filter(|node| node.leaf_count > 0)
    }
}

use crate::bounding_volume::Aabb;
use alloc::vec::Vec;
use core::ops::{Deref, DerefMut, Index, IndexMut};

/// The role of a node inside of a binary hierarchy.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub enum BvhNodeKind {
    /// A node with exactly two children, stored at `first_child` and `first_child + 1`.
    Inner {
        /// Index of the first child in the node storage.
        first_child: u32,
    },
    /// A terminal node referencing the contiguous range `first..first + count` of the leaf
    /// storage of its tree.
    Leaf {
        /// Offset of the first primitive of this leaf.
        first: u32,
        /// Number of primitives of this leaf.
        count: u32,
    },
}

/// A node that can be written by the top-down construction driver.
pub trait TreeNode: Clone + Default {
    /// The bounding volume stored in each node.
    type Bounds: Clone;

    /// An inner node whose children are at `first_child` and `first_child + 1`.
    fn inner(bounds: Self::Bounds, first_child: u32) -> Self;

    /// A leaf node covering `count` primitives starting at `first`.
    fn leaf(bounds: Self::Bounds, first: u32, count: u32) -> Self;

    /// The bounding volume of this node.
    fn bounds(&self) -> &Self::Bounds;

    /// Whether this node is an inner node or a leaf, with its indices.
    fn kind(&self) -> BvhNodeKind;
}

/// The node (internal or leaf) of a BVH.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct BvhNode {
    pub(super) aabb: Aabb,
    pub(super) kind: BvhNodeKind,
}

impl Default for BvhNode {
    fn default() -> Self {
        Self::leaf(Aabb::new_invalid(), 0, 0)
    }
}

impl BvhNode {
    /// The AABB of this node.
    #[inline]
    pub fn aabb(&self) -> &Aabb {
        &self.aabb
    }

    /// Is this node a leaf?
    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, BvhNodeKind::Leaf { .. })
    }

    /// The primitive range `(first, count)` of this node, if it is a leaf.
    #[inline]
    pub fn leaf_range(&self) -> Option<(u32, u32)> {
        match self.kind {
            BvhNodeKind::Leaf { first, count } => Some((first, count)),
            BvhNodeKind::Inner { .. } => None,
        }
    }

    /// The index of the first child of this node, if it is an inner node.
    #[inline]
    pub fn first_child(&self) -> Option<u32> {
        match self.kind {
            BvhNodeKind::Inner { first_child } => Some(first_child),
            BvhNodeKind::Leaf { .. } => None,
        }
    }
}

impl TreeNode for BvhNode {
    type Bounds = Aabb;

    #[inline]
    fn inner(aabb: Aabb, first_child: u32) -> Self {
        Self {
            aabb,
            kind: BvhNodeKind::Inner { first_child },
        }
    }

    #[inline]
    fn leaf(aabb: Aabb, first: u32, count: u32) -> Self {
        Self {
            aabb,
            kind: BvhNodeKind::Leaf { first, count },
        }
    }

    #[inline]
    fn bounds(&self) -> &Aabb {
        &self.aabb
    }

    #[inline]
    fn kind(&self) -> BvhNodeKind {
        self.kind
    }
}

/// The append-only node storage of a tree. The root, if any, is at index 0.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct NodeVec<N>(pub(crate) Vec<N>);

impl<N> Default for NodeVec<N> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<N: TreeNode> NodeVec<N> {
    /// Appends two default nodes and returns the index of the first one.
    #[inline]
    pub fn push_pair(&mut self) -> u32 {
        let first = self.0.len() as u32;
        self.0.push(N::default());
        self.0.push(N::default());
        first
    }
}

impl<N> Deref for NodeVec<N> {
    type Target = Vec<N>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<N> DerefMut for NodeVec<N> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<N> Index<u32> for NodeVec<N> {
    type Output = N;

    #[inline(always)]
    fn index(&self, index: u32) -> &Self::Output {
        &self.0[index as usize]
    }
}

impl<N> IndexMut<u32> for NodeVec<N> {
    #[inline(always)]
    fn index_mut(&mut self, index: u32) -> &mut Self::Output {
        &mut self.0[index as usize]
    }
}

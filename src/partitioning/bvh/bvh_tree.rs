use super::bvh_binned_build::BinnedSahBuilder;
use super::bvh_build_top_down::{build_top_down, BuildSummary, BvhBuildError};
use super::bvh_median_build::MedianSplitBuilder;
use super::bvh_node::{BvhNode, BvhNodeKind, NodeVec, TreeNode};
use crate::bounding_volume::Aabb;
use crate::shape::Primitive;
use alloc::vec::Vec;

/// The split policy used by the convenience constructors of the trees.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum BvhBuildStrategy {
    /// Splits every set of primitives at the median of their centroids along the axis where
    /// the centroids are the most spread.
    Median,
    /// Splits every set of primitives with a binned surface area heuristic.
    #[default]
    BinnedSah,
    /// Like [`Self::BinnedSah`], but may also split primitives straddling the splitting plane
    /// between both children. Trees storing their primitives fall back to [`Self::BinnedSah`].
    SpatialSah,
}

impl BvhBuildStrategy {
    /// Builds `tree` with the builder matching this strategy.
    ///
    /// See [`build_top_down`].
    pub fn build<P, T>(
        self,
        tree: &mut T,
        primitives: &[P],
        max_leaf_size: usize,
    ) -> Result<BuildSummary, BvhBuildError>
    where
        P: Primitive + Clone,
        T: BvhTree<P>,
        T::Node: TreeNode<Bounds = Aabb>,
    {
        match self {
            Self::Median => build_top_down(
                tree,
                &mut MedianSplitBuilder::default(),
                primitives,
                max_leaf_size,
            ),
            Self::BinnedSah => build_top_down(
                tree,
                &mut BinnedSahBuilder::default(),
                primitives,
                max_leaf_size,
            ),
            Self::SpatialSah => build_top_down(
                tree,
                &mut BinnedSahBuilder::default().with_spatial_splits(true),
                primitives,
                max_leaf_size,
            ),
        }
    }
}

/// Mutable access to the storage referenced by the leaves of a tree.
pub enum LeafStorageMut<'a, P> {
    /// The leaves reference ranges of this index list, which itself references the
    /// primitive collection the tree was built from.
    Indices(&'a mut Vec<u32>),
    /// The leaves reference ranges of this reordered copy of the primitives.
    Primitives(&'a mut Vec<P>),
}

/// A tree that can be built by [`build_top_down`].
pub trait BvhTree<P> {
    /// The node type of this tree.
    type Node: TreeNode;

    /// `true` if the leaves reference an index list, `false` if they reference a reordered
    /// copy of the primitives.
    const IS_INDEXED: bool;

    /// Removes every node and leaf entry, and reserves room for `capacity` nodes.
    fn clear(&mut self, capacity: usize);

    /// The node storage and the leaf storage of this tree.
    fn storage_mut(&mut self) -> (&mut NodeVec<Self::Node>, LeafStorageMut<'_, P>);
}

/// A bounding volume hierarchy whose leaves reference a list of primitive indices.
///
/// The primitives themselves are not stored: the tree refers to them by their position in the
/// slice it was built from. With spatial splits, a primitive may be referenced by several
/// leaves.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct IndexedBvh<N = BvhNode> {
    pub(super) nodes: NodeVec<N>,
    pub(super) indices: Vec<u32>,
}

impl<P, N: TreeNode> BvhTree<P> for IndexedBvh<N> {
    type Node = N;
    const IS_INDEXED: bool = true;

    fn clear(&mut self, capacity: usize) {
        self.nodes.clear();
        self.nodes.reserve(capacity);
        self.indices.clear();
    }

    fn storage_mut(&mut self) -> (&mut NodeVec<N>, LeafStorageMut<'_, P>) {
        (&mut self.nodes, LeafStorageMut::Indices(&mut self.indices))
    }
}

impl IndexedBvh {
    /// Builds a hierarchy over `primitives` with the given strategy.
    ///
    /// A `max_leaf_size` of zero selects the default leaf size. Building an indexed hierarchy
    /// never fails in practice: the error only exists for trees storing their primitives.
    pub fn from_primitives<P: Primitive + Clone>(
        strategy: BvhBuildStrategy,
        primitives: &[P],
        max_leaf_size: usize,
    ) -> Result<Self, BvhBuildError> {
        let mut result = Self::default();
        let _ = strategy.build(&mut result, primitives, max_leaf_size)?;
        Ok(result)
    }
}

impl<N: TreeNode> IndexedBvh<N> {
    /// An empty hierarchy.
    pub fn new() -> Self {
        Self {
            nodes: NodeVec::default(),
            indices: Vec::new(),
        }
    }

    /// The nodes of this tree. The root is at index 0.
    #[inline]
    pub fn nodes(&self) -> &[N] {
        &self.nodes
    }

    /// The primitive indices referenced by the leaf ranges.
    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Does this tree not contain any node?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The bounding volume of the root, if the tree is not empty.
    pub fn root_bounds(&self) -> Option<&N::Bounds> {
        self.nodes.first().map(|root| root.bounds())
    }

    /// The primitive indices stored in the leaf `node`.
    ///
    /// Returns an empty slice if `node` is an inner node.
    pub fn leaf_indices(&self, node: &N) -> &[u32] {
        match node.kind() {
            BvhNodeKind::Leaf { first, count } => {
                &self.indices[first as usize..(first + count) as usize]
            }
            BvhNodeKind::Inner { .. } => &[],
        }
    }
}

/// A bounding volume hierarchy that owns a copy of its primitives, reordered so that each leaf
/// references a contiguous range of them.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct SoupBvh<P, N = BvhNode> {
    pub(super) nodes: NodeVec<N>,
    pub(super) primitives: Vec<P>,
}

impl<P, N> Default for SoupBvh<P, N> {
    fn default() -> Self {
        Self {
            nodes: NodeVec::default(),
            primitives: Vec::new(),
        }
    }
}

impl<P, N: TreeNode> BvhTree<P> for SoupBvh<P, N> {
    type Node = N;
    const IS_INDEXED: bool = false;

    fn clear(&mut self, capacity: usize) {
        self.nodes.clear();
        self.nodes.reserve(capacity);
        self.primitives.clear();
    }

    fn storage_mut(&mut self) -> (&mut NodeVec<N>, LeafStorageMut<'_, P>) {
        (
            &mut self.nodes,
            LeafStorageMut::Primitives(&mut self.primitives),
        )
    }
}

impl<P: Primitive + Clone> SoupBvh<P> {
    /// Builds a hierarchy over a reordered copy of `primitives` with the given strategy.
    ///
    /// A `max_leaf_size` of zero selects the default leaf size.
    pub fn from_primitives(
        strategy: BvhBuildStrategy,
        primitives: &[P],
        max_leaf_size: usize,
    ) -> Result<Self, BvhBuildError> {
        let mut result = Self::default();
        let _ = strategy.build(&mut result, primitives, max_leaf_size)?;
        Ok(result)
    }
}

impl<P, N: TreeNode> SoupBvh<P, N> {
    /// An empty hierarchy.
    pub fn new() -> Self {
        Self::default()
    }

    /// The nodes of this tree. The root is at index 0.
    #[inline]
    pub fn nodes(&self) -> &[N] {
        &self.nodes
    }

    /// The primitives, in leaf order.
    #[inline]
    pub fn primitives(&self) -> &[P] {
        &self.primitives
    }

    /// Takes the reordered primitives out of this tree, leaving it without any primitive.
    pub fn into_primitives(self) -> Vec<P> {
        self.primitives
    }

    /// Does this tree not contain any node?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The bounding volume of the root, if the tree is not empty.
    pub fn root_bounds(&self) -> Option<&N::Bounds> {
        self.nodes.first().map(|root| root.bounds())
    }

    /// The primitives stored in the leaf `node`.
    ///
    /// Returns an empty slice if `node` is an inner node.
    pub fn leaf_primitives(&self, node: &N) -> &[P] {
        match node.kind() {
            BvhNodeKind::Leaf { first, count } => {
                &self.primitives[first as usize..(first + count) as usize]
            }
            BvhNodeKind::Inner { .. } => &[],
        }
    }
}

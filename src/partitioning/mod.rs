//! Spatial partitioning tools.
//!
//! Bounding volume hierarchies are built top-down by [`build_top_down`], which repeatedly asks
//! a pluggable [`BvhBuilder`] to split sets of primitives. The resulting [`IndexedBvh`] refers
//! to the primitives by index, while a [`SoupBvh`] stores a copy of them reordered to match its
//! leaves.

pub use self::bvh::{
    build_top_down, BinnedSahBuilder, BuildSummary, BuilderLeaf, BvhBuildError, BvhBuildStrategy,
    BvhBuilder, BvhNode, BvhNodeKind, BvhTree, IndexedBvh, LeafStorageMut, Leaves,
    MedianSplitBuilder, NodeVec, PrimitiveRef, RangeLeaf, RefSetLeaf, SoupBvh, SplitOptions,
    TreeNode, DEFAULT_MAX_LEAF_SIZE, MAX_BINS,
};

mod bvh;

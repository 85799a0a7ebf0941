pub use bvh_binned_build::{BinnedSahBuilder, RefSetLeaf, MAX_BINS};
pub use bvh_build_top_down::{
    build_top_down, BuildSummary, BvhBuildError, DEFAULT_MAX_LEAF_SIZE,
};
pub use bvh_builder::{BuilderLeaf, BvhBuilder, PrimitiveRef, SplitOptions};
pub use bvh_median_build::{MedianSplitBuilder, RangeLeaf};
pub use bvh_node::{BvhNode, BvhNodeKind, NodeVec, TreeNode};
pub use bvh_traverse::Leaves;
pub use bvh_tree::{BvhBuildStrategy, BvhTree, IndexedBvh, LeafStorageMut, SoupBvh};

mod bvh_binned_build;
mod bvh_build_top_down;
mod bvh_builder;
mod bvh_median_build;
mod bvh_node;
mod bvh_traverse;
mod bvh_tree;
mod bvh_validation;

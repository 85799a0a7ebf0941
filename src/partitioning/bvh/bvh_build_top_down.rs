use super::bvh_builder::{BuilderLeaf, BvhBuilder, SplitOptions};
use super::bvh_node::{NodeVec, TreeNode};
use super::bvh_tree::{BvhTree, LeafStorageMut};
use crate::utils::{self, PermutationError};
use alloc::vec::Vec;

/// The maximum leaf size used when `0` is given to [`build_top_down`].
pub const DEFAULT_MAX_LEAF_SIZE: usize = 4;

/// Error raised by [`build_top_down`].
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum BvhBuildError {
    /// The leaves of a tree storing reordered primitives do not reference every primitive
    /// exactly once. This indicates a builder that duplicated or dropped primitives.
    #[error("the builder did not emit every primitive exactly once: {0}")]
    InvalidLeafPermutation(#[from] PermutationError),
}

/// Statistics about a tree built by [`build_top_down`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct BuildSummary {
    /// Total number of nodes.
    pub node_count: usize,
    /// Number of leaf nodes.
    pub leaf_count: usize,
    /// Number of nodes on the longest root-to-leaf path.
    pub max_depth: usize,
    /// Number of primitive indices emitted by the leaves.
    pub index_count: usize,
}

struct BuildFrame<L> {
    node: u32,
    depth: usize,
    leaf: L,
}

/// Builds `tree` from `primitives` by recursively splitting them with `builder`.
///
/// A `max_leaf_size` of zero is replaced by [`DEFAULT_MAX_LEAF_SIZE`]. Whatever `tree`
/// contained before is cleared.
///
/// If `tree` stores its primitives (see [`BvhTree::IS_INDEXED`]), spatial splits are disabled
/// and a reordered copy of `primitives` is written to the tree once every leaf is emitted.
/// This fails if the leaves do not reference each primitive exactly once, in which case the
/// tree is left empty.
pub fn build_top_down<P, T, B>(
    tree: &mut T,
    builder: &mut B,
    primitives: &[P],
    max_leaf_size: usize,
) -> Result<BuildSummary, BvhBuildError>
where
    P: Clone,
    T: BvhTree<P>,
    B: BvhBuilder<P>,
    B::LeafInfo: BuilderLeaf<Bounds = <T::Node as TreeNode>::Bounds>,
{
    let max_leaf_size = if max_leaf_size == 0 {
        DEFAULT_MAX_LEAF_SIZE
    } else {
        max_leaf_size
    };

    let root = builder.init(primitives);
    tree.clear(2 * (primitives.len() / max_leaf_size));

    let (nodes, storage) = tree.storage_mut();
    nodes.push(T::Node::default());

    let result = match storage {
        LeafStorageMut::Indices(indices) => {
            debug_assert!(T::IS_INDEXED);
            Ok(build_nodes(
                nodes,
                indices,
                builder,
                root,
                primitives,
                max_leaf_size,
                SplitOptions::default(),
            ))
        }
        LeafStorageMut::Primitives(reordered) => {
            debug_assert!(!T::IS_INDEXED);
            let mut indices = Vec::with_capacity(primitives.len());
            let summary = build_nodes(
                nodes,
                &mut indices,
                builder,
                root,
                primitives,
                max_leaf_size,
                SplitOptions {
                    allow_spatial_splits: false,
                },
            );

            utils::reorder(&indices, primitives).map(|ordered| {
                *reordered = ordered;
                summary
            })
        }
    };

    match result {
        Ok(summary) => {
            log::debug!(
                "Built {} BVH over {} primitives: {} nodes, {} leaves, depth {}.",
                if T::IS_INDEXED { "indexed" } else { "soup" },
                primitives.len(),
                summary.node_count,
                summary.leaf_count,
                summary.max_depth
            );
            Ok(summary)
        }
        Err(err) => {
            tree.clear(0);
            Err(err.into())
        }
    }
}

fn build_nodes<P, N, B>(
    nodes: &mut NodeVec<N>,
    indices: &mut Vec<u32>,
    builder: &mut B,
    root: B::LeafInfo,
    primitives: &[P],
    max_leaf_size: usize,
    options: SplitOptions,
) -> BuildSummary
where
    N: TreeNode,
    B: BvhBuilder<P>,
    B::LeafInfo: BuilderLeaf<Bounds = N::Bounds>,
{
    let mut summary = BuildSummary::default();
    let mut stack = alloc::vec![BuildFrame {
        node: 0,
        depth: 1,
        leaf: root,
    }];

    while let Some(BuildFrame { node, depth, leaf }) = stack.pop() {
        summary.max_depth = summary.max_depth.max(depth);

        if let Some([left, right]) = builder.split(&leaf, primitives, max_leaf_size, options) {
            let first_child = nodes.push_pair();
            nodes[node] = N::inner(leaf.bounds().clone(), first_child);

            // The left child is popped first.
            stack.push(BuildFrame {
                node: first_child + 1,
                depth: depth + 1,
                leaf: right,
            });
            stack.push(BuildFrame {
                node: first_child,
                depth: depth + 1,
                leaf: left,
            });
        } else {
            let first = indices.len() as u32;
            let count = builder.insert_indices(indices, &leaf) as u32;
            nodes[node] = N::leaf(leaf.bounds().clone(), first, count);
            summary.leaf_count += 1;
        }
    }

    summary.node_count = nodes.len();
    summary.index_count = indices.len();
    summary
}

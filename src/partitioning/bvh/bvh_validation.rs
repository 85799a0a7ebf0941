use super::bvh_node::{BvhNodeKind, TreeNode};
use super::bvh_tree::{IndexedBvh, SoupBvh};
use crate::bounding_volume::BoundingVolume;
use alloc::vec;

impl<N: TreeNode> IndexedBvh<N> {
    /// Counts the leaves of this tree.
    pub fn leaf_count(&self) -> usize {
        leaf_count(&self.nodes)
    }

    /// The number of nodes on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        depth(&self.nodes)
    }
}

impl<N: TreeNode> IndexedBvh<N>
where
    N::Bounds: BoundingVolume,
{
    /// Panics if the tree isn’t well-formed.
    ///
    /// The tree is well-formed if it is topologically correct (child indices are valid, no node
    /// is reachable twice, and there are `2 * leaf_count - 1` nodes), geometrically correct
    /// (the bounds of a parent enclose the ones of its children), and if the leaf ranges,
    /// taken in depth-first order, tile the whole index list.
    ///
    /// Returns the leaf count.
    pub fn assert_well_formed(&self) -> usize {
        assert_well_formed(&self.nodes, self.indices.len())
    }
}

impl<P, N: TreeNode> SoupBvh<P, N> {
    /// Counts the leaves of this tree.
    pub fn leaf_count(&self) -> usize {
        leaf_count(&self.nodes)
    }

    /// The number of nodes on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        depth(&self.nodes)
    }
}

impl<P, N: TreeNode> SoupBvh<P, N>
where
    N::Bounds: BoundingVolume,
{
    /// Panics if the tree isn’t well-formed.
    ///
    /// See [`IndexedBvh::assert_well_formed`]. Here, the leaf ranges must tile the reordered
    /// primitive list.
    ///
    /// Returns the leaf count.
    pub fn assert_well_formed(&self) -> usize {
        assert_well_formed(&self.nodes, self.primitives.len())
    }
}

fn leaf_count<N: TreeNode>(nodes: &[N]) -> usize {
    nodes
        .iter()
        .filter(|node| matches!(node.kind(), BvhNodeKind::Leaf { .. }))
        .count()
}

fn depth<N: TreeNode>(nodes: &[N]) -> usize {
    if nodes.is_empty() {
        return 0;
    }

    let mut result = 0;
    let mut stack = vec![(0u32, 1usize)];

    while let Some((id, depth)) = stack.pop() {
        result = result.max(depth);

        if let BvhNodeKind::Inner { first_child } = nodes[id as usize].kind() {
            stack.push((first_child + 1, depth + 1));
            stack.push((first_child, depth + 1));
        }
    }

    result
}

fn assert_well_formed<N>(nodes: &[N], storage_len: usize) -> usize
where
    N: TreeNode,
    N::Bounds: BoundingVolume,
{
    if nodes.is_empty() {
        assert_eq!(storage_len, 0, "A tree without nodes references primitives.");
        return 0;
    }

    let mut visited = vec![false; nodes.len()];
    let mut stack = vec![0u32];
    let mut next_leaf_start = 0;
    let mut leaf_count = 0;

    while let Some(id) = stack.pop() {
        let node = &nodes[id as usize];

        if visited[id as usize] {
            panic!("Detected loop. Node {} visited twice.", id);
        }
        visited[id as usize] = true;

        match node.kind() {
            BvhNodeKind::Inner { first_child } => {
                assert!(
                    (first_child as usize) + 1 < nodes.len(),
                    "Node {} has children out of bounds.",
                    id
                );
                assert!(first_child > id, "Node {} has a child before itself.", id);

                for child in [first_child, first_child + 1] {
                    assert!(
                        node.bounds().contains(nodes[child as usize].bounds()),
                        "Node {} does not enclose its child {}.",
                        id,
                        child
                    );
                }

                // The left child must be visited first.
                stack.push(first_child + 1);
                stack.push(first_child);
            }
            BvhNodeKind::Leaf { first, count } => {
                assert_eq!(
                    first as usize, next_leaf_start,
                    "Leaf {} does not start right after the previous leaf.",
                    id
                );
                next_leaf_start += count as usize;
                leaf_count += 1;
            }
        }
    }

    assert_eq!(next_leaf_start, storage_len);
    assert_eq!(nodes.len(), 2 * leaf_count - 1);
    leaf_count
}

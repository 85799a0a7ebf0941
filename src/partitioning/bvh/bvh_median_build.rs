use super::bvh_builder::{
    refs_aabb, refs_centroid_aabb, BuilderLeaf, BvhBuilder, PrimitiveRef, SplitOptions,
};
use crate::bounding_volume::Aabb;
use crate::shape::Primitive;
use alloc::vec::Vec;
use ordered_float::OrderedFloat;

/// A contiguous range of the reference array of a [`MedianSplitBuilder`].
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RangeLeaf {
    /// The bounds of the primitives in the range.
    pub aabb: Aabb,
    /// First reference of the range.
    pub start: usize,
    /// One past the last reference of the range.
    pub end: usize,
}

impl BuilderLeaf for RangeLeaf {
    type Bounds = Aabb;

    #[inline]
    fn bounds(&self) -> &Aabb {
        &self.aabb
    }

    #[inline]
    fn primitive_count(&self) -> usize {
        self.end - self.start
    }
}

/// Splits sets of primitives in two halves of equal size.
///
/// The primitives are partitioned around the median of their centroids along the axis where
/// the centroids are the most spread. The partition happens in place on an array of primitive
/// references, so each child is described by a sub-range of its parent.
#[derive(Clone, Debug, Default)]
pub struct MedianSplitBuilder {
    refs: Vec<PrimitiveRef>,
}

impl MedianSplitBuilder {
    /// A builder without any preallocated storage.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<P: Primitive> BvhBuilder<P> for MedianSplitBuilder {
    type LeafInfo = RangeLeaf;

    fn init(&mut self, primitives: &[P]) -> RangeLeaf {
        self.refs.clear();
        self.refs.extend(
            primitives
                .iter()
                .enumerate()
                .map(|(i, p)| PrimitiveRef::new(i as u32, p)),
        );

        RangeLeaf {
            aabb: refs_aabb(&self.refs),
            start: 0,
            end: self.refs.len(),
        }
    }

    fn split(
        &mut self,
        leaf: &RangeLeaf,
        _primitives: &[P],
        max_leaf_size: usize,
        _options: SplitOptions,
    ) -> Option<[RangeLeaf; 2]> {
        let count = leaf.primitive_count();

        if count <= max_leaf_size || count < 2 {
            return None;
        }

        let refs = &mut self.refs[leaf.start..leaf.end];
        let axis = refs_centroid_aabb(refs).largest_axis();
        let mid = count / 2;
        let _ = refs.select_nth_unstable_by_key(mid, |r| OrderedFloat(r.center[axis]));

        let (left, right) = refs.split_at(mid);
        Some([
            RangeLeaf {
                aabb: refs_aabb(left),
                start: leaf.start,
                end: leaf.start + mid,
            },
            RangeLeaf {
                aabb: refs_aabb(right),
                start: leaf.start + mid,
                end: leaf.end,
            },
        ])
    }

    fn insert_indices(&mut self, indices: &mut Vec<u32>, leaf: &RangeLeaf) -> usize {
        indices.extend(self.refs[leaf.start..leaf.end].iter().map(|r| r.index));
        leaf.primitive_count()
    }
}

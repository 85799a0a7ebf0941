use crate::bounding_volume::{Aabb, BoundingVolume};
use crate::math::{Point, Real};
use crate::shape::Primitive;
use alloc::vec::Vec;

/// Per-call options given by the construction driver to [`BvhBuilder::split`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SplitOptions {
    /// Whether the builder may assign the same primitive to both children of a split.
    ///
    /// This is disabled when the primitives are physically reordered to match the leaves,
    /// which requires each primitive to end up in exactly one leaf.
    pub allow_spatial_splits: bool,
}

impl Default for SplitOptions {
    fn default() -> Self {
        Self {
            allow_spatial_splits: true,
        }
    }
}

/// The description of a set of primitives during construction.
pub trait BuilderLeaf {
    /// The bounding volume of the set of primitives.
    type Bounds: Clone;

    /// The bounding volume of the set of primitives.
    fn bounds(&self) -> &Self::Bounds;

    /// The number of primitives (or primitive references) of this set.
    fn primitive_count(&self) -> usize;
}

/// A split policy driving the top-down construction of a hierarchy.
///
/// The driver calls [`Self::init`] once, then repeatedly asks the builder to [`Self::split`]
/// sets of primitives until it refuses, at which point the set becomes a leaf and its
/// primitive indices are emitted with [`Self::insert_indices`].
///
/// # Termination
///
/// The driver does not bound the depth of the tree: `split` must return `None` for any set
/// with at most `max_leaf_size` primitives, and each child it returns must be strictly smaller
/// than its parent.
pub trait BvhBuilder<P> {
    /// Construction-time description of a set of primitives.
    type LeafInfo: BuilderLeaf;

    /// Prepares the construction and describes the set of all the `primitives`.
    fn init(&mut self, primitives: &[P]) -> Self::LeafInfo;

    /// Splits `leaf` in two, or returns `None` if it should become a leaf.
    fn split(
        &mut self,
        leaf: &Self::LeafInfo,
        primitives: &[P],
        max_leaf_size: usize,
        options: SplitOptions,
    ) -> Option<[Self::LeafInfo; 2]>;

    /// Appends the primitive indices of `leaf` to `indices` and returns how many were appended.
    fn insert_indices(&mut self, indices: &mut Vec<u32>, leaf: &Self::LeafInfo) -> usize;
}

/// A reference to a primitive, with the bounds of the part of it being organized.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PrimitiveRef {
    /// The index of the primitive.
    pub index: u32,
    /// The bounds of (the part of) the primitive.
    pub aabb: Aabb,
    /// The point used to sort this reference.
    pub center: Point<Real>,
}

impl PrimitiveRef {
    /// A reference to the whole `primitive` at `index`.
    pub fn new<P: Primitive>(index: u32, primitive: &P) -> Self {
        Self {
            index,
            aabb: primitive.aabb(),
            center: primitive.centroid(),
        }
    }

    /// A reference to the part of primitive `index` bounded by `aabb`.
    pub fn clipped(index: u32, aabb: Aabb) -> Self {
        Self {
            index,
            aabb,
            center: aabb.center(),
        }
    }
}

pub(super) fn refs_aabb(refs: &[PrimitiveRef]) -> Aabb {
    refs.iter().fold(Aabb::new_invalid(), |mut acc, r| {
        acc.merge(&r.aabb);
        acc
    })
}

pub(super) fn refs_centroid_aabb(refs: &[PrimitiveRef]) -> Aabb {
    Aabb::from_points(refs.iter().map(|r| r.center))
}

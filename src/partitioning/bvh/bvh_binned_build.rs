use super::bvh_builder::{
    refs_aabb, refs_centroid_aabb, BuilderLeaf, BvhBuilder, PrimitiveRef, SplitOptions,
};
use crate::bounding_volume::{Aabb, BoundingVolume};
use crate::math::Real;
use crate::shape::Primitive;
use alloc::vec::Vec;
use arrayvec::ArrayVec;

/// The largest number of bins a [`BinnedSahBuilder`] evaluates per split.
pub const MAX_BINS: usize = 32;
const BIN_EPSILON: Real = 1.0e-5;

/// A set of primitive references owned by a [`BinnedSahBuilder`] during construction.
///
/// With spatial splits, a primitive may be referenced by several sets, each time with the
/// bounds of the part of the primitive it covers.
#[derive(Clone, Debug, PartialEq)]
pub struct RefSetLeaf {
    /// The bounds of the referenced primitive parts.
    pub aabb: Aabb,
    /// The references.
    pub refs: Vec<PrimitiveRef>,
}

impl RefSetLeaf {
    fn new(refs: Vec<PrimitiveRef>) -> Self {
        Self {
            aabb: refs_aabb(&refs),
            refs,
        }
    }
}

impl BuilderLeaf for RefSetLeaf {
    type Bounds = Aabb;

    #[inline]
    fn bounds(&self) -> &Aabb {
        &self.aabb
    }

    #[inline]
    fn primitive_count(&self) -> usize {
        self.refs.len()
    }
}

/// Splits sets of primitives with a binned surface area heuristic (SAH).
///
/// Object splits bin the primitive centroids along the axis where they are the most spread
/// and pick the bin boundary minimizing the SAH cost. If `use_spatial_splits` is set, the
/// builder also evaluates splitting planes that cut through primitives, duplicating their
/// references on both sides with tightened bounds (see [`Primitive::split_aabb`]), whenever the
/// children of the best object split overlap by more than `spatial_split_alpha` times the
/// surface of the root.
///
/// Any set with more than `max_leaf_size` primitives is split: the heuristic only selects the
/// splitting plane.
#[derive(Clone, Debug)]
pub struct BinnedSahBuilder {
    /// Number of bins evaluated per split, clamped to `[2, MAX_BINS]`.
    pub num_bins: usize,
    /// Estimated cost of traversing an inner node.
    pub traversal_cost: Real,
    /// Estimated cost of intersecting a primitive.
    pub intersection_cost: Real,
    /// Whether spatial splits may be used.
    pub use_spatial_splits: bool,
    /// Overlap threshold, relative to the root surface, above which spatial splits are
    /// evaluated.
    pub spatial_split_alpha: Real,
    root_surface: Real,
}

impl Default for BinnedSahBuilder {
    fn default() -> Self {
        Self {
            num_bins: 16,
            traversal_cost: 1.0,
            intersection_cost: 1.0,
            use_spatial_splits: false,
            spatial_split_alpha: 1.0e-5,
            root_surface: 0.0,
        }
    }
}

#[derive(Copy, Clone, Debug)]
struct SahBin {
    aabb: Aabb,
    count: usize,
}

impl Default for SahBin {
    fn default() -> Self {
        Self {
            aabb: Aabb::new_invalid(),
            count: 0,
        }
    }
}

impl SahBin {
    fn merge(&mut self, other: &SahBin) {
        self.aabb.merge(&other.aabb);
        self.count += other.count;
    }
}

#[derive(Copy, Clone, Debug)]
struct ObjectSplit {
    cost: Real,
    axis: usize,
    k0: Real,
    k1: Real,
    num_bins: usize,
    plane: usize,
    left_aabb: Aabb,
    right_aabb: Aabb,
}

#[derive(Copy, Clone, Debug)]
struct SpatialSplit {
    cost: Real,
    axis: usize,
    position: Real,
}

impl BinnedSahBuilder {
    /// A builder with the default settings and without spatial splits.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables spatial splits.
    pub fn with_spatial_splits(mut self, enabled: bool) -> Self {
        self.use_spatial_splits = enabled;
        self
    }

    /// Sets the number of bins evaluated per split.
    pub fn with_num_bins(mut self, num_bins: usize) -> Self {
        self.num_bins = num_bins;
        self
    }

    fn bin_count(&self) -> usize {
        self.num_bins.clamp(2, MAX_BINS)
    }

    fn cost(&self, parent_area: Real, left: (Real, usize), right: (Real, usize)) -> Real {
        let weighted = left.0 * left.1 as Real + right.0 * right.1 as Real;
        let weighted = if parent_area > 0.0 {
            weighted / parent_area
        } else {
            weighted
        };
        self.traversal_cost + self.intersection_cost * weighted
    }

    fn find_object_split(&self, leaf: &RefSetLeaf, parent_area: Real) -> Option<ObjectSplit> {
        let num_bins = self.bin_count();
        let centroid_aabb = refs_centroid_aabb(&leaf.refs);
        let axis = centroid_aabb.largest_axis();
        let bins_range = [centroid_aabb.mins[axis], centroid_aabb.maxs[axis]];

        // All the centroids lie on the same plane.
        if bins_range[1] <= bins_range[0] {
            return None;
        }

        let k1 = num_bins as Real * (1.0 - BIN_EPSILON) / (bins_range[1] - bins_range[0]);
        let k0 = bins_range[0];

        let mut bins: ArrayVec<SahBin, MAX_BINS> =
            (0..num_bins).map(|_| SahBin::default()).collect();
        for r in &leaf.refs {
            let bin = &mut bins[bin_id(k0, k1, r.center[axis], num_bins)];
            bin.aabb.merge(&r.aabb);
            bin.count += 1;
        }

        // right_merges[i] covers the bins i..num_bins.
        let mut right_merges = bins.clone();
        for i in (0..num_bins - 1).rev() {
            let next = right_merges[i + 1];
            right_merges[i].merge(&next);
        }

        let mut best: Option<ObjectSplit> = None;
        let mut left = SahBin::default();

        for plane in 0..num_bins - 1 {
            left.merge(&bins[plane]);
            let right = &right_merges[plane + 1];

            if left.count == 0 || right.count == 0 {
                continue;
            }

            let cost = self.cost(
                parent_area,
                (left.aabb.surface_metric(), left.count),
                (right.aabb.surface_metric(), right.count),
            );

            if best.map_or(true, |b| cost < b.cost) {
                best = Some(ObjectSplit {
                    cost,
                    axis,
                    k0,
                    k1,
                    num_bins,
                    plane,
                    left_aabb: left.aabb,
                    right_aabb: right.aabb,
                });
            }
        }

        best
    }

    fn find_spatial_split<P: Primitive>(
        &self,
        leaf: &RefSetLeaf,
        primitives: &[P],
        parent_area: Real,
    ) -> Option<SpatialSplit> {
        let num_bins = self.bin_count();
        let count = leaf.refs.len();
        let axis = leaf.aabb.largest_axis();
        let (lo, hi) = (leaf.aabb.mins[axis], leaf.aabb.maxs[axis]);

        if hi <= lo {
            return None;
        }

        let mut best: Option<SpatialSplit> = None;

        for k in 1..num_bins {
            let position = lo + (hi - lo) * k as Real / num_bins as Real;
            let mut left = SahBin::default();
            let mut right = SahBin::default();

            for r in &leaf.refs {
                let (l, rr) = split_reference(primitives, r, axis, position);
                if let Some(l) = l {
                    left.aabb.merge(&l.aabb);
                    left.count += 1;
                }
                if let Some(rr) = rr {
                    right.aabb.merge(&rr.aabb);
                    right.count += 1;
                }
            }

            // Each child must be strictly smaller than its parent for the construction to end.
            if left.count == 0 || right.count == 0 || left.count >= count || right.count >= count
            {
                continue;
            }

            let cost = self.cost(
                parent_area,
                (left.aabb.surface_metric(), left.count),
                (right.aabb.surface_metric(), right.count),
            );

            if best.map_or(true, |b| cost < b.cost) {
                best = Some(SpatialSplit {
                    cost,
                    axis,
                    position,
                });
            }
        }

        best
    }

    fn apply_object_split(leaf: &RefSetLeaf, split: &ObjectSplit) -> [RefSetLeaf; 2] {
        let (left, right): (Vec<_>, Vec<_>) = leaf.refs.iter().copied().partition(|r| {
            bin_id(split.k0, split.k1, r.center[split.axis], split.num_bins) <= split.plane
        });

        [RefSetLeaf::new(left), RefSetLeaf::new(right)]
    }

    fn apply_spatial_split<P: Primitive>(
        leaf: &RefSetLeaf,
        primitives: &[P],
        split: &SpatialSplit,
    ) -> [RefSetLeaf; 2] {
        let mut left = Vec::with_capacity(leaf.refs.len());
        let mut right = Vec::with_capacity(leaf.refs.len());

        for r in &leaf.refs {
            let (l, rr) = split_reference(primitives, r, split.axis, split.position);
            left.extend(l);
            right.extend(rr);
        }

        [RefSetLeaf::new(left), RefSetLeaf::new(right)]
    }
}

fn bin_id(k0: Real, k1: Real, coord: Real, num_bins: usize) -> usize {
    ((k1 * (coord - k0)) as usize).min(num_bins - 1)
}

/// Distributes the reference `r` on both sides of a plane, clipping it if it straddles it.
fn split_reference<P: Primitive>(
    primitives: &[P],
    r: &PrimitiveRef,
    axis: usize,
    position: Real,
) -> (Option<PrimitiveRef>, Option<PrimitiveRef>) {
    if r.aabb.maxs[axis] <= position {
        return (Some(*r), None);
    }
    if r.aabb.mins[axis] >= position {
        return (None, Some(*r));
    }

    let (left, right) = primitives[r.index as usize].split_aabb(&r.aabb, axis, position);
    match (left.is_valid(), right.is_valid()) {
        (true, true) => (
            Some(PrimitiveRef::clipped(r.index, left)),
            Some(PrimitiveRef::clipped(r.index, right)),
        ),
        (true, false) => (Some(PrimitiveRef::clipped(r.index, left)), None),
        (false, true) => (None, Some(PrimitiveRef::clipped(r.index, right))),
        // Never drop a primitive, even if the clipping is inconsistent.
        (false, false) => (Some(*r), None),
    }
}

impl<P: Primitive> BvhBuilder<P> for BinnedSahBuilder {
    type LeafInfo = RefSetLeaf;

    fn init(&mut self, primitives: &[P]) -> RefSetLeaf {
        let refs = primitives
            .iter()
            .enumerate()
            .map(|(i, p)| PrimitiveRef::new(i as u32, p))
            .collect();
        let root = RefSetLeaf::new(refs);
        self.root_surface = root.aabb.surface_metric();
        root
    }

    fn split(
        &mut self,
        leaf: &RefSetLeaf,
        primitives: &[P],
        max_leaf_size: usize,
        options: SplitOptions,
    ) -> Option<[RefSetLeaf; 2]> {
        let count = leaf.refs.len();

        if count <= max_leaf_size || count < 2 {
            return None;
        }

        let parent_area = leaf.aabb.surface_metric();
        let object = self.find_object_split(leaf, parent_area);

        if self.use_spatial_splits && options.allow_spatial_splits {
            let overlap = object.map_or(Real::MAX, |split| {
                split
                    .left_aabb
                    .intersection(&split.right_aabb)
                    .map_or(0.0, |inter| inter.surface_metric())
            });

            if overlap > self.spatial_split_alpha * self.root_surface {
                if let Some(spatial) = self.find_spatial_split(leaf, primitives, parent_area) {
                    if object.map_or(true, |split| spatial.cost < split.cost) {
                        log::trace!(
                            "Spatial split of {} references along axis {} at {}.",
                            count,
                            spatial.axis,
                            spatial.position
                        );
                        return Some(Self::apply_spatial_split(leaf, primitives, &spatial));
                    }
                }
            }
        }

        if let Some(split) = object {
            return Some(Self::apply_object_split(leaf, &split));
        }

        // In degenerate cases where all the centroids coincide, just split the set in two.
        log::debug!(
            "Degenerate centroids for {} primitive references, splitting them in halves.",
            count
        );
        let (left, right) = leaf.refs.split_at(count / 2);
        Some([
            RefSetLeaf::new(left.to_vec()),
            RefSetLeaf::new(right.to_vec()),
        ])
    }

    fn insert_indices(&mut self, indices: &mut Vec<u32>, leaf: &RefSetLeaf) -> usize {
        indices.extend(leaf.refs.iter().map(|r| r.index));
        leaf.refs.len()
    }
}

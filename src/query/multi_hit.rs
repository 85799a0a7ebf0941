//! Accumulation of the `K` closest hits along a ray.
//!
//! All the functions of this module are lane-parallel: they operate on any [`HitRecord`], and
//! every lane of a record is updated independently of the others through masked blends. A
//! lane that is not being modified keeps its value bit for bit.

use crate::math::Real;
use crate::query::{Hit, HitRecord, SimdHit};
use core::ops::Index;
use simba::simd::{SimdBool as _, SimdPartialOrd, SimdValue};

/// An accumulator of ray hits.
pub trait HitAccumulator<Candidate: ?Sized> {
    /// Merges `candidate` into this accumulator.
    ///
    /// This never fails: candidates that do not fit are discarded.
    fn update(&mut self, candidate: &Candidate);
}

/// Lanes where `query` holds a hit with a time of impact in `[tmin, tmax]` that is closer
/// than `reference`.
///
/// A lane where `reference` holds no hit is always farther than a valid `query`.
#[inline]
pub fn is_closer<H: HitRecord>(
    query: &H,
    reference: &H,
    tmin: H::Distance,
    tmax: H::Distance,
) -> H::Mask {
    let toi = query.time_of_impact();
    let in_range = toi.simd_ge(tmin) & toi.simd_le(tmax);
    query.is_hit() & in_range & closer_or_vacant(query, reference)
}

/// Lanes where `query` is closer than at least one valid entry of `reference`.
///
/// Entries of `reference` without a hit are ignored, so a `reference` without any valid entry
/// yields an all-false mask.
pub fn is_closer_than_any<H: HitRecord, const K: usize>(
    query: &H,
    reference: &MultiHit<H, K>,
    tmin: H::Distance,
    tmax: H::Distance,
) -> H::Mask {
    let mut result = H::Mask::splat(false);

    for entry in reference.iter() {
        result = result | (entry.is_hit() & is_closer(query, entry, tmin, tmax));

        if result.all() {
            break;
        }
    }

    result
}

/// Comparison of two multi-hit records that accepts every lane.
///
/// Merging two multi-hit records with [`HitAccumulator::update`] already discards whatever
/// does not fit, so this policy never inspects its arguments. Whether a merge should instead
/// be rejected based on the contents of `reference` is left open.
#[inline]
pub fn is_closer_multi_unconditional<H: HitRecord, const K: usize>(
    _query: &MultiHit<H, K>,
    _reference: &MultiHit<H, K>,
    _tmin: H::Distance,
    _tmax: H::Distance,
) -> H::Mask {
    H::Mask::splat(true)
}

#[inline]
fn closer_or_vacant<H: HitRecord>(query: &H, reference: &H) -> H::Mask {
    query.is_hit()
        & (!reference.is_hit() | query.time_of_impact().simd_lt(reference.time_of_impact()))
}

#[inline]
fn blend<H: HitRecord>(src: H, mask: H::Mask, dst: H) -> H {
    if mask.all() {
        src
    } else {
        src.select(mask, dst)
    }
}

/// Inserts `item` into the sorted `records`, independently on each lane.
///
/// On each lane, `item` is written at the first slot `i` for which `cond(item, records[i])` is
/// set, after shifting `records[i..]` one slot toward the tail. The last record of that lane is
/// dropped. A lane for which `cond` is never set is left untouched.
pub fn insert_sorted<H: HitRecord, const K: usize>(
    item: &H,
    records: &mut [H; K],
    mut cond: impl FnMut(&H, &H) -> H::Mask,
) {
    let none = H::Mask::splat(false);
    // One-hot insertion slot of each lane.
    let mut insert_at = [none; K];
    // Lanes whose insertion slot lies strictly before `i`.
    let mut shift_at = [none; K];
    let mut active = H::Mask::splat(true);
    let mut scanned = 0;

    while scanned < K {
        let i = scanned;
        shift_at[i] = !active;
        insert_at[i] = cond(item, &records[i]) & active;
        active = active & !insert_at[i];
        scanned += 1;

        if active.none() {
            break;
        }
    }

    if active.all() {
        return;
    }

    for mask in &mut shift_at[scanned..] {
        *mask = !active;
    }

    for i in (0..K).rev() {
        let must_shift = shift_at[i];
        let must_insert = insert_at[i];

        if must_shift.none() && must_insert.none() {
            break;
        }

        if i > 0 && must_shift.any() {
            records[i] = blend(records[i - 1], must_shift, records[i]);
        }

        if must_insert.any() {
            records[i] = blend(*item, must_insert, records[i]);
        }
    }
}

/// The `K` closest hits found so far, sorted by increasing time of impact.
///
/// On each lane, the valid entries form a prefix of the records, sorted in ascending order.
/// The remaining entries have no hit.
///
/// # Example
///
/// ```rust
/// # #[cfg(all(feature = "dim3", feature = "f32"))] {
/// use bvhkit3d::query::{Hit, HitAccumulator, MultiHit};
///
/// let mut hits = MultiHit::<Hit, 3>::new();
/// for (i, toi) in [5.0, 2.0, 8.0, 1.0, 3.0].into_iter().enumerate() {
///     hits.update(&Hit::new(toi, i as u32, 0));
/// }
///
/// let tois: Vec<_> = hits.valid().iter().map(|h| h.time_of_impact).collect();
/// assert_eq!(tois, [1.0, 2.0, 3.0]);
/// # }
/// ```
#[derive(Copy, Clone, Debug)]
pub struct MultiHit<H, const K: usize> {
    records: [H; K],
}

impl<H: HitRecord, const K: usize> Default for MultiHit<H, K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<H: HitRecord, const K: usize> MultiHit<H, K> {
    /// An accumulator without any hit.
    pub fn new() -> Self {
        Self {
            records: [H::miss(); K],
        }
    }

    /// Resets every entry to a miss.
    pub fn clear(&mut self) {
        self.records = [H::miss(); K];
    }

    /// The records, closest first.
    #[inline]
    pub fn as_slice(&self) -> &[H] {
        &self.records
    }

    /// Iterates through the records, closest first.
    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, H> {
        self.records.iter()
    }

    /// Lanes holding at least one hit.
    #[inline]
    pub fn any_hit(&self) -> H::Mask {
        self.records
            .first()
            .map(|first| first.is_hit())
            .unwrap_or_else(|| H::Mask::splat(false))
    }

    /// The number of valid entries on `lane`.
    pub fn lane_valid_count(&self, lane: usize) -> usize {
        self.records
            .iter()
            .take_while(|r| r.is_hit().extract(lane))
            .count()
    }

    /// Inserts `candidate` using `cond(candidate, entry)` to locate its slot.
    ///
    /// See [`insert_sorted`].
    pub fn update_with(&mut self, candidate: &H, cond: impl FnMut(&H, &H) -> H::Mask) {
        insert_sorted(candidate, &mut self.records, cond);
    }
}

impl<const K: usize> MultiHit<Hit, K> {
    /// The number of valid entries.
    pub fn valid_count(&self) -> usize {
        self.records.iter().take_while(|r| r.hit).count()
    }

    /// The valid entries, closest first.
    pub fn valid(&self) -> &[Hit] {
        &self.records[..self.valid_count()]
    }
}

impl<H, const K: usize> Index<usize> for MultiHit<H, K> {
    type Output = H;

    #[inline]
    fn index(&self, i: usize) -> &H {
        &self.records[i]
    }
}

impl<'a, H, const K: usize> IntoIterator for &'a MultiHit<H, K> {
    type Item = &'a H;
    type IntoIter = core::slice::Iter<'a, H>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl<H: HitRecord, const K: usize> HitAccumulator<H> for MultiHit<H, K> {
    #[inline]
    fn update(&mut self, candidate: &H) {
        insert_sorted(candidate, &mut self.records, closer_or_vacant::<H>);
    }
}

impl<H: HitRecord, const K: usize> HitAccumulator<MultiHit<H, K>> for MultiHit<H, K> {
    fn update(&mut self, candidate: &MultiHit<H, K>) {
        if self.any_hit().none() {
            self.records = candidate.records;
            return;
        }

        for record in candidate.iter() {
            if record.is_hit().none() {
                break;
            }

            insert_sorted(record, &mut self.records, closer_or_vacant::<H>);
        }
    }
}

impl HitAccumulator<Hit> for Hit {
    #[inline]
    fn update(&mut self, candidate: &Hit) {
        if closer_or_vacant(candidate, self) {
            *self = *candidate;
        }
    }
}

impl HitAccumulator<SimdHit> for SimdHit {
    #[inline]
    fn update(&mut self, candidate: &SimdHit) {
        let closer = closer_or_vacant(candidate, self);
        *self = blend(*candidate, closer, *self);
    }
}

/// Whether `hit` is valid with a time of impact in `[tmin, tmax]`.
pub(crate) fn in_range(hit: &Hit, tmin: Real, tmax: Real) -> bool {
    is_closer(hit, &Hit::miss(), tmin, tmax)
}

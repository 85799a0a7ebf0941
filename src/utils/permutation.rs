//! Reordering of slices by index permutations.
//!
//! A permutation `p` of length `n` is a bijection on `[0, n)`. Reordering `items` by `p`
//! produces a sequence whose `i`-th element is `items[p[i]]`.

use alloc::{vec, vec::Vec};

/// Error raised when an index list is not a permutation of the elements it reorders.
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum PermutationError {
    /// The permutation does not have one entry per element.
    #[error("the permutation has {found} entries but {expected} elements must be reordered")]
    LengthMismatch {
        /// The number of elements to reorder.
        expected: usize,
        /// The length of the permutation.
        found: usize,
    },
    /// An entry of the permutation is not a valid element index.
    #[error("the permutation entry {position} references the index {index}, out of range for {len} elements")]
    OutOfRange {
        /// The position of the faulty entry in the permutation.
        position: usize,
        /// The faulty entry.
        index: u32,
        /// The number of elements to reorder.
        len: usize,
    },
    /// An element index appears more than once.
    #[error("the index {index} appears more than once in the permutation")]
    Duplicate {
        /// The repeated index.
        index: u32,
    },
}

/// Checks that `perm` is a permutation of `[0, len)`.
pub fn check_permutation(perm: &[u32], len: usize) -> Result<(), PermutationError> {
    if perm.len() != len {
        return Err(PermutationError::LengthMismatch {
            expected: len,
            found: perm.len(),
        });
    }

    let mut seen = vec![false; len];

    for (position, &index) in perm.iter().enumerate() {
        let slot = seen
            .get_mut(index as usize)
            .ok_or(PermutationError::OutOfRange {
                position,
                index,
                len,
            })?;

        if *slot {
            return Err(PermutationError::Duplicate { index });
        }

        *slot = true;
    }

    Ok(())
}

/// The permutation `q` such that `q[p[i]] == i`.
///
/// Reordering by `q` undoes a reordering by `perm`. The input must be a valid permutation,
/// see [`check_permutation`].
pub fn invert_permutation(perm: &[u32]) -> Vec<u32> {
    let mut inverse = vec![0; perm.len()];
    for (i, &p) in perm.iter().enumerate() {
        inverse[p as usize] = i as u32;
    }
    inverse
}

/// Copies `items` in the order given by `perm`.
///
/// The `i`-th element of the result is `items[perm[i]]`.
pub fn reorder<T: Clone>(perm: &[u32], items: &[T]) -> Result<Vec<T>, PermutationError> {
    check_permutation(perm, items.len())?;
    Ok(perm.iter().map(|&i| items[i as usize].clone()).collect())
}

/// Parallel version of [`reorder`].
#[cfg(feature = "parallel")]
pub fn par_reorder<T: Clone + Send + Sync>(
    perm: &[u32],
    items: &[T],
) -> Result<Vec<T>, PermutationError> {
    use rayon::prelude::*;

    check_permutation(perm, items.len())?;
    Ok(perm.par_iter().map(|&i| items[i as usize].clone()).collect())
}

/// Reorders `items` in place by following the cycles of `perm`.
///
/// After this call, `items[i]` holds the element previously at `items[perm[i]]`. Each entry
/// of `perm` is overwritten with its own position while its cycle is processed, leaving the
/// identity permutation. Nothing is modified if `perm` is not a valid permutation.
pub fn reorder_in_place<T>(perm: &mut [u32], items: &mut [T]) -> Result<(), PermutationError> {
    check_permutation(perm, items.len())?;

    for start in 0..perm.len() {
        let mut current = start;

        while perm[current] as usize != start {
            let next = perm[current] as usize;
            items.swap(current, next);
            perm[current] = current as u32;
            current = next;
        }

        perm[current] = current as u32;
    }

    Ok(())
}

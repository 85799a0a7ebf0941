//! Various unsorted logical operators.

pub use self::permutation::{
    check_permutation, invert_permutation, reorder, reorder_in_place, PermutationError,
};
#[cfg(feature = "parallel")]
pub use self::permutation::par_reorder;

mod permutation;

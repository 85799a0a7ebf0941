//! Ray casting and hit accumulation.
//!
//! A ray query produces [`HitRecord`]s. A single closest hit is tracked with a [`Hit`] (or a
//! [`SimdHit`] for a packet of rays), while [`MultiHit`] keeps the `K` closest intersections
//! sorted by time of impact. Both implement [`HitAccumulator`] so the traversal of a
//! [`crate::partitioning::IndexedBvh`] works with either.

pub use self::hit::{Hit, HitRecord, SimdHit};
pub use self::multi_hit::{
    insert_sorted, is_closer, is_closer_multi_unconditional, is_closer_than_any, HitAccumulator,
    MultiHit,
};
pub use self::ray::{Ray, RayCast, RayIntersection};

mod hit;
pub mod multi_hit;
pub mod ray;

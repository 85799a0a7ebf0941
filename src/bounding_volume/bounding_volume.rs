use crate::math::{Point, Real};

/// The bounds stored in the nodes of a hierarchy.
///
/// A parent node encloses its children: checking this only needs [`BoundingVolume::contains`],
/// and building the bounds of a set of primitives only needs [`BoundingVolume::merge`].
pub trait BoundingVolume: Clone {
    /// A point inside of this bounding volume, ideally its center.
    fn center(&self) -> Point<Real>;

    /// Checks if this bounding volume intersects another one.
    fn intersects(&self, other: &Self) -> bool;

    /// Checks if this bounding volume contains another one.
    fn contains(&self, other: &Self) -> bool;

    /// Enlarges this bounding volume so it also contains `other`.
    fn merge(&mut self, other: &Self);

    /// The smallest bounding volume containing both `self` and `other`.
    fn merged(&self, other: &Self) -> Self {
        let mut result = self.clone();
        result.merge(other);
        result
    }

    /// Enlarges this bounding volume by `amount` in every direction.
    fn loosen(&mut self, amount: Real);

    /// This bounding volume enlarged by `amount` in every direction.
    fn loosened(&self, amount: Real) -> Self {
        let mut result = self.clone();
        result.loosen(amount);
        result
    }

    /// The surface metric minimized by the surface area heuristic.
    fn surface_metric(&self) -> Real;
}

use crate::bounding_volume::Aabb;
use crate::math::{Point, Real};

/// A primitive that can be organized by the hierarchy builders.
///
/// Builders only see primitives through their bounding boxes and centroids. Spatial splits
/// additionally call [`Primitive::split_aabb`] to compute the bounds of the part of a
/// primitive lying on each side of a splitting plane.
pub trait Primitive {
    /// The axis-aligned bounding box of this primitive.
    fn aabb(&self) -> Aabb;

    /// The point used to sort this primitive during object splits.
    fn centroid(&self) -> Point<Real> {
        self.aabb().center()
    }

    /// Splits `current` by the plane orthogonal to `axis` at `position`.
    ///
    /// `current` is a box that contains the part of this primitive being split (initially its
    /// own AABB, then the result of earlier splits). The returned boxes bound the part of the
    /// primitive inside `current` on the negative and on the positive side of the plane, and
    /// must each be contained in `current`. A side without any part of the primitive is
    /// reported as an invalid AABB.
    fn split_aabb(&self, current: &Aabb, axis: usize, position: Real) -> (Aabb, Aabb) {
        current.split_at(axis, position)
    }
}

impl Primitive for Aabb {
    #[inline]
    fn aabb(&self) -> Aabb {
        *self
    }
}

impl<T: Primitive + ?Sized> Primitive for &T {
    #[inline]
    fn aabb(&self) -> Aabb {
        (**self).aabb()
    }

    #[inline]
    fn centroid(&self) -> Point<Real> {
        (**self).centroid()
    }

    #[inline]
    fn split_aabb(&self, current: &Aabb, axis: usize, position: Real) -> (Aabb, Aabb) {
        (**self).split_aabb(current, axis, position)
    }
}

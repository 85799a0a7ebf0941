//! Axis Aligned Bounding Box.

use crate::bounding_volume::BoundingVolume;
use crate::math::{Point, Real, Vector, DIM};
use crate::query::Ray;
use core::mem;
use num::Zero;

/// An Axis-Aligned Bounding Box (AABB).
///
/// An AABB is defined by its minimum and maximum corners. It is the bounding volume stored in
/// every node of the hierarchies built by this crate, and the value a
/// [`Primitive`](crate::shape::Primitive) reports to the builders.
///
/// - **mins**: The point with the smallest coordinates on each axis.
/// - **maxs**: The point with the largest coordinates on each axis.
/// - **Invariant**: `mins.x ≤ maxs.x`, `mins.y ≤ maxs.y`, `mins.z ≤ maxs.z`, except for the
///   "invalid" AABB returned by [`Aabb::new_invalid`] which is the identity element of
///   [`BoundingVolume::merge`].
///
/// # Example
///
/// ```rust
/// # #[cfg(all(feature = "dim3", feature = "f32"))] {
/// use bvhkit3d::bounding_volume::{Aabb, BoundingVolume};
/// use nalgebra::Point3;
///
/// let mut aabb = Aabb::new_invalid();
/// aabb.merge(&Aabb::new(Point3::new(1.0, 2.0, 3.0), Point3::new(2.0, 3.0, 4.0)));
/// aabb.merge(&Aabb::new(Point3::new(-1.0, 0.0, 2.0), Point3::new(0.0, 1.0, 2.5)));
///
/// assert_eq!(aabb.mins, Point3::new(-1.0, 0.0, 2.0));
/// assert_eq!(aabb.maxs, Point3::new(2.0, 3.0, 4.0));
/// # }
/// ```
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Debug, PartialEq, Copy, Clone)]
#[repr(C)]
pub struct Aabb {
    /// The point with minimum coordinates.
    pub mins: Point<Real>,
    /// The point with maximum coordinates.
    pub maxs: Point<Real>,
}

impl Default for Aabb {
    fn default() -> Self {
        Self::new_invalid()
    }
}

impl Aabb {
    /// Creates a new AABB from its minimum and maximum corners.
    #[inline]
    pub fn new(mins: Point<Real>, maxs: Point<Real>) -> Aabb {
        Aabb { mins, maxs }
    }

    /// Creates an invalid AABB with inverted bounds.
    ///
    /// The resulting AABB has `mins` set to maximum values and `maxs` set to
    /// minimum values. Merging anything into it yields that other thing.
    #[inline]
    pub fn new_invalid() -> Self {
        Self::new(
            Vector::repeat(Real::MAX).into(),
            Vector::repeat(-Real::MAX).into(),
        )
    }

    /// Creates a new AABB from its center and half-extents.
    #[inline]
    pub fn from_half_extents(center: Point<Real>, half_extents: Vector<Real>) -> Self {
        Self::new(center - half_extents, center + half_extents)
    }

    /// Creates a new AABB that tightly encloses a set of points.
    ///
    /// Returns an invalid AABB if the iterator is empty.
    pub fn from_points<I>(pts: I) -> Self
    where
        I: IntoIterator<Item = Point<Real>>,
    {
        let mut result = Self::new_invalid();
        for pt in pts {
            result.take_point(pt);
        }
        result
    }

    /// Returns `true` if `mins <= maxs` along every axis.
    #[inline]
    pub fn is_valid(&self) -> bool {
        na::partial_le(&self.mins, &self.maxs)
    }

    /// The center of this AABB.
    #[inline]
    pub fn center(&self) -> Point<Real> {
        na::center(&self.mins, &self.maxs)
    }

    /// The half-extents of this AABB.
    #[inline]
    pub fn half_extents(&self) -> Vector<Real> {
        (self.maxs - self.mins) * 0.5
    }

    /// The extents of this `Aabb`.
    #[inline]
    pub fn extents(&self) -> Vector<Real> {
        self.maxs - self.mins
    }

    /// The axis along which this AABB has its largest extent.
    #[inline]
    pub fn largest_axis(&self) -> usize {
        self.extents().imax()
    }

    /// The volume of this AABB.
    #[inline]
    pub fn volume(&self) -> Real {
        let extents = self.extents();
        extents.x * extents.y * extents.z
    }

    /// The half area of this `Aabb`.
    ///
    /// This is the surface metric used by the surface area heuristic. An invalid AABB has a
    /// half area of zero.
    #[inline]
    pub fn half_area(&self) -> Real {
        if !self.is_valid() {
            return 0.0;
        }

        let extents = self.extents();
        extents.x * (extents.y + extents.z) + extents.y * extents.z
    }

    /// Enlarges this `Aabb` so it also contains the point `pt`.
    pub fn take_point(&mut self, pt: Point<Real>) {
        self.mins = self.mins.coords.inf(&pt.coords).into();
        self.maxs = self.maxs.coords.sup(&pt.coords).into();
    }

    /// Computes the intersection of this `Aabb` and another one.
    pub fn intersection(&self, other: &Aabb) -> Option<Aabb> {
        let result = Aabb {
            mins: Point::from(self.mins.coords.sup(&other.mins.coords)),
            maxs: Point::from(self.maxs.coords.inf(&other.maxs.coords)),
        };

        for i in 0..DIM {
            if result.mins[i] > result.maxs[i] {
                return None;
            }
        }

        Some(result)
    }

    /// Cuts this AABB in two by the plane orthogonal to `axis` at coordinate `position`.
    ///
    /// The first returned AABB lies on the negative side of the plane, the second on the
    /// positive side. If the plane does not cross this AABB, one of the halves is invalid.
    pub fn split_at(&self, axis: usize, position: Real) -> (Aabb, Aabb) {
        let mut left = *self;
        let mut right = *self;
        left.maxs[axis] = left.maxs[axis].min(position);
        right.mins[axis] = right.mins[axis].max(position);

        if left.mins[axis] > left.maxs[axis] {
            left = Aabb::new_invalid();
        }
        if right.mins[axis] > right.maxs[axis] {
            right = Aabb::new_invalid();
        }

        (left, right)
    }

    /// Computes the parameter interval along `ray` for which the ray lies inside this AABB,
    /// clamped to `[tmin, tmax]`.
    ///
    /// Returns the entry parameter, or `None` if the clamped interval is empty.
    pub fn cast_ray_interval(&self, ray: &Ray, tmin: Real, tmax: Real) -> Option<Real> {
        let mut near = tmin;
        let mut far = tmax;

        for i in 0usize..DIM {
            if ray.dir[i].is_zero() {
                if ray.origin[i] < self.mins[i] || ray.origin[i] > self.maxs[i] {
                    return None;
                }
            } else {
                let denom = 1.0 / ray.dir[i];
                let mut inter_with_near_halfspace = (self.mins[i] - ray.origin[i]) * denom;
                let mut inter_with_far_halfspace = (self.maxs[i] - ray.origin[i]) * denom;

                if inter_with_near_halfspace > inter_with_far_halfspace {
                    mem::swap(
                        &mut inter_with_near_halfspace,
                        &mut inter_with_far_halfspace,
                    )
                }

                near = near.max(inter_with_near_halfspace);
                far = far.min(inter_with_far_halfspace);

                if near > far {
                    return None;
                }
            }
        }

        Some(near)
    }
}

impl BoundingVolume for Aabb {
    #[inline]
    fn center(&self) -> Point<Real> {
        self.center()
    }

    #[inline]
    fn intersects(&self, other: &Aabb) -> bool {
        na::partial_le(&self.mins, &other.maxs) && na::partial_ge(&self.maxs, &other.mins)
    }

    #[inline]
    fn contains(&self, other: &Aabb) -> bool {
        na::partial_le(&self.mins, &other.mins) && na::partial_ge(&self.maxs, &other.maxs)
    }

    #[inline]
    fn merge(&mut self, other: &Aabb) {
        self.mins = self.mins.inf(&other.mins);
        self.maxs = self.maxs.sup(&other.maxs);
    }

    #[inline]
    fn loosen(&mut self, amount: Real) {
        assert!(amount >= 0.0, "The loosening margin must be positive.");
        self.mins -= Vector::repeat(amount);
        self.maxs += Vector::repeat(amount);
    }

    #[inline]
    fn surface_metric(&self) -> Real {
        self.half_area()
    }
}

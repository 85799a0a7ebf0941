//! Traits and structure needed to cast rays.

use crate::math::{Point, Real, Vector};

/// A ray for ray-casting queries.
///
/// A ray is a half-infinite line starting at `origin` and extending along `dir`. The direction
/// does not need to be normalized: the time of impact reported by ray casts is expressed in
/// multiples of `dir`.
///
/// # Example
///
/// ```rust
/// # #[cfg(all(feature = "dim3", feature = "f32"))] {
/// use bvhkit3d::query::Ray;
/// use nalgebra::{Point3, Vector3};
///
/// let ray = Ray::new(Point3::origin(), Vector3::new(2.0, 0.0, 0.0));
/// assert_eq!(ray.point_at(1.5), Point3::new(3.0, 0.0, 0.0));
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[repr(C)]
pub struct Ray {
    /// Starting point of the ray.
    pub origin: Point<Real>,
    /// Direction of the ray.
    pub dir: Vector<Real>,
}

impl Ray {
    /// Creates a new ray starting from `origin` and with the direction `dir`.
    pub fn new(origin: Point<Real>, dir: Vector<Real>) -> Ray {
        Ray { origin, dir }
    }

    /// Computes the point `origin + dir * t`.
    #[inline]
    pub fn point_at(&self, t: Real) -> Point<Real> {
        self.origin + self.dir * t
    }
}

/// Result of a successful ray cast against a primitive.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct RayIntersection {
    /// The time of impact of the ray with the primitive.
    ///
    /// The hit point is obtained with `ray.point_at(time_of_impact)`.
    pub time_of_impact: Real,
    /// First barycentric coordinate of the hit point, if the primitive has any.
    pub u: Real,
    /// Second barycentric coordinate of the hit point, if the primitive has any.
    pub v: Real,
}

impl RayIntersection {
    /// Creates a new `RayIntersection` without barycentric coordinates.
    #[inline]
    pub fn new(time_of_impact: Real) -> RayIntersection {
        RayIntersection {
            time_of_impact,
            u: 0.0,
            v: 0.0,
        }
    }

    /// Creates a new `RayIntersection` with the barycentric coordinates `(u, v)` of the hit.
    #[inline]
    pub fn with_barycentrics(time_of_impact: Real, u: Real, v: Real) -> RayIntersection {
        RayIntersection {
            time_of_impact,
            u,
            v,
        }
    }
}

/// Traits of objects which can be tested for intersection with a ray.
pub trait RayCast {
    /// Computes the first intersection of `ray` with this object for a time of impact in
    /// `[tmin, tmax]`.
    fn cast_local_ray(&self, ray: &Ray, tmin: Real, tmax: Real) -> Option<RayIntersection>;

    /// Tests whether `ray` hits this object for a time of impact in `[tmin, tmax]`.
    #[inline]
    fn intersects_local_ray(&self, ray: &Ray, tmin: Real, tmax: Real) -> bool {
        self.cast_local_ray(ray, tmin, tmax).is_some()
    }
}

use crate::math::{Point, Real};
use crate::query::{Ray, RayCast, RayIntersection};
use crate::shape::Triangle;

impl RayCast for Triangle {
    #[inline]
    fn cast_local_ray(&self, ray: &Ray, tmin: Real, tmax: Real) -> Option<RayIntersection> {
        let inter = local_ray_intersection_with_triangle(&self.a, &self.b, &self.c, ray)?;

        if inter.time_of_impact >= tmin && inter.time_of_impact <= tmax {
            Some(inter)
        } else {
            None
        }
    }
}

/// Computes the intersection between a triangle and a ray.
///
/// Both faces of the triangle are considered. If an intersection is found, the time of impact
/// and the barycentric coordinates `(u, v)` of the hit point relative to `b` and `c` are
/// returned: the hit point is `a * (1 - u - v) + b * u + c * v`.
pub fn local_ray_intersection_with_triangle(
    a: &Point<Real>,
    b: &Point<Real>,
    c: &Point<Real>,
    ray: &Ray,
) -> Option<RayIntersection> {
    let ab = *b - *a;
    let ac = *c - *a;

    let n = ab.cross(&ac);
    let d = n.dot(&ray.dir);

    // The ray is parallel to the triangle plane.
    if d == 0.0 {
        return None;
    }

    let ap = ray.origin - *a;
    let t = ap.dot(&n);

    // The ray points away from the triangle plane.
    if (t < 0.0 && d < 0.0) || (t > 0.0 && d > 0.0) {
        return None;
    }

    let d = d.abs();
    let e = -ray.dir.cross(&ap);

    let (u, v) = if t < 0.0 {
        (-ac.dot(&e), ab.dot(&e))
    } else {
        (ac.dot(&e), -ab.dot(&e))
    };

    if u < 0.0 || u > d || v < 0.0 || u + v > d {
        return None;
    }

    let invd = 1.0 / d;
    Some(RayIntersection::with_barycentrics(
        t.abs() * invd,
        u * invd,
        v * invd,
    ))
}

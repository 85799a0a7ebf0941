use crate::bounding_volume::Aabb;
use crate::math::Real;
use crate::query::{Ray, RayCast, RayIntersection};

impl RayCast for Aabb {
    #[inline]
    fn cast_local_ray(&self, ray: &Ray, tmin: Real, tmax: Real) -> Option<RayIntersection> {
        self.cast_ray_interval(ray, tmin, tmax)
            .map(RayIntersection::new)
    }
}

#[cfg(test)]
mod test {
    use crate::bounding_volume::Aabb;
    use crate::math::{Point, Real, Vector};
    use crate::query::{Ray, RayCast};

    #[test]
    fn ray_starting_inside_hits_at_tmin() {
        let aabb = Aabb::from_half_extents(Point::origin(), Vector::repeat(1.0));
        let ray = Ray::new(Point::origin(), Vector::y());
        let hit = aabb.cast_local_ray(&ray, 0.0, 10.0).unwrap();
        assert_eq!(hit.time_of_impact, 0.0);
    }

    #[test]
    fn ray_pointing_away_misses() {
        let aabb = Aabb::from_half_extents(Point::new(5.0, 0.0, 0.0), Vector::repeat(1.0));
        let ray = Ray::new(Point::origin(), -Vector::x());
        assert!(!aabb.intersects_local_ray(&ray, 0.0, Real::MAX));
    }
}

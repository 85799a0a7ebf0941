use super::{random_ray, random_triangles, STRATEGIES};
use approx::assert_relative_eq;
use bvhkit3d::bounding_volume::Aabb;
use bvhkit3d::math::{Point, Real, Vector};
use bvhkit3d::partitioning::{BvhBuildStrategy, IndexedBvh, SoupBvh};
use bvhkit3d::query::{Hit, MultiHit, Ray, RayCast};
use bvhkit3d::shape::Triangle;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// The `k` closest times of impact in `[tmin, tmax]`, found without any acceleration structure.
fn brute_force(
    triangles: &[Triangle],
    ray: &Ray,
    tmin: Real,
    tmax: Real,
    k: usize,
) -> Vec<Real> {
    let mut tois: Vec<Real> = triangles
        .iter()
        .filter_map(|tri| tri.cast_local_ray(ray, tmin, tmax))
        .map(|inter| inter.time_of_impact)
        .filter(|toi| *toi >= tmin && *toi <= tmax)
        .collect();
    tois.sort_by(|a, b| a.partial_cmp(b).unwrap());
    tois.truncate(k);
    tois
}

fn check_hits(triangles: &[Triangle], ray: &Ray, hits: &[Hit], expected: &[Real], geom_id: u32) {
    assert_eq!(hits.len(), expected.len());

    for (hit, toi) in hits.iter().zip(expected) {
        assert_relative_eq!(hit.time_of_impact, *toi, epsilon = 1.0e-4);
        assert_eq!(hit.geom_id, geom_id);

        // The hit matches the primitive it claims to come from.
        let inter = triangles[hit.prim_id as usize]
            .cast_local_ray(ray, 0.0, Real::MAX)
            .unwrap();
        assert_relative_eq!(inter.time_of_impact, hit.time_of_impact, epsilon = 1.0e-4);
        assert_relative_eq!(inter.u, hit.u, epsilon = 1.0e-4);
        assert_relative_eq!(inter.v, hit.v, epsilon = 1.0e-4);
    }
}

#[test]
fn indexed_multi_hits_match_brute_force() {
    let mut rng = StdRng::seed_from_u64(10);
    let triangles = random_triangles(&mut rng, 400);

    for strategy in STRATEGIES {
        let tree = IndexedBvh::from_primitives(strategy, &triangles, 4).unwrap();
        let mut total_hits = 0;

        for _ in 0..200 {
            let ray = random_ray(&mut rng);
            let mut hits = MultiHit::<Hit, 4>::new();
            tree.cast_ray_primitives(&triangles, 0, &ray, 0.0, Real::MAX, &mut hits);

            let expected = brute_force(&triangles, &ray, 0.0, Real::MAX, 4);
            check_hits(&triangles, &ray, hits.valid(), &expected, 0);
            total_hits += expected.len();
        }

        assert!(total_hits > 100);
    }
}

#[test]
fn spatial_splits_never_report_a_primitive_twice() {
    let mut rng = StdRng::seed_from_u64(11);
    let triangles = random_triangles(&mut rng, 200);
    let tree =
        IndexedBvh::from_primitives(BvhBuildStrategy::SpatialSah, &triangles, 2).unwrap();

    for _ in 0..200 {
        let ray = random_ray(&mut rng);
        let mut hits = MultiHit::<Hit, 16>::new();
        tree.cast_ray_primitives(&triangles, 0, &ray, 0.0, Real::MAX, &mut hits);

        let mut ids: Vec<_> = hits.valid().iter().map(|hit| hit.prim_id).collect();
        let len = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), len);
    }
}

#[test]
fn soup_multi_hits_match_brute_force() {
    let mut rng = StdRng::seed_from_u64(12);
    let triangles = random_triangles(&mut rng, 400);

    for strategy in STRATEGIES {
        let tree = SoupBvh::from_primitives(strategy, &triangles, 4).unwrap();

        for _ in 0..200 {
            let ray = random_ray(&mut rng);
            let mut hits = MultiHit::<Hit, 3>::new();
            tree.cast_ray_primitives(7, &ray, 0.0, Real::MAX, &mut hits);

            let expected = brute_force(&triangles, &ray, 0.0, Real::MAX, 3);
            // Hit ids refer to the reordered primitives.
            check_hits(tree.primitives(), &ray, hits.valid(), &expected, 7);
        }
    }
}

#[test]
fn hits_are_restricted_to_the_query_interval() {
    let mut rng = StdRng::seed_from_u64(13);
    let triangles = random_triangles(&mut rng, 300);
    let tree = IndexedBvh::from_primitives(BvhBuildStrategy::BinnedSah, &triangles, 4).unwrap();
    let (tmin, tmax) = (27.0, 31.0);

    for _ in 0..200 {
        let ray = random_ray(&mut rng);
        let mut hits = MultiHit::<Hit, 8>::new();
        tree.cast_ray_primitives(&triangles, 0, &ray, tmin, tmax, &mut hits);

        let expected = brute_force(&triangles, &ray, tmin, tmax, 8);
        check_hits(&triangles, &ray, hits.valid(), &expected, 0);
        assert!(hits
            .valid()
            .iter()
            .all(|hit| hit.time_of_impact >= tmin && hit.time_of_impact <= tmax));
    }
}

#[test]
fn closest_hit_accumulator() {
    let mut rng = StdRng::seed_from_u64(14);
    let triangles = random_triangles(&mut rng, 300);
    let tree = IndexedBvh::from_primitives(BvhBuildStrategy::Median, &triangles, 4).unwrap();

    for _ in 0..200 {
        let ray = random_ray(&mut rng);
        let mut closest = Hit::default();
        tree.cast_ray_primitives(&triangles, 0, &ray, 0.0, Real::MAX, &mut closest);

        match brute_force(&triangles, &ray, 0.0, Real::MAX, 1).first() {
            Some(toi) => {
                assert!(closest.hit);
                assert_relative_eq!(closest.time_of_impact, *toi, epsilon = 1.0e-4);
            }
            None => assert!(!closest.hit),
        }
    }
}

#[test]
fn custom_intersection_callback() {
    // A row of unit boxes along the x axis.
    let boxes: Vec<_> = (0..20)
        .map(|i| {
            let center = Point::new(i as Real * 3.0, 0.0, 0.0);
            Aabb::from_half_extents(center, Vector::repeat(0.5))
        })
        .collect();
    let tree = IndexedBvh::from_primitives(BvhBuildStrategy::BinnedSah, &boxes, 2).unwrap();

    let ray = Ray::new(Point::new(-10.0, 0.0, 0.0), Vector::x());
    let mut hits = MultiHit::<Hit, 5>::new();
    let mut tested = 0;
    tree.cast_ray(&ray, 0.0, Real::MAX, &mut hits, |i| {
        tested += 1;
        boxes[i as usize]
            .cast_local_ray(&ray, 0.0, Real::MAX)
            .map(|inter| Hit::new(inter.time_of_impact, i, 1))
    });

    assert_eq!(tested, boxes.len());
    let ids: Vec<_> = hits.valid().iter().map(|hit| hit.prim_id).collect();
    assert_eq!(ids, [0, 1, 2, 3, 4]);
    assert_relative_eq!(hits[0].time_of_impact, 9.5);

    // A ray passing next to every box only visits the root.
    let miss = Ray::new(Point::new(-10.0, 5.0, 0.0), Vector::x());
    let mut hits = MultiHit::<Hit, 5>::new();
    tree.cast_ray(&miss, 0.0, Real::MAX, &mut hits, |_| panic!("No leaf should be reached."));
    assert_eq!(hits.valid_count(), 0);
}

#[test]
fn hits_on_the_interval_bounds_are_kept() {
    let boxes = [Aabb::from_half_extents(Point::origin(), Vector::repeat(0.5))];
    let indexed = IndexedBvh::from_primitives(BvhBuildStrategy::BinnedSah, &boxes, 4).unwrap();
    let soup = SoupBvh::from_primitives(BvhBuildStrategy::BinnedSah, &boxes, 4).unwrap();

    // A ray starting inside the box hits it at `tmin`.
    let inside = Ray::new(Point::origin(), Vector::x());
    let mut hits = MultiHit::<Hit, 4>::new();
    indexed.cast_ray_primitives(&boxes, 0, &inside, 0.0, Real::MAX, &mut hits);
    assert_eq!(hits.valid_count(), 1);
    assert_eq!(hits[0].time_of_impact, 0.0);

    let mut hits = MultiHit::<Hit, 4>::new();
    soup.cast_ray_primitives(0, &inside, 0.0, Real::MAX, &mut hits);
    assert_eq!(hits.valid_count(), 1);

    // The face of the box is exactly at `tmax`.
    let outside = Ray::new(Point::new(-2.0, 0.0, 0.0), Vector::x());
    let mut closest = Hit::default();
    indexed.cast_ray_primitives(&boxes, 0, &outside, 0.0, 1.5, &mut closest);
    assert!(closest.hit);
    assert_relative_eq!(closest.time_of_impact, 1.5);

    let mut closest = Hit::default();
    indexed.cast_ray_primitives(&boxes, 0, &outside, 0.0, 1.25, &mut closest);
    assert!(!closest.hit);
}

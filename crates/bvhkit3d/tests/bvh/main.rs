use bvhkit3d::math::{Point, Real, Vector};
use bvhkit3d::partitioning::BvhBuildStrategy;
use bvhkit3d::query::Ray;
use bvhkit3d::shape::Triangle;
use rand::rngs::StdRng;
use rand::Rng;

mod construction;
mod ray_queries;

const STRATEGIES: [BvhBuildStrategy; 3] = [
    BvhBuildStrategy::Median,
    BvhBuildStrategy::BinnedSah,
    BvhBuildStrategy::SpatialSah,
];

fn random_point(rng: &mut StdRng, extent: Real) -> Point<Real> {
    Point::new(
        rng.gen_range(-extent..extent),
        rng.gen_range(-extent..extent),
        rng.gen_range(-extent..extent),
    )
}

/// Triangles scattered in a cube of half-width 10, some of them much larger than the others.
fn random_triangles(rng: &mut StdRng, len: usize) -> Vec<Triangle> {
    (0..len)
        .map(|i| {
            let a = random_point(rng, 10.0);
            let size = if i % 10 == 0 { 8.0 } else { 1.5 };
            let b = a + random_point(rng, size).coords;
            let c = a + random_point(rng, size).coords;
            Triangle::new(a, b, c)
        })
        .collect()
}

/// A ray starting outside of the scene and aimed at a point near its center.
fn random_ray(rng: &mut StdRng) -> Ray {
    let origin = random_point(rng, 1.0).coords.normalize() * 30.0;
    let target = random_point(rng, 4.0);
    let dir: Vector<Real> = (target - Point::from(origin)).normalize();
    Ray::new(origin.into(), dir)
}

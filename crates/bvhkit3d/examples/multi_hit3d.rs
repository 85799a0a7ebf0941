use bvhkit3d::math::{Point, Real, Vector};
use bvhkit3d::partitioning::{BvhBuildStrategy, IndexedBvh};
use bvhkit3d::query::{Hit, MultiHit, Ray};
use bvhkit3d::shape::Triangle;

fn main() {
    // A stack of parallel quads, each made of two triangles.
    let mut triangles = vec![];
    for i in 0..10 {
        let z = i as Real * 2.0;
        let a = Point::new(-1.0, -1.0, z);
        let b = Point::new(1.0, -1.0, z);
        let c = Point::new(1.0, 1.0, z);
        let d = Point::new(-1.0, 1.0, z);
        triangles.push(Triangle::new(a, b, c));
        triangles.push(Triangle::new(a, c, d));
    }

    let tree = IndexedBvh::from_primitives(BvhBuildStrategy::SpatialSah, &triangles, 2)
        .expect("indexed trees accept any builder output");
    println!(
        "Built a tree with {} nodes and {} leaves (depth {}).",
        tree.nodes().len(),
        tree.leaf_count(),
        tree.depth()
    );

    // Keep the three closest quads crossed by a ray going through the whole stack.
    let ray = Ray::new(Point::new(0.1, 0.2, -5.0), Vector::z());
    let mut hits = MultiHit::<Hit, 3>::new();
    tree.cast_ray_primitives(&triangles, 0, &ray, 0.0, Real::MAX, &mut hits);

    for hit in hits.valid() {
        println!(
            "Hit triangle {} at t = {} (u = {}, v = {}).",
            hit.prim_id, hit.time_of_impact, hit.u, hit.v
        );
    }

    assert_eq!(hits.valid_count(), 3);
    assert!((hits[0].time_of_impact - 5.0).abs() < 1.0e-5);
}

use bvhkit3d::bounding_volume::Aabb;
use bvhkit3d::math::{Point, Real, Vector};
use bvhkit3d::partitioning::{BvhBuildStrategy, SoupBvh};
use bvhkit3d::query::{Hit, Ray};

fn main() {
    // A 10x10 grid of boxes.
    let boxes: Vec<_> = (0..100)
        .map(|i| {
            let center = Point::new((i % 10) as Real * 2.0, (i / 10) as Real * 2.0, 0.0);
            Aabb::from_half_extents(center, Vector::repeat(0.5))
        })
        .collect();

    // The tree stores its own copy of the boxes, reordered to match its leaves.
    let tree = SoupBvh::from_primitives(BvhBuildStrategy::BinnedSah, &boxes, 4)
        .expect("the binned builder emits every box exactly once");

    for (i, leaf) in tree.leaves(|_| true).enumerate() {
        println!("Leaf {}: {} boxes.", i, tree.leaf_primitives(leaf).len());
    }

    let ray = Ray::new(Point::new(6.0, 8.0, 10.0), -Vector::z());
    let mut closest = Hit::default();
    tree.cast_ray_primitives(0, &ray, 0.0, Real::MAX, &mut closest);

    let hit_box = tree.primitives()[closest.prim_id as usize];
    println!("The ray hits {:?} at t = {}.", hit_box, closest.time_of_impact);
    assert_eq!(hit_box.center(), Point::new(6.0, 8.0, 0.0));
}

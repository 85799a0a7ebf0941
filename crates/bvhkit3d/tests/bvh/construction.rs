use super::{random_triangles, STRATEGIES};
use bvhkit3d::bounding_volume::{Aabb, BoundingVolume};
use bvhkit3d::partitioning::{
    build_top_down, BuilderLeaf, BvhBuildStrategy, BvhBuilder, BvhNode, IndexedBvh, SoupBvh,
    SplitOptions, DEFAULT_MAX_LEAF_SIZE,
};
use bvhkit3d::shape::{Primitive, Triangle};
use bvhkit3d::utils;
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn indexed_triangle_trees_are_well_formed() {
    let mut rng = StdRng::seed_from_u64(1);
    let triangles = random_triangles(&mut rng, 500);

    for strategy in STRATEGIES {
        for max_leaf_size in [0, 1, 3, 16] {
            let mut tree = IndexedBvh::<BvhNode>::new();
            let summary = strategy.build(&mut tree, &triangles, max_leaf_size).unwrap();
            let max_leaf_size = if max_leaf_size == 0 {
                DEFAULT_MAX_LEAF_SIZE
            } else {
                max_leaf_size
            };

            let leaf_count = tree.assert_well_formed();
            assert_eq!(summary.node_count, 2 * leaf_count - 1);
            assert_eq!(summary.leaf_count, tree.leaf_count());
            assert_eq!(summary.max_depth, tree.depth());

            let mut referenced = vec![0usize; triangles.len()];
            for leaf in tree.leaves(|_| true) {
                let indices = tree.leaf_indices(leaf);
                assert!(!indices.is_empty());
                assert!(indices.len() <= max_leaf_size);

                for &i in indices {
                    referenced[i as usize] += 1;
                    assert!(leaf.aabb().intersects(&triangles[i as usize].aabb()));
                }
            }

            assert!(referenced.iter().all(|count| *count > 0));
            let total: usize = referenced.iter().sum();
            assert_eq!(total, tree.indices().len());
            if strategy != BvhBuildStrategy::SpatialSah {
                assert_eq!(total, triangles.len());
            }
        }
    }
}

#[test]
fn root_bounds_enclose_every_triangle() {
    let mut rng = StdRng::seed_from_u64(2);
    let triangles = random_triangles(&mut rng, 300);
    let expected = triangles
        .iter()
        .fold(Aabb::new_invalid(), |acc, tri| acc.merged(&tri.aabb()));

    for strategy in STRATEGIES {
        let tree = IndexedBvh::from_primitives(strategy, &triangles, 4).unwrap();
        let root = tree.root_bounds().unwrap();
        assert!(root.contains(&expected));

        let leaves_union = tree
            .leaves(|_| true)
            .fold(Aabb::new_invalid(), |acc, leaf| acc.merged(leaf.aabb()));
        if strategy == BvhBuildStrategy::SpatialSah {
            // Clipped references can be tighter than the triangles they come from.
            assert!(root.contains(&leaves_union));
        } else {
            assert_eq!(&leaves_union, root);
        }
    }
}

#[test]
fn soup_reordering_is_invertible() {
    let mut rng = StdRng::seed_from_u64(3);
    let triangles = random_triangles(&mut rng, 200);

    for strategy in STRATEGIES {
        let tree = SoupBvh::from_primitives(strategy, &triangles, 4).unwrap();
        assert_eq!(tree.primitives().len(), triangles.len());
        let _ = tree.assert_well_formed();

        for leaf in tree.leaves(|_| true) {
            for tri in tree.leaf_primitives(leaf) {
                assert!(leaf.aabb().contains(&tri.aabb()));
            }
        }

        // Recover the permutation applied to the input.
        let perm: Vec<u32> = tree
            .primitives()
            .iter()
            .map(|tri| triangles.iter().position(|t| t == tri).unwrap() as u32)
            .collect();
        utils::check_permutation(&perm, triangles.len()).unwrap();

        let inverse = utils::invert_permutation(&perm);
        let restored = utils::reorder(&inverse, tree.primitives()).unwrap();
        assert_eq!(restored, triangles);
    }
}

/// A range of consecutive triangles, split at its midpoint.
#[derive(Clone)]
struct Chunk {
    aabb: Aabb,
    start: u32,
    end: u32,
}

impl BuilderLeaf for Chunk {
    type Bounds = Aabb;

    fn bounds(&self) -> &Aabb {
        &self.aabb
    }

    fn primitive_count(&self) -> usize {
        (self.end - self.start) as usize
    }
}

/// A builder that only splits the root.
struct SplitOnce;

impl SplitOnce {
    fn chunk(triangles: &[Triangle], start: u32, end: u32) -> Chunk {
        let aabb = triangles[start as usize..end as usize]
            .iter()
            .fold(Aabb::new_invalid(), |acc, tri| acc.merged(&tri.aabb()));
        Chunk { aabb, start, end }
    }
}

impl BvhBuilder<Triangle> for SplitOnce {
    type LeafInfo = Chunk;

    fn init(&mut self, primitives: &[Triangle]) -> Chunk {
        Self::chunk(primitives, 0, primitives.len() as u32)
    }

    fn split(
        &mut self,
        leaf: &Chunk,
        primitives: &[Triangle],
        max_leaf_size: usize,
        _: SplitOptions,
    ) -> Option<[Chunk; 2]> {
        if leaf.start != 0 || leaf.end as usize != primitives.len() {
            return None;
        }
        if leaf.primitive_count() <= max_leaf_size {
            return None;
        }

        let mid = leaf.end / 2;
        Some([
            Self::chunk(primitives, 0, mid),
            Self::chunk(primitives, mid, leaf.end),
        ])
    }

    fn insert_indices(&mut self, indices: &mut Vec<u32>, leaf: &Chunk) -> usize {
        indices.extend(leaf.start..leaf.end);
        leaf.primitive_count()
    }
}

#[test]
fn user_defined_builders_drive_the_construction() {
    let mut rng = StdRng::seed_from_u64(4);
    let triangles = random_triangles(&mut rng, 8);

    let mut tree = IndexedBvh::<BvhNode>::new();
    let summary = build_top_down(&mut tree, &mut SplitOnce, &triangles, 4).unwrap();
    assert_eq!(summary.node_count, 3);
    assert_eq!(summary.leaf_count, 2);
    assert_eq!(tree.indices(), [0, 1, 2, 3, 4, 5, 6, 7]);

    let mut soup = SoupBvh::<Triangle, BvhNode>::new();
    let _ = build_top_down(&mut soup, &mut SplitOnce, &triangles, 4).unwrap();
    assert_eq!(soup.primitives(), &triangles[..]);
    assert_eq!(soup.assert_well_formed(), 2);
}

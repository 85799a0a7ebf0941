use super::bvh_node::{BvhNodeKind, TreeNode};
use super::bvh_tree::{IndexedBvh, SoupBvh};
use crate::bounding_volume::Aabb;
use crate::math::Real;
use crate::query::multi_hit::in_range;
use crate::query::{Hit, HitAccumulator, Ray, RayCast};
use alloc::collections::BTreeSet;
use smallvec::SmallVec;

const TRAVERSAL_STACK_SIZE: usize = 32;

/// Iterator through the leaves of a tree, in depth-first order, left child first.
pub struct Leaves<'a, N, Check: Fn(&N) -> bool> {
    nodes: &'a [N],
    stack: SmallVec<[&'a N; TRAVERSAL_STACK_SIZE]>,
    check: Check,
}

impl<'a, N: TreeNode, Check: Fn(&N) -> bool> Leaves<'a, N, Check> {
    fn new(nodes: &'a [N], check: Check) -> Self {
        let mut stack = SmallVec::new();

        if let Some(root) = nodes.first() {
            if check(root) {
                stack.push(root);
            }
        }

        Leaves {
            nodes,
            stack,
            check,
        }
    }
}

impl<'a, N: TreeNode, Check: Fn(&N) -> bool> Iterator for Leaves<'a, N, Check> {
    type Item = &'a N;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let node = self.stack.pop()?;

            match node.kind() {
                BvhNodeKind::Leaf { .. } => return Some(node),
                BvhNodeKind::Inner { first_child } => {
                    let left = &self.nodes[first_child as usize];
                    let right = &self.nodes[first_child as usize + 1];

                    if (self.check)(right) {
                        self.stack.push(right);
                    }

                    if (self.check)(left) {
                        self.stack.push(left);
                    }
                }
            }
        }
    }
}

/// Visits the leaves whose bounds are hit by `ray` in `[tmin, tmax]`, nearest child first.
fn traverse_ray<N, F>(nodes: &[N], ray: &Ray, tmin: Real, tmax: Real, mut visit_leaf: F)
where
    N: TreeNode<Bounds = Aabb>,
    F: FnMut(u32, u32),
{
    let root_hit = nodes
        .first()
        .and_then(|root| root.bounds().cast_ray_interval(ray, tmin, tmax));

    if root_hit.is_none() {
        return;
    }

    let mut stack: SmallVec<[u32; TRAVERSAL_STACK_SIZE]> = SmallVec::new();
    stack.push(0);

    while let Some(id) = stack.pop() {
        match nodes[id as usize].kind() {
            BvhNodeKind::Leaf { first, count } => visit_leaf(first, count),
            BvhNodeKind::Inner { first_child } => {
                let left = first_child;
                let right = first_child + 1;
                let left_hit = nodes[left as usize]
                    .bounds()
                    .cast_ray_interval(ray, tmin, tmax);
                let right_hit = nodes[right as usize]
                    .bounds()
                    .cast_ray_interval(ray, tmin, tmax);

                // The child pushed last is visited first.
                match (left_hit, right_hit) {
                    (Some(l), Some(r)) if l <= r => {
                        stack.push(right);
                        stack.push(left);
                    }
                    (Some(_), Some(_)) => {
                        stack.push(left);
                        stack.push(right);
                    }
                    (Some(_), None) => stack.push(left),
                    (None, Some(_)) => stack.push(right),
                    (None, None) => {}
                }
            }
        }
    }
}

impl<N: TreeNode> IndexedBvh<N> {
    /// Iterates through the leaves, in depth-first order.
    ///
    /// The `check_node` closure is called on every traversed node. If it returns `false` then the
    /// node and all its descendants won’t be iterated on.
    pub fn leaves<F: Fn(&N) -> bool>(&self, check_node: F) -> Leaves<'_, N, F> {
        Leaves::new(&self.nodes, check_node)
    }
}

impl<N: TreeNode<Bounds = Aabb>> IndexedBvh<N> {
    /// Casts a ray on this tree and feeds every hit to `acc`.
    ///
    /// `intersect` is called with the index of each primitive whose leaf is crossed by the ray.
    /// Hits outside of `[tmin, tmax]` are discarded. Primitives referenced by several leaves
    /// are only tested once.
    pub fn cast_ray<A, F>(&self, ray: &Ray, tmin: Real, tmax: Real, acc: &mut A, mut intersect: F)
    where
        A: HitAccumulator<Hit>,
        F: FnMut(u32) -> Option<Hit>,
    {
        let mut tested = BTreeSet::new();

        traverse_ray(&self.nodes, ray, tmin, tmax, |first, count| {
            let range = first as usize..(first + count) as usize;
            for &index in &self.indices[range] {
                if !tested.insert(index) {
                    continue;
                }

                if let Some(hit) = intersect(index) {
                    if in_range(&hit, tmin, tmax) {
                        acc.update(&hit);
                    }
                }
            }
        })
    }

    /// Casts a ray on the `primitives` this tree was built from.
    ///
    /// The hits are tagged with the primitive index and `geom_id`.
    pub fn cast_ray_primitives<P, A>(
        &self,
        primitives: &[P],
        geom_id: u32,
        ray: &Ray,
        tmin: Real,
        tmax: Real,
        acc: &mut A,
    ) where
        P: RayCast,
        A: HitAccumulator<Hit>,
    {
        self.cast_ray(ray, tmin, tmax, acc, |index| {
            primitives[index as usize]
                .cast_local_ray(ray, tmin, tmax)
                .map(|inter| Hit::from_intersection(inter, index, geom_id))
        })
    }
}

impl<P, N: TreeNode> SoupBvh<P, N> {
    /// Iterates through the leaves, in depth-first order.
    ///
    /// See [`IndexedBvh::leaves`].
    pub fn leaves<F: Fn(&N) -> bool>(&self, check_node: F) -> Leaves<'_, N, F> {
        Leaves::new(&self.nodes, check_node)
    }
}

impl<P, N: TreeNode<Bounds = Aabb>> SoupBvh<P, N> {
    /// Casts a ray on this tree and feeds every hit to `acc`.
    ///
    /// `intersect` is called with each primitive whose leaf is crossed by the ray, together
    /// with its position in [`Self::primitives`].
    pub fn cast_ray<A, F>(&self, ray: &Ray, tmin: Real, tmax: Real, acc: &mut A, mut intersect: F)
    where
        A: HitAccumulator<Hit>,
        F: FnMut(u32, &P) -> Option<Hit>,
    {
        traverse_ray(&self.nodes, ray, tmin, tmax, |first, count| {
            let range = first as usize..(first + count) as usize;
            for (index, primitive) in range.clone().zip(&self.primitives[range]) {
                if let Some(hit) = intersect(index as u32, primitive) {
                    if in_range(&hit, tmin, tmax) {
                        acc.update(&hit);
                    }
                }
            }
        })
    }

    /// Casts a ray on the primitives of this tree.
    ///
    /// The hits are tagged with the position of the primitive in [`Self::primitives`] and
    /// `geom_id`.
    pub fn cast_ray_primitives<A>(
        &self,
        geom_id: u32,
        ray: &Ray,
        tmin: Real,
        tmax: Real,
        acc: &mut A,
    ) where
        P: RayCast,
        A: HitAccumulator<Hit>,
    {
        self.cast_ray(ray, tmin, tmax, acc, |index, primitive| {
            primitive
                .cast_local_ray(ray, tmin, tmax)
                .map(|inter| Hit::from_intersection(inter, index, geom_id))
        })
    }
}

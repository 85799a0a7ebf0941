use super::random_hit;
use bvhkit3d::math::Real;
use bvhkit3d::query::{is_closer_than_any, Hit, HitAccumulator, MultiHit};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[test]
fn valid_entries_stay_sorted_and_bounded() {
    let mut rng = StdRng::seed_from_u64(0);

    for _ in 0..50 {
        let mut hits = MultiHit::<Hit, 5>::new();
        let mut inserted: Vec<Real> = vec![];

        for prim_id in 0..40 {
            let candidate = random_hit(&mut rng, prim_id);
            hits.update(&candidate);

            if candidate.hit {
                inserted.push(candidate.time_of_impact);
            }

            inserted.sort_by(|a, b| a.partial_cmp(b).unwrap());
            let expected: Vec<_> = inserted.iter().copied().take(5).collect();
            let found: Vec<_> = hits.valid().iter().map(|h| h.time_of_impact).collect();
            assert_eq!(found, expected);

            // Invalid entries only appear after the valid ones.
            assert!(hits.iter().skip(hits.valid_count()).all(|h| !h.hit));
        }
    }
}

#[test]
fn merging_sorted_lists() {
    let mut rng = StdRng::seed_from_u64(1);

    for _ in 0..100 {
        let mut a = MultiHit::<Hit, 4>::new();
        let mut b = MultiHit::<Hit, 4>::new();
        let mut all: Vec<Real> = vec![];

        let count = rng.gen_range(0..8);

        for prim_id in 0..count {
            let hit = random_hit(&mut rng, prim_id);
            if prim_id % 2 == 0 {
                a.update(&hit);
            } else {
                b.update(&hit);
            }
        }

        all.extend(a.valid().iter().map(|h| h.time_of_impact));
        all.extend(b.valid().iter().map(|h| h.time_of_impact));
        all.sort_by(|x, y| x.partial_cmp(y).unwrap());
        all.truncate(4);

        a.update(&b);
        let merged: Vec<_> = a.valid().iter().map(|h| h.time_of_impact).collect();
        assert_eq!(merged, all);
    }
}

#[test]
fn custom_comparator_orders_farthest_first() {
    let mut hits = MultiHit::<Hit, 3>::new();
    let farther = |query: &Hit, entry: &Hit| {
        query.hit && (!entry.hit || query.time_of_impact > entry.time_of_impact)
    };

    for (i, toi) in [5.0, 2.0, 8.0, 1.0, 3.0].into_iter().enumerate() {
        hits.update_with(&Hit::new(toi, i as u32, 0), farther);
    }

    let tois: Vec<_> = hits.valid().iter().map(|h| h.time_of_impact).collect();
    assert_eq!(tois, [8.0, 5.0, 3.0]);
}

#[test]
fn closer_than_any_valid_entry() {
    let mut reference = MultiHit::<Hit, 3>::new();
    let query = Hit::new(3.0, 0, 0);
    assert!(!is_closer_than_any(&query, &reference, 0.0, Real::MAX));

    reference.update(&Hit::new(4.0, 1, 0));
    assert!(is_closer_than_any(&query, &reference, 0.0, Real::MAX));
    assert!(!is_closer_than_any(
        &Hit::new(5.0, 2, 0),
        &reference,
        0.0,
        Real::MAX
    ));
    // Outside of the query interval.
    assert!(!is_closer_than_any(&query, &reference, 3.5, Real::MAX));
}

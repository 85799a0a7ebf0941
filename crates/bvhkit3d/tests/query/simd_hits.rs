use super::random_hit;
use bvhkit3d::math::SIMD_WIDTH;
use bvhkit3d::query::{Hit, HitAccumulator, MultiHit, SimdHit};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn random_packet(rng: &mut StdRng, prim_id: u32) -> ([Hit; SIMD_WIDTH], SimdHit) {
    let lanes = [(); SIMD_WIDTH].map(|_| random_hit(rng, prim_id));
    (lanes, SimdHit::from_lanes(lanes))
}

fn assert_lanes_match<const K: usize>(packet: &MultiHit<SimdHit, K>, lanes: &[MultiHit<Hit, K>]) {
    for (lane, scalar) in lanes.iter().enumerate() {
        assert_eq!(packet.lane_valid_count(lane), scalar.valid_count());

        for k in 0..K {
            assert_eq!(packet[k].extract(lane), scalar[k]);
        }
    }
}

#[test]
fn packets_match_independent_lanes() {
    let mut rng = StdRng::seed_from_u64(2);

    for _ in 0..20 {
        let mut packet = MultiHit::<SimdHit, 4>::new();
        let mut lanes = [MultiHit::<Hit, 4>::new(); SIMD_WIDTH];

        for prim_id in 0..30 {
            let (hits, simd_hits) = random_packet(&mut rng, prim_id);
            packet.update(&simd_hits);

            for (acc, hit) in lanes.iter_mut().zip(hits.iter()) {
                acc.update(hit);
            }

            assert_lanes_match(&packet, &lanes);
        }
    }
}

#[test]
fn packet_merges_match_independent_lanes() {
    let mut rng = StdRng::seed_from_u64(3);

    for _ in 0..50 {
        let mut packets = [MultiHit::<SimdHit, 3>::new(); 2];
        let mut lanes = [[MultiHit::<Hit, 3>::new(); SIMD_WIDTH]; 2];

        for prim_id in 0..6 {
            let target = (prim_id % 2) as usize;
            let (hits, simd_hits) = random_packet(&mut rng, prim_id);
            packets[target].update(&simd_hits);

            for (acc, hit) in lanes[target].iter_mut().zip(hits.iter()) {
                acc.update(hit);
            }
        }

        let [mut packet, other_packet] = packets;
        let [mut scalar, other_scalar] = lanes;
        packet.update(&other_packet);
        for (acc, other) in scalar.iter_mut().zip(other_scalar.iter()) {
            acc.update(other);
        }

        assert_lanes_match(&packet, &scalar);
    }
}

#[test]
fn closest_hit_per_lane() {
    let mut rng = StdRng::seed_from_u64(4);
    let mut packet = SimdHit::default();
    let mut lanes = [Hit::default(); SIMD_WIDTH];

    for prim_id in 0..50 {
        let (hits, simd_hits) = random_packet(&mut rng, prim_id);
        packet.update(&simd_hits);

        for (acc, hit) in lanes.iter_mut().zip(hits.iter()) {
            acc.update(hit);
        }
    }

    for (lane, hit) in lanes.iter().enumerate() {
        assert_eq!(packet.extract(lane), *hit);
    }
}

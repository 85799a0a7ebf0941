use bvhkit3d::math::Real;
use bvhkit3d::query::Hit;
use rand::rngs::StdRng;
use rand::Rng;

mod multi_hit;
mod simd_hits;

/// A hit with a random time of impact in `[0, 100)`, or a miss one time out of five.
fn random_hit(rng: &mut StdRng, prim_id: u32) -> Hit {
    let toi: Real = rng.gen_range(0.0..100.0);

    if rng.gen_bool(0.2) {
        Hit {
            hit: false,
            ..Hit::new(toi, prim_id, 0)
        }
    } else {
        Hit::new(toi, prim_id, 0)
    }
}

use crate::math::{Real, SimdBool, SimdReal, SIMD_WIDTH};
use crate::query::RayIntersection;
use simba::simd::{SimdBool as _, SimdPartialOrd, SimdValue};

/// A ray hit record, possibly spanning several SIMD lanes.
///
/// Every lane carries an independent record: its time of impact, whether it holds a hit at all,
/// and an implementation-defined payload. The lane-parallel algorithms of
/// [`multi_hit`](crate::query::multi_hit) only rely on this trait, so they run unchanged on a
/// scalar [`Hit`] (one lane) and on a [`SimdHit`] (`SIMD_WIDTH` lanes).
pub trait HitRecord: Copy {
    /// The per-lane time of impact.
    type Distance: SimdPartialOrd<Element = Real, SimdBool = Self::Mask> + Copy;
    /// The per-lane boolean mask.
    type Mask: simba::simd::SimdBool + SimdValue<Element = bool, SimdBool = Self::Mask>;

    /// The time of impact of each lane. Meaningless for lanes where [`Self::is_hit`] is unset.
    fn time_of_impact(&self) -> Self::Distance;

    /// The lanes holding a valid hit.
    fn is_hit(&self) -> Self::Mask;

    /// A record with no valid lane.
    fn miss() -> Self;

    /// Lane-wise blend: lanes set in `mask` are taken from `self`, the others from `other`.
    fn select(self, mask: Self::Mask, other: Self) -> Self;
}

/// The hit of a single ray with a primitive.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Hit {
    /// The time of impact along the ray.
    pub time_of_impact: Real,
    /// Whether this record holds a hit.
    pub hit: bool,
    /// The index of the primitive that was hit.
    pub prim_id: u32,
    /// A user-defined identifier of the geometry containing the primitive.
    pub geom_id: u32,
    /// First barycentric coordinate of the hit point.
    pub u: Real,
    /// Second barycentric coordinate of the hit point.
    pub v: Real,
}

impl Default for Hit {
    fn default() -> Self {
        Self::miss()
    }
}

impl Hit {
    /// A valid hit at `time_of_impact` with the given ids and no barycentric coordinates.
    pub fn new(time_of_impact: Real, prim_id: u32, geom_id: u32) -> Self {
        Self {
            time_of_impact,
            hit: true,
            prim_id,
            geom_id,
            u: 0.0,
            v: 0.0,
        }
    }

    /// A valid hit built from the result of a ray cast.
    pub fn from_intersection(inter: RayIntersection, prim_id: u32, geom_id: u32) -> Self {
        Self {
            time_of_impact: inter.time_of_impact,
            hit: true,
            prim_id,
            geom_id,
            u: inter.u,
            v: inter.v,
        }
    }
}

impl HitRecord for Hit {
    type Distance = Real;
    type Mask = bool;

    #[inline]
    fn time_of_impact(&self) -> Real {
        self.time_of_impact
    }

    #[inline]
    fn is_hit(&self) -> bool {
        self.hit
    }

    #[inline]
    fn miss() -> Self {
        Self {
            time_of_impact: Real::MAX,
            hit: false,
            prim_id: u32::MAX,
            geom_id: u32::MAX,
            u: 0.0,
            v: 0.0,
        }
    }

    #[inline]
    fn select(self, mask: bool, other: Self) -> Self {
        if mask {
            self
        } else {
            other
        }
    }
}

/// The hits of a packet of `SIMD_WIDTH` rays, stored as a structure of arrays.
#[derive(Copy, Clone, Debug)]
pub struct SimdHit {
    /// The time of impact of each lane.
    pub time_of_impact: SimdReal,
    /// The lanes holding a hit.
    pub hit: SimdBool,
    /// The primitive index of each lane.
    pub prim_id: [u32; SIMD_WIDTH],
    /// The geometry id of each lane.
    pub geom_id: [u32; SIMD_WIDTH],
    /// First barycentric coordinate of each lane.
    pub u: SimdReal,
    /// Second barycentric coordinate of each lane.
    pub v: SimdReal,
}

impl Default for SimdHit {
    fn default() -> Self {
        Self::miss()
    }
}

impl SimdHit {
    /// A packet with every lane set to `hit`.
    pub fn splat(hit: Hit) -> Self {
        Self {
            time_of_impact: SimdReal::splat(hit.time_of_impact),
            hit: SimdBool::splat(hit.hit),
            prim_id: [hit.prim_id; SIMD_WIDTH],
            geom_id: [hit.geom_id; SIMD_WIDTH],
            u: SimdReal::splat(hit.u),
            v: SimdReal::splat(hit.v),
        }
    }

    /// Packs one scalar hit per lane.
    pub fn from_lanes(lanes: [Hit; SIMD_WIDTH]) -> Self {
        let mut result = Self::miss();
        for (i, hit) in lanes.iter().enumerate() {
            result.replace(i, *hit);
        }
        result
    }

    /// The scalar hit stored in `lane`.
    pub fn extract(&self, lane: usize) -> Hit {
        Hit {
            time_of_impact: self.time_of_impact.extract(lane),
            hit: self.hit.extract(lane),
            prim_id: self.prim_id[lane],
            geom_id: self.geom_id[lane],
            u: self.u.extract(lane),
            v: self.v.extract(lane),
        }
    }

    /// Overwrites the content of `lane` with `hit`.
    pub fn replace(&mut self, lane: usize, hit: Hit) {
        self.time_of_impact.replace(lane, hit.time_of_impact);
        self.hit.replace(lane, hit.hit);
        self.prim_id[lane] = hit.prim_id;
        self.geom_id[lane] = hit.geom_id;
        self.u.replace(lane, hit.u);
        self.v.replace(lane, hit.v);
    }
}

impl HitRecord for SimdHit {
    type Distance = SimdReal;
    type Mask = SimdBool;

    #[inline]
    fn time_of_impact(&self) -> SimdReal {
        self.time_of_impact
    }

    #[inline]
    fn is_hit(&self) -> SimdBool {
        self.hit
    }

    #[inline]
    fn miss() -> Self {
        Self::splat(Hit::miss())
    }

    fn select(self, mask: SimdBool, other: Self) -> Self {
        let bits = mask.bitmask();
        let mut prim_id = other.prim_id;
        let mut geom_id = other.geom_id;

        for lane in 0..SIMD_WIDTH {
            if bits & (1 << lane) != 0 {
                prim_id[lane] = self.prim_id[lane];
                geom_id[lane] = self.geom_id[lane];
            }
        }

        Self {
            time_of_impact: self.time_of_impact.select(mask, other.time_of_impact),
            hit: (self.hit & mask) | (other.hit & !mask),
            prim_id,
            geom_id,
            u: self.u.select(mask, other.u),
            v: self.v.select(mask, other.v),
        }
    }
}

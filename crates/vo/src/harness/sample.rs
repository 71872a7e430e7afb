//! Random trial sampling with replay tokens.
//!
//! Determinism uses a replay token `(seed, index)` mixed into a single RNG per
//! trial, so trial `index` of a run can be regenerated without drawing the
//! preceding ones.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{FuzzCfg, Trial};
use crate::geom::{Agent, Vec2};

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    #[inline]
    pub fn new(seed: u64, index: u64) -> Self {
        Self { seed, index }
    }

    #[inline]
    pub(crate) fn to_std_rng(self) -> StdRng {
        // SplitMix64 finalizer.
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }
}

/// Draw one trial: coordinates uniform in `[-coord_bound, coord_bound)`,
/// radii uniform in `(0, radius_max]`.
///
/// Assumes `cfg` passed `FuzzCfg::validate`; empty ranges would panic in `gen_range`.
pub fn sample_trial<R: Rng>(rng: &mut R, cfg: &FuzzCfg) -> Trial {
    let pa = point(rng, cfg.coord_bound);
    let pb = point(rng, cfg.coord_bound);
    let ra = cfg.radius_max - rng.gen_range(0.0..cfg.radius_max);
    let rb = cfg.radius_max - rng.gen_range(0.0..cfg.radius_max);
    let va = point(rng, cfg.coord_bound);
    let vb = point(rng, cfg.coord_bound);
    Trial {
        a: Agent::new(pa, ra),
        b: Agent::new(pb, rb),
        va,
        vb,
    }
}

#[inline]
fn point<R: Rng>(rng: &mut R, b: f64) -> Vec2 {
    Vec2::new(rng.gen_range(-b..b), rng.gen_range(-b..b))
}

/// Trial for a replay token.
pub fn draw_trial(cfg: &FuzzCfg, tok: ReplayToken) -> Trial {
    let mut rng = tok.to_std_rng();
    sample_trial(&mut rng, cfg)
}

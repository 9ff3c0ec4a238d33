//! Retry the local search from several deterministic starts.
//!
//! Start 0 is the configured guess; start `k > 0` jitters it with an RNG
//! derived from `(seed, k)`, so any single start can be replayed alone.

use nalgebra::Vector2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{optimize_with, FitCfg, OptimizationResult};
use crate::curve::heart_curve;
use crate::error::{FitError, InvalidArgument};
use crate::geom::{bounds, validate_cloud, Point};
use crate::nearest::CloudIndex;
use crate::simplex::NelderMead;
use crate::transform::SimilarityParams;

/// Uniform jitter half-widths around the configured start.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StartJitter {
    /// Relative scale jitter: `s · (1 + u·scale_frac)`.
    pub scale_frac: f64,
    /// Absolute angle jitter (radians).
    pub angle: f64,
    /// Translation jitter as a fraction of the cloud's bounding-box extent.
    pub translation_frac: f64,
}

impl Default for StartJitter {
    fn default() -> Self {
        Self {
            scale_frac: 0.5,
            angle: std::f64::consts::FRAC_PI_4,
            translation_frac: 0.25,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MultiStartCfg {
    pub starts: usize,
    pub seed: u64,
    pub jitter: StartJitter,
}

impl Default for MultiStartCfg {
    fn default() -> Self {
        Self {
            starts: 8,
            seed: 0,
            jitter: StartJitter::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MultiStartResult {
    pub best: OptimizationResult,
    /// Which start produced `best` (0 = configured guess).
    pub best_start: usize,
    /// `(start, final cost)` per start, in run order.
    pub runs: Vec<(SimilarityParams, f64)>,
}

#[inline]
fn start_rng(seed: u64, index: u64) -> StdRng {
    // SplitMix64 finalizer.
    fn mix(mut x: u64) -> u64 {
        x ^= x >> 30;
        x = x.wrapping_mul(0xbf58476d1ce4e5b9);
        x ^= x >> 27;
        x = x.wrapping_mul(0x94d049bb133111eb);
        x ^ (x >> 31)
    }
    StdRng::seed_from_u64(mix(seed ^ mix(index.wrapping_add(0x9e3779b97f4a7c15))))
}

/// Start `k` of a multi-start run.
pub fn start_params(
    base: SimilarityParams,
    cloud: &[Point],
    ms: &MultiStartCfg,
    k: usize,
) -> SimilarityParams {
    if k == 0 {
        return base;
    }
    let extent = bounds(cloud)
        .map(|b| b.extent())
        .unwrap_or_else(Vector2::zeros);
    let mut rng = start_rng(ms.seed, k as u64);
    let mut u = || rng.gen_range(-1.0..=1.0);
    let j = &ms.jitter;
    SimilarityParams::new(
        base.scale * (1.0 + u() * j.scale_frac),
        base.angle + u() * j.angle,
        base.tx + u() * j.translation_frac * extent.x,
        base.ty + u() * j.translation_frac * extent.y,
    )
}

/// Best of `ms.starts` local searches; the curve and index are built once.
pub fn multistart(
    cloud: &[Point],
    cfg: &FitCfg,
    ms: &MultiStartCfg,
) -> Result<MultiStartResult, FitError> {
    if ms.starts == 0 {
        return Err(InvalidArgument::NoStarts.into());
    }
    let curve = heart_curve(cfg.curve_points)?;
    validate_cloud(cloud)?;
    if !cfg.initial.is_finite() {
        return Err(InvalidArgument::NonFiniteGuess.into());
    }
    let index = CloudIndex::build(cfg.index, cloud)?;
    let minimizer = NelderMead::new(cfg.simplex);

    let mut best: Option<(usize, OptimizationResult)> = None;
    let mut runs = Vec::with_capacity(ms.starts);
    for k in 0..ms.starts {
        let start = start_params(cfg.initial, cloud, ms, k);
        let res = optimize_with(&curve, &index, start, &minimizer)?;
        runs.push((start, res.cost));
        if best.as_ref().is_none_or(|(_, b)| res.cost < b.cost) {
            best = Some((k, res));
        }
    }
    let (best_start, best) = best.ok_or(InvalidArgument::NoStarts)?;
    Ok(MultiStartResult {
        best,
        best_start,
        runs,
    })
}

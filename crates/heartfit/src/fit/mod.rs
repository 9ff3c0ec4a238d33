//! Fitting driver: place the heart curve over the densest part of a cloud.
//!
//! Pipeline
//! - generate the curve → bind a `CostEvaluator` to a cloud index →
//!   run a `Minimizer` over `[scale, angle, tx, ty]` from a configurable
//!   start → transform the curve with the winning parameters.
//!
//! Scope
//! - Local search only. The answer depends on the start; use `multistart`
//!   (or call again with another guess) to escape a poor basin.
//! - Inputs are validated up front; every error reaches the caller unchanged
//!   and no partial result is produced.
//!
//! Code cross-refs: `simplex::{Minimizer,NelderMead}`, `nearest::CloudIndex`

mod multistart;

pub use multistart::{multistart, start_params, MultiStartCfg, MultiStartResult, StartJitter};

use nalgebra::Vector4;

use crate::cost::CostEvaluator;
use crate::curve::{heart_curve, DEFAULT_POINTS};
use crate::error::{FitError, InvalidArgument};
use crate::geom::{validate_cloud, Point};
use crate::nearest::{CloudIndex, IndexKind, NearestNeighbor};
use crate::simplex::{Minimizer, NelderMead, SimplexCfg};
use crate::transform::{transform_points, SimilarityParams};

/// Full fit configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FitCfg {
    pub curve_points: usize,
    pub initial: SimilarityParams,
    pub index: IndexKind,
    pub simplex: SimplexCfg,
}

impl Default for FitCfg {
    fn default() -> Self {
        Self {
            curve_points: DEFAULT_POINTS,
            initial: SimilarityParams::default(),
            index: IndexKind::default(),
            simplex: SimplexCfg::default(),
        }
    }
}

/// Terminal output of one optimization run.
#[derive(Clone, Debug, PartialEq)]
pub struct OptimizationResult {
    pub params: SimilarityParams,
    pub cost: f64,
    /// The curve mapped by `params`, same length and order as generated.
    pub curve: Vec<Point>,
    pub iterations: usize,
    pub evaluations: usize,
    pub converged: bool,
    /// Best cost at the start and after each iteration (non-increasing).
    pub history: Vec<f64>,
}

/// Single entry point with the brute-force index and Nelder–Mead.
pub fn optimize(
    curve_point_count: usize,
    cloud: &[Point],
    initial: SimilarityParams,
    max_iterations: usize,
    tolerance: f64,
) -> Result<OptimizationResult, FitError> {
    let cfg = FitCfg {
        curve_points: curve_point_count,
        initial,
        index: IndexKind::BruteForce,
        simplex: SimplexCfg::with_limits(max_iterations, tolerance),
    };
    fit(cloud, &cfg)
}

/// Validate, build the curve and index, then run one local search.
pub fn fit(cloud: &[Point], cfg: &FitCfg) -> Result<OptimizationResult, FitError> {
    let curve = heart_curve(cfg.curve_points)?;
    validate_cloud(cloud)?;
    if !cfg.initial.is_finite() {
        return Err(InvalidArgument::NonFiniteGuess.into());
    }
    let index = CloudIndex::build(cfg.index, cloud)?;
    optimize_with(&curve, &index, cfg.initial, &NelderMead::new(cfg.simplex))
}

/// Run `minimizer` on the fit objective for an already generated curve.
pub fn optimize_with<N, M>(
    curve: &[Point],
    index: &N,
    initial: SimilarityParams,
    minimizer: &M,
) -> Result<OptimizationResult, FitError>
where
    N: NearestNeighbor,
    M: Minimizer,
{
    if curve.is_empty() {
        return Err(InvalidArgument::ZeroPointCount.into());
    }
    if index.is_empty() {
        return Err(InvalidArgument::EmptyCloud.into());
    }
    if !initial.is_finite() {
        return Err(InvalidArgument::NonFiniteGuess.into());
    }
    let evaluator = CostEvaluator::new(curve, index);
    let best = minimizer.minimize(
        |x: &Vector4<f64>| evaluator.evaluate(&SimilarityParams::from_vector(x)),
        initial.to_vector(),
    )?;
    let params = SimilarityParams::from_vector(&best.x);
    Ok(OptimizationResult {
        params,
        cost: best.value,
        curve: transform_points(curve, &params),
        iterations: best.iterations,
        evaluations: best.evaluations,
        converged: best.converged,
        history: best.history,
    })
}

/// Index of the nearest cloud point for each curve point, in curve order.
pub fn snap_to_cloud<N: NearestNeighbor>(curve: &[Point], index: &N) -> Vec<usize> {
    curve
        .iter()
        .filter_map(|&p| index.nearest(p).map(|n| n.index))
        .collect()
}

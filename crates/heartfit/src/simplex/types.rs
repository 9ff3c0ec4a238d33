//! Configuration, result type and the `Minimizer` capability.

use nalgebra::SVector;

use crate::error::FitError;

/// Nelder–Mead configuration.
///
/// The coefficients are the textbook ones; the seeding deltas perturb each
/// coordinate of the start point to build the initial simplex.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimplexCfg {
    /// Upper bound on reflect/expand/contract/shrink rounds.
    pub max_iterations: usize,
    /// Relative spread of simplex costs below which the search stops.
    pub tolerance: f64,
    /// Relative perturbation for non-zero start coordinates.
    pub nonzero_delta: f64,
    /// Absolute perturbation for start coordinates that are exactly zero.
    pub zero_delta: f64,
    pub reflection: f64,
    pub expansion: f64,
    pub contraction: f64,
    pub shrink: f64,
}

impl Default for SimplexCfg {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            tolerance: 1e-12,
            nonzero_delta: 0.05,
            zero_delta: 0.00025,
            reflection: 1.0,
            expansion: 2.0,
            contraction: 0.5,
            shrink: 0.5,
        }
    }
}

impl SimplexCfg {
    pub fn with_limits(max_iterations: usize, tolerance: f64) -> Self {
        Self {
            max_iterations,
            tolerance,
            ..Self::default()
        }
    }
}

/// Best vertex found by a minimizer run.
#[derive(Clone, Debug, PartialEq)]
pub struct Minimum<const D: usize> {
    pub x: SVector<f64, D>,
    pub value: f64,
    pub iterations: usize,
    pub evaluations: usize,
    /// `true` when the tolerance test stopped the run (not the iteration cap).
    pub converged: bool,
    /// Best cost at the start and after every iteration.
    pub history: Vec<f64>,
}

/// Capability: `minimize(objective, start) -> best`.
pub trait Minimizer {
    fn minimize<const D: usize, F>(
        &self,
        objective: F,
        x0: SVector<f64, D>,
    ) -> Result<Minimum<D>, FitError>
    where
        F: FnMut(&SVector<f64, D>) -> Result<f64, FitError>;
}

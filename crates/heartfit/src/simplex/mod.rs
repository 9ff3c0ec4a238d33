//! Derivative-free local minimization (simplex direct search).
//!
//! Purpose
//! - Minimize a black-box, possibly non-smooth objective over a small fixed
//!   dimension. The fit objective is piecewise smooth with kinks wherever the
//!   nearest cloud point switches, so no gradients are used.
//! - Keep the search strategy behind `Minimizer` so another deterministic
//!   local search can be swapped in without touching the fitting driver.
//!
//! Guarantees
//! - Deterministic for a deterministic objective.
//! - `Minimum::history[k]` is the best cost after `k` iterations and never
//!   increases.
//! - Objective errors abort the search immediately and are returned as-is.
//!
//! Code cross-refs: `fit::optimize_with`, `types::SimplexCfg`

mod nelder_mead;
mod types;

pub use nelder_mead::NelderMead;
pub use types::{Minimizer, Minimum, SimplexCfg};

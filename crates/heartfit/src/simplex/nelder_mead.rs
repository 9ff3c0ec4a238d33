use nalgebra::SVector;

use super::types::{Minimizer, Minimum, SimplexCfg};
use crate::error::{FitError, InvalidArgument};

/// Absolute floor of the convergence test; lets runs whose best cost is 0 stop.
const SPREAD_FLOOR: f64 = 1e-10;

/// Nelder–Mead simplex search.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NelderMead {
    pub cfg: SimplexCfg,
}

impl NelderMead {
    pub fn new(cfg: SimplexCfg) -> Self {
        Self { cfg }
    }
}

/// Non-finite costs rank behind every finite one.
#[inline]
fn rank(f: f64) -> f64 {
    if f.is_finite() {
        f
    } else {
        f64::INFINITY
    }
}

struct Counted<F> {
    objective: F,
    evaluations: usize,
}

impl<F> Counted<F> {
    fn eval<const D: usize>(&mut self, x: &SVector<f64, D>) -> Result<f64, FitError>
    where
        F: FnMut(&SVector<f64, D>) -> Result<f64, FitError>,
    {
        self.evaluations += 1;
        (self.objective)(x)
    }
}

fn sort_vertices<const D: usize>(simplex: &mut [(SVector<f64, D>, f64)]) {
    simplex.sort_by(|a, b| rank(a.1).total_cmp(&rank(b.1)));
}

fn converged(lo: f64, hi: f64, tol: f64) -> bool {
    lo.is_finite() && hi.is_finite() && 2.0 * (hi - lo) <= tol * (hi.abs() + lo.abs()) + SPREAD_FLOOR
}

impl Minimizer for NelderMead {
    fn minimize<const D: usize, F>(
        &self,
        objective: F,
        x0: SVector<f64, D>,
    ) -> Result<Minimum<D>, FitError>
    where
        F: FnMut(&SVector<f64, D>) -> Result<f64, FitError>,
    {
        let cfg = &self.cfg;
        if !(cfg.tolerance.is_finite() && cfg.tolerance >= 0.0) {
            return Err(InvalidArgument::BadTolerance.into());
        }
        if x0.iter().any(|v| !v.is_finite()) {
            return Err(InvalidArgument::NonFiniteGuess.into());
        }
        let mut f = Counted {
            objective,
            evaluations: 0,
        };
        if D == 0 {
            let value = f.eval(&x0)?;
            return Ok(Minimum {
                x: x0,
                value,
                iterations: 0,
                evaluations: f.evaluations,
                converged: true,
                history: vec![value],
            });
        }

        // Seed: the start point plus one perturbed copy per coordinate.
        let mut simplex: Vec<(SVector<f64, D>, f64)> = Vec::with_capacity(D + 1);
        simplex.push((x0, f.eval(&x0)?));
        for i in 0..D {
            let mut x = x0;
            x[i] = if x[i] != 0.0 {
                x[i] * (1.0 + cfg.nonzero_delta)
            } else {
                cfg.zero_delta
            };
            let fx = f.eval(&x)?;
            simplex.push((x, fx));
        }
        sort_vertices(&mut simplex);
        if !simplex[0].1.is_finite() {
            return Err(FitError::NumericFailure {
                evaluations: f.evaluations,
            });
        }

        let mut history = vec![simplex[0].1];
        let mut iterations = 0;
        let mut done = false;
        while iterations < cfg.max_iterations {
            if converged(simplex[0].1, simplex[D].1, cfg.tolerance) {
                done = true;
                break;
            }

            let mut centroid = SVector::<f64, D>::zeros();
            for (x, _) in &simplex[..D] {
                centroid += x;
            }
            centroid /= D as f64;
            let worst = simplex[D].0;
            let f_best = rank(simplex[0].1);
            let f_second = rank(simplex[D - 1].1);
            let f_worst = rank(simplex[D].1);

            let xr = centroid + (centroid - worst) * cfg.reflection;
            let fr = f.eval(&xr)?;
            let mut shrink = false;
            if rank(fr) < f_best {
                let xe = centroid + (xr - centroid) * cfg.expansion;
                let fe = f.eval(&xe)?;
                simplex[D] = if rank(fe) < rank(fr) { (xe, fe) } else { (xr, fr) };
            } else if rank(fr) < f_second {
                simplex[D] = (xr, fr);
            } else if rank(fr) < f_worst {
                let xc = centroid + (xr - centroid) * cfg.contraction;
                let fc = f.eval(&xc)?;
                if rank(fc) <= rank(fr) {
                    simplex[D] = (xc, fc);
                } else {
                    shrink = true;
                }
            } else {
                let xc = centroid + (worst - centroid) * cfg.contraction;
                let fc = f.eval(&xc)?;
                if rank(fc) < f_worst {
                    simplex[D] = (xc, fc);
                } else {
                    shrink = true;
                }
            }

            if shrink {
                let anchor = simplex[0].0;
                for vertex in simplex.iter_mut().skip(1) {
                    let x = anchor + (vertex.0 - anchor) * cfg.shrink;
                    *vertex = (x, f.eval(&x)?);
                }
            }
            sort_vertices(&mut simplex);
            iterations += 1;
            history.push(simplex[0].1);
        }

        // A run that reaches tolerance on its last allowed round still converged.
        let done = done || converged(simplex[0].1, simplex[D].1, cfg.tolerance);
        let (x, value) = simplex[0];
        Ok(Minimum {
            x,
            value,
            iterations,
            evaluations: f.evaluations,
            converged: done,
            history,
        })
    }
}

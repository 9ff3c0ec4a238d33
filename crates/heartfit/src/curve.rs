//! Canonical heart curve.
//!
//! For `i ∈ [0, n)`, `t = 2π·i/n`:
//!   x(t) = 16·sin³(t)
//!   y(t) = 13·cos(t) − 5·cos(2t) − 2·cos(3t) − cos(4t)
//!
//! Samples follow increasing `t` and never repeat the `t = 2π` endpoint.

use std::f64::consts::TAU;

use crate::error::{FitError, InvalidArgument};
use crate::geom::Point;

/// Default sample count of the fitted curve.
pub const DEFAULT_POINTS: usize = 200;

/// Heart curve evaluated at parameter `t`.
#[inline]
pub fn heart_point(t: f64) -> Point {
    let s = t.sin();
    Point::new(
        16.0 * s * s * s,
        13.0 * t.cos() - 5.0 * (2.0 * t).cos() - 2.0 * (3.0 * t).cos() - (4.0 * t).cos(),
    )
}

/// `n` equally spaced samples of the heart curve.
pub fn heart_curve(n: usize) -> Result<Vec<Point>, FitError> {
    if n == 0 {
        return Err(InvalidArgument::ZeroPointCount.into());
    }
    let step = TAU / n as f64;
    Ok((0..n).map(|i| heart_point(step * i as f64)).collect())
}

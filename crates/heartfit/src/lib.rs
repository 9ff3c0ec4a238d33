//! Fit a heart outline onto the densest region of a planar point cloud.
//!
//! The core is pure and synchronous: no I/O, no logging, no global state.
//! Loading clouds and encoding results belongs to callers (see the `cli`
//! crate). Curves and clouds are read-only during a run, so independent runs
//! (e.g. different starts) may share them freely across threads.
//!
//! Layout
//! - `curve`: canonical heart samples.
//! - `transform`: 4-parameter similarity (scale, angle, tx, ty).
//! - `nearest`: nearest-neighbor capability (linear scan, 2-d tree).
//! - `cost`: total squared nearest-neighbor distance.
//! - `simplex`: derivative-free minimizer capability (Nelder–Mead).
//! - `fit`: the driver (`optimize`, `fit`, `multistart`, `snap_to_cloud`).

pub mod cost;
pub mod curve;
pub mod error;
pub mod fit;
pub mod geom;
pub mod nearest;
pub mod simplex;
pub mod transform;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::{FitError, InvalidArgument};
pub use fit::{fit, optimize, FitCfg, OptimizationResult};
pub use geom::Point;
pub use transform::SimilarityParams;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::cost::{total_squared_distance, CostEvaluator};
    pub use crate::curve::{heart_curve, DEFAULT_POINTS};
    pub use crate::error::{FitError, InvalidArgument};
    pub use crate::fit::{
        fit, multistart, optimize, optimize_with, snap_to_cloud, FitCfg, MultiStartCfg,
        MultiStartResult, OptimizationResult, StartJitter,
    };
    pub use crate::geom::{bounds, centroid, validate_cloud, Affine2, Bounds2, Point};
    pub use crate::nearest::{BruteForce, CloudIndex, IndexKind, KdTree, NearestNeighbor, Neighbor};
    pub use crate::simplex::{Minimizer, Minimum, NelderMead, SimplexCfg};
    pub use crate::transform::{transform_points, SimilarityParams};
}

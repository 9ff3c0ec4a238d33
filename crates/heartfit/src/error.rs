//! Error taxonomy for the fitting core.
//!
//! Two classes only: bad input (`InvalidArgument`) and a degenerate objective
//! (`NumericFailure`). Everything is returned at the point of detection; no
//! partial result accompanies an error.

use std::fmt;

/// Why an input was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InvalidArgument {
    /// The curve must have at least one point.
    ZeroPointCount,
    /// Nearest-neighbor reduction over an empty cloud is undefined.
    EmptyCloud,
    /// Some coordinate of the initial guess is NaN or infinite.
    NonFiniteGuess,
    /// Cloud point `index` has a NaN or infinite coordinate.
    NonFiniteCloudPoint { index: usize },
    /// Tolerance must be finite and non-negative.
    BadTolerance,
    /// Multi-start search needs at least one start.
    NoStarts,
}

impl fmt::Display for InvalidArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidArgument::ZeroPointCount => write!(f, "curve point count must be positive"),
            InvalidArgument::EmptyCloud => write!(f, "target cloud is empty"),
            InvalidArgument::NonFiniteGuess => {
                write!(f, "initial guess contains a non-finite parameter")
            }
            InvalidArgument::NonFiniteCloudPoint { index } => {
                write!(f, "cloud point {} has a non-finite coordinate", index)
            }
            InvalidArgument::BadTolerance => {
                write!(f, "tolerance must be finite and non-negative")
            }
            InvalidArgument::NoStarts => write!(f, "multi-start needs at least one start"),
        }
    }
}

/// Errors surfaced by curve generation, cost evaluation and optimization.
#[derive(Clone, Debug, PartialEq)]
pub enum FitError {
    InvalidArgument(InvalidArgument),
    /// The objective produced no finite value anywhere the minimizer looked.
    NumericFailure { evaluations: usize },
}

impl fmt::Display for FitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FitError::InvalidArgument(why) => write!(f, "invalid argument: {}", why),
            FitError::NumericFailure { evaluations } => write!(
                f,
                "objective has no finite value after {} evaluations (degenerate simplex)",
                evaluations
            ),
        }
    }
}

impl std::error::Error for FitError {}

impl From<InvalidArgument> for FitError {
    fn from(why: InvalidArgument) -> Self {
        FitError::InvalidArgument(why)
    }
}

//! Nearest-neighbor lookup over a fixed target cloud.
//!
//! Purpose
//! - Hide the lookup strategy behind one capability so the cost evaluator
//!   does not care whether it scans or walks a tree.
//!
//! Contract
//! - `nearest` returns `None` only for an empty index; constructors refuse
//!   empty clouds, so in practice it is always `Some`.
//! - Squared distances are computed by `dist2` in every implementation, so
//!   all indices agree bit-for-bit on the minimum value. Among exact ties the
//!   lowest cloud index wins.
//!
//! Code cross-refs: `cost::CostEvaluator`, `fit::snap_to_cloud`

mod brute;
mod kdtree;

pub use brute::BruteForce;
pub use kdtree::KdTree;

use crate::error::FitError;
use crate::geom::Point;

/// Closest cloud point for a query.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Neighbor {
    pub index: usize,
    pub dist2: f64,
}

/// Capability: nearest cloud point for an arbitrary query point.
pub trait NearestNeighbor {
    fn len(&self) -> usize;
    fn nearest(&self, p: Point) -> Option<Neighbor>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
    fn nearest_squared_distance(&self, p: Point) -> Option<f64> {
        self.nearest(p).map(|n| n.dist2)
    }
}

/// Squared Euclidean distance; the single formula every index uses.
#[inline]
pub fn dist2(a: Point, b: Point) -> f64 {
    let dx = a.x - b.x;
    let dy = a.y - b.y;
    dx * dx + dy * dy
}

/// Which lookup strategy to build.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IndexKind {
    #[default]
    BruteForce,
    KdTree,
}

/// Runtime-selected index (see `IndexKind`).
#[derive(Clone, Debug)]
pub enum CloudIndex<'a> {
    Brute(BruteForce<'a>),
    Kd(KdTree),
}

impl<'a> CloudIndex<'a> {
    pub fn build(kind: IndexKind, cloud: &'a [Point]) -> Result<Self, FitError> {
        Ok(match kind {
            IndexKind::BruteForce => CloudIndex::Brute(BruteForce::new(cloud)?),
            IndexKind::KdTree => CloudIndex::Kd(KdTree::build(cloud)?),
        })
    }
}

impl NearestNeighbor for CloudIndex<'_> {
    fn len(&self) -> usize {
        match self {
            CloudIndex::Brute(b) => b.len(),
            CloudIndex::Kd(k) => k.len(),
        }
    }
    fn nearest(&self, p: Point) -> Option<Neighbor> {
        match self {
            CloudIndex::Brute(b) => b.nearest(p),
            CloudIndex::Kd(k) => k.nearest(p),
        }
    }
}

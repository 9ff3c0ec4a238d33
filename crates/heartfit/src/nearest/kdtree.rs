//! Static 2-d tree over an owned copy of the cloud.
//!
//! Layout is implicit: the node for a slice `order[lo..hi]` is its median
//! `mid = (lo + hi) / 2`, split on `x` at even depth and `y` at odd depth.
//! Left/right subtrees are `lo..mid` and `mid + 1..hi`.

use std::cmp::Ordering;

use super::{dist2, NearestNeighbor, Neighbor};
use crate::error::FitError;
use crate::geom::{validate_cloud, Point};

#[derive(Clone, Debug)]
pub struct KdTree {
    points: Vec<Point>,
    /// Cloud indices arranged in implicit-tree order.
    order: Vec<usize>,
}

impl KdTree {
    /// Rejects empty clouds and non-finite coordinates.
    pub fn build(cloud: &[Point]) -> Result<Self, FitError> {
        validate_cloud(cloud)?;
        let points = cloud.to_vec();
        let mut order: Vec<usize> = (0..points.len()).collect();
        arrange(&points, &mut order, 0);
        Ok(Self { points, order })
    }

    fn search(&self, lo: usize, hi: usize, depth: usize, q: Point, best: &mut Option<Neighbor>) {
        if lo >= hi {
            return;
        }
        let mid = lo + (hi - lo) / 2;
        let index = self.order[mid];
        let node = self.points[index];
        let d = dist2(q, node);
        let improves = match best {
            None => true,
            Some(b) => d < b.dist2 || (d == b.dist2 && index < b.index),
        };
        if improves {
            *best = Some(Neighbor { index, dist2: d });
        }

        let diff = if depth % 2 == 0 { q.x - node.x } else { q.y - node.y };
        let (near, far) = if diff < 0.0 {
            ((lo, mid), (mid + 1, hi))
        } else {
            ((mid + 1, hi), (lo, mid))
        };
        self.search(near.0, near.1, depth + 1, q, best);
        // `<=` keeps equal-distance candidates with lower indices reachable.
        if best.map_or(true, |b| diff * diff <= b.dist2) {
            self.search(far.0, far.1, depth + 1, q, best);
        }
    }
}

fn axis_cmp(points: &[Point], axis: usize, a: usize, b: usize) -> Ordering {
    points[a][axis]
        .partial_cmp(&points[b][axis])
        .unwrap_or(Ordering::Equal)
        .then(a.cmp(&b))
}

fn arrange(points: &[Point], order: &mut [usize], depth: usize) {
    if order.len() <= 1 {
        return;
    }
    let axis = depth % 2;
    let mid = order.len() / 2;
    order.select_nth_unstable_by(mid, |&a, &b| axis_cmp(points, axis, a, b));
    let (left, rest) = order.split_at_mut(mid);
    arrange(points, left, depth + 1);
    arrange(points, &mut rest[1..], depth + 1);
}

impl NearestNeighbor for KdTree {
    fn len(&self) -> usize {
        self.points.len()
    }

    fn nearest(&self, p: Point) -> Option<Neighbor> {
        let mut best = None;
        self.search(0, self.order.len(), 0, p, &mut best);
        best
    }
}

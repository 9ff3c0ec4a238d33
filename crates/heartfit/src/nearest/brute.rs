use super::{dist2, NearestNeighbor, Neighbor};
use crate::error::FitError;
use crate::geom::{validate_cloud, Point};

/// Linear scan over a borrowed cloud; O(M) per query.
///
/// Keeps the first minimum under a strict `<`, so the earliest cloud point
/// among exact ties is reported.
#[derive(Clone, Copy, Debug)]
pub struct BruteForce<'a> {
    cloud: &'a [Point],
}

impl<'a> BruteForce<'a> {
    /// Rejects empty clouds and non-finite coordinates.
    pub fn new(cloud: &'a [Point]) -> Result<Self, FitError> {
        validate_cloud(cloud)?;
        Ok(Self { cloud })
    }
}

impl NearestNeighbor for BruteForce<'_> {
    fn len(&self) -> usize {
        self.cloud.len()
    }

    fn nearest(&self, p: Point) -> Option<Neighbor> {
        let (first, rest) = self.cloud.split_first()?;
        let mut best = Neighbor {
            index: 0,
            dist2: dist2(p, *first),
        };
        for (i, q) in rest.iter().enumerate() {
            let d = dist2(p, *q);
            if d < best.dist2 {
                best = Neighbor {
                    index: i + 1,
                    dist2: d,
                };
            }
        }
        Some(best)
    }
}

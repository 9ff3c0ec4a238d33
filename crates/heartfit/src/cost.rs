//! Fit objective: total squared nearest-neighbor distance.
//!
//! cost(params) = Σ_i min_j ‖T(params)(curve_i) − cloud_j‖²
//!
//! The value is a pure function of params, curve and cloud. It is
//! non-negative and only reaches 0 when every transformed curve point lands
//! exactly on a cloud point. Non-finite params give a non-finite cost, not an
//! error; the minimizer decides what to do with those.

use crate::error::{FitError, InvalidArgument};
use crate::geom::Point;
use crate::nearest::{BruteForce, NearestNeighbor};
use crate::transform::{transform_points, SimilarityParams};

/// Objective bound to one curve and one cloud index.
#[derive(Clone, Copy, Debug)]
pub struct CostEvaluator<'a, N> {
    curve: &'a [Point],
    index: &'a N,
}

impl<'a, N: NearestNeighbor> CostEvaluator<'a, N> {
    pub fn new(curve: &'a [Point], index: &'a N) -> Self {
        Self { curve, index }
    }

    pub fn evaluate(&self, params: &SimilarityParams) -> Result<f64, FitError> {
        let moved = transform_points(self.curve, params);
        sum_nearest_squared(&moved, self.index)
    }
}

/// Σ over `points` of the squared distance to the nearest indexed point.
pub fn sum_nearest_squared<N: NearestNeighbor>(points: &[Point], index: &N) -> Result<f64, FitError> {
    let mut total = 0.0;
    for &p in points {
        total += index
            .nearest_squared_distance(p)
            .ok_or(InvalidArgument::EmptyCloud)?;
    }
    Ok(total)
}

/// Brute-force cost for one parameter set (O(N·M)).
pub fn total_squared_distance(
    params: &SimilarityParams,
    curve: &[Point],
    cloud: &[Point],
) -> Result<f64, FitError> {
    let index = BruteForce::new(cloud)?;
    CostEvaluator::new(curve, &index).evaluate(params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curve::heart_curve;
    use crate::nearest::KdTree;
    use nalgebra::vector;
    use proptest::prelude::*;

    #[test]
    fn empty_cloud_is_invalid() {
        let curve = heart_curve(8).unwrap();
        let err = total_squared_distance(&SimilarityParams::identity(), &curve, &[]).unwrap_err();
        assert_eq!(err, FitError::InvalidArgument(InvalidArgument::EmptyCloud));
    }

    #[test]
    fn non_finite_cloud_point_is_invalid_wherever_it_sits() {
        let curve = heart_curve(8).unwrap();
        let id = SimilarityParams::identity();
        let want = |index| FitError::InvalidArgument(InvalidArgument::NonFiniteCloudPoint { index });
        let leading = vec![vector![f64::NAN, 0.0], vector![0.0, 0.0]];
        let trailing = vec![vector![0.0, 0.0], vector![f64::NAN, 0.0]];
        assert_eq!(total_squared_distance(&id, &curve, &leading).unwrap_err(), want(0));
        assert_eq!(total_squared_distance(&id, &curve, &trailing).unwrap_err(), want(1));
        assert_eq!(KdTree::build(&leading).unwrap_err(), want(0));
        let infinite = vec![vector![0.0, 0.0], vector![1.0, 1.0], vector![2.0, f64::INFINITY]];
        assert_eq!(KdTree::build(&infinite).unwrap_err(), want(2));
    }

    #[test]
    fn zero_when_curve_lands_on_cloud() {
        let curve = heart_curve(16).unwrap();
        let p = SimilarityParams::new(3.0, 0.4, -7.0, 11.0);
        let mut cloud = transform_points(&curve, &p);
        cloud.push(vector![1e3, 1e3]);
        assert_eq!(total_squared_distance(&p, &curve, &cloud).unwrap(), 0.0);
    }

    #[test]
    fn single_point_cloud_sums_squared_offsets() {
        let curve = vec![vector![1.0, 0.0], vector![0.0, 2.0]];
        let cloud = vec![vector![0.0, 0.0]];
        let c = total_squared_distance(&SimilarityParams::identity(), &curve, &cloud).unwrap();
        assert_eq!(c, 5.0);
        // Shift by (1, 0): (2,0) → 4, (1,2) → 5.
        let shifted = SimilarityParams::new(1.0, 0.0, 1.0, 0.0);
        assert_eq!(total_squared_distance(&shifted, &curve, &cloud).unwrap(), 9.0);
    }

    #[test]
    fn nan_params_give_non_finite_cost() {
        let curve = heart_curve(8).unwrap();
        let cloud = vec![vector![0.0, 0.0]];
        let p = SimilarityParams::new(f64::NAN, 0.0, 0.0, 0.0);
        assert!(!total_squared_distance(&p, &curve, &cloud).unwrap().is_finite());
    }

    fn params() -> impl Strategy<Value = SimilarityParams> {
        (-5.0f64..5.0, -3.2f64..3.2, -50.0f64..50.0, -50.0f64..50.0)
            .prop_map(|(s, a, x, y)| SimilarityParams::new(s, a, x, y))
    }

    proptest! {
        #[test]
        fn non_negative_and_index_independent(
            p in params(),
            cloud in prop::collection::vec((-60.0f64..60.0, -60.0f64..60.0), 1..80),
        ) {
            let cloud: Vec<Point> = cloud.into_iter().map(|(x, y)| vector![x, y]).collect();
            let curve = heart_curve(30).unwrap();
            let brute = total_squared_distance(&p, &curve, &cloud).unwrap();
            prop_assert!(brute >= 0.0);
            let kd = KdTree::build(&cloud).unwrap();
            let tree = CostEvaluator::new(&curve, &kd).evaluate(&p).unwrap();
            prop_assert_eq!(brute.to_bits(), tree.to_bits());
        }
    }
}

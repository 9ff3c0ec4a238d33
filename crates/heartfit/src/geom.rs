//! Planar primitives shared by the curve, transform and cost modules.
//!
//! - `Point`: a plain `nalgebra::Vector2<f64>`; point sets are slices/`Vec`s.
//! - `Affine2`: `x ↦ M x + t`, the general form a similarity collapses to.
//! - Cloud helpers: validation, bounding box and centroid.

use nalgebra::{Matrix2, Vector2};

use crate::error::{FitError, InvalidArgument};

/// A point in the plane (curve space and cloud space share units).
pub type Point = Vector2<f64>;

/// 2D affine map: `x ↦ M x + t`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Affine2 {
    pub m: Matrix2<f64>,
    pub t: Vector2<f64>,
}

impl Affine2 {
    #[inline]
    pub fn apply(&self, p: Point) -> Point {
        self.m * p + self.t
    }
}

/// Axis-aligned bounds of a non-empty point set.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds2 {
    pub min: Point,
    pub max: Point,
}

impl Bounds2 {
    #[inline]
    pub fn extent(&self) -> Vector2<f64> {
        self.max - self.min
    }
}

/// Reject empty clouds and clouds with NaN/∞ coordinates.
pub fn validate_cloud(cloud: &[Point]) -> Result<(), FitError> {
    if cloud.is_empty() {
        return Err(InvalidArgument::EmptyCloud.into());
    }
    if let Some(index) = cloud.iter().position(|p| !(p.x.is_finite() && p.y.is_finite())) {
        return Err(InvalidArgument::NonFiniteCloudPoint { index }.into());
    }
    Ok(())
}

/// Bounding box; `None` for an empty set.
pub fn bounds(points: &[Point]) -> Option<Bounds2> {
    let first = *points.first()?;
    let mut b = Bounds2 {
        min: first,
        max: first,
    };
    for p in &points[1..] {
        b.min = b.min.inf(p);
        b.max = b.max.sup(p);
    }
    Some(b)
}

/// Arithmetic mean; `None` for an empty set.
pub fn centroid(points: &[Point]) -> Option<Point> {
    if points.is_empty() {
        return None;
    }
    let sum = points.iter().fold(Point::zeros(), |acc, p| acc + p);
    Some(sum / points.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{matrix, vector};

    #[test]
    fn affine_apply_is_linear_part_plus_offset() {
        let a = Affine2 {
            m: matrix![0.0, -2.0; 2.0, 0.0],
            t: vector![1.0, -1.0],
        };
        assert_eq!(a.apply(vector![0.25, 4.0]), vector![-7.0, -0.5]);
    }

    #[test]
    fn cloud_validation_reports_first_bad_index() {
        assert_eq!(
            validate_cloud(&[]),
            Err(FitError::InvalidArgument(InvalidArgument::EmptyCloud))
        );
        let cloud = vec![vector![0.0, 0.0], vector![f64::NAN, 1.0], vector![f64::INFINITY, 0.0]];
        assert_eq!(
            validate_cloud(&cloud),
            Err(FitError::InvalidArgument(InvalidArgument::NonFiniteCloudPoint { index: 1 }))
        );
        assert!(validate_cloud(&cloud[..1]).is_ok());
    }

    #[test]
    fn bounds_and_centroid() {
        let pts = vec![vector![1.0, 2.0], vector![-3.0, 5.0], vector![2.0, -1.0]];
        let b = bounds(&pts).unwrap();
        assert_eq!(b.min, vector![-3.0, -1.0]);
        assert_eq!(b.max, vector![2.0, 5.0]);
        assert_eq!(b.extent(), vector![5.0, 6.0]);
        assert_eq!(centroid(&pts).unwrap(), vector![0.0, 2.0]);
        assert!(bounds(&[]).is_none());
        assert!(centroid(&[]).is_none());
    }
}

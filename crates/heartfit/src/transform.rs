//! Four-parameter similarity transform (uniform scale, rotation, translation).
//!
//!   x' = s·(x·cosθ − y·sinθ) + tx
//!   y' = s·(x·sinθ + y·cosθ) + ty
//!
//! The map is applied per point; count and order are preserved. `s = 0` is a
//! valid (collapsing) transform here; judging it is the optimizer's business.

use nalgebra::{Matrix2, Vector2, Vector4};

use crate::geom::{Affine2, Point};

/// Candidate parameters handled as one unit by the optimizer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SimilarityParams {
    pub scale: f64,
    /// Radians, counterclockwise.
    pub angle: f64,
    pub tx: f64,
    pub ty: f64,
}

impl Default for SimilarityParams {
    /// Starting point that already sits in a sensible basin for the
    /// regional bike-node clouds the fitter was tuned on.
    fn default() -> Self {
        Self {
            scale: 0.10,
            angle: 0.01,
            tx: 2.5,
            ty: 2.5,
        }
    }
}

impl SimilarityParams {
    #[inline]
    pub fn new(scale: f64, angle: f64, tx: f64, ty: f64) -> Self {
        Self {
            scale,
            angle,
            tx,
            ty,
        }
    }
    #[inline]
    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 0.0)
    }
    /// Optimizer view: `[scale, angle, tx, ty]`.
    #[inline]
    pub fn to_vector(self) -> Vector4<f64> {
        Vector4::new(self.scale, self.angle, self.tx, self.ty)
    }
    #[inline]
    pub fn from_vector(v: &Vector4<f64>) -> Self {
        Self::new(v[0], v[1], v[2], v[3])
    }
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.scale.is_finite() && self.angle.is_finite() && self.tx.is_finite() && self.ty.is_finite()
    }
    #[inline]
    pub fn translation(&self) -> Vector2<f64> {
        Vector2::new(self.tx, self.ty)
    }
    /// Matrix form `s·R(θ)` plus translation.
    pub fn to_affine(&self) -> Affine2 {
        let (sin, cos) = self.angle.sin_cos();
        Affine2 {
            m: Matrix2::new(cos, -sin, sin, cos) * self.scale,
            t: self.translation(),
        }
    }
    /// Single similarity equal to applying `self` first, then `next`.
    ///
    /// Scales multiply, angles add, and the first translation is carried
    /// through the second map's linear part. Angles are not wrapped.
    pub fn then(&self, next: &SimilarityParams) -> SimilarityParams {
        let (sin, cos) = next.angle.sin_cos();
        let t = self.translation();
        let rotated = Vector2::new(t.x * cos - t.y * sin, t.x * sin + t.y * cos);
        let carried = rotated * next.scale + next.translation();
        SimilarityParams::new(
            self.scale * next.scale,
            self.angle + next.angle,
            carried.x,
            carried.y,
        )
    }
    #[inline]
    pub fn apply(&self, p: Point) -> Point {
        let (sin, cos) = self.angle.sin_cos();
        apply_with(self, sin, cos, p)
    }
}

#[inline]
fn apply_with(params: &SimilarityParams, sin: f64, cos: f64, p: Point) -> Point {
    Point::new(
        params.scale * (p.x * cos - p.y * sin) + params.tx,
        params.scale * (p.x * sin + p.y * cos) + params.ty,
    )
}

/// Transform every point; the input set is left untouched.
pub fn transform_points(points: &[Point], params: &SimilarityParams) -> Vec<Point> {
    let (sin, cos) = params.angle.sin_cos();
    points.iter().map(|&p| apply_with(params, sin, cos, p)).collect()
}

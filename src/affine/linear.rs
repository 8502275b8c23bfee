//! Per-axis linear projection (`a*x + b`, `c*y + d`).

use crate::error::TransformError;
use crate::primitives::Point2;
use num_traits::Float;

/// An axis-aligned linear map, typically used to project map coordinates
/// to pixels at a given zoom scale:
///
/// - `x' = scale * (a*x + b)`
/// - `y' = scale * (c*y + d)`
///
/// Independent of [`Matrix3`](super::Matrix3); the coefficients are fixed at
/// construction.
///
/// # Example
///
/// ```
/// use affinum::{LinearTransform, Point2};
///
/// let projection: LinearTransform<f64> = LinearTransform::new(0.5, 0.5, -0.5, 0.5);
/// let pixel = projection.transform_scaled(Point2::new(0.0, 0.0), 256.0);
/// assert_eq!(pixel, Point2::new(128.0, 128.0));
///
/// let back = projection.untransform_scaled(pixel, 256.0).unwrap();
/// assert_eq!(back, Point2::new(0.0, 0.0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinearTransform<F> {
    a: F,
    b: F,
    c: F,
    d: F,
}

impl<F: Float> LinearTransform<F> {
    /// Creates a transform from its coefficients.
    #[inline]
    pub fn new(a: F, b: F, c: F, d: F) -> Self {
        Self { a, b, c, d }
    }

    /// Returns the coefficients `(a, b, c, d)`.
    #[inline]
    pub fn coefficients(&self) -> (F, F, F, F) {
        (self.a, self.b, self.c, self.d)
    }

    /// Returns true if neither axis coefficient is zero.
    #[inline]
    pub fn is_invertible(&self) -> bool {
        self.a != F::zero() && self.c != F::zero()
    }

    /// Projects a point at scale 1.
    #[inline]
    pub fn transform(&self, p: Point2<F>) -> Point2<F> {
        self.transform_scaled(p, F::one())
    }

    /// Projects a point at the given scale, returning a new point.
    #[inline]
    pub fn transform_scaled(&self, mut p: Point2<F>, scale: F) -> Point2<F> {
        self.transform_in_place(&mut p, scale);
        p
    }

    /// Projects a point in place and returns it.
    #[inline]
    pub fn transform_in_place<'a>(&self, p: &'a mut Point2<F>, scale: F) -> &'a mut Point2<F> {
        p.x = scale * (self.a * p.x + self.b);
        p.y = scale * (self.c * p.y + self.d);
        p
    }

    /// Reverses [`transform`](Self::transform).
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::DegenerateLinearTransform`] if `a` or `c`
    /// is zero.
    #[inline]
    pub fn untransform(&self, p: Point2<F>) -> Result<Point2<F>, TransformError> {
        self.untransform_scaled(p, F::one())
    }

    /// Reverses [`transform_scaled`](Self::transform_scaled) at the same scale.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::ZeroScale`] if `scale` is zero and
    /// [`TransformError::DegenerateLinearTransform`] if `a` or `c` is zero.
    pub fn untransform_scaled(&self, p: Point2<F>, scale: F) -> Result<Point2<F>, TransformError> {
        if scale == F::zero() {
            return Err(TransformError::ZeroScale);
        }
        if !self.is_invertible() {
            let a = self.a.to_f64().unwrap_or(f64::NAN);
            let c = self.c.to_f64().unwrap_or(f64::NAN);
            log::debug!("cannot untransform through degenerate projection (a = {a}, c = {c})");
            return Err(TransformError::DegenerateLinearTransform { a, c });
        }

        Ok(Point2::new(
            (p.x / scale - self.b) / self.a,
            (p.y / scale - self.d) / self.c,
        ))
    }
}

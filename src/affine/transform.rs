//! Fluent builder for composed 2D affine transforms.

use super::Matrix3;
use crate::error::TransformError;
use crate::primitives::Point2;
use num_traits::Float;
use std::fmt;

/// A composed 2D affine transform with a chainable builder API.
///
/// Each operation right-multiplies the accumulated matrix by an elementary
/// matrix. Points are mapped as row vectors (`[x y 1] * M`), so operations
/// take effect on points in the order they were chained.
///
/// # Example
///
/// ```
/// use affinum::{Point2, Transform};
///
/// let mut t: Transform<f64> = Transform::new();
/// t.translate(10.0, 0.0).scale(2.0, 2.0);
///
/// // (1, 0) -> translate -> (11, 0) -> scale -> (22, 0)
/// let p = t.apply_point(Point2::new(1.0, 0.0));
/// assert_eq!(p, Point2::new(22.0, 0.0));
///
/// assert_eq!(t.to_string(), "matrix(2, 0, 0, 2, 20, 0)");
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Transform<F> {
    matrix: Matrix3<F>,
}

impl<F: Float> Transform<F> {
    /// Creates the identity transform.
    #[inline]
    pub fn new() -> Self {
        Self::identity()
    }

    /// Creates the identity transform.
    #[inline]
    pub fn identity() -> Self {
        Self {
            matrix: Matrix3::identity(),
        }
    }

    /// Wraps an existing matrix.
    #[inline]
    pub fn from_matrix(matrix: Matrix3<F>) -> Self {
        Self { matrix }
    }

    /// Returns the accumulated matrix.
    #[inline]
    pub fn matrix(&self) -> &Matrix3<F> {
        &self.matrix
    }

    /// Returns a new transform that undoes this one.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::NonInvertibleMatrix`] if the accumulated
    /// matrix is singular.
    pub fn inverse(&self) -> Result<Self, TransformError> {
        self.matrix.inverse().map(Self::from_matrix)
    }

    /// Right-multiplies by another transform's matrix.
    #[inline]
    pub fn multiply(&mut self, other: &Self) -> &mut Self {
        self.multiply_matrix(&other.matrix)
    }

    /// Right-multiplies by a raw matrix.
    #[inline]
    pub fn multiply_matrix(&mut self, matrix: &Matrix3<F>) -> &mut Self {
        self.matrix.multiply(matrix);
        self
    }

    /// Appends a translation.
    pub fn translate(&mut self, tx: F, ty: F) -> &mut Self {
        self.multiply_matrix(&Matrix3::translation(tx, ty))
    }

    /// Returns the translation entries of the matrix.
    #[inline]
    pub fn translation(&self) -> Point2<F> {
        Point2::new(self.matrix[(2, 0)], self.matrix[(2, 1)])
    }

    /// Overwrites the translation entries, leaving the rest of the matrix alone.
    pub fn set_translate(&mut self, x: F, y: F) -> &mut Self {
        self.matrix[(2, 0)] = x;
        self.matrix[(2, 1)] = y;
        self
    }

    /// Clears the translation entries to zero.
    pub fn reset_translate(&mut self) -> &mut Self {
        self.set_translate(F::zero(), F::zero())
    }

    /// Appends a scale about the coordinate origin.
    pub fn scale(&mut self, sx: F, sy: F) -> &mut Self {
        self.multiply_matrix(&Matrix3::scaling(sx, sy))
    }

    /// Appends a proportional scale about the coordinate origin.
    pub fn scale_uniform(&mut self, factor: F) -> &mut Self {
        self.scale(factor, factor)
    }

    /// Appends a scale about `origin`, which stays fixed.
    pub fn scale_around(&mut self, sx: F, sy: F, origin: Point2<F>) -> &mut Self {
        let step = around(Matrix3::scaling(sx, sy), origin);
        self.multiply_matrix(&step)
    }

    /// Returns the diagonal scale entries `(m11, m22)`.
    ///
    /// These are raw matrix entries; once a rotation has been composed they
    /// no longer equal the geometric scale factors.
    #[inline]
    pub fn scale_factors(&self) -> (F, F) {
        (self.matrix[(0, 0)], self.matrix[(1, 1)])
    }

    /// Resets the diagonal scale entries to one. Off-diagonal and
    /// translation entries are kept.
    pub fn reset_scale(&mut self) -> &mut Self {
        self.matrix[(0, 0)] = F::one();
        self.matrix[(1, 1)] = F::one();
        self
    }

    /// Appends a rotation about the coordinate origin. Angle is in degrees.
    pub fn rotate(&mut self, degrees: F) -> &mut Self {
        self.multiply_matrix(&Matrix3::rotation_degrees(degrees))
    }

    /// Appends a rotation about `origin`, which stays fixed. Angle is in degrees.
    pub fn rotate_around(&mut self, degrees: F, origin: Point2<F>) -> &mut Self {
        let step = around(Matrix3::rotation_degrees(degrees), origin);
        self.multiply_matrix(&step)
    }

    /// Maps a point in place and returns it.
    #[inline]
    pub fn map_point<'a>(&self, p: &'a mut Point2<F>) -> &'a mut Point2<F> {
        let m = &self.matrix;
        let x = p.x * m[(0, 0)] + p.y * m[(1, 0)] + m[(2, 0)];
        let y = p.x * m[(0, 1)] + p.y * m[(1, 1)] + m[(2, 1)];
        p.x = x;
        p.y = y;
        p
    }

    /// Maps a copy of the point, leaving the argument untouched.
    #[inline]
    pub fn apply_point(&self, mut p: Point2<F>) -> Point2<F> {
        self.map_point(&mut p);
        p
    }

    /// Maps multiple points.
    pub fn apply_points(&self, points: &[Point2<F>]) -> Vec<Point2<F>> {
        points.iter().map(|p| self.apply_point(*p)).collect()
    }
}

impl<F: Float + fmt::Display> Transform<F> {
    /// Formats the transform as a CSS `matrix3d(...)` value.
    ///
    /// The 2D block is embedded in a 4x4 identity, giving
    /// `matrix3d(a,c,0,0,b,d,0,0,0,0,1,0,tx,ty,0,1)`.
    pub fn to_string_3d(&self) -> String {
        let [a, c, b, d, tx, ty] = self.css_values();
        format!("matrix3d({a},{c},0,0,{b},{d},0,0,0,0,1,0,{tx},{ty},0,1)")
    }

    // m11, m21, m12, m22, m31, m32 with negative zero folded into zero
    fn css_values(&self) -> [F; 6] {
        let m = &self.matrix;
        [
            m[(0, 0)],
            m[(1, 0)],
            m[(0, 1)],
            m[(1, 1)],
            m[(2, 0)],
            m[(2, 1)],
        ]
        .map(|v| if v == F::zero() { F::zero() } else { v })
    }
}

// T(-origin) * op * T(origin), so `origin` is a fixed point of the result
fn around<F: Float>(op: Matrix3<F>, origin: Point2<F>) -> Matrix3<F> {
    log::trace!(
        "composing about origin ({}, {})",
        origin.x.to_f64().unwrap_or(f64::NAN),
        origin.y.to_f64().unwrap_or(f64::NAN)
    );
    let back = origin.negated();
    let mut working = Matrix3::identity();
    working
        .multiply(&Matrix3::translation(back.x, back.y))
        .multiply(&op)
        .multiply(&Matrix3::translation(origin.x, origin.y));
    working
}

impl<F: Float> Default for Transform<F> {
    fn default() -> Self {
        Self::identity()
    }
}

impl<F: Float> From<Matrix3<F>> for Transform<F> {
    fn from(matrix: Matrix3<F>) -> Self {
        Self::from_matrix(matrix)
    }
}

impl<F> From<Transform<F>> for Matrix3<F> {
    fn from(transform: Transform<F>) -> Self {
        transform.matrix
    }
}

impl<F: Float + fmt::Display> fmt::Display for Transform<F> {
    /// Formats the transform as a CSS `matrix(a, c, b, d, tx, ty)` value.
    ///
    /// The second value is `m21` and the third is `m12`, matching the CSS
    /// argument order for the internal row-vector layout.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, c, b, d, tx, ty] = self.css_values();
        write!(f, "matrix({a}, {c}, {b}, {d}, {tx}, {ty})")
    }
}

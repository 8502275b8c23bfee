//! 3x3 homogeneous matrix for 2D affine transforms.

use crate::error::TransformError;
use num_traits::Float;
use std::fmt;
use std::ops::{Index, IndexMut, Mul, MulAssign};

/// A 3x3 matrix in row-major order, used for 2D affine transforms in
/// homogeneous coordinates.
///
/// Points are treated as row vectors and multiplied on the left,
/// `[x y 1] * M`, so an affine transform is laid out as:
/// ```text
/// | a   b   0 |
/// | c   d   0 |
/// | tx  ty  1 |
/// ```
///
/// Indices are zero-based: `m[(2, 0)]` is the x translation (`m31` in
/// one-based notation). The third column is conventionally `[0, 0, 1]`,
/// but [`multiply`](Self::multiply) and [`inverse`](Self::inverse) work on
/// the full 3x3 grid and never assume it.
///
/// # Example
///
/// ```
/// use affinum::Matrix3;
///
/// let mut m: Matrix3<f64> = Matrix3::translation(10.0, 20.0);
/// m.multiply(&Matrix3::scaling(2.0, 2.0));
///
/// let inv = m.inverse().unwrap();
/// assert!((m * inv).is_identity(1e-12));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Matrix3<F> {
    rows: [[F; 3]; 3],
}

impl<F: Float> Matrix3<F> {
    /// Creates the identity matrix.
    #[inline]
    pub fn identity() -> Self {
        let (o, z) = (F::one(), F::zero());
        Self {
            rows: [[o, z, z], [z, o, z], [z, z, o]],
        }
    }

    /// Creates a matrix from its rows.
    #[inline]
    pub fn from_rows(rows: [[F; 3]; 3]) -> Self {
        Self { rows }
    }

    /// Returns the rows of the matrix.
    #[inline]
    pub fn rows(&self) -> [[F; 3]; 3] {
        self.rows
    }

    /// Returns the entry at `row`, `col` (zero-based), or `None` when out of range.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<F> {
        self.rows.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Creates a translation matrix.
    #[inline]
    pub fn translation(tx: F, ty: F) -> Self {
        let mut m = Self::identity();
        m.rows[2][0] = tx;
        m.rows[2][1] = ty;
        m
    }

    /// Creates a scaling matrix about the origin.
    #[inline]
    pub fn scaling(sx: F, sy: F) -> Self {
        let mut m = Self::identity();
        m.rows[0][0] = sx;
        m.rows[1][1] = sy;
        m
    }

    /// Creates a rotation matrix about the origin.
    ///
    /// The angle is in degrees. With the row-vector convention, positive
    /// angles rotate `(1, 0)` towards `(0, 1)`.
    pub fn rotation_degrees(degrees: F) -> Self {
        let radians = degrees.to_radians();
        let (sin_r, cos_r) = radians.sin_cos();

        let mut m = Self::identity();
        m.rows[0][0] = cos_r;
        m.rows[0][1] = sin_r;
        m.rows[1][0] = -sin_r;
        m.rows[1][1] = cos_r;
        m
    }

    /// Multiplies this matrix by `other` in place (`self = self * other`).
    ///
    /// `other` is left untouched. Returns `self` so calls can be chained.
    pub fn multiply(&mut self, other: &Self) -> &mut Self {
        let mut product = [[F::zero(); 3]; 3];
        for (row, out) in product.iter_mut().enumerate() {
            for (col, cell) in out.iter_mut().enumerate() {
                *cell = (0..3).fold(F::zero(), |sum, k| {
                    sum + self.rows[row][k] * other.rows[k][col]
                });
            }
        }
        self.rows = product;
        self
    }

    /// Returns the determinant, by cofactor expansion along the first row.
    pub fn determinant(&self) -> F {
        let minors = self.minors();
        let m = &self.rows;
        m[0][0] * minors.rows[0][0] - m[0][1] * minors.rows[0][1]
            + m[0][2] * minors.rows[0][2]
    }

    /// Returns the matrix of 2x2 minors.
    ///
    /// Each entry is the determinant of the submatrix left after deleting
    /// that entry's row and column.
    pub fn minors(&self) -> Self {
        let m = &self.rows;
        Self {
            rows: [
                [
                    det2(m[1][1], m[1][2], m[2][1], m[2][2]),
                    det2(m[1][0], m[1][2], m[2][0], m[2][2]),
                    det2(m[1][0], m[1][1], m[2][0], m[2][1]),
                ],
                [
                    det2(m[0][1], m[0][2], m[2][1], m[2][2]),
                    det2(m[0][0], m[0][2], m[2][0], m[2][2]),
                    det2(m[0][0], m[0][1], m[2][0], m[2][1]),
                ],
                [
                    det2(m[0][1], m[0][2], m[1][1], m[1][2]),
                    det2(m[0][0], m[0][2], m[1][0], m[1][2]),
                    det2(m[0][0], m[0][1], m[1][0], m[1][1]),
                ],
            ],
        }
    }

    /// Returns the cofactor matrix: the minors with the checkerboard sign
    /// pattern applied.
    pub fn cofactors(&self) -> Self {
        let mut c = self.minors();
        c.rows[0][1] = -c.rows[0][1];
        c.rows[1][0] = -c.rows[1][0];
        c.rows[1][2] = -c.rows[1][2];
        c.rows[2][1] = -c.rows[2][1];
        c
    }

    /// Returns the adjugate: the transpose of the cofactor matrix.
    #[inline]
    pub fn adjugate(&self) -> Self {
        self.cofactors().transpose()
    }

    /// Returns the transpose.
    pub fn transpose(&self) -> Self {
        let m = &self.rows;
        Self {
            rows: [
                [m[0][0], m[1][0], m[2][0]],
                [m[0][1], m[1][1], m[2][1]],
                [m[0][2], m[1][2], m[2][2]],
            ],
        }
    }

    /// Returns the inverse matrix, `adjugate / determinant`.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::NonInvertibleMatrix`] if the determinant is
    /// zero or not finite, or if an entry of the inverse overflows.
    pub fn inverse(&self) -> Result<Self, TransformError> {
        let det = self.determinant();
        if det == F::zero() || !det.is_finite() {
            let determinant = det.to_f64().unwrap_or(f64::NAN);
            log::debug!("cannot invert matrix with determinant {determinant}");
            return Err(TransformError::NonInvertibleMatrix { determinant });
        }

        // Dividing each entry keeps subnormal determinants usable, where the
        // reciprocal alone would overflow.
        let mut inverse = self.adjugate();
        for cell in inverse.rows.iter_mut().flatten() {
            *cell = *cell / det;
        }
        if inverse.rows.iter().flatten().any(|v| !v.is_finite()) {
            let determinant = det.to_f64().unwrap_or(f64::NAN);
            log::debug!("inverse overflows for matrix with determinant {determinant}");
            return Err(TransformError::NonInvertibleMatrix { determinant });
        }
        Ok(inverse)
    }

    /// Returns true if this is approximately the identity matrix.
    pub fn is_identity(&self, epsilon: F) -> bool {
        self.approx_eq(&Self::identity(), epsilon)
    }

    /// Returns true if every entry is within `epsilon` of the same entry in `other`.
    pub fn approx_eq(&self, other: &Self, epsilon: F) -> bool {
        self.rows
            .iter()
            .flatten()
            .zip(other.rows.iter().flatten())
            .all(|(a, b)| (*a - *b).abs() <= epsilon)
    }
}

#[inline]
fn det2<F: Float>(a: F, b: F, c: F, d: F) -> F {
    a * d - b * c
}

impl<F: Float> Default for Matrix3<F> {
    fn default() -> Self {
        Self::identity()
    }
}

impl<F> Index<(usize, usize)> for Matrix3<F> {
    type Output = F;

    #[inline]
    fn index(&self, (row, col): (usize, usize)) -> &F {
        &self.rows[row][col]
    }
}

impl<F> IndexMut<(usize, usize)> for Matrix3<F> {
    #[inline]
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut F {
        &mut self.rows[row][col]
    }
}

impl<F: Float> Mul for Matrix3<F> {
    type Output = Self;

    /// Multiplies two matrices (self * rhs).
    ///
    /// Under the row-vector convention the result applies `self` first, then `rhs`.
    fn mul(mut self, rhs: Self) -> Self {
        self.multiply(&rhs);
        self
    }
}

impl<F: Float> MulAssign for Matrix3<F> {
    fn mul_assign(&mut self, rhs: Self) {
        self.multiply(&rhs);
    }
}

impl<F: fmt::Display> fmt::Display for Matrix3<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = &self.rows;
        write!(
            f,
            "[[{}, {}, {}], [{}, {}, {}], [{}, {}, {}]]",
            m[0][0], m[0][1], m[0][2], m[1][0], m[1][1], m[1][2], m[2][0], m[2][1], m[2][2]
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sample() -> Matrix3<f64> {
        Matrix3::from_rows([[2.0, -1.0, 0.0], [0.5, 3.0, 0.0], [7.0, -4.0, 1.0]])
    }

    #[test]
    fn test_identity_is_default() {
        let m: Matrix3<f64> = Matrix3::default();
        assert_eq!(m, Matrix3::identity());
        assert_eq!(
            m.rows(),
            [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]]
        );
    }

    #[test]
    fn test_identity_law() {
        let m = sample();

        let mut left = Matrix3::identity();
        left.multiply(&m);
        assert_eq!(left, m);

        let mut right = m;
        right.multiply(&Matrix3::identity());
        assert_eq!(right, m);
    }

    #[test]
    fn test_multiply_does_not_touch_other() {
        let mut a = sample();
        let b = Matrix3::translation(1.0, 2.0);
        a.multiply(&b);

        assert_eq!(b, Matrix3::translation(1.0, 2.0));
    }

    #[test]
    fn test_multiply_values() {
        let a: Matrix3<f64> =
            Matrix3::from_rows([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]]);
        let b = Matrix3::from_rows([[9.0, 8.0, 7.0], [6.0, 5.0, 4.0], [3.0, 2.0, 1.0]]);

        let product = a * b;
        assert_eq!(
            product.rows(),
            [
                [30.0, 24.0, 18.0],
                [84.0, 69.0, 54.0],
                [138.0, 114.0, 90.0]
            ]
        );
    }

    #[test]
    fn test_multiply_chains() {
        let mut m: Matrix3<f64> = Matrix3::identity();
        m.multiply(&Matrix3::translation(1.0, 0.0))
            .multiply(&Matrix3::scaling(2.0, 2.0));

        // [x y 1] * T * S: translate first, then scale
        assert_eq!(m[(2, 0)], 2.0);
        assert_eq!(m[(0, 0)], 2.0);
    }

    #[test]
    fn test_mul_assign() {
        let mut m: Matrix3<f64> = Matrix3::translation(1.0, 2.0);
        m *= Matrix3::translation(3.0, 4.0);
        assert_eq!(m, Matrix3::translation(4.0, 6.0));
    }

    #[test]
    fn test_determinant() {
        let identity: Matrix3<f64> = Matrix3::identity();
        assert_eq!(identity.determinant(), 1.0);

        assert_relative_eq!(Matrix3::<f64>::scaling(2.0, 3.0).determinant(), 6.0);
        assert_relative_eq!(
            Matrix3::<f64>::rotation_degrees(37.0).determinant(),
            1.0,
            epsilon = 1e-12
        );

        let m: Matrix3<f64> =
            Matrix3::from_rows([[6.0, 1.0, 1.0], [4.0, -2.0, 5.0], [2.0, 8.0, 7.0]]);
        assert_relative_eq!(m.determinant(), -306.0, epsilon = 1e-10);
    }

    #[test]
    fn test_minors() {
        let m: Matrix3<f64> =
            Matrix3::from_rows([[1.0, 2.0, 3.0], [0.0, 4.0, 5.0], [1.0, 0.0, 6.0]]);
        assert_eq!(
            m.minors().rows(),
            [[24.0, -5.0, -4.0], [12.0, 3.0, -2.0], [-2.0, 5.0, 4.0]]
        );
    }

    #[test]
    fn test_minor_bottom_right_uses_upper_left_block() {
        let m: Matrix3<f64> =
            Matrix3::from_rows([[1.0, 2.0, 9.0], [3.0, 4.0, 9.0], [9.0, 9.0, 9.0]]);
        assert_eq!(m.minors()[(2, 2)], -2.0);
    }

    #[test]
    fn test_cofactors_sign_pattern() {
        let m: Matrix3<f64> =
            Matrix3::from_rows([[1.0, 2.0, 3.0], [0.0, 4.0, 5.0], [1.0, 0.0, 6.0]]);
        assert_eq!(
            m.cofactors().rows(),
            [[24.0, 5.0, -4.0], [-12.0, 3.0, 2.0], [-2.0, -5.0, 4.0]]
        );
    }

    #[test]
    fn test_adjugate_is_transposed_cofactors() {
        let m: Matrix3<f64> =
            Matrix3::from_rows([[1.0, 2.0, 3.0], [0.0, 4.0, 5.0], [1.0, 0.0, 6.0]]);
        assert_eq!(
            m.adjugate().rows(),
            [[24.0, -12.0, -2.0], [5.0, 3.0, -5.0], [-4.0, 2.0, 4.0]]
        );
    }

    #[test]
    fn test_transpose_twice() {
        let m = sample();
        assert_eq!(m.transpose().transpose(), m);
        assert_eq!(m.transpose()[(0, 2)], m[(2, 0)]);
    }

    #[test]
    fn test_inverse_times_self_is_identity() {
        let mut m: Matrix3<f64> = Matrix3::translation(3.0, -4.0);
        m.multiply(&Matrix3::rotation_degrees(30.0))
            .multiply(&Matrix3::scaling(2.0, 0.5));

        let inv = m.inverse().unwrap();
        assert!((m * inv).is_identity(1e-12));
        assert!((inv * m).is_identity(1e-12));
    }

    #[test]
    fn test_inverse_full_matrix() {
        let m: Matrix3<f64> =
            Matrix3::from_rows([[1.0, 2.0, 3.0], [0.0, 1.0, 4.0], [5.0, 6.0, 0.0]]);
        let inv = m.inverse().unwrap();
        let expected =
            Matrix3::from_rows([[-24.0, 18.0, 5.0], [20.0, -15.0, -4.0], [-5.0, 4.0, 1.0]]);

        assert!(inv.approx_eq(&expected, 1e-10));
    }

    #[test]
    fn test_singular_inverse_fails() {
        let m: Matrix3<f64> = Matrix3::scaling(1.0, 0.0);
        assert_eq!(
            m.inverse(),
            Err(TransformError::NonInvertibleMatrix { determinant: 0.0 })
        );
    }

    #[test]
    fn test_nan_inverse_fails() {
        let m: Matrix3<f64> = Matrix3::scaling(f64::NAN, 1.0);
        assert!(matches!(
            m.inverse(),
            Err(TransformError::NonInvertibleMatrix { .. })
        ));
    }

    #[test]
    fn test_rotation_degrees() {
        let m: Matrix3<f64> = Matrix3::rotation_degrees(90.0);
        assert_relative_eq!(m[(0, 0)], 0.0, epsilon = 1e-12);
        assert_relative_eq!(m[(0, 1)], 1.0, epsilon = 1e-12);
        assert_relative_eq!(m[(1, 0)], -1.0, epsilon = 1e-12);
        assert_relative_eq!(m[(1, 1)], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_get_and_index() {
        let mut m: Matrix3<f64> = Matrix3::translation(5.0, 6.0);
        assert_eq!(m.get(2, 1), Some(6.0));
        assert_eq!(m.get(3, 0), None);

        m[(0, 1)] = 0.25;
        assert_eq!(m[(0, 1)], 0.25);
    }

    #[test]
    fn test_display() {
        let m: Matrix3<f64> = Matrix3::translation(2.0, -1.5);
        assert_eq!(m.to_string(), "[[1, 0, 0], [0, 1, 0], [2, -1.5, 1]]");
    }

    #[test]
    fn test_inverse_with_subnormal_determinant() {
        let m: Matrix3<f32> = Matrix3::scaling(1e-20, 1e-20);
        let inv = m.inverse().unwrap();
        assert!(inv.rows().iter().flatten().all(|v| v.is_finite()));
        assert_relative_eq!(inv[(0, 0)], 1e20, max_relative = 1e-3);
        assert_relative_eq!(inv[(1, 1)], 1e20, max_relative = 1e-3);
        assert_eq!(inv[(0, 1)], 0.0);
        assert_eq!(inv[(2, 0)], 0.0);
        assert_relative_eq!(inv[(2, 2)], 1.0, max_relative = 1e-3);

        let m: Matrix3<f64> = Matrix3::scaling(1e-160, 1e-160);
        let inv = m.inverse().unwrap();
        assert!(inv.rows().iter().flatten().all(|v| v.is_finite()));
        assert_relative_eq!(inv[(0, 0)], 1e160, max_relative = 1e-2);
        assert_relative_eq!(inv[(1, 1)], 1e160, max_relative = 1e-2);
        assert_eq!(inv[(1, 0)], 0.0);
    }

    #[test]
    fn test_inverse_overflow_fails() {
        // det is about 1e-300, but the (0, 0) entry of the inverse is 1e320
        let m: Matrix3<f64> =
            Matrix3::from_rows([[1e-320, 0.0, 0.0], [0.0, 1e10, 0.0], [0.0, 0.0, 1e10]]);
        assert!(m.determinant().is_finite() && m.determinant() != 0.0);
        assert!(matches!(
            m.inverse(),
            Err(TransformError::NonInvertibleMatrix { .. })
        ));
    }

    #[test]
    fn test_f32_support() {
        let m: Matrix3<f32> = Matrix3::scaling(4.0, 0.5);
        let inv = m.inverse().unwrap();
        assert!((inv[(0, 0)] - 0.25).abs() < 1e-6);
        assert!((inv[(1, 1)] - 2.0).abs() < 1e-6);
    }
}

//! Error types for affinum operations.

use thiserror::Error;

/// Errors that can occur while inverting or projecting through a transform.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TransformError {
    /// The matrix has a zero (or non-finite) determinant and cannot be inverted.
    #[error("matrix is not invertible (determinant = {determinant})")]
    NonInvertibleMatrix {
        /// Determinant of the matrix that failed to invert.
        determinant: f64,
    },

    /// A linear transform with a zero axis coefficient cannot be inverted.
    #[error("linear transform is degenerate (a = {a}, c = {c})")]
    DegenerateLinearTransform {
        /// Coefficient applied to x.
        a: f64,
        /// Coefficient applied to y.
        c: f64,
    },

    /// A zoom scale of zero collapses every point and cannot be undone.
    #[error("scale must be non-zero")]
    ZeroScale,
}

//! affinum - 2D affine geometry for mapping
//!
//! A 3x3 homogeneous matrix with cofactor inversion, a fluent transform
//! builder with CSS `matrix(...)` output, and a per-axis linear projection
//! for turning map coordinates into pixels.
//!
//! Points are row vectors (`[x y 1] * M`), so chained operations apply to
//! points in the order they were called.

pub mod affine;
pub mod error;
pub mod primitives;

pub use affine::{LinearTransform, Matrix3, Transform};
pub use error::TransformError;
pub use primitives::Point2;

//! Affine matrices, composed transforms and linear projections.
//!
//! [`Matrix3`] holds the homogeneous matrix algebra, [`Transform`] composes
//! translate/scale/rotate steps on top of it, and [`LinearTransform`] is the
//! independent per-axis projection used for coordinate-to-pixel mapping.

mod linear;
mod matrix3;
mod transform;

pub use linear::LinearTransform;
pub use matrix3::Matrix3;
pub use transform::Transform;

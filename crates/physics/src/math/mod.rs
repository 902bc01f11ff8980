//! # Math Primitives
//!
//! Double precision value types used by every other part of the engine:
//! [`Vector3`], [`Quaternion`], [`Matrix3`] and the affine [`Matrix34`].
//!
//! All types are `Copy` and every operation returns a new value, except for the
//! explicitly named in-place helpers (`normalize`, `reverse`, `transpose`,
//! `update_orientation`).
//!
//! Degenerate inputs never produce NaN:
//!
//! - normalizing the zero vector leaves it at zero,
//! - normalizing the zero quaternion yields the identity rotation,
//! - inverting a matrix whose determinant is exactly zero leaves it unchanged.

mod matrix3;
mod matrix34;
mod quaternion;
mod vector3;

pub use matrix3::Matrix3;
pub use matrix34::Matrix34;
pub use quaternion::Quaternion;
pub use vector3::Vector3;

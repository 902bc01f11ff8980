use std::fmt;
use std::ops::{Add, AddAssign, Mul, MulAssign, Neg};

use super::Vector3;

/// A rotation quaternion `r + i·𝐢 + j·𝐣 + k·𝐤`.
///
/// Orientation quaternions are kept close to unit length by
/// [`Quaternion::update_orientation`]; intermediate values produced by the
/// arithmetic operators are not normalized.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Quaternion {
    pub r: f64,
    pub i: f64,
    pub j: f64,
    pub k: f64,
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Quaternion {
    pub const IDENTITY: Self = Self::new(1.0, 0.0, 0.0, 0.0);

    #[must_use]
    pub const fn new(r: f64, i: f64, j: f64, k: f64) -> Self {
        Self { r, i, j, k }
    }

    /// Builds `(r, v.x, v.y, v.z)`.
    #[must_use]
    pub const fn from_scalar_vector(r: f64, v: Vector3) -> Self {
        Self::new(r, v.x, v.y, v.z)
    }

    /// Rotation of `angle` radians about `axis`. A zero axis yields the identity.
    #[must_use]
    pub fn from_axis_angle(axis: Vector3, angle: f64) -> Self {
        let axis = axis.normalized();
        if axis == Vector3::ZERO {
            return Self::IDENTITY;
        }
        let (sin, cos) = (angle * 0.5).sin_cos();
        Self::from_scalar_vector(cos, axis * sin)
    }

    #[must_use]
    pub const fn vector(self) -> Vector3 {
        Vector3::new(self.i, self.j, self.k)
    }

    #[must_use]
    pub fn conjugate(self) -> Self {
        Self::new(self.r, -self.i, -self.j, -self.k)
    }

    #[must_use]
    pub fn scalar_product(self, other: Self) -> f64 {
        self.r * other.r + self.i * other.i + self.j * other.j + self.k * other.k
    }

    #[must_use]
    pub fn squared_norm(self) -> f64 {
        self.scalar_product(self)
    }

    #[must_use]
    pub fn norm(self) -> f64 {
        self.squared_norm().sqrt()
    }

    /// Scales to unit length. The zero quaternion becomes the identity.
    pub fn normalize(&mut self) {
        let squared_norm = self.squared_norm();
        if squared_norm == 0.0 {
            *self = Self::IDENTITY;
            return;
        }
        *self *= 1.0 / squared_norm.sqrt();
    }

    #[must_use]
    pub fn normalized(self) -> Self {
        let mut q = self;
        q.normalize();
        q
    }

    /// Post-multiplies by the pure quaternion `(0, v)`.
    pub fn rotate_by_vector(&mut self, v: Vector3) {
        *self *= Self::from_scalar_vector(0.0, v);
    }

    /// Rotates `v` by this (unit) quaternion: `q · (0, v) · q*`.
    #[must_use]
    pub fn rotate_vector(self, v: Vector3) -> Vector3 {
        (self * Self::from_scalar_vector(0.0, v) * self.conjugate()).vector()
    }

    /// First-order integration of an angular velocity over `dt` seconds:
    /// `q += dt/2 · (0, ω) · q`, followed by renormalization.
    ///
    /// A zero angular velocity or a zero timestep leaves the quaternion
    /// untouched.
    pub fn update_orientation(&mut self, angular_velocity: Vector3, dt: f64) {
        if dt == 0.0 || angular_velocity == Vector3::ZERO {
            return;
        }
        let omega = Self::from_scalar_vector(0.0, angular_velocity);
        *self += omega * *self * (dt * 0.5);
        self.normalize();
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.r.is_finite() && self.i.is_finite() && self.j.is_finite() && self.k.is_finite()
    }
}

impl fmt::Display for Quaternion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Quaternion(r = {:.4}; i = {:.4}; j = {:.4}; k = {:.4})",
            self.r, self.i, self.j, self.k
        )
    }
}

/// Hamilton product.
impl Mul for Quaternion {
    type Output = Self;
    fn mul(self, o: Self) -> Self {
        Self::new(
            self.r * o.r - self.i * o.i - self.j * o.j - self.k * o.k,
            self.r * o.i + self.i * o.r + self.j * o.k - self.k * o.j,
            self.r * o.j - self.i * o.k + self.j * o.r + self.k * o.i,
            self.r * o.k + self.i * o.j - self.j * o.i + self.k * o.r,
        )
    }
}

impl MulAssign for Quaternion {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl Mul<f64> for Quaternion {
    type Output = Self;
    fn mul(self, s: f64) -> Self {
        Self::new(self.r * s, self.i * s, self.j * s, self.k * s)
    }
}

impl MulAssign<f64> for Quaternion {
    fn mul_assign(&mut self, s: f64) {
        *self = *self * s;
    }
}

impl Add for Quaternion {
    type Output = Self;
    fn add(self, o: Self) -> Self {
        Self::new(self.r + o.r, self.i + o.i, self.j + o.j, self.k + o.k)
    }
}

impl AddAssign for Quaternion {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Neg for Quaternion {
    type Output = Self;
    fn neg(self) -> Self {
        Self::new(-self.r, -self.i, -self.j, -self.k)
    }
}

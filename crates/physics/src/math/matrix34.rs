use std::ops::{Index, Mul};

use super::{Matrix3, Quaternion, Vector3};

/// A 3×4 affine transform: a 3×3 linear block followed by a translation column.
///
/// Stored row-major, so element `(row, 3)` is the translation along `row`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Matrix34 {
    data: [f64; 12],
}

impl Default for Matrix34 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix34 {
    pub const IDENTITY: Self = Self {
        data: [1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0],
    };

    #[must_use]
    pub const fn from_array(data: [f64; 12]) -> Self {
        Self { data }
    }

    #[must_use]
    #[rustfmt::skip]
    pub fn from_parts(linear: &Matrix3, translation: Vector3) -> Self {
        let l = linear;
        Self::from_array([
            l[(0, 0)], l[(0, 1)], l[(0, 2)], translation.x,
            l[(1, 0)], l[(1, 1)], l[(1, 2)], translation.y,
            l[(2, 0)], l[(2, 1)], l[(2, 2)], translation.z,
        ])
    }

    /// Rotation from `orientation` (normalized first) followed by a translation to `position`.
    #[must_use]
    pub fn from_orientation_and_position(orientation: Quaternion, position: Vector3) -> Self {
        Self::from_parts(&Matrix3::from_quaternion(orientation.normalized()), position)
    }

    #[must_use]
    pub fn linear(&self) -> Matrix3 {
        let d = &self.data;
        Matrix3::from_rows([d[0], d[1], d[2]], [d[4], d[5], d[6]], [d[8], d[9], d[10]])
    }

    #[must_use]
    pub fn translation(&self) -> Vector3 {
        Vector3::new(self.data[3], self.data[7], self.data[11])
    }

    /// Determinant of the linear block.
    #[must_use]
    pub fn determinant(&self) -> f64 {
        self.linear().determinant()
    }

    /// Inverts the affine transform in place.
    ///
    /// Like [`Matrix3::reverse`], a singular linear block leaves the matrix unchanged.
    pub fn reverse(&mut self) {
        let mut linear = self.linear();
        if linear.determinant() == 0.0 {
            return;
        }
        linear.reverse();
        let translation = -(linear * self.translation());
        *self = Self::from_parts(&linear, translation);
    }

    #[must_use]
    pub fn reversed(&self) -> Self {
        let mut m = *self;
        m.reverse();
        m
    }

    /// `L·p + t`.
    #[must_use]
    pub fn transform_point(&self, p: Vector3) -> Vector3 {
        self.linear() * p + self.translation()
    }

    /// `L·v`, ignoring the translation.
    #[must_use]
    pub fn transform_direction(&self, v: Vector3) -> Vector3 {
        self.linear() * v
    }

    /// `Lᵀ·(p − t)`; the inverse of [`Matrix34::transform_point`] when `L` is a rotation.
    #[must_use]
    pub fn inverse_transform_point(&self, p: Vector3) -> Vector3 {
        (p - self.translation()).world_to_local(&self.linear())
    }
}

impl Index<(usize, usize)> for Matrix34 {
    type Output = f64;
    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        &self.data[row * 4 + col]
    }
}

/// Composition: `(a * b).transform_point(p) == a.transform_point(b.transform_point(p))`.
impl Mul for Matrix34 {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        let linear = self.linear() * rhs.linear();
        let translation = self.linear() * rhs.translation() + self.translation();
        Self::from_parts(&linear, translation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn sample() -> Matrix34 {
        Matrix34::from_orientation_and_position(
            Quaternion::from_axis_angle(Vector3::new(0.2, 1.0, -0.4), 1.3),
            Vector3::new(4.0, -2.0, 7.5),
        )
    }

    #[test]
    fn transform_and_inverse_transform_round_trip() {
        let m = sample();
        let p = Vector3::new(1.0, 2.0, 3.0);
        let back = m.inverse_transform_point(m.transform_point(p));
        assert!((back - p).norm() < EPS);
        let via_reverse = m.reversed().transform_point(m.transform_point(p));
        assert!((via_reverse - p).norm() < EPS);
    }

    #[test]
    fn composition_applies_right_then_left() {
        let a = sample();
        let b = Matrix34::from_orientation_and_position(
            Quaternion::from_axis_angle(Vector3::X, -0.5),
            Vector3::new(0.0, 1.0, 0.0),
        );
        let p = Vector3::new(-1.0, 0.5, 2.0);
        let composed = (a * b).transform_point(p);
        let sequential = a.transform_point(b.transform_point(p));
        assert!((composed - sequential).norm() < EPS);
    }

    #[test]
    fn direction_ignores_translation() {
        let m = Matrix34::from_parts(&Matrix3::IDENTITY, Vector3::new(10.0, 10.0, 10.0));
        assert_eq!(m.transform_direction(Vector3::X), Vector3::X);
        assert_eq!(m.transform_point(Vector3::X), Vector3::new(11.0, 10.0, 10.0));
        assert_eq!(m[(1, 3)], 10.0);
    }

    #[test]
    fn singular_block_is_left_unchanged() {
        let m = Matrix34::from_parts(&Matrix3::ZERO, Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(m.reversed(), m);
    }
}

use std::ops::{Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign};

use super::{Quaternion, Vector3};

/// A dense 3×3 matrix stored row-major.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Matrix3 {
    data: [f64; 9],
}

impl Default for Matrix3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix3 {
    pub const IDENTITY: Self = Self::from_array([1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]);
    pub const ZERO: Self = Self::from_array([0.0; 9]);

    /// Row-major backing store.
    #[must_use]
    pub const fn from_array(data: [f64; 9]) -> Self {
        Self { data }
    }

    #[must_use]
    pub const fn from_rows(r0: [f64; 3], r1: [f64; 3], r2: [f64; 3]) -> Self {
        Self::from_array([
            r0[0], r0[1], r0[2], r1[0], r1[1], r1[2], r2[0], r2[1], r2[2],
        ])
    }

    #[must_use]
    pub const fn from_diagonal(d: Vector3) -> Self {
        Self::from_rows([d.x, 0.0, 0.0], [0.0, d.y, 0.0], [0.0, 0.0, d.z])
    }

    /// Rotation matrix equivalent to a unit quaternion.
    ///
    /// The quaternion is assumed normalized; this is not checked.
    #[must_use]
    pub fn from_quaternion(q: Quaternion) -> Self {
        let Quaternion { r, i, j, k } = q;
        Self::from_rows(
            [
                1.0 - 2.0 * (j * j + k * k),
                2.0 * (i * j - k * r),
                2.0 * (i * k + j * r),
            ],
            [
                2.0 * (i * j + k * r),
                1.0 - 2.0 * (i * i + k * k),
                2.0 * (j * k - i * r),
            ],
            [
                2.0 * (i * k - j * r),
                2.0 * (j * k + i * r),
                1.0 - 2.0 * (i * i + j * j),
            ],
        )
    }

    #[must_use]
    pub const fn as_array(&self) -> &[f64; 9] {
        &self.data
    }

    #[must_use]
    pub fn determinant(&self) -> f64 {
        let m = self;
        m[(0, 0)] * (m[(1, 1)] * m[(2, 2)] - m[(1, 2)] * m[(2, 1)])
            - m[(0, 1)] * (m[(1, 0)] * m[(2, 2)] - m[(1, 2)] * m[(2, 0)])
            + m[(0, 2)] * (m[(1, 0)] * m[(2, 1)] - m[(1, 1)] * m[(2, 0)])
    }

    /// Inverts in place using the adjugate.
    ///
    /// A matrix whose determinant is exactly zero is left unchanged.
    pub fn reverse(&mut self) {
        let det = self.determinant();
        if det == 0.0 {
            return;
        }
        let m = *self;
        *self = Self::from_rows(
            [
                m[(1, 1)] * m[(2, 2)] - m[(1, 2)] * m[(2, 1)],
                m[(0, 2)] * m[(2, 1)] - m[(0, 1)] * m[(2, 2)],
                m[(0, 1)] * m[(1, 2)] - m[(0, 2)] * m[(1, 1)],
            ],
            [
                m[(1, 2)] * m[(2, 0)] - m[(1, 0)] * m[(2, 2)],
                m[(0, 0)] * m[(2, 2)] - m[(0, 2)] * m[(2, 0)],
                m[(0, 2)] * m[(1, 0)] - m[(0, 0)] * m[(1, 2)],
            ],
            [
                m[(1, 0)] * m[(2, 1)] - m[(1, 1)] * m[(2, 0)],
                m[(0, 1)] * m[(2, 0)] - m[(0, 0)] * m[(2, 1)],
                m[(0, 0)] * m[(1, 1)] - m[(0, 1)] * m[(1, 0)],
            ],
        );
        *self /= det;
    }

    /// Inverse copy; see [`Matrix3::reverse`] for the singular case.
    #[must_use]
    pub fn reversed(&self) -> Self {
        let mut m = *self;
        m.reverse();
        m
    }

    pub fn transpose(&mut self) {
        *self = self.transposed();
    }

    #[must_use]
    pub fn transposed(&self) -> Self {
        let m = self;
        Self::from_rows(
            [m[(0, 0)], m[(1, 0)], m[(2, 0)]],
            [m[(0, 1)], m[(1, 1)], m[(2, 1)]],
            [m[(0, 2)], m[(1, 2)], m[(2, 2)]],
        )
    }

    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.data.iter().all(|v| v.is_finite())
    }

    /// Largest absolute component-wise difference, used for approximate comparisons.
    #[must_use]
    pub fn max_abs_diff(&self, other: &Self) -> f64 {
        self.data
            .iter()
            .zip(other.data.iter())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max)
    }
}

impl Index<(usize, usize)> for Matrix3 {
    type Output = f64;
    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        &self.data[row * 3 + col]
    }
}

impl IndexMut<(usize, usize)> for Matrix3 {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f64 {
        &mut self.data[row * 3 + col]
    }
}

impl Mul for Matrix3 {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        let mut out = Self::ZERO;
        for row in 0..3 {
            for col in 0..3 {
                out[(row, col)] = (0..3).map(|n| self[(row, n)] * rhs[(n, col)]).sum();
            }
        }
        out
    }
}

impl MulAssign for Matrix3 {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl Mul<Vector3> for Matrix3 {
    type Output = Vector3;
    fn mul(self, v: Vector3) -> Vector3 {
        let d = &self.data;
        Vector3::new(
            d[0] * v.x + d[1] * v.y + d[2] * v.z,
            d[3] * v.x + d[4] * v.y + d[5] * v.z,
            d[6] * v.x + d[7] * v.y + d[8] * v.z,
        )
    }
}

impl Mul<f64> for Matrix3 {
    type Output = Self;
    fn mul(mut self, s: f64) -> Self {
        self *= s;
        self
    }
}

impl MulAssign<f64> for Matrix3 {
    fn mul_assign(&mut self, s: f64) {
        self.data.iter_mut().for_each(|v| *v *= s);
    }
}

impl Div<f64> for Matrix3 {
    type Output = Self;
    fn div(mut self, s: f64) -> Self {
        self /= s;
        self
    }
}

impl DivAssign<f64> for Matrix3 {
    fn div_assign(&mut self, s: f64) {
        self.data.iter_mut().for_each(|v| *v /= s);
    }
}

impl Add for Matrix3 {
    type Output = Self;
    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl AddAssign for Matrix3 {
    fn add_assign(&mut self, rhs: Self) {
        self.data.iter_mut().zip(rhs.data).for_each(|(a, b)| *a += b);
    }
}

impl Sub for Matrix3 {
    type Output = Self;
    fn sub(mut self, rhs: Self) -> Self {
        self -= rhs;
        self
    }
}

impl SubAssign for Matrix3 {
    fn sub_assign(&mut self, rhs: Self) {
        self.data.iter_mut().zip(rhs.data).for_each(|(a, b)| *a -= b);
    }
}

impl Neg for Matrix3 {
    type Output = Self;
    fn neg(self) -> Self {
        self * -1.0
    }
}

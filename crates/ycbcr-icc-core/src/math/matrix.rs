//! 3x3 matrices for primaries, YCbCr and adaptation transforms
//!
//! All arithmetic is f64. Rows are output channels, columns input channels.

use std::ops::{Index, Mul};

/// A 3x3 matrix, stored row-major: `m[row][col]`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Matrix3x3 {
    pub m: [[f64; 3]; 3],
}

impl Matrix3x3 {
    /// Create a matrix from row-major elements
    #[inline]
    pub const fn new(m: [[f64; 3]; 3]) -> Self {
        Self { m }
    }

    #[inline]
    pub const fn identity() -> Self {
        Self::diagonal(1.0, 1.0, 1.0)
    }

    #[inline]
    pub const fn diagonal(d0: f64, d1: f64, d2: f64) -> Self {
        Self {
            m: [[d0, 0.0, 0.0], [0.0, d1, 0.0], [0.0, 0.0, d2]],
        }
    }

    /// Create a matrix whose columns are the given vectors
    pub const fn from_columns(c0: [f64; 3], c1: [f64; 3], c2: [f64; 3]) -> Self {
        Self {
            m: [
                [c0[0], c1[0], c2[0]],
                [c0[1], c1[1], c2[1]],
                [c0[2], c1[2], c2[2]],
            ],
        }
    }

    /// Column `j` as a vector
    pub fn column(&self, j: usize) -> [f64; 3] {
        [self.m[0][j], self.m[1][j], self.m[2][j]]
    }

    /// Returns M × v
    #[inline]
    pub fn multiply_vec(&self, v: [f64; 3]) -> [f64; 3] {
        self.m.map(|row| row[0] * v[0] + row[1] * v[1] + row[2] * v[2])
    }

    /// Returns self × other
    pub fn multiply(&self, other: &Self) -> Self {
        let cols = [other.column(0), other.column(1), other.column(2)];
        Self {
            m: self.m.map(|row| {
                cols.map(|col| row[0] * col[0] + row[1] * col[1] + row[2] * col[2])
            }),
        }
    }

    pub fn transpose(&self) -> Self {
        Self::from_columns(self.m[0], self.m[1], self.m[2])
    }

    pub fn determinant(&self) -> f64 {
        let [a, b, c] = self.m;
        a[0] * (b[1] * c[2] - b[2] * c[1]) - a[1] * (b[0] * c[2] - b[2] * c[0])
            + a[2] * (b[0] * c[1] - b[1] * c[0])
    }

    /// Inverse via the adjugate; `None` if the matrix is singular
    pub fn inverse(&self) -> Option<Self> {
        let det = self.determinant();
        if !det.is_finite() || det.abs() < 1e-14 {
            return None;
        }

        // Rows of the adjugate are cross products of pairs of columns
        let [c0, c1, c2] = [self.column(0), self.column(1), self.column(2)];
        let rows = [cross(c1, c2), cross(c2, c0), cross(c0, c1)];
        Some(Self {
            m: rows.map(|r| r.map(|v| v / det)),
        })
    }

    /// Multiply every element by `s`
    pub fn scale(&self, s: f64) -> Self {
        Self {
            m: self.m.map(|row| row.map(|v| v * s)),
        }
    }

    /// Largest element-wise absolute difference
    pub fn max_abs_diff(&self, other: &Self) -> f64 {
        let mut max = 0.0f64;
        for i in 0..3 {
            for j in 0..3 {
                max = max.max((self.m[i][j] - other.m[i][j]).abs());
            }
        }
        max
    }

    pub fn approx_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.max_abs_diff(other) <= epsilon
    }

    pub fn is_identity(&self, epsilon: f64) -> bool {
        self.approx_eq(&Self::identity(), epsilon)
    }

    /// True if every element is finite
    pub fn is_finite(&self) -> bool {
        self.m.iter().flatten().all(|v| v.is_finite())
    }

    /// Elements in row-major order
    pub fn to_row_major(&self) -> [f64; 9] {
        let [a, b, c] = self.m;
        [a[0], a[1], a[2], b[0], b[1], b[2], c[0], c[1], c[2]]
    }
}

#[inline]
fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

impl Default for Matrix3x3 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Index<usize> for Matrix3x3 {
    type Output = [f64; 3];

    fn index(&self, row: usize) -> &Self::Output {
        &self.m[row]
    }
}

impl Mul for Matrix3x3 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        self.multiply(&rhs)
    }
}

impl Mul<[f64; 3]> for Matrix3x3 {
    type Output = [f64; 3];

    fn mul(self, rhs: [f64; 3]) -> Self::Output {
        self.multiply_vec(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-12;

    fn sample() -> Matrix3x3 {
        Matrix3x3::new([[1.0, 2.0, 3.0], [0.0, 1.0, 4.0], [5.0, 6.0, 0.0]])
    }

    #[test]
    fn test_multiply_vec() {
        let v = sample().multiply_vec([1.0, 1.0, 1.0]);
        assert_eq!(v, [6.0, 5.0, 11.0]);
        assert_eq!(Matrix3x3::identity() * [0.25, 0.5, 0.75], [0.25, 0.5, 0.75]);
    }

    #[test]
    fn test_multiply_order() {
        let a = sample();
        let d = Matrix3x3::diagonal(2.0, 3.0, 4.0);
        // Right-multiplying by a diagonal scales columns
        let ad = a * d;
        assert_eq!(ad.m[0], [2.0, 6.0, 12.0]);
        // Left-multiplying scales rows
        let da = d * a;
        assert_eq!(da.m[2], [20.0, 24.0, 0.0]);
    }

    #[test]
    fn test_columns() {
        let m = Matrix3x3::from_columns([1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]);
        assert_eq!(m.m[0], [1.0, 4.0, 7.0]);
        assert_eq!(m.column(2), [7.0, 8.0, 9.0]);
        assert_eq!(m.transpose().m[2], [7.0, 8.0, 9.0]);
    }

    #[test]
    fn test_inverse() {
        let a = sample();
        assert!((a.determinant() - 1.0).abs() < EPSILON);
        let inv = a.inverse().unwrap();
        assert!((a * inv).is_identity(1e-10));
        assert!((inv * a).is_identity(1e-10));
        // Known closed form for this matrix
        let expected =
            Matrix3x3::new([[-24.0, 18.0, 5.0], [20.0, -15.0, -4.0], [-5.0, 4.0, 1.0]]);
        assert!(inv.approx_eq(&expected, 1e-9), "{inv:?}");
    }

    #[test]
    fn test_singular_matrix() {
        let singular = Matrix3x3::new([[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [5.0, 7.0, 9.0]]);
        assert!(singular.inverse().is_none());
        let nan = Matrix3x3::diagonal(f64::NAN, 1.0, 1.0);
        assert!(nan.inverse().is_none());
        assert!(!nan.is_finite());
    }

    #[test]
    fn test_scale_and_row_major() {
        let m = sample().scale(0.5);
        assert_eq!(m.to_row_major(), [0.5, 1.0, 1.5, 0.0, 0.5, 2.0, 2.5, 3.0, 0.0]);
        assert_eq!(m[1], [0.0, 0.5, 2.0]);
    }
}

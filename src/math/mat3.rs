//! 3x3 matrix, used only to carry normals between spaces.

use std::ops::Mul;

use super::mat4::Mat4;
use super::vec3::Vec3;

/// 3x3 matrix stored as `data[row][col]`, same convention as [`Mat4`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat3 {
    data: [[f32; 3]; 3],
}

impl Default for Mat3 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mat3 {
    pub fn new(data: [[f32; 3]; 3]) -> Self {
        Self { data }
    }

    pub fn identity() -> Self {
        Self::new([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]])
    }

    /// Upper-left 3x3 block (rotation + scale) of a 4x4 matrix.
    pub fn from_mat4(m: &Mat4) -> Self {
        let mut data = [[0.0f32; 3]; 3];
        for (row, values) in data.iter_mut().enumerate() {
            for (col, value) in values.iter_mut().enumerate() {
                *value = m.get(row, col);
            }
        }
        Self { data }
    }

    /// Inverse transpose of the upper 3x3 of `m`.
    ///
    /// Falls back to identity when the block is singular, so degenerate
    /// transforms produce unlit rather than NaN colors.
    pub fn normal_matrix(m: &Mat4) -> Self {
        Self::from_mat4(m)
            .inverse()
            .unwrap_or_else(Self::identity)
            .transpose()
    }

    pub fn determinant(&self) -> f32 {
        let d = &self.data;
        d[0][0] * (d[1][1] * d[2][2] - d[1][2] * d[2][1])
            - d[0][1] * (d[1][0] * d[2][2] - d[1][2] * d[2][0])
            + d[0][2] * (d[1][0] * d[2][1] - d[1][1] * d[2][0])
    }

    pub fn inverse(&self) -> Option<Self> {
        let det = self.determinant();
        if det.abs() < f32::EPSILON {
            return None;
        }
        let d = &self.data;
        let inv = 1.0 / det;
        Some(Self::new([
            [
                (d[1][1] * d[2][2] - d[1][2] * d[2][1]) * inv,
                (d[0][2] * d[2][1] - d[0][1] * d[2][2]) * inv,
                (d[0][1] * d[1][2] - d[0][2] * d[1][1]) * inv,
            ],
            [
                (d[1][2] * d[2][0] - d[1][0] * d[2][2]) * inv,
                (d[0][0] * d[2][2] - d[0][2] * d[2][0]) * inv,
                (d[0][2] * d[1][0] - d[0][0] * d[1][2]) * inv,
            ],
            [
                (d[1][0] * d[2][1] - d[1][1] * d[2][0]) * inv,
                (d[0][1] * d[2][0] - d[0][0] * d[2][1]) * inv,
                (d[0][0] * d[1][1] - d[0][1] * d[1][0]) * inv,
            ],
        ]))
    }

    pub fn transpose(&self) -> Self {
        let d = &self.data;
        Self::new([
            [d[0][0], d[1][0], d[2][0]],
            [d[0][1], d[1][1], d[2][1]],
            [d[0][2], d[1][2], d[2][2]],
        ])
    }
}

impl Mul<Vec3> for Mat3 {
    type Output = Vec3;

    fn mul(self, v: Vec3) -> Self::Output {
        let r = |row: usize| self.data[row][0] * v.x + self.data[row][1] * v.y + self.data[row][2] * v.z;
        Vec3::new(r(0), r(1), r(2))
    }
}

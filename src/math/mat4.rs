//! 4x4 transformation matrix using column-major convention.
//!
//! # Convention
//! - Vectors are **column vectors** on the right: `Mat4 * Vec`
//! - Translation is stored in the **last column**
//! - Transforms chain **right-to-left**: `A * B * v` applies B first, then A
//! - Right-handed world; cameras look down **-Z**, clip-space depth is [-1, 1]
//!
//! # Example
//! ```ignore
//! let model = translation * rotation * scale; // scale applied first
//! let clip = view_projection * model * Vec4::point(x, y, z);
//! ```

use std::ops::Mul;

use super::vec3::Vec3;
use super::vec4::Vec4;

/// 4x4 matrix stored as `data[row][col]` with column-major convention.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    data: [[f32; 4]; 4],
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Mat4 {
    pub fn new(data: [[f32; 4]; 4]) -> Self {
        Mat4 { data }
    }

    pub fn identity() -> Self {
        Mat4::new([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a translation matrix.
    pub fn translation(x: f32, y: f32, z: f32) -> Self {
        Mat4::new([
            [1.0, 0.0, 0.0, x],
            [0.0, 1.0, 0.0, y],
            [0.0, 0.0, 1.0, z],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Creates a scale matrix.
    pub fn scaling(x: f32, y: f32, z: f32) -> Self {
        Mat4::new([
            [x, 0.0, 0.0, 0.0],
            [0.0, y, 0.0, 0.0],
            [0.0, 0.0, z, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Counter-clockwise rotation around the X axis (right-handed).
    pub fn rotation_x(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Mat4::new([
            [1.0, 0.0, 0.0, 0.0],
            [0.0, c, -s, 0.0],
            [0.0, s, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Counter-clockwise rotation around the Y axis (right-handed).
    pub fn rotation_y(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Mat4::new([
            [c, 0.0, s, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [-s, 0.0, c, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Counter-clockwise rotation around the Z axis (right-handed).
    pub fn rotation_z(angle: f32) -> Self {
        let (s, c) = angle.sin_cos();
        Mat4::new([
            [c, -s, 0.0, 0.0],
            [s, c, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Right-handed perspective projection mapping view depth `[-near, -far]`
    /// onto clip depth `[-1, 1]`.
    ///
    /// `fov_y` is the vertical field of view in radians.
    pub fn perspective(fov_y: f32, aspect_ratio: f32, near: f32, far: f32) -> Self {
        let f = 1.0 / (fov_y / 2.0).tan();
        let a = (far + near) / (near - far);
        let b = 2.0 * far * near / (near - far);
        Mat4::new([
            [f / aspect_ratio, 0.0, 0.0, 0.0],
            [0.0, f, 0.0, 0.0],
            [0.0, 0.0, a, b],
            [0.0, 0.0, -1.0, 0.0],
        ])
    }

    /// Right-handed orthographic projection of the given view-space box.
    pub fn orthographic(left: f32, right: f32, top: f32, bottom: f32, near: f32, far: f32) -> Self {
        let w = right - left;
        let h = top - bottom;
        let d = far - near;
        Mat4::new([
            [2.0 / w, 0.0, 0.0, -(right + left) / w],
            [0.0, 2.0 / h, 0.0, -(top + bottom) / h],
            [0.0, 0.0, -2.0 / d, -(far + near) / d],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    /// Builds the world matrix of an object at `eye` whose -Z axis points at
    /// `target`.
    ///
    /// This is the camera-to-world transform; invert it to get a view matrix.
    pub fn look_at(eye: Vec3, target: Vec3, up: Vec3) -> Self {
        let mut z = eye - target;
        if z.magnitude() == 0.0 {
            z = Vec3::new(0.0, 0.0, 1.0);
        }
        let z = z.normalize();
        let mut x = up.cross(z);
        if x.magnitude() == 0.0 {
            // up is parallel to the viewing direction, nudge it
            x = Vec3::new(up.x, up.y, up.z + 0.0001).cross(z);
        }
        let x = x.normalize();
        let y = z.cross(x);

        Mat4::new([
            [x.x, y.x, z.x, eye.x],
            [x.y, y.y, z.y, eye.y],
            [x.z, y.z, z.z, eye.z],
            [0.0, 0.0, 0.0, 1.0],
        ])
    }

    pub fn transpose(&self) -> Self {
        let mut data = [[0.0f32; 4]; 4];
        for (row, values) in data.iter_mut().enumerate() {
            for (col, value) in values.iter_mut().enumerate() {
                *value = self.data[col][row];
            }
        }
        Mat4 { data }
    }

    /// Computes the inverse of the matrix, if it exists.
    /// Returns `None` if the matrix is singular (determinant is zero).
    pub fn inverse(&self) -> Option<Mat4> {
        let a = &self.data;

        // 2x2 sub-determinants of the top two and bottom two rows.
        let s0 = a[0][0] * a[1][1] - a[1][0] * a[0][1];
        let s1 = a[0][0] * a[1][2] - a[1][0] * a[0][2];
        let s2 = a[0][0] * a[1][3] - a[1][0] * a[0][3];
        let s3 = a[0][1] * a[1][2] - a[1][1] * a[0][2];
        let s4 = a[0][1] * a[1][3] - a[1][1] * a[0][3];
        let s5 = a[0][2] * a[1][3] - a[1][2] * a[0][3];

        let c5 = a[2][2] * a[3][3] - a[3][2] * a[2][3];
        let c4 = a[2][1] * a[3][3] - a[3][1] * a[2][3];
        let c3 = a[2][1] * a[3][2] - a[3][1] * a[2][2];
        let c2 = a[2][0] * a[3][3] - a[3][0] * a[2][3];
        let c1 = a[2][0] * a[3][2] - a[3][0] * a[2][2];
        let c0 = a[2][0] * a[3][1] - a[3][0] * a[2][1];

        let det = s0 * c5 - s1 * c4 + s2 * c3 + s3 * c2 - s4 * c1 + s5 * c0;
        if det.abs() < f32::EPSILON {
            return None;
        }
        let inv = 1.0 / det;

        Some(Mat4::new([
            [
                (a[1][1] * c5 - a[1][2] * c4 + a[1][3] * c3) * inv,
                (-a[0][1] * c5 + a[0][2] * c4 - a[0][3] * c3) * inv,
                (a[3][1] * s5 - a[3][2] * s4 + a[3][3] * s3) * inv,
                (-a[2][1] * s5 + a[2][2] * s4 - a[2][3] * s3) * inv,
            ],
            [
                (-a[1][0] * c5 + a[1][2] * c2 - a[1][3] * c1) * inv,
                (a[0][0] * c5 - a[0][2] * c2 + a[0][3] * c1) * inv,
                (-a[3][0] * s5 + a[3][2] * s2 - a[3][3] * s1) * inv,
                (a[2][0] * s5 - a[2][2] * s2 + a[2][3] * s1) * inv,
            ],
            [
                (a[1][0] * c4 - a[1][1] * c2 + a[1][3] * c0) * inv,
                (-a[0][0] * c4 + a[0][1] * c2 - a[0][3] * c0) * inv,
                (a[3][0] * s4 - a[3][1] * s2 + a[3][3] * s0) * inv,
                (-a[2][0] * s4 + a[2][1] * s2 - a[2][3] * s0) * inv,
            ],
            [
                (-a[1][0] * c3 + a[1][1] * c1 - a[1][2] * c0) * inv,
                (a[0][0] * c3 - a[0][1] * c1 + a[0][2] * c0) * inv,
                (-a[3][0] * s3 + a[3][1] * s1 - a[3][2] * s0) * inv,
                (a[2][0] * s3 - a[2][1] * s1 + a[2][2] * s0) * inv,
            ],
        ]))
    }

    /// The translation part of the matrix (world position of the origin).
    pub fn position(&self) -> Vec3 {
        Vec3::new(self.data[0][3], self.data[1][3], self.data[2][3])
    }

    /// Largest scale factor applied along any of the basis axes.
    pub fn max_scale_on_axis(&self) -> f32 {
        let axis = |col: usize| {
            Vec3::new(self.data[0][col], self.data[1][col], self.data[2][col]).magnitude()
        };
        axis(0).max(axis(1)).max(axis(2))
    }

    /// Access element at [row][col].
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> f32 {
        self.data[row][col]
    }

    /// Set element at [row][col].
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: f32) {
        self.data[row][col] = value;
    }

    /// Row `row` as a Vec4 (used for frustum plane extraction).
    #[inline]
    pub fn row(&self, row: usize) -> Vec4 {
        let r = self.data[row];
        Vec4::new(r[0], r[1], r[2], r[3])
    }
}

/// Matrix multiplication: Mat4 * Mat4.
///
/// For column-major convention, `A * B * v` applies B first, then A.
impl Mul<Mat4> for Mat4 {
    type Output = Mat4;

    fn mul(self, rhs: Mat4) -> Self::Output {
        let mut result = [[0.0f32; 4]; 4];

        for (row, values) in result.iter_mut().enumerate() {
            for (col, value) in values.iter_mut().enumerate() {
                *value = self.data[row][0] * rhs.data[0][col]
                    + self.data[row][1] * rhs.data[1][col]
                    + self.data[row][2] * rhs.data[2][col]
                    + self.data[row][3] * rhs.data[3][col];
            }
        }

        Mat4::new(result)
    }
}

/// Transform a Vec4 by a matrix: Mat4 * Vec4 (column vector).
impl Mul<Vec4> for Mat4 {
    type Output = Vec4;

    fn mul(self, v: Vec4) -> Self::Output {
        let r = |row: usize| {
            self.data[row][0] * v.x
                + self.data[row][1] * v.y
                + self.data[row][2] * v.z
                + self.data[row][3] * v.w
        };
        Vec4::new(r(0), r(1), r(2), r(3))
    }
}

/// Transform a point: Mat4 * Vec3 (treats Vec3 as column vector with w=1).
///
/// Applies perspective division if w != 1.
impl Mul<Vec3> for Mat4 {
    type Output = Vec3;

    fn mul(self, v: Vec3) -> Self::Output {
        let p = self * Vec4::from(v);
        if p.w != 0.0 && p.w != 1.0 {
            Vec3::new(p.x / p.w, p.y / p.w, p.z / p.w)
        } else {
            p.to_vec3()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_mat_eq(a: &Mat4, b: &Mat4) {
        for row in 0..4 {
            for col in 0..4 {
                assert_relative_eq!(a.get(row, col), b.get(row, col), epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn inverse_undoes_transform() {
        let m = Mat4::translation(1.0, -2.0, 3.0)
            * Mat4::rotation_y(0.7)
            * Mat4::rotation_x(-0.3)
            * Mat4::scaling(2.0, 0.5, 1.5);
        let inv = m.inverse().expect("invertible");
        assert_mat_eq(&(m * inv), &Mat4::identity());
        assert_mat_eq(&(inv * m), &Mat4::identity());
    }

    #[test]
    fn singular_matrix_has_no_inverse() {
        assert!(Mat4::scaling(1.0, 0.0, 1.0).inverse().is_none());
    }

    #[test]
    fn rotation_z_is_counter_clockwise() {
        let p = Mat4::rotation_z(std::f32::consts::FRAC_PI_2) * Vec3::new(1.0, 0.0, 0.0);
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(p.y, 1.0, epsilon = 1e-6);
    }

    #[test]
    fn perspective_maps_near_and_far_to_unit_depth() {
        let p = Mat4::perspective(1.0, 1.0, 0.5, 50.0);
        let near = p * Vec3::new(0.0, 0.0, -0.5);
        let far = p * Vec3::new(0.0, 0.0, -50.0);
        assert_relative_eq!(near.z, -1.0, epsilon = 1e-4);
        assert_relative_eq!(far.z, 1.0, epsilon = 1e-4);
    }

    #[test]
    fn look_at_points_negative_z_at_target() {
        let world = Mat4::look_at(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, Vec3::UP);
        let view = world.inverse().expect("invertible");
        let target_in_view = view * Vec3::ZERO;
        assert_relative_eq!(target_in_view.z, -10.0, epsilon = 1e-5);
        assert_relative_eq!(world.position().z, 10.0);
    }

    #[test]
    fn max_scale_reads_basis_lengths() {
        let m = Mat4::rotation_z(0.4) * Mat4::scaling(1.0, 3.0, 2.0);
        assert_relative_eq!(m.max_scale_on_axis(), 3.0, epsilon = 1e-5);
    }
}

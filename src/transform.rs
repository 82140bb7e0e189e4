//! Local transform of a scene node.
//!
//! Provides a [`Transform`] struct with a fluent API for managing position,
//! rotation (Euler angles, XYZ order) and scale.

use crate::math::{Mat4, Vec3};

/// A 3D transform with position, rotation (Euler angles) and scale.
///
/// Mutating methods return `&mut Self` for chaining:
///
/// ```ignore
/// node.transform
///     .set_position_xyz(0.0, 1.0, -2.0)
///     .rotate_y(0.25)
///     .set_scale_uniform(2.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    position: Vec3,
    rotation: Vec3, // Euler angles in radians, applied X then Y then Z
    scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn set_position(&mut self, position: Vec3) -> &mut Self {
        self.position = position;
        self
    }

    pub fn set_position_xyz(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.position = Vec3::new(x, y, z);
        self
    }

    pub fn translate(&mut self, delta: Vec3) -> &mut Self {
        self.position = self.position + delta;
        self
    }

    /// Euler angles in radians.
    pub fn rotation(&self) -> Vec3 {
        self.rotation
    }

    pub fn set_rotation_xyz(&mut self, x: f32, y: f32, z: f32) -> &mut Self {
        self.rotation = Vec3::new(x, y, z);
        self
    }

    pub fn rotate_x(&mut self, angle: f32) -> &mut Self {
        self.rotation.x += angle;
        self
    }

    pub fn rotate_y(&mut self, angle: f32) -> &mut Self {
        self.rotation.y += angle;
        self
    }

    pub fn rotate_z(&mut self, angle: f32) -> &mut Self {
        self.rotation.z += angle;
        self
    }

    pub fn scale(&self) -> Vec3 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: Vec3) -> &mut Self {
        self.scale = scale;
        self
    }

    pub fn set_scale_uniform(&mut self, s: f32) -> &mut Self {
        self.scale = Vec3::new(s, s, s);
        self
    }

    /// Local matrix: Translation * RotationX * RotationY * RotationZ * Scale.
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::translation(self.position.x, self.position.y, self.position.z)
            * Mat4::rotation_x(self.rotation.x)
            * Mat4::rotation_y(self.rotation.y)
            * Mat4::rotation_z(self.rotation.z)
            * Mat4::scaling(self.scale.x, self.scale.y, self.scale.z)
    }
}

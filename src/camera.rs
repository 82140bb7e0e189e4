//! Scene camera.
//!
//! # Coordinate System
//!
//! Uses a **right-handed** coordinate system:
//! - X: positive right
//! - Y: positive up
//! - Z: positive toward the viewer; the camera looks down **-Z**
//!
//! The camera is never parented into the scene graph, so its world matrix is
//! derived from its own transform (or from a look-at target) on demand.

use crate::error::CameraError;
use crate::math::{Mat3, Mat4, Vec3};
use crate::projection::Projection;
use crate::transform::Transform;

#[derive(Debug, Clone)]
pub struct Camera {
    pub projection: Projection,
    pub transform: Transform,
    target: Option<Vec3>,
    up: Vec3,
}

impl Camera {
    pub fn new(projection: Projection) -> Self {
        Self {
            projection,
            transform: Transform::default(),
            target: None,
            up: Vec3::UP,
        }
    }

    /// Perspective camera with a vertical field of view in degrees.
    pub fn perspective(fov_y_degrees: f32, aspect_ratio: f32, z_near: f32, z_far: f32) -> Self {
        Self::new(Projection::from_degrees(
            fov_y_degrees,
            aspect_ratio,
            z_near,
            z_far,
        ))
    }

    pub fn orthographic(width: f32, height: f32, z_near: f32, z_far: f32) -> Self {
        Self::new(Projection::orthographic(width, height, z_near, z_far))
    }

    /// Aims the camera at `target`. Overrides the transform's rotation until
    /// [`Camera::clear_target`] is called.
    pub fn look_at(&mut self, target: Vec3) -> &mut Self {
        self.target = Some(target);
        self
    }

    pub fn clear_target(&mut self) {
        self.target = None;
    }

    pub fn set_up(&mut self, up: Vec3) -> &mut Self {
        self.up = up;
        self
    }

    pub fn position(&self) -> Vec3 {
        self.transform.position()
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection.matrix()
    }

    /// Camera-to-world matrix.
    pub fn matrix_world(&self) -> Mat4 {
        match self.target {
            Some(target) => {
                let scale = self.transform.scale();
                Mat4::look_at(self.transform.position(), target, self.up)
                    * Mat4::scaling(scale.x, scale.y, scale.z)
            }
            None => self.transform.to_matrix(),
        }
    }

    /// World-to-camera (view) matrix.
    pub fn view_matrix(&self) -> Result<Mat4, CameraError> {
        self.matrix_world()
            .inverse()
            .ok_or(CameraError::SingularTransform)
    }

    /// Transforms world-space normals into camera space.
    pub fn normal_view_matrix(&self) -> Result<Mat3, CameraError> {
        self.view_matrix().map(|view| Mat3::normal_matrix(&view))
    }

    /// Checks that the camera can produce a view of the scene.
    pub fn validate(&self) -> Result<(), CameraError> {
        self.projection.validate()?;
        self.view_matrix().map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn default_camera_sees_along_negative_z() {
        let mut camera = Camera::perspective(45.0, 1.0, 0.1, 100.0);
        camera.transform.set_position_xyz(0.0, 0.0, 10.0);
        let view = camera.view_matrix().unwrap();
        let p = view * Vec3::ZERO;
        assert_relative_eq!(p.z, -10.0);
    }

    #[test]
    fn look_at_overrides_rotation() {
        let mut camera = Camera::perspective(45.0, 1.0, 0.1, 100.0);
        camera.transform.set_position_xyz(10.0, 0.0, 0.0);
        camera.look_at(Vec3::ZERO);
        let p = camera.view_matrix().unwrap() * Vec3::ZERO;
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(p.z, -10.0, epsilon = 1e-5);
    }

    #[test]
    fn zero_scale_is_invalid() {
        let mut camera = Camera::orthographic(2.0, 2.0, 0.1, 10.0);
        camera.transform.set_scale_uniform(0.0);
        assert_eq!(camera.validate(), Err(CameraError::SingularTransform));
    }
}

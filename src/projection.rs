//! Camera projection parameters.
//!
//! The [`Projection`] enum is the single source of truth for how a camera
//! maps view space into clip space. It generates the projection matrix and
//! checks its parameters before a frame is rendered.

use crate::error::CameraError;
use crate::math::Mat4;

/// Perspective or orthographic projection parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    Perspective {
        /// Vertical field of view in radians.
        fov_y: f32,
        /// Width divided by height.
        aspect_ratio: f32,
        z_near: f32,
        z_far: f32,
    },
    Orthographic {
        left: f32,
        right: f32,
        top: f32,
        bottom: f32,
        z_near: f32,
        z_far: f32,
    },
}

impl Projection {
    /// Creates a perspective projection.
    ///
    /// # Arguments
    /// * `fov_y` - Vertical field of view in radians
    /// * `aspect_ratio` - Width divided by height
    /// * `z_near` - Near clipping plane distance (must be > 0)
    /// * `z_far` - Far clipping plane distance (must be > z_near)
    pub fn perspective(fov_y: f32, aspect_ratio: f32, z_near: f32, z_far: f32) -> Self {
        Self::Perspective {
            fov_y,
            aspect_ratio,
            z_near,
            z_far,
        }
    }

    /// Creates a perspective projection from degrees instead of radians.
    pub fn from_degrees(fov_y_degrees: f32, aspect_ratio: f32, z_near: f32, z_far: f32) -> Self {
        Self::perspective(fov_y_degrees.to_radians(), aspect_ratio, z_near, z_far)
    }

    /// Orthographic box centered on the view axis.
    pub fn orthographic(width: f32, height: f32, z_near: f32, z_far: f32) -> Self {
        Self::Orthographic {
            left: -width / 2.0,
            right: width / 2.0,
            top: height / 2.0,
            bottom: -height / 2.0,
            z_near,
            z_far,
        }
    }

    pub fn z_near(&self) -> f32 {
        match *self {
            Self::Perspective { z_near, .. } | Self::Orthographic { z_near, .. } => z_near,
        }
    }

    pub fn z_far(&self) -> f32 {
        match *self {
            Self::Perspective { z_far, .. } | Self::Orthographic { z_far, .. } => z_far,
        }
    }

    /// Updates the aspect ratio of a perspective projection (typically on
    /// resize). Orthographic boxes are left untouched.
    pub fn set_aspect_ratio(&mut self, aspect: f32) {
        if let Self::Perspective { aspect_ratio, .. } = self {
            *aspect_ratio = aspect;
        }
    }

    /// Checks that the parameters describe a non-degenerate volume.
    pub fn validate(&self) -> Result<(), CameraError> {
        let finite = |v: f32| v.is_finite();
        match *self {
            Self::Perspective {
                fov_y,
                aspect_ratio,
                z_near,
                z_far,
            } => {
                if !finite(fov_y) || fov_y <= 0.0 || fov_y >= std::f32::consts::PI {
                    return Err(CameraError::FieldOfView(fov_y));
                }
                if !finite(aspect_ratio) || aspect_ratio <= 0.0 {
                    return Err(CameraError::AspectRatio(aspect_ratio));
                }
                if !finite(z_near) || !finite(z_far) || z_near <= 0.0 || z_far <= z_near {
                    return Err(CameraError::ClipRange {
                        near: z_near,
                        far: z_far,
                    });
                }
            }
            Self::Orthographic {
                left,
                right,
                top,
                bottom,
                z_near,
                z_far,
            } => {
                if !(finite(left) && finite(right) && finite(top) && finite(bottom))
                    || left == right
                    || top == bottom
                {
                    return Err(CameraError::EmptyViewBox);
                }
                if !finite(z_near) || !finite(z_far) || z_far <= z_near {
                    return Err(CameraError::ClipRange {
                        near: z_near,
                        far: z_far,
                    });
                }
            }
        }
        Ok(())
    }

    /// Generates the projection matrix.
    pub fn matrix(&self) -> Mat4 {
        match *self {
            Self::Perspective {
                fov_y,
                aspect_ratio,
                z_near,
                z_far,
            } => Mat4::perspective(fov_y, aspect_ratio, z_near, z_far),
            Self::Orthographic {
                left,
                right,
                top,
                bottom,
                z_near,
                z_far,
            } => Mat4::orthographic(left, right, top, bottom, z_near, z_far),
        }
    }
}

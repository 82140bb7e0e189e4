//! Error types.
//!
//! The projection and rendering core never fails hard: degraded input is
//! skipped. These errors cover the two places where a caller needs to know
//! something went wrong: a camera that cannot produce a view, and mesh files
//! that cannot be imported.

use thiserror::Error;

/// Reasons a camera cannot be used to render a frame.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CameraError {
    #[error("field of view must be in (0, pi) radians, got {0}")]
    FieldOfView(f32),

    #[error("aspect ratio must be positive, got {0}")]
    AspectRatio(f32),

    #[error("invalid clip range: near {near}, far {far}")]
    ClipRange { near: f32, far: f32 },

    #[error("orthographic view box has zero width or height")]
    EmptyViewBox,

    #[error("camera world matrix is not invertible")]
    SingularTransform,
}

/// Errors raised while importing geometry from disk.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to parse OBJ file: {0}")]
    Obj(#[from] tobj::LoadError),

    #[error("OBJ file contains no meshes")]
    Empty,
}

//! A CPU scene projector and 2D vector renderer.
//!
//! Scenes of meshes, lines, points and sprites are projected through a
//! camera into depth-sorted screen-space primitives, which are then written
//! as styled 2D paths (and, optionally, a standalone SVG document). Nothing
//! is rasterized.
//!
//! # Quick Start
//!
//! ```ignore
//! use vecrender::prelude::*;
//!
//! let mut scene = Scene::new();
//! scene.add(Node::mesh(Rc::new(primitives::cube().into()), Material::basic(Color::WHITE)));
//! let mut camera = Camera::perspective(60.0, 4.0 / 3.0, 0.1, 100.0);
//! camera.transform.set_position_xyz(0.0, 0.0, 5.0);
//!
//! let mut renderer = VectorRenderer::new(800.0, 600.0);
//! renderer.render(&scene, &camera);
//! std::fs::write("cube.svg", renderer.to_svg())?;
//! ```

// Public API - exposed to library consumers
pub mod camera;
pub mod clipper;
pub mod color;
pub mod error;
pub mod light;
pub mod lighting;
pub mod logging;
pub mod math;
pub mod projection;
pub mod projector;
pub mod render;
pub mod scene;
pub mod svg;
pub mod transform;

// Internal modules - used within the crate only
pub(crate) mod pool;

// Re-export commonly needed types at crate root for convenience
pub use camera::Camera;
pub use error::{CameraError, LoadError};
pub use projector::{Projector, RenderData};
pub use render::{RenderConfig, VectorRenderer};
pub use scene::{Node, Scene};

/// Prelude module for convenient imports.
///
/// # Example
/// ```ignore
/// use vecrender::prelude::*;
/// ```
pub mod prelude {
    pub use std::rc::Rc;

    // Camera
    pub use crate::camera::Camera;
    pub use crate::projection::Projection;
    pub use crate::transform::Transform;

    // Scene
    pub use crate::color::Color;
    pub use crate::light::Light;
    pub use crate::scene::{
        primitives, BufferGeometry, Face3, Geometry, LegacyGeometry, LineMode, Material,
        MaterialSlot, Node, Scene, Side, VertexColors,
    };

    // Math
    pub use crate::math::{Mat4, Vec2, Vec3, Vec4};

    // Rendering
    pub use crate::projector::Projector;
    pub use crate::render::{PathStyle, Quality, RenderConfig, VectorRenderer};
}

//! Small linear-algebra kit used by the projector and renderer.
//!
//! Matrices follow the column-vector convention (`M * v`), with translation
//! in the last column. See [`mat4`] for details.

pub mod mat3;
pub mod mat4;
pub mod vec2;
pub mod vec3;
pub mod vec4;

pub use mat3::Mat3;
pub use mat4::Mat4;
pub use vec2::Vec2;
pub use vec3::Vec3;
pub use vec4::Vec4;

//! Culling and clipping helpers.
//!
//! - [`frustum`]: world-space frustum planes for sphere culling.
//! - [`clip_space`]: near/far line clipping and triangle tests in
//!   homogeneous clip space.
//! - [`bounds`]: spheres and boxes shared by both.

pub mod bounds;
pub mod clip_space;
pub mod frustum;

pub use bounds::{Box2, Box3, Sphere};
pub use clip_space::{clip_line, is_front_facing, ClipPlane};
pub use frustum::{Frustum, Plane};

//! Projected scene to 2D paths.
//!
//! - [`renderer`]: the per-frame driver, [`VectorRenderer`].
//! - [`path`]: path records, styles and identity batching.
//! - [`config`]: quality, precision and clearing options.

pub mod config;
pub mod path;
pub mod renderer;

pub use config::{Quality, RenderConfig};
pub use path::{CoordFormat, Fill, PathBatcher, PathDescriptor, PathStyle};
pub use renderer::{RenderInfo, Surface, VectorRenderer};

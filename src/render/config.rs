//! Renderer settings.

use std::convert::Infallible;
use std::str::FromStr;

use crate::color::Color;

/// Rendering quality hint passed on to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Quality {
    #[default]
    High,
    /// Ask the presenter to skip anti-aliasing (`crispEdges`).
    Low,
}

impl FromStr for Quality {
    type Err = Infallible;

    /// `"low"` selects [`Quality::Low`]; anything else is `High`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "low" => Self::Low,
            _ => Self::High,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderConfig {
    pub quality: Quality,
    /// Fixed number of decimals for path coordinates, or shortest
    /// round-trip formatting when `None`.
    pub precision: Option<usize>,
    pub clear_color: Color,
    pub clear_alpha: f32,
    /// Clear output and apply the clear color on every render when the
    /// scene has no background.
    pub auto_clear: bool,
    pub sort_objects: bool,
    pub sort_elements: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            quality: Quality::High,
            precision: None,
            clear_color: Color::BLACK,
            clear_alpha: 1.0,
            auto_clear: true,
            sort_objects: true,
            sort_elements: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_parsing_defaults_to_high() {
        assert_eq!("low".parse::<Quality>(), Ok(Quality::Low));
        assert_eq!("high".parse::<Quality>(), Ok(Quality::High));
        assert_eq!("medium".parse::<Quality>(), Ok(Quality::High));
    }
}

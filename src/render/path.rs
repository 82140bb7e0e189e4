//! 2D path output and style batching.

use std::fmt::Write;
use std::rc::Rc;

use crate::color::Color;

/// Interior paint of a path.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Fill {
    #[default]
    None,
    Color(String),
}

/// Paint attributes shared by every primitive merged into one path.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PathStyle {
    pub fill: Fill,
    pub fill_opacity: Option<f32>,
    pub stroke: Option<String>,
    pub stroke_opacity: Option<f32>,
    pub stroke_width: Option<f32>,
    /// Dash and gap lengths of a dashed stroke.
    pub stroke_dasharray: Option<(f32, f32)>,
}

fn opacity(value: f32) -> Option<f32> {
    (value != 1.0).then_some(value)
}

impl PathStyle {
    pub fn filled(color: Color, alpha: f32) -> Self {
        Self {
            fill: Fill::Color(color.to_svg()),
            fill_opacity: opacity(alpha),
            ..Self::default()
        }
    }

    pub fn stroked(color: Color, alpha: f32, width: f32) -> Self {
        Self {
            fill: Fill::None,
            stroke: Some(color.to_svg()),
            stroke_opacity: opacity(alpha),
            stroke_width: Some(width),
            ..Self::default()
        }
    }

    pub fn with_dasharray(mut self, dash: f32, gap: f32) -> Self {
        self.stroke_dasharray = Some((dash, gap));
        self
    }

    pub fn shared(self) -> Rc<Self> {
        Rc::new(self)
    }
}

/// One output path: commands plus the style they are painted with.
#[derive(Debug, Clone, PartialEq)]
pub struct PathDescriptor {
    pub commands: String,
    pub style: Rc<PathStyle>,
    /// Extra placement, used by vector nodes (`translate(x,y)`).
    pub transform: Option<String>,
}

/// Merges consecutive primitives that use the very same style object.
///
/// Identity, not equality, decides: two equal styles built separately start
/// separate paths.
#[derive(Debug, Default)]
pub struct PathBatcher {
    commands: String,
    style: Option<Rc<PathStyle>>,
}

impl PathBatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_path(&mut self, style: &Rc<PathStyle>, commands: &str, out: &mut Vec<PathDescriptor>) {
        let same = self
            .style
            .as_ref()
            .is_some_and(|current| Rc::ptr_eq(current, style));
        if !same {
            self.flush(out);
            self.style = Some(Rc::clone(style));
        }
        self.commands.push_str(commands);
    }

    /// Emits the accumulated path, if any, and forgets the current style.
    pub fn flush(&mut self, out: &mut Vec<PathDescriptor>) {
        if let Some(style) = self.style.take() {
            if !self.commands.is_empty() {
                out.push(PathDescriptor {
                    commands: std::mem::take(&mut self.commands),
                    style,
                    transform: None,
                });
            }
        }
        self.commands.clear();
    }
}

/// Number formatting for path coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CoordFormat {
    pub precision: Option<usize>,
}

impl CoordFormat {
    pub fn write(&self, out: &mut String, value: f32) {
        // Avoid "-0".
        let value = if value == 0.0 { 0.0 } else { value };
        // Writing into a String cannot fail.
        let _ = match self.precision {
            Some(digits) => write!(out, "{value:.digits$}"),
            None => write!(out, "{value}"),
        };
    }

    pub fn write_pair(&self, out: &mut String, x: f32, y: f32) {
        self.write(out, x);
        out.push(',');
        self.write(out, y);
    }

    pub fn format(&self, value: f32) -> String {
        let mut s = String::new();
        self.write(&mut s, value);
        s
    }
}

//! Linear RGB color with unbounded float channels.
//!
//! Channels are not clamped while lighting accumulates; clamping only happens
//! when a color is formatted for output (see [`Color::to_svg`]).

use std::ops::{Add, AddAssign, Mul};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl Color {
    pub const BLACK: Self = Self::new(0.0, 0.0, 0.0);
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Builds a color from a packed `0xRRGGBB` value.
    pub fn from_hex(hex: u32) -> Self {
        Self::new(
            ((hex >> 16) & 0xFF) as f32 / 255.0,
            ((hex >> 8) & 0xFF) as f32 / 255.0,
            (hex & 0xFF) as f32 / 255.0,
        )
    }

    /// Reads three consecutive channels starting at `offset`.
    pub fn from_slice(values: &[f32], offset: usize) -> Option<Self> {
        match values.get(offset..offset + 3) {
            Some(&[r, g, b]) => Some(Self::new(r, g, b)),
            _ => None,
        }
    }

    /// Channel-wise product.
    pub fn multiply(self, other: Self) -> Self {
        Self::new(self.r * other.r, self.g * other.g, self.b * other.b)
    }

    pub fn add_scalar(self, s: f32) -> Self {
        Self::new(self.r + s, self.g + s, self.b + s)
    }

    /// Formats as `rgb(r,g,b)` with each channel floored to 0..=255.
    pub fn to_svg(&self) -> String {
        format!(
            "rgb({},{},{})",
            channel_to_byte(self.r),
            channel_to_byte(self.g),
            channel_to_byte(self.b)
        )
    }
}

fn channel_to_byte(c: f32) -> u8 {
    (c * 255.0).floor().clamp(0.0, 255.0) as u8
}

impl Add for Color {
    type Output = Color;

    fn add(self, rhs: Color) -> Self::Output {
        Self::new(self.r + rhs.r, self.g + rhs.g, self.b + rhs.b)
    }
}

impl AddAssign for Color {
    fn add_assign(&mut self, rhs: Color) {
        *self = *self + rhs;
    }
}

impl Mul<f32> for Color {
    type Output = Color;

    fn mul(self, rhs: f32) -> Self::Output {
        Self::new(self.r * rhs, self.g * rhs, self.b * rhs)
    }
}

//! Flat lighting from the lights collected by the projector.

use crate::color::Color;
use crate::light::{LightKind, LightRecord};
use crate::math::Vec3;

/// Per-frame light sums.
///
/// Only the ambient sum takes part in shading; the directional and point
/// sums are kept for callers that want a cheap scene-wide estimate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightAccumulator {
    ambient: Color,
    directional: Color,
    point: Color,
}

impl Default for LightAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl LightAccumulator {
    pub fn new() -> Self {
        Self {
            ambient: Color::BLACK,
            directional: Color::BLACK,
            point: Color::BLACK,
        }
    }

    /// Resets the sums and adds each light's color to the sum of its kind.
    pub fn calculate_lights(&mut self, lights: &[LightRecord]) {
        *self = Self::new();
        for record in lights {
            let color = record.light.color;
            match record.light.kind {
                LightKind::Ambient => self.ambient += color,
                LightKind::Directional => self.directional += color,
                LightKind::Point { .. } => self.point += color,
            }
        }
    }

    pub fn ambient(&self) -> Color {
        self.ambient
    }

    pub fn directional(&self) -> Color {
        self.directional
    }

    pub fn point(&self) -> Color {
        self.point
    }

    /// Adds the diffuse contribution of every directional and point light
    /// to `color` for a surface at `position` facing `normal`. No clamping.
    pub fn calculate_light(lights: &[LightRecord], position: Vec3, normal: Vec3, color: &mut Color) {
        for record in lights {
            let amount = record
                .light
                .diffuse_amount(record.position, position, normal);
            if amount == 0.0 {
                continue;
            }
            *color += record.light.color * amount;
        }
    }
}

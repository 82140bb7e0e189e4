//! Light sources placed in the scene graph.

use crate::color::Color;
use crate::math::Vec3;
use crate::scene::NodeId;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    /// Uniform light reaching every surface.
    Ambient,
    /// Parallel rays travelling from the light's world position toward the
    /// origin, like a distant sun.
    Directional,
    /// Light radiating from the light's world position. A `distance` of zero
    /// means no falloff.
    Point { distance: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Light {
    pub color: Color,
    pub intensity: f32,
    pub kind: LightKind,
}

impl Light {
    pub fn ambient(color: Color) -> Self {
        Self {
            color,
            intensity: 1.0,
            kind: LightKind::Ambient,
        }
    }

    pub fn directional(color: Color, intensity: f32) -> Self {
        Self {
            color,
            intensity,
            kind: LightKind::Directional,
        }
    }

    pub fn point(color: Color, intensity: f32, distance: f32) -> Self {
        Self {
            color,
            intensity,
            kind: LightKind::Point { distance },
        }
    }

    /// Diffuse factor this light contributes to a surface at `position` with
    /// unit `normal`, already scaled by intensity and falloff.
    ///
    /// `light_position` is the light's world position. Ambient lights return
    /// zero here; they are summed separately.
    pub fn diffuse_amount(&self, light_position: Vec3, position: Vec3, normal: Vec3) -> f32 {
        match self.kind {
            LightKind::Ambient => 0.0,
            LightKind::Directional => {
                let amount = normal.dot(light_position.normalize());
                if amount <= 0.0 {
                    return 0.0;
                }
                amount * self.intensity
            }
            LightKind::Point { distance } => {
                let to_light = (light_position - position).normalize();
                let amount = normal.dot(to_light);
                if amount <= 0.0 {
                    return 0.0;
                }
                let falloff = if distance > 0.0 {
                    1.0 - (position.distance_to(light_position) / distance).min(1.0)
                } else {
                    1.0
                };
                amount * falloff * self.intensity
            }
        }
    }
}

/// A light found while projecting the scene, with its resolved world
/// position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightRecord {
    pub id: NodeId,
    pub light: Light,
    pub position: Vec3,
}

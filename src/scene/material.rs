//! Surface descriptions attached to drawable nodes.
//!
//! Materials are shared between nodes through `Rc`. The renderer relies on
//! that sharing: styles that depend only on the material are built once per
//! frame per material and reused, which is what lets consecutive primitives
//! batch into one path.

use std::rc::Rc;

use crate::color::Color;

/// Which triangle orientation is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Side {
    #[default]
    Front,
    Back,
    Double,
}

/// Where per-primitive color comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VertexColors {
    #[default]
    None,
    Face,
    Vertex,
}

impl VertexColors {
    pub fn enabled(self) -> bool {
        !matches!(self, VertexColors::None)
    }
}

/// Render mode of a material plus the fields only that mode uses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MaterialKind {
    /// Unlit flat color.
    Basic,
    Lambert { emissive: Color },
    Phong { emissive: Color },
    Standard { emissive: Color },
    /// Colors faces by their view-space normal.
    Normal,
    Points { size: f32 },
    Sprite,
    LineBasic { linewidth: f32 },
    LineDashed { linewidth: f32, dash_size: f32, gap_size: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub kind: MaterialKind,
    pub color: Color,
    pub opacity: f32,
    pub side: Side,
    pub wireframe: bool,
    pub wireframe_linewidth: f32,
    pub vertex_colors: VertexColors,
    pub visible: bool,
    /// Blend the geometry's morph targets by the node's influences.
    pub morph_targets: bool,
}

impl Material {
    pub fn new(kind: MaterialKind, color: Color) -> Self {
        Self {
            kind,
            color,
            opacity: 1.0,
            side: Side::Front,
            wireframe: false,
            wireframe_linewidth: 1.0,
            vertex_colors: VertexColors::None,
            visible: true,
            morph_targets: false,
        }
    }

    pub fn basic(color: Color) -> Self {
        Self::new(MaterialKind::Basic, color)
    }

    pub fn lambert(color: Color) -> Self {
        Self::new(
            MaterialKind::Lambert {
                emissive: Color::BLACK,
            },
            color,
        )
    }

    pub fn phong(color: Color) -> Self {
        Self::new(
            MaterialKind::Phong {
                emissive: Color::BLACK,
            },
            color,
        )
    }

    pub fn standard(color: Color) -> Self {
        Self::new(
            MaterialKind::Standard {
                emissive: Color::BLACK,
            },
            color,
        )
    }

    pub fn normal() -> Self {
        Self::new(MaterialKind::Normal, Color::WHITE)
    }

    pub fn points(color: Color, size: f32) -> Self {
        Self::new(MaterialKind::Points { size }, color)
    }

    pub fn sprite(color: Color) -> Self {
        Self::new(MaterialKind::Sprite, color)
    }

    pub fn line_basic(color: Color, linewidth: f32) -> Self {
        Self::new(MaterialKind::LineBasic { linewidth }, color)
    }

    pub fn line_dashed(color: Color, linewidth: f32, dash_size: f32, gap_size: f32) -> Self {
        Self::new(
            MaterialKind::LineDashed {
                linewidth,
                dash_size,
                gap_size,
            },
            color,
        )
    }

    pub fn with_side(mut self, side: Side) -> Self {
        self.side = side;
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn with_wireframe(mut self, linewidth: f32) -> Self {
        self.wireframe = true;
        self.wireframe_linewidth = linewidth;
        self
    }

    pub fn with_vertex_colors(mut self, mode: VertexColors) -> Self {
        self.vertex_colors = mode;
        self
    }

    pub fn with_morph_targets(mut self) -> Self {
        self.morph_targets = true;
        self
    }

    /// Sets the emissive color of lit materials; ignored by other kinds.
    pub fn with_emissive(mut self, color: Color) -> Self {
        match &mut self.kind {
            MaterialKind::Lambert { emissive }
            | MaterialKind::Phong { emissive }
            | MaterialKind::Standard { emissive } => *emissive = color,
            _ => {}
        }
        self
    }

    pub fn shared(self) -> Rc<Self> {
        Rc::new(self)
    }
}

/// The material(s) bound to a mesh.
///
/// A multi-material mesh picks its material per geometry group (buffer
/// geometry) or per face (legacy geometry).
#[derive(Debug, Clone)]
pub enum MaterialSlot {
    Single(Rc<Material>),
    Multi(Vec<Rc<Material>>),
}

impl MaterialSlot {
    /// A multi-material slot has no single visibility flag and always
    /// passes the visibility check.
    pub fn is_visible(&self) -> bool {
        match self {
            Self::Single(material) => material.visible,
            Self::Multi(_) => true,
        }
    }

    /// Material for a group / face material index.
    ///
    /// A single material ignores the index; a multi slot returns `None` for
    /// indices it does not have, and the primitive is skipped.
    pub fn resolve(&self, index: usize) -> Option<&Rc<Material>> {
        match self {
            Self::Single(material) => Some(material),
            Self::Multi(materials) => materials.get(index),
        }
    }

    pub fn single(&self) -> Option<&Rc<Material>> {
        match self {
            Self::Single(material) => Some(material),
            Self::Multi(_) => None,
        }
    }
}

impl From<Rc<Material>> for MaterialSlot {
    fn from(material: Rc<Material>) -> Self {
        Self::Single(material)
    }
}

impl From<Material> for MaterialSlot {
    fn from(material: Material) -> Self {
        Self::Single(Rc::new(material))
    }
}

impl From<Vec<Rc<Material>>> for MaterialSlot {
    fn from(materials: Vec<Rc<Material>>) -> Self {
        Self::Multi(materials)
    }
}

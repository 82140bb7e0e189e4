//! Per-frame records produced by the projector.

use std::cmp::Ordering;
use std::rc::Rc;

use crate::color::Color;
use crate::light::LightRecord;
use crate::math::{Vec2, Vec3, Vec4};
use crate::pool::Pool;
use crate::scene::{Material, NodeId};

/// A projected vertex.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RenderableVertex {
    /// Object space.
    pub position: Vec3,
    pub position_world: Vec3,
    /// Normalized device coordinates after the perspective divide.
    pub position_screen: Vec4,
    /// All three screen coordinates are inside [-1, 1].
    pub visible: bool,
}

#[derive(Debug, Clone, Default)]
pub struct RenderableFace {
    pub id: NodeId,
    pub v1: RenderableVertex,
    pub v2: RenderableVertex,
    pub v3: RenderableVertex,
    /// Face normal in world orientation.
    pub normal_model: Vec3,
    pub vertex_normals_model: [Vec3; 3],
    /// How many entries of `vertex_normals_model` are set.
    pub vertex_normals_len: usize,
    pub color: Color,
    pub material: Option<Rc<Material>>,
    pub uvs: [Vec2; 3],
    pub z: f32,
    pub render_order: i32,
}

#[derive(Debug, Clone, Default)]
pub struct RenderableLine {
    pub id: NodeId,
    pub v1: RenderableVertex,
    pub v2: RenderableVertex,
    pub vertex_colors: [Color; 2],
    pub material: Option<Rc<Material>>,
    pub z: f32,
    pub render_order: i32,
}

#[derive(Debug, Clone, Default)]
pub struct RenderableSprite {
    pub id: NodeId,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub rotation: f32,
    /// Approximate on-screen size in normalized device units.
    pub scale: Vec2,
    pub material: Option<Rc<Material>>,
    pub render_order: i32,
}

/// A drawable node that survived culling this frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RenderableObject {
    pub id: NodeId,
    pub z: f32,
    pub render_order: i32,
    pub(crate) drawable: usize,
}

impl RenderableObject {
    pub fn sort_key(&self) -> SortKey {
        SortKey {
            render_order: self.render_order,
            z: self.z,
            id: self.id,
        }
    }
}

/// Painter's-algorithm ordering key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SortKey {
    pub render_order: i32,
    pub z: f32,
    pub id: NodeId,
}

impl SortKey {
    /// `render_order` ascending, then `z` descending (far first), then `id`
    /// ascending. Total even for NaN depths.
    pub fn painter_cmp(&self, other: &Self) -> Ordering {
        self.render_order
            .cmp(&other.render_order)
            .then_with(|| {
                if self.z == other.z {
                    Ordering::Equal
                } else {
                    other.z.total_cmp(&self.z)
                }
            })
            .then_with(|| self.id.cmp(&other.id))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Face(usize),
    Line(usize),
    Sprite(usize),
}

/// Handle to one projected primitive plus its sort key.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderElement {
    pub kind: ElementKind,
    pub key: SortKey,
}

/// A resolved [`RenderElement`].
#[derive(Debug, Clone, Copy)]
pub enum ElementRef<'a> {
    Face(&'a RenderableFace),
    Line(&'a RenderableLine),
    Sprite(&'a RenderableSprite),
}

/// Allocated slots per pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolCapacities {
    pub objects: usize,
    pub vertices: usize,
    pub faces: usize,
    pub lines: usize,
    pub sprites: usize,
}

/// Output of one projection pass, owned by the projector and reused.
#[derive(Debug, Default)]
pub struct RenderData {
    pub(crate) objects: Pool<RenderableObject>,
    pub(crate) lights: Vec<LightRecord>,
    pub(crate) elements: Vec<RenderElement>,
    pub(crate) vertices: Pool<RenderableVertex>,
    pub(crate) faces: Pool<RenderableFace>,
    pub(crate) lines: Pool<RenderableLine>,
    pub(crate) sprites: Pool<RenderableSprite>,
}

impl RenderData {
    pub(crate) fn begin_frame(&mut self) {
        self.objects.reset();
        self.vertices.reset();
        self.faces.reset();
        self.lines.reset();
        self.sprites.reset();
        self.lights.clear();
        self.elements.clear();
    }

    pub fn objects(&self) -> &[RenderableObject] {
        self.objects.active()
    }

    pub fn lights(&self) -> &[LightRecord] {
        &self.lights
    }

    pub fn elements(&self) -> &[RenderElement] {
        &self.elements
    }

    pub fn faces(&self) -> &[RenderableFace] {
        self.faces.active()
    }

    pub fn lines(&self) -> &[RenderableLine] {
        self.lines.active()
    }

    pub fn sprites(&self) -> &[RenderableSprite] {
        self.sprites.active()
    }

    pub fn resolve(&self, element: &RenderElement) -> Option<ElementRef<'_>> {
        match element.kind {
            ElementKind::Face(i) => self.faces.get(i).map(ElementRef::Face),
            ElementKind::Line(i) => self.lines.get(i).map(ElementRef::Line),
            ElementKind::Sprite(i) => self.sprites.get(i).map(ElementRef::Sprite),
        }
    }

    /// Elements in draw order, resolved.
    pub fn iter_elements(&self) -> impl Iterator<Item = ElementRef<'_>> + '_ {
        self.elements.iter().filter_map(|e| self.resolve(e))
    }

    pub fn pool_capacities(&self) -> PoolCapacities {
        PoolCapacities {
            objects: self.objects.capacity(),
            vertices: self.vertices.capacity(),
            faces: self.faces.capacity(),
            lines: self.lines.capacity(),
            sprites: self.sprites.capacity(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(render_order: i32, z: f32, id: u32) -> SortKey {
        SortKey {
            render_order,
            z,
            id: NodeId::from_raw(id),
        }
    }

    #[test]
    fn render_order_wins_over_depth() {
        assert_eq!(key(0, 0.1, 1).painter_cmp(&key(1, 0.9, 1)), Ordering::Less);
    }

    #[test]
    fn farther_elements_come_first() {
        assert_eq!(key(0, 0.9, 2).painter_cmp(&key(0, 0.1, 1)), Ordering::Less);
    }

    #[test]
    fn equal_depth_falls_back_to_id() {
        assert_eq!(key(0, 0.5, 1).painter_cmp(&key(0, 0.5, 2)), Ordering::Less);
        assert_eq!(key(0, 0.0, 3).painter_cmp(&key(0, -0.0, 3)), Ordering::Equal);
    }

    #[test]
    fn nan_depth_still_orders() {
        let nan = key(0, f32::NAN, 1);
        let finite = key(0, 0.5, 2);
        assert_eq!(nan.painter_cmp(&nan), Ordering::Equal);
        assert_eq!(nan.painter_cmp(&finite), finite.painter_cmp(&nan).reverse());
    }
}

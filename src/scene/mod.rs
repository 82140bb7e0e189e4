//! The scene graph handed to the projector and renderer.
//!
//! A [`Scene`] owns a tree of [`Node`]s. Each node has a local
//! [`Transform`], a cached world matrix and a [`NodeKind`] saying what it
//! draws. Geometry and materials are shared between nodes through `Rc`.
//!
//! Projection and rendering only ever read the scene. When
//! [`Scene::auto_update`] is set, world matrices are derived from the local
//! transforms while walking the tree; otherwise each node's cached
//! `matrix_world` is trusted (see [`Scene::update_matrix_world`]).

pub mod geometry;
pub mod material;
pub mod obj;
pub mod primitives;

use std::rc::Rc;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::color::Color;
use crate::light::Light;
use crate::math::Mat4;
use crate::render::path::PathStyle;
use crate::transform::Transform;

pub use geometry::{BufferGeometry, Face3, Geometry, GeometryGroup, LegacyGeometry};
pub use material::{Material, MaterialKind, MaterialSlot, Side, VertexColors};

static NEXT_NODE_ID: AtomicU32 = AtomicU32::new(1);

/// Process-unique node identifier, assigned in creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct NodeId(u32);

impl NodeId {
    fn next() -> Self {
        Self(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }

    #[cfg(test)]
    pub(crate) const fn from_raw(id: u32) -> Self {
        Self(id)
    }

    pub fn get(self) -> u32 {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct Mesh {
    pub geometry: Rc<Geometry>,
    pub material: MaterialSlot,
    /// Weight of each morph target; zero weights are skipped.
    pub morph_influences: Vec<f32>,
}

/// How consecutive line vertices are paired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineMode {
    /// 0-1, 1-2, 2-3, ...
    #[default]
    Strip,
    /// 0-1, 2-3, ...
    Segments,
}

impl LineMode {
    pub fn step(self) -> usize {
        match self {
            Self::Strip => 1,
            Self::Segments => 2,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Line {
    pub geometry: Rc<Geometry>,
    pub material: Rc<Material>,
    pub mode: LineMode,
}

#[derive(Debug, Clone)]
pub struct Points {
    pub geometry: Rc<Geometry>,
    pub material: Rc<Material>,
}

#[derive(Debug, Clone)]
pub struct Sprite {
    pub material: Rc<Material>,
}

/// Pre-built 2D path content positioned at the node's projected origin.
#[derive(Debug, Clone)]
pub struct VectorNode {
    pub commands: String,
    pub style: Rc<PathStyle>,
}

#[derive(Debug, Clone)]
pub enum NodeKind {
    Group,
    Mesh(Mesh),
    Line(Line),
    Points(Points),
    Sprite(Sprite),
    Light(Light),
    Vector(VectorNode),
}

#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    pub name: String,
    pub transform: Transform,
    /// Cached world matrix, read when the scene does not auto-update.
    pub matrix_world: Mat4,
    pub visible: bool,
    pub frustum_culled: bool,
    pub render_order: i32,
    pub kind: NodeKind,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            id: NodeId::next(),
            name: String::new(),
            transform: Transform::default(),
            matrix_world: Mat4::identity(),
            visible: true,
            frustum_culled: true,
            render_order: 0,
            kind,
            children: Vec::new(),
        }
    }

    pub fn group() -> Self {
        Self::new(NodeKind::Group)
    }

    pub fn mesh(geometry: Rc<Geometry>, material: impl Into<MaterialSlot>) -> Self {
        Self::new(NodeKind::Mesh(Mesh {
            geometry,
            material: material.into(),
            morph_influences: Vec::new(),
        }))
    }

    pub fn line(geometry: Rc<Geometry>, material: Rc<Material>, mode: LineMode) -> Self {
        Self::new(NodeKind::Line(Line {
            geometry,
            material,
            mode,
        }))
    }

    pub fn points(geometry: Rc<Geometry>, material: Rc<Material>) -> Self {
        Self::new(NodeKind::Points(Points { geometry, material }))
    }

    pub fn sprite(material: Rc<Material>) -> Self {
        Self::new(NodeKind::Sprite(Sprite { material }))
    }

    pub fn light(light: Light) -> Self {
        Self::new(NodeKind::Light(light))
    }

    pub fn vector(commands: impl Into<String>, style: Rc<PathStyle>) -> Self {
        Self::new(NodeKind::Vector(VectorNode {
            commands: commands.into(),
            style,
        }))
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_render_order(mut self, order: i32) -> Self {
        self.render_order = order;
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn add(&mut self, child: Node) -> &mut Self {
        self.children.push(child);
        self
    }

    /// World matrix of this node under a parent whose world matrix is
    /// `parent_world`.
    pub fn world_matrix(&self, parent_world: &Mat4, auto_update: bool) -> Mat4 {
        if auto_update {
            *parent_world * self.transform.to_matrix()
        } else {
            self.matrix_world
        }
    }

    /// Recomputes `matrix_world` for this node and its subtree.
    pub fn update_matrix_world(&mut self, parent_world: &Mat4) {
        self.matrix_world = *parent_world * self.transform.to_matrix();
        let world = self.matrix_world;
        for child in &mut self.children {
            child.update_matrix_world(&world);
        }
    }

    /// Depth-first visit of every node whose ancestors are all visible,
    /// passing each node's world matrix.
    pub fn traverse_visible<'a>(
        &'a self,
        parent_world: &Mat4,
        auto_update: bool,
        visit: &mut impl FnMut(&'a Node, &Mat4),
    ) {
        if !self.visible {
            return;
        }
        let world = self.world_matrix(parent_world, auto_update);
        visit(self, &world);
        for child in &self.children {
            child.traverse_visible(&world, auto_update, visit);
        }
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Node> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find_by_name(name))
    }

    pub fn find_by_name_mut(&mut self, name: &str) -> Option<&mut Node> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter_mut().find_map(|c| c.find_by_name_mut(name))
    }
}

#[derive(Debug, Clone)]
pub struct Scene {
    pub root: Node,
    pub background: Option<Color>,
    pub auto_update: bool,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            root: Node::group().with_name("scene"),
            background: None,
            auto_update: true,
        }
    }

    pub fn add(&mut self, node: Node) -> &mut Self {
        self.root.add(node);
        self
    }

    pub fn update_matrix_world(&mut self) {
        self.root.update_matrix_world(&Mat4::identity());
    }

    pub fn traverse_visible<'a>(&'a self, mut visit: impl FnMut(&'a Node, &Mat4)) {
        self.root
            .traverse_visible(&Mat4::identity(), self.auto_update, &mut visit);
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Node> {
        self.root.find_by_name(name)
    }

    pub fn find_by_name_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.root.find_by_name_mut(name)
    }
}

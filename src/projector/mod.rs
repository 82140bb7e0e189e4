//! Scene projection.
//!
//! [`Projector::project_scene`] walks the scene graph once per frame and
//! flattens it into [`RenderData`]: the lights it found, the drawable
//! objects that survived culling, and every face, line and sprite of those
//! objects in normalized device coordinates, each with a painter's sort key.
//!
//! # Pipeline
//!
//! 1. Traverse the graph, collecting lights and culling drawables against
//!    the view frustum.
//! 2. Optionally sort the objects.
//! 3. Push each object's vertices through the model and view-projection
//!    matrices, then emit its primitives: triangles are tested for
//!    visibility and orientation, lines are clipped against the near and far
//!    planes, points keep only what lies between them.
//! 4. Optionally sort the elements.
//!
//! All records live in grow-only pools owned by the projector, so a steady
//! scene stops allocating after its first frames.

pub mod renderable;

use std::f32::consts::FRAC_1_SQRT_2;
use std::rc::Rc;

use crate::camera::Camera;
use crate::clipper::clip_space::{in_clip_cube, triangle_may_be_visible};
use crate::clipper::{clip_line, is_front_facing, Frustum, Sphere};
use crate::color::Color;
use crate::light::LightRecord;
use crate::math::{Mat3, Mat4, Vec2, Vec3, Vec4};
use crate::scene::{
    BufferGeometry, Geometry, LegacyGeometry, Line, Material, Mesh, Node, NodeId, NodeKind,
    Points, Scene, Side, Sprite, VertexColors,
};

pub use renderable::{
    ElementKind, ElementRef, PoolCapacities, RenderData, RenderElement, RenderableFace,
    RenderableLine, RenderableObject, RenderableSprite, RenderableVertex, SortKey,
};

/// Radius of the unit quad a sprite covers, before world scaling.
const SPRITE_RADIUS: f32 = FRAC_1_SQRT_2;

/// A drawable that survived culling, with its resolved world matrix.
#[derive(Debug)]
struct Drawable<'a> {
    node: &'a Node,
    world: Mat4,
}

/// Per-call scratch state.
struct FrameContext<'a> {
    projection: Mat4,
    view_projection: Mat4,
    frustum: Frustum,
    auto_update: bool,
    drawables: Vec<Drawable<'a>>,
}

/// What every primitive of the object being projected shares.
struct ObjectState<'a> {
    node: &'a Node,
    model: Mat4,
    normal_matrix: Mat3,
}

impl ObjectState<'_> {
    fn id(&self) -> NodeId {
        self.node.id()
    }

    fn render_order(&self) -> i32 {
        self.node.render_order
    }

    fn key(&self, z: f32) -> SortKey {
        SortKey {
            render_order: self.render_order(),
            z,
            id: self.id(),
        }
    }
}

#[derive(Debug, Default)]
pub struct Projector {
    data: RenderData,
    /// Empty between calls; only its allocation is carried over.
    drawables: Vec<Drawable<'static>>,
}

impl Projector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Result of the last projection.
    pub fn render_data(&self) -> &RenderData {
        &self.data
    }

    /// Projects `scene` as seen by `camera`.
    ///
    /// A camera whose world matrix cannot be inverted yields empty render
    /// data. Malformed geometry is skipped.
    pub fn project_scene(
        &mut self,
        scene: &Scene,
        camera: &Camera,
        sort_objects: bool,
        sort_elements: bool,
    ) -> &RenderData {
        self.data.begin_frame();

        let view = match camera.view_matrix() {
            Ok(view) => view,
            Err(err) => {
                log::trace!("nothing projected: {err}");
                return &self.data;
            }
        };
        let projection = camera.projection_matrix();
        let view_projection = projection * view;

        let mut frame = FrameContext {
            projection,
            view_projection,
            frustum: Frustum::from_matrix(&view_projection),
            auto_update: scene.auto_update,
            drawables: std::mem::take(&mut self.drawables),
        };

        collect(&mut self.data, &scene.root, &Mat4::identity(), &mut frame);

        if sort_objects {
            self.data
                .objects
                .active_mut()
                .sort_by(|a, b| a.sort_key().painter_cmp(&b.sort_key()));
        }

        for i in 0..self.data.objects.len() {
            let object = self.data.objects.active()[i];
            let Some(drawable) = frame.drawables.get(object.drawable) else {
                continue;
            };
            let state = ObjectState {
                node: drawable.node,
                model: drawable.world,
                normal_matrix: Mat3::normal_matrix(&drawable.world),
            };
            match &drawable.node.kind {
                NodeKind::Mesh(mesh) => project_mesh(&mut self.data, &state, mesh, &frame),
                NodeKind::Line(line) => project_line(&mut self.data, &state, line, &frame),
                NodeKind::Points(points) => project_points(&mut self.data, &state, points, &frame),
                NodeKind::Sprite(sprite) => project_sprite(&mut self.data, &state, sprite, &frame),
                NodeKind::Group | NodeKind::Light(_) | NodeKind::Vector(_) => {}
            }
        }

        if sort_elements {
            self.data
                .elements
                .sort_by(|a, b| a.key.painter_cmp(&b.key));
        }

        self.drawables = recycle(frame.drawables);

        log::trace!(
            "projected {} objects into {} elements ({} lights)",
            self.data.objects.len(),
            self.data.elements.len(),
            self.data.lights.len()
        );

        &self.data
    }
}

/// Empties `drawables` and hands its buffer back without the scene borrow.
fn recycle(mut drawables: Vec<Drawable<'_>>) -> Vec<Drawable<'static>> {
    drawables.clear();
    // Collecting a `vec::IntoIter` into a same-layout `Vec` reuses the buffer.
    drawables.into_iter().filter_map(|_| None).collect()
}

/// Depth-first pre-order collection of lights and drawables.
///
/// An invisible node hides its subtree. A drawable culled by its material
/// or the frustum is skipped on its own; its children are still visited.
/// Children of point clouds are never visited.
fn collect<'a>(
    data: &mut RenderData,
    node: &'a Node,
    parent_world: &Mat4,
    frame: &mut FrameContext<'a>,
) {
    if !node.visible {
        return;
    }
    let world = node.world_matrix(parent_world, frame.auto_update);

    let drawable = match &node.kind {
        NodeKind::Light(light) => {
            data.lights.push(LightRecord {
                id: node.id(),
                light: *light,
                position: world.position(),
            });
            false
        }
        NodeKind::Mesh(mesh) => {
            mesh.material.is_visible()
                && in_frustum(node, &mesh.geometry.bounding_sphere(), &world, frame)
        }
        NodeKind::Line(line) => {
            line.material.visible
                && in_frustum(node, &line.geometry.bounding_sphere(), &world, frame)
        }
        NodeKind::Points(points) => {
            points.material.visible
                && in_frustum(node, &points.geometry.bounding_sphere(), &world, frame)
        }
        NodeKind::Sprite(sprite) => {
            sprite.material.visible
                && in_frustum(node, &Sphere::new(Vec3::ZERO, SPRITE_RADIUS), &world, frame)
        }
        NodeKind::Group | NodeKind::Vector(_) => false,
    };

    if drawable {
        let (_, object) = data.objects.next();
        object.id = node.id();
        object.render_order = node.render_order;
        object.z = (frame.view_projection * world.position()).z;
        object.drawable = frame.drawables.len();
        frame.drawables.push(Drawable { node, world });
    }

    if matches!(node.kind, NodeKind::Points(_)) {
        return;
    }
    for child in &node.children {
        collect(data, child, &world, frame);
    }
}

fn in_frustum(node: &Node, local: &Sphere, world: &Mat4, frame: &FrameContext<'_>) -> bool {
    !node.frustum_culled || frame.frustum.intersects_sphere(&local.transformed(world))
}

fn push_vertex(data: &mut RenderData, position: Vec3, model: &Mat4, view_projection: &Mat4) {
    let (_, vertex) = data.vertices.next();
    vertex.position = position;
    vertex.position_world = *model * position;
    let clip = *view_projection * Vec4::from(vertex.position_world);
    vertex.position_screen = clip.scale(1.0 / clip.w);
    vertex.visible = in_clip_cube(&vertex.position_screen);
}

/// Blends `base` toward each morph target by its influence.
fn morph(base: Vec3, influences: &[f32], target_at: impl Fn(usize) -> Option<Vec3>) -> Vec3 {
    let mut p = base;
    for (t, &influence) in influences.iter().enumerate() {
        if influence == 0.0 {
            continue;
        }
        if let Some(target) = target_at(t) {
            p += (target - base) * influence;
        }
    }
    p
}

fn project_mesh(data: &mut RenderData, state: &ObjectState<'_>, mesh: &Mesh, frame: &FrameContext<'_>) {
    data.vertices.reset();
    let morphing = mesh
        .material
        .single()
        .is_some_and(|m| m.morph_targets)
        && !mesh.morph_influences.is_empty();

    match &*mesh.geometry {
        Geometry::Buffer(geometry) => {
            project_buffer_mesh(data, state, mesh, geometry, morphing, frame)
        }
        Geometry::Legacy(geometry) => {
            project_legacy_mesh(data, state, mesh, geometry, morphing, frame)
        }
    }
}

fn project_buffer_mesh(
    data: &mut RenderData,
    state: &ObjectState<'_>,
    mesh: &Mesh,
    geometry: &BufferGeometry,
    morphing: bool,
    frame: &FrameContext<'_>,
) {
    let Some(positions) = geometry.position.as_deref() else {
        log::trace!("mesh {:?} has no position attribute", state.node.name);
        return;
    };

    for (v, chunk) in positions.chunks_exact(3).enumerate() {
        let base = Vec3::new(chunk[0], chunk[1], chunk[2]);
        let p = if morphing {
            morph(base, &mesh.morph_influences, |t| {
                geometry
                    .morph_positions
                    .get(t)
                    .and_then(|target| Vec3::from_slice(target, v * 3))
            })
        } else {
            base
        };
        push_vertex(data, p, &state.model, &frame.view_projection);
    }

    let triangle = |data: &mut RenderData, a: usize, b: usize, c: usize, material: &Rc<Material>| {
        push_buffer_triangle(data, state, geometry, [a, b, c], material);
    };

    let vertex_count = data.vertices.len();
    match (geometry.index.as_deref(), geometry.groups.is_empty()) {
        (Some(index), false) => {
            for group in &geometry.groups {
                let Some(material) = mesh.material.resolve(group.material_index) else {
                    continue;
                };
                let end = (group.start + group.count).min(index.len());
                for i in (group.start..end).step_by(3).filter(|i| i + 2 < end) {
                    triangle(data, index[i] as usize, index[i + 1] as usize, index[i + 2] as usize, material);
                }
            }
        }
        (Some(index), true) => {
            let Some(material) = mesh.material.resolve(0) else {
                return;
            };
            for tri in index.chunks_exact(3) {
                triangle(data, tri[0] as usize, tri[1] as usize, tri[2] as usize, material);
            }
        }
        (None, false) => {
            for group in &geometry.groups {
                let Some(material) = mesh.material.resolve(group.material_index) else {
                    continue;
                };
                let end = (group.start + group.count).min(vertex_count);
                for i in (group.start..end).step_by(3).filter(|i| i + 2 < end) {
                    triangle(data, i, i + 1, i + 2, material);
                }
            }
        }
        (None, true) => {
            let Some(material) = mesh.material.resolve(0) else {
                return;
            };
            for i in (0..vertex_count).step_by(3).filter(|i| i + 2 < vertex_count) {
                triangle(data, i, i + 1, i + 2, material);
            }
        }
    }
}

/// Runs the visibility and orientation tests on three pooled vertices and
/// claims a face for them if they pass.
///
/// Returns the face's index and whether it is seen from behind.
fn emit_face(
    data: &mut RenderData,
    state: &ObjectState<'_>,
    corners: [usize; 3],
    material: &Rc<Material>,
) -> Option<(usize, bool)> {
    let vertices = data.vertices.active();
    let (Some(&v1), Some(&v2), Some(&v3)) = (
        vertices.get(corners[0]),
        vertices.get(corners[1]),
        vertices.get(corners[2]),
    ) else {
        return None;
    };

    let (s1, s2, s3) = (&v1.position_screen, &v2.position_screen, &v3.position_screen);
    if !triangle_may_be_visible([v1.visible, v2.visible, v3.visible], s1, s2, s3) {
        return None;
    }

    let front = is_front_facing(s1, s2, s3);
    let keep = match material.side {
        Side::Double => true,
        Side::Front => front,
        Side::Back => !front,
    };
    if !keep {
        return None;
    }

    let z = (s1.z + s2.z + s3.z) / 3.0;
    let (index, face) = data.faces.next();
    face.id = state.id();
    face.v1 = v1;
    face.v2 = v2;
    face.v3 = v3;
    face.material = Some(Rc::clone(material));
    face.z = z;
    face.render_order = state.render_order();

    data.elements.push(RenderElement {
        kind: ElementKind::Face(index),
        key: state.key(z),
    });
    Some((index, !front))
}

fn orient(normal: Vec3, back_facing: bool) -> Vec3 {
    if back_facing {
        -normal
    } else {
        normal
    }
}

fn push_buffer_triangle(
    data: &mut RenderData,
    state: &ObjectState<'_>,
    geometry: &BufferGeometry,
    corners: [usize; 3],
    material: &Rc<Material>,
) {
    let Some((index, back_facing)) = emit_face(data, state, corners, material) else {
        return;
    };
    let Some(face) = data.faces.get_mut(index) else {
        return;
    };

    let normal = (face.v3.position - face.v2.position).cross(face.v1.position - face.v2.position);
    face.normal_model = orient((state.normal_matrix * normal).normalize(), back_facing);

    if let Some(normals) = geometry.normal.as_deref() {
        for (slot, &corner) in face.vertex_normals_model.iter_mut().zip(&corners) {
            if let Some(n) = Vec3::from_slice(normals, corner * 3) {
                *slot = orient((state.normal_matrix * n).normalize(), back_facing);
            }
        }
        face.vertex_normals_len = 3;
    }

    if let Some(uvs) = geometry.uv.as_deref() {
        for (slot, &corner) in face.uvs.iter_mut().zip(&corners) {
            if let Some(uv) = Vec2::from_slice(uvs, corner * 2) {
                *slot = uv;
            }
        }
    }

    if material.vertex_colors.enabled() {
        if let Some(color) = geometry
            .color
            .as_deref()
            .and_then(|colors| Color::from_slice(colors, corners[0] * 3))
        {
            face.color = color;
        }
    }
}

fn project_legacy_mesh(
    data: &mut RenderData,
    state: &ObjectState<'_>,
    mesh: &Mesh,
    geometry: &LegacyGeometry,
    morphing: bool,
    frame: &FrameContext<'_>,
) {
    if geometry.vertices.is_empty() {
        log::trace!("mesh {:?} has no vertices", state.node.name);
        return;
    }

    for (v, &base) in geometry.vertices.iter().enumerate() {
        let p = if morphing {
            morph(base, &mesh.morph_influences, |t| {
                geometry.morph_targets.get(t).and_then(|target| target.get(v).copied())
            })
        } else {
            base
        };
        push_vertex(data, p, &state.model, &frame.view_projection);
    }

    for (f, source) in geometry.faces.iter().enumerate() {
        let Some(material) = mesh.material.resolve(source.material_index) else {
            continue;
        };
        let Some((index, back_facing)) =
            emit_face(data, state, [source.a, source.b, source.c], material)
        else {
            continue;
        };
        let Some(face) = data.faces.get_mut(index) else {
            continue;
        };

        face.normal_model = orient((state.normal_matrix * source.normal).normalize(), back_facing);

        let count = source.vertex_normals.len().min(3);
        for (slot, &n) in face
            .vertex_normals_model
            .iter_mut()
            .zip(source.vertex_normals.iter().take(count))
        {
            *slot = orient((state.normal_matrix * n).normalize(), back_facing);
        }
        face.vertex_normals_len = count;

        if let Some(uvs) = geometry.face_vertex_uvs.get(f) {
            face.uvs = *uvs;
        }

        face.color = source.color;
    }
}

fn project_line(data: &mut RenderData, state: &ObjectState<'_>, line: &Line, frame: &FrameContext<'_>) {
    data.vertices.reset();
    let mvp = frame.view_projection * state.model;
    let step = line.mode.step();

    match &*line.geometry {
        Geometry::Buffer(geometry) => {
            let Some(positions) = geometry.position.as_deref() else {
                log::trace!("line {:?} has no position attribute", state.node.name);
                return;
            };
            for chunk in positions.chunks_exact(3) {
                push_vertex(data, Vec3::new(chunk[0], chunk[1], chunk[2]), &state.model, &frame.view_projection);
            }
            let colors = geometry.color.as_deref();
            let color_at = |i: usize| colors.and_then(|c| Color::from_slice(c, i * 3));

            if let Some(index) = geometry.index.as_deref() {
                for pair in index.chunks_exact(2) {
                    emit_line(data, state, &mvp, [pair[0] as usize, pair[1] as usize], &line.material, &color_at);
                }
            } else {
                let last = data.vertices.len().saturating_sub(1);
                for i in (0..last).step_by(step) {
                    emit_line(data, state, &mvp, [i, i + 1], &line.material, &color_at);
                }
            }
        }
        Geometry::Legacy(geometry) => {
            for &p in &geometry.vertices {
                push_vertex(data, p, &state.model, &frame.view_projection);
            }
            let color_at = |i: usize| geometry.colors.get(i).copied();
            let last = data.vertices.len().saturating_sub(1);
            for i in (0..last).step_by(step) {
                emit_line(data, state, &mvp, [i, i + 1], &line.material, &color_at);
            }
        }
    }
}

fn emit_line(
    data: &mut RenderData,
    state: &ObjectState<'_>,
    mvp: &Mat4,
    ends: [usize; 2],
    material: &Rc<Material>,
    color_at: impl Fn(usize) -> Option<Color>,
) {
    let vertices = data.vertices.active();
    let (Some(&v1), Some(&v2)) = (vertices.get(ends[0]), vertices.get(ends[1])) else {
        return;
    };

    let mut s1 = *mvp * Vec4::from(v1.position);
    let mut s2 = *mvp * Vec4::from(v2.position);
    if !clip_line(&mut s1, &mut s2) {
        return;
    }
    let s1 = s1.scale(1.0 / s1.w);
    let s2 = s2.scale(1.0 / s2.w);
    let z = s1.z.max(s2.z);

    let (index, renderable) = data.lines.next();
    renderable.id = state.id();
    renderable.v1 = RenderableVertex {
        position_screen: s1,
        ..v1
    };
    renderable.v2 = RenderableVertex {
        position_screen: s2,
        ..v2
    };
    renderable.z = z;
    renderable.render_order = state.render_order();
    renderable.material = Some(Rc::clone(material));

    if material.vertex_colors == VertexColors::Vertex {
        for (slot, &end) in renderable.vertex_colors.iter_mut().zip(&ends) {
            if let Some(color) = color_at(end) {
                *slot = color;
            }
        }
    }

    data.elements.push(RenderElement {
        kind: ElementKind::Line(index),
        key: state.key(z),
    });
}

fn project_points(data: &mut RenderData, state: &ObjectState<'_>, points: &Points, frame: &FrameContext<'_>) {
    let mvp = frame.view_projection * state.model;
    match &*points.geometry {
        Geometry::Buffer(geometry) => {
            for p in geometry.positions() {
                push_point(data, state, mvp * Vec4::from(p), &points.material, &frame.projection);
            }
        }
        Geometry::Legacy(geometry) => {
            for &p in &geometry.vertices {
                push_point(data, state, mvp * Vec4::from(p), &points.material, &frame.projection);
            }
        }
    }
}

fn project_sprite(data: &mut RenderData, state: &ObjectState<'_>, sprite: &Sprite, frame: &FrameContext<'_>) {
    let clip = frame.view_projection * Vec4::from(state.model.position());
    push_point(data, state, clip, &sprite.material, &frame.projection);
}

/// Emits a sprite for a clip-space point that lies between the near and far
/// planes.
///
/// The on-screen size is estimated from the projection matrix terms of the
/// x and y axes, scaled by the node's local scale. It is a fast
/// approximation, not exact billboard math.
fn push_point(
    data: &mut RenderData,
    state: &ObjectState<'_>,
    clip: Vec4,
    material: &Rc<Material>,
    projection: &Mat4,
) {
    let inv_w = 1.0 / clip.w;
    let z = clip.z * inv_w;
    if !(-1.0..=1.0).contains(&z) {
        return;
    }

    let scale = state.node.transform.scale();
    let (index, sprite) = data.sprites.next();
    sprite.id = state.id();
    sprite.x = clip.x * inv_w;
    sprite.y = clip.y * inv_w;
    sprite.z = z;
    sprite.render_order = state.render_order();
    sprite.rotation = state.node.transform.rotation().z;
    sprite.scale = Vec2::new(
        scale.x * (sprite.x - (clip.x + projection.get(0, 0)) / (clip.w + projection.get(0, 3))).abs(),
        scale.y * (sprite.y - (clip.y + projection.get(1, 1)) / (clip.w + projection.get(1, 3))).abs(),
    );
    sprite.material = Some(Rc::clone(material));

    data.elements.push(RenderElement {
        kind: ElementKind::Sprite(index),
        key: state.key(z),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Face3, LineMode, MaterialSlot};
    use approx::assert_relative_eq;

    fn camera() -> Camera {
        let mut camera = Camera::orthographic(10.0, 10.0, 0.1, 100.0);
        camera.transform.set_position_xyz(0.0, 0.0, 10.0);
        camera
    }

    fn triangle(material: Material) -> Node {
        let geometry = BufferGeometry::new().with_positions(vec![
            -1.0, -1.0, 0.0, //
            1.0, -1.0, 0.0, //
            0.0, 1.0, 0.0,
        ]);
        Node::mesh(Rc::new(geometry.into()), material)
    }

    fn reversed_triangle(material: Material) -> Node {
        let geometry = BufferGeometry::new().with_positions(vec![
            -1.0, -1.0, 0.0, //
            0.0, 1.0, 0.0, //
            1.0, -1.0, 0.0,
        ]);
        Node::mesh(Rc::new(geometry.into()), material)
    }

    fn project(scene: &Scene) -> (usize, usize, usize) {
        let mut projector = Projector::new();
        let data = projector.project_scene(scene, &camera(), true, true);
        (data.faces().len(), data.lines().len(), data.sprites().len())
    }

    #[test]
    fn front_facing_triangle_is_emitted() {
        let mut scene = Scene::new();
        scene.add(triangle(Material::basic(Color::WHITE)));
        assert_eq!(project(&scene), (1, 0, 0));
    }

    #[test]
    fn side_decides_which_winding_survives() {
        for (side, front, back) in [
            (Side::Front, 1, 0),
            (Side::Back, 0, 1),
            (Side::Double, 1, 1),
        ] {
            let mut scene = Scene::new();
            scene.add(triangle(Material::basic(Color::WHITE).with_side(side)));
            assert_eq!(project(&scene).0, front, "{side:?} front");

            let mut scene = Scene::new();
            scene.add(reversed_triangle(Material::basic(Color::WHITE).with_side(side)));
            assert_eq!(project(&scene).0, back, "{side:?} back");
        }
    }

    #[test]
    fn back_faces_of_double_sided_meshes_get_flipped_normals() {
        let mut scene = Scene::new();
        scene.add(reversed_triangle(Material::basic(Color::WHITE).with_side(Side::Double)));
        let mut projector = Projector::new();
        let data = projector.project_scene(&scene, &camera(), true, true);
        assert_relative_eq!(data.faces()[0].normal_model.z, 1.0);
    }

    #[test]
    fn missing_positions_skip_the_object() {
        let mut scene = Scene::new();
        scene.add(Node::mesh(
            Rc::new(BufferGeometry::new().into()),
            Material::basic(Color::WHITE),
        ));
        let mut projector = Projector::new();
        let data = projector.project_scene(&scene, &camera(), true, true);
        assert_eq!(data.objects().len(), 1);
        assert!(data.elements().is_empty());
    }

    #[test]
    fn invisible_material_culls_the_node_but_not_its_children() {
        let mut hidden = Material::basic(Color::WHITE);
        hidden.visible = false;
        let parent = triangle(hidden).with_child(triangle(Material::basic(Color::WHITE)));
        let mut scene = Scene::new();
        scene.add(parent);
        assert_eq!(project(&scene).0, 1);
    }

    #[test]
    fn invisible_node_hides_its_subtree() {
        let mut parent = triangle(Material::basic(Color::WHITE));
        parent.visible = false;
        let parent = parent.with_child(triangle(Material::basic(Color::WHITE)));
        let mut scene = Scene::new();
        scene.add(parent);
        assert_eq!(project(&scene).0, 0);
    }

    #[test]
    fn frustum_culling_can_be_disabled() {
        let mut far_left = triangle(Material::basic(Color::WHITE));
        far_left.transform.set_position_xyz(-100.0, 0.0, 0.0);
        let mut scene = Scene::new();
        scene.add(far_left);

        let mut projector = Projector::new();
        assert!(projector.project_scene(&scene, &camera(), true, true).objects().is_empty());

        scene.root.children[0].frustum_culled = false;
        let data = projector.project_scene(&scene, &camera(), true, true);
        assert_eq!(data.objects().len(), 1);
        // Off-screen, so no face survives the triangle visibility test.
        assert!(data.faces().is_empty());
    }

    #[test]
    fn points_children_are_not_visited() {
        let points = Node::points(
            Rc::new(BufferGeometry::new().with_positions(vec![0.0, 0.0, 0.0]).into()),
            Material::points(Color::WHITE, 1.0).shared(),
        )
        .with_child(triangle(Material::basic(Color::WHITE)));
        let mut scene = Scene::new();
        scene.add(points);
        assert_eq!(project(&scene), (0, 0, 1));
    }

    #[test]
    fn lights_are_collected_with_world_position() {
        let mut light = Node::light(crate::light::Light::point(Color::WHITE, 1.0, 0.0));
        light.transform.set_position_xyz(1.0, 2.0, 3.0);
        let mut group = Node::group();
        group.transform.set_position_xyz(1.0, 0.0, 0.0);
        let mut scene = Scene::new();
        scene.add(group.with_child(light));

        let mut projector = Projector::new();
        let data = projector.project_scene(&scene, &camera(), true, true);
        assert_eq!(data.lights().len(), 1);
        assert_eq!(data.lights()[0].position, Vec3::new(2.0, 2.0, 3.0));
    }

    #[test]
    fn multi_material_groups_pick_their_material() {
        let red = Material::basic(Color::from_hex(0xff0000)).shared();
        let blue = Material::basic(Color::from_hex(0x0000ff)).shared();
        let mut geometry = BufferGeometry::new()
            .with_positions(vec![
                -1.0, -1.0, 0.0, 1.0, -1.0, 0.0, 0.0, 1.0, 0.0, //
                -1.0, -1.0, 1.0, 1.0, -1.0, 1.0, 0.0, 1.0, 1.0,
            ])
            .with_index(vec![0, 1, 2, 3, 4, 5]);
        geometry.add_group(0, 3, 1);
        geometry.add_group(3, 3, 7);
        let slot = MaterialSlot::from(vec![red, blue.clone()]);

        let mut scene = Scene::new();
        scene.add(Node::mesh(Rc::new(geometry.into()), slot));
        let mut projector = Projector::new();
        let data = projector.project_scene(&scene, &camera(), true, true);

        assert_eq!(data.faces().len(), 1);
        assert!(Rc::ptr_eq(data.faces()[0].material.as_ref().unwrap(), &blue));
    }

    #[test]
    fn legacy_faces_carry_color_and_material_index() {
        let mut geometry = LegacyGeometry::new(
            vec![
                Vec3::new(-1.0, -1.0, 0.0),
                Vec3::new(1.0, -1.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            vec![Face3::new(0, 1, 2).with_color(Color::from_hex(0x00ff00))],
        );
        geometry.compute_face_normals();
        let mut scene = Scene::new();
        scene.add(Node::mesh(Rc::new(geometry.into()), Material::basic(Color::WHITE)));

        let mut projector = Projector::new();
        let data = projector.project_scene(&scene, &camera(), true, true);
        let face = &data.faces()[0];
        assert_eq!(face.color, Color::from_hex(0x00ff00));
        assert_relative_eq!(face.normal_model.z, 1.0);
        assert_eq!(face.vertex_normals_len, 0);
    }

    #[test]
    fn morph_targets_move_vertices() {
        let mut geometry = BufferGeometry::new().with_positions(vec![
            -1.0, -1.0, 0.0, 1.0, -1.0, 0.0, 0.0, 1.0, 0.0,
        ]);
        geometry.add_morph_target(vec![-1.0, -1.0, 0.0, 1.0, -1.0, 0.0, 0.0, 3.0, 0.0]);
        let mut node = Node::mesh(
            Rc::new(geometry.into()),
            Material::basic(Color::WHITE).with_morph_targets(),
        );
        if let NodeKind::Mesh(mesh) = &mut node.kind {
            mesh.morph_influences = vec![0.5];
        }
        let mut scene = Scene::new();
        scene.add(node);

        let mut projector = Projector::new();
        let data = projector.project_scene(&scene, &camera(), true, true);
        assert_relative_eq!(data.faces()[0].v3.position.y, 2.0);
    }

    #[test]
    fn line_segments_pair_vertices() {
        let geometry = Rc::new(Geometry::from(BufferGeometry::new().with_positions(vec![
            0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 1.0, 1.0, 0.0, 0.0, 1.0, 0.0,
        ])));
        let material = Material::line_basic(Color::WHITE, 1.0).shared();

        let mut scene = Scene::new();
        scene.add(Node::line(geometry.clone(), material.clone(), LineMode::Strip));
        assert_eq!(project(&scene).1, 3);

        let mut scene = Scene::new();
        scene.add(Node::line(geometry, material, LineMode::Segments));
        assert_eq!(project(&scene).1, 2);
    }

    #[test]
    fn line_vertex_colors_only_with_vertex_mode() {
        let geometry = Rc::new(Geometry::from(
            BufferGeometry::new()
                .with_positions(vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0])
                .with_colors(vec![1.0, 0.0, 0.0, 0.0, 0.0, 1.0]),
        ));
        let plain = Material::line_basic(Color::WHITE, 1.0).shared();
        let colored = Material::line_basic(Color::WHITE, 1.0)
            .with_vertex_colors(VertexColors::Vertex)
            .shared();

        let mut scene = Scene::new();
        scene.add(Node::line(geometry.clone(), plain, LineMode::Strip));
        scene.add(Node::line(geometry, colored, LineMode::Strip));
        let mut projector = Projector::new();
        let data = projector.project_scene(&scene, &camera(), false, false);

        assert_eq!(data.lines()[0].vertex_colors, [Color::WHITE; 2]);
        assert_eq!(
            data.lines()[1].vertex_colors,
            [Color::new(1.0, 0.0, 0.0), Color::new(0.0, 0.0, 1.0)]
        );
    }

    #[test]
    fn sprite_scale_matches_orthographic_extent() {
        let mut sprite = Node::sprite(Material::sprite(Color::WHITE).shared());
        sprite.transform.set_scale_uniform(2.0);
        let mut scene = Scene::new();
        scene.add(sprite);

        let mut projector = Projector::new();
        let data = projector.project_scene(&scene, &camera(), true, true);
        let sprite = &data.sprites()[0];
        // Ortho width 10 maps one world unit to 0.2 NDC units.
        assert_relative_eq!(sprite.scale.x, 0.4, epsilon = 1e-5);
        assert_relative_eq!(sprite.scale.y, 0.4, epsilon = 1e-5);
    }

    #[test]
    fn points_outside_depth_range_are_dropped() {
        let geometry = BufferGeometry::new().with_positions(vec![
            0.0, 0.0, 0.0, //
            0.0, 0.0, 50.0,
        ]);
        let mut node = Node::points(Rc::new(geometry.into()), Material::points(Color::WHITE, 1.0).shared());
        node.frustum_culled = false;
        let mut scene = Scene::new();
        scene.add(node);
        assert_eq!(project(&scene).2, 1);
    }

    #[test]
    fn elements_sort_far_to_near() {
        let mut near = triangle(Material::basic(Color::WHITE));
        near.transform.set_position_xyz(0.0, 0.0, 2.0);
        let far = triangle(Material::basic(Color::WHITE));
        let mut scene = Scene::new();
        scene.add(near);
        scene.add(far);

        let mut projector = Projector::new();
        let data = projector.project_scene(&scene, &camera(), true, true);
        let depths: Vec<f32> = data.elements().iter().map(|e| e.key.z).collect();
        assert_eq!(depths.len(), 2);
        assert!(depths[0] > depths[1]);
    }

    #[test]
    fn pools_are_reused_across_frames() {
        let mut scene = Scene::new();
        scene.add(triangle(Material::basic(Color::WHITE)));
        let mut projector = Projector::new();
        projector.project_scene(&scene, &camera(), true, true);
        let first = projector.render_data().pool_capacities();
        projector.project_scene(&scene, &camera(), true, true);
        assert_eq!(projector.render_data().pool_capacities(), first);
        assert_eq!(projector.render_data().faces().len(), 1);
    }

    #[test]
    fn drawable_buffer_is_kept_between_frames() {
        let mut scene = Scene::new();
        scene
            .add(triangle(Material::basic(Color::WHITE)))
            .add(triangle(Material::basic(Color::WHITE)));
        let mut projector = Projector::new();
        projector.project_scene(&scene, &camera(), true, true);
        assert!(projector.drawables.is_empty());
        let capacity = projector.drawables.capacity();
        assert!(capacity >= 2);

        projector.project_scene(&scene, &camera(), true, true);
        assert_eq!(projector.drawables.capacity(), capacity);
        assert_eq!(projector.render_data().faces().len(), 2);
    }

    #[test]
    fn singular_camera_projects_nothing() {
        let mut scene = Scene::new();
        scene.add(triangle(Material::basic(Color::WHITE)));
        let mut camera = camera();
        camera.transform.set_scale_uniform(0.0);
        let mut projector = Projector::new();
        assert!(projector.project_scene(&scene, &camera, true, true).elements().is_empty());
    }
}

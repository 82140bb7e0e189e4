//! Turns projected scenes into styled 2D paths.
//!
//! The [`VectorRenderer`] owns a [`Projector`] and, per frame:
//!
//! 1. projects the scene,
//! 2. sums the lights,
//! 3. walks the sorted elements, scaling them from normalized device
//!    coordinates to a surface centered on the origin (y up becomes y down),
//!    rejecting what falls outside the surface, and computing a color,
//! 4. appends embedded vector nodes at their projected origin.
//!
//! Consecutive primitives that share one style object end up in one path.
//! Styles that depend only on the material (sprites, lines, unlit faces
//! without vertex colors) are built once per material per frame, so runs of
//! such primitives merge; shaded faces get their own style every time.

use std::collections::HashMap;
use std::rc::Rc;

use crate::camera::Camera;
use crate::clipper::Box2;
use crate::color::Color;
use crate::light::LightRecord;
use crate::lighting::LightAccumulator;
use crate::math::{Mat3, Vec2};
use crate::projector::{ElementRef, Projector, RenderData, RenderableFace, RenderableLine, RenderableSprite};
use crate::render::config::{Quality, RenderConfig};
use crate::render::path::{CoordFormat, PathBatcher, PathDescriptor, PathStyle};
use crate::scene::{Material, MaterialKind, NodeKind, Scene};

/// Counters of the last frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderInfo {
    pub vertices: usize,
    pub faces: usize,
}

/// The drawing surface: size and background.
#[derive(Debug, Clone, PartialEq)]
pub struct Surface {
    pub width: f32,
    pub height: f32,
    /// Background color, if one has been applied.
    pub background: Option<String>,
    pub background_opacity: Option<f32>,
}

impl Surface {
    /// `"-w/2 -h/2 w h"`: the origin sits at the center.
    pub fn view_box(&self) -> String {
        let f = CoordFormat::default();
        format!(
            "{} {} {} {}",
            f.format(-self.width / 2.0),
            f.format(-self.height / 2.0),
            f.format(self.width),
            f.format(self.height)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum StyleRole {
    Face,
    Line,
    Sprite,
}

/// Material-derived styles of the current frame.
#[derive(Debug, Default)]
struct StyleCache {
    styles: HashMap<(*const Material, StyleRole), Rc<PathStyle>>,
}

impl StyleCache {
    fn clear(&mut self) {
        self.styles.clear();
    }

    fn get_or_build(
        &mut self,
        material: &Rc<Material>,
        role: StyleRole,
        build: impl FnOnce() -> PathStyle,
    ) -> Rc<PathStyle> {
        Rc::clone(
            self.styles
                .entry((Rc::as_ptr(material), role))
                .or_insert_with(|| Rc::new(build())),
        )
    }
}

#[derive(Debug)]
pub struct VectorRenderer {
    config: RenderConfig,
    projector: Projector,
    lighting: LightAccumulator,
    surface: Surface,
    clip_box: Box2,
    info: RenderInfo,
    paths: Vec<PathDescriptor>,
    batcher: PathBatcher,
    styles: StyleCache,
    scratch: String,
}

impl VectorRenderer {
    pub fn new(width: f32, height: f32) -> Self {
        Self::with_config(width, height, RenderConfig::default())
    }

    pub fn with_config(width: f32, height: f32, config: RenderConfig) -> Self {
        let mut renderer = Self {
            config,
            projector: Projector::new(),
            lighting: LightAccumulator::new(),
            surface: Surface {
                width,
                height,
                background: None,
                background_opacity: None,
            },
            clip_box: Box2::new(Vec2::ZERO, Vec2::ZERO),
            info: RenderInfo::default(),
            paths: Vec::new(),
            batcher: PathBatcher::new(),
            styles: StyleCache::default(),
            scratch: String::new(),
        };
        renderer.set_size(width, height);
        renderer
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut RenderConfig {
        &mut self.config
    }

    pub fn set_quality(&mut self, quality: Quality) {
        self.config.quality = quality;
    }

    /// Clear color applied when the scene has no background. `alpha`
    /// defaults to opaque.
    pub fn set_clear_color(&mut self, color: Color, alpha: Option<f32>) {
        self.config.clear_color = color;
        self.config.clear_alpha = alpha.unwrap_or(1.0);
    }

    pub fn set_precision(&mut self, precision: Option<usize>) {
        self.config.precision = precision;
    }

    pub fn set_size(&mut self, width: f32, height: f32) {
        self.surface.width = width;
        self.surface.height = height;
        let (half_width, half_height) = (width / 2.0, height / 2.0);
        self.clip_box = Box2::new(
            Vec2::new(-half_width, -half_height),
            Vec2::new(half_width, half_height),
        );
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn info(&self) -> RenderInfo {
        self.info
    }

    /// Paths of the last frame.
    pub fn paths(&self) -> &[PathDescriptor] {
        &self.paths
    }

    pub fn lighting(&self) -> &LightAccumulator {
        &self.lighting
    }

    pub fn render_data(&self) -> &RenderData {
        self.projector.render_data()
    }

    /// Drops all output and applies the clear color.
    pub fn clear(&mut self) {
        self.paths.clear();
        self.surface.background = Some(self.config.clear_color.to_svg());
        self.surface.background_opacity =
            (self.config.clear_alpha != 1.0).then_some(self.config.clear_alpha);
    }

    /// The last frame as an SVG document.
    pub fn to_svg(&self) -> String {
        crate::svg::write_document(&self.surface, &self.paths, self.config.quality)
    }

    /// Renders `scene` from `camera` and returns the paths, back to front.
    ///
    /// An unusable camera is logged and changes nothing: the previous
    /// frame's paths are returned as they were.
    pub fn render(&mut self, scene: &Scene, camera: &Camera) -> &[PathDescriptor] {
        let views = camera
            .validate()
            .and_then(|()| Ok((camera.view_matrix()?, camera.normal_view_matrix()?)));
        let (view, normal_view) = match views {
            Ok(views) => views,
            Err(err) => {
                log::error!("cannot render with this camera: {err}");
                return &self.paths;
            }
        };

        if let Some(background) = scene.background {
            self.paths.clear();
            self.surface.background = Some(background.to_svg());
            self.surface.background_opacity = None;
        } else if self.config.auto_clear {
            self.clear();
        }

        self.info = RenderInfo::default();
        self.styles.clear();

        let view_projection = camera.projection_matrix() * view;
        let format = CoordFormat {
            precision: self.config.precision,
        };
        let (half_width, half_height) = (self.surface.width / 2.0, self.surface.height / 2.0);

        let Self {
            config,
            projector,
            lighting,
            clip_box,
            info,
            paths,
            batcher,
            styles,
            scratch,
            ..
        } = &mut *self;

        let data = projector.project_scene(scene, camera, config.sort_objects, config.sort_elements);
        lighting.calculate_lights(data.lights());

        let mut frame = FrameWriter {
            format,
            half_width,
            half_height,
            clip_box: *clip_box,
            ambient: lighting.ambient(),
            lights: data.lights(),
            normal_view,
            info: &mut *info,
            paths: &mut *paths,
            batcher: &mut *batcher,
            styles: &mut *styles,
            scratch: &mut *scratch,
        };
        for element in data.iter_elements() {
            match element {
                ElementRef::Sprite(sprite) => frame.sprite(sprite),
                ElementRef::Line(line) => frame.line(line),
                ElementRef::Face(face) => frame.face(face),
            }
        }
        frame.batcher.flush(frame.paths);

        let path_count = paths.len();
        scene.traverse_visible(|node, world| {
            let NodeKind::Vector(vector) = &node.kind else {
                return;
            };
            let p = view_projection * world.position();
            if !(-1.0..=1.0).contains(&p.z) {
                return;
            }
            let (x, y) = (p.x * half_width, -p.y * half_height);
            paths.push(PathDescriptor {
                commands: vector.commands.clone(),
                style: Rc::clone(&vector.style),
                transform: Some(format!("translate({},{})", format.format(x), format.format(y))),
            });
        });

        log::debug!(
            "rendered {} faces into {} paths ({} vector nodes)",
            info.faces,
            paths.len(),
            paths.len() - path_count
        );

        &self.paths
    }
}

/// Borrowed renderer state while one frame's elements are written.
struct FrameWriter<'r> {
    format: CoordFormat,
    half_width: f32,
    half_height: f32,
    clip_box: Box2,
    ambient: Color,
    lights: &'r [LightRecord],
    normal_view: Mat3,
    info: &'r mut RenderInfo,
    paths: &'r mut Vec<PathDescriptor>,
    batcher: &'r mut PathBatcher,
    styles: &'r mut StyleCache,
    scratch: &'r mut String,
}

fn drawable_material(material: &Option<Rc<Material>>) -> Option<&Rc<Material>> {
    material.as_ref().filter(|m| m.opacity != 0.0)
}

impl FrameWriter<'_> {
    fn to_surface(&self, x: f32, y: f32) -> Vec2 {
        Vec2::new(x * self.half_width, -y * self.half_height)
    }

    fn emit(&mut self, style: &Rc<PathStyle>) {
        self.batcher.add_path(style, self.scratch, self.paths);
    }

    fn sprite(&mut self, sprite: &RenderableSprite) {
        let Some(material) = drawable_material(&sprite.material) else {
            return;
        };
        let size = match material.kind {
            MaterialKind::Sprite => 1.0,
            MaterialKind::Points { size } => size,
            _ => {
                log::trace!("sprite with a {:?} material skipped", material.kind);
                return;
            }
        };

        let p = self.to_surface(sprite.x, sprite.y);
        let sx = sprite.scale.x * self.half_width * size;
        let sy = sprite.scale.y * self.half_height * size;

        self.scratch.clear();
        self.scratch.push('M');
        self.format.write_pair(self.scratch, p.x - sx * 0.5, p.y - sy * 0.5);
        self.scratch.push('h');
        self.format.write(self.scratch, sx);
        self.scratch.push('v');
        self.format.write(self.scratch, sy);
        self.scratch.push('h');
        self.format.write(self.scratch, -sx);
        self.scratch.push('z');

        let style = self.styles.get_or_build(material, StyleRole::Sprite, || {
            PathStyle::filled(material.color, material.opacity)
        });
        self.emit(&style);
    }

    fn line(&mut self, line: &RenderableLine) {
        let Some(material) = drawable_material(&line.material) else {
            return;
        };
        let style = match material.kind {
            MaterialKind::LineBasic { linewidth } => {
                self.styles.get_or_build(material, StyleRole::Line, || {
                    PathStyle::stroked(material.color, material.opacity, linewidth)
                })
            }
            MaterialKind::LineDashed {
                linewidth,
                dash_size,
                gap_size,
            } => self.styles.get_or_build(material, StyleRole::Line, || {
                PathStyle::stroked(material.color, material.opacity, linewidth)
                    .with_dasharray(dash_size, gap_size)
            }),
            _ => {
                log::trace!("line with a {:?} material skipped", material.kind);
                return;
            }
        };

        let a = self.to_surface(line.v1.position_screen.x, line.v1.position_screen.y);
        let b = self.to_surface(line.v2.position_screen.x, line.v2.position_screen.y);
        if !self.clip_box.intersects(&Box2::from_points(&[a, b])) {
            return;
        }

        self.scratch.clear();
        self.scratch.push('M');
        self.format.write_pair(self.scratch, a.x, a.y);
        self.scratch.push('L');
        self.format.write_pair(self.scratch, b.x, b.y);
        self.emit(&style);
    }

    fn face(&mut self, face: &RenderableFace) {
        let Some(material) = drawable_material(&face.material) else {
            return;
        };
        let corners = [&face.v1, &face.v2, &face.v3];
        if corners
            .iter()
            .any(|v| !(-1.0..=1.0).contains(&v.position_screen.z))
        {
            return;
        }

        let points = corners.map(|v| self.to_surface(v.position_screen.x, v.position_screen.y));
        if !self.clip_box.intersects(&Box2::from_points(&points)) {
            return;
        }

        self.info.vertices += 3;
        self.info.faces += 1;

        self.scratch.clear();
        for (i, p) in points.iter().enumerate() {
            self.scratch.push(if i == 0 { 'M' } else { 'L' });
            self.format.write_pair(self.scratch, p.x, p.y);
        }
        self.scratch.push('z');

        let style = self.face_style(face, material);
        self.emit(&style);
    }

    fn face_style(&mut self, face: &RenderableFace, material: &Rc<Material>) -> Rc<PathStyle> {
        match material.kind {
            MaterialKind::Lambert { emissive }
            | MaterialKind::Phong { emissive }
            | MaterialKind::Standard { emissive } => {
                let mut diffuse = material.color;
                if material.vertex_colors.enabled() {
                    diffuse = diffuse.multiply(face.color);
                }
                let centroid =
                    (face.v1.position_world + face.v2.position_world + face.v3.position_world) / 3.0;
                let mut color = self.ambient;
                LightAccumulator::calculate_light(self.lights, centroid, face.normal_model, &mut color);
                Rc::new(face_paint(material, color.multiply(diffuse) + emissive))
            }
            MaterialKind::Normal => {
                let n = (self.normal_view * face.normal_model).normalize();
                let color = (Color::new(n.x, n.y, n.z) * 0.5).add_scalar(0.5);
                Rc::new(face_paint(material, color))
            }
            _ if material.vertex_colors.enabled() => {
                Rc::new(face_paint(material, material.color.multiply(face.color)))
            }
            _ => self
                .styles
                .get_or_build(material, StyleRole::Face, || face_paint(material, material.color)),
        }
    }
}

/// Fill, or stroke-only when the material asks for wireframe. Standard and
/// normal materials always fill.
fn face_paint(material: &Material, color: Color) -> PathStyle {
    let wireframe = material.wireframe
        && !matches!(
            material.kind,
            MaterialKind::Standard { .. } | MaterialKind::Normal
        );
    if wireframe {
        PathStyle::stroked(color, material.opacity, material.wireframe_linewidth)
    } else {
        PathStyle::filled(color, material.opacity)
    }
}

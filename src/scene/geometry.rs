//! Vertex data of drawable nodes.
//!
//! Two layouts are supported. [`BufferGeometry`] stores flat attribute
//! arrays (three floats per position, normal and color, two per uv) with an
//! optional index. [`LegacyGeometry`] stores explicit vertices and faces
//! that carry their own normals, colors and material index.

use crate::clipper::Sphere;
use crate::color::Color;
use crate::math::{Vec2, Vec3};

#[derive(Debug, Clone)]
pub enum Geometry {
    Buffer(BufferGeometry),
    Legacy(LegacyGeometry),
}

impl Geometry {
    pub fn bounding_sphere(&self) -> Sphere {
        match self {
            Self::Buffer(g) => g.bounding_sphere(),
            Self::Legacy(g) => g.bounding_sphere(),
        }
    }
}

impl From<BufferGeometry> for Geometry {
    fn from(g: BufferGeometry) -> Self {
        Self::Buffer(g)
    }
}

impl From<LegacyGeometry> for Geometry {
    fn from(g: LegacyGeometry) -> Self {
        Self::Legacy(g)
    }
}

/// A range of indices (or vertices, when unindexed) drawn with one material
/// of a multi-material mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeometryGroup {
    pub start: usize,
    pub count: usize,
    pub material_index: usize,
}

#[derive(Debug, Clone, Default)]
pub struct BufferGeometry {
    /// Absent only for malformed geometry; such objects are skipped.
    pub position: Option<Vec<f32>>,
    pub normal: Option<Vec<f32>>,
    pub color: Option<Vec<f32>>,
    pub uv: Option<Vec<f32>>,
    pub index: Option<Vec<u32>>,
    pub groups: Vec<GeometryGroup>,
    /// Alternative position arrays blended by the mesh's morph influences.
    pub morph_positions: Vec<Vec<f32>>,
}

impl BufferGeometry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_positions(mut self, positions: Vec<f32>) -> Self {
        self.position = Some(positions);
        self
    }

    pub fn with_normals(mut self, normals: Vec<f32>) -> Self {
        self.normal = Some(normals);
        self
    }

    pub fn with_colors(mut self, colors: Vec<f32>) -> Self {
        self.color = Some(colors);
        self
    }

    pub fn with_uvs(mut self, uvs: Vec<f32>) -> Self {
        self.uv = Some(uvs);
        self
    }

    pub fn with_index(mut self, index: Vec<u32>) -> Self {
        self.index = Some(index);
        self
    }

    pub fn add_group(&mut self, start: usize, count: usize, material_index: usize) {
        self.groups.push(GeometryGroup {
            start,
            count,
            material_index,
        });
    }

    pub fn add_morph_target(&mut self, positions: Vec<f32>) {
        self.morph_positions.push(positions);
    }

    pub fn vertex_count(&self) -> usize {
        self.position.as_ref().map_or(0, |p| p.len() / 3)
    }

    pub fn positions(&self) -> impl Iterator<Item = Vec3> + Clone + '_ {
        self.position
            .as_deref()
            .unwrap_or(&[])
            .chunks_exact(3)
            .map(|c| Vec3::new(c[0], c[1], c[2]))
    }

    pub fn bounding_sphere(&self) -> Sphere {
        Sphere::from_points(self.positions())
    }
}

/// A triangle of a [`LegacyGeometry`].
#[derive(Debug, Clone, PartialEq)]
pub struct Face3 {
    pub a: usize,
    pub b: usize,
    pub c: usize,
    pub normal: Vec3,
    /// Zero or three per-corner normals.
    pub vertex_normals: Vec<Vec3>,
    pub color: Color,
    pub material_index: usize,
}

impl Face3 {
    pub fn new(a: usize, b: usize, c: usize) -> Self {
        Self {
            a,
            b,
            c,
            normal: Vec3::ZERO,
            vertex_normals: Vec::new(),
            color: Color::WHITE,
            material_index: 0,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_material_index(mut self, index: usize) -> Self {
        self.material_index = index;
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct LegacyGeometry {
    pub vertices: Vec<Vec3>,
    pub faces: Vec<Face3>,
    /// Per face, the uv of each corner.
    pub face_vertex_uvs: Vec<[Vec2; 3]>,
    /// Per-vertex colors, used by lines.
    pub colors: Vec<Color>,
    /// Alternative vertex lists blended by the mesh's morph influences.
    pub morph_targets: Vec<Vec<Vec3>>,
}

impl LegacyGeometry {
    pub fn new(vertices: Vec<Vec3>, faces: Vec<Face3>) -> Self {
        Self {
            vertices,
            faces,
            ..Self::default()
        }
    }

    /// Recomputes every face normal from its corner positions
    /// (counter-clockwise winding faces outward).
    pub fn compute_face_normals(&mut self) {
        let vertices = &self.vertices;
        for face in &mut self.faces {
            let (Some(&va), Some(&vb), Some(&vc)) = (
                vertices.get(face.a),
                vertices.get(face.b),
                vertices.get(face.c),
            ) else {
                continue;
            };
            face.normal = (vc - vb).cross(va - vb).normalize();
        }
    }

    pub fn bounding_sphere(&self) -> Sphere {
        Sphere::from_points(self.vertices.iter().copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn missing_positions_have_no_vertices() {
        let g = BufferGeometry::new();
        assert_eq!(g.vertex_count(), 0);
        assert_eq!(g.bounding_sphere().radius, 0.0);
    }

    #[test]
    fn face_normals_follow_winding() {
        let mut g = LegacyGeometry::new(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            vec![Face3::new(0, 1, 2)],
        );
        g.compute_face_normals();
        assert_relative_eq!(g.faces[0].normal.z, 1.0);
    }

    #[test]
    fn face_with_bad_index_keeps_its_normal() {
        let mut g = LegacyGeometry::new(vec![Vec3::ZERO], vec![Face3::new(0, 1, 2)]);
        g.compute_face_normals();
        assert_eq!(g.faces[0].normal, Vec3::ZERO);
    }
}

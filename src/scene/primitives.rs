//! Built-in geometry.

use crate::math::Vec3;
use crate::scene::geometry::{BufferGeometry, Face3, LegacyGeometry};

pub const CUBE_VERTICES: [Vec3; 8] = [
    Vec3::new(-1.0, -1.0, -1.0),
    Vec3::new(-1.0, 1.0, -1.0),
    Vec3::new(1.0, 1.0, -1.0),
    Vec3::new(1.0, -1.0, -1.0),
    Vec3::new(1.0, 1.0, 1.0),
    Vec3::new(1.0, -1.0, 1.0),
    Vec3::new(-1.0, 1.0, 1.0),
    Vec3::new(-1.0, -1.0, 1.0),
];

/// Corners of each cube triangle, counter-clockwise seen from outside.
pub const CUBE_FACES: [[usize; 3]; 12] = [
    // -Z
    [0, 1, 2],
    [0, 2, 3],
    // +X
    [3, 2, 4],
    [3, 4, 5],
    // +Z
    [5, 4, 6],
    [5, 6, 7],
    // -X
    [7, 6, 1],
    [7, 1, 0],
    // +Y
    [1, 6, 4],
    [1, 4, 2],
    // -Y
    [5, 7, 0],
    [5, 0, 3],
];

/// A 2x2x2 cube centered on the origin, with face normals.
pub fn cube() -> LegacyGeometry {
    let faces = CUBE_FACES
        .iter()
        .enumerate()
        .map(|(i, &[a, b, c])| Face3::new(a, b, c).with_material_index(i / 2))
        .collect();
    let mut geometry = LegacyGeometry::new(CUBE_VERTICES.to_vec(), faces);
    geometry.compute_face_normals();
    geometry
}

/// A `width` x `height` rectangle in the XY plane facing +Z, split into
/// `columns` x `rows` quads of two triangles each.
pub fn plane(width: f32, height: f32, columns: usize, rows: usize) -> BufferGeometry {
    let (columns, rows) = (columns.max(1), rows.max(1));
    let mut positions = Vec::with_capacity((columns + 1) * (rows + 1) * 3);
    let mut normals = Vec::with_capacity(positions.capacity());
    for row in 0..=rows {
        let y = height * 0.5 - height * row as f32 / rows as f32;
        for column in 0..=columns {
            let x = -width * 0.5 + width * column as f32 / columns as f32;
            positions.extend_from_slice(&[x, y, 0.0]);
            normals.extend_from_slice(&[0.0, 0.0, 1.0]);
        }
    }

    let stride = (columns + 1) as u32;
    let mut index = Vec::with_capacity(columns * rows * 6);
    for row in 0..rows as u32 {
        for column in 0..columns as u32 {
            let a = row * stride + column;
            let b = a + stride;
            let (c, d) = (b + 1, a + 1);
            index.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }

    BufferGeometry::new()
        .with_positions(positions)
        .with_normals(normals)
        .with_index(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn cube_normals_point_outward() {
        let cube = cube();
        for face in &cube.faces {
            let center = (cube.vertices[face.a] + cube.vertices[face.b] + cube.vertices[face.c]) / 3.0;
            assert!(face.normal.dot(center) > 0.0);
        }
    }

    #[test]
    fn plane_faces_positive_z() {
        let plane = plane(2.0, 2.0, 1, 1);
        let p = plane.position.as_deref().unwrap();
        let index = plane.index.as_deref().unwrap();
        let corner = |i: u32| Vec3::from_slice(p, i as usize * 3).unwrap();
        let (a, b, c) = (corner(index[0]), corner(index[1]), corner(index[2]));
        let normal = (c - b).cross(a - b);
        assert_relative_eq!(normal.normalize().z, 1.0);
        assert_eq!(index.len(), 6);
    }
}

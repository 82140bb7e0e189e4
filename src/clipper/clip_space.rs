//! Tests and clipping in homogeneous clip space.
//!
//! The clip volume is defined by:
//!
//! ```text
//! -w <= x <= w
//! -w <= y <= w
//! -w <= z <= w   (for [-1, 1] depth range, OpenGL-style)
//! ```
//!
//! Lines are only clipped against the near and far planes; the vector
//! target clips everything else itself.

use crate::clipper::bounds::Box3;
use crate::math::{Vec3, Vec4};

/// Depth planes of the canonical clip cube.
///
/// The signed distance is positive when inside the clip volume.
#[derive(Clone, Copy, Debug)]
pub enum ClipPlane {
    /// z >= -w
    Near,
    /// z <= w
    Far,
}

impl ClipPlane {
    pub fn signed_distance(&self, p: &Vec4) -> f32 {
        match self {
            Self::Near => p.w + p.z,
            Self::Far => p.w - p.z,
        }
    }
}

/// Clips the homogeneous segment `s1`–`s2` against the near and far planes.
///
/// Returns `false` if nothing of the segment survives. Otherwise the
/// endpoints are moved onto the planes where needed and `true` is returned.
pub fn clip_line(s1: &mut Vec4, s2: &mut Vec4) -> bool {
    let bc1_near = ClipPlane::Near.signed_distance(s1);
    let bc2_near = ClipPlane::Near.signed_distance(s2);
    let bc1_far = ClipPlane::Far.signed_distance(s1);
    let bc2_far = ClipPlane::Far.signed_distance(s2);

    if bc1_near >= 0.0 && bc2_near >= 0.0 && bc1_far >= 0.0 && bc2_far >= 0.0 {
        return true;
    }
    if (bc1_near < 0.0 && bc2_near < 0.0) || (bc1_far < 0.0 && bc2_far < 0.0) {
        return false;
    }

    let mut alpha1 = 0.0f32;
    let mut alpha2 = 1.0f32;

    if bc1_near < 0.0 {
        alpha1 = alpha1.max(bc1_near / (bc1_near - bc2_near));
    } else if bc2_near < 0.0 {
        alpha2 = alpha2.min(bc1_near / (bc1_near - bc2_near));
    }

    if bc1_far < 0.0 {
        alpha1 = alpha1.max(bc1_far / (bc1_far - bc2_far));
    } else if bc2_far < 0.0 {
        alpha2 = alpha2.min(bc1_far / (bc1_far - bc2_far));
    }

    if alpha2 < alpha1 {
        return false;
    }

    let (a, b) = (*s1, *s2);
    *s1 = a.lerp(b, alpha1);
    *s2 = a.lerp(b, alpha2);
    true
}

/// Twice the signed screen-space area of a triangle after perspective
/// divide. Negative for counter-clockwise winding.
pub fn signed_area(v1: &Vec4, v2: &Vec4, v3: &Vec4) -> f32 {
    (v3.x - v1.x) * (v2.y - v1.y) - (v3.y - v1.y) * (v2.x - v1.x)
}

/// Whether a projected triangle winds counter-clockwise on screen.
pub fn is_front_facing(v1: &Vec4, v2: &Vec4, v3: &Vec4) -> bool {
    signed_area(v1, v2, v3) < 0.0
}

/// Whether a point in normalized device coordinates lies in the clip cube.
pub fn in_clip_cube(p: &Vec4) -> bool {
    (-1.0..=1.0).contains(&p.x) && (-1.0..=1.0).contains(&p.y) && (-1.0..=1.0).contains(&p.z)
}

/// Whether any part of a projected triangle can overlap the clip cube.
///
/// True if a vertex is inside, or the triangle's bounding box overlaps the
/// cube.
pub fn triangle_may_be_visible(
    visible: [bool; 3],
    v1: &Vec4,
    v2: &Vec4,
    v3: &Vec4,
) -> bool {
    if visible.iter().any(|&v| v) {
        return true;
    }
    let clip_cube = Box3::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::ONE);
    Box3::from_points([v1.to_vec3(), v2.to_vec3(), v3.to_vec3()]).intersects(&clip_cube)
}

//! View frustum extracted from a view-projection matrix.

use crate::clipper::bounds::Sphere;
use crate::math::{Mat4, Vec3, Vec4};

/// A plane `normal · p + constant = 0`; positive distances are inside.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Plane {
    pub normal: Vec3,
    pub constant: f32,
}

impl Plane {
    /// Builds a plane from `(a, b, c, d)` coefficients and normalizes it.
    fn from_coefficients(v: Vec4) -> Self {
        let normal = Vec3::new(v.x, v.y, v.z);
        let length = normal.magnitude();
        if length == 0.0 {
            return Self {
                normal,
                constant: v.w,
            };
        }
        Self {
            normal: normal / length,
            constant: v.w / length,
        }
    }

    pub fn distance_to_point(&self, p: Vec3) -> f32 {
        self.normal.dot(p) + self.constant
    }
}

/// Six clip planes in world space: left, right, bottom, top, near, far.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Frustum {
    pub planes: [Plane; 6],
}

impl Frustum {
    /// Extracts the planes from a projection or view-projection matrix
    /// (Gribb/Hartmann). Each plane is the last row plus or minus one of the
    /// other rows.
    pub fn from_matrix(m: &Mat4) -> Self {
        let (r0, r1, r2, r3) = (m.row(0), m.row(1), m.row(2), m.row(3));
        Self {
            planes: [
                Plane::from_coefficients(r3 + r0),
                Plane::from_coefficients(r3 - r0),
                Plane::from_coefficients(r3 + r1),
                Plane::from_coefficients(r3 - r1),
                Plane::from_coefficients(r3 + r2),
                Plane::from_coefficients(r3 - r2),
            ],
        }
    }

    pub fn intersects_sphere(&self, sphere: &Sphere) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.distance_to_point(sphere.center) >= -sphere.radius)
    }

    pub fn contains_point(&self, p: Vec3) -> bool {
        self.planes.iter().all(|plane| plane.distance_to_point(p) >= 0.0)
    }
}

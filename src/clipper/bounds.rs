//! Bounding volumes used for culling.

use crate::math::{Mat4, Vec2, Vec3};

/// A bounding sphere.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Sphere {
    pub center: Vec3,
    pub radius: f32,
}

impl Sphere {
    pub const fn new(center: Vec3, radius: f32) -> Self {
        Self { center, radius }
    }

    /// Sphere around the center of the points' bounding box, reaching the
    /// farthest point. Empty input yields a zero sphere at the origin.
    pub fn from_points(points: impl Iterator<Item = Vec3> + Clone) -> Self {
        let bounds = Box3::from_points(points.clone());
        if bounds.is_empty() {
            return Self::default();
        }
        let center = bounds.center();
        let radius = points.fold(0.0f32, |r, p| r.max(center.distance_to(p)));
        Self { center, radius }
    }

    /// The sphere after applying `matrix`. The radius grows with the
    /// matrix's largest axis scale.
    pub fn transformed(&self, matrix: &Mat4) -> Self {
        Self {
            center: *matrix * self.center,
            radius: self.radius * matrix.max_scale_on_axis(),
        }
    }
}

/// Axis-aligned 3D box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Box3 {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for Box3 {
    fn default() -> Self {
        Self::empty()
    }
}

impl Box3 {
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// A box containing nothing; any point expands it.
    pub const fn empty() -> Self {
        Self {
            min: Vec3::new(f32::INFINITY, f32::INFINITY, f32::INFINITY),
            max: Vec3::new(f32::NEG_INFINITY, f32::NEG_INFINITY, f32::NEG_INFINITY),
        }
    }

    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        let mut b = Self::empty();
        for p in points {
            b.expand_by_point(p);
        }
        b
    }

    pub fn expand_by_point(&mut self, p: Vec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn is_empty(&self) -> bool {
        self.max.x < self.min.x || self.max.y < self.min.y || self.max.z < self.min.z
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn intersects(&self, other: &Self) -> bool {
        !(other.max.x < self.min.x
            || other.min.x > self.max.x
            || other.max.y < self.min.y
            || other.min.y > self.max.y
            || other.max.z < self.min.z
            || other.min.z > self.max.z)
    }
}

/// Axis-aligned 2D box, used for screen-space rejection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Box2 {
    pub min: Vec2,
    pub max: Vec2,
}

impl Box2 {
    pub const fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    pub fn from_points(points: &[Vec2]) -> Self {
        let mut min = Vec2::new(f32::INFINITY, f32::INFINITY);
        let mut max = Vec2::new(f32::NEG_INFINITY, f32::NEG_INFINITY);
        for p in points {
            min = Vec2::new(min.x.min(p.x), min.y.min(p.y));
            max = Vec2::new(max.x.max(p.x), max.y.max(p.y));
        }
        Self { min, max }
    }

    pub fn intersects(&self, other: &Self) -> bool {
        !(other.max.x < self.min.x
            || other.min.x > self.max.x
            || other.max.y < self.min.y
            || other.min.y > self.max.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn sphere_encloses_points() {
        let points = [
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 2.0, 0.0),
        ];
        let s = Sphere::from_points(points.iter().copied());
        assert_eq!(s.center, Vec3::new(0.0, 1.0, 0.0));
        assert_relative_eq!(s.radius, 2.0f32.sqrt());
    }

    #[test]
    fn sphere_scales_with_matrix() {
        let s = Sphere::new(Vec3::ZERO, 1.0);
        let m = Mat4::translation(5.0, 0.0, 0.0) * Mat4::scaling(1.0, 3.0, 2.0);
        let t = s.transformed(&m);
        assert_eq!(t.center, Vec3::new(5.0, 0.0, 0.0));
        assert_relative_eq!(t.radius, 3.0);
    }

    #[test]
    fn boxes_touching_at_an_edge_intersect() {
        let a = Box2::new(Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0));
        let b = Box2::new(Vec2::new(1.0, 0.5), Vec2::new(2.0, 2.0));
        let c = Box2::new(Vec2::new(1.5, 0.0), Vec2::new(2.0, 1.0));
        assert!(a.intersects(&b));
        assert!(!a.intersects(&c));
    }

    #[test]
    fn empty_box3_intersects_nothing() {
        let unit = Box3::new(Vec3::new(-1.0, -1.0, -1.0), Vec3::ONE);
        assert!(!unit.intersects(&Box3::empty()));
        assert!(Box3::empty().is_empty());
    }
}

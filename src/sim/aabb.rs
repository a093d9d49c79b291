//! Axis-aligned bounding boxes
//!
//! Every entity's collision shape is a box of its size centred on its position.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned box in screen space (y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Box of `size` centred on `center`
    #[inline]
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.min.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.max.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.min.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.max.y
    }

    /// Strict overlap; boxes that only touch edges do not collide
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && self.max.x > other.min.x
            && self.min.y < other.max.y
            && self.max.y > other.min.y
    }

    #[inline]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.min.x && point.x <= self.max.x && point.y >= self.min.y && point.y <= self.max.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_center() {
        let b = Aabb::from_center(Vec2::new(10.0, 20.0), Vec2::new(4.0, 6.0));
        assert_eq!(b.left(), 8.0);
        assert_eq!(b.right(), 12.0);
        assert_eq!(b.top(), 17.0);
        assert_eq!(b.bottom(), 23.0);
        assert_eq!(b.center(), Vec2::new(10.0, 20.0));
        assert_eq!(b.size(), Vec2::new(4.0, 6.0));
    }

    #[test]
    fn test_overlap() {
        let a = Aabb::from_center(Vec2::ZERO, Vec2::splat(10.0));
        let b = Aabb::from_center(Vec2::new(8.0, 0.0), Vec2::splat(10.0));
        let c = Aabb::from_center(Vec2::new(10.0, 0.0), Vec2::splat(10.0));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        // Touching edges only
        assert!(!a.overlaps(&c));
    }

    #[test]
    fn test_contains() {
        let a = Aabb::from_center(Vec2::ZERO, Vec2::splat(10.0));
        assert!(a.contains(Vec2::new(5.0, 5.0)));
        assert!(!a.contains(Vec2::new(5.1, 0.0)));
    }
}

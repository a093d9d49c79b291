//! Collision predicates
//!
//! Hit tests are box-vs-box for direct contact and centre-distance for
//! explosion blasts. The combat resolver builds on these.

use glam::Vec2;

use super::aabb::Aabb;
use crate::consts::{FIELD_HEIGHT, FIELD_WIDTH};

/// Anything with a box-shaped hit area
pub trait Collider {
    fn bounds(&self) -> Aabb;

    /// Centre used by blast radius checks
    fn center(&self) -> Vec2 {
        self.bounds().center()
    }
}

/// Box overlap between two colliders
#[inline]
pub fn overlaps(a: &impl Collider, b: &impl Collider) -> bool {
    a.bounds().overlaps(&b.bounds())
}

/// Blast check: inclusive at the boundary (`distance <= radius`)
#[inline]
pub fn within_radius(center: Vec2, radius: f32, point: Vec2) -> bool {
    center.distance_squared(point) <= radius * radius
}

/// Result of keeping a box inside the play field
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EdgeContact {
    /// Clamped centre position
    pub pos: Vec2,
    pub hit_x: bool,
    pub hit_y: bool,
}

/// Clamp a box of `size` centred on `pos` so it stays fully on the field
pub fn clamp_to_field(pos: Vec2, size: Vec2) -> EdgeContact {
    let half = size * 0.5;
    let min = half;
    let max = Vec2::new(FIELD_WIDTH, FIELD_HEIGHT) - half;
    let clamped = pos.clamp(min, max);
    EdgeContact {
        pos: clamped,
        hit_x: clamped.x != pos.x,
        hit_y: clamped.y != pos.y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Dot(Vec2);

    impl Collider for Dot {
        fn bounds(&self) -> Aabb {
            Aabb::from_center(self.0, Vec2::splat(2.0))
        }
    }

    #[test]
    fn test_within_radius_boundary_inclusive() {
        let center = Vec2::new(100.0, 100.0);
        assert!(within_radius(center, 50.0, Vec2::new(150.0, 100.0)));
        assert!(within_radius(center, 50.0, Vec2::new(130.0, 140.0)));
        assert!(!within_radius(center, 50.0, Vec2::new(150.01, 100.0)));
    }

    #[test]
    fn test_collider_overlap() {
        assert!(overlaps(&Dot(Vec2::ZERO), &Dot(Vec2::new(1.5, 0.0))));
        assert!(!overlaps(&Dot(Vec2::ZERO), &Dot(Vec2::new(3.0, 0.0))));
        assert_eq!(Dot(Vec2::new(4.0, 5.0)).center(), Vec2::new(4.0, 5.0));
    }

    #[test]
    fn test_clamp_to_field() {
        let size = Vec2::splat(50.0);
        let inside = clamp_to_field(Vec2::new(640.0, 640.0), size);
        assert!(!inside.hit_x && !inside.hit_y);

        let left = clamp_to_field(Vec2::new(-30.0, 640.0), size);
        assert!(left.hit_x);
        assert_eq!(left.pos.x, 25.0);

        let bottom = clamp_to_field(Vec2::new(640.0, 2000.0), size);
        assert!(bottom.hit_y);
        assert_eq!(bottom.pos.y, FIELD_HEIGHT - 25.0);
    }
}

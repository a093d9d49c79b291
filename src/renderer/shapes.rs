//! Sprite generation for each entity kind

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::sim::entities::{BOMB_SIZE, POWER_UP_SIZE};
use crate::sim::{Aabb, Collider, EntityView, Explosion, Shield, Ship};

/// What a sprite depicts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpriteKind {
    Ship,
    PlayerBullet,
    EnemyBullet,
    BossBullet,
    Asteroid,
    Enemy,
    Boss,
    PowerUp,
    Bomb,
    Explosion,
}

/// One drawable item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    pub kind: SpriteKind,
    pub pos: Vec2,
    pub size: Vec2,
    pub rotation: f32,
    /// RGBA, 0-1
    pub color: [f32; 4],
    /// Polygon offsets from `pos` for outlined shapes; empty for boxes
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub outline: Vec<Vec2>,
}

/// Colors for game elements
pub mod colors {
    pub const SHIP: [f32; 4] = [0.2, 0.8, 1.0, 1.0];
    pub const SHIP_SHIELDED: [f32; 4] = [0.9, 0.9, 1.0, 1.0];
    pub const ENEMY: [f32; 4] = [0.9, 0.2, 0.2, 1.0];
    pub const BOMB: [f32; 4] = [1.0, 0.5, 0.0, 1.0];
    pub const EXPLOSION: [f32; 4] = [1.0, 0.6, 0.1, 1.0];
}

/// Unpack a 0xRRGGBB tint
pub fn rgb(tint: u32) -> [f32; 4] {
    let channel = |shift: u32| ((tint >> shift) & 0xFF) as f32 / 255.0;
    [channel(16), channel(8), channel(0), 1.0]
}

/// Asteroid colour by spawn tier (grey rock warming to red)
fn tier_color(tier: u32) -> [f32; 4] {
    let t = (tier.saturating_sub(1) as f32 / 4.0).clamp(0.0, 1.0);
    [0.6 + 0.4 * t, 0.6 - 0.3 * t, 0.6 - 0.4 * t, 1.0]
}

/// Boss colour by remaining health (green -> yellow -> red)
fn health_color(fraction: f32) -> [f32; 4] {
    let f = fraction.clamp(0.0, 1.0);
    let (r, g) = if f > 0.5 {
        ((1.0 - f) * 2.0, 1.0)
    } else {
        (1.0, f * 2.0)
    };
    [r, g, 0.2, 1.0]
}

fn ship_color(ship: &Ship, now: u64) -> [f32; 4] {
    match ship.shield {
        Shield::Permanent => colors::SHIP_SHIELDED,
        Shield::Until(_) if ship.is_invincible(now) => {
            // Blink while a timed shield runs
            if (now / 100).is_multiple_of(2) {
                colors::SHIP_SHIELDED
            } else {
                colors::SHIP
            }
        }
        _ => colors::SHIP,
    }
}

fn boxed(kind: SpriteKind, bounds: Aabb, rotation: f32, color: [f32; 4]) -> Sprite {
    Sprite {
        kind,
        pos: bounds.center(),
        size: bounds.size(),
        rotation,
        color,
        outline: Vec::new(),
    }
}

fn explosion_sprite(explosion: &Explosion) -> Sprite {
    let radius = explosion.current_radius();
    let fade = 1.0 - explosion.frame as f32 / crate::sim::entities::EXPLOSION_FRAMES as f32;
    let mut color = colors::EXPLOSION;
    color[3] = fade.clamp(0.0, 1.0);
    Sprite {
        kind: SpriteKind::Explosion,
        pos: explosion.center,
        size: Vec2::splat(radius * 2.0),
        rotation: 0.0,
        color,
        outline: Vec::new(),
    }
}

/// Sprite for one entity
pub fn sprite(view: EntityView<'_>, now: u64) -> Sprite {
    match view {
        EntityView::Ship(ship) => boxed(
            SpriteKind::Ship,
            ship.bounds(),
            ship.rotation,
            ship_color(ship, now),
        ),
        EntityView::Bullet(bullet) => {
            let kind = match bullet.owner {
                crate::sim::BulletOwner::Player => SpriteKind::PlayerBullet,
                crate::sim::BulletOwner::Enemy => SpriteKind::EnemyBullet,
                crate::sim::BulletOwner::Boss => SpriteKind::BossBullet,
            };
            // Point along the direction of travel
            let rotation = bullet.vel.x.atan2(-bullet.vel.y);
            boxed(kind, bullet.bounds(), rotation, rgb(bullet.tint))
        }
        EntityView::Asteroid(asteroid) => Sprite {
            kind: SpriteKind::Asteroid,
            pos: asteroid.pos,
            size: Vec2::splat(asteroid.size),
            rotation: asteroid.rotation,
            color: tier_color(asteroid.tier()),
            outline: asteroid.outline.clone(),
        },
        EntityView::Enemy(enemy) => boxed(SpriteKind::Enemy, enemy.bounds(), 0.0, colors::ENEMY),
        EntityView::Boss(boss) => boxed(
            SpriteKind::Boss,
            boss.bounds(),
            0.0,
            health_color(boss.health_fraction()),
        ),
        EntityView::PowerUp(power_up) => Sprite {
            kind: SpriteKind::PowerUp,
            pos: power_up.pos,
            size: Vec2::splat(POWER_UP_SIZE),
            rotation: 0.0,
            color: rgb(power_up.kind.tint()),
            outline: Vec::new(),
        },
        EntityView::Bomb(bomb) => Sprite {
            kind: SpriteKind::Bomb,
            pos: bomb.pos,
            size: Vec2::splat(BOMB_SIZE),
            rotation: 0.0,
            color: colors::BOMB,
            outline: Vec::new(),
        },
        EntityView::Explosion(explosion) => explosion_sprite(explosion),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_unpack() {
        assert_eq!(rgb(0xFF0000), [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(rgb(0x00FF00), [0.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_health_color_gradient() {
        assert_eq!(health_color(1.0), [0.0, 1.0, 0.2, 1.0]);
        assert_eq!(health_color(0.0), [1.0, 0.0, 0.2, 1.0]);
        assert_eq!(health_color(0.5), [1.0, 1.0, 0.2, 1.0]);
    }

    #[test]
    fn test_explosion_fades() {
        let mut explosion = Explosion::new(Vec2::ZERO, 100.0);
        let first = explosion_sprite(&explosion);
        explosion.advance();
        let later = explosion_sprite(&explosion);
        assert!(later.color[3] < first.color[3]);
        assert!(later.size.x > first.size.x);
    }
}

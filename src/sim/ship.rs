//! The player's ship
//!
//! Movement integrates a velocity from held direction keys with friction and
//! a speed cap. Shooting is gated by a cooldown that power-ups shorten, and
//! the bullet pattern fans out with stacked double-shots and triple-shot.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::collision::{Collider, clamp_to_field};
use super::entities::{Bullet, PowerUpKind};
use crate::consts::*;
use crate::shop::{UpgradeEffect, UpgradeKind};
use crate::tuning::Tuning;

/// Selectable ship hulls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShipClass {
    /// Balanced all-rounder
    #[default]
    Falcon,
    /// Fast and light
    Sparrow,
    /// Slow and steady
    Bulwark,
}

impl ShipClass {
    pub const ALL: [ShipClass; 3] = [ShipClass::Falcon, ShipClass::Sparrow, ShipClass::Bulwark];

    /// Selection by menu index; out-of-range picks are ignored
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ShipClass::Falcon => "Falcon",
            ShipClass::Sparrow => "Sparrow",
            ShipClass::Bulwark => "Bulwark",
        }
    }

    pub fn stats(&self) -> ShipStats {
        // Speeds are 5, 7 and 3 px per frame at 60 Hz
        let speed = match self {
            ShipClass::Falcon => 300.0,
            ShipClass::Sparrow => 420.0,
            ShipClass::Bulwark => 180.0,
        };
        ShipStats {
            class: *self,
            speed,
            shoot_delay_ms: SHOOT_DELAY_MS,
        }
    }
}

/// Ship parameters chosen before a session
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShipStats {
    pub class: ShipClass,
    /// Top speed in px/s
    pub speed: f32,
    pub shoot_delay_ms: u64,
}

impl Default for ShipStats {
    fn default() -> Self {
        ShipClass::default().stats()
    }
}

/// Invincibility state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shield {
    None,
    /// Never expires (reserved player name)
    Permanent,
    /// Active until the given time
    Until(u64),
}

/// A power-up currently affecting the ship
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivePowerUp {
    pub kind: PowerUpKind,
    pub expires_at_ms: u64,
}

/// What a hazard hit did to the ship
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    /// Invincible; nothing lost
    Shielded,
    /// A spare hit point was consumed
    Absorbed,
    /// The ship is gone
    Destroyed,
}

/// The player ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    /// Cosmetic bank angle (radians)
    pub rotation: f32,
    pub base_speed: f32,
    /// Speed after upgrades
    pub speed: f32,
    pub shoot_delay_ms: u64,
    pub last_shot_ms: u64,
    pub power_ups: Vec<ActivePowerUp>,
    pub shield: Shield,
    pub extra_hits: u32,
    pub name: String,
    pub alive: bool,
}

impl Ship {
    /// Build the session's ship from the chosen hull and purchased upgrades
    pub fn new(
        stats: &ShipStats,
        name: &str,
        upgrades: &[UpgradeEffect],
        tuning: &Tuning,
        now: u64,
    ) -> Self {
        let name = crate::sanitize_name(name);
        let shield = if tuning.grants_invincibility(&name) {
            Shield::Permanent
        } else {
            Shield::None
        };

        let mut ship = Self {
            pos: Vec2::new(
                FIELD_WIDTH / 2.0,
                FIELD_HEIGHT - SHIP_BOTTOM_MARGIN - SHIP_HEIGHT / 2.0,
            ),
            vel: Vec2::ZERO,
            size: Vec2::new(SHIP_WIDTH, SHIP_HEIGHT),
            rotation: 0.0,
            base_speed: stats.speed,
            speed: stats.speed,
            shoot_delay_ms: stats.shoot_delay_ms,
            last_shot_ms: now,
            power_ups: Vec::new(),
            shield,
            extra_hits: 0,
            name,
            alive: true,
        };

        for upgrade in upgrades {
            ship.apply_upgrade(upgrade, now);
        }
        ship
    }

    fn apply_upgrade(&mut self, upgrade: &UpgradeEffect, now: u64) {
        match upgrade.kind {
            UpgradeKind::Speed => self.speed = self.base_speed * upgrade.magnitude,
            UpgradeKind::FireRate => {
                self.shoot_delay_ms = (self.shoot_delay_ms as f32 * upgrade.magnitude).round() as u64;
            }
            UpgradeKind::ExtraHealth => self.extra_hits += upgrade.magnitude.max(0.0) as u32,
            // Applied to the session's score awards, not the ship
            UpgradeKind::ScoreMultiplier => {}
            UpgradeKind::ShieldDuration => {
                if self.shield != Shield::Permanent {
                    self.shield = Shield::Until(now + upgrade.magnitude.max(0.0) as u64);
                }
            }
            UpgradeKind::StartingPowerUp => self.power_ups.push(ActivePowerUp {
                kind: PowerUpKind::TripleShot,
                expires_at_ms: now + upgrade.magnitude.max(0.0) as u64,
            }),
        }
    }

    /// Current speed cap (doubled by rapid movement)
    pub fn max_speed(&self, now: u64) -> f32 {
        if self.has_power_up(PowerUpKind::RapidMovement, now) {
            self.speed * 2.0
        } else {
            self.speed
        }
    }

    /// Apply one tick of directional input to the velocity
    pub fn steer(&mut self, direction: Vec2, now: u64) {
        let max_speed = self.max_speed(now);
        let direction = direction.normalize_or_zero();

        self.vel += direction * max_speed * SHIP_ACCEL;
        self.vel *= SHIP_FRICTION;
        if direction == Vec2::ZERO {
            self.vel *= SHIP_DECEL;
        }
        self.vel = self.vel.clamp_length_max(max_speed);
    }

    /// Integrate position, keeping the hull on the field with a small bounce
    pub fn advance(&mut self, dt: f32) {
        let contact = clamp_to_field(self.pos + self.vel * dt, self.size);
        self.pos = contact.pos;
        if contact.hit_x {
            self.vel.x = -self.vel.x * SHIP_EDGE_BOUNCE;
        }
        if contact.hit_y {
            self.vel.y = -self.vel.y * SHIP_EDGE_BOUNCE;
        }

        let bank = if self.speed > 0.0 {
            (self.vel.x / self.speed).clamp(-1.0, 1.0)
        } else {
            0.0
        };
        self.rotation = bank * SHIP_MAX_BANK;
    }

    /// Shot cooldown with fire-rate power-ups applied
    pub fn shoot_delay(&self, now: u64) -> u64 {
        if self.has_power_up(PowerUpKind::SuperRapidFire, now) {
            self.shoot_delay_ms / 4
        } else if self.has_power_up(PowerUpKind::RapidFire, now) {
            self.shoot_delay_ms / 2
        } else {
            self.shoot_delay_ms
        }
    }

    /// Fire if the cooldown has elapsed
    ///
    /// `k` stacked double-shots produce `2^k` parallel lanes; triple-shot
    /// turns every lane into a three-ray spread.
    pub fn try_fire(&mut self, now: u64) -> Vec<Bullet> {
        if now.saturating_sub(self.last_shot_ms) <= self.shoot_delay(now) {
            return Vec::new();
        }
        self.last_shot_ms = now;

        let doubles = self.power_up_count(PowerUpKind::DoubleShot, now) as u32;
        let lanes = 1usize << doubles.min(16);
        let angles: &[f32] = if self.has_power_up(PowerUpKind::TripleShot, now) {
            &[-TRIPLE_SHOT_SPREAD, 0.0, TRIPLE_SHOT_SPREAD]
        } else {
            &[0.0]
        };

        let muzzle_y = self.bounds().top() - BULLET_HEIGHT / 2.0;
        let first_offset = -(lanes as f32 - 1.0) * DOUBLE_SHOT_SPACING / 2.0;
        let mut bullets = Vec::with_capacity(lanes * angles.len());
        for lane in 0..lanes {
            let x = self.pos.x + first_offset + lane as f32 * DOUBLE_SHOT_SPACING;
            for &angle in angles {
                bullets.push(Bullet::player(Vec2::new(x, muzzle_y), angle));
            }
        }
        bullets
    }

    /// Grant a power-up for `duration_ms`
    ///
    /// Double-shots stack up to `max_double_stack`; past the cap the oldest
    /// one is refreshed instead.
    pub fn add_power_up(
        &mut self,
        kind: PowerUpKind,
        now: u64,
        duration_ms: u64,
        max_double_stack: usize,
    ) {
        let expires_at_ms = now + duration_ms;
        match kind {
            PowerUpKind::DoubleShot => {
                if self.power_up_count(kind, now) < max_double_stack.max(1) {
                    self.power_ups.push(ActivePowerUp {
                        kind,
                        expires_at_ms,
                    });
                } else if let Some(oldest) = self
                    .power_ups
                    .iter_mut()
                    .filter(|p| p.kind == kind)
                    .min_by_key(|p| p.expires_at_ms)
                {
                    oldest.expires_at_ms = expires_at_ms;
                }
            }
            _ => {
                if let Some(existing) = self.power_ups.iter_mut().find(|p| p.kind == kind) {
                    existing.expires_at_ms = existing.expires_at_ms.max(expires_at_ms);
                } else {
                    self.power_ups.push(ActivePowerUp {
                        kind,
                        expires_at_ms,
                    });
                }
            }
        }
    }

    /// Drop power-ups whose time is up
    pub fn expire_power_ups(&mut self, now: u64) {
        self.power_ups.retain(|p| now < p.expires_at_ms);
        if let Shield::Until(until) = self.shield
            && now >= until
        {
            self.shield = Shield::None;
        }
    }

    pub fn has_power_up(&self, kind: PowerUpKind, now: u64) -> bool {
        self.power_up_count(kind, now) > 0
    }

    pub fn power_up_count(&self, kind: PowerUpKind, now: u64) -> usize {
        self.power_ups
            .iter()
            .filter(|p| p.kind == kind && now < p.expires_at_ms)
            .count()
    }

    pub fn is_invincible(&self, now: u64) -> bool {
        match self.shield {
            Shield::None => false,
            Shield::Permanent => true,
            Shield::Until(until) => now < until,
        }
    }

    /// Take a hazard hit
    pub fn take_hit(&mut self, now: u64) -> HitOutcome {
        if self.is_invincible(now) {
            return HitOutcome::Shielded;
        }
        if self.extra_hits > 0 {
            self.extra_hits -= 1;
            return HitOutcome::Absorbed;
        }
        self.alive = false;
        HitOutcome::Destroyed
    }
}

impl Collider for Ship {
    fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, self.size)
    }

    fn center(&self) -> Vec2 {
        self.pos
    }
}

//! Boss encounters
//!
//! A boss cycles through parametric movement patterns and attack patterns on
//! two independent timers. Health scales with tier; every second boss is a
//! mega-boss with double health, and the final tier is much tougher still.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::collision::Collider;
use super::entities::Bullet;
use crate::consts::*;
use crate::rotate;

pub const BOSS_WIDTH: f32 = 160.0;
pub const BOSS_HEIGHT: f32 = 100.0;
/// Resting height the boss hovers around
pub const BOSS_ANCHOR_Y: f32 = 220.0;
/// Top speed while following a pattern
pub const BOSS_SPEED: f32 = 320.0;
/// Descent speed while entering
pub const BOSS_ENTRY_SPEED: f32 = 120.0;
pub const MOVEMENT_SWITCH_MS: u64 = 5000;
pub const ATTACK_SWITCH_MS: u64 = 4000;
/// Health of the final boss regardless of tier
pub const FINAL_BOSS_HEALTH: u32 = 600;

/// Boss category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossKind {
    Standard,
    Mega,
    Final,
}

impl BossKind {
    fn bonus_factor(self) -> u64 {
        match self {
            BossKind::Standard => 1,
            BossKind::Mega => 2,
            BossKind::Final => 5,
        }
    }
}

/// How the boss moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementPattern {
    /// Descending onto the field; cannot shoot yet
    Entering,
    /// Side to side across the top
    Sweep,
    Figure8,
    Circle,
    /// Lunge toward the player and pull back
    Dive,
}

impl MovementPattern {
    fn next(self) -> Self {
        match self {
            MovementPattern::Entering | MovementPattern::Dive => MovementPattern::Sweep,
            MovementPattern::Sweep => MovementPattern::Figure8,
            MovementPattern::Figure8 => MovementPattern::Circle,
            MovementPattern::Circle => MovementPattern::Dive,
        }
    }

    /// Offset from the anchor `t` seconds into the pattern
    fn offset(self, t: f32) -> Vec2 {
        let reach = FIELD_WIDTH / 2.0 - BOSS_WIDTH / 2.0 - 20.0;
        match self {
            MovementPattern::Entering => Vec2::ZERO,
            MovementPattern::Sweep => Vec2::new((t * 0.8).sin() * reach, 0.0),
            MovementPattern::Figure8 => Vec2::new(t.sin() * reach * 0.6, (2.0 * t).sin() * 60.0),
            MovementPattern::Circle => {
                let w = t * 1.2;
                Vec2::new(w.sin() * 150.0, (1.0 - w.cos()) * 80.0)
            }
            MovementPattern::Dive => {
                let span = MOVEMENT_SWITCH_MS as f32 / 1000.0;
                let phase = (t / span * std::f32::consts::PI).sin().max(0.0);
                Vec2::new(0.0, phase * 300.0)
            }
        }
    }
}

/// How the boss shoots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackPattern {
    /// Five-way fan downward
    Spread,
    /// Three shots at the player
    Aimed,
    /// Ring of eight that rotates every volley
    Spiral,
    /// Twin shots from the wings
    Burst,
}

impl AttackPattern {
    fn next(self) -> Self {
        match self {
            AttackPattern::Spread => AttackPattern::Aimed,
            AttackPattern::Aimed => AttackPattern::Spiral,
            AttackPattern::Spiral => AttackPattern::Burst,
            AttackPattern::Burst => AttackPattern::Spread,
        }
    }
}

/// A boss
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boss {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub anchor: Vec2,
    pub tier: u32,
    pub kind: BossKind,
    pub health: u32,
    pub max_health: u32,
    pub movement: MovementPattern,
    pub movement_started_ms: u64,
    pub attack: AttackPattern,
    pub attack_started_ms: u64,
    pub shoot_delay_ms: u64,
    pub last_shot_ms: u64,
    /// Current angle of the spiral attack
    pub spiral_angle: f32,
    pub alive: bool,
}

impl Boss {
    pub fn health_for(tier: u32, kind: BossKind) -> u32 {
        let base = 20u32.saturating_mul(tier.saturating_sub(1)).saturating_add(40);
        match kind {
            BossKind::Standard => base,
            BossKind::Mega => base.saturating_mul(2),
            BossKind::Final => FINAL_BOSS_HEALTH,
        }
    }

    pub fn spawn(id: u32, tier: u32, kind: BossKind, now: u64) -> Self {
        let health = Self::health_for(tier, kind);
        let shoot_delay_ms = match kind {
            BossKind::Final => 300,
            _ => 900u64
                .saturating_sub(60 * u64::from(tier.saturating_sub(1)))
                .max(350),
        };
        Self {
            id,
            pos: Vec2::new(FIELD_WIDTH / 2.0, -BOSS_HEIGHT / 2.0),
            vel: Vec2::ZERO,
            anchor: Vec2::new(FIELD_WIDTH / 2.0, BOSS_ANCHOR_Y),
            tier,
            kind,
            health,
            max_health: health,
            movement: MovementPattern::Entering,
            movement_started_ms: now,
            attack: AttackPattern::Spread,
            attack_started_ms: now,
            shoot_delay_ms,
            last_shot_ms: now,
            spiral_angle: 0.0,
            alive: true,
        }
    }

    /// Score awarded for the kill
    pub fn bonus(&self) -> u64 {
        BOSS_BONUS_PER_TIER * u64::from(self.tier.max(1)) * self.kind.bonus_factor()
    }

    pub fn advance(&mut self, dt: f32, now: u64) {
        let start = self.pos;

        if self.movement == MovementPattern::Entering {
            self.pos.y += BOSS_ENTRY_SPEED * dt;
            if self.pos.y >= self.anchor.y {
                self.pos.y = self.anchor.y;
                self.movement = MovementPattern::Sweep;
                self.movement_started_ms = now;
                self.attack_started_ms = now;
            }
        } else {
            if now.saturating_sub(self.movement_started_ms) >= MOVEMENT_SWITCH_MS {
                self.movement = self.movement.next();
                self.movement_started_ms = now;
            }
            if now.saturating_sub(self.attack_started_ms) >= ATTACK_SWITCH_MS {
                self.attack = self.attack.next();
                self.attack_started_ms = now;
            }

            let t = now.saturating_sub(self.movement_started_ms) as f32 / 1000.0;
            let target = self.anchor + self.movement.offset(t);
            // Chase the pattern point so switches never teleport
            self.pos += (target - self.pos).clamp_length_max(BOSS_SPEED * dt);
        }

        self.vel = if dt > 0.0 { (self.pos - start) / dt } else { Vec2::ZERO };
    }

    /// Fire the current attack pattern if the cooldown elapsed
    pub fn try_fire(&mut self, now: u64, target: Vec2) -> Vec<Bullet> {
        if self.movement == MovementPattern::Entering
            || now.saturating_sub(self.last_shot_ms) <= self.shoot_delay_ms
        {
            return Vec::new();
        }
        self.last_shot_ms = now;

        let muzzle = Vec2::new(self.pos.x, self.bounds().bottom());
        match self.attack {
            AttackPattern::Spread => (-2..=2)
                .map(|i| {
                    let dir = rotate(Vec2::Y, i as f32 * 0.25);
                    Bullet::boss(muzzle, dir, BOSS_BULLET_SPEED)
                })
                .collect(),
            AttackPattern::Aimed => {
                let aim = (target - muzzle).normalize_or(Vec2::Y);
                [-0.12, 0.0, 0.12]
                    .into_iter()
                    .map(|a| Bullet::boss(muzzle, rotate(aim, a), BOSS_BULLET_SPEED * 1.2))
                    .collect()
            }
            AttackPattern::Spiral => {
                let base = self.spiral_angle;
                self.spiral_angle = (self.spiral_angle + 0.35) % std::f32::consts::TAU;
                (0..8)
                    .map(|i| {
                        let angle = base + i as f32 * std::f32::consts::FRAC_PI_4;
                        Bullet::boss(self.pos, Vec2::from_angle(angle), BOSS_BULLET_SPEED * 0.8)
                    })
                    .collect()
            }
            AttackPattern::Burst => {
                let wing = BOSS_WIDTH / 3.0;
                [-wing, wing]
                    .into_iter()
                    .map(|dx| {
                        Bullet::boss(muzzle + Vec2::new(dx, 0.0), Vec2::Y, BOSS_BULLET_SPEED * 1.5)
                    })
                    .collect()
            }
        }
    }

    /// Apply damage; health clamps at zero. Returns true if this killed it.
    pub fn take_damage(&mut self, amount: u32) -> bool {
        self.health = self.health.saturating_sub(amount);
        if self.health == 0 && self.alive {
            self.alive = false;
            return true;
        }
        false
    }

    pub fn health_fraction(&self) -> f32 {
        if self.max_health == 0 {
            return 0.0;
        }
        self.health as f32 / self.max_health as f32
    }
}

impl Collider for Boss {
    fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, Vec2::new(BOSS_WIDTH, BOSS_HEIGHT))
    }

    fn center(&self) -> Vec2 {
        self.pos
    }
}

//! Projectiles, hazards and pickups
//!
//! Asteroids and enemy ships that leave the field respawn in place so a wave
//! keeps its population. Bullets, power-ups, bombs and explosions are removed
//! once they leave the field or finish.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::aabb::Aabb;
use super::collision::Collider;
use crate::consts::*;
use crate::{in_field, rotate};

/// Which side fired a bullet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BulletOwner {
    Player,
    Enemy,
    Boss,
}

/// A projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: Vec2,
    pub owner: BulletOwner,
    /// RGB colour for drawing
    pub tint: u32,
    pub alive: bool,
}

impl Bullet {
    /// Player shot travelling up, tilted by `angle` radians
    pub fn player(pos: Vec2, angle: f32) -> Self {
        Self {
            pos,
            vel: rotate(Vec2::new(0.0, -BULLET_SPEED), angle),
            size: Vec2::new(BULLET_WIDTH, BULLET_HEIGHT),
            owner: BulletOwner::Player,
            tint: 0x00FF00,
            alive: true,
        }
    }

    /// Enemy shot travelling straight down
    pub fn enemy(pos: Vec2) -> Self {
        Self {
            pos,
            vel: Vec2::new(0.0, ENEMY_BULLET_SPEED),
            size: Vec2::new(BULLET_WIDTH, BULLET_HEIGHT),
            owner: BulletOwner::Enemy,
            tint: 0xFF0000,
            alive: true,
        }
    }

    /// Boss shot along `direction`
    pub fn boss(pos: Vec2, direction: Vec2, speed: f32) -> Self {
        Self {
            pos,
            vel: direction.normalize_or(Vec2::Y) * speed,
            size: Vec2::splat(BULLET_WIDTH * 2.0),
            owner: BulletOwner::Boss,
            tint: 0xFF00FF,
            alive: true,
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.pos += self.vel * dt;
        if !in_field(self.pos, self.size.max_element()) {
            self.alive = false;
        }
    }
}

impl Collider for Bullet {
    fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, self.size)
    }

    fn center(&self) -> Vec2 {
        self.pos
    }
}

/// Power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Halves the shot cooldown
    RapidFire,
    /// Doubles the parallel bullet lanes (stacks)
    DoubleShot,
    /// Three-ray spread
    TripleShot,
    /// Quarters the shot cooldown
    SuperRapidFire,
    /// Doubles ship speed
    RapidMovement,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 5] = [
        PowerUpKind::RapidFire,
        PowerUpKind::DoubleShot,
        PowerUpKind::TripleShot,
        PowerUpKind::SuperRapidFire,
        PowerUpKind::RapidMovement,
    ];

    pub fn random(rng: &mut impl Rng) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    pub fn tint(&self) -> u32 {
        match self {
            PowerUpKind::RapidFire => 0xFFFF00,
            PowerUpKind::DoubleShot => 0x00FFFF,
            PowerUpKind::TripleShot => 0xFF8000,
            PowerUpKind::SuperRapidFire => 0xFF0080,
            PowerUpKind::RapidMovement => 0x80FF80,
        }
    }
}

pub const POWER_UP_SIZE: f32 = 24.0;
pub const POWER_UP_FALL_SPEED: f32 = 120.0;

/// A falling pickup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerUp {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub kind: PowerUpKind,
    pub alive: bool,
}

impl PowerUp {
    pub fn new(id: u32, pos: Vec2, kind: PowerUpKind) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::new(0.0, POWER_UP_FALL_SPEED),
            kind,
            alive: true,
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.pos += self.vel * dt;
        if self.pos.y - POWER_UP_SIZE / 2.0 > FIELD_HEIGHT {
            self.alive = false;
        }
    }
}

impl Collider for PowerUp {
    fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, Vec2::splat(POWER_UP_SIZE))
    }

    fn center(&self) -> Vec2 {
        self.pos
    }
}

/// Vertices in an asteroid outline
const ASTEROID_VERTICES: usize = 8;

/// A drifting rock
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asteroid {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Edge length of the square hit box
    pub size: f32,
    pub rotation: f32,
    pub rotation_speed: f32,
    /// Outline offsets from the centre, for drawing
    pub outline: Vec<Vec2>,
    /// Level the asteroid was spawned on
    pub level: u32,
    pub alive: bool,
}

impl Asteroid {
    /// Size multiplier for a level
    pub fn size_scale(level: u32) -> f32 {
        (1.0 + 0.05 * level.saturating_sub(1) as f32).min(1.5)
    }

    /// Speed multiplier for a level
    pub fn speed_scale(level: u32) -> f32 {
        1.0 + 0.1 * level.saturating_sub(1) as f32
    }

    /// Fresh asteroid just above the top edge
    pub fn spawn(id: u32, level: u32, rng: &mut impl Rng) -> Self {
        let size = rng.random_range(20.0..=50.0) * Self::size_scale(level);

        let outline = (0..ASTEROID_VERTICES)
            .map(|i| {
                let angle = std::f32::consts::TAU * i as f32 / ASTEROID_VERTICES as f32;
                let radius = rng.random_range(size / 3.0..=size / 2.0);
                Vec2::new(angle.cos(), angle.sin()) * radius
            })
            .collect();

        let mut asteroid = Self {
            id,
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            size,
            rotation: 0.0,
            rotation_speed: rng.random_range(-3.0..=3.0),
            outline,
            level,
            alive: true,
        };
        asteroid.respawn(rng);
        asteroid
    }

    /// Move back above the field with a new heading
    fn respawn(&mut self, rng: &mut impl Rng) {
        let speed = Self::speed_scale(self.level);
        let left = rng.random_range(0.0..(FIELD_WIDTH - self.size));
        let top = rng.random_range(-100.0..-40.0);
        self.pos = Vec2::new(left + self.size / 2.0, top + self.size / 2.0);
        self.vel = Vec2::new(
            rng.random_range(-120.0..=120.0) * speed,
            rng.random_range(60.0..=180.0) * speed,
        );
    }

    pub fn advance(&mut self, dt: f32, rng: &mut impl Rng) {
        self.pos += self.vel * dt;
        self.rotation += self.rotation_speed * dt;

        let b = self.bounds();
        if b.top() > FIELD_HEIGHT + 10.0 || b.left() < -25.0 || b.right() > FIELD_WIDTH + 25.0 {
            self.respawn(rng);
        }
    }

    /// Colour tier, grows with spawn level
    pub fn tier(&self) -> u32 {
        self.level.clamp(1, 5)
    }
}

impl Collider for Asteroid {
    fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, Vec2::splat(self.size))
    }

    fn center(&self) -> Vec2 {
        self.pos
    }
}

pub const ENEMY_WIDTH: f32 = 40.0;
pub const ENEMY_HEIGHT: f32 = 30.0;

/// A hostile fighter that drifts down and shoots
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyShip {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub shoot_delay_ms: u64,
    pub last_shot_ms: u64,
    pub level: u32,
    pub alive: bool,
}

impl EnemyShip {
    /// Shot cooldown for a level (faster at higher levels)
    pub fn shoot_delay_for(level: u32) -> u64 {
        2000u64
            .saturating_sub(150 * u64::from(level.saturating_sub(1)))
            .max(500)
    }

    pub fn spawn(id: u32, level: u32, now: u64, rng: &mut impl Rng) -> Self {
        let shoot_delay_ms = Self::shoot_delay_for(level);
        let mut enemy = Self {
            id,
            pos: Vec2::ZERO,
            vel: Vec2::ZERO,
            shoot_delay_ms,
            // Stagger so a fresh wave does not fire in unison
            last_shot_ms: now.saturating_sub(rng.random_range(0..shoot_delay_ms)),
            level,
            alive: true,
        };
        enemy.respawn(rng);
        enemy
    }

    fn respawn(&mut self, rng: &mut impl Rng) {
        let speed = Asteroid::speed_scale(self.level);
        self.pos = Vec2::new(
            rng.random_range(ENEMY_WIDTH..(FIELD_WIDTH - ENEMY_WIDTH)),
            rng.random_range(-150.0..-50.0),
        );
        let drift = rng.random_range(40.0..=100.0) * speed;
        let drift = if rng.random_bool(0.5) { drift } else { -drift };
        self.vel = Vec2::new(drift, rng.random_range(40.0..=80.0) * speed);
    }

    pub fn advance(&mut self, dt: f32, rng: &mut impl Rng) {
        self.pos += self.vel * dt;

        // Bounce off the side walls
        let half = ENEMY_WIDTH / 2.0;
        if self.pos.x < half {
            self.pos.x = half;
            self.vel.x = self.vel.x.abs();
        } else if self.pos.x > FIELD_WIDTH - half {
            self.pos.x = FIELD_WIDTH - half;
            self.vel.x = -self.vel.x.abs();
        }

        if self.bounds().top() > FIELD_HEIGHT + 10.0 {
            self.respawn(rng);
        }
    }

    /// Fire straight down once the cooldown elapses (only while on screen)
    pub fn try_fire(&mut self, now: u64) -> Option<Bullet> {
        if self.pos.y < 0.0 || now.saturating_sub(self.last_shot_ms) <= self.shoot_delay_ms {
            return None;
        }
        self.last_shot_ms = now;
        Some(Bullet::enemy(Vec2::new(
            self.pos.x,
            self.bounds().bottom() + BULLET_HEIGHT / 2.0,
        )))
    }
}

impl Collider for EnemyShip {
    fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, Vec2::new(ENEMY_WIDTH, ENEMY_HEIGHT))
    }

    fn center(&self) -> Vec2 {
        self.pos
    }
}

pub const BOMB_SIZE: f32 = 24.0;

/// A drifting bomb that detonates on contact with anything
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrayBomb {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub blast_radius: f32,
    pub alive: bool,
}

impl StrayBomb {
    pub fn spawn(id: u32, blast_radius: f32, rng: &mut impl Rng) -> Self {
        let vx = rng.random_range(80.0..=160.0);
        Self {
            id,
            pos: Vec2::new(
                rng.random_range(BOMB_SIZE..(FIELD_WIDTH - BOMB_SIZE)),
                -BOMB_SIZE,
            ),
            vel: Vec2::new(
                if rng.random_bool(0.5) { vx } else { -vx },
                rng.random_range(90.0..=140.0),
            ),
            blast_radius,
            alive: true,
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.pos += self.vel * dt;

        let half = BOMB_SIZE / 2.0;
        if self.pos.x < half {
            self.pos.x = half;
            self.vel.x = self.vel.x.abs();
        } else if self.pos.x > FIELD_WIDTH - half {
            self.pos.x = FIELD_WIDTH - half;
            self.vel.x = -self.vel.x.abs();
        }

        if self.pos.y - half > FIELD_HEIGHT {
            self.alive = false;
        }
    }
}

impl Collider for StrayBomb {
    fn bounds(&self) -> Aabb {
        Aabb::from_center(self.pos, Vec2::splat(BOMB_SIZE))
    }

    fn center(&self) -> Vec2 {
        self.pos
    }
}

/// Frames an explosion takes to reach full size
pub const EXPLOSION_FRAMES: u32 = 20;

/// A blast; damage is applied once on creation, the rest is animation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Explosion {
    pub center: Vec2,
    /// Final radius, also the damage radius
    pub radius: f32,
    pub frame: u32,
    pub alive: bool,
}

impl Explosion {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self {
            center,
            radius,
            frame: 0,
            alive: true,
        }
    }

    /// Radius being drawn this frame
    pub fn current_radius(&self) -> f32 {
        self.radius * (self.frame as f32 / EXPLOSION_FRAMES as f32).min(1.0)
    }

    pub fn advance(&mut self) {
        self.frame += 1;
        if self.frame >= EXPLOSION_FRAMES {
            self.alive = false;
        }
    }
}

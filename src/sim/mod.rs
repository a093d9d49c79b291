//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering, audio or persistence I/O

pub mod aabb;
pub mod autopilot;
pub mod boss;
pub mod collision;
pub mod combat;
pub mod entities;
pub mod level;
pub mod ship;
pub mod state;
pub mod tick;

pub use aabb::Aabb;
pub use boss::{AttackPattern, Boss, BossKind, MovementPattern};
pub use collision::{Collider, overlaps, within_radius};
pub use entities::{
    Asteroid, Bullet, BulletOwner, EnemyShip, Explosion, PowerUp, PowerUpKind, StrayBomb,
};
pub use ship::{HitOutcome, Ship, ShipClass, ShipStats, Shield};
pub use state::{EntityView, GameEvent, GameOverReason, GamePhase, GameState, KillCause};
pub use tick::{TickInput, tick};

//! Asteroid Shooter - a 2D arcade shoot-'em-up
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, combat, level progression)
//! - `session`: Entry points a front-end drives once per frame
//! - `renderer`: Read-only render frame projection
//! - `audio`: Procedural sound synthesis and playback dispatch
//! - `persistence`: JSON save/load for scores, coins, shop and settings
//! - `tuning`: Data-driven game balance

pub mod audio;
pub mod highscores;
pub mod persistence;
pub mod profile;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod shop;
pub mod sim;
pub mod tuning;

pub use highscores::HighScores;
pub use session::{Progress, Session, SessionConfig, SessionOutcome};
pub use settings::Settings;
pub use tuning::Tuning;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Fixed simulation rate
    pub const SIM_HZ: u32 = 60;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / SIM_HZ as f32;
    /// Fixed simulation timestep in milliseconds
    pub const SIM_DT_MS: f64 = 1000.0 / SIM_HZ as f64;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Play field dimensions
    pub const FIELD_WIDTH: f32 = 1280.0;
    pub const FIELD_HEIGHT: f32 = 1280.0;

    /// Ship defaults
    pub const SHIP_WIDTH: f32 = 50.0;
    pub const SHIP_HEIGHT: f32 = 50.0;
    /// Gap between the ship's bottom edge and the field bottom at spawn
    pub const SHIP_BOTTOM_MARGIN: f32 = 10.0;
    /// Default shot cooldown
    pub const SHOOT_DELAY_MS: u64 = 250;
    /// Fraction of max speed added per tick while a direction is held
    pub const SHIP_ACCEL: f32 = 0.25;
    /// Velocity decay applied every tick
    pub const SHIP_FRICTION: f32 = 0.92;
    /// Extra decay when no movement key is held
    pub const SHIP_DECEL: f32 = 0.85;
    /// Cosmetic tilt at full horizontal speed (radians)
    pub const SHIP_MAX_BANK: f32 = 0.26;
    /// Fraction of velocity kept (and reversed) when hitting the field edge
    pub const SHIP_EDGE_BOUNCE: f32 = 0.3;

    /// Player bullets
    pub const BULLET_WIDTH: f32 = 5.0;
    pub const BULLET_HEIGHT: f32 = 10.0;
    pub const BULLET_SPEED: f32 = 600.0;
    /// Spread of the outer triple-shot rays (radians, ~15 degrees)
    pub const TRIPLE_SHOT_SPREAD: f32 = 0.2618;
    /// Horizontal gap between parallel double-shot lanes
    pub const DOUBLE_SHOT_SPACING: f32 = 12.0;

    /// Hostile bullets
    pub const ENEMY_BULLET_SPEED: f32 = 300.0;
    pub const BOSS_BULLET_SPEED: f32 = 260.0;

    /// Score values
    pub const ASTEROID_KILL_SCORE: u64 = 50;
    pub const ENEMY_KILL_SCORE: u64 = 100;
    pub const EXPLOSION_KILL_SCORE: u64 = 25;
    pub const POWER_UP_BONUS: u64 = 25;
    pub const BOSS_BONUS_PER_TIER: u64 = 1000;

    /// Player name limits
    pub const MAX_NAME_LEN: usize = 15;
    pub const DEFAULT_PLAYER_NAME: &str = "Player";

    /// Highest level a session may start at, whatever the level skip says
    pub const MAX_STARTING_LEVEL: u32 = 100;
}

/// True if `pos` lies inside the play field expanded by `margin` on every side
#[inline]
pub fn in_field(pos: Vec2, margin: f32) -> bool {
    pos.x >= -margin
        && pos.x <= consts::FIELD_WIDTH + margin
        && pos.y >= -margin
        && pos.y <= consts::FIELD_HEIGHT + margin
}

/// Rotate a vector by `angle` radians (screen coordinates, y down)
#[inline]
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(v)
}

/// Clean up a player-entered name: trimmed, at most 15 chars, never empty
pub fn sanitize_name(name: &str) -> String {
    let trimmed: String = name.trim().chars().take(consts::MAX_NAME_LEN).collect();
    if trimmed.is_empty() {
        consts::DEFAULT_PLAYER_NAME.to_string()
    } else {
        trimmed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_name() {
        assert_eq!(sanitize_name("  Ace  "), "Ace");
        assert_eq!(sanitize_name(""), "Player");
        assert_eq!(sanitize_name("abcdefghijklmnopqrstuvwxyz").len(), 15);
    }

    #[test]
    fn test_rotate_quarter_turn() {
        let v = rotate(Vec2::new(1.0, 0.0), std::f32::consts::FRAC_PI_2);
        assert!(v.x.abs() < 1e-5);
        assert!((v.y - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_in_field() {
        assert!(in_field(Vec2::new(10.0, 10.0), 0.0));
        assert!(!in_field(Vec2::new(-5.0, 10.0), 0.0));
        assert!(in_field(Vec2::new(-5.0, 10.0), 10.0));
    }
}

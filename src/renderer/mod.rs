//! Read-only render projection
//!
//! A `RenderFrame` is everything a front-end needs to draw one tick: a flat
//! sprite list in draw order plus HUD values. It never feeds back into the
//! simulation and serialises to JSON for out-of-process front-ends.

pub mod shapes;

use serde::{Deserialize, Serialize};

pub use shapes::{Sprite, SpriteKind};

use crate::sim::{GamePhase, GameState, PowerUpKind};

/// A power-up shown in the HUD with its remaining time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HudPowerUp {
    pub kind: PowerUpKind,
    pub remaining_ms: u64,
}

/// Heads-up display values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hud {
    pub score: u64,
    pub level: u32,
    pub next_threshold: u64,
    pub player_name: String,
    pub extra_hits: u32,
    pub power_ups: Vec<HudPowerUp>,
    /// (current, max) while a boss is alive
    pub boss_health: Option<(u32, u32)>,
    /// Centre-screen message for timed pauses and game over
    pub banner: Option<String>,
}

/// One frame's worth of drawing data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderFrame {
    pub time_ms: u64,
    pub sprites: Vec<Sprite>,
    pub hud: Hud,
}

impl RenderFrame {
    /// Snapshot `state` for drawing
    pub fn project(state: &GameState) -> Self {
        let now = state.time_ms;
        let sprites = state.entities().map(|view| shapes::sprite(view, now)).collect();

        let power_ups = state
            .ship
            .power_ups
            .iter()
            .filter(|p| now < p.expires_at_ms)
            .map(|p| HudPowerUp {
                kind: p.kind,
                remaining_ms: p.expires_at_ms - now,
            })
            .collect();

        let banner = match state.phase {
            GamePhase::Transitioning { .. } => Some(format!("Level {} complete!", state.level)),
            GamePhase::FinalBossCinematic { .. } => Some("The final boss has fallen!".to_string()),
            GamePhase::GameOver(_) => Some("Game Over".to_string()),
            GamePhase::Active | GamePhase::BossFight => None,
        };

        Self {
            time_ms: now,
            sprites,
            hud: Hud {
                score: state.score,
                level: state.level,
                next_threshold: state.next_threshold,
                player_name: state.ship.name.clone(),
                extra_hits: state.ship.extra_hits,
                power_ups,
                boss_health: state.boss.as_ref().map(|b| (b.health, b.max_health)),
                banner,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{GameOverReason, Ship, ShipStats};
    use crate::tuning::Tuning;

    fn state(level: u32) -> GameState {
        let tuning = Tuning::default();
        let ship = Ship::new(&ShipStats::default(), "Ace", &[], &tuning, 0);
        GameState::new(3, tuning, ship, level, 0)
    }

    #[test]
    fn test_projection_counts() {
        let state = state(2);
        let frame = RenderFrame::project(&state);
        assert_eq!(frame.sprites.len(), 1 + state.asteroids.len() + state.enemies.len());
        assert_eq!(frame.sprites[0].kind, SpriteKind::Ship);
        assert_eq!(frame.hud.level, 2);
        assert_eq!(frame.hud.player_name, "Ace");
        assert!(frame.hud.banner.is_none());
    }

    #[test]
    fn test_boss_health_in_hud() {
        let frame = RenderFrame::project(&state(5));
        assert_eq!(frame.hud.boss_health, Some((40, 40)));
        assert!(frame.sprites.iter().any(|s| s.kind == SpriteKind::Boss));
    }

    #[test]
    fn test_game_over_banner() {
        let mut state = state(1);
        state.end(GameOverReason::Quit);
        let frame = RenderFrame::project(&state);
        assert_eq!(frame.hud.banner.as_deref(), Some("Game Over"));
    }

    #[test]
    fn test_frame_serializes() {
        let frame = RenderFrame::project(&state(1));
        let json = serde_json::to_string(&frame).unwrap();
        let back: RenderFrame = serde_json::from_str(&json).unwrap();
        assert_eq!(back.sprites.len(), frame.sprites.len());
    }
}

//! Fixed timestep simulation tick
//!
//! One tick moves everything, then resolves collisions, then advances the
//! level state machine. No step sees a half-updated world.

use glam::Vec2;

use super::autopilot;
use super::combat;
use super::state::{GameEvent, GameOverReason, GamePhase, GameState};
use crate::consts::*;

/// Input sampled once per tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub fire: bool,
    /// End the session
    pub quit: bool,
    /// Idle/demo mode - AI plays the game
    pub idle_mode: bool,
}

impl TickInput {
    /// Held direction keys as a vector (y down); opposite keys cancel
    pub fn direction(&self) -> Vec2 {
        let axis = |neg: bool, pos: bool| f32::from(pos as u8) - f32::from(neg as u8);
        Vec2::new(axis(self.left, self.right), axis(self.up, self.down))
    }
}

/// Advance the game state by one fixed timestep ending at `now` (ms)
pub fn tick(state: &mut GameState, input: &TickInput, now: u64) {
    state.events.clear();
    if state.is_over() {
        return;
    }
    if input.quit {
        state.end(GameOverReason::Quit);
        return;
    }

    let input = if input.idle_mode {
        autopilot::drive(state, now)
    } else {
        input.clone()
    };

    state.time_ms = now;
    state.ticks += 1;

    advance(state, &input, now);
    if state.in_play() {
        combat::resolve(state, now);
    }
    super::level::update(state, now);

    state.check_invariants();
}

/// Move every entity one step and collect fresh shots
fn advance(state: &mut GameState, input: &TickInput, now: u64) {
    let ship = &mut state.ship;
    ship.expire_power_ups(now);
    ship.steer(input.direction(), now);
    ship.advance(SIM_DT);

    let in_play = state.in_play();
    if in_play && input.fire {
        let shots = state.ship.try_fire(now);
        if !shots.is_empty() {
            state.events.push(GameEvent::Shot {
                bullets: shots.len(),
            });
            state.player_bullets.extend(shots);
        }
    }

    for asteroid in &mut state.asteroids {
        asteroid.advance(SIM_DT, &mut state.rng);
    }
    for enemy in &mut state.enemies {
        enemy.advance(SIM_DT, &mut state.rng);
        if in_play && let Some(bullet) = enemy.try_fire(now) {
            state.enemy_bullets.push(bullet);
        }
    }
    if let Some(boss) = state.boss.as_mut().filter(|b| b.alive) {
        boss.advance(SIM_DT, now);
        if state.phase == GamePhase::BossFight {
            state.boss_bullets.extend(boss.try_fire(now, state.ship.pos));
        }
    }

    for bullet in state
        .player_bullets
        .iter_mut()
        .chain(&mut state.enemy_bullets)
        .chain(&mut state.boss_bullets)
    {
        bullet.advance(SIM_DT);
    }
    for power_up in &mut state.power_ups {
        power_up.advance(SIM_DT);
    }
    for bomb in &mut state.bombs {
        bomb.advance(SIM_DT);
    }
    for explosion in &mut state.explosions {
        explosion.advance();
    }

    state.player_bullets.retain(|b| b.alive);
    state.enemy_bullets.retain(|b| b.alive);
    state.boss_bullets.retain(|b| b.alive);
    state.power_ups.retain(|p| p.alive);
    state.bombs.retain(|b| b.alive);
    state.explosions.retain(|e| e.alive);
}

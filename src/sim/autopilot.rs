//! Idle/demo mode pilot
//!
//! Produces a `TickInput` from the current state: fire constantly, sidestep
//! whatever is about to land on the ship, and otherwise drift toward pickups
//! or the nearest target.

use glam::Vec2;

use super::collision::Collider;
use super::state::GameState;
use super::tick::TickInput;
use crate::consts::*;

/// How far ahead (seconds) hazards are extrapolated
const LOOKAHEAD_S: f32 = 1.2;
/// Extra clearance kept around the hull when dodging
const DODGE_MARGIN: f32 = 30.0;
/// Close enough to a target column to stop steering
const DEADZONE: f32 = 8.0;

/// A hazard projected onto the ship's row
struct Threat {
    /// Seconds until it reaches the ship's row
    eta: f32,
    /// Its x when it gets there
    x: f32,
    half_width: f32,
}

fn project(ship_pos: Vec2, pos: Vec2, vel: Vec2, half_width: f32) -> Option<Threat> {
    let dy = ship_pos.y - pos.y;
    let closing = if dy > 0.0 { vel.y } else { -vel.y };
    if dy.abs() < 1.0 {
        return Some(Threat {
            eta: 0.0,
            x: pos.x,
            half_width,
        });
    }
    if closing <= 0.0 {
        return None;
    }
    let eta = dy.abs() / closing;
    (eta <= LOOKAHEAD_S).then(|| Threat {
        eta,
        x: pos.x + vel.x * eta,
        half_width,
    })
}

/// Decide this tick's input for the ship
pub fn drive(state: &GameState, now: u64) -> TickInput {
    let ship = &state.ship;
    let ship_half = ship.size.x / 2.0;
    let pos = ship.pos;

    let hazards = state
        .asteroids
        .iter()
        .map(|a| (a.pos, a.vel, a.size / 2.0))
        .chain(
            state
                .enemies
                .iter()
                .map(|e| (e.pos, e.vel, e.bounds().size().x / 2.0)),
        )
        .chain(
            state
                .enemy_bullets
                .iter()
                .chain(&state.boss_bullets)
                .map(|b| (b.pos, b.vel, b.size.x / 2.0)),
        )
        .chain(
            state
                .bombs
                .iter()
                .map(|b| (b.pos, b.vel, b.blast_radius.min(60.0))),
        );

    let danger = hazards
        .filter_map(|(p, v, half)| project(pos, p, v, half))
        .filter(|t| (t.x - pos.x).abs() < t.half_width + ship_half + DODGE_MARGIN)
        .min_by(|a, b| a.eta.total_cmp(&b.eta));

    let target_x = match danger {
        Some(threat) => {
            let clearance = threat.half_width + ship_half + DODGE_MARGIN * 2.0;
            let left = threat.x - clearance;
            let right = threat.x + clearance;
            // Dodge toward the open side; walls force the other way
            let prefer_left = pos.x < threat.x;
            if prefer_left && left > ship_half {
                left
            } else if right < FIELD_WIDTH - ship_half {
                right
            } else {
                left
            }
        }
        None => calm_target(state, now).unwrap_or(FIELD_WIDTH / 2.0),
    };

    let home_y = FIELD_HEIGHT - SHIP_BOTTOM_MARGIN - ship.size.y / 2.0;
    let dx = target_x - pos.x;
    TickInput {
        left: dx < -DEADZONE,
        right: dx > DEADZONE,
        up: false,
        down: pos.y < home_y - DEADZONE,
        fire: true,
        quit: false,
        idle_mode: true,
    }
}

/// Where to go when nothing is about to hit: pickups first, then something to shoot
fn calm_target(state: &GameState, now: u64) -> Option<f32> {
    let pos = state.ship.pos;

    let pickup = state
        .power_ups
        .iter()
        .filter(|p| p.pos.y > FIELD_HEIGHT / 2.0)
        .min_by(|a, b| a.pos.distance_squared(pos).total_cmp(&b.pos.distance_squared(pos)))
        .map(|p| p.pos.x);
    if pickup.is_some() {
        return pickup;
    }

    if let Some(boss) = state.boss.as_ref() {
        // Weave under the boss
        let wobble = ((now as f32 / 700.0).sin()) * 120.0;
        return Some((boss.pos.x + wobble).clamp(0.0, FIELD_WIDTH));
    }

    state
        .asteroids
        .iter()
        .map(|a| a.pos)
        .chain(state.enemies.iter().map(|e| e.pos))
        .filter(|p| p.y > 0.0)
        .max_by(|a, b| a.y.total_cmp(&b.y))
        .map(|p| p.x)
}

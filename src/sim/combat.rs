//! Collision & combat resolver
//!
//! Runs once per tick after everything has moved. Rules are applied in a
//! fixed order and each one skips entities an earlier rule already killed.
//! Dead entities are swept at the end so indices stay stable throughout.

use glam::Vec2;
use rand::Rng;

use super::collision::{Collider, overlaps, within_radius};
use super::entities::{Bullet, Explosion, PowerUp, PowerUpKind};
use super::ship::HitOutcome;
use super::state::{GameEvent, GameOverReason, GameState, KillCause};
use crate::consts::*;

/// Explosion drawn where the ship dies
const SHIP_EXPLOSION_RADIUS: f32 = 80.0;
/// Explosion drawn where a hazard is shot down
const KILL_EXPLOSION_RADIUS: f32 = 40.0;

/// What set off a bomb
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlastTrigger {
    /// Ran into a hazard or the ship; the blast can hurt the player
    Contact,
    /// Shot down by the player; the blast spares the ship
    ShotDown,
}

/// Resolve every collision for this tick
pub fn resolve(state: &mut GameState, now: u64) {
    boss_vs_player_bullets(state);
    bombs_vs_targets(state, now);
    asteroids_vs_player_bullets(state, now);
    enemies_vs_player_bullets(state, now);
    ship_vs_power_ups(state, now);
    ship_vs_hazards(state, now);
    sweep_dead(state);
}

fn boss_vs_player_bullets(state: &mut GameState) {
    let Some(boss) = state.boss.as_mut().filter(|b| b.alive) else {
        return;
    };
    let area = boss.bounds();

    let mut hits = 0;
    for bullet in state.player_bullets.iter_mut().filter(|b| b.alive) {
        if area.overlaps(&bullet.bounds()) {
            bullet.alive = false;
            hits += 1;
        }
    }
    if hits == 0 {
        return;
    }

    if boss.take_damage(hits) {
        log::debug!("Boss {} destroyed by {hits} hits", boss.id);
    }
    let health = boss.health;
    state.events.push(GameEvent::BossHit { health });
}

fn bombs_vs_targets(state: &mut GameState, now: u64) {
    for i in 0..state.bombs.len() {
        if !state.bombs[i].alive {
            continue;
        }
        let area = state.bombs[i].bounds();

        let hazard = state
            .asteroids
            .iter()
            .any(|a| a.alive && area.overlaps(&a.bounds()))
            || state
                .enemies
                .iter()
                .any(|e| e.alive && area.overlaps(&e.bounds()))
            || state
                .enemy_bullets
                .iter()
                .any(|b| b.alive && area.overlaps(&b.bounds()));
        let shot = match state
            .player_bullets
            .iter_mut()
            .find(|b| b.alive && area.overlaps(&b.bounds()))
        {
            Some(bullet) => {
                bullet.alive = false;
                true
            }
            None => false,
        };

        if hazard {
            detonate(state, i, BlastTrigger::Contact, now);
        } else if shot {
            detonate(state, i, BlastTrigger::ShotDown, now);
        }
    }
}

/// Blow up bomb `first` and everything its blast chains into
pub fn detonate(state: &mut GameState, first: usize, trigger: BlastTrigger, now: u64) {
    state.bombs[first].alive = false;
    let mut pending = vec![first];
    let mut player_hit = false;

    while let Some(i) = pending.pop() {
        let center = state.bombs[i].pos;
        let radius = state.bombs[i].blast_radius;
        log::debug!("Bomb {} detonated at {center} ({trigger:?})", state.bombs[i].id);
        state.explosions.push(Explosion::new(center, radius));
        state.events.push(GameEvent::BombDetonated { pos: center });

        pending.extend(area_kill(state, center, radius, now));

        if trigger == BlastTrigger::Contact
            && !player_hit
            && state.ship.alive
            && within_radius(center, radius, state.ship.center())
        {
            player_hit = true;
            hit_ship(state, now);
        }
    }
}

/// Destroy everything within `radius` of `center`
///
/// Returns the indices of bombs caught in the blast; they are already marked
/// dead and must be detonated by the caller.
pub fn area_kill(state: &mut GameState, center: Vec2, radius: f32, now: u64) -> Vec<usize> {
    for i in 0..state.asteroids.len() {
        if state.asteroids[i].alive && in_blast(center, radius, &state.asteroids[i]) {
            destroy_asteroid(state, i, KillCause::Explosion, now);
        }
    }
    for i in 0..state.enemies.len() {
        if state.enemies[i].alive && in_blast(center, radius, &state.enemies[i]) {
            destroy_enemy(state, i, KillCause::Explosion, now);
        }
    }
    for bullet in state.enemy_bullets.iter_mut() {
        if within_radius(center, radius, bullet.center()) {
            bullet.alive = false;
        }
    }
    for power_up in state.power_ups.iter_mut() {
        if within_radius(center, radius, power_up.center()) {
            power_up.alive = false;
        }
    }

    let mut chained = Vec::new();
    for (i, bomb) in state.bombs.iter_mut().enumerate() {
        if bomb.alive && within_radius(center, radius, bomb.center()) {
            bomb.alive = false;
            chained.push(i);
        }
    }
    chained
}

fn in_blast(center: Vec2, radius: f32, target: &impl Collider) -> bool {
    within_radius(center, radius, target.center())
}

fn asteroids_vs_player_bullets(state: &mut GameState, now: u64) {
    for i in 0..state.asteroids.len() {
        if !state.asteroids[i].alive {
            continue;
        }
        let area = state.asteroids[i].bounds();
        let Some(bullet) = state
            .player_bullets
            .iter_mut()
            .find(|b| b.alive && area.overlaps(&b.bounds()))
        else {
            continue;
        };
        bullet.alive = false;
        destroy_asteroid(state, i, KillCause::Bullet, now);
    }
}

fn enemies_vs_player_bullets(state: &mut GameState, now: u64) {
    for i in 0..state.enemies.len() {
        if !state.enemies[i].alive {
            continue;
        }
        let area = state.enemies[i].bounds();
        let Some(bullet) = state
            .player_bullets
            .iter_mut()
            .find(|b| b.alive && area.overlaps(&b.bounds()))
        else {
            continue;
        };
        bullet.alive = false;
        destroy_enemy(state, i, KillCause::Bullet, now);
    }
}

fn ship_vs_power_ups(state: &mut GameState, now: u64) {
    if !state.ship.alive {
        return;
    }
    let area = state.ship.bounds();
    let duration = state.tuning.power_up_duration_ms;
    let max_stack = state.tuning.max_double_shot_stack;

    for i in 0..state.power_ups.len() {
        let power_up = &mut state.power_ups[i];
        if !power_up.alive || !area.overlaps(&power_up.bounds()) {
            continue;
        }
        power_up.alive = false;
        let kind = power_up.kind;

        state.ship.add_power_up(kind, now, duration, max_stack);
        state.award(POWER_UP_BONUS);
        log::debug!("Picked up {kind:?}");
        state.events.push(GameEvent::PowerUpCollected { kind });
    }
}

fn ship_vs_hazards(state: &mut GameState, now: u64) {
    for i in 0..state.asteroids.len() {
        if !state.ship.alive {
            return;
        }
        if state.asteroids[i].alive && overlaps(&state.ship, &state.asteroids[i]) {
            hit_ship(state, now);
            destroy_asteroid(state, i, KillCause::Collision, now);
        }
    }

    for i in 0..state.enemies.len() {
        if !state.ship.alive {
            return;
        }
        if state.enemies[i].alive && overlaps(&state.ship, &state.enemies[i]) {
            hit_ship(state, now);
            destroy_enemy(state, i, KillCause::Collision, now);
        }
    }

    let ship_area = state.ship.bounds();
    for hostile in [BulletGroup::Enemy, BulletGroup::Boss] {
        let count = hostile.bullets(state).len();
        for i in 0..count {
            if !state.ship.alive {
                return;
            }
            let bullet = &mut hostile.bullets(state)[i];
            if !bullet.alive || !ship_area.overlaps(&bullet.bounds()) {
                continue;
            }
            bullet.alive = false;
            hit_ship(state, now);
        }
    }

    for i in 0..state.bombs.len() {
        if !state.ship.alive {
            return;
        }
        if state.bombs[i].alive && overlaps(&state.ship, &state.bombs[i]) {
            detonate(state, i, BlastTrigger::Contact, now);
        }
    }
}

/// Hostile bullet lists the ship can be hit by
#[derive(Clone, Copy)]
enum BulletGroup {
    Enemy,
    Boss,
}

impl BulletGroup {
    fn bullets(self, state: &mut GameState) -> &mut Vec<Bullet> {
        match self {
            BulletGroup::Enemy => &mut state.enemy_bullets,
            BulletGroup::Boss => &mut state.boss_bullets,
        }
    }
}

/// Apply a hazard hit to the ship
fn hit_ship(state: &mut GameState, now: u64) {
    match state.ship.take_hit(now) {
        HitOutcome::Shielded => {}
        HitOutcome::Absorbed => {
            log::info!("Hit absorbed, {} spare hits left", state.ship.extra_hits);
            state.events.push(GameEvent::HitAbsorbed);
        }
        HitOutcome::Destroyed => {
            state
                .explosions
                .push(Explosion::new(state.ship.pos, SHIP_EXPLOSION_RADIUS));
            state.events.push(GameEvent::ShipDestroyed);
            state.end(GameOverReason::ShipDestroyed);
        }
    }
}

/// Kill asteroid `i`, score it, and spawn its replacement
fn destroy_asteroid(state: &mut GameState, i: usize, cause: KillCause, now: u64) {
    let asteroid = &mut state.asteroids[i];
    asteroid.alive = false;
    let (id, pos) = (asteroid.id, asteroid.pos);

    match cause {
        KillCause::Bullet => {
            state.award(ASTEROID_KILL_SCORE);
            state.explosions.push(Explosion::new(pos, KILL_EXPLOSION_RADIUS));
        }
        KillCause::Explosion => {
            state.award(EXPLOSION_KILL_SCORE);
        }
        KillCause::Collision => {}
    }
    state.events.push(GameEvent::AsteroidDestroyed { id, pos, cause });

    let replacement = state.new_asteroid();
    state.asteroids.push(replacement);

    if cause == KillCause::Bullet {
        let chance = state.tuning.asteroid_drop_chance;
        maybe_drop_power_up(state, pos, chance, now);
    }
}

/// Kill enemy `i`, score it, and spawn its replacement
fn destroy_enemy(state: &mut GameState, i: usize, cause: KillCause, now: u64) {
    let enemy = &mut state.enemies[i];
    enemy.alive = false;
    let (id, pos) = (enemy.id, enemy.pos);

    match cause {
        KillCause::Bullet => {
            state.award(ENEMY_KILL_SCORE);
            state.explosions.push(Explosion::new(pos, KILL_EXPLOSION_RADIUS));
        }
        KillCause::Explosion => {
            state.award(EXPLOSION_KILL_SCORE);
        }
        KillCause::Collision => {}
    }
    state.events.push(GameEvent::EnemyDestroyed { id, pos, cause });

    let replacement = state.new_enemy(now);
    state.enemies.push(replacement);

    if cause == KillCause::Bullet {
        let chance = state.tuning.enemy_drop_chance;
        maybe_drop_power_up(state, pos, chance, now);
    }
}

/// Roll for a drop, throttled by the minimum gap between drops
fn maybe_drop_power_up(state: &mut GameState, pos: Vec2, chance: f64, now: u64) {
    let gap = state.tuning.min_drop_gap_ms;
    let ready = state
        .last_power_up_ms
        .is_none_or(|last| now.saturating_sub(last) >= gap);
    if !ready || !state.rng.random_bool(chance.clamp(0.0, 1.0)) {
        return;
    }

    let kind = PowerUpKind::random(&mut state.rng);
    let id = state.next_entity_id();
    state.power_ups.push(PowerUp::new(id, pos, kind));
    state.last_power_up_ms = Some(now);
    state.events.push(GameEvent::PowerUpSpawned { kind });
}

fn sweep_dead(state: &mut GameState) {
    state.asteroids.retain(|a| a.alive);
    state.enemies.retain(|e| e.alive);
    state.player_bullets.retain(|b| b.alive);
    state.enemy_bullets.retain(|b| b.alive);
    state.boss_bullets.retain(|b| b.alive);
    state.power_ups.retain(|p| p.alive);
    state.bombs.retain(|b| b.alive);
}

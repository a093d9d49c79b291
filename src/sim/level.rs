//! Level progression state machine
//!
//! Active → Transitioning → (wave | boss) on score thresholds, boss kills
//! advancing the level directly, and the stray-bomb timer during regular
//! waves.

use super::boss::{Boss, BossKind};
use super::entities::Explosion;
use super::state::{GameEvent, GamePhase, GameState};

/// Explosion drawn where a boss dies
const BOSS_EXPLOSION_RADIUS: f32 = 200.0;

/// Spawn whatever the current level starts with
pub fn begin_level(state: &mut GameState, now: u64) {
    if state.tuning.is_boss_level(state.level) && !state.boss_just_defeated {
        spawn_boss(state, now);
    } else {
        spawn_wave(state, now);
    }
    state.boss_just_defeated = false;
    state.events.push(GameEvent::LevelStarted { level: state.level });
}

/// Replace the hazards with a fresh regular wave sized for the current level
pub fn spawn_wave(state: &mut GameState, now: u64) {
    let asteroids = state.tuning.asteroid_count(state.level);
    let enemies = state.tuning.enemy_count(state.level);

    state.asteroids.clear();
    state.enemies.clear();
    for _ in 0..asteroids {
        let asteroid = state.new_asteroid();
        state.asteroids.push(asteroid);
    }
    for _ in 0..enemies {
        let enemy = state.new_enemy(now);
        state.enemies.push(enemy);
    }
    state.phase = GamePhase::Active;
    state.last_bomb_ms = now;

    log::info!(
        "Level {} wave: {asteroids} asteroids, {enemies} enemies",
        state.level
    );
}

/// Clear every regular hazard and bring in the boss for this level
pub fn spawn_boss(state: &mut GameState, now: u64) {
    let tuning = &state.tuning;
    let tier = tuning.boss_tier(state.level);
    let kind = if tier == tuning.final_boss_tier {
        BossKind::Final
    } else if tuning.is_mega_boss(tier) {
        BossKind::Mega
    } else {
        BossKind::Standard
    };

    clear_hazards(state);
    state.bombs.clear();

    let id = state.next_entity_id();
    let boss = Boss::spawn(id, tier, kind, now);
    log::info!(
        "Level {}: {kind:?} boss tier {tier} with {} health",
        state.level,
        boss.health
    );
    state.boss = Some(boss);
    state.phase = GamePhase::BossFight;
    state.events.push(GameEvent::BossSpawned { tier, kind });
}

fn clear_hazards(state: &mut GameState) {
    state.asteroids.clear();
    state.enemies.clear();
    state.enemy_bullets.clear();
    state.boss_bullets.clear();
}

/// Advance the level state machine after combat has resolved
pub fn update(state: &mut GameState, now: u64) {
    match state.phase {
        GamePhase::Active => {
            if now.saturating_sub(state.last_bomb_ms) >= state.tuning.bomb_interval_ms {
                state.last_bomb_ms = now;
                let bomb = state.new_bomb();
                log::debug!("Stray bomb {} incoming", bomb.id);
                state.events.push(GameEvent::BombSpawned { id: bomb.id });
                state.bombs.push(bomb);
            }
            if state.score >= state.next_threshold {
                start_transition(state, now);
            }
        }
        GamePhase::Transitioning { started_ms } => {
            if now.saturating_sub(started_ms) >= state.tuning.transition_ms {
                state.level = state.level.saturating_add(1);
                begin_level(state, now);
            }
        }
        GamePhase::BossFight => {
            if let Some(boss) = state.boss.take_if(|b| !b.alive) {
                boss_defeated(state, boss, now);
            }
        }
        GamePhase::FinalBossCinematic { started_ms } => {
            if now.saturating_sub(started_ms) >= state.tuning.final_boss_cinematic_ms {
                spawn_wave(state, now);
                state.events.push(GameEvent::LevelStarted { level: state.level });
            }
        }
        GamePhase::GameOver(_) => {}
    }
}

fn start_transition(state: &mut GameState, now: u64) {
    log::info!(
        "Level {} cleared at score {} (threshold {})",
        state.level,
        state.score,
        state.next_threshold
    );
    clear_hazards(state);
    state.bombs.clear();
    state.next_threshold += state.tuning.level_threshold_step;
    state.phase = GamePhase::Transitioning { started_ms: now };
    state.events.push(GameEvent::LevelTransition {
        from_level: state.level,
    });
}

fn boss_defeated(state: &mut GameState, boss: Boss, now: u64) {
    let bonus = state.award(boss.bonus());
    log::info!(
        "{:?} boss tier {} defeated, bonus {bonus}",
        boss.kind,
        boss.tier
    );

    state
        .explosions
        .push(Explosion::new(boss.pos, BOSS_EXPLOSION_RADIUS));
    state.boss_bullets.clear();
    state.events.push(GameEvent::BossDefeated {
        tier: boss.tier,
        kind: boss.kind,
        bonus,
    });

    state.next_threshold = state.score + state.tuning.level_threshold_step;
    state.boss_just_defeated = true;
    state.level = state.level.saturating_add(1);

    if boss.kind == BossKind::Final {
        state.final_boss_defeated = true;
        state.events.push(GameEvent::FinalBossDefeated);
        state.phase = GamePhase::FinalBossCinematic { started_ms: now };
    } else {
        spawn_wave(state, now);
        state.events.push(GameEvent::LevelStarted { level: state.level });
    }
}

//! End-to-end session scenarios
//!
//! Each test drives a real `Session` tick by tick, nudging the world through
//! `state_mut` only to set up the situation under test.

#![allow(clippy::unwrap_used)]

use asteroid_shooter::consts::SIM_DT_MS;
use asteroid_shooter::session::TickOutput;
use asteroid_shooter::sim::{Bullet, GameEvent, GamePhase, KillCause, TickInput};
use asteroid_shooter::tuning::FinalBossPolicy;
use asteroid_shooter::{Progress, Session, SessionConfig, Tuning};
use glam::Vec2;

const FIELD_CENTER: Vec2 = Vec2::new(640.0, 640.0);

/// A session plus its tick clock
struct Run {
    session: Session,
    ticks: u64,
}

impl Run {
    fn start(starting_level: u32, seed: u64) -> Self {
        let config = SessionConfig {
            player_name: "Tester".into(),
            starting_level,
            seed,
            ..Default::default()
        };
        Self {
            session: Session::start(config, 0),
            ticks: 0,
        }
    }

    fn now(&self) -> u64 {
        (self.ticks as f64 * SIM_DT_MS) as u64
    }

    fn step(&mut self) -> TickOutput {
        self.step_with(&TickInput::default())
    }

    fn step_with(&mut self, input: &TickInput) -> TickOutput {
        self.ticks += 1;
        let now = self.now();
        self.session.tick(input, now)
    }

    /// Tick until `done` holds, failing after `limit` ticks
    fn step_until(&mut self, limit: u64, done: impl Fn(&Session) -> bool) {
        for _ in 0..limit {
            if done(&self.session) {
                return;
            }
            self.step();
        }
        assert!(done(&self.session), "condition not reached in {limit} ticks");
    }
}

/// A stationary player bullet that will overlap `target` after one tick
fn bullet_at(target: Vec2) -> Bullet {
    Bullet::player(target + Vec2::new(0.0, 5.0), 0.0)
}

#[test]
fn test_shot_asteroid_is_replaced_and_scored() {
    let mut run = Run::start(1, 11);
    let state = run.session.state_mut();
    assert_eq!(state.asteroids.len(), 6);

    let target = &mut state.asteroids[0];
    target.pos = FIELD_CENTER;
    target.vel = Vec2::ZERO;
    let target_id = target.id;
    state.player_bullets.push(bullet_at(FIELD_CENTER));

    let out = run.step();
    let state = run.session.state();

    assert_eq!(state.asteroids.len(), 6);
    assert!(state.asteroids.iter().all(|a| a.alive && a.id != target_id));
    assert_eq!(state.score, 50);
    assert!(state.events.iter().any(|e| matches!(
        e,
        GameEvent::AsteroidDestroyed {
            cause: KillCause::Bullet,
            ..
        }
    )));
    assert_eq!(out.frame.hud.score, 50);
}

#[test]
fn test_threshold_transitions_to_next_level() {
    let mut run = Run::start(1, 12);
    let threshold = run.session.state().next_threshold;
    assert_eq!(threshold, 1000);
    run.session.state_mut().score = threshold;

    let out = run.step();
    let started = match run.session.state().phase {
        GamePhase::Transitioning { started_ms } => started_ms,
        other => panic!("expected a transition, got {other:?}"),
    };
    assert!(out.frame.hud.banner.is_some());

    // Still paused just before the duration is up
    let transition_ms = run.session.state().tuning.transition_ms;
    while run.now() + (SIM_DT_MS.ceil() as u64) < started + transition_ms {
        run.step();
        assert_eq!(run.session.state().level, 1);
    }

    run.step_until(5, |s| s.state().phase == GamePhase::Active);
    let state = run.session.state();
    let tuning = Tuning::default();
    assert_eq!(state.level, 2);
    assert_eq!(state.asteroids.len(), tuning.asteroid_count(2));
    assert_eq!(state.asteroids.len(), 8);
    assert_eq!(state.enemies.len(), tuning.enemy_count(2));
    assert_eq!(state.next_threshold, 2000);
}

#[test]
fn test_boss_level_spawns_and_defeat_brings_next_wave() {
    let mut run = Run::start(4, 13);
    run.session.state_mut().score = 4000;
    run.step();
    assert!(matches!(
        run.session.state().phase,
        GamePhase::Transitioning { .. }
    ));

    run.step_until(200, |s| s.state().phase == GamePhase::BossFight);
    let state = run.session.state_mut();
    assert_eq!(state.level, 5);
    assert!(state.asteroids.is_empty());
    assert!(state.enemies.is_empty());
    assert!(state.enemy_bullets.is_empty());

    // Skip the entry so bullets can reach it
    let boss = state.boss.as_mut().unwrap();
    assert_eq!(boss.tier, 1);
    boss.pos = boss.anchor;
    let (health, target) = (boss.health, boss.anchor);
    for _ in 0..health {
        state.player_bullets.push(bullet_at(target));
    }
    let score_before = state.score;

    run.step();
    let state = run.session.state();
    assert!(state.boss.is_none());
    assert_eq!(state.score, score_before + 1000);
    assert_eq!(state.phase, GamePhase::Active);
    assert_eq!(state.level, 6);
    assert_eq!(state.asteroids.len(), state.tuning.asteroid_count(6));
    assert_eq!(state.next_threshold, state.score + 1000);
    assert!(
        state
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::BossDefeated { bonus: 1000, .. }))
    );
}

#[test]
fn test_bomb_blast_clears_only_nearby_asteroids() {
    let mut run = Run::start(1, 14);
    let state = run.session.state_mut();

    let offsets = [
        Vec2::new(100.0, 0.0),
        Vec2::new(-90.0, 40.0),
        Vec2::new(0.0, -120.0),
        Vec2::new(300.0, 0.0),
    ];
    state.asteroids.clear();
    for offset in offsets {
        let mut asteroid = state.new_asteroid();
        asteroid.pos = FIELD_CENTER + offset;
        asteroid.vel = Vec2::ZERO;
        state.asteroids.push(asteroid);
    }
    let outside_id = state.asteroids[3].id;

    let mut bomb = state.new_bomb();
    bomb.pos = FIELD_CENTER;
    bomb.vel = Vec2::ZERO;
    state.bombs.push(bomb);
    state.player_bullets.push(bullet_at(FIELD_CENTER));

    run.step();
    let state = run.session.state();

    assert!(state.bombs.is_empty());
    assert_eq!(state.score, 3 * 25);
    assert_eq!(state.asteroids.len(), 4);
    let outside = state.asteroids.iter().find(|a| a.id == outside_id).unwrap();
    assert!(outside.alive);
    assert_eq!(outside.pos, FIELD_CENTER + offsets[3]);
    let blasted = state
        .events
        .iter()
        .filter(|e| {
            matches!(
                e,
                GameEvent::AsteroidDestroyed {
                    cause: KillCause::Explosion,
                    ..
                }
            )
        })
        .count();
    assert_eq!(blasted, 3);
    assert!(state.ship.alive);
}

#[test]
fn test_final_boss_resets_progress() {
    let mut run = Run::start(20, 15);
    let state = run.session.state_mut();
    let boss = state.boss.as_mut().unwrap();
    assert_eq!(boss.health, 600);
    boss.pos = boss.anchor;
    let target = boss.anchor;
    for _ in 0..600 {
        state.player_bullets.push(bullet_at(target));
    }

    run.step();
    assert!(matches!(
        run.session.state().phase,
        GamePhase::FinalBossCinematic { .. }
    ));
    assert!(run.session.state().final_boss_defeated);

    run.step_until(400, |s| s.state().phase == GamePhase::Active);
    assert_eq!(run.session.state().level, 21);

    run.step_with(&TickInput {
        quit: true,
        ..Default::default()
    });
    assert!(run.session.is_over());

    let outcome = run.session.outcome();
    assert!(outcome.final_boss_defeated);
    assert_eq!(outcome.final_score, 5000 * 4);

    let mut progress = Progress::default();
    progress.coins.deposit(777);
    progress.high_scores.add_score("Old", 99_999, 40);
    progress.record(&outcome, &Tuning::default());
    assert_eq!(progress.coins.coins, 2000);
    assert_eq!(progress.high_scores.entries.len(), 1);

    let mut kept = Progress::default();
    kept.coins.deposit(777);
    let tuning = Tuning {
        final_boss_policy: FinalBossPolicy::KeepProgress,
        ..Tuning::default()
    };
    kept.record(&outcome, &tuning);
    assert_eq!(kept.coins.coins, 2777);
}

#[test]
fn test_autopilot_session_stays_consistent() {
    let mut run = Run::start(1, 99);
    let idle = TickInput {
        idle_mode: true,
        ..Default::default()
    };

    let mut last_score = 0;
    for _ in 0..60 * 60 {
        if run.session.is_over() {
            break;
        }
        let out = run.step_with(&idle);
        let state = run.session.state();

        assert!(state.score >= last_score);
        last_score = state.score;
        if state.phase == GamePhase::Active {
            assert_eq!(state.asteroids.len(), state.tuning.asteroid_count(state.level));
            assert_eq!(state.enemies.len(), state.tuning.enemy_count(state.level));
        }
        assert_eq!(out.frame.hud.score, state.score);
    }
    assert!(run.ticks > 0);
}

#[test]
fn test_same_seed_same_game() {
    let idle = TickInput {
        idle_mode: true,
        ..Default::default()
    };
    let mut a = Run::start(1, 2024);
    let mut b = Run::start(1, 2024);
    for _ in 0..600 {
        let fa = a.step_with(&idle).frame;
        let fb = b.step_with(&idle).frame;
        assert_eq!(fa, fb);
    }
}

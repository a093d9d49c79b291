//! Game state and core simulation types
//!
//! Everything a session owns lives in `GameState`; subsystems receive it by
//! mutable reference. Nothing here outlives a session.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::boss::{Boss, BossKind};
use super::entities::{
    Asteroid, Bullet, EnemyShip, Explosion, PowerUp, PowerUpKind, StrayBomb,
};
use super::ship::Ship;
use crate::audio::SoundEffect;
use crate::consts::MAX_STARTING_LEVEL;
use crate::tuning::Tuning;

/// Why a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverReason {
    ShipDestroyed,
    Quit,
}

/// Current phase of the level state machine
///
/// Spawning a wave or a boss is instantaneous, so it has no phase of its own:
/// every path out of a spawn lands in `Active` or `BossFight`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Regular wave in play
    Active,
    /// Timed pause between levels
    Transitioning { started_ms: u64 },
    /// A boss is alive and regular hazards are cleared
    BossFight,
    /// Timed pause after the final boss falls
    FinalBossCinematic { started_ms: u64 },
    GameOver(GameOverReason),
}

/// How a hazard was destroyed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KillCause {
    Bullet,
    Explosion,
    /// Rammed by the ship
    Collision,
}

/// Things that happened during a tick
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Shot { bullets: usize },
    AsteroidDestroyed { id: u32, pos: Vec2, cause: KillCause },
    EnemyDestroyed { id: u32, pos: Vec2, cause: KillCause },
    BossHit { health: u32 },
    BossDefeated { tier: u32, kind: BossKind, bonus: u64 },
    /// The last boss tier fell; the application decides what that resets
    FinalBossDefeated,
    PowerUpSpawned { kind: PowerUpKind },
    PowerUpCollected { kind: PowerUpKind },
    BombSpawned { id: u32 },
    BombDetonated { pos: Vec2 },
    /// A spare hit point soaked up a hit
    HitAbsorbed,
    ShipDestroyed,
    LevelTransition { from_level: u32 },
    LevelStarted { level: u32 },
    BossSpawned { tier: u32, kind: BossKind },
    GameOver(GameOverReason),
}

impl GameEvent {
    /// Sound cue for this event, if any
    pub fn sound(&self) -> Option<SoundEffect> {
        match self {
            GameEvent::Shot { .. } => Some(SoundEffect::Laser),
            GameEvent::AsteroidDestroyed { .. }
            | GameEvent::EnemyDestroyed { .. }
            | GameEvent::BossDefeated { .. }
            | GameEvent::BombDetonated { .. }
            | GameEvent::ShipDestroyed => Some(SoundEffect::Explosion),
            GameEvent::BossHit { .. } | GameEvent::HitAbsorbed => Some(SoundEffect::Collision),
            GameEvent::PowerUpCollected { .. } => Some(SoundEffect::PowerUp),
            _ => None,
        }
    }
}

/// Borrowed view of one drawable entity
#[derive(Debug, Clone, Copy)]
pub enum EntityView<'a> {
    Ship(&'a Ship),
    Bullet(&'a Bullet),
    Asteroid(&'a Asteroid),
    Enemy(&'a EnemyShip),
    Boss(&'a Boss),
    PowerUp(&'a PowerUp),
    Bomb(&'a StrayBomb),
    Explosion(&'a Explosion),
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Seed the RNG was created from
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub level: u32,
    pub score: u64,
    /// Score that ends the current level
    pub next_threshold: u64,
    /// Set by a boss kill; stops the next boss-aligned transition spawning a boss
    pub boss_just_defeated: bool,
    pub final_boss_defeated: bool,
    /// Applied to every score award
    pub score_multiplier: f32,

    pub ship: Ship,
    pub player_bullets: Vec<Bullet>,
    pub enemy_bullets: Vec<Bullet>,
    pub boss_bullets: Vec<Bullet>,
    pub asteroids: Vec<Asteroid>,
    pub enemies: Vec<EnemyShip>,
    pub power_ups: Vec<PowerUp>,
    pub bombs: Vec<StrayBomb>,
    pub explosions: Vec<Explosion>,
    pub boss: Option<Boss>,

    pub last_power_up_ms: Option<u64>,
    pub last_bomb_ms: u64,
    /// Time passed to the latest tick
    pub time_ms: u64,
    /// Simulation tick counter
    pub ticks: u64,
    /// Events from the latest tick
    pub events: Vec<GameEvent>,
    next_id: u32,
}

impl GameState {
    /// New session state with `ship` at `starting_level`, first wave (or boss)
    /// already spawned
    pub fn new(seed: u64, tuning: Tuning, ship: Ship, starting_level: u32, now: u64) -> Self {
        let level = starting_level.clamp(1, MAX_STARTING_LEVEL);
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            next_threshold: tuning.threshold_for_level(level),
            tuning,
            phase: GamePhase::Active,
            level,
            score: 0,
            boss_just_defeated: false,
            final_boss_defeated: false,
            score_multiplier: 1.0,
            ship,
            player_bullets: Vec::new(),
            enemy_bullets: Vec::new(),
            boss_bullets: Vec::new(),
            asteroids: Vec::new(),
            enemies: Vec::new(),
            power_ups: Vec::new(),
            bombs: Vec::new(),
            explosions: Vec::new(),
            boss: None,
            last_power_up_ms: None,
            last_bomb_ms: now,
            time_ms: now,
            ticks: 0,
            events: Vec::new(),
            next_id: 1,
        };

        super::level::begin_level(&mut state, now);
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn new_asteroid(&mut self) -> Asteroid {
        let id = self.next_entity_id();
        Asteroid::spawn(id, self.level, &mut self.rng)
    }

    pub fn new_enemy(&mut self, now: u64) -> EnemyShip {
        let id = self.next_entity_id();
        EnemyShip::spawn(id, self.level, now, &mut self.rng)
    }

    pub fn new_bomb(&mut self) -> StrayBomb {
        let id = self.next_entity_id();
        StrayBomb::spawn(id, self.tuning.bomb_blast_radius, &mut self.rng)
    }

    /// Add `points` scaled by the score multiplier; returns what was added
    pub fn award(&mut self, points: u64) -> u64 {
        let awarded = (points as f64 * f64::from(self.score_multiplier)).round() as u64;
        self.score += awarded;
        awarded
    }

    pub fn is_over(&self) -> bool {
        matches!(self.phase, GamePhase::GameOver(_))
    }

    /// Whether hazards move and combat resolves this tick
    pub fn in_play(&self) -> bool {
        matches!(self.phase, GamePhase::Active | GamePhase::BossFight)
    }

    /// End the session
    pub fn end(&mut self, reason: GameOverReason) {
        if self.is_over() {
            return;
        }
        log::info!(
            "Session over ({reason:?}) at level {} with score {}",
            self.level,
            self.score
        );
        self.phase = GamePhase::GameOver(reason);
        self.events.push(GameEvent::GameOver(reason));
    }

    /// Every live entity, ship first
    pub fn entities(&self) -> impl Iterator<Item = EntityView<'_>> {
        std::iter::once(EntityView::Ship(&self.ship))
            .filter(|_| self.ship.alive)
            .chain(self.asteroids.iter().map(EntityView::Asteroid))
            .chain(self.enemies.iter().map(EntityView::Enemy))
            .chain(self.boss.iter().map(EntityView::Boss))
            .chain(self.bombs.iter().map(EntityView::Bomb))
            .chain(self.power_ups.iter().map(EntityView::PowerUp))
            .chain(
                self.player_bullets
                    .iter()
                    .chain(&self.enemy_bullets)
                    .chain(&self.boss_bullets)
                    .map(EntityView::Bullet),
            )
            .chain(self.explosions.iter().map(EntityView::Explosion))
    }

    /// Debug-build sanity checks; a failure here is a bug, not a game state
    pub fn check_invariants(&self) {
        debug_assert!(self.level >= 1, "level must start at 1");
        debug_assert!(self.ship.pos.is_finite(), "ship position {:?}", self.ship.pos);
        debug_assert!(self.ship.vel.is_finite(), "ship velocity {:?}", self.ship.vel);
        debug_assert!(self.asteroids.iter().all(|a| a.pos.is_finite() && a.alive));
        debug_assert!(self.enemies.iter().all(|e| e.pos.is_finite() && e.alive));
        debug_assert!(
            self.player_bullets
                .iter()
                .chain(&self.enemy_bullets)
                .chain(&self.boss_bullets)
                .all(|b| b.pos.is_finite())
        );
        if let Some(boss) = &self.boss {
            debug_assert!(boss.pos.is_finite(), "boss position {:?}", boss.pos);
            debug_assert!(boss.health <= boss.max_health);
        }
        debug_assert!(
            self.phase != GamePhase::BossFight || self.boss.is_some(),
            "boss fight without a boss"
        );
    }
}

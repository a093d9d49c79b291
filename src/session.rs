//! Session entry points
//!
//! A front-end starts a `Session` with the player's choices, calls `tick`
//! once per frame with that frame's input, draws the returned frame and
//! plays the returned cues. When the session is over, `outcome` feeds the
//! persisted progress.

use crate::audio::SoundEffect;
use crate::highscores::HighScores;
use crate::profile::CoinBank;
use crate::renderer::RenderFrame;
use crate::shop::{Shop, UpgradeEffect, UpgradeKind};
use crate::sim::{GameOverReason, GamePhase, GameState, Ship, ShipStats, TickInput, tick};
use crate::tuning::{FinalBossPolicy, Tuning};

/// Everything chosen before a session starts
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub ship: ShipStats,
    pub player_name: String,
    /// Effects of owned shop upgrades
    pub upgrades: Vec<UpgradeEffect>,
    /// 1 unless a level skip was consumed
    pub starting_level: u32,
    pub seed: u64,
    pub tuning: Tuning,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ship: ShipStats::default(),
            player_name: crate::consts::DEFAULT_PLAYER_NAME.to_string(),
            upgrades: Vec::new(),
            starting_level: 1,
            seed: 0,
            tuning: Tuning::default(),
        }
    }
}

/// What one tick produced
#[derive(Debug, Clone)]
pub struct TickOutput {
    pub frame: RenderFrame,
    /// Cues to play, at most one per effect
    pub audio: Vec<SoundEffect>,
}

/// Result handed back when a session ends
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOutcome {
    pub player_name: String,
    pub final_score: u64,
    pub level: u32,
    pub final_boss_defeated: bool,
    pub reason: Option<GameOverReason>,
}

/// One game session
#[derive(Debug, Clone)]
pub struct Session {
    state: GameState,
}

impl Session {
    /// Build the ship and first wave
    pub fn start(config: SessionConfig, now: u64) -> Self {
        let SessionConfig {
            ship,
            player_name,
            upgrades,
            starting_level,
            seed,
            tuning,
        } = config;

        let ship = Ship::new(&ship, &player_name, &upgrades, &tuning, now);
        let score_multiplier = upgrades
            .iter()
            .filter(|u| u.kind == UpgradeKind::ScoreMultiplier)
            .map(|u| u.magnitude)
            .fold(1.0, f32::max);

        log::info!(
            "Starting session for {} ({} upgrades) at level {starting_level}, seed {seed}",
            ship.name,
            upgrades.len()
        );
        let mut state = GameState::new(seed, tuning, ship, starting_level, now);
        state.score_multiplier = score_multiplier;
        Self { state }
    }

    /// Advance one fixed step
    pub fn tick(&mut self, input: &TickInput, now: u64) -> TickOutput {
        tick(&mut self.state, input, now);

        let mut audio: Vec<SoundEffect> = Vec::new();
        for effect in self.state.events.iter().filter_map(|e| e.sound()) {
            if !audio.contains(&effect) {
                audio.push(effect);
            }
        }

        TickOutput {
            frame: RenderFrame::project(&self.state),
            audio,
        }
    }

    pub fn is_over(&self) -> bool {
        self.state.is_over()
    }

    pub fn final_score(&self) -> u64 {
        self.state.score
    }

    pub fn outcome(&self) -> SessionOutcome {
        let reason = match self.state.phase {
            GamePhase::GameOver(reason) => Some(reason),
            _ => None,
        };
        SessionOutcome {
            player_name: self.state.ship.name.clone(),
            final_score: self.state.score,
            level: self.state.level,
            final_boss_defeated: self.state.final_boss_defeated,
            reason,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Direct access for scripted scenarios and debugging
    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }
}

/// Persisted progress a finished session updates
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Progress {
    pub high_scores: HighScores,
    pub coins: CoinBank,
    pub shop: Shop,
}

impl Progress {
    /// Fold a finished session into the persisted progress
    ///
    /// The final-boss policy applies first, so a reset wipes everything
    /// except this session's own score and coins. Returns the high-score
    /// rank, if the score made the list.
    pub fn record(&mut self, outcome: &SessionOutcome, tuning: &Tuning) -> Option<usize> {
        if outcome.final_boss_defeated && tuning.final_boss_policy == FinalBossPolicy::ResetProgress
        {
            log::info!("Final boss defeated: resetting coins, shop and high scores");
            self.coins.reset();
            self.shop.reset();
            self.high_scores.clear();
        }

        let earned = tuning.coins_for_score(outcome.final_score);
        self.coins.deposit(earned);
        let rank = self
            .high_scores
            .add_score(&outcome.player_name, outcome.final_score, outcome.level);
        log::info!(
            "{} scored {} (level {}), +{earned} coins, rank {rank:?}",
            outcome.player_name,
            outcome.final_score,
            outcome.level
        );
        rank
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{MAX_STARTING_LEVEL, SIM_DT_MS};
    use crate::profile::LevelSkip;

    #[test]
    fn test_session_runs_until_quit() {
        let mut session = Session::start(SessionConfig::default(), 0);
        assert!(!session.is_over());

        for t in 1..=30u64 {
            let out = session.tick(&TickInput::default(), (t as f64 * SIM_DT_MS) as u64);
            assert!(!out.frame.sprites.is_empty());
        }
        let quit = TickInput {
            quit: true,
            ..Default::default()
        };
        session.tick(&quit, 600);
        assert!(session.is_over());
        assert_eq!(session.outcome().reason, Some(GameOverReason::Quit));
    }

    #[test]
    fn test_audio_cues_deduplicated() {
        let mut session = Session::start(SessionConfig::default(), 0);
        let fire = TickInput {
            fire: true,
            ..Default::default()
        };
        let out = session.tick(&fire, 300);
        assert!(out.audio.contains(&SoundEffect::Laser));

        // Lots of bullets in one volley still play one laser cue
        session.state_mut().ship.add_power_up(
            crate::sim::PowerUpKind::DoubleShot,
            300,
            10_000,
            3,
        );
        let out = session.tick(&fire, 600);
        let lasers = out.audio.iter().filter(|&&e| e == SoundEffect::Laser).count();
        assert_eq!(lasers, 1);
    }

    #[test]
    fn test_huge_level_skip_starts_capped() {
        let mut skip: LevelSkip = serde_json::from_str(r#"{"levels": 3000000000}"#).unwrap();
        let config = SessionConfig {
            starting_level: LevelSkip::starting_level(skip.take()),
            ..Default::default()
        };
        let mut session = Session::start(config, 0);
        assert_eq!(session.state().level, MAX_STARTING_LEVEL);
        session.tick(&TickInput::default(), 17);
        assert!(!session.is_over());

        // An unclamped config is capped the same way
        let config = SessionConfig {
            starting_level: u32::MAX,
            ..Default::default()
        };
        let session = Session::start(config, 0);
        assert_eq!(session.state().level, MAX_STARTING_LEVEL);
        assert!(session.state().boss.is_some());
    }

    #[test]
    fn test_score_multiplier_upgrade() {
        let config = SessionConfig {
            upgrades: vec![UpgradeEffect {
                kind: UpgradeKind::ScoreMultiplier,
                magnitude: 1.5,
            }],
            ..Default::default()
        };
        let session = Session::start(config, 0);
        assert_eq!(session.state().score_multiplier, 1.5);
    }

    #[test]
    fn test_record_adds_coins_and_score() {
        let mut progress = Progress {
            coins: CoinBank { coins: 40 },
            ..Default::default()
        };
        let outcome = SessionOutcome {
            player_name: "Ace".into(),
            final_score: 1234,
            level: 2,
            final_boss_defeated: false,
            reason: Some(GameOverReason::ShipDestroyed),
        };
        let rank = progress.record(&outcome, &Tuning::default());
        assert_eq!(rank, Some(1));
        assert_eq!(progress.coins.coins, 40 + 123);
    }

    #[test]
    fn test_final_boss_policy() {
        let outcome = SessionOutcome {
            player_name: "Ace".into(),
            final_score: 50_000,
            level: 21,
            final_boss_defeated: true,
            reason: Some(GameOverReason::ShipDestroyed),
        };
        let mut bank = CoinBank { coins: 5000 };
        let mut shop = Shop::default();
        shop.purchase(0, &mut bank);
        let mut high_scores = HighScores::new();
        high_scores.add_score("Old", 90_000, 30);

        let before = Progress {
            high_scores,
            coins: bank,
            shop,
        };

        let mut reset = before.clone();
        reset.record(&outcome, &Tuning::default());
        assert_eq!(reset.coins.coins, 5000);
        assert!(reset.shop.purchased_effects().is_empty());
        assert_eq!(reset.high_scores.entries.len(), 1);
        assert_eq!(reset.high_scores.top_score(), Some(50_000));

        let keep_tuning = Tuning {
            final_boss_policy: FinalBossPolicy::KeepProgress,
            ..Tuning::default()
        };
        let mut kept = before.clone();
        kept.record(&outcome, &keep_tuning);
        assert_eq!(kept.coins.coins, 4500 + 5000);
        assert_eq!(kept.shop.purchased_effects().len(), 1);
        assert_eq!(kept.high_scores.top_score(), Some(90_000));
    }
}

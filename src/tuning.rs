//! Data-driven game balance
//!
//! Every number the level progression and spawn policies depend on lives here
//! so a `tuning.json` in the data directory can override it.

use serde::{Deserialize, Serialize};

use crate::persistence::Record;

/// What happens to meta-progression once the final boss falls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum FinalBossPolicy {
    /// Zero coins, clear shop purchases and high scores
    #[default]
    ResetProgress,
    /// Leave persisted progress untouched
    KeepProgress,
}

/// Gameplay balance knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Level progression ===
    /// Score needed to leave level L is `level_threshold_step * L`
    pub level_threshold_step: u64,
    /// Non-interactive pause between levels
    pub transition_ms: u64,
    /// Boss appears on every level divisible by this
    pub boss_cadence: u32,
    /// Boss tier whose defeat counts as beating the game
    pub final_boss_tier: u32,
    /// Pause after the final boss falls before play resumes
    pub final_boss_cinematic_ms: u64,
    pub final_boss_policy: FinalBossPolicy,

    // === Waves ===
    pub base_asteroids: u32,
    pub asteroids_per_level: u32,
    pub max_asteroids: u32,
    pub max_enemies: u32,

    // === Drops and hazards ===
    pub asteroid_drop_chance: f64,
    pub enemy_drop_chance: f64,
    pub min_drop_gap_ms: u64,
    pub power_up_duration_ms: u64,
    /// Cap on concurrently active double-shot pickups
    pub max_double_shot_stack: usize,
    pub bomb_interval_ms: u64,
    pub bomb_blast_radius: f32,

    // === Meta ===
    /// Player name that makes the ship permanently invincible
    pub invincible_name: Option<String>,
    /// Final score is divided by this to produce coins
    pub score_per_coin: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            level_threshold_step: 1000,
            transition_ms: 2000,
            boss_cadence: 5,
            final_boss_tier: 4,
            final_boss_cinematic_ms: 3000,
            final_boss_policy: FinalBossPolicy::ResetProgress,

            base_asteroids: 6,
            asteroids_per_level: 2,
            max_asteroids: 24,
            max_enemies: 8,

            asteroid_drop_chance: 0.10,
            enemy_drop_chance: 0.25,
            min_drop_gap_ms: 3000,
            power_up_duration_ms: 10_000,
            max_double_shot_stack: 3,
            bomb_interval_ms: 15_000,
            bomb_blast_radius: 150.0,

            invincible_name: Some("cheat".to_string()),
            score_per_coin: 10,
        }
    }
}

impl Tuning {
    /// Asteroids in a freshly spawned regular wave
    pub fn asteroid_count(&self, level: u32) -> usize {
        let extra = self
            .asteroids_per_level
            .saturating_mul(level.saturating_sub(1));
        self.base_asteroids
            .saturating_add(extra)
            .min(self.max_asteroids) as usize
    }

    /// Enemy ships in a freshly spawned regular wave
    pub fn enemy_count(&self, level: u32) -> usize {
        level.saturating_sub(1).min(self.max_enemies) as usize
    }

    /// Score that ends the given level
    pub fn threshold_for_level(&self, level: u32) -> u64 {
        self.level_threshold_step * u64::from(level.max(1))
    }

    /// Whether this level is a boss level
    pub fn is_boss_level(&self, level: u32) -> bool {
        self.boss_cadence > 0 && level > 0 && level.is_multiple_of(self.boss_cadence)
    }

    /// Boss tier for a boss level (1 for the first boss)
    pub fn boss_tier(&self, level: u32) -> u32 {
        if self.boss_cadence == 0 {
            return 1;
        }
        (level / self.boss_cadence).max(1)
    }

    /// Every second boss is a mega-boss
    pub fn is_mega_boss(&self, tier: u32) -> bool {
        tier.is_multiple_of(2)
    }

    /// Coins awarded for a finished session
    pub fn coins_for_score(&self, score: u64) -> u64 {
        score.checked_div(self.score_per_coin).unwrap_or(0)
    }

    /// Whether a player name unlocks permanent invincibility
    pub fn grants_invincibility(&self, name: &str) -> bool {
        self.invincible_name
            .as_deref()
            .is_some_and(|reserved| reserved.eq_ignore_ascii_case(name))
    }
}

impl Record for Tuning {
    const FILE_NAME: &'static str = "tuning.json";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wave_sizes_level_one() {
        let tuning = Tuning::default();
        assert_eq!(tuning.asteroid_count(1), 6);
        assert_eq!(tuning.enemy_count(1), 0);
        assert_eq!(tuning.asteroid_count(2), 8);
        assert_eq!(tuning.enemy_count(2), 1);
    }

    #[test]
    fn test_wave_sizes_capped() {
        let tuning = Tuning::default();
        assert_eq!(tuning.asteroid_count(500), tuning.max_asteroids as usize);
        assert_eq!(tuning.enemy_count(500), tuning.max_enemies as usize);
        assert_eq!(tuning.asteroid_count(u32::MAX), tuning.max_asteroids as usize);
        assert_eq!(tuning.enemy_count(u32::MAX), tuning.max_enemies as usize);
    }

    #[test]
    fn test_boss_levels() {
        let tuning = Tuning::default();
        assert!(!tuning.is_boss_level(4));
        assert!(tuning.is_boss_level(5));
        assert!(tuning.is_boss_level(10));
        assert_eq!(tuning.boss_tier(5), 1);
        assert_eq!(tuning.boss_tier(20), 4);
        assert!(tuning.is_mega_boss(tuning.boss_tier(10)));
        assert!(!tuning.is_mega_boss(tuning.boss_tier(15)));
    }

    #[test]
    fn test_reserved_name() {
        let tuning = Tuning::default();
        assert!(tuning.grants_invincibility("CHEAT"));
        assert!(!tuning.grants_invincibility("Ace"));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let tuning: Tuning = serde_json::from_str(r#"{"boss_cadence": 3}"#).unwrap();
        assert_eq!(tuning.boss_cadence, 3);
        assert_eq!(tuning.transition_ms, 2000);
    }
}

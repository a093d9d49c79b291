//! Property-based tests for wave scaling, firing, power-ups, bosses and the
//! leaderboard.

#![allow(clippy::unwrap_used)]

use asteroid_shooter::highscores::MAX_HIGH_SCORES;
use asteroid_shooter::sim::{Boss, BossKind, PowerUpKind, Ship, ShipStats};
use asteroid_shooter::{HighScores, Tuning};
use proptest::prelude::*;

fn ship(tuning: &Tuning) -> Ship {
    Ship::new(&ShipStats::default(), "Prop", &[], tuning, 0)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(512))]

    /// Wave sizes never shrink as the level rises
    #[test]
    fn prop_wave_sizes_non_decreasing(level in 1u32..500) {
        let tuning = Tuning::default();
        prop_assert!(tuning.asteroid_count(level) <= tuning.asteroid_count(level + 1));
        prop_assert!(tuning.enemy_count(level) <= tuning.enemy_count(level + 1));
        prop_assert!(tuning.asteroid_count(level) <= tuning.max_asteroids as usize);
        prop_assert!(tuning.enemy_count(level) <= tuning.max_enemies as usize);
    }

    /// `k` stacked double-shots fire `2^k` bullets
    #[test]
    fn prop_double_shot_doubles(k in 0usize..=3, start in 0u64..1_000_000) {
        let tuning = Tuning::default();
        let mut ship = ship(&tuning);
        for _ in 0..k {
            ship.add_power_up(PowerUpKind::DoubleShot, start, 10_000, 3);
        }
        let bullets = ship.try_fire(start + 1000);
        prop_assert_eq!(bullets.len(), 1 << k);
    }

    /// Triple-shot multiplies every lane by three
    #[test]
    fn prop_triple_shot_spreads_each_lane(k in 0usize..=3) {
        let tuning = Tuning::default();
        let mut ship = ship(&tuning);
        for _ in 0..k {
            ship.add_power_up(PowerUpKind::DoubleShot, 0, 10_000, 3);
        }
        ship.add_power_up(PowerUpKind::TripleShot, 0, 10_000, 3);
        prop_assert_eq!(ship.try_fire(1000).len(), 3 << k);
    }

    /// A power-up is active for exactly `[t0, t0 + D)`
    #[test]
    fn prop_power_up_expiry(t0 in 0u64..10_000_000, duration in 1u64..60_000, elapsed in 0u64..120_000) {
        let tuning = Tuning::default();
        let mut ship = ship(&tuning);
        ship.add_power_up(PowerUpKind::RapidMovement, t0, duration, 3);

        let now = t0 + elapsed;
        ship.expire_power_ups(now);
        prop_assert_eq!(ship.has_power_up(PowerUpKind::RapidMovement, now), elapsed < duration);
    }

    /// `n` simultaneous hits of `d` kill a boss with health `H` iff `H <= n·d`
    #[test]
    fn prop_boss_dies_iff_damage_covers_health(
        tier in 1u32..8,
        mega in any::<bool>(),
        n in 0u32..400,
        d in 1u32..4,
    ) {
        let kind = if mega { BossKind::Mega } else { BossKind::Standard };
        let mut boss = Boss::spawn(1, tier, kind, 0);
        let health = boss.health;

        let killed = boss.take_damage(n * d);
        prop_assert_eq!(killed, health <= n * d);
        prop_assert_eq!(!boss.alive, health <= n * d);
        prop_assert_eq!(boss.health, health.saturating_sub(n * d));
    }

    /// The leaderboard stays sorted and capped whatever is inserted
    #[test]
    fn prop_high_scores_sorted_and_capped(
        scores in prop::collection::vec((0u64..1_000_000, 1u32..50), 0..40)
    ) {
        let mut list = HighScores::new();
        for (score, level) in scores {
            list.add_score("Prop", score, level);
            prop_assert!(list.entries.len() <= MAX_HIGH_SCORES);
            prop_assert!(list.entries.windows(2).all(|w| w[0].score >= w[1].score));
        }
    }
}

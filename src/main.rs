//! Asteroid Shooter entry point
//!
//! Runs a headless session with the autopilot steering, plays cues through
//! the logging sink and folds the result into the save directory.
//!
//! Usage: `asteroid-shooter [SAVE_DIR]`. The seed comes from
//! `ASTEROID_SHOOTER_SEED` when set.

use std::time::{SystemTime, UNIX_EPOCH};

use asteroid_shooter::audio::{AudioManager, AudioSink, LogSink};
use asteroid_shooter::consts::*;
use asteroid_shooter::persistence::Store;
use asteroid_shooter::profile::{CoinBank, LevelSkip};
use asteroid_shooter::shop::Shop;
use asteroid_shooter::sim::TickInput;
use asteroid_shooter::{HighScores, Progress, Session, SessionConfig, Settings, Tuning};

/// Default save directory
const DEFAULT_SAVE_DIR: &str = "save";
/// Wall-clock length of one presented frame
const FRAME_SECONDS: f32 = 1.0 / 30.0;
/// Headless runs stop after this much game time
const MAX_SESSION_MS: u64 = 10 * 60 * 1000;

/// Seed from the environment, or the clock
fn session_seed() -> u64 {
    if let Ok(raw) = std::env::var("ASTEROID_SHOOTER_SEED") {
        match raw.parse() {
            Ok(seed) => return seed,
            Err(e) => log::warn!("Ignoring ASTEROID_SHOOTER_SEED={raw:?}: {e}"),
        }
    }
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

fn main() {
    env_logger::init();
    log::info!("Asteroid Shooter (headless) starting...");

    let dir = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_SAVE_DIR.to_string());
    let store = Store::new(dir);

    let settings: Settings = store.load_or_default();
    let tuning: Tuning = store.load_or_default();
    let mut high_scores: HighScores = store.load_or_default();
    high_scores.normalize();
    let mut progress = Progress {
        high_scores,
        coins: store.load_or_default::<CoinBank>(),
        shop: store.load_or_default::<Shop>(),
    };

    // A requested skip applies to exactly one session
    let mut skip: LevelSkip = store.load_or_default();
    let starting_level = LevelSkip::starting_level(skip.take());
    store.save_or_warn(&skip);

    let seed = session_seed();
    let sink: Box<dyn AudioSink> = Box::new(LogSink);
    let mut audio = AudioManager::new(Ok(sink), &settings, seed);

    let config = SessionConfig {
        ship: settings.ship.stats(),
        player_name: settings.player_name.clone(),
        upgrades: progress.shop.purchased_effects(),
        starting_level,
        seed,
        tuning: tuning.clone(),
    };
    let mut session = Session::start(config, 0);

    let input = TickInput {
        idle_mode: true,
        ..Default::default()
    };
    let mut accumulator = 0.0f32;
    let mut ticks: u64 = 0;
    let mut now: u64 = 0;

    while !session.is_over() && now < MAX_SESSION_MS {
        accumulator += FRAME_SECONDS;

        let mut substeps = 0;
        while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            ticks += 1;
            now = (ticks as f64 * SIM_DT_MS) as u64;
            let output = session.tick(&input, now);
            audio.play_all(&output.audio);
            accumulator -= SIM_DT;
            substeps += 1;
        }
    }

    if !session.is_over() {
        log::info!("Time limit reached after {ticks} ticks");
    }

    let outcome = session.outcome();
    let rank = progress.record(&outcome, &tuning);
    println!(
        "{} reached level {} with {} points",
        outcome.player_name, outcome.level, outcome.final_score
    );
    if let Some(rank) = rank {
        println!("New high score: #{rank}");
    }
    println!("Coins: {}", progress.coins.coins);

    store.save_or_warn(&progress.high_scores);
    store.save_or_warn(&progress.coins);
    store.save_or_warn(&progress.shop);
    store.save_or_warn(&settings);
}

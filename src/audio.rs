//! Audio system
//!
//! Procedurally generated sound effects - no external files needed!
//! Each effect is synthesised once into a stereo 16-bit buffer and handed to
//! an `AudioSink` on demand. A sink that fails to open or play turns audio
//! off for the rest of the process; gameplay never notices.

use std::collections::HashMap;
use std::f32::consts::{PI, TAU};
use std::fmt;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::settings::Settings;

/// Output sample rate
pub const SAMPLE_RATE: u32 = 44_100;
/// Stereo widening modulation rate
const PAN_RATE_HZ: f32 = 2.0;
/// How far each channel dips during widening
const PAN_DEPTH: f32 = 0.3;

/// One stereo sample (left, right)
pub type Frame = [i16; 2];

/// Sound effect cues the game triggers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Player shot
    Laser,
    /// Something blew up
    Explosion,
    /// Ship or boss took a hit
    Collision,
    /// Pickup collected
    PowerUp,
}

impl SoundEffect {
    pub const ALL: [SoundEffect; 4] = [
        SoundEffect::Laser,
        SoundEffect::Explosion,
        SoundEffect::Collision,
        SoundEffect::PowerUp,
    ];

    /// Synthesis parameters for this cue
    pub fn voice(self) -> Voice {
        match self {
            SoundEffect::Laser => Voice {
                waveform: Waveform::Laser,
                freq: 880.0,
                duration_s: 0.15,
                volume: 0.3,
            },
            SoundEffect::Explosion => Voice {
                waveform: Waveform::Explosion,
                freq: 100.0,
                duration_s: 0.8,
                volume: 0.5,
            },
            SoundEffect::Collision => Voice {
                waveform: Waveform::Collision,
                freq: 220.0,
                duration_s: 0.3,
                volume: 0.4,
            },
            SoundEffect::PowerUp => Voice {
                waveform: Waveform::PowerUp,
                freq: 440.0,
                duration_s: 0.4,
                volume: 0.4,
            },
        }
    }
}

/// Signal model used to render a sound
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Laser,
    Explosion,
    Collision,
    PowerUp,
    /// Plain sine, the fallback
    Sine,
}

/// Everything needed to render one sound
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Voice {
    pub waveform: Waveform,
    pub freq: f32,
    pub duration_s: f32,
    pub volume: f32,
}

/// Three-phase explosion envelope over normalised time `p` in [0, 1]
///
/// Full volume until 10%, linear down to half by 30%, exponential tail after.
pub fn explosion_envelope(p: f32) -> f32 {
    if p < 0.1 {
        1.0
    } else if p < 0.3 {
        1.0 - 0.5 * (p - 0.1) / 0.2
    } else {
        0.5 * (-5.0 * (p - 0.3) / 0.7).exp()
    }
}

fn noise(rng: &mut impl Rng) -> f32 {
    rng.random_range(-1.0..=1.0)
}

/// Render `voice` to stereo 16-bit PCM at `SAMPLE_RATE`
///
/// Noise terms draw from `rng`; a seeded rng gives repeatable output.
pub fn synthesize(voice: &Voice, rng: &mut impl Rng) -> Vec<Frame> {
    let sr = SAMPLE_RATE as f32;
    let count = (voice.duration_s.max(0.0) * sr).round() as usize;
    let base = voice.freq;
    let mut phase = 0.0f32;
    let mut frames = Vec::with_capacity(count);

    for i in 0..count {
        let t = i as f32 / sr;
        let p = i as f32 / count as f32;

        // Every branch keeps the mono signal within [-1, 1]
        let mono = match voice.waveform {
            Waveform::Laser => {
                phase += TAU * base * (1.0 - 0.5 * p) / sr;
                let tone = phase.sin() + 0.5 * (2.0 * phase).sin() + 0.25 * (3.0 * phase).sin();
                tone / 1.75 * (1.0 - p)
            }
            Waveform::Explosion => {
                let blast = noise(rng) * (-8.0 * p).exp();
                let rumble = [20.0f32, 40.0, 60.0, 80.0]
                    .iter()
                    .map(|f| (TAU * f * t).sin())
                    .sum::<f32>()
                    / 4.0;
                let debris = noise(rng)
                    * (0.6 * (TAU * 800.0 * t).sin() + 0.4 * (TAU * 1500.0 * t).sin())
                    * (-5.0 * p).exp();
                let shockwave = (TAU * base * t).sin() * (PI * p * 3.0).sin().abs();
                let mix = 0.4 * blast + 0.3 * rumble + 0.2 * debris + 0.1 * shockwave;
                mix * explosion_envelope(p)
            }
            Waveform::Collision => {
                const PARTIALS: [(f32, f32); 5] =
                    [(1.0, 6.0), (1.5, 8.0), (2.0, 10.0), (2.5, 12.0), (3.0, 14.0)];
                let ring = PARTIALS
                    .iter()
                    .map(|(ratio, decay)| (TAU * base * ratio * t).sin() * (-decay * p).exp())
                    .sum::<f32>()
                    / PARTIALS.len() as f32;
                let burst = noise(rng) * (-40.0 * p).exp();
                let attack = (p / 0.02).min(1.0);
                (0.8 * ring + 0.2 * burst) * attack
            }
            Waveform::PowerUp => {
                phase += TAU * base * (1.0 + 1.5 * p) / sr;
                let shimmer = 0.7 + 0.3 * (TAU * 15.0 * t).sin();
                let sparkle = (TAU * 1000.0 * t).sin();
                (0.85 * phase.sin() * shimmer + 0.15 * sparkle) * (1.0 - p)
            }
            Waveform::Sine => (TAU * base * t).sin(),
        };

        let pan = TAU * PAN_RATE_HZ * t;
        let left = mono * (1.0 - PAN_DEPTH + PAN_DEPTH * pan.sin());
        let right = mono * (1.0 - PAN_DEPTH + PAN_DEPTH * pan.cos());
        frames.push([to_pcm(left * voice.volume), to_pcm(right * voice.volume)]);
    }
    frames
}

fn to_pcm(x: f32) -> i16 {
    (x * f32::from(i16::MAX)).clamp(f32::from(i16::MIN), f32::from(i16::MAX)) as i16
}

/// Audio output failure
#[derive(Debug)]
pub enum AudioError {
    /// The output device could not be opened
    Unavailable(String),
    /// A buffer could not be played
    Playback(String),
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable(msg) => write!(f, "audio device unavailable: {msg}"),
            Self::Playback(msg) => write!(f, "audio playback failed: {msg}"),
        }
    }
}

impl std::error::Error for AudioError {}

/// Playback device with one channel per effect
pub trait AudioSink {
    /// Start `frames` on the effect's channel, cutting off whatever it was playing
    fn play(&mut self, effect: SoundEffect, frames: &[Frame]) -> Result<(), AudioError>;
}

/// Sink for headless runs: every cue becomes a trace log line
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl AudioSink for LogSink {
    fn play(&mut self, effect: SoundEffect, frames: &[Frame]) -> Result<(), AudioError> {
        log::trace!("{effect:?}: {} frames", frames.len());
        Ok(())
    }
}

/// Audio manager for the game
pub struct AudioManager {
    sink: Option<Box<dyn AudioSink>>,
    buffers: HashMap<SoundEffect, Vec<Frame>>,
    /// Gain applied to every cue, 0 when muted
    volume: f32,
}

impl AudioManager {
    /// Pre-render every effect and attach the sink; a failed sink leaves audio off
    pub fn new(sink: Result<Box<dyn AudioSink>, AudioError>, settings: &Settings, seed: u64) -> Self {
        let sink = match sink {
            Ok(sink) => Some(sink),
            Err(e) => {
                log::warn!("{e} - audio disabled");
                None
            }
        };

        let mut rng = Pcg32::seed_from_u64(seed);
        let buffers = if sink.is_some() {
            SoundEffect::ALL
                .iter()
                .map(|&effect| (effect, synthesize(&effect.voice(), &mut rng)))
                .collect()
        } else {
            HashMap::new()
        };

        Self {
            sink,
            buffers,
            volume: settings.effective_volume(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.sink.is_some()
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.volume;
        if vol <= 0.0 {
            return;
        }
        let Some(sink) = self.sink.as_mut() else {
            return;
        };
        let Some(buffer) = self.buffers.get(&effect) else {
            return;
        };

        let scaled: Vec<Frame> = buffer
            .iter()
            .map(|[l, r]| [scale(*l, vol), scale(*r, vol)])
            .collect();
        if let Err(e) = sink.play(effect, &scaled) {
            log::warn!("{e} - audio disabled");
            self.sink = None;
        }
    }

    /// Play several cues in order
    pub fn play_all(&mut self, effects: &[SoundEffect]) {
        for &effect in effects {
            self.play(effect);
        }
    }
}

fn scale(sample: i16, vol: f32) -> i16 {
    (f32::from(sample) * vol) as i16
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn rng() -> Pcg32 {
        Pcg32::seed_from_u64(1)
    }

    fn peak(frames: &[Frame]) -> i32 {
        frames
            .iter()
            .flat_map(|f| f.iter())
            .map(|s| i32::from(*s).abs())
            .max()
            .unwrap_or(0)
    }

    #[test]
    fn test_duration_in_samples() {
        for effect in SoundEffect::ALL {
            let voice = effect.voice();
            let frames = synthesize(&voice, &mut rng());
            let expected = (voice.duration_s * SAMPLE_RATE as f32).round() as usize;
            assert_eq!(frames.len(), expected, "{effect:?}");
        }
    }

    #[test]
    fn test_peak_bounded_by_volume() {
        for waveform in [
            Waveform::Laser,
            Waveform::Explosion,
            Waveform::Collision,
            Waveform::PowerUp,
            Waveform::Sine,
        ] {
            let voice = Voice {
                waveform,
                freq: 300.0,
                duration_s: 0.25,
                volume: 0.5,
            };
            let frames = synthesize(&voice, &mut rng());
            let limit = (0.5 * f32::from(i16::MAX)) as i32 + 1;
            let p = peak(&frames);
            assert!(p <= limit, "{waveform:?} peak {p}");
            assert!(p > 0, "{waveform:?} is silent");
        }
    }

    #[test]
    fn test_explosion_envelope_monotone() {
        let mut last = explosion_envelope(0.0);
        assert_eq!(last, 1.0);
        for i in 1..=1000 {
            let v = explosion_envelope(i as f32 / 1000.0);
            assert!(v <= last + 1e-6, "rose at {i}");
            last = v;
        }
        assert!((explosion_envelope(0.3) - 0.5).abs() < 1e-4);
        assert!(explosion_envelope(1.0) < 0.01);
    }

    #[test]
    fn test_laser_decays() {
        let frames = synthesize(&SoundEffect::Laser.voice(), &mut rng());
        let quarter = frames.len() / 4;
        assert!(peak(&frames[..quarter]) > peak(&frames[3 * quarter..]));
    }

    #[test]
    fn test_seeded_synthesis_repeatable() {
        let voice = SoundEffect::Explosion.voice();
        assert_eq!(synthesize(&voice, &mut rng()), synthesize(&voice, &mut rng()));
    }

    #[test]
    fn test_zero_duration_is_empty() {
        let voice = Voice {
            waveform: Waveform::Sine,
            freq: 440.0,
            duration_s: 0.0,
            volume: 1.0,
        };
        assert!(synthesize(&voice, &mut rng()).is_empty());
    }

    /// Sink that records cues and can be told to fail
    #[derive(Clone, Default)]
    struct SharedSink {
        played: Rc<RefCell<Vec<SoundEffect>>>,
        peaks: Rc<RefCell<Vec<i32>>>,
        fail: bool,
    }

    impl AudioSink for SharedSink {
        fn play(&mut self, effect: SoundEffect, frames: &[Frame]) -> Result<(), AudioError> {
            if self.fail {
                return Err(AudioError::Playback("device lost".into()));
            }
            self.played.borrow_mut().push(effect);
            let peak = frames
                .iter()
                .map(|[l, r]| i32::from(*l).abs().max(i32::from(*r).abs()))
                .max()
                .unwrap_or(0);
            self.peaks.borrow_mut().push(peak);
            Ok(())
        }
    }

    #[test]
    fn test_play_dispatches_to_sink() {
        let sink = SharedSink::default();
        let played = sink.played.clone();
        let mut audio = AudioManager::new(Ok(Box::new(sink)), &Settings::default(), 7);
        audio.play_all(&[SoundEffect::Laser, SoundEffect::PowerUp]);
        assert_eq!(*played.borrow(), vec![SoundEffect::Laser, SoundEffect::PowerUp]);
    }

    #[test]
    fn test_muted_is_silent() {
        let sink = SharedSink::default();
        let played = sink.played.clone();
        let settings = Settings {
            muted: true,
            ..Default::default()
        };
        let mut audio = AudioManager::new(Ok(Box::new(sink)), &settings, 7);
        audio.play(SoundEffect::Explosion);
        assert!(played.borrow().is_empty());
    }

    #[test]
    fn test_settings_volume_scales_output() {
        let peak_at = |master_volume: f32| {
            let sink = SharedSink::default();
            let peaks = sink.peaks.clone();
            let settings = Settings {
                master_volume,
                sfx_volume: 1.0,
                ..Default::default()
            };
            let mut audio = AudioManager::new(Ok(Box::new(sink)), &settings, 7);
            audio.play(SoundEffect::Explosion);
            let peak = peaks.borrow()[0];
            peak
        };
        let loud = peak_at(1.0);
        let quiet = peak_at(0.5);
        assert!(loud > 0);
        assert!(quiet > 0);
        assert!((quiet - loud / 2).abs() <= 1);

        // Out-of-range settings are clamped, not amplified
        assert_eq!(peak_at(4.0), loud);
    }

    #[test]
    fn test_failed_open_disables() {
        let mut audio = AudioManager::new(
            Err(AudioError::Unavailable("no device".into())),
            &Settings::default(),
            7,
        );
        assert!(!audio.is_enabled());
        audio.play(SoundEffect::Laser);
    }

    #[test]
    fn test_playback_error_disables() {
        let sink = SharedSink {
            fail: true,
            ..Default::default()
        };
        let mut audio = AudioManager::new(Ok(Box::new(sink)), &Settings::default(), 7);
        assert!(audio.is_enabled());
        audio.play(SoundEffect::Laser);
        assert!(!audio.is_enabled());
    }
}

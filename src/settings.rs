//! Game settings and preferences
//!
//! Persisted separately from progress as `settings.json`.

use serde::{Deserialize, Serialize};

use crate::persistence::Record;
use crate::sim::ShipClass;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Disable all sound
    pub muted: bool,

    // === Player ===
    /// Name used when none is entered
    pub player_name: String,
    /// Last selected ship
    pub ship: ShipClass,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,

            player_name: crate::consts::DEFAULT_PLAYER_NAME.to_string(),
            ship: ShipClass::default(),
        }
    }
}

impl Settings {
    /// Effective sound effect gain (0 when muted)
    pub fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume.clamp(0.0, 1.0) * self.sfx_volume.clamp(0.0, 1.0)
        }
    }
}

impl Record for Settings {
    const FILE_NAME: &'static str = "settings.json";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_volume() {
        let mut settings = Settings::default();
        assert!((settings.effective_volume() - 0.8).abs() < 1e-6);
        settings.muted = true;
        assert_eq!(settings.effective_volume(), 0.0);
    }

    #[test]
    fn test_volume_clamped() {
        let settings = Settings {
            master_volume: 3.0,
            sfx_volume: 0.5,
            ..Default::default()
        };
        assert!((settings.effective_volume() - 0.5).abs() < 1e-6);
    }
}

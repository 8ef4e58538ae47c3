//! Game settings and preferences
//!
//! Stored as JSON next to the binary. Missing or unreadable files fall back
//! to defaults; unknown fields are ignored and missing ones take defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{SCREEN_HEIGHT, SCREEN_WIDTH, STARTING_LIVES};

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Playfield ===
    /// Viewport width in pixels
    pub width: f32,
    /// Viewport height in pixels; bricks fill the top half
    pub height: f32,
    /// Lives per game
    pub lives: u8,
    /// Seed for power-up rolls and particle jitter
    pub seed: u64,
    /// Level files, in selection order
    pub levels: Vec<String>,

    // === Visual Effects ===
    /// Ball trail particles
    pub particles: bool,
    /// Camera shake on solid brick hits
    pub screen_shake: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    pub muted: bool,

    // === Accessibility ===
    /// Reduced motion (disables shake)
    pub reduced_motion: bool,

    // === Headless runner ===
    /// Simulated seconds the demo runs for
    pub demo_seconds: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: SCREEN_WIDTH,
            height: SCREEN_HEIGHT,
            lives: STARTING_LIVES,
            seed: 0x00b1_0c4b,
            levels: vec![
                "levels/one.lvl".to_string(),
                "levels/two.lvl".to_string(),
                "levels/three.lvl".to_string(),
                "levels/four.lvl".to_string(),
            ],

            particles: true,
            screen_shake: true,

            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,

            reduced_motion: false,

            demo_seconds: 60.0,
        }
    }
}

impl Settings {
    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Load settings from a JSON file, falling back to defaults.
    pub fn load_from(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                log::info!("Using default settings ({}: {})", path.display(), e);
                return Self::default();
            }
        };
        match serde_json::from_str(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Invalid settings file {}: {}; using defaults", path.display(), e);
                Self::default()
            }
        }
    }

    /// Save settings as pretty JSON. Failures are logged, not fatal.
    pub fn save_to(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        match serde_json::to_string_pretty(self) {
            Ok(json) => match fs::write(path, json) {
                Ok(()) => log::info!("Settings saved to {}", path.display()),
                Err(e) => log::warn!("Failed to save settings to {}: {}", path.display(), e),
            },
            Err(e) => log::warn!("Failed to serialize settings: {}", e),
        }
    }
}

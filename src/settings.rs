//! Game settings and preferences
//!
//! Persisted as a small JSON file next to the score table.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_LEVEL, TICK_INTERVAL};
use crate::highscores::StoreError;

/// Difficulty selected in the settings menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Difficult,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Difficult];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "EASY",
            Difficulty::Normal => "NORMAL",
            Difficulty::Difficult => "DIFFICULT",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" => Some(Difficulty::Normal),
            "difficult" | "hard" => Some(Difficulty::Difficult),
            _ => None,
        }
    }

    /// Letter shown in the state banner (E / N / D)
    pub fn initial(&self) -> char {
        match self {
            Difficulty::Easy => 'E',
            Difficulty::Normal => 'N',
            Difficulty::Difficult => 'D',
        }
    }
}

/// Session settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub difficulty: Difficulty,
    /// Levels per run; a full run is 10 and ends on the boss level
    pub level_count: u8,
    /// Pause between ticks (seconds)
    pub tick_interval_secs: f32,
    /// Fixed RNG seed (None = derived from the clock at session start)
    pub seed: Option<u64>,
    /// Where the leaderboard lives
    pub scores_path: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            difficulty: Difficulty::Normal,
            level_count: MAX_LEVEL,
            tick_interval_secs: TICK_INTERVAL,
            seed: None,
            scores_path: PathBuf::from("scores.json"),
        }
    }
}

impl Settings {
    /// Create settings for a difficulty, everything else default
    pub fn with_difficulty(difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            ..Self::default()
        }
    }

    /// Level count clamped to 1..=10
    pub fn effective_level_count(&self) -> u8 {
        self.level_count.clamp(1, MAX_LEVEL)
    }

    /// Tick interval, never negative
    pub fn effective_tick_interval(&self) -> f32 {
        self.tick_interval_secs.max(0.0)
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Malformed settings in {} ({e}), using defaults", path.display());
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("Using default settings");
                Self::default()
            }
        }
    }

    /// Save settings to a JSON file
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        log::info!("Settings saved");
        Ok(())
    }
}

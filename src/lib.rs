//! Zombie Hunter - a handheld tilt-and-shoot arcade game
//!
//! Core modules:
//! - `sim`: Deterministic game core (levels, zombies, aiming, combat, tick)
//! - `platform`: Sensor, button and clock contracts plus test fakes
//! - `feedback`: Semantic feedback cues (LED/haptic/buzzer plans)
//! - `hud`: Render requests handed to the presentation layer
//! - `highscores`: Top 10 leaderboard with JSON persistence
//! - `name_entry`: Rotary/button driven 3-letter name entry
//! - `session`: Paced per-session loop and end-of-game handling

pub mod feedback;
pub mod highscores;
pub mod hud;
pub mod name_entry;
pub mod platform;
pub mod session;
pub mod settings;
pub mod sim;

pub use highscores::{HighScores, Leaderboard, ScoreFile, ScoreRecord};
pub use session::{Device, GameSession, SessionReport};
pub use settings::{Difficulty, Settings};

/// Game configuration constants
pub mod consts {
    /// Seconds each level lasts
    pub const LEVEL_DURATION: f32 = 10.0;
    /// Player hit points at session start
    pub const MAX_HP: u8 = 3;
    /// Number of levels in a full run (the last one is the boss level)
    pub const MAX_LEVEL: u8 = 10;
    /// Final seconds of a zombie's life spent flashing
    pub const FLASH_WARNING_TIME: f32 = 3.0;
    /// Blink phases per second while flashing
    pub const FLASH_RATE: f32 = 6.0;

    /// Display dimensions
    pub const SCREEN_WIDTH: i32 = 128;
    pub const SCREEN_HEIGHT: i32 = 64;

    /// Crosshair/zombie field (below the HUD row, above the state banner)
    pub const FIELD_X_MIN: i32 = 0;
    pub const FIELD_X_MAX: i32 = 127;
    pub const FIELD_Y_MIN: i32 = 18;
    pub const FIELD_Y_MAX: i32 = 48;
    /// Zombies never spawn closer than this to the field edges
    pub const SPAWN_MARGIN: i32 = 5;

    /// Accelerometer range mapped onto the field (m/s²)
    pub const TILT_MIN: f32 = -6.0;
    pub const TILT_MAX: f32 = 6.0;
    /// Exponential smoothing factor for tilt samples
    pub const TILT_ALPHA: f32 = 0.2;

    /// Hit box half-extents around a zombie
    pub const HIT_TOLERANCE_X: i32 = 6;
    pub const HIT_TOLERANCE_Y: i32 = 8;

    /// Loop pacing between ticks
    pub const TICK_INTERVAL: f32 = 0.02;
    /// Trigger button debounce window
    pub const DEBOUNCE_SECS: f32 = 0.02;
    /// How long the "LEVEL n" banner blocks the loop
    pub const LEVEL_BANNER_SECS: f32 = 1.2;
}

/// Clamp `value` into `[in_min, in_max]` and linearly map it onto the integer
/// range `[out_min, out_max]` (truncating toward zero like the display does).
#[inline]
pub fn map_to_range(value: f32, in_min: f32, in_max: f32, out_min: i32, out_max: i32) -> i32 {
    let value = value.clamp(in_min, in_max);
    let ratio = (value - in_min) / (in_max - in_min);
    (out_min as f32 + ratio * (out_max - out_min) as f32) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_to_range_endpoints() {
        assert_eq!(map_to_range(-6.0, -6.0, 6.0, 0, 127), 0);
        assert_eq!(map_to_range(6.0, -6.0, 6.0, 0, 127), 127);
        assert_eq!(map_to_range(0.0, -6.0, 6.0, 0, 127), 63);
    }

    #[test]
    fn test_map_to_range_clamps() {
        assert_eq!(map_to_range(-100.0, -6.0, 6.0, 18, 48), 18);
        assert_eq!(map_to_range(100.0, -6.0, 6.0, 18, 48), 48);
    }
}

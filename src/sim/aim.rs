//! Aim, shield and sound resolution
//!
//! Turns raw per-tick sensor samples into the values combat works with:
//! a smoothed crosshair position, the shield flag and a loud-sound edge.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use crate::consts::*;
use crate::map_to_range;

/// Exponentially smoothed tilt mapped onto the playfield
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct AimResolver {
    /// Smoothed accelerometer x/y
    pub smoothed: Vec2,
}

impl AimResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one tilt sample into the estimate and return the crosshair
    pub fn update(&mut self, tilt: Vec2) -> IVec2 {
        self.smoothed = tilt * TILT_ALPHA + self.smoothed * (1.0 - TILT_ALPHA);
        self.crosshair()
    }

    /// Current crosshair position (vertical axis inverted: tilting away moves up)
    pub fn crosshair(&self) -> IVec2 {
        IVec2::new(
            map_to_range(self.smoothed.x, TILT_MIN, TILT_MAX, FIELD_X_MIN, FIELD_X_MAX),
            map_to_range(-self.smoothed.y, TILT_MIN, TILT_MAX, FIELD_Y_MIN, FIELD_Y_MAX),
        )
    }

    pub fn reset(&mut self) {
        self.smoothed = Vec2::ZERO;
    }
}

/// Detects the quiet -> loud transition of the sound comparator
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SoundEdge {
    last_quiet: bool,
}

impl Default for SoundEdge {
    fn default() -> Self {
        Self { last_quiet: true }
    }
}

impl SoundEdge {
    /// Start from a known comparator level
    pub fn new(quiet: bool) -> Self {
        Self { last_quiet: quiet }
    }

    /// Feed this tick's reading. While our own buzzer is sounding the edge is
    /// dropped, but the baseline still follows the sensor.
    pub fn update(&mut self, quiet: bool, tone_active: bool) -> bool {
        let edge = self.last_quiet && !quiet;
        self.last_quiet = quiet;
        edge && !tone_active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crosshair_starts_centered() {
        let aim = AimResolver::new();
        assert_eq!(aim.crosshair(), IVec2::new(63, 33));
    }

    #[test]
    fn test_smoothing_converges() {
        let mut aim = AimResolver::new();
        let first = aim.update(Vec2::new(6.0, 0.0));
        // One sample only moves 20% of the way
        assert!((aim.smoothed.x - 1.2).abs() < 1e-5);
        assert!(first.x > 63 && first.x < 127);

        for _ in 0..200 {
            aim.update(Vec2::new(20.0, -20.0));
        }
        // Clamped at the right edge; negative y tilt maps to the bottom
        assert_eq!(aim.crosshair(), IVec2::new(127, 48));
    }

    #[test]
    fn test_vertical_axis_inverted() {
        let mut aim = AimResolver::new();
        for _ in 0..200 {
            aim.update(Vec2::new(0.0, 6.0));
        }
        assert_eq!(aim.crosshair().y, 18);
    }

    #[test]
    fn test_sound_falling_edge() {
        let mut edge = SoundEdge::new(true);
        assert!(!edge.update(true, false));
        assert!(edge.update(false, false));
        // Staying loud is not a new edge
        assert!(!edge.update(false, false));
        assert!(!edge.update(true, false));
        assert!(edge.update(false, false));
    }

    #[test]
    fn test_sound_suppressed_during_tone() {
        let mut edge = SoundEdge::new(true);
        assert!(!edge.update(false, true));
        // Baseline moved on: no late edge once the tone stops
        assert!(!edge.update(false, false));
    }
}

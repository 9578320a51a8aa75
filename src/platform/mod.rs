//! Platform abstraction layer
//!
//! Narrow capability traits for each sensor on the rig plus the clock, so the
//! game core never talks to hardware directly:
//! - Tilt (accelerometer), touch pad, sound comparator
//! - Trigger button and rotary encoder
//! - Time and blocking pauses

pub mod clock;
pub mod fake;

use glam::{Vec2, Vec3};
use thiserror::Error;

pub use clock::{Clock, ManualClock, SystemClock};

use crate::consts::DEBOUNCE_SECS;

/// Sensor read failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SensorError {
    /// Transient I2C/GPIO fault
    #[error("bus error: {0}")]
    Bus(String),
    /// Device has not produced a sample yet
    #[error("sensor not ready")]
    NotReady,
}

/// Accelerometer (m/s² per axis)
pub trait TiltSensor {
    fn acceleration(&mut self) -> Result<Vec3, SensorError>;
}

/// Capacitive touch pad used as the shield
pub trait TouchSensor {
    fn is_touched(&mut self) -> Result<bool, SensorError>;
}

/// Sound comparator: high while quiet, low while loud
pub trait SoundSensor {
    fn is_quiet(&mut self) -> Result<bool, SensorError>;
}

/// Raw trigger button level
pub trait TriggerButton {
    fn is_pressed(&mut self) -> Result<bool, SensorError>;
}

/// Rotary encoder: net detents since the last call
pub trait RotaryEncoder {
    fn delta(&mut self) -> Result<i32, SensorError>;
}

/// Turns a bouncing button level into clean press edges.
/// The first reading is taken as the settled level, so a button already held
/// when sampling starts never reports a press.
#[derive(Debug, Clone, Copy)]
pub struct Debouncer {
    primed: bool,
    last_raw: bool,
    stable: bool,
    changed_at: f32,
    window: f32,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEBOUNCE_SECS)
    }
}

impl Debouncer {
    pub fn new(window: f32) -> Self {
        Self {
            primed: false,
            last_raw: false,
            stable: false,
            changed_at: 0.0,
            window,
        }
    }

    /// Feed the raw level; true exactly once per press after it settles
    pub fn update(&mut self, pressed: bool, now: f32) -> bool {
        if !self.primed {
            self.primed = true;
            self.last_raw = pressed;
            self.stable = pressed;
            self.changed_at = now;
            return false;
        }
        if pressed != self.last_raw {
            self.changed_at = now;
            self.last_raw = pressed;
        }
        if now - self.changed_at > self.window && self.stable != pressed {
            self.stable = pressed;
            return pressed;
        }
        false
    }

    /// Settled level
    pub fn is_held(&self) -> bool {
        self.stable
    }
}

/// One tick's worth of sensor readings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorSample {
    pub tilt: Vec2,
    pub touch: bool,
    pub quiet: bool,
    /// Debounced press edge
    pub trigger: bool,
}

impl Default for SensorSample {
    fn default() -> Self {
        Self {
            tilt: Vec2::ZERO,
            touch: false,
            quiet: true,
            trigger: false,
        }
    }
}

/// All sensors on the handheld. Failed reads are replaced with a neutral
/// value for that tick only.
pub struct SensorRig {
    pub tilt: Box<dyn TiltSensor>,
    pub touch: Box<dyn TouchSensor>,
    pub sound: Box<dyn SoundSensor>,
    pub button: Box<dyn TriggerButton>,
    pub encoder: Box<dyn RotaryEncoder>,
    debouncer: Debouncer,
    faults: u64,
}

impl SensorRig {
    pub fn new(
        tilt: Box<dyn TiltSensor>,
        touch: Box<dyn TouchSensor>,
        sound: Box<dyn SoundSensor>,
        button: Box<dyn TriggerButton>,
        encoder: Box<dyn RotaryEncoder>,
    ) -> Self {
        Self {
            tilt,
            touch,
            sound,
            button,
            encoder,
            debouncer: Debouncer::default(),
            faults: 0,
        }
    }

    /// Read every game sensor once
    pub fn sample(&mut self, now: f32) -> SensorSample {
        let tilt = self.read_tilt();
        let touch = self.read_touch();
        let quiet = self.read_quiet();
        let trigger = self.read_trigger(now);
        SensorSample {
            tilt,
            touch,
            quiet,
            trigger,
        }
    }

    pub fn read_tilt(&mut self) -> Vec2 {
        let reading = self.tilt.acceleration();
        self.neutral_on_error("tilt", reading).truncate()
    }

    pub fn read_touch(&mut self) -> bool {
        let reading = self.touch.is_touched();
        self.neutral_on_error("touch", reading)
    }

    pub fn read_quiet(&mut self) -> bool {
        match self.sound.is_quiet() {
            Ok(quiet) => quiet,
            Err(e) => {
                self.note_fault("sound", &e);
                true
            }
        }
    }

    /// Debounced press edge
    pub fn read_trigger(&mut self, now: f32) -> bool {
        let reading = self.button.is_pressed();
        let pressed = self.neutral_on_error("button", reading);
        self.debouncer.update(pressed, now)
    }

    /// Raw button level (long-press detection)
    pub fn button_held(&mut self) -> bool {
        let reading = self.button.is_pressed();
        self.neutral_on_error("button", reading)
    }

    pub fn read_rotary(&mut self) -> i32 {
        let reading = self.encoder.delta();
        self.neutral_on_error("encoder", reading)
    }

    /// Number of failed reads so far
    pub fn faults(&self) -> u64 {
        self.faults
    }

    fn neutral_on_error<T: Default>(&mut self, name: &str, reading: Result<T, SensorError>) -> T {
        reading.unwrap_or_else(|e| {
            self.note_fault(name, &e);
            T::default()
        })
    }

    fn note_fault(&mut self, name: &str, e: &SensorError) {
        self.faults += 1;
        log::warn!("{name} read failed ({e}), using neutral reading");
    }
}

#[cfg(test)]
mod tests {
    use super::fake::{Script, ScriptedRig};
    use super::*;

    #[test]
    fn test_debounce_single_edge() {
        let mut d = Debouncer::new(0.02);
        assert!(!d.update(false, 0.00));
        assert!(!d.update(true, 0.00));
        assert!(!d.update(true, 0.01));
        assert!(d.update(true, 0.03));
        // Held: no repeat
        assert!(!d.update(true, 0.05));
        assert!(d.is_held());
        // Release settles silently
        assert!(!d.update(false, 0.06));
        assert!(!d.update(false, 0.10));
        assert!(!d.is_held());
        assert!(!d.update(true, 0.12));
        assert!(d.update(true, 0.15));
    }

    #[test]
    fn test_debounce_ignores_bounce() {
        let mut d = Debouncer::new(0.02);
        assert!(!d.update(false, 0.000));
        assert!(!d.update(true, 0.001));
        assert!(!d.update(false, 0.005));
        assert!(!d.update(true, 0.010));
        assert!(!d.update(false, 0.015));
        assert!(!d.update(false, 0.050));
        assert!(!d.is_held());
    }

    #[test]
    fn test_failed_reads_are_neutral() {
        let script = Script::default();
        script.fail_next_reads(1);
        let mut rig = ScriptedRig::rig(&script);
        script.set_tilt(Vec3::new(3.0, -2.0, 9.8));
        script.set_touch(true);
        script.set_quiet(false);

        let sample = rig.sample(0.0);
        assert_eq!(sample, SensorSample::default());
        assert_eq!(rig.faults(), 4);

        // Next tick reads normally again
        let sample = rig.sample(0.02);
        assert_eq!(sample.tilt, Vec2::new(3.0, -2.0));
        assert!(sample.touch);
        assert!(!sample.quiet);
    }

    #[test]
    fn test_trigger_goes_through_debouncer() {
        let script = Script::default();
        let mut rig = ScriptedRig::rig(&script);
        assert!(!rig.sample(0.00).trigger);
        script.set_button(true);
        assert!(!rig.sample(0.02).trigger);
        assert!(rig.sample(0.06).trigger);
        assert!(!rig.sample(0.08).trigger);
        assert!(rig.button_held());
    }

    #[test]
    fn test_button_held_at_start_is_not_a_press() {
        let mut d = Debouncer::new(0.02);
        assert!(!d.update(true, 0.0));
        assert!(d.is_held());
        assert!(!d.update(true, 0.5));
        // Only a fresh press after letting go counts
        assert!(!d.update(false, 0.6));
        assert!(!d.update(false, 0.7));
        assert!(!d.update(true, 0.8));
        assert!(d.update(true, 0.9));
    }
}

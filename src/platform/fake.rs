//! Scripted sensors for tests and headless demo runs
//!
//! All fakes share one `Script`, so a test can change readings between ticks
//! while the rig owns the boxed sensors.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use glam::Vec3;

use super::{
    RotaryEncoder, SensorError, SensorRig, SoundSensor, TiltSensor, TouchSensor, TriggerButton,
};

#[derive(Debug, Default)]
struct ScriptState {
    tilt: Vec3,
    touch: bool,
    quiet: bool,
    button: bool,
    /// Queued encoder deltas, one per read
    rotary: VecDeque<i32>,
    /// Queued button levels, one per read; falls back to `button`
    button_levels: VecDeque<bool>,
    fail: [u32; 5],
}

/// Shared, mutable sensor readings
#[derive(Debug, Clone)]
pub struct Script(Rc<RefCell<ScriptState>>);

impl Default for Script {
    fn default() -> Self {
        Self(Rc::new(RefCell::new(ScriptState {
            quiet: true,
            ..Default::default()
        })))
    }
}

const TILT: usize = 0;
const TOUCH: usize = 1;
const SOUND: usize = 2;
const BUTTON: usize = 3;
const ENCODER: usize = 4;

impl Script {
    pub fn set_tilt(&self, tilt: Vec3) {
        self.0.borrow_mut().tilt = tilt;
    }

    pub fn set_touch(&self, touch: bool) {
        self.0.borrow_mut().touch = touch;
    }

    pub fn set_quiet(&self, quiet: bool) {
        self.0.borrow_mut().quiet = quiet;
    }

    pub fn set_button(&self, pressed: bool) {
        self.0.borrow_mut().button = pressed;
    }

    /// Queue button levels returned by successive reads
    pub fn queue_button(&self, levels: impl IntoIterator<Item = bool>) {
        self.0.borrow_mut().button_levels.extend(levels);
    }

    /// Queue encoder deltas returned by successive reads
    pub fn queue_rotary(&self, deltas: impl IntoIterator<Item = i32>) {
        self.0.borrow_mut().rotary.extend(deltas);
    }

    /// Make the next `n` reads of every sensor fail
    pub fn fail_next_reads(&self, n: u32) {
        self.0.borrow_mut().fail = [n; 5];
    }

    fn read<T>(&self, sensor: usize, f: impl FnOnce(&mut ScriptState) -> T) -> Result<T, SensorError> {
        let mut state = self.0.borrow_mut();
        if state.fail[sensor] > 0 {
            state.fail[sensor] -= 1;
            return Err(SensorError::Bus("scripted fault".into()));
        }
        Ok(f(&mut state))
    }
}

/// Fake sensor bound to a script
#[derive(Debug, Clone)]
pub struct ScriptedRig(Script);

impl ScriptedRig {
    /// Build a full sensor rig whose readings come from `script`
    pub fn rig(script: &Script) -> SensorRig {
        SensorRig::new(
            Box::new(ScriptedRig(script.clone())),
            Box::new(ScriptedRig(script.clone())),
            Box::new(ScriptedRig(script.clone())),
            Box::new(ScriptedRig(script.clone())),
            Box::new(ScriptedRig(script.clone())),
        )
    }
}

impl TiltSensor for ScriptedRig {
    fn acceleration(&mut self) -> Result<Vec3, SensorError> {
        self.0.read(TILT, |s| s.tilt)
    }
}

impl TouchSensor for ScriptedRig {
    fn is_touched(&mut self) -> Result<bool, SensorError> {
        self.0.read(TOUCH, |s| s.touch)
    }
}

impl SoundSensor for ScriptedRig {
    fn is_quiet(&mut self) -> Result<bool, SensorError> {
        self.0.read(SOUND, |s| s.quiet)
    }
}

impl TriggerButton for ScriptedRig {
    fn is_pressed(&mut self) -> Result<bool, SensorError> {
        self.0
            .read(BUTTON, |s| s.button_levels.pop_front().unwrap_or(s.button))
    }
}

impl RotaryEncoder for ScriptedRig {
    fn delta(&mut self) -> Result<i32, SensorError> {
        self.0.read(ENCODER, |s| s.rotary.pop_front().unwrap_or(0))
    }
}

//! Player name entry for the leaderboard
//!
//! The encoder scrolls through A-Z, a short press locks in a letter and a long
//! press finishes early. Names are 1-3 letters.

use crate::platform::{Clock, SensorRig};

pub const LETTERS: &[u8; 26] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
/// Default name length
pub const MAX_NAME_LEN: usize = 3;
/// Encoder detents needed to move one letter
pub const STEP_THRESHOLD: i32 = 2;
/// Hold time that counts as a long press (seconds)
pub const LONG_PRESS_SECS: f32 = 0.6;
/// Poll interval while waiting on the encoder/button
const POLL_SECS: f32 = 0.01;

/// Name entry state machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameEntry {
    name: String,
    index: usize,
    accum: i32,
    max_len: usize,
}

impl Default for NameEntry {
    fn default() -> Self {
        Self::new(MAX_NAME_LEN)
    }
}

impl NameEntry {
    pub fn new(max_len: usize) -> Self {
        Self {
            name: String::new(),
            index: 0,
            accum: 0,
            max_len: max_len.max(1),
        }
    }

    /// Letter under the cursor
    pub fn current(&self) -> char {
        LETTERS[self.index] as char
    }

    /// Letters locked in so far
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name padded with underscores ("AB_")
    pub fn display(&self) -> String {
        format!("{}{}", self.name, "_".repeat(self.max_len - self.name.len()))
    }

    /// Feed encoder movement. Reversing direction drops partial progress.
    pub fn rotate(&mut self, delta: i32) {
        if delta == 0 {
            return;
        }
        if self.accum.signum() * delta.signum() < 0 {
            self.accum = 0;
        }
        self.accum += delta;

        if self.accum >= STEP_THRESHOLD {
            self.index = (self.index + 1) % LETTERS.len();
            self.accum = 0;
        } else if self.accum <= -STEP_THRESHOLD {
            self.index = (self.index + LETTERS.len() - 1) % LETTERS.len();
            self.accum = 0;
        }
    }

    /// Short press: lock in the current letter. Returns the name once a press
    /// arrives with the name already full.
    pub fn confirm(&mut self) -> Option<String> {
        if self.name.len() < self.max_len {
            self.name.push(self.current());
            None
        } else {
            Some(self.name.clone())
        }
    }

    /// Long press: finish now (an empty name takes the current letter)
    pub fn finish(&mut self) -> String {
        if self.name.is_empty() {
            self.name.push(self.current());
        }
        self.name.clone()
    }
}

/// Supplies a player tag when a score is eligible
pub trait NameSource {
    fn enter_name(&mut self, rig: &mut SensorRig, clock: &mut dyn Clock) -> String;
}

/// Interactive entry on the encoder and trigger button
#[derive(Debug, Clone, Copy)]
pub struct EncoderNameInput {
    pub max_len: usize,
}

impl Default for EncoderNameInput {
    fn default() -> Self {
        Self {
            max_len: MAX_NAME_LEN,
        }
    }
}

impl NameSource for EncoderNameInput {
    fn enter_name(&mut self, rig: &mut SensorRig, clock: &mut dyn Clock) -> String {
        let mut entry = NameEntry::new(self.max_len);
        loop {
            entry.rotate(rig.read_rotary());

            if rig.button_held() {
                let pressed_at = clock.now();
                let mut long_press = false;
                while rig.button_held() {
                    if clock.now() - pressed_at >= LONG_PRESS_SECS {
                        long_press = true;
                        break;
                    }
                    clock.sleep(POLL_SECS);
                }

                if long_press {
                    return entry.finish();
                }
                if let Some(name) = entry.confirm() {
                    return name;
                }
                log::debug!("name so far: {}", entry.display());
            }

            clock.sleep(POLL_SECS);
        }
    }
}

/// Always answers with the same tag (demo and tests)
#[derive(Debug, Clone)]
pub struct FixedName(pub String);

impl NameSource for FixedName {
    fn enter_name(&mut self, _rig: &mut SensorRig, _clock: &mut dyn Clock) -> String {
        self.0.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::ManualClock;
    use crate::platform::fake::{Script, ScriptedRig};

    #[test]
    fn test_rotation_threshold_and_wrap() {
        let mut entry = NameEntry::default();
        entry.rotate(1);
        assert_eq!(entry.current(), 'A');
        entry.rotate(1);
        assert_eq!(entry.current(), 'B');
        entry.rotate(-2);
        entry.rotate(-2);
        assert_eq!(entry.current(), 'Z');
    }

    #[test]
    fn test_reversal_resets_accumulator() {
        let mut entry = NameEntry::default();
        entry.rotate(1);
        entry.rotate(-1);
        entry.rotate(1);
        assert_eq!(entry.current(), 'A');
        entry.rotate(1);
        assert_eq!(entry.current(), 'B');
    }

    #[test]
    fn test_confirm_and_finish() {
        let mut entry = NameEntry::default();
        assert_eq!(entry.confirm(), None);
        entry.rotate(2);
        assert_eq!(entry.confirm(), None);
        assert_eq!(entry.display(), "AB_");
        assert_eq!(entry.confirm(), None);
        assert_eq!(entry.confirm(), Some("ABB".to_string()));

        let mut empty = NameEntry::default();
        empty.rotate(-2);
        assert_eq!(empty.finish(), "Z");
    }

    #[test]
    fn test_encoder_input_short_then_long_press() {
        let script = Script::default();
        let mut rig = ScriptedRig::rig(&script);
        let mut clock = ManualClock::new();

        // Turn to C, two short presses, then hold until the long press fires
        script.queue_rotary([2, 2]);
        script.queue_button([false, false, true, false, true, false]);
        script.queue_button([true; 80]);

        let name = EncoderNameInput::default().enter_name(&mut rig, &mut clock);
        assert_eq!(name, "CC");
    }
}

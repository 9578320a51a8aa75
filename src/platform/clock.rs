//! Session time and blocking pauses

use std::time::{Duration, Instant};

/// Monotonic seconds plus the ability to block the loop
pub trait Clock {
    /// Seconds since the clock was created
    fn now(&self) -> f32;
    /// Block for `secs` (nothing else runs meanwhile)
    fn sleep(&mut self, secs: f32);
}

/// Wall clock backed by `Instant`
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    start: Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> f32 {
        self.start.elapsed().as_secs_f32()
    }

    fn sleep(&mut self, secs: f32) {
        if secs > 0.0 {
            std::thread::sleep(Duration::from_secs_f32(secs));
        }
    }
}

/// Virtual clock: time only moves when the loop sleeps
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualClock {
    now: f64,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, secs: f32) {
        self.now += secs.max(0.0) as f64;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f32 {
        self.now as f32
    }

    fn sleep(&mut self, secs: f32) {
        self.advance(secs);
    }
}

//! Per-tick session update
//!
//! `tick` is a pure function of the sampled inputs and the prior state: it
//! never sleeps, reads hardware or draws. Blocking pauses and presentation
//! belong to the session loop.

use glam::Vec2;

use super::combat::{self, CombatInput};
use super::level::LevelStep;
use super::state::{GameEvent, Outcome, SessionState};

/// Sensor readings for a single tick (deterministic)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickInput {
    /// Session time in seconds
    pub now: f32,
    /// Accelerometer x/y
    pub tilt: Vec2,
    /// Touch pad held (shield)
    pub touch: bool,
    /// Sound comparator reports quiet
    pub quiet: bool,
    /// Debounced trigger press edge
    pub trigger: bool,
    /// Our own buzzer is sounding
    pub tone_active: bool,
}

impl Default for TickInput {
    fn default() -> Self {
        Self {
            now: 0.0,
            tilt: Vec2::ZERO,
            touch: false,
            quiet: true,
            trigger: false,
            tone_active: false,
        }
    }
}

impl TickInput {
    /// Idle input at a given time
    pub fn at(now: f32) -> Self {
        Self {
            now,
            ..Default::default()
        }
    }
}

/// Advance the session by one tick and report what happened
pub fn tick(state: &mut SessionState, input: &TickInput) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if state.is_over() {
        return events;
    }
    let now = input.now;

    // Level countdown
    match state.timer.step(now) {
        LevelStep::Running => {}
        LevelStep::Advanced(level) => {
            state.enter_level(level, now);
            log::info!("Level {} ({} zombies max)", level, state.config.max_population);
            events.push(GameEvent::LevelUp { level });
        }
        LevelStep::Finished => {
            let outcome = if state.timer.is_boss_level() {
                Outcome::Cleared
            } else {
                Outcome::TimeUpAtCap
            };
            end_session(state, outcome, &mut events);
            return events;
        }
    }

    // Sensors
    let shield_active = input.touch;
    state.shield_active = shield_active;
    state.crosshair = state.aim.update(input.tilt);
    let sound_edge = state.sound.update(input.quiet, input.tone_active);

    // Expiry damage
    let expiry = state.zombies.tick(now, shield_active);
    if expiry.damage > 0 {
        let dead = state.take_damage(expiry.damage);
        events.push(GameEvent::Damage {
            amount: expiry.damage.min(u8::MAX as u32) as u8,
        });
        if dead {
            end_session(state, Outcome::Dead, &mut events);
            return events;
        }
    }

    state.maybe_spawn(now);

    let combat_input = CombatInput {
        sound_edge,
        shield_active,
        trigger: input.trigger,
        crosshair: state.crosshair,
    };
    combat::resolve(state, &combat_input, &mut events);

    events
}

fn end_session(state: &mut SessionState, outcome: Outcome, events: &mut Vec<GameEvent>) {
    log::info!(
        "Session over: {:?} at level {} with score {}",
        outcome,
        state.level(),
        state.score
    );
    state.finish(outcome);
    events.push(GameEvent::SessionOver(outcome));
}

//! Combat resolution
//!
//! Runs once per tick in a fixed order: sound kill, shield kill, then the
//! trigger. All three may fire in the same tick. Sound and shield each take at
//! most one zombie per tick.

use glam::IVec2;

use super::state::{GameEvent, SessionState};
use super::zombie::ZombieKind;

/// The player's actions for this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CombatInput {
    /// Loud-sound edge (already filtered for our own buzzer)
    pub sound_edge: bool,
    /// Touch pad held
    pub shield_active: bool,
    /// Debounced trigger press edge
    pub trigger: bool,
    /// Where the shot lands
    pub crosshair: IVec2,
}

/// Apply one tick of player actions against the live zombies
pub fn resolve(state: &mut SessionState, input: &CombatInput, events: &mut Vec<GameEvent>) {
    if input.sound_edge {
        kill_first(state, ZombieKind::SoundWeak, events);
    }

    if input.shield_active {
        kill_first(state, ZombieKind::ShieldWeak, events);
    }

    if input.trigger {
        shoot(state, input, events);
    }
}

fn kill_first(state: &mut SessionState, kind: ZombieKind, events: &mut Vec<GameEvent>) {
    let Some(id) = state.zombies.first_of_kind(kind).map(|z| z.id) else {
        return;
    };
    if let Some(kind) = state.kill(id) {
        log::debug!("{kind:?} zombie {id} down, score {}", state.score);
        events.push(GameEvent::Hit { kind });
    }
}

fn shoot(state: &mut SessionState, input: &CombatInput, events: &mut Vec<GameEvent>) {
    // Shooting is disabled while the shield is raised
    if input.shield_active {
        state.stats.blocked_shots += 1;
        events.push(GameEvent::ShieldBlocked);
        return;
    }

    state.shot_fired = true;
    state.stats.shots += 1;
    events.push(GameEvent::MuzzleFlash);

    // Only Melee zombies die to bullets; S and T just soak the shot
    let target = state
        .zombies
        .find_hit(input.crosshair)
        .filter(|z| z.kind == ZombieKind::Melee)
        .map(|z| z.id);

    match target.and_then(|id| state.kill(id)) {
        Some(kind) => events.push(GameEvent::Hit { kind }),
        None => {
            state.stats.misses += 1;
            events.push(GameEvent::Miss);
        }
    }
}

//! Session state and core simulation types
//!
//! Everything one play-through mutates lives in `SessionState`; it is built
//! fresh for every session and dropped once end-of-game handling is done.

use glam::IVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::aim::{AimResolver, SoundEdge};
use super::level::{LevelConfig, LevelTimer, level_config};
use super::zombie::{ZombieKind, ZombieRegistry};
use crate::consts::MAX_HP;
use crate::settings::Difficulty;

/// How a session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Hit points reached zero
    Dead,
    /// The last level of a shortened run timed out
    TimeUpAtCap,
    /// Survived all 10 levels
    Cleared,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Dead => "YOU DIED",
            Outcome::TimeUpAtCap => "TIME UP",
            Outcome::Cleared => "ALL CLEAR",
        }
    }
}

/// Things that happened during a tick, consumed by feedback and HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Trigger pulled with the shield down
    MuzzleFlash,
    /// A zombie was killed
    Hit { kind: ZombieKind },
    /// Shot hit nothing killable
    Miss,
    /// Expired zombies got through
    Damage { amount: u8 },
    /// Trigger pulled while the shield is up
    ShieldBlocked,
    /// Next level started (population re-seeded)
    LevelUp { level: u8 },
    /// The session reached a terminal state
    SessionOver(Outcome),
}

/// Running counters for the end-of-session report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub shots: u32,
    pub misses: u32,
    pub blocked_shots: u32,
    pub melee_kills: u32,
    pub sound_kills: u32,
    pub shield_kills: u32,
    pub damage_taken: u32,
}

impl SessionStats {
    pub fn kills(&self) -> u32 {
        self.melee_kills + self.sound_kills + self.shield_kills
    }
}

/// Complete state of one play-through
#[derive(Debug, Clone)]
pub struct SessionState {
    pub difficulty: Difficulty,
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub timer: LevelTimer,
    pub config: LevelConfig,
    pub zombies: ZombieRegistry,
    pub aim: AimResolver,
    pub sound: SoundEdge,
    pub score: u32,
    pub hp: u8,
    /// Any shot fired this session (drives the no-shot ending)
    pub shot_fired: bool,
    /// Latest crosshair position
    pub crosshair: IVec2,
    /// Latest shield flag
    pub shield_active: bool,
    /// Session time of the last refill spawn
    pub last_spawn_at: f32,
    pub stats: SessionStats,
    outcome: Option<Outcome>,
}

impl SessionState {
    /// Start at level 1 with a full population
    pub fn new(difficulty: Difficulty, level_count: u8, seed: u64, now: f32) -> Self {
        let aim = AimResolver::new();
        let mut state = Self {
            difficulty,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            timer: LevelTimer::new(level_count, now),
            config: level_config(difficulty, 1),
            zombies: ZombieRegistry::new(),
            aim,
            sound: SoundEdge::default(),
            score: 0,
            hp: MAX_HP,
            shot_fired: false,
            crosshair: aim.crosshair(),
            shield_active: false,
            last_spawn_at: now,
            stats: SessionStats::default(),
            outcome: None,
        };
        state.seed_population(now);
        state
    }

    pub fn level(&self) -> u8 {
        self.timer.level
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Record the terminal state; the first one wins
    pub fn finish(&mut self, outcome: Outcome) {
        if self.outcome.is_none() {
            self.outcome = Some(outcome);
            self.zombies.clear();
        }
    }

    /// Fill the registry up to the level cap
    pub fn seed_population(&mut self, now: f32) {
        let level = self.timer.level;
        while self.zombies.len() < self.config.max_population {
            self.zombies.spawn(&self.config, level, now, &mut self.rng);
        }
        self.last_spawn_at = now;
    }

    /// Switch to `level`: force-clear without damage, then re-seed
    pub fn enter_level(&mut self, level: u8, now: f32) {
        self.config = level_config(self.difficulty, level);
        self.zombies.clear();
        self.seed_population(now);
    }

    /// Refill one slot if the population is short and the interval elapsed
    pub fn maybe_spawn(&mut self, now: f32) -> bool {
        if self.zombies.len() >= self.config.max_population {
            return false;
        }
        if now - self.last_spawn_at < self.config.spawn_interval {
            return false;
        }
        let level = self.timer.level;
        self.zombies.spawn(&self.config, level, now, &mut self.rng);
        self.last_spawn_at = now;
        true
    }

    /// Remove a zombie and credit the kill
    pub fn kill(&mut self, id: u32) -> Option<ZombieKind> {
        let zombie = self.zombies.remove(id)?;
        self.score += 1;
        match zombie.kind {
            ZombieKind::Melee => self.stats.melee_kills += 1,
            ZombieKind::SoundWeak => self.stats.sound_kills += 1,
            ZombieKind::ShieldWeak => self.stats.shield_kills += 1,
        }
        Some(zombie.kind)
    }

    /// Apply expiry damage; returns true if this killed the player
    pub fn take_damage(&mut self, amount: u32) -> bool {
        let amount = amount.min(u8::MAX as u32) as u8;
        self.hp = self.hp.saturating_sub(amount);
        self.stats.damage_taken += amount as u32;
        self.hp == 0
    }

    /// Move every session timestamp forward by a blocking pause
    pub fn shift_clock(&mut self, by: f32) {
        self.timer.started_at += by;
        self.last_spawn_at += by;
        self.zombies.shift_clock(by);
    }

    /// Capture the sound comparator level the session starts from
    pub fn prime_sound(&mut self, quiet: bool) {
        self.sound = SoundEdge::new(quiet);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_session_is_seeded() {
        let state = SessionState::new(Difficulty::Easy, 10, 1, 0.0);
        assert_eq!(state.level(), 1);
        assert_eq!(state.hp, 3);
        assert_eq!(state.score, 0);
        assert_eq!(state.zombies.len(), 3);
        assert!(state.zombies.iter().all(|z| z.kind == ZombieKind::Melee));
        assert!(!state.is_over());
    }

    #[test]
    fn test_first_outcome_wins() {
        let mut state = SessionState::new(Difficulty::Normal, 10, 1, 0.0);
        state.finish(Outcome::Dead);
        state.finish(Outcome::Cleared);
        assert_eq!(state.outcome(), Some(Outcome::Dead));
        assert!(state.zombies.is_empty());
    }

    #[test]
    fn test_maybe_spawn_respects_cap_and_interval() {
        let mut state = SessionState::new(Difficulty::Normal, 10, 3, 0.0);
        assert!(!state.maybe_spawn(5.0)); // full

        let id = state.zombies.iter().next().unwrap().id;
        state.zombies.remove(id);
        assert!(!state.maybe_spawn(1.0)); // 1.8 s interval not reached
        assert!(state.maybe_spawn(1.8));
        assert_eq!(state.zombies.len(), 4);
        assert_eq!(state.last_spawn_at, 1.8);
    }

    #[test]
    fn test_kill_credits_score() {
        let mut state = SessionState::new(Difficulty::Easy, 10, 3, 0.0);
        let id = state.zombies.iter().next().unwrap().id;
        assert_eq!(state.kill(id), Some(ZombieKind::Melee));
        assert_eq!(state.kill(id), None);
        assert_eq!(state.score, 1);
        assert_eq!(state.stats.melee_kills, 1);
    }

    #[test]
    fn test_shift_clock_moves_everything() {
        let mut state = SessionState::new(Difficulty::Easy, 10, 3, 2.0);
        state.shift_clock(1.2);
        assert!((state.timer.started_at - 3.2).abs() < 1e-6);
        assert!((state.last_spawn_at - 3.2).abs() < 1e-6);
        assert!(state.zombies.iter().all(|z| (z.spawned_at - 3.2).abs() < 1e-6));
    }
}

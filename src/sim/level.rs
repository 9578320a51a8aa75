//! Level configuration and the per-level countdown
//!
//! A level is a fixed 10 second countdown. When it runs out the controller
//! either advances to the next level or reports that the run is over.

use serde::{Deserialize, Serialize};

use crate::consts::{LEVEL_DURATION, MAX_LEVEL};
use crate::settings::Difficulty;

/// Zombie lifetime (seconds) per difficulty, indexed by level - 1
const LIFETIME_EASY: [f32; 10] = [8.0, 8.0, 7.5, 7.5, 7.0, 6.5, 6.0, 5.5, 5.0, 4.5];
const LIFETIME_NORMAL: [f32; 10] = [7.0, 6.5, 6.0, 5.5, 5.0, 4.5, 4.0, 3.7, 3.4, 3.0];
const LIFETIME_DIFFICULT: [f32; 10] = [5.0, 4.5, 4.0, 3.5, 3.0, 2.8, 2.6, 2.4, 2.2, 2.0];

/// Parameters for one level, derived from (difficulty, level)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelConfig {
    /// Max zombies on screen
    pub max_population: usize,
    /// Seconds between refill spawns
    pub spawn_interval: f32,
    /// Seconds a zombie stays before it hurts the player
    pub zombie_lifetime: f32,
    /// Final level with the skewed kind mix
    pub boss: bool,
}

/// Look up the configuration for `level` (1-based, clamped to 1..=10)
pub fn level_config(difficulty: Difficulty, level: u8) -> LevelConfig {
    let level = level.clamp(1, MAX_LEVEL);

    // Population and spawn pace only depend on difficulty
    let (max_population, spawn_interval, lifetimes) = match difficulty {
        Difficulty::Easy => (3, 2.5, &LIFETIME_EASY),
        Difficulty::Normal => (4, 1.8, &LIFETIME_NORMAL),
        Difficulty::Difficult => (5, 1.2, &LIFETIME_DIFFICULT),
    };

    LevelConfig {
        max_population,
        spawn_interval,
        zombie_lifetime: lifetimes[(level - 1) as usize],
        boss: level == MAX_LEVEL,
    }
}

/// What the countdown did this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelStep {
    /// Still counting down
    Running,
    /// Moved on to the given level; the population must be re-seeded
    Advanced(u8),
    /// The last level's timer ran out
    Finished,
}

/// Level/timer controller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelTimer {
    /// Current level (1-based)
    pub level: u8,
    /// Last level of this run
    pub last_level: u8,
    /// Session time the current level started
    pub started_at: f32,
}

impl LevelTimer {
    pub fn new(last_level: u8, now: f32) -> Self {
        Self {
            level: 1,
            last_level: last_level.clamp(1, MAX_LEVEL),
            started_at: now,
        }
    }

    /// Seconds left in the current level (may be negative once expired)
    pub fn remaining(&self, now: f32) -> f32 {
        LEVEL_DURATION - (now - self.started_at)
    }

    /// Whole seconds shown on the HUD
    pub fn remaining_display(&self, now: f32) -> u32 {
        self.remaining(now).max(0.0) as u32
    }

    /// Advance the countdown; levels are never skipped
    pub fn step(&mut self, now: f32) -> LevelStep {
        if self.remaining(now) > 0.0 {
            return LevelStep::Running;
        }
        if self.level < self.last_level {
            self.level += 1;
            self.started_at = now;
            LevelStep::Advanced(self.level)
        } else {
            LevelStep::Finished
        }
    }

    /// Whether the run reached and survived the boss level
    pub fn is_boss_level(&self) -> bool {
        self.level == MAX_LEVEL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_easy_level_one() {
        let cfg = level_config(Difficulty::Easy, 1);
        assert_eq!(cfg.max_population, 3);
        assert_eq!(cfg.spawn_interval, 2.5);
        assert_eq!(cfg.zombie_lifetime, 8.0);
        assert!(!cfg.boss);
    }

    #[test]
    fn test_tables_for_all_levels() {
        for difficulty in Difficulty::ALL {
            let table = match difficulty {
                Difficulty::Easy => LIFETIME_EASY,
                Difficulty::Normal => LIFETIME_NORMAL,
                Difficulty::Difficult => LIFETIME_DIFFICULT,
            };
            for level in 1..=10u8 {
                let cfg = level_config(difficulty, level);
                assert_eq!(cfg.zombie_lifetime, table[(level - 1) as usize]);
                assert_eq!(cfg.boss, level == 10);
            }
        }
        assert_eq!(level_config(Difficulty::Normal, 5).max_population, 4);
        assert_eq!(level_config(Difficulty::Normal, 5).spawn_interval, 1.8);
        assert_eq!(level_config(Difficulty::Difficult, 10).max_population, 5);
        assert_eq!(level_config(Difficulty::Difficult, 10).spawn_interval, 1.2);
        assert_eq!(level_config(Difficulty::Difficult, 10).zombie_lifetime, 2.0);
    }

    #[test]
    fn test_timer_advances_one_level_at_a_time() {
        let mut timer = LevelTimer::new(10, 0.0);
        assert_eq!(timer.step(9.99), LevelStep::Running);
        assert_eq!(timer.remaining_display(0.5), 9);
        // Even a long stall only moves one level
        assert_eq!(timer.step(35.0), LevelStep::Advanced(2));
        assert_eq!(timer.started_at, 35.0);
        assert_eq!(timer.step(35.1), LevelStep::Running);
    }

    #[test]
    fn test_timer_finishes_on_last_level() {
        let mut timer = LevelTimer::new(2, 0.0);
        assert_eq!(timer.step(10.0), LevelStep::Advanced(2));
        assert_eq!(timer.step(20.0), LevelStep::Finished);
        assert_eq!(timer.level, 2);
        assert!(!timer.is_boss_level());
    }
}

//! Deterministic game core
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Time comes in through `TickInput`, never from a clock
//! - Seeded RNG only
//! - Stable iteration order (insertion order of zombies)
//! - No hardware, rendering or sleeping

pub mod aim;
pub mod combat;
pub mod level;
pub mod state;
pub mod tick;
pub mod zombie;

pub use aim::{AimResolver, SoundEdge};
pub use combat::CombatInput;
pub use level::{LevelConfig, LevelStep, LevelTimer, level_config};
pub use state::{GameEvent, Outcome, SessionState, SessionStats};
pub use tick::{TickInput, tick};
pub use zombie::{ExpiryReport, KindWeights, Zombie, ZombieKind, ZombieRegistry, kind_weights};

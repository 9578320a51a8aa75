//! Zombies and the live registry
//!
//! The registry keeps zombies in insertion order; that order decides which
//! zombie wins when several match a hit test or a kill condition.

use glam::IVec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::level::LevelConfig;
use crate::consts::*;

/// Zombie types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZombieKind {
    /// Only dies to an aimed shot
    Melee,
    /// Only dies to a loud sound
    SoundWeak,
    /// Only dies while the shield is raised
    ShieldWeak,
}

impl ZombieKind {
    /// Single character drawn on screen
    pub fn glyph(&self) -> char {
        match self {
            ZombieKind::Melee => 'Z',
            ZombieKind::SoundWeak => 'S',
            ZombieKind::ShieldWeak => 'T',
        }
    }
}

/// Kind mix for one level bucket, in percent (Melee, SoundWeak, ShieldWeak)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KindWeights {
    pub melee: u32,
    pub sound_weak: u32,
    pub shield_weak: u32,
}

impl KindWeights {
    const fn new(melee: u32, sound_weak: u32, shield_weak: u32) -> Self {
        Self {
            melee,
            sound_weak,
            shield_weak,
        }
    }

    pub fn total(&self) -> u32 {
        self.melee + self.sound_weak + self.shield_weak
    }

    /// Weight assigned to one kind
    pub fn weight(&self, kind: ZombieKind) -> u32 {
        match kind {
            ZombieKind::Melee => self.melee,
            ZombieKind::SoundWeak => self.sound_weak,
            ZombieKind::ShieldWeak => self.shield_weak,
        }
    }

    /// Draw one kind
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> ZombieKind {
        let roll = rng.random_range(0..self.total());
        if roll < self.melee {
            ZombieKind::Melee
        } else if roll < self.melee + self.sound_weak {
            ZombieKind::SoundWeak
        } else {
            ZombieKind::ShieldWeak
        }
    }
}

const MIX_FIRST_LEVEL: KindWeights = KindWeights::new(100, 0, 0);
const MIX_EARLY: KindWeights = KindWeights::new(80, 10, 10);
const MIX_MID: KindWeights = KindWeights::new(60, 20, 20);
const MIX_BOSS: KindWeights = KindWeights::new(10, 40, 50);

/// Kind mix keyed by (boss flag, level bucket)
pub fn kind_weights(boss: bool, level: u8) -> KindWeights {
    if boss {
        return MIX_BOSS;
    }
    match level {
        0 | 1 => MIX_FIRST_LEVEL,
        2..=3 => MIX_EARLY,
        _ => MIX_MID,
    }
}

/// A hostile target
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Zombie {
    pub id: u32,
    pub kind: ZombieKind,
    pub pos: IVec2,
    /// Session time the zombie appeared
    pub spawned_at: f32,
    /// Seconds until it hurts the player
    pub lifetime: f32,
    /// Always 1; every kind dies to a single qualifying attack
    pub hp: u8,
    /// False while blinking off in the final seconds
    pub visible: bool,
}

impl Zombie {
    pub fn age(&self, now: f32) -> f32 {
        now - self.spawned_at
    }

    /// Whether `point` is inside this zombie's hit box
    pub fn contains(&self, point: IVec2) -> bool {
        let d = (point - self.pos).abs();
        d.x <= HIT_TOLERANCE_X && d.y <= HIT_TOLERANCE_Y
    }

    /// Blink state for a given age: hidden on odd phases during the warning window
    pub fn visible_at(&self, now: f32) -> bool {
        let age = self.age(now);
        let warn = FLASH_WARNING_TIME.min(self.lifetime);
        let warn_start = self.lifetime - warn;
        if age < warn_start {
            return true;
        }
        let phase = ((age - warn_start) * FLASH_RATE) as u32;
        phase % 2 == 0
    }
}

/// Result of aging the registry by one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpiryReport {
    /// Zombies whose lifetime ran out (all removed)
    pub expired: u32,
    /// Damage points dealt (expired while the shield was down)
    pub damage: u32,
}

/// Live zombies in insertion order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ZombieRegistry {
    zombies: Vec<Zombie>,
    next_id: u32,
}

impl ZombieRegistry {
    pub fn new() -> Self {
        Self {
            zombies: Vec::new(),
            next_id: 1,
        }
    }

    pub fn len(&self) -> usize {
        self.zombies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zombies.is_empty()
    }

    /// Live zombies, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &Zombie> {
        self.zombies.iter()
    }

    pub fn get(&self, id: u32) -> Option<&Zombie> {
        self.zombies.iter().find(|z| z.id == id)
    }

    /// Create a zombie for the given level. The caller enforces the population cap.
    pub fn spawn<R: Rng + ?Sized>(
        &mut self,
        config: &LevelConfig,
        level: u8,
        now: f32,
        rng: &mut R,
    ) -> &Zombie {
        let kind = kind_weights(config.boss, level).sample(rng);
        let pos = IVec2::new(
            rng.random_range(FIELD_X_MIN + SPAWN_MARGIN..=FIELD_X_MAX - SPAWN_MARGIN),
            rng.random_range(FIELD_Y_MIN + SPAWN_MARGIN..=FIELD_Y_MAX - SPAWN_MARGIN),
        );
        self.insert(kind, pos, now, config.zombie_lifetime)
    }

    /// Add a zombie at a known spot
    pub fn insert(&mut self, kind: ZombieKind, pos: IVec2, now: f32, lifetime: f32) -> &Zombie {
        let id = self.next_id;
        self.next_id += 1;
        self.zombies.push(Zombie {
            id,
            kind,
            pos,
            spawned_at: now,
            lifetime,
            hp: 1,
            visible: true,
        });
        &self.zombies[self.zombies.len() - 1]
    }

    /// First live zombie (insertion order) whose hit box covers `point`
    pub fn find_hit(&self, point: IVec2) -> Option<&Zombie> {
        self.zombies.iter().find(|z| z.contains(point))
    }

    /// First live zombie of a kind
    pub fn first_of_kind(&self, kind: ZombieKind) -> Option<&Zombie> {
        self.zombies.iter().find(|z| z.kind == kind)
    }

    /// Remove a zombie; removing an unknown id is a no-op
    pub fn remove(&mut self, id: u32) -> Option<Zombie> {
        let index = self.zombies.iter().position(|z| z.id == id)?;
        Some(self.zombies.remove(index))
    }

    /// Remove every zombie without side effects (level change, session end)
    pub fn clear(&mut self) {
        self.zombies.clear();
    }

    /// Expire old zombies and update blink state.
    /// Each expiry costs one damage point unless the shield is up.
    pub fn tick(&mut self, now: f32, shield_active: bool) -> ExpiryReport {
        let mut report = ExpiryReport::default();
        self.zombies.retain_mut(|z| {
            if z.age(now) >= z.lifetime {
                report.expired += 1;
                if !shield_active {
                    report.damage += 1;
                }
                return false;
            }
            z.visible = z.visible_at(now);
            true
        });
        report
    }

    /// Shift every spawn timestamp forward (used after blocking pauses)
    pub fn shift_clock(&mut self, by: f32) {
        for z in &mut self.zombies {
            z.spawned_at += by;
        }
    }
}

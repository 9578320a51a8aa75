//! High score leaderboard system
//!
//! Persisted as a JSON array of `{"name", "score"}` records, tracks top 10 scores.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// Failure writing persisted data
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    /// 1-3 letter player tag
    pub name: String,
    pub score: u32,
}

/// Eligibility and submission, as seen by the end-of-game flow
pub trait Leaderboard {
    /// False for non-positive scores; true while fewer than 10 records exist;
    /// otherwise true iff `score` reaches the current minimum.
    fn can_enter_leaderboard(&self, score: u32) -> bool;
    /// Insert, keep the top 10, persist. Returns the 1-indexed rank if kept.
    fn add_score(&mut self, name: &str, score: u32) -> Result<Option<usize>, StoreError>;
    /// Records sorted descending by score
    fn records(&self) -> &[ScoreRecord];
}

/// High score leaderboard (in memory)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<ScoreRecord>,
}

impl HighScores {
    /// Create empty leaderboard
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build from arbitrary records: sorted descending, trimmed to 10
    pub fn from_records(mut records: Vec<ScoreRecord>) -> Self {
        records.sort_by(|a, b| b.score.cmp(&a.score));
        records.truncate(MAX_HIGH_SCORES);
        Self { entries: records }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u32) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        // Ties with the lowest entry still qualify
        self.entries.last().map(|e| score >= e.score).unwrap_or(true)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u32) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.entries.iter().position(|e| score > e.score);
        let rank = rank.unwrap_or(self.entries.len()) + 1;
        (rank <= MAX_HIGH_SCORES).then_some(rank)
    }

    /// Insert a record keeping descending order, then trim.
    /// A new score ranks behind equal existing scores, so a tie with the
    /// lowest entry of a full table falls off.
    /// Returns the rank achieved (1-indexed) or None if it fell off the table.
    pub fn insert(&mut self, name: &str, score: u32) -> Option<usize> {
        let entry = ScoreRecord {
            name: name.to_string(),
            score,
        };

        let pos = self
            .entries
            .iter()
            .position(|e| score > e.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, entry);
        self.entries.truncate(MAX_HIGH_SCORES);

        (pos < MAX_HIGH_SCORES).then_some(pos + 1)
    }

    /// Check if the leaderboard is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get the top score (if any)
    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }

    /// Lowest kept score (if any)
    pub fn min_score(&self) -> Option<u32> {
        self.entries.last().map(|e| e.score)
    }

    /// Parse the persisted JSON. Objects without both a name and a score are
    /// ignored. A score that does not read as an integer makes the whole file
    /// count as malformed, as does anything that is not a JSON array.
    pub fn from_json(json: &str) -> Self {
        let Ok(items) = serde_json::from_str::<Vec<serde_json::Value>>(json) else {
            return Self::new();
        };
        let mut records = Vec::with_capacity(items.len());
        for item in &items {
            let (Some(name), Some(score)) = (item.get("name"), item.get("score")) else {
                continue;
            };
            let Some(score) = parse_score(score) else {
                log::warn!("Malformed score {score}, ignoring saved high scores");
                return Self::new();
            };
            let name = match name {
                serde_json::Value::String(name) => name.clone(),
                other => other.to_string(),
            };
            records.push(ScoreRecord { name, score });
        }
        Self::from_records(records)
    }

    /// Load high scores from a file (missing or malformed = no records)
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => {
                let scores = Self::from_json(&json);
                log::info!("Loaded {} high scores", scores.entries.len());
                scores
            }
            Err(_) => {
                log::info!("No high scores found, starting fresh");
                Self::new()
            }
        }
    }

    /// Save high scores to a file
    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let json = serde_json::to_string(&self.entries)?;
        std::fs::write(path, json)?;
        log::info!("High scores saved ({} entries)", self.entries.len());
        Ok(())
    }
}

/// Integer reading of a stored score: whole numbers, floats (truncated),
/// decimal strings and booleans
fn parse_score(value: &serde_json::Value) -> Option<u32> {
    use serde_json::Value;

    match value {
        Value::Number(n) => match n.as_u64() {
            Some(score) => u32::try_from(score).ok(),
            None => {
                let score = n.as_f64()?.trunc();
                (0.0..=u32::MAX as f64).contains(&score).then_some(score as u32)
            }
        },
        Value::String(s) => s.trim().replace('_', "").parse::<u32>().ok(),
        Value::Bool(b) => Some(u32::from(*b)),
        _ => None,
    }
}

impl Leaderboard for HighScores {
    fn can_enter_leaderboard(&self, score: u32) -> bool {
        self.qualifies(score)
    }

    fn add_score(&mut self, name: &str, score: u32) -> Result<Option<usize>, StoreError> {
        Ok(self.insert(name, score))
    }

    fn records(&self) -> &[ScoreRecord] {
        &self.entries
    }
}

/// Leaderboard backed by a JSON file; every submission is written through
#[derive(Debug, Clone)]
pub struct ScoreFile {
    path: PathBuf,
    scores: HighScores,
}

impl ScoreFile {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let scores = HighScores::load(&path);
        Self { path, scores }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Leaderboard for ScoreFile {
    fn can_enter_leaderboard(&self, score: u32) -> bool {
        self.scores.qualifies(score)
    }

    fn add_score(&mut self, name: &str, score: u32) -> Result<Option<usize>, StoreError> {
        let rank = self.scores.insert(name, score);
        self.scores.save(&self.path)?;
        Ok(rank)
    }

    fn records(&self) -> &[ScoreRecord] {
        &self.scores.entries
    }
}

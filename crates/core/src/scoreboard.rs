//! Ranked score list with JSON persistence.
//!
//! Entries are kept ascending by score; equal scores keep insertion order.
//! Display code shows the list reversed for a high-score table.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ScoreBoardError {
    #[error("score list I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("score list is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreBoard {
    entries: Vec<ScoreEntry>,
}

impl ScoreBoard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry after every entry with a lower or equal score.
    pub fn add_entry(&mut self, name: impl Into<String>, score: u64) {
        let at = self.entries.partition_point(|e| e.score <= score);
        self.entries.insert(
            at,
            ScoreEntry {
                name: name.into(),
                score,
            },
        );
    }

    /// Entries ascending by score.
    pub fn ranked(&self) -> &[ScoreEntry] {
        &self.entries
    }

    pub fn best(&self) -> Option<&ScoreEntry> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn to_json(&self) -> Result<String, ScoreBoardError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a stored list, re-sorting in case it was edited by hand.
    pub fn from_json(raw: &str) -> Result<Self, ScoreBoardError> {
        let mut board: ScoreBoard = serde_json::from_str(raw)?;
        board.entries.sort_by_key(|e| e.score);
        Ok(board)
    }

    /// Load from disk; a missing file is an empty list.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ScoreBoardError> {
        match fs::read_to_string(path) {
            Ok(raw) => Self::from_json(&raw),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Self::new()),
            Err(err) => Err(err.into()),
        }
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ScoreBoardError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

//! Leaderboard and the score collaborator
//!
//! The run controller only sees [`ScoreService`]. [`LocalScores`] is the
//! bundled implementation: top 10, persisted to LocalStorage on the web and
//! kept in memory natively.

use serde::{Deserialize, Serialize};

use crate::error::ScoreError;

/// Maximum number of entries to keep
pub const MAX_ENTRIES: usize = 10;

/// Name recorded when the player has not set one
pub const DEFAULT_PLAYER_NAME: &str = "Runner";

/// A single leaderboard entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub name: String,
    pub score: u64,
}

/// Leaderboard, sorted by descending score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Leaderboard {
    pub entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score would make the board
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_ENTRIES {
            return true;
        }
        self.entries.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Insert a score; returns the 1-indexed rank, or None if it didn't qualify
    ///
    /// Ties rank below existing entries.
    pub fn add_score(&mut self, name: &str, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }

        let entry = LeaderboardEntry {
            name: name.to_string(),
            score,
        };

        let pos = self
            .entries
            .iter()
            .position(|e| score > e.score)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, entry);
        self.entries.truncate(MAX_ENTRIES);

        Some(pos + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    /// Stored under this key in the browser
    #[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
    const STORAGE_KEY: &'static str = "lane_runner_leaderboard";

    /// Board saved in the browser, or an empty one
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let board: Self = crate::platform::storage::read(Self::STORAGE_KEY).unwrap_or_default();
        log::info!("Leaderboard has {} entries", board.entries.len());
        board
    }

    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) -> Result<(), ScoreError> {
        crate::platform::storage::write(Self::STORAGE_KEY, self).map_err(ScoreError::Storage)
    }

    /// In-memory only off the web
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) -> Result<(), ScoreError> {
        Ok(())
    }
}

/// Where finished runs go
pub trait ScoreService {
    /// Record a final score; called once per run
    fn report_score(&mut self, score: u64) -> Result<(), ScoreError>;
    /// Current leaderboard, best first
    fn fetch_leaderboard(&self) -> Vec<LeaderboardEntry>;
}

/// Leaderboard kept on this device
#[derive(Debug, Clone)]
pub struct LocalScores {
    board: Leaderboard,
    player_name: String,
}

impl Default for LocalScores {
    fn default() -> Self {
        Self::new(Leaderboard::new())
    }
}

impl LocalScores {
    pub fn new(board: Leaderboard) -> Self {
        Self {
            board,
            player_name: DEFAULT_PLAYER_NAME.to_string(),
        }
    }

    /// Board restored from storage (empty natively)
    pub fn load() -> Self {
        Self::new(Leaderboard::load())
    }

    pub fn set_player_name(&mut self, name: &str) {
        let name = name.trim();
        self.player_name = if name.is_empty() {
            DEFAULT_PLAYER_NAME.to_string()
        } else {
            name.to_string()
        };
    }

    pub fn board(&self) -> &Leaderboard {
        &self.board
    }
}

impl ScoreService for LocalScores {
    fn report_score(&mut self, score: u64) -> Result<(), ScoreError> {
        match self.board.add_score(&self.player_name, score) {
            Some(rank) => {
                log::info!("Score {} placed #{}", score, rank);
                self.board.save()
            }
            None => Ok(()),
        }
    }

    fn fetch_leaderboard(&self) -> Vec<LeaderboardEntry> {
        self.board.entries.clone()
    }
}

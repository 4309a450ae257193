//! Collect-challenge leaderboard
//!
//! Top scores of finished challenge runs, persisted to LocalStorage on the web.
//! Free-roam runs never score, so they never reach this table.

use serde::{Deserialize, Serialize};

use crate::sim::{GameMode, World};

/// Maximum number of entries kept
pub const MAX_HIGH_SCORES: usize = 10;

/// One finished challenge run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub score: u64,
    /// Coins picked up during the run
    pub coins: u32,
    /// Unix timestamp (ms)
    pub timestamp: f64,
}

/// Leaderboard, sorted by score descending. Ties keep the older run first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "mrr_boat_highscores";

    pub fn new() -> Self {
        Self::default()
    }

    /// 1-based rank `score` would take, or `None` if it would not make the table
    pub fn rank_for(&self, score: u64) -> Option<usize> {
        if score == 0 {
            return None;
        }
        let pos = self
            .entries
            .iter()
            .position(|e| score > e.score)
            .unwrap_or(self.entries.len());
        (pos < MAX_HIGH_SCORES).then_some(pos + 1)
    }

    /// Insert a run. Returns the rank achieved.
    pub fn record(&mut self, score: u64, coins: u32, timestamp: f64) -> Option<usize> {
        let rank = self.rank_for(score)?;
        self.entries.insert(
            rank - 1,
            HighScoreEntry {
                score,
                coins,
                timestamp,
            },
        );
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(rank)
    }

    /// Record the world's finished challenge run, if it was one
    pub fn record_run(&mut self, world: &World, timestamp: f64) -> Option<usize> {
        if world.session.mode() != GameMode::CollectChallenge {
            return None;
        }
        let rank = self.record(world.session.score(), world.coins.collected_count(), timestamp);
        if let Some(rank) = rank {
            log::info!("New high score #{}: {}", rank, world.session.score());
        }
        rank
    }

    pub fn best(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str::<HighScores>(&json) {
                    Ok(scores) => {
                        log::info!("Loaded {} high scores", scores.entries.len());
                        return scores;
                    }
                    Err(e) => log::warn!("Discarding corrupt high scores: {}", e),
                }
            }
        }

        log::info!("No high scores found, starting fresh");
        Self::new()
    }

    /// Save to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("High scores saved ({} entries)", self.entries.len());
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {}
}

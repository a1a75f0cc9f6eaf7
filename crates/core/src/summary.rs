//! Final session record handed to the persistence collaborator.

use serde::{Deserialize, Serialize};

/// Counters accumulated over a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionStats {
    pub pieces_locked: u32,
    pub tetrises: u32,
    pub t_spins: u32,
    pub holds: u32,
    pub max_combo: u32,
    pub back_to_back_clears: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameSummary {
    pub player: String,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    /// Time spent playing, pauses excluded.
    pub elapsed_ms: u64,
    pub victory: bool,
    pub seed: u64,
    pub stats: SessionStats,
}

/// Storage side of a finished session.
///
/// `submit` must not fail or block the caller; implementations recover from
/// their own I/O errors.
pub trait SummarySink {
    fn submit(&mut self, summary: &GameSummary);
}

impl SummarySink for Vec<GameSummary> {
    fn submit(&mut self, summary: &GameSummary) {
        self.push(summary.clone());
    }
}

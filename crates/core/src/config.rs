//! Session configuration.
//!
//! Supplied once when a [`Session`](crate::Session) is created and read-only
//! afterwards. Missing fields fall back to defaults when deserialized.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::types::{
    BOARD_HEIGHT, BOARD_WIDTH, DEFAULT_ARR_MS, DEFAULT_DAS_MS, DEFAULT_LINES_PER_LEVEL,
    DEFAULT_MAX_LEVEL, DEFAULT_PREVIEW_COUNT, DEFAULT_START_LEVEL, LINE_CLEAR_DELAY_MS,
    LOCK_DELAY_MS, MAX_BOARD_SIDE, MAX_PREVIEW_COUNT, MIN_BOARD_SIDE,
};

/// How a session ends besides topping out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    /// Play until the stack reaches the top.
    #[default]
    Endless,
    /// Reaching the victory level ends the session in a win.
    Victory,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub board_width: u8,
    pub board_height: u8,
    pub start_level: u32,
    pub lines_per_level: u32,
    pub max_level: u32,
    pub preview_count: usize,
    pub hold_enabled: bool,
    pub ghost_enabled: bool,
    pub das_ms: u32,
    pub arr_ms: u32,
    pub lock_delay_ms: u32,
    pub line_clear_delay_ms: u32,
    pub mode: GameMode,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            board_width: BOARD_WIDTH,
            board_height: BOARD_HEIGHT,
            start_level: DEFAULT_START_LEVEL,
            lines_per_level: DEFAULT_LINES_PER_LEVEL,
            max_level: DEFAULT_MAX_LEVEL,
            preview_count: DEFAULT_PREVIEW_COUNT,
            hold_enabled: true,
            ghost_enabled: true,
            das_ms: DEFAULT_DAS_MS,
            arr_ms: DEFAULT_ARR_MS,
            lock_delay_ms: LOCK_DELAY_MS,
            line_clear_delay_ms: LINE_CLEAR_DELAY_MS,
            mode: GameMode::Endless,
        }
    }
}

impl GameConfig {
    /// Clamp every field into its playable range, logging what changed.
    pub fn normalized(mut self) -> Self {
        let original = self.clone();

        self.board_width = self.board_width.clamp(MIN_BOARD_SIDE, MAX_BOARD_SIDE);
        self.board_height = self.board_height.clamp(MIN_BOARD_SIDE, MAX_BOARD_SIDE);
        self.max_level = self.max_level.max(1);
        self.start_level = self.start_level.clamp(1, self.max_level);
        self.lines_per_level = self.lines_per_level.max(1);
        self.preview_count = self.preview_count.min(MAX_PREVIEW_COUNT);

        if self != original {
            warn!(?original, adjusted = ?self, "game config out of range, clamped");
        }
        self
    }
}

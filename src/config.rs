//! Application config file.
//!
//! A single JSON document holding the player name, gameplay settings, key
//! bindings and file locations. Every field is optional; a missing file
//! means all defaults.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::GameConfig;
use crate::input::KeyBindings;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub player: String,
    pub game: GameConfig,
    pub controls: KeyBindings,
    pub scores_path: PathBuf,
    pub log_path: PathBuf,
    /// Entries shown in the on-screen leaderboard.
    pub leaderboard_size: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            player: "player".to_string(),
            game: GameConfig::default(),
            controls: KeyBindings::default(),
            scores_path: PathBuf::from("denso-tetris-scores.jsonl"),
            log_path: PathBuf::from("denso-tetris.log"),
            leaderboard_size: 5,
        }
    }
}

impl AppConfig {
    /// Read `path`, falling back to defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read {}", path.display()))
            }
        };

        Self::from_json(&text).with_context(|| format!("invalid config in {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

//! Score persistence.
//!
//! Finished sessions are appended to a JSON-lines file, one [`ScoreRecord`]
//! per line. Reading skips lines it cannot parse so one bad write never loses
//! the rest of the history.

use std::{
    fs::{self, File, OpenOptions},
    io::{BufRead, BufReader, Write},
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use denso_tetris_core::{GameSummary, SessionStats, SummarySink};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

/// One finished session as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub player: String,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub elapsed_ms: u64,
    pub victory: bool,
    pub seed: u64,
    /// When the session ended.
    pub recorded_at: DateTime<Utc>,
    #[serde(default)]
    pub stats: SessionStats,
}

impl ScoreRecord {
    pub fn from_summary(summary: &GameSummary, recorded_at: DateTime<Utc>) -> Self {
        Self {
            player: summary.player.clone(),
            score: summary.score,
            level: summary.level,
            lines: summary.lines,
            elapsed_ms: summary.elapsed_ms,
            victory: summary.victory,
            seed: summary.seed,
            recorded_at,
            stats: summary.stats,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScoreStore {
    path: PathBuf,
}

impl ScoreStore {
    /// Store backed by `path`. The file is created on first save.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a finished session.
    pub fn save(&self, summary: &GameSummary) -> Result<ScoreRecord> {
        if summary.player.trim().is_empty() {
            bail!("refusing to save a score without a player name");
        }

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
        }

        let record = ScoreRecord::from_summary(summary, Utc::now());
        let mut line = serde_json::to_string(&record)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("failed to open {}", self.path.display()))?;
        file.write_all(line.as_bytes())
            .with_context(|| format!("failed to write {}", self.path.display()))?;

        debug!(path = %self.path.display(), player = %record.player, score = record.score, "score saved");
        Ok(record)
    }

    /// Every readable record, in file order. A missing file is empty.
    pub fn load_all(&self) -> Result<Vec<ScoreRecord>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => {
                return Err(e).with_context(|| format!("failed to open {}", self.path.display()))
            }
        };

        let mut records = Vec::new();
        for (index, line) in BufReader::new(file).lines().enumerate() {
            let line = line.with_context(|| format!("failed to read {}", self.path.display()))?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<ScoreRecord>(&line) {
                Ok(record) => records.push(record),
                Err(e) => warn!(line = index + 1, error = %e, "skipping malformed score record"),
            }
        }
        Ok(records)
    }

    /// Highest scores first; ties go to the earlier record.
    pub fn top_scores(&self, limit: usize) -> Result<Vec<ScoreRecord>> {
        let mut records = self.load_all()?;
        records.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| a.recorded_at.cmp(&b.recorded_at))
        });
        records.truncate(limit);
        Ok(records)
    }

    /// Best record for `player`, if any.
    pub fn best_for(&self, player: &str) -> Result<Option<ScoreRecord>> {
        Ok(self
            .load_all()?
            .into_iter()
            .filter(|r| r.player == player)
            .max_by(|a, b| {
                a.score
                    .cmp(&b.score)
                    .then_with(|| b.recorded_at.cmp(&a.recorded_at))
            }))
    }
}

impl SummarySink for ScoreStore {
    fn submit(&mut self, summary: &GameSummary) {
        if let Err(e) = self.save(summary) {
            error!(error = %e, path = %self.path.display(), "failed to save score");
        }
    }
}

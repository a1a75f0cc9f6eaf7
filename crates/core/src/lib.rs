//! Core game logic - pure, deterministic, and testable
//!
//! This crate holds every gameplay rule: the board, the pieces, the 7-bag
//! randomizer, scoring and the [`Session`] state machine that ties them
//! together. It performs no I/O; the host drives it with key presses and
//! fixed ticks and reads back snapshots, events and a final summary.
//!
//! # Module Structure
//!
//! - [`board`]: grid, collision and the timed line-clear animation
//! - [`piece`]: the active piece and its moves
//! - [`pieces`]: tetromino shapes and SRS wall kicks
//! - [`rng`]: seeded 7-bag generation
//! - [`scoring`]: line, T-spin, combo and back-to-back arithmetic, gravity table
//! - [`session`]: the state machine
//! - [`config`], [`events`], [`summary`], [`snapshot`]: what goes in and out
//!
//! # Game Rules
//!
//! - **7-Bag Randomizer**: every aligned window of 7 pieces holds each kind once
//! - **SRS Rotation**: five kicks per rotation, a separate table for I, none for O
//! - **Lock Delay**: 500ms after gravity fails, reset by any successful move or rotation
//! - **Line Clear**: full rows flash for 200ms before collapsing
//! - **Hold**: once per locked piece
//! - **T-Spin**: a T rotated into place with three of its four corners blocked
//!
//! # Example
//!
//! ```
//! use denso_tetris_core::{GameConfig, Session, SessionState};
//! use denso_tetris_types::GameAction;
//!
//! let mut session = Session::new(GameConfig::default(), "player", 12345);
//! session.press(GameAction::HardDrop);
//! session.release(GameAction::HardDrop);
//! session.update(16);
//!
//! assert!(session.score() > 0);
//! assert_eq!(session.state(), SessionState::Playing);
//! ```
//!
//! # Timing
//!
//! Call [`Session::update`] every host tick (16ms nominal) with the elapsed
//! milliseconds. Gravity runs at `frames * 1000 / 60` ms per row for the
//! current level; soft drop divides that by 20.

pub mod board;
pub mod config;
pub mod events;
pub mod piece;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod session;
pub mod snapshot;
pub mod summary;

pub use denso_tetris_types as types;

pub use board::{Board, BoardPhase, ClearOutcome};
pub use config::{GameConfig, GameMode};
pub use events::{EventListener, GameEvent};
pub use piece::Piece;
pub use pieces::{get_shape, kick_offsets, try_rotate};
pub use rng::Randomizer;
pub use scoring::{calculate_clear_score, calculate_drop_score, ScoreResult};
pub use session::{Session, SessionState};
pub use snapshot::{ActiveSnapshot, GameSnapshot};
pub use summary::{GameSummary, SessionStats, SummarySink};

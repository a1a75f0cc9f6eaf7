//! Denso Tetris (workspace facade crate).
//!
//! Re-exports the member crates under short names and owns the
//! application-level config file. The gameplay lives in `crates/core`;
//! everything here is wiring.

pub mod config;

pub use denso_tetris_core as core;
pub use denso_tetris_input as input;
pub use denso_tetris_store as store;
pub use denso_tetris_term as term;
pub use denso_tetris_types as types;

pub use config::AppConfig;

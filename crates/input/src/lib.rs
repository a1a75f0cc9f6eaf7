//! Terminal input.
//!
//! Independent of any UI framework: maps `crossterm` key events to
//! [`Command`]s through configurable bindings and turns the terminal's
//! press/repeat/release stream into clean press and release transitions
//! for the session, including on terminals without key-release events.

pub mod handler;
pub mod map;

pub use denso_tetris_types as types;

pub use handler::{InputEvent, InputHandler};
pub use map::{parse_key, Command, KeyBindings, KeyMap};

//! Terminal rendering for gameplay.
//!
//! A small game-oriented layer: no widget toolkit, just a framebuffer that
//! the [`GameView`] draws a session snapshot into and the
//! [`TerminalRenderer`] diffs onto the screen.

pub mod fb;
pub mod feed;
pub mod game_view;
pub mod renderer;

pub use denso_tetris_core as core;
pub use denso_tetris_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use feed::{Callout, EventFeed};
pub use game_view::{piece_color, AnchorY, GameView, Hud, ScoreLine, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};

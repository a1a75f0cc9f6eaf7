//! Gameplay notifications for audio-style consumers.
//!
//! The session buffers events while it runs; the host drains them after each
//! update and hands them to whatever listeners it owns. Nothing a listener
//! does can feed back into the session.

/// Something noteworthy that happened during an update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Move,
    Rotate,
    /// Hard drop, with the number of rows fallen.
    Drop { rows: u32 },
    Lock,
    LineClear { lines: u32 },
    Tetris,
    TSpin,
    LevelUp { level: u32 },
    Hold,
    GameOver,
    Victory,
}

impl GameEvent {
    /// Stable short name, suitable for mapping to sound cues.
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::Move => "move",
            GameEvent::Rotate => "rotate",
            GameEvent::Drop { .. } => "drop",
            GameEvent::Lock => "lock",
            GameEvent::LineClear { .. } => "clear",
            GameEvent::Tetris => "tetris",
            GameEvent::TSpin => "t_spin",
            GameEvent::LevelUp { .. } => "level_up",
            GameEvent::Hold => "hold",
            GameEvent::GameOver => "game_over",
            GameEvent::Victory => "victory",
        }
    }
}

/// Receives gameplay events. Implementations must not fail the caller.
pub trait EventListener {
    fn on_event(&mut self, event: GameEvent);
}

impl<F: FnMut(GameEvent)> EventListener for F {
    fn on_event(&mut self, event: GameEvent) {
        self(event)
    }
}

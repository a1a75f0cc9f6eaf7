use crate::session::SessionState;
use crate::types::{Cell, PieceKind, Rotation};
use crate::Piece;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
    /// Absolute board coordinates of the four minos.
    pub cells: [(i8, i8); 4],
}

impl From<&Piece> for ActiveSnapshot {
    fn from(piece: &Piece) -> Self {
        Self {
            kind: piece.kind,
            rotation: piece.rotation,
            x: piece.x,
            y: piece.y,
            cells: piece.cells(),
        }
    }
}

/// Read-only view of a session for one rendered frame.
#[derive(Debug, Clone, PartialEq)]
pub struct GameSnapshot {
    pub width: u8,
    pub height: u8,
    /// Row-major locked cells.
    pub board: Vec<Cell>,
    /// Rows flashing in the clear animation.
    pub clearing_rows: Vec<usize>,
    pub clear_progress: f32,
    pub active: Option<ActiveSnapshot>,
    /// Landing row for the active piece's origin; `None` when ghosts are off.
    pub ghost_y: Option<i8>,
    pub hold: Option<PieceKind>,
    pub can_hold: bool,
    pub next_queue: Vec<PieceKind>,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub combo: u32,
    pub back_to_back: u32,
    pub state: SessionState,
    /// Locked cells reach into the top rows.
    pub danger: bool,
    pub elapsed_ms: u64,
}

impl GameSnapshot {
    pub fn cell(&self, x: i8, y: i8) -> Cell {
        if x < 0 || y < 0 || x >= self.width as i8 || y >= self.height as i8 {
            return None;
        }
        self.board[y as usize * self.width as usize + x as usize]
    }

    pub fn set_cell(&mut self, x: i8, y: i8, cell: Cell) {
        if x < 0 || y < 0 || x >= self.width as i8 || y >= self.height as i8 {
            return;
        }
        self.board[y as usize * self.width as usize + x as usize] = cell;
    }

    pub fn playable(&self) -> bool {
        self.state == SessionState::Playing
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.state, SessionState::GameOver | SessionState::Victory)
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            width: 0,
            height: 0,
            board: Vec::new(),
            clearing_rows: Vec::new(),
            clear_progress: 0.0,
            active: None,
            ghost_y: None,
            hold: None,
            can_hold: true,
            next_queue: Vec::new(),
            score: 0,
            level: 1,
            lines: 0,
            combo: 0,
            back_to_back: 0,
            state: SessionState::Playing,
            danger: false,
            elapsed_ms: 0,
        }
    }
}

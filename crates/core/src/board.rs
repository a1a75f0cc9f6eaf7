//! Board module - the locked-cell grid and the line clear animation.
//!
//! The board is a `width x height` grid (10x20 by default) stored as a flat,
//! row-major buffer. Coordinates are `(x, y)` with `y` growing downwards.
//! Rows above the board (`y < 0`) never collide with locked cells; a piece
//! may pass through them, but may not lock there.
//!
//! Full rows are not removed at lock time. They are marked pending, the board
//! enters [`BoardPhase::Clearing`], and [`Board::tick`] removes them once the
//! clear delay has elapsed.

use crate::piece::Piece;
use crate::pieces::PieceShape;
use crate::scoring::line_clear_award;
use crate::types::{
    Cell, BOARD_HEIGHT, BOARD_WIDTH, DANGER_ROWS, LINE_CLEAR_DELAY_MS, MAX_BOARD_SIDE, MIN_BOARD_SIDE,
};

/// Line clear animation phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoardPhase {
    #[default]
    Stable,
    Clearing,
}

/// Result of advancing the clear animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClearOutcome {
    pub lines_cleared: u32,
    /// Unscaled line award; the session multiplies it by level.
    pub score_award: u32,
    pub is_tetris: bool,
    pub animation_done: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    width: u8,
    height: u8,
    /// Flat array of cells, row-major order (y * width + x)
    cells: Vec<Cell>,
    /// Full rows awaiting removal, bottom-to-top.
    pending_rows: Vec<usize>,
    phase: BoardPhase,
    clear_timer_ms: u32,
    clear_delay_ms: u32,
}

impl Board {
    /// Create an empty 10x20 board
    pub fn new() -> Self {
        Self::with_size(BOARD_WIDTH, BOARD_HEIGHT)
    }

    /// Create an empty board of the given size.
    ///
    /// Each side is clamped into `MIN_BOARD_SIDE..=MAX_BOARD_SIDE`.
    pub fn with_size(width: u8, height: u8) -> Self {
        let width = width.clamp(MIN_BOARD_SIDE, MAX_BOARD_SIDE);
        let height = height.clamp(MIN_BOARD_SIDE, MAX_BOARD_SIDE);
        Self {
            width,
            height,
            cells: vec![None; width as usize * height as usize],
            pending_rows: Vec::with_capacity(4),
            phase: BoardPhase::Stable,
            clear_timer_ms: 0,
            clear_delay_ms: LINE_CLEAR_DELAY_MS,
        }
    }

    pub fn with_clear_delay(mut self, delay_ms: u32) -> Self {
        self.clear_delay_ms = delay_ms;
        self
    }

    #[inline(always)]
    fn index(&self, x: i8, y: i8) -> Option<usize> {
        if self.is_out_of_bounds(x, y) {
            return None;
        }
        Some((y as usize) * (self.width as usize) + (x as usize))
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Within bounds and filled
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    pub fn is_out_of_bounds(&self, x: i8, y: i8) -> bool {
        x < 0 || x >= self.width as i8 || y < 0 || y >= self.height as i8
    }

    /// Whether a single absolute cell would collide.
    ///
    /// Walls and the floor collide; the hidden rows above the board don't.
    pub fn cell_collides(&self, x: i8, y: i8) -> bool {
        if x < 0 || x >= self.width as i8 || y >= self.height as i8 {
            return true;
        }
        y >= 0 && self.is_occupied(x, y)
    }

    /// Whether `shape` placed with its origin at `(x, y)` collides.
    pub fn shape_collides(&self, shape: &PieceShape, x: i8, y: i8) -> bool {
        shape
            .iter()
            .any(|&(dx, dy)| self.cell_collides(x + dx, y + dy))
    }

    /// Whether `piece`, at its current rotation, collides at `(x, y)`.
    pub fn check_collision(&self, piece: &Piece, x: i8, y: i8) -> bool {
        self.shape_collides(&piece.shape(), x, y)
    }

    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= self.height as usize {
            return false;
        }
        self.row(y).iter().all(|cell| cell.is_some())
    }

    /// Cells of row `y`. Panics if `y` is out of range.
    pub fn row(&self, y: usize) -> &[Cell] {
        let width = self.width as usize;
        &self.cells[y * width..(y + 1) * width]
    }

    /// Write the piece into the grid.
    ///
    /// Fails without touching the grid if any cell is above the board (or
    /// otherwise outside it). On success the full rows are detected.
    pub fn lock(&mut self, piece: &Piece) -> bool {
        let cells = piece.cells();
        if cells.iter().any(|&(x, y)| self.is_out_of_bounds(x, y)) {
            return false;
        }

        for &(x, y) in &cells {
            self.set(x, y, Some(piece.kind));
        }

        self.detect_full_rows();
        true
    }

    /// Scan bottom-to-top for full rows and mark them pending.
    ///
    /// Enters [`BoardPhase::Clearing`] when any are found. Calling it again
    /// before the rows are removed yields the same set.
    pub fn detect_full_rows(&mut self) -> &[usize] {
        self.pending_rows.clear();
        for y in (0..self.height as usize).rev() {
            if self.is_row_full(y) {
                self.pending_rows.push(y);
            }
        }

        if !self.pending_rows.is_empty() && self.phase == BoardPhase::Stable {
            self.phase = BoardPhase::Clearing;
            self.clear_timer_ms = 0;
        }
        &self.pending_rows
    }

    pub fn pending_rows(&self) -> &[usize] {
        &self.pending_rows
    }

    pub fn phase(&self) -> BoardPhase {
        self.phase
    }

    pub fn is_clearing(&self) -> bool {
        self.phase == BoardPhase::Clearing
    }

    /// Clear animation progress in `0.0..=1.0`.
    pub fn clear_progress(&self) -> f32 {
        if !self.is_clearing() || self.clear_delay_ms == 0 {
            return 0.0;
        }
        (self.clear_timer_ms as f32 / self.clear_delay_ms as f32).min(1.0)
    }

    /// Advance the clear animation by `dt_ms`.
    pub fn tick(&mut self, dt_ms: u32) -> ClearOutcome {
        if self.phase != BoardPhase::Clearing {
            return ClearOutcome::default();
        }

        self.clear_timer_ms = self.clear_timer_ms.saturating_add(dt_ms);
        if self.clear_timer_ms < self.clear_delay_ms {
            return ClearOutcome::default();
        }

        let lines = self.remove_pending_rows();
        self.phase = BoardPhase::Stable;
        self.clear_timer_ms = 0;

        ClearOutcome {
            lines_cleared: lines,
            score_award: line_clear_award(lines),
            is_tetris: lines == 4,
            animation_done: true,
        }
    }

    /// Compact the pending rows out of the grid.
    ///
    /// Two-pointer pass from the bottom: kept rows slide down over removed
    /// ones, then the freed rows at the top are emptied.
    fn remove_pending_rows(&mut self) -> u32 {
        let width = self.width as usize;
        let mut write_y = self.height as usize;

        for read_y in (0..self.height as usize).rev() {
            if self.pending_rows.contains(&read_y) {
                continue;
            }
            write_y -= 1;
            if write_y != read_y {
                let src_start = read_y * width;
                self.cells
                    .copy_within(src_start..src_start + width, write_y * width);
            }
        }

        self.cells[..write_y * width].fill(None);

        let removed = self.pending_rows.len() as u32;
        self.pending_rows.clear();
        removed
    }

    /// Whether anything is locked in the top rows.
    pub fn is_topped_out(&self) -> bool {
        let rows = (DANGER_ROWS as usize).min(self.height as usize);
        self.cells[..rows * self.width as usize]
            .iter()
            .any(|cell| cell.is_some())
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Create from rows of cells for testing
    #[cfg(test)]
    pub fn from_cells(cells_2d: Vec<Vec<Cell>>) -> Self {
        let height = cells_2d.len() as u8;
        let width = cells_2d.first().map_or(0, |row| row.len()) as u8;
        assert!(cells_2d.iter().all(|row| row.len() == width as usize));

        let mut board = Self::with_size(width, height);
        for (y, row) in cells_2d.iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                board.cells[y * width as usize + x] = *cell;
            }
        }
        board
    }

    #[cfg(test)]
    pub fn to_cells(&self) -> Vec<Vec<Cell>> {
        (0..self.height as usize)
            .map(|y| self.row(y).to_vec())
            .collect()
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

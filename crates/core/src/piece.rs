//! The active falling piece.

use crate::board::Board;
use crate::pieces::{get_shape, spawn_x, try_rotate, PieceShape};
use crate::types::{PieceKind, Rotation};

/// Diagonal corners of the T bounding box, relative to the origin.
const T_CORNERS: [(i8, i8); 4] = [(0, 0), (2, 0), (0, 2), (2, 2)];

/// Active falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Piece {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
    just_rotated: bool,
    t_spin: bool,
}

impl Piece {
    pub fn new(kind: PieceKind, x: i8, y: i8) -> Self {
        Self {
            kind,
            rotation: Rotation::North,
            x,
            y,
            just_rotated: false,
            t_spin: false,
        }
    }

    /// A piece at the spawn origin of a board `board_width` wide.
    pub fn spawn(kind: PieceKind, board_width: u8) -> Self {
        Self::new(kind, spawn_x(board_width), 0)
    }

    pub fn shape(&self) -> PieceShape {
        get_shape(self.kind, self.rotation)
    }

    /// Absolute board coordinates of the four minos.
    pub fn cells(&self) -> [(i8, i8); 4] {
        self.shape().map(|(dx, dy)| (self.x + dx, self.y + dy))
    }

    pub fn just_rotated(&self) -> bool {
        self.just_rotated
    }

    pub fn is_t_spin(&self) -> bool {
        self.t_spin
    }

    /// Move by `(dx, dy)` if the target is free.
    pub fn translate(&mut self, dx: i8, dy: i8, board: &Board) -> bool {
        let (nx, ny) = (self.x + dx, self.y + dy);
        if board.check_collision(self, nx, ny) {
            return false;
        }
        self.x = nx;
        self.y = ny;
        self.just_rotated = false;
        self.t_spin = false;
        true
    }

    /// Rotate one step, trying each kick candidate in order.
    pub fn rotate(&mut self, clockwise: bool, board: &Board) -> bool {
        let Some((rotation, (dx, dy))) = try_rotate(
            self.kind,
            self.rotation,
            self.x,
            self.y,
            clockwise,
            |shape, x, y| !board.shape_collides(shape, x, y),
        ) else {
            return false;
        };

        self.rotation = rotation;
        self.x += dx;
        self.y += dy;
        self.just_rotated = true;
        self.t_spin = self.kind == PieceKind::T && self.detect_t_spin(board);
        true
    }

    /// Three-corner rule: at least 3 of the 4 diagonal corners blocked.
    ///
    /// Only meaningful right after a rotation; always false otherwise.
    pub fn detect_t_spin(&self, board: &Board) -> bool {
        if self.kind != PieceKind::T || !self.just_rotated {
            return false;
        }
        let blocked = T_CORNERS
            .iter()
            .filter(|&&(cx, cy)| {
                let (x, y) = (self.x + cx, self.y + cy);
                board.is_out_of_bounds(x, y) || board.is_occupied(x, y)
            })
            .count();
        blocked >= 3
    }

    /// Consume the T-spin flag for scoring at lock time.
    pub fn take_t_spin(&mut self) -> bool {
        let t_spin = self.t_spin && self.just_rotated;
        self.t_spin = false;
        t_spin
    }

    /// Drop straight down until blocked; returns rows moved.
    pub fn hard_drop(&mut self, board: &Board) -> u32 {
        let mut distance = 0;
        while self.translate(0, 1, board) {
            distance += 1;
        }
        distance
    }

    /// Row the origin would land on after a hard drop.
    pub fn ghost_row(&self, board: &Board) -> i8 {
        let mut y = self.y;
        while !board.check_collision(self, self.x, y + 1) {
            y += 1;
        }
        y
    }

    /// Whether the piece is resting on something.
    pub fn is_grounded(&self, board: &Board) -> bool {
        board.check_collision(self, self.x, self.y + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spawn_position() {
        let piece = Piece::spawn(PieceKind::T, 10);
        assert_eq!((piece.x, piece.y), (3, 0));
        assert_eq!(piece.rotation, Rotation::North);
        assert!(!piece.just_rotated());
    }

    #[test]
    fn test_translate_clears_rotation_flag() {
        let board = Board::new();
        let mut piece = Piece::spawn(PieceKind::T, 10);
        piece.y = 5;
        assert!(piece.rotate(true, &board));
        assert!(piece.just_rotated());
        assert!(piece.translate(1, 0, &board));
        assert!(!piece.just_rotated());
    }

    #[test]
    fn test_translate_blocked_by_wall() {
        let board = Board::new();
        let mut piece = Piece::spawn(PieceKind::O, 10);
        // O occupies columns x+1..=x+2.
        piece.x = -1;
        assert!(!piece.translate(-1, 0, &board));
        assert_eq!(piece.x, -1);
    }

    #[test]
    fn test_o_rotation_keeps_footprint() {
        let board = Board::new();
        let mut piece = Piece::spawn(PieceKind::O, 10);
        let before = piece.cells();
        assert!(piece.rotate(true, &board));
        assert_eq!(piece.rotation, Rotation::East);
        assert_eq!(piece.cells(), before);
    }

    #[test]
    fn test_failed_rotation_leaves_piece_unchanged() {
        let mut board = Board::new();
        for y in 0..20 {
            for x in 0..10 {
                board.set(x, y, Some(PieceKind::Z));
            }
        }
        // Hollow out exactly the North I footprint.
        for x in 3..7 {
            board.set(x, 10, None);
        }
        let mut piece = Piece::new(PieceKind::I, 3, 9);
        let before = piece;
        assert!(!piece.rotate(true, &board));
        assert_eq!(piece, before);
    }

    #[test]
    fn test_hard_drop_distance_and_ghost() {
        let board = Board::new();
        let mut piece = Piece::spawn(PieceKind::I, 10);
        let ghost = piece.ghost_row(&board);
        // North I sits on row y + 1.
        assert_eq!(ghost, 18);
        assert_eq!(piece.hard_drop(&board), 18);
        assert_eq!(piece.y, ghost);
        assert!(piece.is_grounded(&board));
    }

    #[test]
    fn test_t_spin_three_corners() {
        let mut board = Board::new();
        board.set(3, 17, Some(PieceKind::I));
        board.set(3, 19, Some(PieceKind::I));
        board.set(5, 19, Some(PieceKind::I));

        let mut piece = Piece::new(PieceKind::T, 3, 17);
        piece.rotation = Rotation::East;
        piece.just_rotated = true;
        assert!(piece.detect_t_spin(&board));
    }

    #[test]
    fn test_t_spin_two_corners() {
        let mut board = Board::new();
        board.set(3, 19, Some(PieceKind::I));
        board.set(5, 19, Some(PieceKind::I));

        let mut piece = Piece::new(PieceKind::T, 3, 17);
        piece.rotation = Rotation::East;
        piece.just_rotated = true;
        assert!(!piece.detect_t_spin(&board));
    }

    #[test]
    fn test_t_spin_requires_rotation() {
        let mut board = Board::new();
        board.set(3, 17, Some(PieceKind::I));
        board.set(3, 19, Some(PieceKind::I));
        board.set(5, 19, Some(PieceKind::I));

        let piece = Piece::new(PieceKind::T, 3, 17);
        assert!(!piece.detect_t_spin(&board));
    }

    #[test]
    fn test_take_t_spin_consumes_flag() {
        let mut piece = Piece::new(PieceKind::T, 3, 17);
        piece.just_rotated = true;
        piece.t_spin = true;
        assert!(piece.take_t_spin());
        assert!(!piece.take_t_spin());
    }
}

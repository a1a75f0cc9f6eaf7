//! Tetromino shapes and SRS wall kick tables.
//!
//! Shapes live inside the standard SRS bounding boxes (3x3 for J/L/S/T/Z,
//! 4x4 for I, O in the top middle of a 4-wide box). Offsets are `(dx, dy)`
//! with `dy` growing downwards, the same frame the board uses.
//! Reference: https://tetris.wiki/SRS

use crate::types::{PieceKind, Rotation};

/// Offset of a single mino relative to piece origin
pub type MinoOffset = (i8, i8);

/// Shape of a piece - 4 mino offsets from piece origin
pub type PieceShape = [MinoOffset; 4];

/// Get the shape (mino offsets) for a piece kind and rotation
pub fn get_shape(kind: PieceKind, rotation: Rotation) -> PieceShape {
    match kind {
        PieceKind::I => match rotation {
            Rotation::North => [(0, 1), (1, 1), (2, 1), (3, 1)],
            Rotation::East => [(2, 0), (2, 1), (2, 2), (2, 3)],
            Rotation::South => [(0, 2), (1, 2), (2, 2), (3, 2)],
            Rotation::West => [(1, 0), (1, 1), (1, 2), (1, 3)],
        },
        PieceKind::O => [(1, 0), (2, 0), (1, 1), (2, 1)],
        PieceKind::T => match rotation {
            Rotation::North => [(1, 0), (0, 1), (1, 1), (2, 1)],
            Rotation::East => [(1, 0), (1, 1), (2, 1), (1, 2)],
            Rotation::South => [(0, 1), (1, 1), (2, 1), (1, 2)],
            Rotation::West => [(1, 0), (0, 1), (1, 1), (1, 2)],
        },
        PieceKind::S => match rotation {
            Rotation::North => [(1, 0), (2, 0), (0, 1), (1, 1)],
            Rotation::East => [(1, 0), (1, 1), (2, 1), (2, 2)],
            Rotation::South => [(1, 1), (2, 1), (0, 2), (1, 2)],
            Rotation::West => [(0, 0), (0, 1), (1, 1), (1, 2)],
        },
        PieceKind::Z => match rotation {
            Rotation::North => [(0, 0), (1, 0), (1, 1), (2, 1)],
            Rotation::East => [(2, 0), (1, 1), (2, 1), (1, 2)],
            Rotation::South => [(0, 1), (1, 1), (1, 2), (2, 2)],
            Rotation::West => [(1, 0), (0, 1), (1, 1), (0, 2)],
        },
        PieceKind::J => match rotation {
            Rotation::North => [(0, 0), (0, 1), (1, 1), (2, 1)],
            Rotation::East => [(1, 0), (2, 0), (1, 1), (1, 2)],
            Rotation::South => [(0, 1), (1, 1), (2, 1), (2, 2)],
            Rotation::West => [(1, 0), (1, 1), (0, 2), (1, 2)],
        },
        PieceKind::L => match rotation {
            Rotation::North => [(2, 0), (0, 1), (1, 1), (2, 1)],
            Rotation::East => [(1, 0), (1, 1), (1, 2), (2, 2)],
            Rotation::South => [(0, 1), (1, 1), (2, 1), (0, 2)],
            Rotation::West => [(0, 0), (1, 0), (1, 1), (1, 2)],
        },
    }
}

/// Horizontal spawn origin for a board of the given width.
///
/// Centers the 4-wide bounding box; `3` on the standard 10-wide board.
pub fn spawn_x(board_width: u8) -> i8 {
    (board_width.saturating_sub(4) / 2) as i8
}

/// SRS wall kick data, one row of five candidate offsets per transition.
pub type KickTable = [[(i8, i8); 5]; 8];

/// O rotates in place: a single identity candidate.
const O_KICKS: [(i8, i8); 1] = [(0, 0)];

/// JLSTZ kick table (shared by J, L, S, T, Z)
const JLSTZ_KICKS: KickTable = [
    // 0->1 (N->E, clockwise)
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    // 0->3 (N->W, counter-clockwise)
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    // 1->0 (E->N, counter-clockwise)
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    // 1->2 (E->S, clockwise)
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    // 2->1 (S->E, counter-clockwise)
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    // 2->3 (S->W, clockwise)
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    // 3->2 (W->S, counter-clockwise)
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    // 3->0 (W->N, clockwise)
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
];

/// I piece kick table
const I_KICKS: KickTable = [
    // 0->1 (N->E)
    [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)],
    // 0->3 (N->W)
    [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)],
    // 1->0 (E->N)
    [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)],
    // 1->2 (E->S)
    [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)],
    // 2->1 (S->E)
    [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)],
    // 2->3 (S->W)
    [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)],
    // 3->2 (W->S)
    [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)],
    // 3->0 (W->N)
    [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)],
];

/// Row of the kick tables for a rotation transition
fn get_kick_index(from: Rotation, clockwise: bool) -> usize {
    match (from, clockwise) {
        (Rotation::North, true) => 0,  // N->E
        (Rotation::North, false) => 1, // N->W
        (Rotation::East, false) => 2,  // E->N
        (Rotation::East, true) => 3,   // E->S
        (Rotation::South, false) => 4, // S->E
        (Rotation::South, true) => 5,  // S->W
        (Rotation::West, false) => 6,  // W->S
        (Rotation::West, true) => 7,   // W->N
    }
}

/// Ordered kick candidates for rotating `kind` out of `from`.
pub fn kick_offsets(kind: PieceKind, from: Rotation, clockwise: bool) -> &'static [(i8, i8)] {
    let index = get_kick_index(from, clockwise);
    match kind {
        PieceKind::O => &O_KICKS,
        PieceKind::I => &I_KICKS[index],
        _ => &JLSTZ_KICKS[index],
    }
}

/// Try to rotate a piece with wall kicks.
///
/// Returns the new rotation and the kick that was applied, or `None` when every
/// candidate collides. `fits` gets the candidate shape and origin.
pub fn try_rotate(
    kind: PieceKind,
    rotation: Rotation,
    x: i8,
    y: i8,
    clockwise: bool,
    fits: impl Fn(&PieceShape, i8, i8) -> bool,
) -> Option<(Rotation, (i8, i8))> {
    let new_rotation = rotation.rotated(clockwise);
    let new_shape = get_shape(kind, new_rotation);

    kick_offsets(kind, rotation, clockwise)
        .iter()
        .copied()
        .find(|&(dx, dy)| fits(&new_shape, x + dx, y + dy))
        .map(|kick| (new_rotation, kick))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_shape_has_four_distinct_cells() {
        for kind in PieceKind::ALL {
            for rotation in [Rotation::North, Rotation::East, Rotation::South, Rotation::West] {
                let shape = get_shape(kind, rotation);
                for (i, a) in shape.iter().enumerate() {
                    for b in &shape[i + 1..] {
                        assert_ne!(a, b, "{:?} {:?}", kind, rotation);
                    }
                }
            }
        }
    }

    #[test]
    fn kick_rows_start_with_identity() {
        for kind in PieceKind::ALL {
            for from in [Rotation::North, Rotation::East, Rotation::South, Rotation::West] {
                for cw in [true, false] {
                    assert_eq!(kick_offsets(kind, from, cw)[0], (0, 0));
                }
            }
        }
    }

    #[test]
    fn o_piece_has_single_kick() {
        assert_eq!(kick_offsets(PieceKind::O, Rotation::South, true), &[(0, 0)]);
    }

    #[test]
    fn spawn_x_centers_bounding_box() {
        assert_eq!(spawn_x(10), 3);
        assert_eq!(spawn_x(12), 4);
        assert_eq!(spawn_x(4), 0);
    }
}

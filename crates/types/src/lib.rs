//! Shared data types and tuning constants.
//!
//! Everything here is plain data with no dependencies, so the gameplay core,
//! the input layer and the terminal frontend can all agree on the same
//! vocabulary without pulling each other in.
//!
//! # Board Dimensions
//!
//! The default playfield is 10 columns by 20 rows, `(x, y)` with `y` growing
//! downwards. Rows with `y < 0` form a hidden buffer above the visible board.
//!
//! # Timing Constants
//!
//! All timing values are in milliseconds:
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `TICK_MS` | 16 | Fixed host timestep (~60 FPS) |
//! | `DEFAULT_DAS_MS` | 170 | Delay before horizontal auto-repeat |
//! | `DEFAULT_ARR_MS` | 50 | Interval between auto-repeat steps |
//! | `LOCK_DELAY_MS` | 500 | Grace period once a piece can't descend |
//! | `LINE_CLEAR_DELAY_MS` | 200 | Line clear animation length |
//!
//! # Gravity
//!
//! Gravity is expressed in frames per row at 60 FPS, indexed by level
//! (level 1 is the first entry):
//!
//! | Level | Frames | Interval |
//! |-------|--------|----------|
//! | 1 | 60 | 1000ms |
//! | 5 | 25 | 416ms |
//! | 10 | 8 | 133ms |
//! | 15 | 3 | 50ms |
//! | 19+ | 1 | 16ms |
//!
//! # Examples
//!
//! ```
//! use denso_tetris_types::{GameAction, PieceKind, Rotation, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! let piece = PieceKind::from_str("t").unwrap();
//! assert_eq!(piece, PieceKind::T);
//!
//! assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
//! assert_eq!(Rotation::North.rotated(false), Rotation::West);
//!
//! assert_eq!(GameAction::from_str("hardDrop"), Some(GameAction::HardDrop));
//!
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 20);
//! ```

/// Default board width in cells
pub const BOARD_WIDTH: u8 = 10;

/// Default board height in cells
pub const BOARD_HEIGHT: u8 = 20;

/// Smallest board side a board or session accepts.
pub const MIN_BOARD_SIDE: u8 = 4;

/// Largest board side; keeps every coordinate inside `i8`.
pub const MAX_BOARD_SIDE: u8 = 40;

/// Fixed timestep interval in milliseconds (16ms ≈ 60 FPS)
pub const TICK_MS: u32 = 16;

/// Delayed auto shift before horizontal repeats start.
pub const DEFAULT_DAS_MS: u32 = 170;

/// Auto repeat rate once DAS has elapsed.
pub const DEFAULT_ARR_MS: u32 = 50;

/// Lock delay once the active piece fails to descend.
pub const LOCK_DELAY_MS: u32 = 500;

/// Length of the line clear animation.
pub const LINE_CLEAR_DELAY_MS: u32 = 200;

/// Soft drop divides the gravity interval by this factor.
pub const SOFT_DROP_MULTIPLIER: u32 = 20;

/// Number of rows above which the board reports danger.
pub const DANGER_ROWS: u8 = 2;

/// Rows of hidden buffer a freshly spawned piece may be raised into.
pub const SPAWN_BUFFER_ROWS: i8 = 2;

pub const DEFAULT_START_LEVEL: u32 = 1;
pub const DEFAULT_MAX_LEVEL: u32 = 20;
pub const DEFAULT_LINES_PER_LEVEL: u32 = 10;
pub const DEFAULT_PREVIEW_COUNT: usize = 5;

/// Longest next-queue preview a session will keep.
pub const MAX_PREVIEW_COUNT: usize = 7;

/// Level that ends a session in victory mode.
pub const VICTORY_LEVEL: u32 = 20;

/// Frame rate the gravity table is expressed in.
pub const GRAVITY_FPS: u32 = 60;

/// Frames per row, level 1 first. Levels past the end use the last entry.
pub const GRAVITY_FRAMES: [u32; 20] = [
    60, 50, 40, 30, 25, 20, 15, 12, 10, 8, 7, 6, 5, 4, 3, 3, 2, 2, 1, 1,
];

/// Line clear scoring table
///
/// Base points for clearing N lines at level 1:
/// - 1 line: 100 points
/// - 2 lines: 300 points
/// - 3 lines: 500 points
/// - 4 lines: 800 points (Tetris)
///
/// Points are multiplied by the level in force when the clear completes.
pub const LINE_SCORES: [u32; 5] = [0, 100, 300, 500, 800];

/// T-spin bonus per level, awarded when a T-spin piece locks.
pub const T_SPIN_BONUS: u32 = 400;

/// Points per cell of soft drop.
pub const SOFT_DROP_SCORE: u32 = 1;

/// Points per cell of hard drop.
pub const HARD_DROP_SCORE: u32 = 2;

/// Combo bonus per combo step per level.
pub const COMBO_BONUS: u32 = 50;

/// Back-to-back bonus numerator (3/2 = 1.5x multiplier)
pub const B2B_NUMERATOR: u32 = 3;

/// Back-to-back bonus denominator
pub const B2B_DENOMINATOR: u32 = 2;

/// The seven tetromino piece kinds
///
/// Each piece has a distinct shape and color:
/// - **I**: Cyan, horizontal bar
/// - **J**: Blue, J-shaped
/// - **L**: Orange, L-shaped (mirror of J)
/// - **O**: Yellow, 2x2 square
/// - **S**: Green, S-shaped
/// - **T**: Magenta, T-shaped
/// - **Z**: Red, Z-shaped (mirror of S)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

impl PieceKind {
    /// Number of distinct piece kinds.
    pub const LEN: usize = 7;

    /// Every kind, in a fixed order. A fresh bag starts from this.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::O,
        PieceKind::S,
        PieceKind::T,
        PieceKind::Z,
    ];

    /// Parse piece kind from string (case-insensitive)
    ///
    /// ```
    /// use denso_tetris_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("O"), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            "o" => Some(PieceKind::O),
            "s" => Some(PieceKind::S),
            "t" => Some(PieceKind::T),
            "z" => Some(PieceKind::Z),
            _ => None,
        }
    }

    /// Uppercase letter used in previews and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "I",
            PieceKind::J => "J",
            PieceKind::L => "L",
            PieceKind::O => "O",
            PieceKind::S => "S",
            PieceKind::T => "T",
            PieceKind::Z => "Z",
        }
    }
}

/// Rotation states following the Super Rotation System (SRS)
///
/// - **North**: Spawn orientation (state 0)
/// - **East**: Rotated 90° clockwise (state 1)
/// - **South**: Rotated 180° (state 2)
/// - **West**: Rotated 90° counter-clockwise (state 3)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rotation {
    #[default]
    North,
    East,
    South,
    West,
}

impl Rotation {
    /// Rotate clockwise (90°)
    ///
    /// ```
    /// use denso_tetris_types::Rotation;
    ///
    /// assert_eq!(Rotation::North.rotate_cw(), Rotation::East);
    /// assert_eq!(Rotation::West.rotate_cw(), Rotation::North);
    /// ```
    pub fn rotate_cw(&self) -> Self {
        match self {
            Rotation::North => Rotation::East,
            Rotation::East => Rotation::South,
            Rotation::South => Rotation::West,
            Rotation::West => Rotation::North,
        }
    }

    /// Rotate counter-clockwise (-90°)
    pub fn rotate_ccw(&self) -> Self {
        match self {
            Rotation::North => Rotation::West,
            Rotation::West => Rotation::South,
            Rotation::South => Rotation::East,
            Rotation::East => Rotation::North,
        }
    }

    /// Rotate one step in the given direction.
    pub fn rotated(&self, clockwise: bool) -> Self {
        if clockwise {
            self.rotate_cw()
        } else {
            self.rotate_ccw()
        }
    }

    /// Clockwise state index in `0..4`.
    pub fn index(&self) -> usize {
        match self {
            Rotation::North => 0,
            Rotation::East => 1,
            Rotation::South => 2,
            Rotation::West => 3,
        }
    }
}

/// Logical gameplay actions.
///
/// The core only ever sees these; raw key codes are resolved by the input layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameAction {
    /// Move piece one cell left (auto-repeats while held)
    MoveLeft,
    /// Move piece one cell right (auto-repeats while held)
    MoveRight,
    /// Speed up gravity while held
    SoftDrop,
    /// Drop to the landing row and lock immediately
    HardDrop,
    /// Rotate piece 90° clockwise
    RotateCw,
    /// Rotate piece 90° counter-clockwise
    RotateCcw,
    /// Swap with the hold slot (once per locked piece)
    Hold,
    /// Toggle pause
    Pause,
}

impl GameAction {
    pub const ALL: [GameAction; 8] = [
        GameAction::MoveLeft,
        GameAction::MoveRight,
        GameAction::SoftDrop,
        GameAction::HardDrop,
        GameAction::RotateCw,
        GameAction::RotateCcw,
        GameAction::Hold,
        GameAction::Pause,
    ];

    /// Parse action from string (case-insensitive, `_` ignored)
    ///
    /// ```
    /// use denso_tetris_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("moveLeft"), Some(GameAction::MoveLeft));
    /// assert_eq!(GameAction::from_str("rotate_ccw"), Some(GameAction::RotateCcw));
    /// assert_eq!(GameAction::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().replace('_', "").as_str() {
            "moveleft" => Some(GameAction::MoveLeft),
            "moveright" => Some(GameAction::MoveRight),
            "softdrop" => Some(GameAction::SoftDrop),
            "harddrop" => Some(GameAction::HardDrop),
            "rotatecw" => Some(GameAction::RotateCw),
            "rotateccw" => Some(GameAction::RotateCcw),
            "hold" => Some(GameAction::Hold),
            "pause" => Some(GameAction::Pause),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::SoftDrop => "softDrop",
            GameAction::HardDrop => "hardDrop",
            GameAction::RotateCw => "rotateCw",
            GameAction::RotateCcw => "rotateCcw",
            GameAction::Hold => "hold",
            GameAction::Pause => "pause",
        }
    }

    /// Actions whose effect depends on the key staying down.
    pub fn is_holdable(&self) -> bool {
        matches!(
            self,
            GameAction::MoveLeft | GameAction::MoveRight | GameAction::SoftDrop
        )
    }
}

/// A cell on the game board
///
/// - `None`: Empty cell
/// - `Some(PieceKind)`: Locked cell, colored by the kind that filled it
pub type Cell = Option<PieceKind>;

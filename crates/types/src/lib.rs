//! Shared vocabulary of the blocktris crates.
//!
//! Plain data only: field dimensions, timing and scoring constants, the piece
//! and rotation enums, and the player command set. Every other crate depends
//! on this one, so it has no dependencies of its own.
//!
//! The field is 10 columns by 20 rows with row 0 at the top. Pieces spawn with
//! their 4x4 box anchored at [`SPAWN_COLUMN`]. Gravity starts at
//! [`INITIAL_DROP_MS`] per row and speeds up by [`DROP_STEP_MS`] per level
//! until it reaches [`DROP_FLOOR_MS`].
//!
//! ```
//! use blocktris_types::{GameAction, PieceKind, Rotation, SPAWN_COLUMN};
//!
//! assert_eq!(PieceKind::ALL[PieceKind::T.index()], PieceKind::T);
//! assert_eq!(Rotation::West.rotate_cw(), Rotation::North);
//! assert_eq!(Rotation::from_index(5), Rotation::East);
//! assert_eq!(GameAction::HardDrop.as_str(), "hardDrop");
//! assert_eq!(SPAWN_COLUMN, 3);
//! ```

/// Field width in columns.
pub const BOARD_WIDTH: u8 = 10;

/// Field height in rows.
pub const BOARD_HEIGHT: u8 = 20;

/// Column of the piece anchor on spawn.
pub const SPAWN_COLUMN: i8 = BOARD_WIDTH as i8 / 2 - 2;

/// Drop interval at level 1 (milliseconds per row)
pub const INITIAL_DROP_MS: u32 = 600;

/// Drop interval reduction per level gained
pub const DROP_STEP_MS: u32 = 40;

/// Drop interval floor
pub const DROP_FLOOR_MS: u32 = 80;

/// Lines needed to gain one level
pub const LINES_PER_LEVEL: u32 = 10;

/// Base points by lines cleared in one lock (index = line count)
pub const LINE_SCORES: [u32; 5] = [0, 40, 100, 300, 1200];

/// Per-line base points when more than four lines clear at once
pub const OVERFLOW_LINE_SCORE: u32 = 300;

/// Number of highscore records kept by the stores
pub const HIGHSCORE_LIMIT: usize = 5;

/// Frame interval of the terminal loop (~60 FPS)
pub const FRAME_MS: u32 = 16;

/// Tetromino kinds. Shapes and colors live in the core piece catalog.
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
    /// All kinds in catalog order.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::O,
        PieceKind::S,
        PieceKind::T,
        PieceKind::Z,
    ];

    /// Position in [`PieceKind::ALL`].
    pub fn index(&self) -> usize {
        match self {
            PieceKind::I => 0,
            PieceKind::J => 1,
            PieceKind::L => 2,
            PieceKind::O => 3,
            PieceKind::S => 4,
            PieceKind::T => 5,
            PieceKind::Z => 6,
        }
    }
}

/// Rotation states in clockwise order; `North` is the spawn orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rotation {
    North,
    East,
    South,
    West,
}

impl Rotation {
    /// Next state clockwise.
    pub fn rotate_cw(&self) -> Self {
        Self::from_index(self.index() + 1)
    }

    /// Rotation state for an arbitrary index, taken modulo 4.
    pub fn from_index(index: usize) -> Self {
        match index % 4 {
            0 => Rotation::North,
            1 => Rotation::East,
            2 => Rotation::South,
            _ => Rotation::West,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Rotation::North => 0,
            Rotation::East => 1,
            Rotation::South => 2,
            Rotation::West => 3,
        }
    }
}

/// Discrete player commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    MoveLeft,
    MoveRight,
    SoftDrop,
    HardDrop,
    Rotate,
    TogglePause,
    Restart,
}

impl GameAction {
    /// Stable camelCase name, used in the event log.
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::SoftDrop => "softDrop",
            GameAction::HardDrop => "hardDrop",
            GameAction::Rotate => "rotate",
            GameAction::TogglePause => "togglePause",
            GameAction::Restart => "restart",
        }
    }
}

/// 24-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Cell on the board (None = empty, Some = filled by a locked piece kind)
pub type Cell = Option<PieceKind>;

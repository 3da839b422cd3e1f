//! Read-only view of the game handed to renderers.

use crate::game_state::Tetromino;
use crate::pieces::{color, get_shape, PieceShape};
use crate::types::{Cell, PieceKind, Rgb, Rotation, BOARD_HEIGHT, BOARD_WIDTH, INITIAL_DROP_MS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
}

impl ActiveSnapshot {
    /// Absolute (x, y) cells of the piece.
    pub fn cells(&self) -> PieceShape {
        self.cells_at(self.y)
    }

    /// Absolute cells with the anchor moved to row `y`.
    pub fn cells_at(&self, y: i8) -> PieceShape {
        get_shape(self.kind, self.rotation).map(|(dx, dy)| (self.x + dx, y + dy))
    }

    pub fn color(&self) -> Rgb {
        color(self.kind)
    }
}

impl From<Tetromino> for ActiveSnapshot {
    fn from(value: Tetromino) -> Self {
        Self {
            kind: value.kind,
            rotation: value.rotation,
            x: value.x,
            y: value.y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameSnapshot {
    pub board: [[Cell; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
    pub active: Option<ActiveSnapshot>,
    pub ghost_y: Option<i8>,
    pub next: Option<PieceKind>,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub paused: bool,
    pub game_over: bool,
    pub drop_interval_ms: u32,
}

impl GameSnapshot {
    pub fn clear(&mut self) {
        self.board = [[None; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize];
        self.active = None;
        self.ghost_y = None;
        self.next = None;
        self.score = 0;
        self.level = 1;
        self.lines = 0;
        self.paused = false;
        self.game_over = false;
        self.drop_interval_ms = INITIAL_DROP_MS;
    }

    pub fn playable(&self) -> bool {
        !self.game_over && !self.paused
    }

    /// Cells of the ghost piece (active piece moved to its landing row).
    pub fn ghost_cells(&self) -> Option<PieceShape> {
        let active = self.active?;
        self.ghost_y.map(|y| active.cells_at(y))
    }

    /// Next piece in its spawn orientation, relative to its 4x4 box.
    pub fn next_preview(&self) -> Option<(PieceKind, PieceShape)> {
        self.next
            .map(|kind| (kind, get_shape(kind, Rotation::North)))
    }
}

impl Default for GameSnapshot {
    fn default() -> Self {
        Self {
            board: [[None; BOARD_WIDTH as usize]; BOARD_HEIGHT as usize],
            active: None,
            ghost_y: None,
            next: None,
            score: 0,
            level: 1,
            lines: 0,
            paused: false,
            game_over: false,
            drop_interval_ms: INITIAL_DROP_MS,
        }
    }
}

//! Events emitted by the game state for observers (effects, persistence, logs).
//!
//! Events never feed back into the game: observers may drop them freely.

use arrayvec::ArrayVec;

use crate::types::{Rgb, BOARD_HEIGHT, BOARD_WIDTH};

/// One row removed by a line clear
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearedLine {
    /// Row index before the clear (0 = top).
    pub row: usize,
    /// Colors of the removed cells, left to right.
    pub colors: [Rgb; BOARD_WIDTH as usize],
    /// Base points of a clear as large as this line's position in the event
    /// (40 for the first line, 100 for the second, ...). Display only.
    pub popup_points: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineClearEvent {
    /// Cleared rows, bottom first.
    pub lines: ArrayVec<ClearedLine, { BOARD_HEIGHT as usize }>,
    /// Points actually added to the score.
    pub score_delta: u32,
    /// Level the clear was scored at.
    pub level: u32,
    /// Total lines after this clear.
    pub total_lines: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverReason {
    /// A locked piece had a cell above the field.
    TopOut,
    /// A new piece did not fit at its spawn position.
    SpawnBlocked,
}

impl GameOverReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameOverReason::TopOut => "top_out",
            GameOverReason::SpawnBlocked => "spawn_blocked",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    LineClear(LineClearEvent),
    LevelUp {
        level: u32,
        drop_interval_ms: u32,
    },
    GameOver {
        reason: GameOverReason,
        score: u32,
        level: u32,
        lines: u32,
    },
    Restarted,
}

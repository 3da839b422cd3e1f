//! Line-clear effects: a short flash over each cleared row plus a rising
//! score popup.
//!
//! Effects are purely cosmetic. They are fed from `LineClearEvent`s, age with
//! frame time and never touch the game state.

use crate::core::LineClearEvent;
use crate::types::{Rgb, BOARD_WIDTH};

/// How long a cleared row flashes.
pub const FLASH_MS: u32 = 240;
/// Blink period of the flash.
pub const FLASH_BLINK_MS: u32 = 60;
/// How long a score popup stays visible.
pub const POPUP_MS: u32 = 900;
/// A popup rises one row per this many milliseconds.
pub const POPUP_RISE_MS: u32 = 300;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowFlash {
    pub row: usize,
    pub colors: [Rgb; BOARD_WIDTH as usize],
    pub age_ms: u32,
}

impl RowFlash {
    /// Alternates between the cleared colors and white.
    pub fn bright(&self) -> bool {
        (self.age_ms / FLASH_BLINK_MS) % 2 == 1
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScorePopup {
    pub row: usize,
    pub points: u32,
    pub age_ms: u32,
}

impl ScorePopup {
    /// Row the popup is drawn on (it drifts upward, clamped at the top).
    pub fn display_row(&self) -> usize {
        self.row.saturating_sub((self.age_ms / POPUP_RISE_MS) as usize)
    }

    /// Fades out over the last third of its life.
    pub fn fading(&self) -> bool {
        self.age_ms >= POPUP_MS * 2 / 3
    }
}

#[derive(Debug, Clone, Default)]
pub struct EffectsLayer {
    flashes: Vec<RowFlash>,
    popups: Vec<ScorePopup>,
}

impl EffectsLayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one flash and one popup per cleared line.
    pub fn push_line_clear(&mut self, event: &LineClearEvent) {
        for line in &event.lines {
            self.flashes.push(RowFlash {
                row: line.row,
                colors: line.colors,
                age_ms: 0,
            });
            self.popups.push(ScorePopup {
                row: line.row,
                points: line.popup_points,
                age_ms: 0,
            });
        }
    }

    /// Age all effects and drop the expired ones.
    pub fn advance(&mut self, elapsed_ms: u32) {
        for flash in &mut self.flashes {
            flash.age_ms = flash.age_ms.saturating_add(elapsed_ms);
        }
        for popup in &mut self.popups {
            popup.age_ms = popup.age_ms.saturating_add(elapsed_ms);
        }
        self.flashes.retain(|f| f.age_ms < FLASH_MS);
        self.popups.retain(|p| p.age_ms < POPUP_MS);
    }

    pub fn is_active(&self) -> bool {
        !self.flashes.is_empty() || !self.popups.is_empty()
    }

    pub fn clear(&mut self) {
        self.flashes.clear();
        self.popups.clear();
    }

    pub fn flashes(&self) -> &[RowFlash] {
        &self.flashes
    }

    pub fn popups(&self) -> &[ScorePopup] {
        &self.popups
    }
}

//! Scoring module - line-clear points, levels and drop speed
//!
//! Classic rules:
//! - Base points by lines cleared at once: 40 / 100 / 300 / 1200, or `n * 300`
//!   beyond four (unreachable with single-piece locks).
//! - The awarded delta is base points times the current level (1-based).
//! - Level is `lines / 10 + 1`.
//! - Drop interval is `max(80, 600 - (level - 1) * 40)` milliseconds.

use crate::types::{
    DROP_FLOOR_MS, DROP_STEP_MS, INITIAL_DROP_MS, LINES_PER_LEVEL, LINE_SCORES,
    OVERFLOW_LINE_SCORE,
};

/// Base points for clearing `lines` rows in one lock (before the level multiplier)
pub fn line_clear_points(lines: usize) -> u32 {
    match lines {
        0..=4 => LINE_SCORES[lines],
        n => (n as u32).saturating_mul(OVERFLOW_LINE_SCORE),
    }
}

/// Calculate line clear score
/// lines: number of lines cleared
/// level: current level (1-based)
pub fn calculate_line_score(lines: usize, level: u32) -> u32 {
    line_clear_points(lines).saturating_mul(level)
}

/// Level reached after clearing `total_lines` lines
pub fn calculate_level(total_lines: u32) -> u32 {
    total_lines / LINES_PER_LEVEL + 1
}

/// Get drop interval for a level (in milliseconds)
pub fn get_drop_interval_ms(level: u32) -> u32 {
    let reduction = level.saturating_sub(1).saturating_mul(DROP_STEP_MS);
    INITIAL_DROP_MS.saturating_sub(reduction).max(DROP_FLOOR_MS)
}

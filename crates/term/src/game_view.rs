//! GameView: maps a `core::GameSnapshot` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::{color, GameSnapshot};
use crate::effects::EffectsLayer;
use crate::fb::{CellStyle, FrameBuffer, Glyph};
use crate::types::{PieceKind, Rgb, BOARD_HEIGHT, BOARD_WIDTH};

const BOARD_BG: Rgb = Rgb::new(30, 30, 40);
const SCREEN_BG: Rgb = Rgb::new(0, 0, 0);
const TEXT: Rgb = Rgb::new(200, 200, 200);
const LABEL: Rgb = Rgb::new(230, 230, 230);
const WARN: Rgb = Rgb::new(240, 120, 80);

const CONTROLS: [(&str, &str); 7] = [
    ("←/→", "move"),
    ("↑", "rotate"),
    ("↓", "soft drop"),
    ("Space", "hard drop"),
    ("P", "pause"),
    ("Enter", "restart"),
    ("Q", "quit"),
];

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// One row of the highscore table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreRow {
    pub name: String,
    pub score: u32,
}

/// Everything shown next to the board that is not part of the game snapshot.
#[derive(Debug, Clone, Copy, Default)]
pub struct PanelInfo<'a> {
    pub highscores: &'a [ScoreRow],
    /// One-line status (for example a failed highscore save).
    pub message: Option<&'a str>,
}

/// Screen position of the board frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Frame {
    x: u16,
    y: u16,
    w: u16,
    h: u16,
}

/// A lightweight terminal renderer for the game.
pub struct GameView {
    /// Board cell width in terminal columns.
    cell_w: u16,
    /// Board cell height in terminal rows.
    cell_h: u16,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 compensates for typical terminal glyph aspect ratio.
        Self {
            cell_w: 2,
            cell_h: 1,
        }
    }
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
        }
    }

    /// Render into an existing framebuffer.
    ///
    /// Callers reuse one framebuffer across frames; it only reallocates when
    /// the viewport size changes.
    pub fn render_into(
        &self,
        snap: &GameSnapshot,
        panel: PanelInfo<'_>,
        effects: Option<&EffectsLayer>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(Glyph::default());

        let frame = self.frame(viewport);
        let board_style = CellStyle::new(Rgb::new(90, 90, 100), BOARD_BG).dim();

        fb.fill_rect(frame.x + 1, frame.y + 1, frame.w - 2, frame.h - 2, ' ', board_style);
        fb.draw_border(frame.x, frame.y, frame.w, frame.h, CellStyle::new(TEXT, SCREEN_BG));

        // Locked cells.
        for (y, row) in snap.board.iter().enumerate() {
            for (x, cell) in row.iter().enumerate() {
                match cell {
                    Some(kind) => self.draw_piece_cell(fb, frame, x as i8, y as i8, *kind),
                    None => self.fill_cell(fb, frame, x as i8, y as i8, '·', board_style),
                }
            }
        }

        // Ghost piece.
        if let Some(cells) = snap.ghost_cells() {
            let ghost = CellStyle::new(Rgb::new(140, 140, 140), BOARD_BG).dim();
            for (x, y) in cells {
                self.fill_cell(fb, frame, x, y, '░', ghost);
            }
        }

        // Active piece.
        if let Some(active) = snap.active {
            for (x, y) in active.cells() {
                self.draw_piece_cell(fb, frame, x, y, active.kind);
            }
        }

        if let Some(effects) = effects {
            self.draw_effects(fb, frame, effects);
        }

        self.draw_controls(fb, frame);
        self.draw_side_panel(fb, snap, panel, viewport, frame);

        if let Some(message) = panel.message {
            let y = frame.y + frame.h;
            if y < viewport.height {
                fb.put_str(frame.x, y, message, CellStyle::new(WARN, SCREEN_BG));
            }
        }

        if snap.game_over {
            self.draw_overlay(fb, frame, &["GAME OVER", "Enter: restart"]);
        } else if snap.paused {
            self.draw_overlay(fb, frame, &["PAUSED", "P: resume"]);
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(
        &self,
        snap: &GameSnapshot,
        panel: PanelInfo<'_>,
        effects: Option<&EffectsLayer>,
        viewport: Viewport,
    ) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, panel, effects, viewport, &mut fb);
        fb
    }

    fn frame(&self, viewport: Viewport) -> Frame {
        let w = BOARD_WIDTH as u16 * self.cell_w + 2;
        let h = BOARD_HEIGHT as u16 * self.cell_h + 2;
        Frame {
            x: viewport.width.saturating_sub(w) / 2,
            y: viewport.height.saturating_sub(h) / 2,
            w,
            h,
        }
    }

    /// Fill one board cell; cells outside the field are skipped.
    fn fill_cell(&self, fb: &mut FrameBuffer, frame: Frame, x: i8, y: i8, ch: char, style: CellStyle) {
        if x < 0 || y < 0 || x >= BOARD_WIDTH as i8 || y >= BOARD_HEIGHT as i8 {
            return;
        }
        let px = frame.x + 1 + x as u16 * self.cell_w;
        let py = frame.y + 1 + y as u16 * self.cell_h;
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ch, style);
    }

    fn draw_piece_cell(&self, fb: &mut FrameBuffer, frame: Frame, x: i8, y: i8, kind: PieceKind) {
        let style = CellStyle::new(color(kind), BOARD_BG).bold();
        self.fill_cell(fb, frame, x, y, '█', style);
    }

    fn draw_effects(&self, fb: &mut FrameBuffer, frame: Frame, effects: &EffectsLayer) {
        for flash in effects.flashes() {
            for (x, rgb) in flash.colors.iter().enumerate() {
                let fg = if flash.bright() { Rgb::new(255, 255, 255) } else { *rgb };
                let style = CellStyle::new(fg, BOARD_BG).bold();
                self.fill_cell(fb, frame, x as i8, flash.row as i8, '▓', style);
            }
        }

        for popup in effects.popups() {
            let mut style = CellStyle::new(Rgb::new(255, 240, 120), BOARD_BG).bold();
            if popup.fading() {
                style = style.dim();
            }
            let py = frame.y + 1 + popup.display_row() as u16 * self.cell_h;
            let digits = digit_count(popup.points);
            let px = frame.x + 1 + (frame.w - 2).saturating_sub(digits + 1) / 2;
            fb.put_char(px, py, '+', style);
            fb.put_u32(px + 1, py, popup.points, style);
        }
    }

    fn draw_controls(&self, fb: &mut FrameBuffer, frame: Frame) {
        const WIDTH: u16 = 18;
        if frame.x < WIDTH + 2 {
            return;
        }
        let x = frame.x - WIDTH - 2;
        let label = CellStyle::new(LABEL, SCREEN_BG).bold();
        let key = CellStyle::new(TEXT, SCREEN_BG);
        let hint = key.dim();

        fb.put_str(x, frame.y, "CONTROLS", label);
        for (i, (k, what)) in CONTROLS.iter().enumerate() {
            let y = frame.y + 2 + i as u16;
            fb.put_str(x, y, k, key);
            fb.put_str(x + 7, y, what, hint);
        }
    }

    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        panel: PanelInfo<'_>,
        viewport: Viewport,
        frame: Frame,
    ) {
        let x = frame.x + frame.w + 2;
        if x.saturating_add(12) > viewport.width {
            return;
        }
        let label = CellStyle::new(LABEL, SCREEN_BG).bold();
        let value = CellStyle::new(TEXT, SCREEN_BG);

        let mut y = frame.y;
        for (name, n) in [("SCORE", snap.score), ("LEVEL", snap.level), ("LINES", snap.lines)] {
            fb.put_str(x, y, name, label);
            fb.put_u32(x, y + 1, n, value);
            y += 3;
        }

        fb.put_str(x, y, "NEXT", label);
        if let Some((kind, shape)) = snap.next_preview() {
            // Preview rows are normalized so the piece sits right under the label.
            let top = shape.iter().map(|&(_, dy)| dy).min().unwrap_or(0);
            let style = CellStyle::new(color(kind), SCREEN_BG).bold();
            for (dx, dy) in shape {
                fb.fill_rect(x + dx as u16 * 2, y + 1 + (dy - top) as u16, 2, 1, '█', style);
            }
        }
        y += 4;

        fb.put_str(x, y, "TOP 5", label);
        if panel.highscores.is_empty() {
            fb.put_str(x, y + 1, "-", value.dim());
        }
        for (i, row) in panel.highscores.iter().enumerate() {
            let ry = y + 1 + i as u16;
            fb.put_u32(x, ry, i as u32 + 1, value.dim());
            let name_end = fb.put_str(x + 3, ry, truncate(&row.name, 10), value);
            fb.put_u32(name_end.max(x + 14), ry, row.score, value);
        }
    }

    fn draw_overlay(&self, fb: &mut FrameBuffer, frame: Frame, lines: &[&str]) {
        let style = CellStyle::new(Rgb::new(255, 255, 255), SCREEN_BG).bold();
        let mid = frame.y + frame.h / 2;
        for (i, text) in lines.iter().enumerate() {
            let w = text.chars().count() as u16;
            let x = frame.x + frame.w.saturating_sub(w) / 2;
            let y = (mid + i as u16).saturating_sub(lines.len() as u16 / 2);
            fb.put_str(x, y, text, if i == 0 { style } else { style.dim() });
        }
    }
}

fn digit_count(mut n: u32) -> u16 {
    let mut count = 1;
    while n >= 10 {
        n /= 10;
        count += 1;
    }
    count
}

fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

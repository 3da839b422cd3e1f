//! Board module - the playfield ("wall") of locked cells
//!
//! The board is a 10x20 grid where each cell is empty or holds the kind (and
//! therefore the color) of the piece that was locked there.
//! Uses a flat array for cache locality and zero-allocation.
//! Coordinates: (x, y) where x ranges 0..9 (left to right), y ranges 0..19 (top to bottom).
//! Pieces may hang above the field (negative y); those cells are never stored.

use arrayvec::ArrayVec;

use crate::pieces::get_shape;
use crate::types::{Cell, PieceKind, Rotation, BOARD_HEIGHT, BOARD_WIDTH};

/// Total number of cells on the board
const BOARD_SIZE: usize = (BOARD_WIDTH as usize) * (BOARD_HEIGHT as usize);

const WIDTH: usize = BOARD_WIDTH as usize;

/// Outcome of writing a piece into the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockOutcome {
    /// Every cell landed inside the field.
    Placed,
    /// At least one cell was above the field; the in-field cells were still written.
    TopOut,
}

/// A row removed by [`Board::clear_full_lines`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearedRow {
    /// Index of the row before this clear started (0 = top).
    pub row: usize,
    /// Kinds of the cells that made up the row, left to right.
    pub cells: [PieceKind; WIDTH],
}

/// Rows cleared by a single lock, bottom first
pub type ClearedRows = ArrayVec<ClearedRow, { BOARD_HEIGHT as usize }>;

/// The game board - 10 columns x 20 rows using flat array storage
#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    /// Flat array of cells, row-major order (y * WIDTH + x)
    cells: [Cell; BOARD_SIZE],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [None; BOARD_SIZE],
        }
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(x: i8, y: i8) -> Option<usize> {
        if x < 0 || x >= BOARD_WIDTH as i8 || y < 0 || y >= BOARD_HEIGHT as i8 {
            return None;
        }
        Some((y as usize) * WIDTH + (x as usize))
    }

    pub fn width(&self) -> u8 {
        BOARD_WIDTH
    }

    pub fn height(&self) -> u8 {
        BOARD_HEIGHT
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i8, y: i8) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i8, y: i8, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Check if position is occupied (within bounds and filled)
    pub fn is_occupied(&self, x: i8, y: i8) -> bool {
        matches!(self.get(x, y), Some(Some(_)))
    }

    /// Whether a single mino may sit at (x, y).
    ///
    /// Columns must be inside the field and rows above the floor. Rows above the
    /// top edge are always free; rows inside the field must be empty.
    #[inline]
    pub fn is_free(&self, x: i8, y: i8) -> bool {
        if x < 0 || x >= BOARD_WIDTH as i8 || y >= BOARD_HEIGHT as i8 {
            return false;
        }
        y < 0 || !self.is_occupied(x, y)
    }

    /// Whether a piece fits with its anchor at (x, y)
    pub fn is_valid_position(&self, kind: PieceKind, rotation: Rotation, x: i8, y: i8) -> bool {
        get_shape(kind, rotation)
            .iter()
            .all(|&(dx, dy)| self.is_free(x + dx, y + dy))
    }

    /// Write a piece into the board
    ///
    /// Cells inside the field take the piece's kind. A cell above the field is
    /// skipped and reported as [`LockOutcome::TopOut`].
    pub fn lock_piece(&mut self, kind: PieceKind, rotation: Rotation, x: i8, y: i8) -> LockOutcome {
        let mut outcome = LockOutcome::Placed;
        for &(dx, dy) in get_shape(kind, rotation).iter() {
            let py = y + dy;
            if py < 0 {
                outcome = LockOutcome::TopOut;
                continue;
            }
            self.set(x + dx, py, Some(kind));
        }
        outcome
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= BOARD_HEIGHT as usize {
            return false;
        }
        let start = y * WIDTH;
        self.cells[start..start + WIDTH].iter().all(|cell| cell.is_some())
    }

    /// Remove row `y` and shift all rows above down by one
    ///
    /// Row 0 becomes empty. Returns false if `y` is out of bounds.
    pub fn clear_row(&mut self, y: usize) -> bool {
        if y >= BOARD_HEIGHT as usize {
            return false;
        }

        // copy_within handles the overlapping ranges
        for row in (1..=y).rev() {
            let src_start = (row - 1) * WIDTH;
            self.cells
                .copy_within(src_start..src_start + WIDTH, row * WIDTH);
        }

        self.cells[..WIDTH].fill(None);
        true
    }

    /// Clear every full row, collapsing the rows above
    ///
    /// Scans bottom to top. After a row is removed the same index is examined
    /// again, since the row above has just moved into it.
    pub fn clear_full_lines(&mut self) -> ClearedRows {
        let mut cleared = ClearedRows::new();
        let mut y = BOARD_HEIGHT as usize;

        while y > 0 {
            let row = y - 1;
            if !self.is_row_full(row) {
                y -= 1;
                continue;
            }

            let start = row * WIDTH;
            let mut cells = [PieceKind::I; WIDTH];
            for (dst, src) in cells.iter_mut().zip(&self.cells[start..start + WIDTH]) {
                if let Some(kind) = src {
                    *dst = *kind;
                }
            }

            // Every row cleared so far sat below this one and pulled it down by one.
            cleared.push(ClearedRow {
                row: row - cleared.len(),
                cells,
            });
            self.clear_row(row);
        }

        cleared
    }

    /// Cells of row `y`, left to right
    pub fn row(&self, y: usize) -> &[Cell] {
        let start = y.min(BOARD_HEIGHT as usize - 1) * WIDTH;
        &self.cells[start..start + WIDTH]
    }

    /// Copy the board into a 2D grid (row-major, row 0 at the top)
    pub fn write_grid(&self, out: &mut [[Cell; WIDTH]; BOARD_HEIGHT as usize]) {
        for (y, row) in out.iter_mut().enumerate() {
            row.copy_from_slice(self.row(y));
        }
    }

    /// Get a reference to the internal cells array
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Number of occupied cells
    pub fn filled_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        self.cells.fill(None);
    }

    /// Create from text rows for testing: `#` is filled (as `I`), anything else empty.
    ///
    /// Rows are aligned to the bottom of the board.
    #[cfg(test)]
    pub fn from_rows(rows: &[&str]) -> Self {
        assert!(rows.len() <= BOARD_HEIGHT as usize);
        let mut board = Self::new();
        let offset = BOARD_HEIGHT as usize - rows.len();
        for (i, line) in rows.iter().enumerate() {
            for (x, ch) in line.chars().take(WIDTH).enumerate() {
                if ch == '#' {
                    board.set(x as i8, (offset + i) as i8, Some(PieceKind::I));
                }
            }
        }
        board
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

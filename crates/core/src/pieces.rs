//! Pieces module - tetromino shapes, colors and rotation with wall kicks
//!
//! Every piece lives in a 4x4 box. Each rotation state is a fixed table of four
//! `(x, y)` offsets from the box's top-left corner (x to the right, y down).
//! Rotation is clockwise only and resolved with a fixed kick sequence.

use crate::rng::SimpleRng;
use crate::types::{PieceKind, Rgb, Rotation};

/// Offset of a single mino relative to the piece anchor
pub type MinoOffset = (i8, i8);

/// Shape of a piece - 4 mino offsets from the piece anchor
pub type PieceShape = [MinoOffset; 4];

/// Horizontal kicks tried, in order, at the unchanged row.
pub const HORIZONTAL_KICKS: [i8; 5] = [0, -1, 1, -2, 2];

/// Row offset of the single vertical kick tried after every horizontal kick failed.
pub const VERTICAL_KICK: i8 = -1;

/// Get the shape (mino offsets) for a piece kind and rotation
pub fn get_shape(kind: PieceKind, rotation: Rotation) -> PieceShape {
    match kind {
        PieceKind::I => get_i_shape(rotation),
        PieceKind::J => get_j_shape(rotation),
        PieceKind::L => get_l_shape(rotation),
        PieceKind::O => get_o_shape(rotation),
        PieceKind::S => get_s_shape(rotation),
        PieceKind::T => get_t_shape(rotation),
        PieceKind::Z => get_z_shape(rotation),
    }
}

/// Shape lookup by raw rotation index (taken modulo 4).
pub fn blocks(kind: PieceKind, rotation_index: usize) -> PieceShape {
    get_shape(kind, Rotation::from_index(rotation_index))
}

/// I piece shapes
fn get_i_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(0, 1), (1, 1), (2, 1), (3, 1)],
        Rotation::East => [(2, 0), (2, 1), (2, 2), (2, 3)],
        Rotation::South => [(0, 2), (1, 2), (2, 2), (3, 2)],
        Rotation::West => [(1, 0), (1, 1), (1, 2), (1, 3)],
    }
}

/// J piece shapes
fn get_j_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(0, 0), (0, 1), (1, 1), (2, 1)],
        Rotation::East => [(1, 0), (2, 0), (1, 1), (1, 2)],
        Rotation::South => [(0, 1), (1, 1), (2, 1), (2, 2)],
        Rotation::West => [(1, 0), (1, 1), (0, 2), (1, 2)],
    }
}

/// L piece shapes
fn get_l_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(2, 0), (0, 1), (1, 1), (2, 1)],
        Rotation::East => [(1, 0), (1, 1), (1, 2), (2, 2)],
        Rotation::South => [(0, 1), (1, 1), (2, 1), (0, 2)],
        Rotation::West => [(0, 0), (1, 0), (1, 1), (1, 2)],
    }
}

/// O piece shapes (same for all rotations)
fn get_o_shape(_rotation: Rotation) -> PieceShape {
    [(1, 0), (2, 0), (1, 1), (2, 1)]
}

// S and Z only have two distinct orientations; South/West repeat North/East.

/// S piece shapes
fn get_s_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North | Rotation::South => [(1, 0), (2, 0), (0, 1), (1, 1)],
        Rotation::East | Rotation::West => [(1, 0), (1, 1), (2, 1), (2, 2)],
    }
}

/// T piece shapes
fn get_t_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(1, 0), (0, 1), (1, 1), (2, 1)],
        Rotation::East => [(1, 0), (1, 1), (2, 1), (1, 2)],
        Rotation::South => [(0, 1), (1, 1), (2, 1), (1, 2)],
        Rotation::West => [(1, 0), (0, 1), (1, 1), (1, 2)],
    }
}

/// Z piece shapes
fn get_z_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North | Rotation::South => [(0, 0), (1, 0), (1, 1), (2, 1)],
        Rotation::East | Rotation::West => [(2, 0), (1, 1), (2, 1), (1, 2)],
    }
}

/// Display color of a piece kind
pub fn color(kind: PieceKind) -> Rgb {
    match kind {
        PieceKind::I => Rgb::new(0, 220, 220),
        PieceKind::J => Rgb::new(0, 0, 220),
        PieceKind::L => Rgb::new(255, 160, 0),
        PieceKind::O => Rgb::new(220, 220, 0),
        PieceKind::S => Rgb::new(0, 220, 0),
        PieceKind::T => Rgb::new(160, 0, 220),
        PieceKind::Z => Rgb::new(220, 0, 0),
    }
}

/// Number of leading all-empty rows in the 4x4 template.
///
/// Spawning at `row = -top_empty_rows(..)` puts the first occupied row of the
/// piece exactly on the top edge of the field.
pub fn top_empty_rows(kind: PieceKind, rotation: Rotation) -> i8 {
    get_shape(kind, rotation)
        .iter()
        .map(|&(_, y)| y)
        .min()
        .unwrap_or(4)
}

/// Uniform choice over the seven piece kinds.
pub fn random_kind(rng: &mut SimpleRng) -> PieceKind {
    PieceKind::ALL[rng.next_range(PieceKind::ALL.len() as u32) as usize]
}

/// Try to rotate a piece clockwise with wall kicks
///
/// `is_valid(rotation, x, y)` reports whether the piece fits with its anchor at
/// `(x, y)`. Kicks are tried in [`HORIZONTAL_KICKS`] order at the same row, then
/// [`VERTICAL_KICK`] at the original column. The first fit wins.
///
/// Returns `Some((new_rotation, (dx, dy)))` if successful, `None` if every kick fails.
pub fn try_rotate(
    rotation: Rotation,
    x: i8,
    y: i8,
    is_valid: impl Fn(Rotation, i8, i8) -> bool,
) -> Option<(Rotation, (i8, i8))> {
    let new_rotation = rotation.rotate_cw();

    for &dx in HORIZONTAL_KICKS.iter() {
        if is_valid(new_rotation, x + dx, y) {
            return Some((new_rotation, (dx, 0)));
        }
    }

    if is_valid(new_rotation, x, y + VERTICAL_KICK) {
        return Some((new_rotation, (0, VERTICAL_KICK)));
    }

    None
}

//! Board tests through the public facade

use blocktris::core::{Board, LockOutcome};
use blocktris::types::{PieceKind, Rotation, BOARD_HEIGHT, BOARD_WIDTH};

fn fill_row(board: &mut Board, y: i8, kind: PieceKind) {
    for x in 0..BOARD_WIDTH as i8 {
        board.set(x, y, Some(kind));
    }
}

#[test]
fn test_board_new_empty() {
    let board = Board::new();
    assert_eq!(board.width(), BOARD_WIDTH);
    assert_eq!(board.height(), BOARD_HEIGHT);
    for y in 0..BOARD_HEIGHT as i8 {
        for x in 0..BOARD_WIDTH as i8 {
            assert_eq!(board.get(x, y), Some(None));
        }
    }
}

#[test]
fn test_board_get_out_of_bounds() {
    let board = Board::new();
    assert_eq!(board.get(-1, 0), None);
    assert_eq!(board.get(0, -1), None);
    assert_eq!(board.get(BOARD_WIDTH as i8, 0), None);
    assert_eq!(board.get(0, BOARD_HEIGHT as i8), None);
}

#[test]
fn test_rows_above_the_field_are_free() {
    let board = Board::new();
    assert!(board.is_free(0, -3));
    assert!(!board.is_free(-1, -3));
    assert!(!board.is_free(BOARD_WIDTH as i8, 0));
    assert!(!board.is_free(0, BOARD_HEIGHT as i8));
}

#[test]
fn test_two_bottom_rows_clear_in_one_pass() {
    let mut board = Board::new();
    fill_row(&mut board, 18, PieceKind::S);
    fill_row(&mut board, 19, PieceKind::Z);
    board.set(2, 17, Some(PieceKind::T));
    board.set(7, 5, Some(PieceKind::J));

    let cleared = board.clear_full_lines();
    assert_eq!(cleared.len(), 2);

    // Content above shifts down by two rows.
    assert_eq!(board.get(2, 19), Some(Some(PieceKind::T)));
    assert_eq!(board.get(7, 7), Some(Some(PieceKind::J)));
    assert_eq!(board.get(2, 17), Some(None));
    assert_eq!(board.filled_count(), 2);

    // Top two rows are empty.
    for y in 0..2 {
        for x in 0..BOARD_WIDTH as i8 {
            assert_eq!(board.get(x, y), Some(None));
        }
    }
}

#[test]
fn test_non_adjacent_full_rows() {
    let mut board = Board::new();
    fill_row(&mut board, 19, PieceKind::I);
    board.set(0, 18, Some(PieceKind::O));
    fill_row(&mut board, 17, PieceKind::L);

    let cleared = board.clear_full_lines();
    let rows: Vec<usize> = cleared.iter().map(|c| c.row).collect();
    assert_eq!(rows, vec![19, 17]);
    assert_eq!(cleared[1].cells, [PieceKind::L; BOARD_WIDTH as usize]);
    assert_eq!(board.get(0, 19), Some(Some(PieceKind::O)));
    assert_eq!(board.filled_count(), 1);
}

#[test]
fn test_lock_above_field_reports_top_out() {
    let mut board = Board::new();
    // I North at y = -1 has every cell on row 0.
    assert_eq!(
        board.lock_piece(PieceKind::I, Rotation::North, 3, -1),
        LockOutcome::Placed
    );
    // I East at y = -2 pokes two cells above the field.
    assert_eq!(
        board.lock_piece(PieceKind::I, Rotation::East, -2, -2),
        LockOutcome::TopOut
    );
    assert_eq!(board.get(0, 0), Some(Some(PieceKind::I)));
    assert_eq!(board.get(0, 1), Some(Some(PieceKind::I)));
}

#[test]
fn test_valid_position_checks_walls_and_cells() {
    let mut board = Board::new();
    assert!(board.is_valid_position(PieceKind::O, Rotation::North, -1, 0));
    assert!(!board.is_valid_position(PieceKind::O, Rotation::North, -2, 0));
    assert!(!board.is_valid_position(PieceKind::O, Rotation::North, 3, 19));

    board.set(4, 10, Some(PieceKind::Z));
    assert!(!board.is_valid_position(PieceKind::O, Rotation::North, 3, 9));
    assert!(board.is_valid_position(PieceKind::O, Rotation::North, 3, 8));
}

//! Game state module - manages the complete game state
//!
//! This module ties together all core components: board, pieces, RNG, scoring
//! and the drop clock. It drives the piece lifecycle
//! (spawn → fall → lock → line clear → spawn) and owns the session counters.
//!
//! Every operation is a short synchronous transition on `&mut self`, so a host
//! that owns the `GameState` serializes moves, drops and clock ticks for free.

use crate::board::{ClearedRows, LockOutcome};
use crate::clock::DropClock;
use crate::events::{ClearedLine, GameEvent, GameOverReason, LineClearEvent};
use crate::pieces::{color, get_shape, random_kind, top_empty_rows, try_rotate};
use crate::scoring::{calculate_level, calculate_line_score, get_drop_interval_ms, line_clear_points};
use crate::snapshot::{ActiveSnapshot, GameSnapshot};
use crate::types::*;
use crate::{Board, SimpleRng};

/// Active falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tetromino {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
}

impl Tetromino {
    /// Create a new tetromino at its spawn position
    ///
    /// The anchor row is lifted so the first occupied row sits on row 0.
    pub fn new(kind: PieceKind) -> Self {
        Self {
            kind,
            rotation: Rotation::North,
            x: SPAWN_COLUMN,
            y: -top_empty_rows(kind, Rotation::North),
        }
    }

    /// Get the shape (mino offsets) for current rotation
    pub fn shape(&self) -> [(i8, i8); 4] {
        get_shape(self.kind, self.rotation)
    }

    /// Absolute (x, y) cells of the piece
    pub fn cells(&self) -> [(i8, i8); 4] {
        self.shape().map(|(dx, dy)| (self.x + dx, self.y + dy))
    }

    /// Check if the piece fits on the board at its current position
    pub fn is_valid(&self, board: &Board) -> bool {
        board.is_valid_position(self.kind, self.rotation, self.x, self.y)
    }
}

/// Where the piece lifecycle currently is
///
/// Operations run to completion, so callers only ever observe `Spawning`
/// (before start), `Falling` or `GameOver`. The intermediate phases exist
/// while a lock is being resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Spawning,
    Falling,
    Locking,
    LineClear,
    GameOver,
}

/// Session counters and flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub paused: bool,
    pub game_over: bool,
}

impl Session {
    pub fn new() -> Self {
        Self {
            score: 0,
            level: 1,
            lines: 0,
            paused: false,
            game_over: false,
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    board: Board,
    active: Option<Tetromino>,
    next: Option<PieceKind>,
    rng: SimpleRng,
    session: Session,
    phase: Phase,
    clock: DropClock,
    game_over_reason: Option<GameOverReason>,
    /// Pending events (drained by observers).
    events: Vec<GameEvent>,
    started: bool,
}

impl GameState {
    /// Create a new game with the given RNG seed
    pub fn new(seed: u32) -> Self {
        Self {
            board: Board::new(),
            active: None,
            next: None,
            rng: SimpleRng::new(seed),
            session: Session::new(),
            phase: Phase::Spawning,
            clock: DropClock::new(),
            game_over_reason: None,
            events: Vec::with_capacity(8),
            started: false,
        }
    }

    /// Start the game and spawn the first piece
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        self.next = Some(random_kind(&mut self.rng));
        self.spawn_piece();
    }

    pub fn started(&self) -> bool {
        self.started
    }

    pub fn paused(&self) -> bool {
        self.session.paused
    }

    pub fn game_over(&self) -> bool {
        self.session.game_over
    }

    pub fn game_over_reason(&self) -> Option<GameOverReason> {
        self.game_over_reason
    }

    pub fn score(&self) -> u32 {
        self.session.score
    }

    pub fn level(&self) -> u32 {
        self.session.level
    }

    pub fn lines(&self) -> u32 {
        self.session.lines
    }

    pub fn session(&self) -> Session {
        self.session
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn next_piece(&self) -> Option<PieceKind> {
        self.next
    }

    pub fn active(&self) -> Option<Tetromino> {
        self.active
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn seed(&self) -> u32 {
        self.rng.seed()
    }

    /// Current gravity interval of the drop clock
    pub fn drop_interval_ms(&self) -> u32 {
        self.clock.interval_ms()
    }

    pub fn clock(&self) -> &DropClock {
        &self.clock
    }

    /// Drain pending events in emission order. Keeps the buffer's capacity,
    /// so steady-state play does not allocate.
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, GameEvent> {
        self.events.drain(..)
    }

    /// Take all events emitted since the last call.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        self.drain_events().collect()
    }

    #[cfg(test)]
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.board.write_grid(&mut out.board);
        out.active = self.active.map(ActiveSnapshot::from);
        out.ghost_y = self.ghost_y();
        out.next = self.next;
        out.score = self.session.score;
        out.level = self.session.level;
        out.lines = self.session.lines;
        out.paused = self.session.paused;
        out.game_over = self.session.game_over;
        out.drop_interval_ms = self.clock.interval_ms();
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    /// Spawn the pre-generated next piece and draw a new one
    ///
    /// Ends the game (without a falling phase) if the spawn position is taken.
    pub fn spawn_piece(&mut self) -> bool {
        if self.session.game_over {
            return false;
        }
        self.phase = Phase::Spawning;

        let kind = self.next.take().unwrap_or_else(|| random_kind(&mut self.rng));
        self.next = Some(random_kind(&mut self.rng));

        let piece = Tetromino::new(kind);
        if !piece.is_valid(&self.board) {
            self.active = None;
            self.end_game(GameOverReason::SpawnBlocked);
            return false;
        }

        self.active = Some(piece);
        self.phase = Phase::Falling;
        true
    }

    /// Whether player moves and gravity currently apply
    fn in_play(&self) -> bool {
        self.started && !self.session.paused && !self.session.game_over && self.active.is_some()
    }

    /// Try to shift the active piece horizontally
    pub(crate) fn try_move(&mut self, dx: i8) -> bool {
        if !self.in_play() {
            return false;
        }
        let Some(active) = self.active else {
            return false;
        };

        if !self
            .board
            .is_valid_position(active.kind, active.rotation, active.x + dx, active.y)
        {
            return false;
        }

        self.active = Some(Tetromino {
            x: active.x + dx,
            ..active
        });
        true
    }

    /// Rotate the active piece clockwise, resolving kicks in fixed order
    pub(crate) fn try_rotate(&mut self) -> bool {
        if !self.in_play() {
            return false;
        }
        let Some(active) = self.active else {
            return false;
        };

        let board = &self.board;
        let result = try_rotate(active.rotation, active.x, active.y, |rotation, x, y| {
            board.is_valid_position(active.kind, rotation, x, y)
        });

        let Some((rotation, (dx, dy))) = result else {
            return false;
        };

        self.active = Some(Tetromino {
            rotation,
            x: active.x + dx,
            y: active.y + dy,
            ..active
        });
        true
    }

    /// Advance the active piece one row, locking it when it cannot move.
    ///
    /// Returns true if the piece moved down.
    fn drop_one_row(&mut self) -> bool {
        let Some(active) = self.active else {
            return false;
        };

        if self
            .board
            .is_valid_position(active.kind, active.rotation, active.x, active.y + 1)
        {
            self.active = Some(Tetromino {
                y: active.y + 1,
                ..active
            });
            return true;
        }

        self.lock_piece();
        false
    }

    /// Player soft drop: one row down or lock
    pub(crate) fn soft_drop(&mut self) -> bool {
        if !self.in_play() {
            return false;
        }
        self.drop_one_row();
        true
    }

    /// Hard drop the active piece to its resting row and lock it
    ///
    /// Returns the number of rows dropped, or `None` if the command was rejected.
    pub(crate) fn hard_drop(&mut self) -> Option<u32> {
        if !self.in_play() {
            return None;
        }
        let active = self.active?;

        let landing = self.ghost_y().unwrap_or(active.y);
        self.active = Some(Tetromino {
            y: landing,
            ..active
        });
        self.lock_piece();

        Some((landing - active.y) as u32)
    }

    /// Drop clock trigger: same advance-or-lock as a soft drop
    ///
    /// Ignored while paused or after game over.
    pub fn tick(&mut self) -> bool {
        if !self.in_play() {
            return false;
        }
        self.drop_one_row();
        true
    }

    /// Feed elapsed time into the drop clock and run every tick that is due.
    ///
    /// For hosts without their own timer. Returns the number of ticks run.
    pub fn advance(&mut self, elapsed_ms: u32) -> u32 {
        if !self.in_play() {
            return 0;
        }
        let due = self.clock.advance(elapsed_ms);
        let mut ran = 0;
        for _ in 0..due {
            if !self.tick() {
                break;
            }
            ran += 1;
        }
        ran
    }

    /// Pause or resume. Ignored once the game is over.
    pub fn toggle_pause(&mut self) -> bool {
        if !self.started || self.session.game_over {
            return false;
        }
        self.session.paused = !self.session.paused;
        true
    }

    /// Throw away the board and session and start a fresh game.
    ///
    /// The RNG keeps running, so the new game gets a new piece sequence.
    pub fn restart(&mut self) {
        self.board.clear();
        self.active = None;
        self.next = None;
        self.session = Session::new();
        self.clock = DropClock::new();
        self.game_over_reason = None;
        self.phase = Phase::Spawning;
        self.started = false;
        self.events.push(GameEvent::Restarted);
        self.start();
    }

    /// Lock the active piece onto the board and resolve line clears
    pub fn lock_piece(&mut self) {
        let Some(active) = self.active.take() else {
            return;
        };

        self.phase = Phase::Locking;
        let outcome = self
            .board
            .lock_piece(active.kind, active.rotation, active.x, active.y);
        if outcome == LockOutcome::TopOut {
            self.end_game(GameOverReason::TopOut);
            return;
        }

        self.phase = Phase::LineClear;
        let cleared = self.board.clear_full_lines();
        if !cleared.is_empty() {
            self.score_line_clear(&cleared);
        }

        self.spawn_piece();
    }

    fn score_line_clear(&mut self, cleared: &ClearedRows) {
        let count = cleared.len();
        let level = self.session.level;
        let delta = calculate_line_score(count, level);

        self.session.score = self.session.score.saturating_add(delta);
        self.session.lines = self.session.lines.saturating_add(count as u32);

        let lines = cleared
            .iter()
            .enumerate()
            .map(|(i, row)| ClearedLine {
                row: row.row,
                colors: row.cells.map(color),
                popup_points: line_clear_points(i + 1),
            })
            .collect();
        self.events.push(GameEvent::LineClear(LineClearEvent {
            lines,
            score_delta: delta,
            level,
            total_lines: self.session.lines,
        }));

        let new_level = calculate_level(self.session.lines);
        if new_level > level {
            self.session.level = new_level;
            let interval = get_drop_interval_ms(new_level);
            self.clock.set_interval_ms(interval);
            self.events.push(GameEvent::LevelUp {
                level: new_level,
                drop_interval_ms: self.clock.interval_ms(),
            });
        }
    }

    fn end_game(&mut self, reason: GameOverReason) {
        self.session.game_over = true;
        self.session.paused = false;
        self.game_over_reason = Some(reason);
        self.phase = Phase::GameOver;
        self.clock.stop();
        self.events.push(GameEvent::GameOver {
            reason,
            score: self.session.score,
            level: self.session.level,
            lines: self.session.lines,
        });
    }

    /// Row the active piece would land on (ghost piece); never mutates state
    pub fn ghost_y(&self) -> Option<i8> {
        let active = self.active?;
        let mut y = active.y;
        while self
            .board
            .is_valid_position(active.kind, active.rotation, active.x, y + 1)
        {
            y += 1;
        }
        Some(y)
    }

    /// Apply a player command
    ///
    /// Returns false when the command was rejected (blocked move, paused,
    /// game over). Rejections leave the state untouched.
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        match action {
            GameAction::MoveLeft => self.try_move(-1),
            GameAction::MoveRight => self.try_move(1),
            GameAction::SoftDrop => self.soft_drop(),
            GameAction::HardDrop => self.hard_drop().is_some(),
            GameAction::Rotate => self.try_rotate(),
            GameAction::TogglePause => self.toggle_pause(),
            GameAction::Restart => {
                self.restart();
                true
            }
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started(seed: u32) -> GameState {
        let mut state = GameState::new(seed);
        state.start();
        state.take_events();
        state
    }

    /// Replace the active piece with a specific one.
    fn place(state: &mut GameState, kind: PieceKind, rotation: Rotation, x: i8, y: i8) {
        state.active = Some(Tetromino {
            kind,
            rotation,
            x,
            y,
        });
    }

    /// Fill rows `from..=19` except column 0.
    fn fill_rows_with_gap(state: &mut GameState, from: i8) {
        for y in from..BOARD_HEIGHT as i8 {
            for x in 1..BOARD_WIDTH as i8 {
                state.board_mut().set(x, y, Some(PieceKind::O));
            }
        }
    }

    /// Drop a vertical I into column 0.
    fn drop_i_into_gap(state: &mut GameState) {
        place(state, PieceKind::I, Rotation::East, -2, 0);
        assert!(state.apply_action(GameAction::HardDrop));
    }

    #[test]
    fn test_new_game_state() {
        let state = GameState::new(12345);

        assert!(!state.started);
        assert_eq!(state.session, Session::new());
        assert_eq!(state.session.level, 1);
        assert_eq!(state.phase, Phase::Spawning);
        assert!(state.active.is_none());
        assert!(state.next.is_none());
        assert_eq!(state.drop_interval_ms(), 600);
    }

    #[test]
    fn test_commands_before_start_are_rejected() {
        let mut state = GameState::new(1);
        assert!(!state.apply_action(GameAction::MoveLeft));
        assert!(!state.apply_action(GameAction::HardDrop));
        assert!(!state.apply_action(GameAction::TogglePause));
        assert!(!state.tick());
    }

    #[test]
    fn test_start_spawns_and_pregenerates_next() {
        let state = started(12345);
        assert!(state.active.is_some());
        assert!(state.next.is_some());
        assert_eq!(state.phase, Phase::Falling);
    }

    #[test]
    fn test_spawn_position_per_kind() {
        for kind in PieceKind::ALL {
            let piece = Tetromino::new(kind);
            assert_eq!(piece.x, 3);
            assert_eq!(piece.rotation, Rotation::North);
            // The first occupied row is row 0.
            let top = piece.cells().iter().map(|&(_, y)| y).min().unwrap();
            assert_eq!(top, 0, "{kind:?}");
        }
        assert_eq!(Tetromino::new(PieceKind::I).y, -1);
        assert_eq!(Tetromino::new(PieceKind::T).y, 0);
    }

    #[test]
    fn test_spawn_uses_pregenerated_next() {
        let mut state = started(777);
        for _ in 0..5 {
            let expected = state.next.unwrap();
            state.board_mut().clear();
            assert!(state.hard_drop().is_some());
            assert_eq!(state.active.unwrap().kind, expected);
        }
    }

    #[test]
    fn test_spawn_without_next_draws_fresh() {
        let mut state = GameState::new(3);
        state.started = true;
        assert!(state.spawn_piece());
        assert!(state.active.is_some());
        assert!(state.next.is_some());
    }

    #[test]
    fn test_try_move() {
        let mut state = started(12345);
        place(&mut state, PieceKind::T, Rotation::North, 3, 5);

        assert!(state.try_move(1));
        assert_eq!(state.active.unwrap().x, 4);
        assert!(state.try_move(-1));
        assert_eq!(state.active.unwrap().x, 3);
    }

    #[test]
    fn test_try_move_stops_at_walls() {
        let mut state = started(12345);
        place(&mut state, PieceKind::O, Rotation::North, 3, 5);

        let mut moved = 0;
        while state.try_move(-1) {
            moved += 1;
        }
        // O occupies box columns 1..=2, so the anchor stops at -1.
        assert_eq!(moved, 4);
        assert_eq!(state.active.unwrap().x, -1);

        while state.try_move(1) {}
        assert_eq!(state.active.unwrap().x, 7);
    }

    #[test]
    fn test_try_move_blocked_by_cells() {
        let mut state = started(12345);
        place(&mut state, PieceKind::O, Rotation::North, 3, 18);
        state.board_mut().set(6, 19, Some(PieceKind::Z));
        let before = state.active;
        assert!(!state.apply_action(GameAction::MoveRight));
        assert_eq!(state.active, before);
    }

    #[test]
    fn test_rotate_in_open_field_keeps_position() {
        let mut state = started(1);
        place(&mut state, PieceKind::I, Rotation::East, 2, 5);
        assert!(state.apply_action(GameAction::Rotate));
        let active = state.active.unwrap();
        assert_eq!((active.rotation, active.x, active.y), (Rotation::South, 2, 5));
    }

    #[test]
    fn test_rotate_kick_order() {
        // I East at x=2 (column 4, rows 5..=8) rotating to South lands on row 7.
        let cases: [(&[(i8, i8)], Option<(i8, i8)>); 6] = [
            (&[], Some((2, 5))),
            (&[(5, 7)], Some((1, 5))),
            (&[(2, 7)], Some((3, 5))),
            (&[(3, 7)], Some((4, 5))),
            (&[(3, 7), (6, 7)], Some((2, 4))),
            (&[(3, 7), (6, 7), (3, 6)], None),
        ];

        for (blocks, expected) in cases {
            let mut state = started(1);
            for &(x, y) in blocks {
                state.board_mut().set(x, y, Some(PieceKind::Z));
            }
            place(&mut state, PieceKind::I, Rotation::East, 2, 5);

            let rotated = state.apply_action(GameAction::Rotate);
            let active = state.active.unwrap();
            match expected {
                Some((x, y)) => {
                    assert!(rotated, "blocks {blocks:?}");
                    assert_eq!((active.rotation, active.x, active.y), (Rotation::South, x, y));
                }
                None => {
                    assert!(!rotated, "blocks {blocks:?}");
                    assert_eq!((active.rotation, active.x, active.y), (Rotation::East, 2, 5));
                }
            }
        }
    }

    #[test]
    fn test_rotate_kick_minus_two() {
        // I West at x=3 (column 4, rows 5..=8) rotating to North lands on row 6.
        let mut state = started(1);
        state.board_mut().set(5, 6, Some(PieceKind::Z));
        place(&mut state, PieceKind::I, Rotation::West, 3, 5);

        assert!(state.apply_action(GameAction::Rotate));
        let active = state.active.unwrap();
        assert_eq!((active.rotation, active.x, active.y), (Rotation::North, 1, 5));
    }

    #[test]
    fn test_rotate_off_wall() {
        let mut state = started(1);
        // Vertical I hugging the right wall (column 9).
        place(&mut state, PieceKind::I, Rotation::East, 7, 5);
        assert!(state.apply_action(GameAction::Rotate));
        let active = state.active.unwrap();
        assert_eq!((active.rotation, active.x), (Rotation::South, 6));
    }

    #[test]
    fn test_o_rotation_cycles_in_place() {
        let mut state = started(1);
        place(&mut state, PieceKind::O, Rotation::North, 3, 5);
        for expected in [Rotation::East, Rotation::South, Rotation::West, Rotation::North] {
            assert!(state.apply_action(GameAction::Rotate));
            assert_eq!(state.active.unwrap().rotation, expected);
            assert_eq!(state.active.unwrap().x, 3);
        }
    }

    #[test]
    fn test_soft_drop_moves_then_locks() {
        let mut state = started(1);
        place(&mut state, PieceKind::O, Rotation::North, 3, 17);
        let next = state.next.unwrap();

        assert!(state.apply_action(GameAction::SoftDrop));
        assert_eq!(state.active.unwrap().y, 18);
        assert_eq!(state.board.filled_count(), 0);

        assert!(state.apply_action(GameAction::SoftDrop));
        assert_eq!(state.board.filled_count(), 4);
        assert!(state.board.is_occupied(4, 19));
        assert_eq!(state.active.unwrap().kind, next);
    }

    #[test]
    fn test_hard_drop_lands_on_ghost_row() {
        let mut state = started(1);
        place(&mut state, PieceKind::T, Rotation::North, 3, 0);
        assert_eq!(state.ghost_y(), Some(18));

        assert_eq!(state.hard_drop(), Some(18));
        assert!(state.board.is_occupied(4, 18));
        assert!(state.board.is_occupied(3, 19));
        assert!(state.board.is_occupied(5, 19));
        assert!(state.active.is_some());
        assert_eq!(state.score(), 0);
    }

    #[test]
    fn test_ghost_is_read_only() {
        let mut state = started(1);
        place(&mut state, PieceKind::L, Rotation::North, 3, 2);
        state.board_mut().set(4, 10, Some(PieceKind::S));
        let before = state.active;
        assert_eq!(state.ghost_y(), Some(8));
        assert_eq!(state.active, before);
    }

    #[test]
    fn test_line_clear_scores_at_level_one() {
        for (rows, points) in [(1, 40), (2, 100), (3, 300), (4, 1200)] {
            let mut state = started(5);
            fill_rows_with_gap(&mut state, BOARD_HEIGHT as i8 - rows);
            drop_i_into_gap(&mut state);

            assert_eq!(state.score(), points, "{rows} rows");
            assert_eq!(state.lines(), rows as u32);
            assert_eq!(state.level(), 1);
        }
    }

    #[test]
    fn test_line_clear_scores_scale_with_level() {
        for (rows, points) in [(1, 120), (2, 300), (3, 900), (4, 3600)] {
            let mut state = started(5);
            state.session.level = 3;
            state.session.lines = 20;
            fill_rows_with_gap(&mut state, BOARD_HEIGHT as i8 - rows);
            drop_i_into_gap(&mut state);

            assert_eq!(state.score(), points, "{rows} rows");
        }
    }

    #[test]
    fn test_line_clear_event_contents() {
        let mut state = started(5);
        fill_rows_with_gap(&mut state, 18);
        drop_i_into_gap(&mut state);

        let events = state.take_events();
        let GameEvent::LineClear(event) = &events[0] else {
            panic!("expected line clear, got {events:?}");
        };
        assert_eq!(event.score_delta, 100);
        assert_eq!(event.level, 1);
        assert_eq!(event.total_lines, 2);
        let rows: Vec<usize> = event.lines.iter().map(|l| l.row).collect();
        assert_eq!(rows, vec![19, 18]);
        let popups: Vec<u32> = event.lines.iter().map(|l| l.popup_points).collect();
        assert_eq!(popups, vec![40, 100]);
        assert_eq!(event.lines[0].colors[0], color(PieceKind::I));
        assert_eq!(event.lines[0].colors[1], color(PieceKind::O));
    }

    #[test]
    fn test_no_clear_no_score_event() {
        let mut state = started(5);
        place(&mut state, PieceKind::O, Rotation::North, 3, 0);
        state.apply_action(GameAction::HardDrop);
        assert!(state
            .take_events()
            .iter()
            .all(|e| !matches!(e, GameEvent::LineClear(_))));
        assert_eq!(state.score(), 0);
    }

    #[test]
    fn test_level_up_boundaries() {
        let mut state = started(5);
        state.session.lines = 8;
        fill_rows_with_gap(&mut state, 18);
        drop_i_into_gap(&mut state);

        assert_eq!(state.lines(), 10);
        assert_eq!(state.level(), 2);
        assert_eq!(state.drop_interval_ms(), 560);
        assert!(state.take_events().contains(&GameEvent::LevelUp {
            level: 2,
            drop_interval_ms: 560
        }));

        state.board_mut().clear();
        state.session.lines = 18;
        fill_rows_with_gap(&mut state, 18);
        drop_i_into_gap(&mut state);

        assert_eq!(state.lines(), 20);
        assert_eq!(state.level(), 3);
        assert_eq!(state.drop_interval_ms(), 520);
    }

    #[test]
    fn test_level_up_uses_old_level_for_score() {
        let mut state = started(5);
        state.session.lines = 9;
        fill_rows_with_gap(&mut state, 19);
        drop_i_into_gap(&mut state);
        assert_eq!(state.score(), 40);
        assert_eq!(state.level(), 2);
    }

    #[test]
    fn test_drop_interval_floor() {
        let mut state = started(5);
        state.session.level = 30;
        state.session.lines = 299;
        fill_rows_with_gap(&mut state, 19);
        drop_i_into_gap(&mut state);
        assert_eq!(state.level(), 31);
        assert_eq!(state.drop_interval_ms(), 80);
    }

    #[test]
    fn test_top_out_ends_game() {
        let mut state = started(5);
        place(&mut state, PieceKind::T, Rotation::North, 3, -1);
        state.board_mut().set(3, 1, Some(PieceKind::Z));
        let next = state.next;

        assert!(state.apply_action(GameAction::SoftDrop));
        assert!(state.game_over());
        assert_eq!(state.game_over_reason(), Some(GameOverReason::TopOut));
        assert_eq!(state.phase(), Phase::GameOver);
        assert!(state.active.is_none());
        assert_eq!(state.next, next);
        assert!(!state.clock().is_running());

        let events = state.take_events();
        assert!(matches!(
            events.last(),
            Some(GameEvent::GameOver {
                reason: GameOverReason::TopOut,
                ..
            })
        ));
    }

    #[test]
    fn test_game_over_freezes_session() {
        let mut state = started(5);
        place(&mut state, PieceKind::T, Rotation::North, 3, -1);
        state.board_mut().set(3, 1, Some(PieceKind::Z));
        state.apply_action(GameAction::HardDrop);
        assert!(state.game_over());

        let session = state.session();
        let board = state.board.clone();
        for action in [
            GameAction::MoveLeft,
            GameAction::MoveRight,
            GameAction::SoftDrop,
            GameAction::HardDrop,
            GameAction::Rotate,
            GameAction::TogglePause,
        ] {
            assert!(!state.apply_action(action));
        }
        assert!(!state.tick());
        assert_eq!(state.advance(10_000), 0);
        assert!(!state.spawn_piece());
        assert_eq!(state.session(), session);
        assert_eq!(state.board, board);
    }

    #[test]
    fn test_spawn_blocked_ends_game() {
        let mut state = started(5);
        for x in 3..=6 {
            state.board_mut().set(x, 0, Some(PieceKind::J));
        }
        assert!(!state.spawn_piece());
        assert!(state.game_over());
        assert_eq!(state.game_over_reason(), Some(GameOverReason::SpawnBlocked));
        assert!(state.active.is_none());
    }

    #[test]
    fn test_pause_blocks_play_and_toggles_back() {
        let mut state = started(5);
        place(&mut state, PieceKind::T, Rotation::North, 3, 5);
        let board = state.board.clone();
        let session = state.session();

        assert!(state.apply_action(GameAction::TogglePause));
        assert!(state.paused());
        assert!(!state.apply_action(GameAction::MoveLeft));
        assert!(!state.apply_action(GameAction::Rotate));
        assert!(!state.apply_action(GameAction::HardDrop));
        assert!(!state.tick());
        assert_eq!(state.advance(5_000), 0);
        assert_eq!(state.active.unwrap().y, 5);

        assert!(state.apply_action(GameAction::TogglePause));
        assert!(!state.paused());
        assert_eq!(state.session(), session);
        assert_eq!(state.board, board);
    }

    #[test]
    fn test_tick_matches_soft_drop() {
        let mut a = started(9);
        let mut b = a.clone();
        for _ in 0..40 {
            a.tick();
            b.apply_action(GameAction::SoftDrop);
        }
        assert_eq!(a.board, b.board);
        assert_eq!(a.active, b.active);
    }

    #[test]
    fn test_advance_runs_due_ticks() {
        let mut state = started(5);
        place(&mut state, PieceKind::T, Rotation::North, 3, 0);
        assert_eq!(state.advance(599), 0);
        assert_eq!(state.active.unwrap().y, 0);
        assert_eq!(state.advance(1), 1);
        assert_eq!(state.active.unwrap().y, 1);
        assert_eq!(state.advance(1200), 2);
        assert_eq!(state.active.unwrap().y, 3);
    }

    #[test]
    fn test_restart_resets_everything() {
        let mut state = started(5);
        place(&mut state, PieceKind::T, Rotation::North, 3, -1);
        state.board_mut().set(3, 1, Some(PieceKind::Z));
        state.session.score = 4321;
        state.session.lines = 37;
        state.session.level = 4;
        state.apply_action(GameAction::HardDrop);
        assert!(state.game_over());

        assert!(state.apply_action(GameAction::Restart));
        assert_eq!(state.session(), Session::new());
        assert_eq!(state.board.filled_count(), 0);
        assert_eq!(state.drop_interval_ms(), 600);
        assert!(state.clock().is_running());
        assert_eq!(state.game_over_reason(), None);
        assert_eq!(state.phase(), Phase::Falling);
        assert!(state.active.is_some());
        assert!(state.next.is_some());
        assert!(state.take_events().contains(&GameEvent::Restarted));
    }

    #[test]
    fn test_restart_while_paused() {
        let mut state = started(5);
        state.apply_action(GameAction::TogglePause);
        assert!(state.apply_action(GameAction::Restart));
        assert!(!state.paused());
        assert!(state.apply_action(GameAction::MoveLeft) || state.apply_action(GameAction::MoveRight));
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut state = started(5);
        place(&mut state, PieceKind::O, Rotation::North, 3, 0);
        state.board_mut().set(0, 19, Some(PieceKind::L));
        let snap = state.snapshot();

        assert_eq!(snap.board[19][0], Some(PieceKind::L));
        assert_eq!(snap.active.unwrap().kind, PieceKind::O);
        assert_eq!(snap.ghost_y, Some(18));
        assert_eq!(snap.next, state.next);
        assert_eq!(snap.level, 1);
        assert_eq!(snap.drop_interval_ms, 600);
        assert!(snap.playable());
    }
}

//! Core game logic module - pure, deterministic, and testable
//!
//! This module contains all the game rules, state management, and simulation logic.
//! It has **zero dependencies** on UI, timers or I/O, making it:
//!
//! - **Deterministic**: Same seed produces identical piece sequences
//! - **Testable**: Unit tests for every game rule
//! - **Portable**: Can run in any environment (terminal, headless, async driver)
//! - **Fast**: Zero-allocation hot paths for moves, drops and line clears
//!
//! # Module Structure
//!
//! - [`board`]: 10x20 game board with collision detection and line clearing
//! - [`clock`]: Gravity interval policy for the drop timer
//! - [`events`]: Line clear / level / game over notifications for observers
//! - [`game_state`]: Complete game state including active piece, scoring, timing
//! - [`pieces`]: Tetromino shape tables, colors and rotation with wall kicks
//! - [`rng`]: Seeded uniform piece generation
//! - [`scoring`]: Classic line-clear points, levels and drop speed
//! - [`snapshot`]: Read-only copy of the game for renderers
//!
//! # Game Rules
//!
//! - **Uniform randomizer**: every spawn draws one of the seven kinds uniformly;
//!   the next piece is always known one spawn ahead
//! - **Clockwise rotation**: kicks try horizontal offsets 0, -1, +1, -2, +2 and
//!   then one row up
//! - **Immediate lock**: a piece locks on the first failed downward step
//! - **Ghost Piece**: Shows where the current piece will land
//! - **Scoring**: 40 / 100 / 300 / 1200 times the level; level every 10 lines
//!
//! # Example
//!
//! ```
//! use blocktris_core::GameState;
//! use blocktris_types::GameAction;
//!
//! // Create and start a game
//! let mut game = GameState::new(12345);
//! game.start();
//!
//! // Apply game actions
//! game.apply_action(GameAction::MoveRight);
//! game.apply_action(GameAction::Rotate);
//! game.apply_action(GameAction::HardDrop);
//!
//! // A single hard drop never clears a line on an empty board
//! assert_eq!(game.score(), 0);
//! assert_eq!(game.board().filled_count(), 4);
//! ```
//!
//! # Timing
//!
//! Gravity starts at 600ms per row and speeds up by 40ms per level down to
//! 80ms. Hosts either run their own timer at
//! [`GameState::drop_interval_ms`](game_state::GameState::drop_interval_ms)
//! and call [`GameState::tick`](game_state::GameState::tick), or feed frame
//! time into [`GameState::advance`](game_state::GameState::advance).

pub mod board;
pub mod clock;
pub mod events;
pub mod game_state;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod snapshot;

pub use blocktris_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, ClearedRow, LockOutcome};
pub use clock::DropClock;
pub use events::{ClearedLine, GameEvent, GameOverReason, LineClearEvent};
pub use game_state::{GameState, Phase, Session, Tetromino};
pub use pieces::{blocks, color, get_shape, try_rotate};
pub use rng::SimpleRng;
pub use scoring::{calculate_level, calculate_line_score, get_drop_interval_ms, line_clear_points};
pub use snapshot::{ActiveSnapshot, GameSnapshot};

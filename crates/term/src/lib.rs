//! Terminal "game renderer" module.
//!
//! A small, game-oriented rendering layer for terminal gameplay. It avoids
//! widget toolkits and renders into a simple framebuffer that is diffed and
//! flushed to the terminal.
//!
//! Goals:
//! - Keep `core` deterministic and testable
//! - Allow precise control over aspect ratio (2 chars wide per cell)
//! - Keep line-clear effects out of the game state entirely

pub mod effects;
pub mod fb;
pub mod game_view;
pub mod renderer;

pub use blocktris_core as core;
pub use blocktris_types as types;

pub use effects::{EffectsLayer, RowFlash, ScorePopup};
pub use fb::{CellStyle, FrameBuffer, Glyph};
pub use game_view::{GameView, PanelInfo, ScoreRow, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};

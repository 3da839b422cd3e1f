//! Terminal input module.
//!
//! Maps `crossterm` key events into [`crate::types::GameAction`]. Terminals do
//! not report key releases reliably, so held keys arrive as auto-repeat
//! presses and each one becomes a separate command.

pub mod map;

pub use blocktris_types as types;

pub use map::{handle_key_event, is_press, should_quit};

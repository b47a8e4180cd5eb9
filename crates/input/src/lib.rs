//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key events onto [`crate::types::GameAction`] through a
//! rebindable [`Keymap`]. Each key press yields at most one action; key repeat
//! is left to the terminal.

pub mod map;

pub use tetris_ladder_types as types;

pub use map::{should_quit, Keymap};

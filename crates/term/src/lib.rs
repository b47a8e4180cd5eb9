//! Terminal rendering for the game.
//!
//! Renders into a plain framebuffer first and flushes it to the terminal in a
//! separate step, so the view stays pure and testable and the terminal only
//! receives the cells that changed.

pub mod fb;
pub mod game_view;
pub mod renderer;

pub use tetris_ladder_core as core;
pub use tetris_ladder_types as types;

pub use fb::{Cell, CellStyle, FrameBuffer, Rgb};
pub use game_view::{AnchorY, GameView, Viewport};
pub use renderer::{encode_diff_into, encode_full_into, TerminalRenderer};

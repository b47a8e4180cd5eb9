//! Tetris Ladder (workspace facade crate).
//!
//! Re-exports the member crates under `tetris_ladder::{types, core, engine,
//! input, term, leaderboard}` and hosts the logger shared by the binaries.

pub mod logging;

pub use tetris_ladder_core as core;
pub use tetris_ladder_engine as engine;
pub use tetris_ladder_input as input;
pub use tetris_ladder_leaderboard as leaderboard;
pub use tetris_ladder_term as term;
pub use tetris_ladder_types as types;

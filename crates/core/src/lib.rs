//! Core game logic module - pure, deterministic, and testable
//!
//! This module contains all the game rules, state management, and simulation logic.
//! It has **zero dependencies** on UI, networking, or I/O, making it:
//!
//! - **Deterministic**: Same seed produces identical piece sequences
//! - **Testable**: Unit tests for every rule, scenario tests in `tests/`
//! - **Portable**: Can run in any environment (terminal, web, headless)
//!
//! # Module Structure
//!
//! - [`board`]: flat cell grid with collision checks, placement and line clearing
//! - [`pieces`]: tetromino shape matrices and clockwise rotation
//! - [`rng`]: seeded RNG plus 7-bag / uniform piece generation
//! - [`transform`]: move, rotate, ghost projection and hard drop
//! - [`scoring`]: line-clear scoring, level progression and drop speed
//! - [`timer`]: scheduled descent ticks
//! - [`game_state`]: the state machine tying everything together
//! - [`snapshot`]: read-only view for presentation
//!
//! # Game Rules
//!
//! - **7-Bag Randomizer** by default, uniform random on request
//! - **Rotation**: plain 90° clockwise matrix rotation, no wall kicks
//! - **Ghost Piece**: shows where the current piece would land
//! - **Scoring**: `cleared * 100 * level`, plus 10 per gravity lock or 2 per
//!   hard-dropped row
//! - **Levels**: one per 10 lines, starting at 1
//!
//! # Example
//!
//! ```
//! use tetris_ladder_core::GameState;
//! use tetris_ladder_types::GameAction;
//!
//! let mut game = GameState::new(12345);
//! game.start();
//!
//! game.apply_action(GameAction::MoveRight);
//! game.apply_action(GameAction::Rotate);
//! game.apply_action(GameAction::HardDrop);
//!
//! // A hard drop from the spawn row always falls at least one row.
//! assert!(game.points() > 0);
//! ```
//!
//! # Timing
//!
//! The state machine owns its descent timer. Call
//! [`GameState::tick`](game_state::GameState::tick) with the elapsed
//! milliseconds; every full drop interval moves the piece down one row.

pub mod board;
pub mod game_state;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod snapshot;
pub mod timer;
pub mod transform;

pub use tetris_ladder_types as types;

// Re-export commonly used types for convenience
pub use board::Board;
pub use game_state::{GameConfig, GameState};
pub use pieces::{Piece, Shape};
pub use rng::{PieceGenerator, SimpleRng};
pub use scoring::{calculate_level, drop_interval_ms, ScoreResult, ScoreState};
pub use snapshot::{ActiveSnapshot, GameSnapshot};
pub use timer::DropTimer;
pub use transform::{ghost, hard_drop, rotate, try_move, MoveResult};

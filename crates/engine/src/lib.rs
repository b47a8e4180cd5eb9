//! Game loop controller.
//!
//! Wraps the pure [`tetris_ladder_core::GameState`] in a serialized event loop
//! and connects it to the outside world through two seams: [`ScoreSink`] for
//! the final score and [`EventListener`] for presentation-side reactions.

pub mod config;
pub mod game_loop;

pub use config::{env_flag, EngineConfig, PlayerIdentity};
pub use game_loop::{
    EventListener, EventLogger, GameLoop, LoopEvent, ScoreSink, ScoreSubmission,
};

//! Leaderboard service and client.
//!
//! The score store collaborator of the game: a line-delimited JSON protocol
//! over TCP with two requests.
//!
//! - `submit`: persist a final score for a user. Requests without a user id
//!   are `unauthorized`; points that are not a non-negative integer are an
//!   `invalid_score`.
//! - `top`: the 10 best scores, highest first, with emails masked as
//!   `abc***@domain`. [`format_ranking`] renders them as a text table.
//!
//! The game talks to it through [`ScoreReporter`], which implements the
//! engine's [`engine::ScoreSink`] and never blocks the game loop.

pub mod client;
pub mod protocol;
pub mod ranking;
pub mod runtime;
pub mod server;
pub mod store;

pub use tetris_ladder_engine as engine;
pub use tetris_ladder_types as types;

pub use client::LeaderboardClient;
pub use protocol::{
    create_error, ErrorCode, PublicUser, Request, Response, ScoreEntry, ScoreRecord, UserInfo,
};
pub use ranking::{format_date, format_ranking};
pub use runtime::ScoreReporter;
pub use server::{handle_line, run_server, ServerConfig};
pub use store::{mask_email, MemoryStore, StoreError};

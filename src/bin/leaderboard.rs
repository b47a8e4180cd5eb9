//! Leaderboard service binary.
//!
//! `leaderboard serve` (the default) keeps the in-memory score store on
//! `TETRIS_LEADERBOARD_HOST:PORT` (default `127.0.0.1:7878`) until
//! interrupted. `leaderboard top` prints the ranking from a running service.

use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use log::info;

use tetris_ladder::leaderboard::{
    format_ranking, run_server, LeaderboardClient, MemoryStore, ServerConfig,
};
use tetris_ladder::logging;
use tetris_ladder::types::LEADERBOARD_TOP_N;

/// Score service for tetris-ladder.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the score service.
    Serve,
    /// Print the best scores of a running service.
    Top {
        /// Number of rows (at most 10).
        #[arg(short, long, default_value_t = LEADERBOARD_TOP_N)]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let config = ServerConfig::from_env();

    match args.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config).await,
        Command::Top { limit } => print_top(config, limit).await,
    }
}

async fn serve(config: ServerConfig) -> Result<()> {
    logging::init_service()?;
    let store = Arc::new(MemoryStore::new());

    tokio::select! {
        result = run_server(config, Arc::clone(&store), None) => result,
        _ = tokio::signal::ctrl_c() => {
            info!("shutting down with {} scores stored", store.len().await);
            Ok(())
        }
    }
}

async fn print_top(config: ServerConfig, limit: usize) -> Result<()> {
    let mut client = LeaderboardClient::connect(config.address()).await?;
    let entries = client.top(limit).await?;
    for line in format_ranking(&entries) {
        println!("{}", line);
    }
    Ok(())
}

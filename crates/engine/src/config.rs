//! Engine configuration from environment variables
//!
//! Every variable has a default; malformed values fall back to it instead of
//! failing startup.

use std::env;
use std::time::{SystemTime, UNIX_EPOCH};

use tetris_ladder_core::GameConfig;
use tetris_ladder_types::GeneratorKind;

/// Who a submitted score is attributed to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerIdentity {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
}

impl PlayerIdentity {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            email: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub seed: u32,
    pub generator: GeneratorKind,
    /// `None` disables score submission.
    pub identity: Option<PlayerIdentity>,
    pub submit_scores: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            generator: GeneratorKind::Bag,
            identity: None,
            submit_scores: true,
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .and_then(|s| if s.is_empty() { None } else { Some(s) })
}

/// `1`, `true`, `yes` and `on` (any case) are truthy
pub fn env_flag(key: &str) -> bool {
    non_empty_var(key)
        .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(false)
}

fn time_seed() -> u32 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u32 ^ d.as_secs() as u32)
        .unwrap_or(1)
}

impl EngineConfig {
    /// Read `TETRIS_SEED`, `TETRIS_GENERATOR`, `TETRIS_USER_*` and
    /// `TETRIS_LEADERBOARD_DISABLED`.
    pub fn from_env() -> Self {
        let seed = non_empty_var("TETRIS_SEED")
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(time_seed);

        let generator = non_empty_var("TETRIS_GENERATOR")
            .and_then(|s| GeneratorKind::from_str(&s))
            .unwrap_or_default();

        let identity = non_empty_var("TETRIS_USER_ID").map(|id| PlayerIdentity {
            id,
            name: non_empty_var("TETRIS_USER_NAME"),
            email: non_empty_var("TETRIS_USER_EMAIL"),
        });

        Self {
            seed,
            generator,
            identity,
            submit_scores: !env_flag("TETRIS_LEADERBOARD_DISABLED"),
        }
    }

    /// Game parameters on the canonical board
    pub fn game_config(&self) -> GameConfig {
        GameConfig {
            seed: self.seed,
            generator: self.generator,
            ..GameConfig::default()
        }
    }

    /// Identity to submit under, if submission is enabled
    pub fn submitter(&self) -> Option<&PlayerIdentity> {
        if self.submit_scores {
            self.identity.as_ref()
        } else {
            None
        }
    }
}

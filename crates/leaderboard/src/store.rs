//! In-memory score store
//!
//! Validates submissions at the boundary (identity present, points a
//! non-negative integer) and answers top-N queries with masked emails.

use std::collections::HashMap;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde_json::Value;
use tokio::sync::RwLock;

use crate::protocol::{PublicUser, ScoreEntry, ScoreRecord, UserInfo};
use crate::types::LEADERBOARD_TOP_N;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The caller has no identity.
    Unauthorized,
    /// The submitted points were rejected.
    InvalidScore(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Unauthorized => write!(f, "Unauthorized"),
            StoreError::InvalidScore(reason) => write!(f, "Invalid score: {}", reason),
        }
    }
}

impl std::error::Error for StoreError {}

/// Check raw JSON points: an integer in `0..=u32::MAX`.
pub fn validate_points(points: &Value) -> Result<u32, StoreError> {
    let Value::Number(n) = points else {
        return Err(StoreError::InvalidScore("points must be a number".into()));
    };
    if let Some(v) = n.as_u64() {
        return u32::try_from(v).map_err(|_| StoreError::InvalidScore("points out of range".into()));
    }
    match n.as_f64() {
        Some(v) if v < 0.0 => Err(StoreError::InvalidScore("points must not be negative".into())),
        _ => Err(StoreError::InvalidScore("points must be an integer".into())),
    }
}

/// `abc***@domain` from the first 3 characters of the local part.
///
/// `None` when there is no `@`.
pub fn mask_email(email: &str) -> Option<String> {
    let (local, domain) = email.split_once('@')?;
    let prefix: String = local.chars().take(3).collect();
    Some(format!("{}***@{}", prefix, domain))
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[derive(Debug, Default)]
struct Inner {
    next_id: u64,
    /// Latest profile seen per user id
    users: HashMap<String, UserInfo>,
    scores: Vec<ScoreRecord>,
}

/// Score store shared by all connections.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Persist a score for `user`.
    pub async fn submit(&self, user: &UserInfo, points: &Value) -> Result<ScoreRecord, StoreError> {
        if user.id.trim().is_empty() {
            return Err(StoreError::Unauthorized);
        }
        let points = validate_points(points)?;
        Ok(self.insert(user, points, now_ms()).await)
    }

    /// Store a validated score with an explicit timestamp.
    pub async fn insert(&self, user: &UserInfo, points: u32, created_at: u64) -> ScoreRecord {
        let mut inner = self.inner.write().await;
        inner.next_id += 1;
        let record = ScoreRecord {
            id: inner.next_id,
            points,
            user_id: user.id.clone(),
            created_at,
        };
        inner.users.insert(user.id.clone(), user.clone());
        inner.scores.push(record.clone());
        record
    }

    /// Best scores first: points descending, then oldest, then lowest id.
    /// `limit` is capped at 10.
    pub async fn top(&self, limit: usize) -> Vec<ScoreEntry> {
        let inner = self.inner.read().await;
        let mut ranked: Vec<&ScoreRecord> = inner.scores.iter().collect();
        ranked.sort_by(|a, b| {
            b.points
                .cmp(&a.points)
                .then(a.created_at.cmp(&b.created_at))
                .then(a.id.cmp(&b.id))
        });
        ranked
            .into_iter()
            .take(limit.min(LEADERBOARD_TOP_N))
            .map(|record| {
                let user = inner.users.get(&record.user_id);
                ScoreEntry {
                    id: record.id,
                    points: record.points,
                    created_at: record.created_at,
                    user: PublicUser {
                        name: user.and_then(|u| u.name.clone()),
                        email: user
                            .and_then(|u| u.email.as_deref())
                            .and_then(mask_email),
                    },
                }
            })
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.scores.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

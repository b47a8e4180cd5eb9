//! Plain-text ranking table for the top scores.

use std::fmt::Display;

use chrono::{DateTime, Utc};

use crate::protocol::ScoreEntry;

/// `YYYY-MM-DD HH:MM` in UTC, `-` when out of range
pub fn format_date(created_at_ms: u64) -> String {
    i64::try_from(created_at_ms)
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn row(rank: impl Display, points: impl Display, name: &str, email: &str, date: &str) -> String {
    format!("{:>4}  {:>8}  {:<16}  {:<24}  {}", rank, points, name, email, date)
}

/// Header line followed by one line per entry, best first.
pub fn format_ranking(entries: &[ScoreEntry]) -> Vec<String> {
    if entries.is_empty() {
        return vec!["No scores yet.".to_string()];
    }

    let mut lines = Vec::with_capacity(entries.len() + 1);
    lines.push(row("RANK", "POINTS", "PLAYER", "EMAIL", "DATE"));
    for (i, entry) in entries.iter().enumerate() {
        lines.push(row(
            i + 1,
            entry.points,
            entry.user.name.as_deref().unwrap_or("anonymous"),
            entry.user.email.as_deref().unwrap_or("-"),
            &format_date(entry.created_at),
        ));
    }
    lines
}

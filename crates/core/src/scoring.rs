//! Scoring module - line-clear points, level progression and drop speed
//!
//! Evaluation order for one lock:
//! 1. `lines += cleared`
//! 2. `level = lines / 10 + 1`
//! 3. `points += cleared * 100 * level` plus the lock bonus
//!
//! The lock bonus is a flat 10 for gravity and soft-drop locks, or 2 per row
//! fallen for a hard drop.

use crate::types::{
    LockKind, BASE_DROP_MS, DROP_INTERVAL_MIN_MS, DROP_STEP_MS, HARD_DROP_POINTS_PER_ROW,
    LINES_PER_LEVEL, LINE_CLEAR_POINTS, LOCK_BONUS,
};

/// Score calculation result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoreResult {
    /// Points for the cleared rows at the post-clear level.
    pub line_clear_score: u32,
    /// Lock bonus or hard-drop bonus.
    pub bonus: u32,
    pub total: u32,
    /// Level after this lock.
    pub level: u32,
}

/// Level for a cumulative line count, starting at 1
pub fn calculate_level(total_lines: u32) -> u32 {
    total_lines / LINES_PER_LEVEL + 1
}

/// Automatic descent period for a level, floored at 50ms
pub fn drop_interval_ms(level: u32) -> u32 {
    let step = level.saturating_sub(1).saturating_mul(DROP_STEP_MS);
    BASE_DROP_MS
        .saturating_sub(step)
        .max(DROP_INTERVAL_MIN_MS)
}

/// Points for `cleared` rows at `level`
pub fn calculate_line_score(cleared: u32, level: u32) -> u32 {
    cleared
        .saturating_mul(LINE_CLEAR_POINTS)
        .saturating_mul(level)
}

/// Bonus awarded for the lock itself
pub fn calculate_lock_bonus(lock: LockKind) -> u32 {
    match lock {
        LockKind::Gravity => LOCK_BONUS,
        LockKind::HardDrop { rows_dropped } => calculate_drop_score(rows_dropped),
    }
}

/// Hard drop bonus: 2 per row fallen
pub fn calculate_drop_score(rows: u32) -> u32 {
    rows.saturating_mul(HARD_DROP_POINTS_PER_ROW)
}

/// Points, lines and level of one game
///
/// Every field is non-decreasing between resets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreState {
    pub points: u32,
    pub lines: u32,
    pub level: u32,
}

impl ScoreState {
    pub fn new() -> Self {
        Self {
            points: 0,
            lines: 0,
            level: 1,
        }
    }

    /// Account for one lock that removed `cleared` rows.
    pub fn apply_lock(&mut self, cleared: u32, lock: LockKind) -> ScoreResult {
        self.lines = self.lines.saturating_add(cleared);
        self.level = calculate_level(self.lines);

        let line_clear_score = calculate_line_score(cleared, self.level);
        let bonus = calculate_lock_bonus(lock);
        let total = line_clear_score.saturating_add(bonus);
        self.points = self.points.saturating_add(total);

        ScoreResult {
            line_clear_score,
            bonus,
            total,
            level: self.level,
        }
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Current descent period
    pub fn drop_interval_ms(&self) -> u32 {
        drop_interval_ms(self.level)
    }
}

impl Default for ScoreState {
    fn default() -> Self {
        Self::new()
    }
}

//! Drop timer - scheduled descent ticks
//!
//! The timer only accumulates elapsed time handed to it by its owner; it never
//! reads a clock. Pausing is simply not advancing it, so the phase within the
//! current interval survives a pause.

/// Accumulator for automatic descent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DropTimer {
    interval_ms: u32,
    elapsed_ms: u32,
}

impl DropTimer {
    pub fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms: interval_ms.max(1),
            elapsed_ms: 0,
        }
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    /// Time accumulated toward the next descent
    pub fn elapsed_ms(&self) -> u32 {
        self.elapsed_ms
    }

    /// Change the period without losing accumulated time
    pub fn set_interval(&mut self, interval_ms: u32) {
        self.interval_ms = interval_ms.max(1);
    }

    pub fn advance(&mut self, elapsed_ms: u32) {
        self.elapsed_ms = self.elapsed_ms.saturating_add(elapsed_ms);
    }

    /// Consume one interval if a full one has accumulated
    pub fn fire(&mut self) -> bool {
        if self.elapsed_ms >= self.interval_ms {
            self.elapsed_ms -= self.interval_ms;
            true
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.elapsed_ms = 0;
    }
}

//! Rolling-window loop rate limiter

use crate::core::types::Millis;
use std::collections::VecDeque;

/// Counts loop completions inside a sliding time window
#[derive(Debug, Clone)]
pub struct LoopRateLimiter {
    window_ms: Millis,
    max_loops: usize,
    stamps: VecDeque<Millis>,
}

impl LoopRateLimiter {
    pub fn new(window_ms: Millis, max_loops: usize) -> Self {
        Self {
            window_ms,
            max_loops,
            stamps: VecDeque::with_capacity(max_loops + 1),
        }
    }

    /// Record a completion at `now`. Returns true when the window now holds
    /// more than the limit; the window is emptied in that case so one burst
    /// trips the limiter once.
    pub fn record(&mut self, now: Millis) -> bool {
        self.stamps.push_back(now);
        let horizon = now - self.window_ms;
        while self.stamps.front().is_some_and(|&t| t < horizon) {
            self.stamps.pop_front();
        }

        if self.stamps.len() > self.max_loops {
            self.stamps.clear();
            return true;
        }
        false
    }

    /// Completions currently inside the window
    pub fn in_window(&self) -> usize {
        self.stamps.len()
    }

    pub fn reset(&mut self) {
        self.stamps.clear();
    }
}

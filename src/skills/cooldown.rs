//! Per-actor cooldown timers
//!
//! An entry exists only while its skill is unavailable. Decrementing an
//! entry to zero or below removes it in the same call.

use crate::core::types::Millis;
use ahash::AHashMap;

#[derive(Debug, Clone, Default)]
pub struct CooldownTimers {
    remaining: AHashMap<String, Millis>,
}

impl CooldownTimers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put `skill_id` on cooldown for `duration` ms
    pub fn start(&mut self, skill_id: &str, duration: Millis) {
        if duration > 0.0 {
            self.remaining.insert(skill_id.to_string(), duration);
        }
    }

    /// Decrement every entry by `delta`; returns ids that became ready,
    /// sorted for stable notification order
    pub fn tick(&mut self, delta: Millis) -> Vec<String> {
        let mut ready = Vec::new();
        self.remaining.retain(|id, remaining| {
            *remaining -= delta;
            if *remaining <= 0.0 {
                ready.push(id.clone());
                false
            } else {
                true
            }
        });
        ready.sort();
        ready
    }

    pub fn is_ready(&self, skill_id: &str) -> bool {
        !self.remaining.contains_key(skill_id)
    }

    /// Remaining ms, 0 when ready
    pub fn remaining(&self, skill_id: &str) -> Millis {
        self.remaining.get(skill_id).copied().unwrap_or(0.0)
    }

    pub fn active(&self) -> usize {
        self.remaining.len()
    }

    pub fn clear(&mut self) {
        self.remaining.clear();
    }
}

//! Virtual-clock task queue
//!
//! Deferred work (loop transitions, counter-attacks) is queued here instead
//! of on OS timers. The coordinator advances the clock at the start of every
//! update and runs whatever came due, in due-time order with ties broken by
//! scheduling order. Pausing the game does not stop the clock: a queued task
//! fires on the first update whose time reaches it.

use crate::core::types::{ActorId, CombatId, Millis, RewardBundle};
use ordered_float::OrderedFloat;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Work that resumes on a later tick boundary
#[derive(Debug, Clone, PartialEq)]
pub enum DeferredTask {
    /// Hand the player snapshot and reward to the base scene
    LoopTransition { loop_number: u32, reward: RewardBundle },
    /// Defender strikes back after a failed flee
    CounterAttack {
        combat: CombatId,
        attacker: ActorId,
        defender: ActorId,
    },
}

#[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
struct QueueKey {
    due: OrderedFloat<Millis>,
    seq: u64,
}

#[derive(Debug)]
struct Entry {
    key: QueueKey,
    task: DeferredTask,
}

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.key.cmp(&other.key)
    }
}

/// Min-heap of deferred tasks keyed on virtual time
#[derive(Debug, Default)]
pub struct Scheduler {
    now: Millis,
    next_seq: u64,
    queue: BinaryHeap<Reverse<Entry>>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time
    pub fn now(&self) -> Millis {
        self.now
    }

    /// Queue `task` to run `delay` ms after the current virtual time
    pub fn schedule(&mut self, delay: Millis, task: DeferredTask) {
        let due = self.now + delay.max(0.0);
        let seq = self.next_seq;
        self.next_seq += 1;
        tracing::debug!("Scheduled {:?} at {:.0}ms", task, due);
        self.queue.push(Reverse(Entry {
            key: QueueKey { due: OrderedFloat(due), seq },
            task,
        }));
    }

    /// Move the clock to `time` and pop every task now due.
    ///
    /// The clock never runs backwards; an earlier `time` only drains tasks
    /// that were already due.
    pub fn advance_to(&mut self, time: Millis) -> Vec<DeferredTask> {
        if time > self.now {
            self.now = time;
        }

        let mut due = Vec::new();
        while let Some(Reverse(entry)) = self.queue.peek() {
            if entry.key.due.0 > self.now {
                break;
            }
            if let Some(Reverse(entry)) = self.queue.pop() {
                due.push(entry.task);
            }
        }
        due
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Drop every queued task and rewind the clock
    pub fn clear(&mut self) {
        self.queue.clear();
        self.now = 0.0;
        self.next_seq = 0;
    }
}

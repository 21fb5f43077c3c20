//! Coordination context shared by every subsystem
//!
//! There is no global state. The coordinator owns one `GameContext` and
//! hands it by `&mut` to each subsystem call, so everything a subsystem can
//! touch is visible in its signature.

use crate::core::config::GameConfig;
use crate::core::scheduler::Scheduler;
use crate::entity::ActorStore;
use crate::events::EventLog;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Requests a subsystem raises for the coordinator to act on after the tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    PlayerDied,
    LoopCompleted,
}

pub struct GameContext {
    pub config: GameConfig,
    pub actors: ActorStore,
    pub events: EventLog,
    pub scheduler: Scheduler,
    pub rng: ChaCha8Rng,
    signals: Vec<Signal>,
}

impl GameContext {
    pub fn new(config: GameConfig) -> Self {
        let rng = ChaCha8Rng::seed_from_u64(config.seed);
        Self {
            config,
            actors: ActorStore::new(),
            events: EventLog::new(),
            scheduler: Scheduler::new(),
            rng,
            signals: Vec::new(),
        }
    }

    /// Queue `signal` for the end of the tick. Deaths collapse into one;
    /// every loop completion counts.
    pub fn raise(&mut self, signal: Signal) {
        if signal == Signal::PlayerDied && self.signals.contains(&signal) {
            return;
        }
        self.signals.push(signal);
    }

    pub fn take_signals(&mut self) -> Vec<Signal> {
        std::mem::take(&mut self.signals)
    }

    /// Drop actors, pending tasks and signals. Events and the RNG stream
    /// are kept.
    pub fn reset(&mut self) {
        self.actors.clear();
        self.scheduler.clear();
        self.signals.clear();
    }
}

impl Default for GameContext {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

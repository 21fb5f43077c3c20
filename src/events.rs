//! Outbound notifications
//!
//! The core never renders anything. Everything a UI or effects layer needs
//! to react to is pushed onto the [`EventLog`] as a [`GameEvent`] and
//! drained by whoever is listening.

use crate::core::types::{ActorId, CombatId, RewardBundle};
use serde::Serialize;

/// Why a combat left the active set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CombatOutcome {
    /// Defender died
    Victory,
    /// Player died
    Defeat,
    /// Attacker escaped
    Fled,
    /// A participant disappeared from the world
    Abandoned,
}

/// Screen anchor hint for toast notices
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NoticePosition {
    Top,
    Center,
    OverActor(ActorId),
}

/// Events generated by the core
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum GameEvent {
    SkillReady {
        actor: ActorId,
        skill: String,
    },
    SkillUsed {
        actor: ActorId,
        skill: String,
    },
    StatusApplied {
        actor: ActorId,
        effect: String,
    },
    StatusCleared {
        actor: ActorId,
        effect: String,
    },
    DamageDealt {
        source: ActorId,
        target: ActorId,
        amount: f32,
        critical: bool,
    },
    Healed {
        actor: ActorId,
        amount: f32,
    },
    CombatStarted {
        combat: CombatId,
        attacker: ActorId,
        defender: ActorId,
    },
    CombatEnded {
        combat: CombatId,
        outcome: CombatOutcome,
    },
    FleeResult {
        combat: CombatId,
        success: bool,
        chance: f32,
    },
    LoopCompleted {
        loop_number: u32,
        reward: RewardBundle,
    },
    RewardGranted {
        reward: RewardBundle,
    },
    LevelUp {
        actor: ActorId,
        level: u32,
    },
    GamePaused,
    GameResumed,
    SpeedChanged {
        multiplier: f64,
    },
    PlayerDied,
    /// Toast request: free-form text plus color (0xRRGGBB) and position hints
    Notice {
        text: String,
        color: u32,
        position: NoticePosition,
    },
}

/// Append-only log drained by collaborators
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<GameEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    pub fn notice(&mut self, text: impl Into<String>, color: u32, position: NoticePosition) {
        self.emit(GameEvent::Notice { text: text.into(), color, position });
    }

    /// Take everything emitted since the last drain
    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn iter(&self) -> impl Iterator<Item = &GameEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

//! Timed status effects and their start/end hooks

use crate::core::types::Millis;
use crate::entity::StatField;
use crate::status::modifier::{ModifierOp, ModifierSource, StatModifiers};
use serde::{Deserialize, Serialize};

/// What an effect does while it is active
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StatusKind {
    /// Stat modifiers pushed at start, removed at end
    Modify(Vec<(StatField, ModifierOp)>),
    /// Heals continuously for the effect's duration
    HealOverTime { per_second: f32 },
}

/// A timed, reversible modification to an actor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEffect {
    pub id: String,
    pub duration_ms: Millis,
    pub remaining_ms: Millis,
    pub kind: StatusKind,
    /// Set by `on_start`, taken by `on_end`
    #[serde(skip)]
    source: Option<ModifierSource>,
}

impl StatusEffect {
    pub fn new(id: impl Into<String>, duration_ms: Millis, kind: StatusKind) -> Self {
        Self {
            id: id.into(),
            duration_ms,
            remaining_ms: duration_ms,
            kind,
            source: None,
        }
    }

    /// Defense buff granted by the Defend skill
    pub fn defend(multiplier: f32, duration_ms: Millis) -> Self {
        Self::new(
            "defend",
            duration_ms,
            StatusKind::Modify(vec![(StatField::Defense, ModifierOp::Multiply(multiplier))]),
        )
    }

    pub fn is_started(&self) -> bool {
        self.source.is_some()
    }

    pub fn is_expired(&self) -> bool {
        self.remaining_ms <= 0.0
    }

    /// Push this effect's modifiers, tagged with `source`.
    ///
    /// Returns false if the effect was already started.
    pub fn on_start(&mut self, modifiers: &mut StatModifiers, source: ModifierSource) -> bool {
        if self.source.is_some() {
            return false;
        }
        if let StatusKind::Modify(changes) = &self.kind {
            for (field, op) in changes {
                modifiers.push(source, *field, *op);
            }
        }
        self.source = Some(source);
        true
    }

    /// Remove exactly the modifiers this effect pushed.
    ///
    /// A no-op returning false if `on_start` never ran or `on_end` already did.
    pub fn on_end(&mut self, modifiers: &mut StatModifiers) -> bool {
        match self.source.take() {
            Some(source) => {
                modifiers.remove_source(source);
                true
            }
            None => false,
        }
    }
}

/// Effects currently attached to one actor
#[derive(Debug, Clone, Default)]
pub struct ActiveEffects {
    next_source: ModifierSource,
    effects: Vec<StatusEffect>,
}

impl ActiveEffects {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn next_source(&mut self) -> ModifierSource {
        let source = self.next_source;
        self.next_source += 1;
        source
    }

    pub(crate) fn push(&mut self, effect: StatusEffect) {
        self.effects.push(effect);
    }

    pub(crate) fn take(&mut self, id: &str) -> Option<StatusEffect> {
        let index = self.effects.iter().position(|e| e.id == id)?;
        Some(self.effects.remove(index))
    }

    pub(crate) fn take_all(&mut self) -> Vec<StatusEffect> {
        std::mem::take(&mut self.effects)
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut StatusEffect> {
        self.effects.iter_mut()
    }

    /// Remove and return every expired effect, keeping order of the rest
    pub(crate) fn take_expired(&mut self) -> Vec<StatusEffect> {
        let (expired, active): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.effects).into_iter().partition(StatusEffect::is_expired);
        self.effects = active;
        expired
    }

    pub fn get(&self, id: &str) -> Option<&StatusEffect> {
        self.effects.iter().find(|e| e.id == id)
    }

    pub fn has(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.effects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }
}

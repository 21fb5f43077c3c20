//! Status effect mechanism
//!
//! Effects are attached to an actor, start immediately, and end exactly once:
//! either when their duration runs out during [`tick_effects`] or when they
//! are cancelled. Stat changes go through the actor's modifier stacks, so
//! overlapping effects on the same stat restore cleanly in any order.

pub mod effect;
pub mod modifier;

pub use effect::{ActiveEffects, StatusEffect, StatusKind};
pub use modifier::{ModifierOp, ModifierSource, StatModifiers};

use crate::core::types::Millis;
use crate::entity::Actor;
use crate::events::{EventLog, GameEvent};

/// Attach `effect` to `actor` and run its start hook.
///
/// An effect with the same id already on the actor is ended first, so the
/// new application refreshes rather than stacks.
pub fn add_status_effect(actor: &mut Actor, mut effect: StatusEffect, events: &mut EventLog) {
    if let Some(mut previous) = actor.effects.take(&effect.id) {
        previous.on_end(&mut actor.modifiers);
        events.emit(GameEvent::StatusCleared { actor: actor.id, effect: previous.id });
    }

    let source = actor.effects.next_source();
    effect.on_start(&mut actor.modifiers, source);
    tracing::debug!("{} gains {} for {:.0}ms", actor.name, effect.id, effect.duration_ms);
    events.emit(GameEvent::StatusApplied { actor: actor.id, effect: effect.id.clone() });
    actor.effects.push(effect);
}

/// End an active effect early. Returns false if it was not active.
pub fn cancel_status_effect(actor: &mut Actor, id: &str, events: &mut EventLog) -> bool {
    match actor.effects.take(id) {
        Some(mut effect) => {
            effect.on_end(&mut actor.modifiers);
            events.emit(GameEvent::StatusCleared { actor: actor.id, effect: effect.id });
            true
        }
        None => false,
    }
}

/// Advance every effect on `actor` by `delta` and end the expired ones
pub fn tick_effects(actor: &mut Actor, delta: Millis, events: &mut EventLog) {
    if actor.effects.is_empty() {
        return;
    }

    let mut healing = 0.0;
    for effect in actor.effects.iter_mut() {
        let elapsed = delta.min(effect.remaining_ms).max(0.0);
        if let StatusKind::HealOverTime { per_second } = effect.kind {
            healing += per_second * (elapsed / 1000.0) as f32;
        }
        effect.remaining_ms -= delta;
    }

    if healing > 0.0 && actor.is_alive() {
        let healed = actor.heal(healing);
        if healed > 0.0 {
            events.emit(GameEvent::Healed { actor: actor.id, amount: healed });
        }
    }

    for mut effect in actor.effects.take_expired() {
        effect.on_end(&mut actor.modifiers);
        tracing::debug!("{} loses {}", actor.name, effect.id);
        events.emit(GameEvent::StatusCleared { actor: actor.id, effect: effect.id });
    }
}

/// End every effect on `actor`
pub fn clear_status_effects(actor: &mut Actor, events: &mut EventLog) {
    for mut effect in actor.effects.take_all() {
        effect.on_end(&mut actor.modifiers);
        events.emit(GameEvent::StatusCleared { actor: actor.id, effect: effect.id });
    }
}

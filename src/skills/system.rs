//! Ability subsystem
//!
//! Owns one [`AbilityEngine`] per actor and drives the per-tick work of the
//! ability layer: cooldown decrement, status-effect expiry and mana
//! regeneration, in that order.

use crate::context::GameContext;
use crate::core::types::{ActorId, Millis};
use crate::registry::{InitData, Initializable, Resettable, SubsystemHandle, Updatable};
use crate::skills::engine::AbilityEngine;
use crate::skills::skill::{Skill, TargetInfo};
use crate::status::{clear_status_effects, tick_effects};
use ahash::AHashMap;
use std::cell::RefCell;
use std::rc::Rc;

/// Registry name of the ability subsystem
pub const ABILITY_SYSTEM: &str = "abilities";

#[derive(Debug)]
pub struct AbilitySystem {
    engines: AHashMap<ActorId, AbilityEngine>,
}

impl AbilitySystem {
    pub fn new() -> Self {
        Self {
            engines: AHashMap::new(),
        }
    }

    /// Handle exposing every capability this subsystem implements. Pause and
    /// speed arrive already folded into the delta the registry hands out.
    pub fn handle(system: &Rc<RefCell<Self>>) -> SubsystemHandle {
        SubsystemHandle::builder(ABILITY_SYSTEM, system.clone())
            .initialize()
            .update()
            .reset()
            .build()
    }

    pub fn engine(&self, actor: ActorId) -> Option<&AbilityEngine> {
        self.engines.get(&actor)
    }

    pub fn engine_mut(&mut self, actor: ActorId) -> &mut AbilityEngine {
        self.engines.entry(actor).or_insert_with(|| AbilityEngine::new(actor))
    }

    /// Drop `actor`'s catalog and cooldowns
    pub fn remove_engine(&mut self, actor: ActorId) -> bool {
        self.engines.remove(&actor).is_some()
    }

    pub fn add_skill(&mut self, actor: ActorId, skill: Skill) -> bool {
        self.engine_mut(actor).add_skill(skill)
    }

    /// Use a skill from `actor`'s catalog; false if the actor has none
    pub fn use_skill(
        &mut self,
        ctx: &mut GameContext,
        skill_id: &str,
        target: &TargetInfo,
        actor: ActorId,
    ) -> bool {
        match self.engines.get_mut(&actor) {
            Some(engine) => engine.use_skill(skill_id, target, actor, ctx),
            None => false,
        }
    }

    pub fn is_skill_ready(&self, actor: ActorId, skill_id: &str) -> bool {
        self.engines.get(&actor).map_or(true, |e| e.is_skill_ready(skill_id))
    }

    pub fn get_skill_cooldown(&self, actor: ActorId, skill_id: &str) -> Millis {
        self.engines.get(&actor).map_or(0.0, |e| e.get_skill_cooldown(skill_id))
    }
}

impl Default for AbilitySystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Initializable for AbilitySystem {
    fn initialize(&mut self, ctx: &mut GameContext, data: &InitData) {
        let kit = ctx.config.starting_skills.clone();
        let engine = self.engine_mut(data.player);
        for kind in kit {
            engine.add_skill(Skill::from_kind(kind));
        }
        tracing::debug!("Player starts with {} skills", engine.skills().len());
    }
}

impl Updatable for AbilitySystem {
    fn update(&mut self, ctx: &mut GameContext, _time: Millis, delta: Millis) {
        for engine in self.engines.values_mut() {
            engine.update_cooldowns(delta, &mut ctx.events);
        }

        let regen = ctx.config.mana_regen_per_sec * (delta / 1000.0) as f32;
        let events = &mut ctx.events;
        for actor in ctx.actors.iter_mut() {
            tick_effects(actor, delta, events);
            // Mana pushed past max by other sources is left alone
            if actor.is_alive() && regen > 0.0 && actor.stats.mana < actor.stats.max_mana {
                actor.stats.mana = (actor.stats.mana + regen).min(actor.stats.max_mana);
            }
        }
    }
}

impl Resettable for AbilitySystem {
    fn reset(&mut self, ctx: &mut GameContext) {
        let events = &mut ctx.events;
        for actor in ctx.actors.iter_mut() {
            clear_status_effects(actor, events);
        }
        self.engines.clear();
        tracing::debug!("Ability system reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Actor, StatField, Stats};
    use crate::events::GameEvent;

    #[test]
    fn test_initialize_grants_starting_kit() {
        let mut ctx = GameContext::default();
        let hero = ctx.actors.spawn(Actor::player("Hero", Stats::default()));
        let mut system = AbilitySystem::new();

        system.initialize(&mut ctx, &InitData { player: hero });
        assert_eq!(system.engine(hero).unwrap().skills().len(), 5);
    }

    #[test]
    fn test_handle_takes_pause_and_speed_from_delta() {
        let handle = AbilitySystem::handle(&Rc::new(RefCell::new(AbilitySystem::new())));
        assert!(handle.update.is_some() && handle.reset.is_some());
        assert!(handle.pause.is_none());
        assert!(handle.speed.is_none());
    }

    #[test]
    fn test_update_runs_cooldowns_effects_and_regen() {
        let mut ctx = GameContext::default();
        let hero = ctx.actors.spawn(Actor::player("Hero", Stats { mana: 30.0, ..Stats::default() }));
        let mut system = AbilitySystem::new();
        system.initialize(&mut ctx, &InitData { player: hero });

        assert!(system.use_skill(&mut ctx, "defend", &TargetInfo::none(), hero));
        assert_eq!(ctx.actors.get(hero).unwrap().stats.mana, 20.0);
        ctx.events.clear();

        system.update(&mut ctx, 5000.0, 5000.0);

        let h = ctx.actors.get(hero).unwrap();
        assert_eq!(h.effective(StatField::Defense), h.stats.defense);
        assert_eq!(h.stats.mana, 25.0);
        assert_eq!(system.get_skill_cooldown(hero, "defend"), 7000.0);
        assert!(ctx
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::StatusCleared { effect, .. } if effect == "defend")));
    }

    #[test]
    fn test_mana_regen_caps_at_max() {
        let mut ctx = GameContext::default();
        let hero = ctx.actors.spawn(Actor::player("Hero", Stats { mana: 49.5, ..Stats::default() }));
        let mut system = AbilitySystem::new();

        system.update(&mut ctx, 0.0, 10_000.0);
        assert_eq!(ctx.actors.get(hero).unwrap().stats.mana, 50.0);
    }

    #[test]
    fn test_mana_regen_never_lowers_overfull_pool() {
        let mut ctx = GameContext::default();
        let hero = ctx.actors.spawn(Actor::player("Hero", Stats { mana: 80.0, ..Stats::default() }));
        let mut system = AbilitySystem::new();

        system.update(&mut ctx, 0.0, 1000.0);
        assert_eq!(ctx.actors.get(hero).unwrap().stats.mana, 80.0);
    }

    #[test]
    fn test_actor_without_engine_cannot_use_skills() {
        let mut ctx = GameContext::default();
        let hero = ctx.actors.spawn(Actor::player("Hero", Stats::default()));
        let mut system = AbilitySystem::new();

        assert!(!system.use_skill(&mut ctx, "defend", &TargetInfo::none(), hero));
        assert!(system.is_skill_ready(hero, "defend"));
    }

    #[test]
    fn test_reset_clears_engines_and_effects() {
        let mut ctx = GameContext::default();
        let hero = ctx.actors.spawn(Actor::player("Hero", Stats::default()));
        let mut system = AbilitySystem::new();
        system.initialize(&mut ctx, &InitData { player: hero });
        assert!(system.use_skill(&mut ctx, "defend", &TargetInfo::none(), hero));

        system.reset(&mut ctx);
        assert!(system.engine(hero).is_none());
        assert!(ctx.actors.get(hero).unwrap().effects.is_empty());
        assert!(ctx.actors.get(hero).unwrap().modifiers.is_empty());
    }
}

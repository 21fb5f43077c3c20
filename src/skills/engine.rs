//! Per-actor ability engine: catalog, cooldowns, transactional use

use crate::context::GameContext;
use crate::core::types::{ActorId, Millis};
use crate::events::{EventLog, GameEvent};
use crate::skills::cooldown::CooldownTimers;
use crate::skills::resolver;
use crate::skills::skill::{Skill, TargetInfo};

#[derive(Debug, Clone)]
pub struct AbilityEngine {
    owner: ActorId,
    catalog: Vec<Skill>,
    cooldowns: CooldownTimers,
}

impl AbilityEngine {
    pub fn new(owner: ActorId) -> Self {
        Self {
            owner,
            catalog: Vec::new(),
            cooldowns: CooldownTimers::new(),
        }
    }

    pub fn owner(&self) -> ActorId {
        self.owner
    }

    /// Append `skill` to the catalog. Rejects empty and duplicate ids.
    pub fn add_skill(&mut self, skill: Skill) -> bool {
        if skill.id.is_empty() {
            tracing::warn!("Rejected skill with empty id");
            return false;
        }
        if self.skill(&skill.id).is_some() {
            tracing::warn!("Skill '{}' already in catalog", skill.id);
            return false;
        }
        self.catalog.push(skill);
        true
    }

    pub fn skill(&self, id: &str) -> Option<&Skill> {
        self.catalog.iter().find(|s| s.id == id)
    }

    pub fn skills(&self) -> &[Skill] {
        &self.catalog
    }

    /// Advance every cooldown by `delta`, announcing skills that came back
    pub fn update_cooldowns(&mut self, delta: Millis, events: &mut EventLog) {
        for skill in self.cooldowns.tick(delta) {
            events.emit(GameEvent::SkillReady { actor: self.owner, skill });
        }
    }

    /// Use `skill_id` as `actor` against `target`.
    ///
    /// Fails without side effects if the skill is unknown, cooling down,
    /// unaffordable, or its effect does not take. The cooldown starts and
    /// mana is spent only once the effect has succeeded.
    pub fn use_skill(
        &mut self,
        skill_id: &str,
        target: &TargetInfo,
        actor: ActorId,
        ctx: &mut GameContext,
    ) -> bool {
        let Some(skill) = self.skill(skill_id) else {
            tracing::debug!("Unknown skill '{}'", skill_id);
            return false;
        };
        if !self.cooldowns.is_ready(skill_id) {
            return false;
        }

        let (kind, cooldown, cost) = (skill.kind, skill.cooldown_ms, skill.mana_cost);
        let Some(caster) = ctx.actors.get(actor) else {
            return false;
        };
        if let Some(cost) = cost {
            if !caster.can_afford(cost) {
                tracing::debug!("{} cannot afford {} ({} mana)", caster.name, skill_id, cost);
                return false;
            }
        }

        if !resolver::resolve(kind, actor, target, ctx) {
            return false;
        }

        if let (Some(cost), Some(caster)) = (cost, ctx.actors.get_mut(actor)) {
            caster.stats.mana -= cost;
        }
        self.cooldowns.start(skill_id, cooldown);
        ctx.events.emit(GameEvent::SkillUsed { actor, skill: skill_id.to_string() });
        true
    }

    pub fn is_skill_ready(&self, skill_id: &str) -> bool {
        self.cooldowns.is_ready(skill_id)
    }

    /// Remaining cooldown in ms, 0 when ready
    pub fn get_skill_cooldown(&self, skill_id: &str) -> Millis {
        self.cooldowns.remaining(skill_id)
    }

    pub fn clear_cooldowns(&mut self) {
        self.cooldowns.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Vec2;
    use crate::entity::{Actor, Stats};
    use crate::skills::skill::SkillKind;

    fn setup(mana: f32) -> (GameContext, AbilityEngine, ActorId, ActorId) {
        let mut ctx = GameContext::default();
        let hero = ctx.actors.spawn(Actor::player(
            "Hero",
            Stats { mana, crit_chance: 0.0, ..Stats::default() },
        ));
        let slime = ctx.actors.spawn(Actor::enemy("Slime", 3, Vec2::new(5.0, 0.0)));
        let mut engine = AbilityEngine::new(hero);
        for kind in SkillKind::all() {
            assert!(engine.add_skill(Skill::from_kind(*kind)));
        }
        (ctx, engine, hero, slime)
    }

    #[test]
    fn test_add_skill_rejects_duplicates_and_empty() {
        let (_, mut engine, _, _) = setup(50.0);
        assert!(!engine.add_skill(Skill::from_kind(SkillKind::Defend)));
        assert!(!engine.add_skill(Skill::new("", SkillKind::Defend, 1000.0, None)));
        assert_eq!(engine.skills().len(), 5);
    }

    #[test]
    fn test_successful_use_starts_cooldown_and_spends_mana() {
        let (mut ctx, mut engine, hero, slime) = setup(50.0);

        assert!(engine.use_skill("power_strike", &TargetInfo::actor(slime), hero, &mut ctx));
        assert!(!engine.is_skill_ready("power_strike"));
        assert_eq!(engine.get_skill_cooldown("power_strike"), 8000.0);
        assert_eq!(ctx.actors.get(hero).unwrap().stats.mana, 40.0);
        assert!(ctx
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::SkillUsed { skill, .. } if skill == "power_strike")));
    }

    #[test]
    fn test_insufficient_mana_changes_nothing() {
        let (mut ctx, mut engine, hero, _) = setup(10.0);
        engine.add_skill(Skill::new("big_heal", SkillKind::Recover, 1000.0, Some(15.0)));
        ctx.actors.get_mut(hero).unwrap().stats.health = 20.0;

        assert!(!engine.use_skill("big_heal", &TargetInfo::none(), hero, &mut ctx));
        let h = ctx.actors.get(hero).unwrap();
        assert_eq!(h.stats.mana, 10.0);
        assert_eq!(h.stats.health, 20.0);
        assert!(engine.is_skill_ready("big_heal"));
        assert!(ctx.events.is_empty());
    }

    #[test]
    fn test_unknown_skill_fails() {
        let (mut ctx, mut engine, hero, _) = setup(50.0);
        assert!(!engine.use_skill("fireball", &TargetInfo::none(), hero, &mut ctx));
        assert!(ctx.events.is_empty());
    }

    #[test]
    fn test_on_cooldown_fails() {
        let (mut ctx, mut engine, hero, _) = setup(50.0);
        assert!(engine.use_skill("defend", &TargetInfo::none(), hero, &mut ctx));
        let mana_after_first = ctx.actors.get(hero).unwrap().stats.mana;
        ctx.events.clear();

        assert!(!engine.use_skill("defend", &TargetInfo::none(), hero, &mut ctx));
        assert_eq!(ctx.actors.get(hero).unwrap().stats.mana, mana_after_first);
        assert!(ctx.events.is_empty());
    }

    #[test]
    fn test_failed_effect_starts_no_cooldown() {
        let (mut ctx, mut engine, hero, _) = setup(50.0);
        let empty = TargetInfo::point(Vec2::new(1000.0, 1000.0));

        assert!(!engine.use_skill("multi_strike", &empty, hero, &mut ctx));
        assert!(engine.is_skill_ready("multi_strike"));
        assert_eq!(engine.get_skill_cooldown("multi_strike"), 0.0);
        assert_eq!(ctx.actors.get(hero).unwrap().stats.mana, 50.0);
    }

    #[test]
    fn test_ready_after_cumulative_deltas() {
        let (mut ctx, mut engine, hero, slime) = setup(50.0);
        assert!(engine.use_skill("quick_strike", &TargetInfo::actor(slime), hero, &mut ctx));
        ctx.events.clear();

        engine.update_cooldowns(1000.0, &mut ctx.events);
        engine.update_cooldowns(1999.0, &mut ctx.events);
        assert!(!engine.is_skill_ready("quick_strike"));
        assert_eq!(engine.get_skill_cooldown("quick_strike"), 1.0);

        engine.update_cooldowns(1.0, &mut ctx.events);
        assert!(engine.is_skill_ready("quick_strike"));
        assert_eq!(
            ctx.events.drain(),
            vec![GameEvent::SkillReady { actor: hero, skill: "quick_strike".into() }]
        );
    }
}

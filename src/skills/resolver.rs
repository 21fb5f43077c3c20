//! Skill effect resolution
//!
//! One function per [`SkillKind`]. Every resolver checks all of its
//! preconditions before touching any state, so a `false` return always
//! means nothing changed.

use crate::combat::damage::{apply_damage, roll_critical};
use crate::context::GameContext;
use crate::core::types::{ActorId, Millis};
use crate::events::GameEvent;
use crate::skills::skill::{SkillKind, TargetInfo};
use crate::status::{add_status_effect, StatusEffect};

pub const QUICK_STRIKE_RATIO: f32 = 0.7;
pub const QUICK_STRIKE_ATTACK_CUT_MS: Millis = 500.0;
pub const POWER_STRIKE_RATIO: f32 = 1.5;
pub const POWER_STRIKE_CRIT_BONUS: f32 = 0.3;
pub const RECOVER_RATIO: f32 = 0.3;
pub const DEFEND_MULTIPLIER: f32 = 1.5;
pub const DEFEND_DURATION_MS: Millis = 5000.0;
pub const MULTI_STRIKE_RADIUS: f32 = 80.0;
pub const MULTI_STRIKE_RATIO: f32 = 0.7;

/// Run the effect of `kind` for `actor`. Returns whether it took effect.
pub fn resolve(kind: SkillKind, actor: ActorId, target: &TargetInfo, ctx: &mut GameContext) -> bool {
    match kind {
        SkillKind::QuickStrike => quick_strike(actor, target, ctx),
        SkillKind::PowerStrike => power_strike(actor, target, ctx),
        SkillKind::Recover => recover(actor, ctx),
        SkillKind::Defend => defend(actor, ctx),
        SkillKind::MultiStrike => multi_strike(actor, target, ctx),
    }
}

/// The targeted actor, if it is someone other than the caster and alive
fn living_target(ctx: &GameContext, actor: ActorId, target: &TargetInfo) -> Option<ActorId> {
    let id = target.actor.filter(|id| *id != actor)?;
    ctx.actors.get(id).filter(|t| t.can_act()).map(|t| t.id)
}

fn quick_strike(actor: ActorId, target: &TargetInfo, ctx: &mut GameContext) -> bool {
    let Some(target) = living_target(ctx, actor, target) else {
        return false;
    };
    let Some(attack) = ctx.actors.get(actor).filter(|a| a.can_act()).map(|a| a.attack()) else {
        return false;
    };

    if apply_damage(ctx, actor, target, attack * QUICK_STRIKE_RATIO, false).is_none() {
        return false;
    }
    if let Some(caster) = ctx.actors.get_mut(actor) {
        caster.action_cooldown = (caster.action_cooldown - QUICK_STRIKE_ATTACK_CUT_MS).max(0.0);
    }
    true
}

fn power_strike(actor: ActorId, target: &TargetInfo, ctx: &mut GameContext) -> bool {
    let Some(target) = living_target(ctx, actor, target) else {
        return false;
    };
    let Some((attack, crit_chance, crit_multiplier)) = ctx
        .actors
        .get(actor)
        .filter(|a| a.can_act())
        .map(|a| (a.attack(), a.crit_chance(), a.crit_multiplier()))
    else {
        return false;
    };

    let critical = roll_critical(&mut ctx.rng, crit_chance + POWER_STRIKE_CRIT_BONUS);
    let mut damage = attack * POWER_STRIKE_RATIO;
    if critical {
        damage *= crit_multiplier;
    }
    apply_damage(ctx, actor, target, damage, critical).is_some()
}

fn recover(actor: ActorId, ctx: &mut GameContext) -> bool {
    let Some(caster) = ctx.actors.get_mut(actor).filter(|a| a.can_act()) else {
        return false;
    };
    let amount = (caster.stats.max_health * RECOVER_RATIO).floor();
    let healed = caster.heal(amount);
    ctx.events.emit(GameEvent::Healed { actor, amount: healed });
    true
}

fn defend(actor: ActorId, ctx: &mut GameContext) -> bool {
    let Some(caster) = ctx.actors.get_mut(actor).filter(|a| a.can_act()) else {
        return false;
    };
    add_status_effect(
        caster,
        StatusEffect::defend(DEFEND_MULTIPLIER, DEFEND_DURATION_MS),
        &mut ctx.events,
    );
    true
}

fn multi_strike(actor: ActorId, target: &TargetInfo, ctx: &mut GameContext) -> bool {
    let Some((kind, attack)) = ctx
        .actors
        .get(actor)
        .filter(|a| a.can_act())
        .map(|a| (a.kind, a.attack()))
    else {
        return false;
    };

    let center = target
        .actor
        .and_then(|id| ctx.actors.get(id))
        .map(|t| t.position)
        .or(target.point);
    let Some(center) = center else {
        return false;
    };

    let victims = ctx.actors.hostiles_within(kind, center, MULTI_STRIKE_RADIUS);
    if victims.is_empty() {
        return false;
    }

    let damage = attack * MULTI_STRIKE_RATIO;
    for victim in victims {
        apply_damage(ctx, actor, victim, damage, false);
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Vec2;
    use crate::entity::{Actor, StatField, Stats};

    fn setup() -> (GameContext, ActorId, ActorId) {
        let mut ctx = GameContext::default();
        let hero = ctx.actors.spawn(Actor::player(
            "Hero",
            Stats { attack: 20.0, crit_chance: 0.0, ..Stats::default() },
        ));
        let mut slime = Actor::enemy("Slime", 1, Vec2::new(10.0, 0.0));
        slime.stats.defense = 0.0;
        let slime = ctx.actors.spawn(slime);
        (ctx, hero, slime)
    }

    #[test]
    fn test_quick_strike_damage_and_attack_cut() {
        let (mut ctx, hero, slime) = setup();
        ctx.actors.get_mut(hero).unwrap().action_cooldown = 700.0;
        let before = ctx.actors.get(slime).unwrap().stats.health;

        assert!(resolve(SkillKind::QuickStrike, hero, &TargetInfo::actor(slime), &mut ctx));
        assert_eq!(ctx.actors.get(slime).unwrap().stats.health, before - 14.0);
        assert_eq!(ctx.actors.get(hero).unwrap().action_cooldown, 200.0);
    }

    #[test]
    fn test_quick_strike_cut_floors_at_zero() {
        let (mut ctx, hero, slime) = setup();
        ctx.actors.get_mut(hero).unwrap().action_cooldown = 300.0;
        assert!(resolve(SkillKind::QuickStrike, hero, &TargetInfo::actor(slime), &mut ctx));
        assert_eq!(ctx.actors.get(hero).unwrap().action_cooldown, 0.0);
    }

    #[test]
    fn test_strikes_need_living_target() {
        let (mut ctx, hero, slime) = setup();
        ctx.actors.get_mut(slime).unwrap().stats.health = 0.0;

        assert!(!resolve(SkillKind::QuickStrike, hero, &TargetInfo::actor(slime), &mut ctx));
        assert!(!resolve(SkillKind::PowerStrike, hero, &TargetInfo::actor(slime), &mut ctx));
        assert!(!resolve(SkillKind::PowerStrike, hero, &TargetInfo::none(), &mut ctx));
        assert!(!resolve(SkillKind::QuickStrike, hero, &TargetInfo::actor(hero), &mut ctx));
        assert!(ctx.events.is_empty());
    }

    #[test]
    fn test_power_strike_crit_bonus() {
        let (mut ctx, hero, slime) = setup();
        {
            let h = ctx.actors.get_mut(hero).unwrap();
            // 0.8 + 0.3 bonus guarantees the crit
            h.stats.crit_chance = 0.8;
            h.stats.crit_multiplier = 2.0;
        }
        let before = ctx.actors.get(slime).unwrap().stats.health;

        assert!(resolve(SkillKind::PowerStrike, hero, &TargetInfo::actor(slime), &mut ctx));
        // 20 * 1.5 * 2.0, capped by remaining health
        let expected = (before - 60.0).max(0.0);
        assert_eq!(ctx.actors.get(slime).unwrap().stats.health, expected);
        assert!(ctx
            .events
            .iter()
            .any(|e| matches!(e, GameEvent::DamageDealt { critical: true, .. })));
    }

    #[test]
    fn test_recover_heals_floor_of_thirty_percent() {
        let (mut ctx, hero, _) = setup();
        {
            let h = ctx.actors.get_mut(hero).unwrap();
            h.stats.max_health = 115.0;
            h.stats.health = 10.0;
        }
        assert!(resolve(SkillKind::Recover, hero, &TargetInfo::none(), &mut ctx));
        // floor(34.5) = 34
        assert_eq!(ctx.actors.get(hero).unwrap().stats.health, 44.0);
    }

    #[test]
    fn test_inactive_actor_cannot_recover_or_defend() {
        let (mut ctx, hero, _) = setup();
        ctx.actors.get_mut(hero).unwrap().active = false;
        assert!(!resolve(SkillKind::Recover, hero, &TargetInfo::none(), &mut ctx));
        assert!(!resolve(SkillKind::Defend, hero, &TargetInfo::none(), &mut ctx));
        assert!(ctx.events.is_empty());
    }

    #[test]
    fn test_defend_applies_defense_effect() {
        let (mut ctx, hero, _) = setup();
        assert!(resolve(SkillKind::Defend, hero, &TargetInfo::none(), &mut ctx));

        let h = ctx.actors.get(hero).unwrap();
        assert_eq!(h.effective(StatField::Defense), 7.5);
        assert_eq!(h.effects.get("defend").unwrap().remaining_ms, DEFEND_DURATION_MS);
    }

    #[test]
    fn test_multi_strike_hits_everyone_in_radius() {
        let (mut ctx, hero, slime) = setup();
        let near = ctx.actors.spawn(Actor::enemy("Bat", 1, Vec2::new(80.0, 0.0)));
        let far = ctx.actors.spawn(Actor::enemy("Far", 1, Vec2::new(95.0, 0.0)));

        // Centered on the slime at x=10: bat is 70 away, far is 85 away
        assert!(resolve(SkillKind::MultiStrike, hero, &TargetInfo::actor(slime), &mut ctx));

        let hit: Vec<ActorId> = ctx
            .events
            .iter()
            .filter_map(|e| match e {
                GameEvent::DamageDealt { target, .. } => Some(*target),
                _ => None,
            })
            .collect();
        assert!(hit.contains(&slime));
        assert!(hit.contains(&near));
        assert!(!hit.contains(&far));
    }

    #[test]
    fn test_multi_strike_empty_area_fails() {
        let (mut ctx, hero, _) = setup();
        assert!(!resolve(
            SkillKind::MultiStrike,
            hero,
            &TargetInfo::point(Vec2::new(500.0, 500.0)),
            &mut ctx
        ));
        assert!(ctx.events.is_empty());
    }
}

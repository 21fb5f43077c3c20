//! Damage application and basic attacks

use crate::context::GameContext;
use crate::core::types::ActorId;
use crate::events::GameEvent;
use rand::Rng;

/// Result of one basic attack
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackOutcome {
    /// Outgoing damage before mitigation
    pub raw: f32,
    /// Health actually removed
    pub dealt: f32,
    pub critical: bool,
    pub killed: bool,
}

/// Roll a critical hit against `chance` (values above 1.0 always crit)
pub fn roll_critical(rng: &mut impl Rng, chance: f32) -> bool {
    chance > 0.0 && rng.gen::<f32>() < chance
}

/// Deal `raw` damage from `source` to `target` and emit the hit.
///
/// Returns health removed, or `None` if the target is missing or dead.
pub fn apply_damage(
    ctx: &mut GameContext,
    source: ActorId,
    target: ActorId,
    raw: f32,
    critical: bool,
) -> Option<f32> {
    let defender = ctx.actors.get_mut(target).filter(|a| a.is_alive())?;
    let dealt = defender.take_damage(raw);
    ctx.events.emit(GameEvent::DamageDealt { source, target, amount: dealt, critical });
    Some(dealt)
}

/// Basic attack from `attacker` on `defender`, starting the attacker's
/// basic-attack cooldown.
///
/// Does not check the cooldown itself; callers decide whether the attack
/// is allowed. Returns `None` if either side cannot act.
pub fn basic_attack(ctx: &mut GameContext, attacker: ActorId, defender: ActorId) -> Option<AttackOutcome> {
    let base_interval = ctx.config.basic_attack_interval_ms;
    if !ctx.actors.get(defender).is_some_and(|d| d.can_act()) {
        return None;
    }
    let (attack, crit_chance, crit_multiplier, interval) = {
        let a = ctx.actors.get(attacker).filter(|a| a.can_act())?;
        (a.attack(), a.crit_chance(), a.crit_multiplier(), a.basic_attack_interval(base_interval))
    };

    let critical = roll_critical(&mut ctx.rng, crit_chance);
    let raw = if critical { attack * crit_multiplier } else { attack };

    if let Some(a) = ctx.actors.get_mut(attacker) {
        a.action_cooldown = interval;
    }

    let dealt = apply_damage(ctx, attacker, defender, raw, critical)?;
    let killed = ctx.actors.get(defender).is_some_and(|d| !d.is_alive());

    Some(AttackOutcome { raw, dealt, critical, killed })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Vec2;
    use crate::entity::{Actor, Stats};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_crit_chance_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!((0..100).all(|_| !roll_critical(&mut rng, 0.0)));
        assert!((0..100).all(|_| roll_critical(&mut rng, 1.0)));
    }

    #[test]
    fn test_basic_attack_starts_cooldown() {
        let mut ctx = GameContext::default();
        let hero = ctx.actors.spawn(Actor::player(
            "Hero",
            Stats { crit_chance: 0.0, ..Stats::default() },
        ));
        let slime = ctx.actors.spawn(Actor::enemy("Slime", 1, Vec2::default()));

        let outcome = basic_attack(&mut ctx, hero, slime).unwrap();
        assert_eq!(outcome.raw, 10.0);
        assert!(!outcome.critical);
        assert!(outcome.dealt > 0.0);

        let hero = ctx.actors.get(hero).unwrap();
        assert_eq!(hero.action_cooldown, hero.basic_attack_interval(1000.0));
    }

    #[test]
    fn test_guaranteed_crit_multiplies() {
        let mut ctx = GameContext::default();
        let hero = ctx.actors.spawn(Actor::player(
            "Hero",
            Stats { crit_chance: 1.0, crit_multiplier: 2.0, ..Stats::default() },
        ));
        let slime = ctx.actors.spawn(Actor::enemy("Slime", 1, Vec2::default()));

        let outcome = basic_attack(&mut ctx, hero, slime).unwrap();
        assert!(outcome.critical);
        assert_eq!(outcome.raw, 20.0);
    }

    #[test]
    fn test_no_attack_on_dead_target() {
        let mut ctx = GameContext::default();
        let hero = ctx.actors.spawn(Actor::player("Hero", Stats::default()));
        let slime = ctx.actors.spawn(Actor::enemy("Slime", 1, Vec2::default()));
        ctx.actors.get_mut(slime).unwrap().stats.health = 0.0;

        assert!(basic_attack(&mut ctx, hero, slime).is_none());
        assert_eq!(ctx.actors.get(hero).unwrap().action_cooldown, 0.0);
        assert!(ctx.events.is_empty());
    }
}

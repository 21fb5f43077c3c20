//! Ability engine integration tests
//!
//! Drives skills through the coordinator so cooldowns, mana and status
//! effects are ticked by the registered ability subsystem.

use ouroboros_sim::coordinator::GameCoordinator;
use ouroboros_sim::core::types::{ActorId, Vec2};
use ouroboros_sim::entity::{Actor, StatField, Stats};
use ouroboros_sim::events::GameEvent;
use ouroboros_sim::skills::{Skill, SkillKind, TargetInfo};
use ouroboros_sim::status::{add_status_effect, ModifierOp, StatusEffect, StatusKind};
use proptest::prelude::*;

fn game_with(stats: Stats) -> (GameCoordinator, ActorId) {
    let mut game: GameCoordinator = GameCoordinator::default();
    let hero = game.start_game(Actor::player("Hero", stats)).unwrap();
    (game, hero)
}

fn cooldown(game: &GameCoordinator, hero: ActorId, skill: &str) -> f64 {
    game.abilities().get_skill_cooldown(hero, skill)
}

#[test]
fn test_cooldown_becomes_ready_exactly_at_duration() {
    let (mut game, hero) = game_with(Stats::default());
    assert!(game.use_skill("defend", &TargetInfo::none()));
    assert!(!game.abilities().is_skill_ready(hero, "defend"));
    assert_eq!(cooldown(&game, hero, "defend"), 12_000.0);

    let mut time = 0.0;
    for _ in 0..59 {
        time += 200.0;
        game.update(time, 200.0);
    }
    // 11800ms elapsed
    assert!(!game.abilities().is_skill_ready(hero, "defend"));
    assert!(!game.use_skill("defend", &TargetInfo::none()));

    game.update(time + 200.0, 200.0);
    assert!(game.abilities().is_skill_ready(hero, "defend"));
    assert!(game
        .drain_events()
        .iter()
        .any(|e| matches!(e, GameEvent::SkillReady { skill, .. } if skill == "defend")));
}

#[test]
fn test_failed_use_changes_nothing() {
    let (mut game, hero) = game_with(Stats { mana: 10.0, ..Stats::default() });
    let slime = game.spawn(Actor::enemy("Slime", 1, Vec2::new(5.0, 0.0)));
    let slime_health = game.context().actors.get(slime).unwrap().stats.health;

    // Unknown id
    assert!(!game.use_skill("fireball", &TargetInfo::actor(slime)));
    // Insufficient mana: cost 15 with 10 available
    assert!(!game.use_skill("recover", &TargetInfo::none()));

    let hero_actor = game.context().actors.get(hero).unwrap();
    assert_eq!(hero_actor.stats.mana, 10.0);
    assert_eq!(game.context().actors.get(slime).unwrap().stats.health, slime_health);
    assert!(game.abilities().is_skill_ready(hero, "recover"));

    // On cooldown
    assert!(game.use_skill("quick_strike", &TargetInfo::actor(slime)));
    let after_first = game.context().actors.get(slime).unwrap().stats.health;
    assert!(!game.use_skill("quick_strike", &TargetInfo::actor(slime)));
    assert_eq!(game.context().actors.get(slime).unwrap().stats.health, after_first);
}

#[test]
fn test_multi_strike_needs_enemy_in_radius() {
    let (mut game, hero) = game_with(Stats::default());
    game.spawn(Actor::enemy("Far", 1, Vec2::new(200.0, 0.0)));
    game.drain_events();

    assert!(!game.use_skill("multi_strike", &TargetInfo::point(Vec2::default())));
    assert!(game.abilities().is_skill_ready(hero, "multi_strike"));
    assert_eq!(game.player().unwrap().stats.mana, 50.0);
    assert!(!game
        .drain_events()
        .iter()
        .any(|e| matches!(e, GameEvent::DamageDealt { .. })));
}

#[test]
fn test_multi_strike_hits_all_nearby() {
    let (mut game, _) = game_with(Stats::default());
    let near = game.spawn(Actor::enemy("Near", 1, Vec2::new(30.0, 0.0)));
    let edge = game.spawn(Actor::enemy("Edge", 1, Vec2::new(0.0, 80.0)));
    let far = game.spawn(Actor::enemy("Far", 1, Vec2::new(81.0, 0.0)));

    assert!(game.use_skill("multi_strike", &TargetInfo::point(Vec2::default())));
    let health = |id| game.context().actors.get(id).unwrap().stats.health;
    assert!(health(near) < 40.0);
    assert!(health(edge) < 40.0);
    assert_eq!(health(far), 40.0);
}

#[test]
fn test_overlapping_effects_restore_exactly() {
    let (mut game, hero) = game_with(Stats::default());
    let base_defense = game.player().unwrap().effective(StatField::Defense);
    {
        let ctx = game.context_mut();
        let actor = ctx.actors.get_mut(hero).unwrap();
        add_status_effect(
            actor,
            StatusEffect::new(
                "fortify",
                3000.0,
                StatusKind::Modify(vec![(StatField::Defense, ModifierOp::Add(4.0))]),
            ),
            &mut ctx.events,
        );
    }
    assert!(game.use_skill("defend", &TargetInfo::none()));
    assert_eq!(game.player().unwrap().effective(StatField::Defense), (base_defense + 4.0) * 1.5);

    for step in 1..=12 {
        game.update(step as f64 * 250.0, 250.0);
    }
    // fortify (3s) has ended, defend (5s) is still up
    assert_eq!(game.player().unwrap().effective(StatField::Defense), base_defense * 1.5);

    for step in 13..=20 {
        game.update(step as f64 * 250.0, 250.0);
    }
    assert_eq!(game.player().unwrap().effective(StatField::Defense), base_defense);
    assert!(game.player().unwrap().modifiers.is_empty());
}

#[test]
fn test_custom_skill_added_at_runtime() {
    let (mut game, hero) = game_with(Stats::default());
    let slime = game.spawn(Actor::enemy("Slime", 1, Vec2::default()));
    let mut skill = Skill::from_kind(SkillKind::QuickStrike);
    skill.id = "jab".to_string();
    skill.cooldown_ms = 500.0;

    assert!(game.add_skill(hero, skill.clone()));
    assert!(!game.add_skill(hero, skill));
    assert!(game.use_skill("jab", &TargetInfo::actor(slime)));
    assert_eq!(cooldown(&game, hero, "jab"), 500.0);
}

proptest! {
    #[test]
    fn prop_cooldown_never_ready_early(deltas in prop::collection::vec(1.0f64..400.0, 1..80)) {
        let (mut game, hero) = game_with(Stats::default());
        prop_assert!(game.use_skill("recover", &TargetInfo::none()));
        let duration = SkillKind::Recover.default_cooldown_ms();

        let mut elapsed = 0.0;
        let mut last_remaining = duration;
        for delta in deltas {
            elapsed += delta;
            game.update(elapsed, delta);
            let remaining = cooldown(&game, hero, "recover");
            prop_assert!(remaining <= last_remaining);
            // Ready iff the clamped deltas summed to the full duration
            prop_assert_eq!(game.abilities().is_skill_ready(hero, "recover"), remaining == 0.0);
            if elapsed < duration {
                prop_assert!(!game.abilities().is_skill_ready(hero, "recover"));
            }
            last_remaining = remaining;
        }
    }
}

//! Combat subsystem
//!
//! Keeps the active-combat set and resolves it every tick:
//! basic-attack cooldowns tick down, enemies strike when ready, the player
//! strikes automatically in auto mode, and finished combats are removed.

use crate::combat::damage::basic_attack;
use crate::combat::flee::flee_chance;
use crate::context::{GameContext, Signal};
use crate::core::scheduler::DeferredTask;
use crate::core::types::{ActorId, CombatId, Millis};
use crate::entity::{grant_reward, ActorKind};
use crate::events::{CombatOutcome, GameEvent};
use crate::registry::{
    InitData, Initializable, ReferenceSync, Resettable, SubsystemHandle, SubsystemRegistry, Updatable,
};
use crate::skills::{AbilitySystem, ABILITY_SYSTEM};
use rand::Rng;
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

/// Registry name of the combat subsystem
pub const COMBAT_SYSTEM: &str = "combat";

/// One fight in the active-combat set
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Combat {
    pub id: CombatId,
    pub attacker: ActorId,
    pub defender: ActorId,
    pub auto_mode: bool,
}

impl Combat {
    pub fn involves(&self, actor: ActorId) -> bool {
        self.attacker == actor || self.defender == actor
    }

    fn opponent_of(&self, actor: ActorId) -> ActorId {
        if self.attacker == actor {
            self.defender
        } else {
            self.attacker
        }
    }
}

pub struct CombatSystem {
    combats: BTreeMap<CombatId, Combat>,
    next_id: u64,
    auto_combat: bool,
    player: Option<ActorId>,
    abilities: Option<Rc<RefCell<AbilitySystem>>>,
}

impl CombatSystem {
    pub fn new() -> Self {
        Self {
            combats: BTreeMap::new(),
            next_id: 0,
            auto_combat: true,
            player: None,
            abilities: None,
        }
    }

    /// Handle exposing every capability this subsystem implements
    pub fn handle(system: &Rc<RefCell<Self>>) -> SubsystemHandle {
        SubsystemHandle::builder(COMBAT_SYSTEM, system.clone())
            .initialize()
            .update()
            .reset()
            .sync()
            .build()
    }

    /// Open a combat between two hostile, active actors.
    ///
    /// Player-initiated combats inherit the current auto-combat setting.
    pub fn start_combat(&mut self, ctx: &mut GameContext, attacker: ActorId, defender: ActorId) -> Option<CombatId> {
        let a = ctx.actors.get(attacker).filter(|a| a.can_act())?;
        let d = ctx.actors.get(defender).filter(|d| d.can_act())?;
        if attacker == defender || !a.kind.is_hostile_to(d.kind) {
            return None;
        }

        let id = CombatId(self.next_id);
        self.next_id += 1;
        let auto_mode = a.kind == ActorKind::Player && self.auto_combat;
        tracing::debug!("Combat {:?}: {} vs {}", id, a.name, d.name);

        self.combats.insert(id, Combat { id, attacker, defender, auto_mode });
        ctx.events.emit(GameEvent::CombatStarted { combat: id, attacker, defender });
        Some(id)
    }

    pub fn combat(&self, id: CombatId) -> Option<&Combat> {
        self.combats.get(&id)
    }

    pub fn combats(&self) -> impl Iterator<Item = &Combat> {
        self.combats.values()
    }

    pub fn active_count(&self) -> usize {
        self.combats.len()
    }

    /// Oldest combat `actor` is part of
    pub fn combat_for(&self, actor: ActorId) -> Option<CombatId> {
        self.combats.values().find(|c| c.involves(actor)).map(|c| c.id)
    }

    pub fn auto_combat(&self) -> bool {
        self.auto_combat
    }

    /// Flip auto-combat and apply it to the player's open combats.
    /// Returns the new setting.
    pub fn toggle_auto_combat(&mut self) -> bool {
        self.auto_combat = !self.auto_combat;
        let player = self.player;
        for combat in self.combats.values_mut() {
            if Some(combat.attacker) == player {
                combat.auto_mode = self.auto_combat;
            }
        }
        tracing::debug!("Auto-combat {}", if self.auto_combat { "on" } else { "off" });
        self.auto_combat
    }

    /// Manual basic attack by the attacker of `id`, if its cooldown allows
    pub fn attack(&mut self, ctx: &mut GameContext, id: CombatId) -> bool {
        let Some(combat) = self.combats.get(&id).copied() else {
            return false;
        };
        let ready = ctx.actors.get(combat.attacker).is_some_and(|a| a.action_cooldown <= 0.0);
        if !ready || basic_attack(ctx, combat.attacker, combat.defender).is_none() {
            return false;
        }
        self.resolve_deaths(ctx);
        true
    }

    /// Try to escape combat `id` as the player, whichever side they are on.
    /// Combats without the player are fled by their attacker. Returns
    /// whether the attempt succeeded.
    ///
    /// On failure the opponent counter-attacks after the configured delay.
    /// The counter-attack is queued on the virtual clock and is not
    /// cancelled by pausing.
    pub fn attempt_flee(&mut self, ctx: &mut GameContext, id: CombatId) -> bool {
        let Some(combat) = self.combats.get(&id).copied() else {
            return false;
        };
        let fleer_id = match self.player {
            Some(player) if combat.involves(player) => player,
            _ => combat.attacker,
        };
        let opponent_id = combat.opponent_of(fleer_id);
        let (Some(fleer), Some(opponent)) = (ctx.actors.get(fleer_id), ctx.actors.get(opponent_id)) else {
            return false;
        };

        let chance = flee_chance(&ctx.config, fleer.speed(), opponent.speed(), opponent.is_boss);
        let success = ctx.rng.gen::<f32>() < chance;
        ctx.events.emit(GameEvent::FleeResult { combat: id, success, chance });

        if success {
            tracing::info!("Fled combat {:?} ({:.0}% chance)", id, chance * 100.0);
            self.end_combat(ctx, id, CombatOutcome::Fled);
        } else {
            let delay = ctx.config.counter_attack_delay_ms;
            ctx.scheduler.schedule(
                delay,
                DeferredTask::CounterAttack {
                    combat: id,
                    attacker: opponent_id,
                    defender: fleer_id,
                },
            );
        }
        success
    }

    /// Deferred strike after a failed flee. Re-checks that the combat and
    /// both participants are still in play; ignores the attacker's cooldown.
    pub fn resolve_counter_attack(
        &mut self,
        ctx: &mut GameContext,
        id: CombatId,
        attacker: ActorId,
        defender: ActorId,
    ) -> bool {
        if !self.combats.contains_key(&id) {
            return false;
        }
        if basic_attack(ctx, attacker, defender).is_none() {
            return false;
        }
        self.resolve_deaths(ctx);
        true
    }

    fn end_combat(&mut self, ctx: &mut GameContext, id: CombatId, outcome: CombatOutcome) {
        if self.combats.remove(&id).is_some() {
            ctx.events.emit(GameEvent::CombatEnded { combat: id, outcome });
        }
    }

    /// Remove combats whose participants left the world
    fn drop_abandoned(&mut self, ctx: &mut GameContext) {
        let abandoned: Vec<CombatId> = self
            .combats
            .values()
            .filter(|c| !ctx.actors.contains(c.attacker) || !ctx.actors.contains(c.defender))
            .map(|c| c.id)
            .collect();
        for id in abandoned {
            self.end_combat(ctx, id, CombatOutcome::Abandoned);
        }
    }

    /// End combats with a dead participant and pay out kills
    fn resolve_deaths(&mut self, ctx: &mut GameContext) {
        let ids: Vec<CombatId> = self.combats.keys().copied().collect();
        for id in ids {
            let Some(combat) = self.combats.get(&id).copied() else {
                continue;
            };
            let dead = [combat.attacker, combat.defender]
                .into_iter()
                .find(|actor| ctx.actors.get(*actor).is_some_and(|a| !a.is_alive()));
            let Some(dead) = dead else {
                continue;
            };

            if Some(dead) == self.player {
                self.end_combat(ctx, id, CombatOutcome::Defeat);
                ctx.raise(Signal::PlayerDied);
                continue;
            }

            let killer = combat.opponent_of(dead);
            let bounty = match ctx.actors.get_mut(dead) {
                Some(victim) => {
                    victim.active = false;
                    std::mem::take(&mut victim.bounty)
                }
                None => continue,
            };
            if let Some(abilities) = &self.abilities {
                abilities.borrow_mut().remove_engine(dead);
            }
            self.end_combat(ctx, id, CombatOutcome::Victory);

            if Some(killer) == self.player && !bounty.is_empty() {
                if let Some(player) = ctx.actors.get_mut(killer) {
                    grant_reward(player, &bounty, &mut ctx.events);
                }
            }
        }
    }
}

impl Default for CombatSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Initializable for CombatSystem {
    fn initialize(&mut self, ctx: &mut GameContext, data: &InitData) {
        self.player = Some(data.player);
        self.auto_combat = ctx.config.auto_combat;
    }
}

impl Updatable for CombatSystem {
    fn update(&mut self, ctx: &mut GameContext, _time: Millis, delta: Millis) {
        for actor in ctx.actors.iter_mut() {
            actor.action_cooldown = (actor.action_cooldown - delta).max(0.0);
        }

        self.drop_abandoned(ctx);

        let combats: Vec<Combat> = self.combats.values().copied().collect();
        for combat in combats {
            if !self.combats.contains_key(&combat.id) {
                continue;
            }

            // Auto-combat: the player strikes whenever the cooldown allows
            let player_attacks = combat.auto_mode
                && Some(combat.attacker) == self.player
                && ctx.actors.get(combat.attacker).is_some_and(|a| a.can_act() && a.action_cooldown <= 0.0);
            if player_attacks {
                basic_attack(ctx, combat.attacker, combat.defender);
            }

            // Non-player participants always strike back when ready
            for actor in [combat.attacker, combat.defender] {
                if Some(actor) == self.player {
                    continue;
                }
                let ready = ctx.actors.get(actor).is_some_and(|a| a.can_act() && a.action_cooldown <= 0.0);
                if ready {
                    basic_attack(ctx, actor, combat.opponent_of(actor));
                }
            }

            self.resolve_deaths(ctx);
        }
    }
}

impl Resettable for CombatSystem {
    fn reset(&mut self, _ctx: &mut GameContext) {
        self.combats.clear();
        self.next_id = 0;
        self.player = None;
        tracing::debug!("Combat system reset");
    }
}

impl ReferenceSync for CombatSystem {
    fn sync_references(&mut self, registry: &SubsystemRegistry) {
        self.abilities = registry.resolve::<AbilitySystem>(ABILITY_SYSTEM);
        if self.abilities.is_none() {
            tracing::warn!("Combat system running without an ability system");
        }
    }
}

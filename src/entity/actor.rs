//! Actors: the player and the enemies they fight

use crate::core::types::{ActorId, Millis, RewardBundle, Vec2};
use crate::entity::stats::{StatField, Stats};
use crate::status::{ActiveEffects, StatModifiers};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActorKind {
    Player,
    Enemy,
}

impl ActorKind {
    /// Whether actors of this kind fight actors of `other`
    pub fn is_hostile_to(self, other: ActorKind) -> bool {
        self != other
    }
}

#[derive(Debug, Clone)]
pub struct Actor {
    pub id: ActorId,
    pub kind: ActorKind,
    pub name: String,
    pub position: Vec2,
    pub stats: Stats,
    /// Milliseconds until the next basic attack is allowed
    pub action_cooldown: Millis,
    /// Inactive actors are ignored by skills and combat
    pub active: bool,
    pub is_boss: bool,
    /// Paid to the killer (enemies only)
    pub bounty: RewardBundle,
    pub effects: ActiveEffects,
    pub modifiers: StatModifiers,
}

impl Actor {
    pub fn new(kind: ActorKind, name: impl Into<String>, stats: Stats) -> Self {
        Self {
            id: ActorId::new(),
            kind,
            name: name.into(),
            position: Vec2::default(),
            stats,
            action_cooldown: 0.0,
            active: true,
            is_boss: false,
            bounty: RewardBundle::default(),
            effects: ActiveEffects::new(),
            modifiers: StatModifiers::new(),
        }
    }

    pub fn player(name: impl Into<String>, stats: Stats) -> Self {
        Self::new(ActorKind::Player, name, stats)
    }

    /// Enemy of `level` at `position`, paying a level-scaled bounty
    pub fn enemy(name: impl Into<String>, level: u32, position: Vec2) -> Self {
        let mut actor = Self::new(ActorKind::Enemy, name, Stats::enemy(level));
        actor.position = position;
        actor.bounty = RewardBundle::new(3 + 2 * level, 10 + 5 * level);
        actor
    }

    pub fn with_position(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    pub fn as_boss(mut self) -> Self {
        self.is_boss = true;
        self
    }

    pub fn is_alive(&self) -> bool {
        self.stats.health > 0.0
    }

    /// Alive and not deactivated
    pub fn can_act(&self) -> bool {
        self.active && self.is_alive()
    }

    /// Base stat folded through active modifiers
    pub fn effective(&self, field: StatField) -> f32 {
        self.modifiers.apply(field, self.stats.base(field))
    }

    pub fn attack(&self) -> f32 {
        self.effective(StatField::Attack)
    }

    pub fn defense(&self) -> f32 {
        self.effective(StatField::Defense)
    }

    pub fn speed(&self) -> f32 {
        self.effective(StatField::Speed)
    }

    pub fn crit_chance(&self) -> f32 {
        self.effective(StatField::CritChance)
    }

    pub fn crit_multiplier(&self) -> f32 {
        self.effective(StatField::CritMultiplier)
    }

    /// Apply raw damage after defense mitigation; returns health lost
    pub fn take_damage(&mut self, raw: f32) -> f32 {
        if raw <= 0.0 || !self.is_alive() {
            return 0.0;
        }
        let mitigated = raw * 100.0 / (100.0 + self.defense().max(0.0));
        let lost = mitigated.min(self.stats.health);
        self.stats.health -= lost;
        lost
    }

    /// Heal up to max health; returns health restored
    pub fn heal(&mut self, amount: f32) -> f32 {
        if amount <= 0.0 {
            return 0.0;
        }
        let restored = amount.min(self.stats.max_health - self.stats.health).max(0.0);
        self.stats.health += restored;
        restored
    }

    pub fn can_afford(&self, mana_cost: f32) -> bool {
        self.stats.mana >= mana_cost
    }

    /// Interval between basic attacks for this actor's current speed
    pub fn basic_attack_interval(&self, base_interval: Millis) -> Millis {
        base_interval / (1.0 + self.speed().max(0.0) as f64 * 0.1)
    }
}

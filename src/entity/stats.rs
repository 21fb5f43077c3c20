//! Actor stat block

use serde::{Deserialize, Serialize};

/// Stat fields that status effects may modify
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatField {
    Attack,
    Defense,
    Speed,
    CritChance,
    CritMultiplier,
}

/// Base stats of an actor
///
/// These are the unmodified values. Status effects never write here; the
/// effective value of a [`StatField`] is computed on demand by
/// [`Actor::effective`](crate::entity::Actor::effective).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub health: f32,
    pub max_health: f32,
    pub attack: f32,
    pub defense: f32,
    pub speed: f32,
    /// 0.0 to 1.0
    pub crit_chance: f32,
    pub crit_multiplier: f32,
    pub mana: f32,
    pub max_mana: f32,
    pub gold: u32,
    pub level: u32,
    pub experience: u32,
    pub experience_to_next_level: u32,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            health: 100.0,
            max_health: 100.0,
            attack: 10.0,
            defense: 5.0,
            speed: 1.0,
            crit_chance: 0.1,
            crit_multiplier: 1.5,
            mana: 50.0,
            max_mana: 50.0,
            gold: 0,
            level: 1,
            experience: 0,
            experience_to_next_level: 100,
        }
    }
}

impl Stats {
    /// Raw value of a modifiable field
    pub fn base(&self, field: StatField) -> f32 {
        match field {
            StatField::Attack => self.attack,
            StatField::Defense => self.defense,
            StatField::Speed => self.speed,
            StatField::CritChance => self.crit_chance,
            StatField::CritMultiplier => self.crit_multiplier,
        }
    }

    /// Stat block for a basic enemy of the given level
    pub fn enemy(level: u32) -> Self {
        let level = level.max(1);
        let scale = level as f32;
        Self {
            health: 30.0 + 10.0 * scale,
            max_health: 30.0 + 10.0 * scale,
            attack: 4.0 + 2.0 * scale,
            defense: 1.0 + scale,
            speed: 1.0,
            crit_chance: 0.05,
            crit_multiplier: 1.5,
            mana: 0.0,
            max_mana: 0.0,
            gold: 0,
            level,
            experience: 0,
            experience_to_next_level: 0,
        }
    }

    /// Add experience, levelling up as many times as it covers.
    ///
    /// Returns the levels reached, in order.
    pub fn gain_experience(&mut self, amount: u32) -> Vec<u32> {
        self.experience = self.experience.saturating_add(amount);
        let mut reached = Vec::new();

        while self.experience_to_next_level > 0 && self.experience >= self.experience_to_next_level {
            self.experience -= self.experience_to_next_level;
            self.level += 1;
            self.experience_to_next_level = (self.experience_to_next_level as f32 * 1.5).floor() as u32;

            self.max_health += 10.0;
            self.attack += 2.0;
            self.defense += 1.0;
            self.health = self.max_health;
            reached.push(self.level);
        }

        reached
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gain_experience_without_level() {
        let mut stats = Stats::default();
        assert!(stats.gain_experience(40).is_empty());
        assert_eq!(stats.experience, 40);
        assert_eq!(stats.level, 1);
    }

    #[test]
    fn test_gain_experience_multiple_levels() {
        let mut stats = Stats::default();
        stats.health = 10.0;

        // 100 to reach 2, then 150 to reach 3
        let levels = stats.gain_experience(260);
        assert_eq!(levels, vec![2, 3]);
        assert_eq!(stats.experience, 10);
        assert_eq!(stats.experience_to_next_level, 225);
        assert_eq!(stats.max_health, 120.0);
        assert_eq!(stats.health, stats.max_health);
    }

    #[test]
    fn test_enemy_scales_with_level() {
        let weak = Stats::enemy(1);
        let strong = Stats::enemy(5);
        assert!(strong.max_health > weak.max_health);
        assert!(strong.attack > weak.attack);
    }
}

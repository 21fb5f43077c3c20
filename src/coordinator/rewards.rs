//! Loop rewards and the snapshot handed to the base scene

use crate::core::error::{Result, SimError};
use crate::core::types::RewardBundle;
use crate::entity::Actor;
use serde::{Deserialize, Serialize};

/// Reward for completing loop number `loop_count` at player `level`.
///
/// gold = floor((10 + 5L) * (1 + 0.1N)), xp = floor((5 + 3L) * (1 + 0.05N)),
/// computed in integers so the floor is exact.
pub fn compute_loop_reward(level: u32, loop_count: u32) -> RewardBundle {
    let level = u64::from(level.max(1));
    let loops = u64::from(loop_count);
    let gold = (10 + 5 * level) * (10 + loops) / 10;
    let experience = (5 + 3 * level) * (20 + loops) / 20;
    RewardBundle::new(saturate(gold), saturate(experience))
}

fn saturate(value: u64) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}

/// Primitive-only copy of the player's progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub health: f32,
    pub max_health: f32,
    pub attack: f32,
    pub defense: f32,
    pub speed: f32,
    pub level: u32,
    pub experience: u32,
    pub experience_to_next_level: u32,
    pub gold: u32,
}

impl PlayerSnapshot {
    /// Capture `actor`, rejecting stats that cannot be carried over
    pub fn capture(actor: &Actor) -> Result<Self> {
        let s = &actor.stats;
        let floats = [s.health, s.max_health, s.attack, s.defense, s.speed];
        if floats.iter().any(|v| !v.is_finite()) {
            return Err(SimError::InvalidSnapshot(format!("non-finite stats on {}", actor.name)));
        }
        if s.max_health <= 0.0 {
            return Err(SimError::InvalidSnapshot(format!("{} has no max health", actor.name)));
        }

        Ok(Self {
            health: s.health,
            max_health: s.max_health,
            attack: s.attack,
            defense: s.defense,
            speed: s.speed,
            level: s.level,
            experience: s.experience,
            experience_to_next_level: s.experience_to_next_level,
            gold: s.gold,
        })
    }

    /// Fresh level-1 snapshot used when the real player cannot be captured
    pub fn fallback(health: f32) -> Self {
        let base = crate::entity::Stats::default();
        Self {
            health,
            max_health: health,
            attack: base.attack,
            defense: base.defense,
            speed: base.speed,
            level: 1,
            experience: 0,
            experience_to_next_level: base.experience_to_next_level,
            gold: 0,
        }
    }
}

/// Everything the base scene receives when a loop completes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionSnapshot {
    pub loop_number: u32,
    pub player: PlayerSnapshot,
    pub reward: RewardBundle,
    /// Set when `player` is the fallback rather than a real capture
    pub degraded: bool,
}

impl TransitionSnapshot {
    pub fn fallback(loop_number: u32, reward: RewardBundle, health: f32) -> Self {
        Self {
            loop_number,
            player: PlayerSnapshot::fallback(health),
            reward,
            degraded: true,
        }
    }
}

/// Build the transition snapshot from the current player, if any
pub fn compose_snapshot(player: Option<&Actor>, loop_number: u32, reward: &RewardBundle) -> Result<TransitionSnapshot> {
    let player = player.ok_or(SimError::NoPlayer)?;
    Ok(TransitionSnapshot {
        loop_number,
        player: PlayerSnapshot::capture(player)?,
        reward: reward.clone(),
        degraded: false,
    })
}

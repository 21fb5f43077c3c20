//! Core type definitions used throughout the codebase

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for actors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ActorId(pub Uuid);

impl ActorId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ActorId {
    fn default() -> Self {
        Self::new()
    }
}

/// Identifier for an entry in the active-combat set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CombatId(pub u64);

/// Virtual time in milliseconds
pub type Millis = f64;

/// 2D position
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        (dx * dx + dy * dy).sqrt()
    }

    /// Inclusive radius check
    pub fn within(&self, other: &Self, radius: f32) -> bool {
        self.distance(other) <= radius
    }
}

/// Gold, experience and items granted on loop completion or kills
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardBundle {
    pub gold: u32,
    pub experience: u32,
    pub items: Vec<String>,
}

impl RewardBundle {
    pub fn new(gold: u32, experience: u32) -> Self {
        Self { gold, experience, items: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.gold == 0 && self.experience == 0 && self.items.is_empty()
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_actor_id_unique() {
        assert_ne!(ActorId::new(), ActorId::new());
    }

    #[test]
    fn test_within_radius_is_inclusive() {
        let a = Vec2::new(0.0, 0.0);
        let b = Vec2::new(80.0, 0.0);
        assert!(a.within(&b, 80.0));
        assert!(!a.within(&Vec2::new(80.5, 0.0), 80.0));
    }

    #[test]
    fn test_offset_position() {
        let spawn = Vec2::new(3.0, -1.0) + Vec2::new(10.0, 0.0);
        assert_eq!(spawn, Vec2::new(13.0, -1.0));
    }

    #[test]
    fn test_combat_id_ordering() {
        assert!(CombatId(1) < CombatId(2));
    }
}

//! Ability and cooldown engine
//!
//! Actors own a catalog of skills. Using one is all-or-nothing: the effect
//! runs first, and only when it succeeds are the cooldown started and the
//! mana cost paid.

pub mod cooldown;
pub mod engine;
pub mod resolver;
pub mod skill;
pub mod system;

pub use cooldown::CooldownTimers;
pub use engine::AbilityEngine;
pub use skill::{Skill, SkillKind, TargetInfo};
pub use system::{AbilitySystem, ABILITY_SYSTEM};

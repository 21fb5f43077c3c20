//! Ouroboros - simulation core for a real-time RPG loop game
//!
//! A [`GameCoordinator`](coordinator::GameCoordinator) drives registered
//! subsystems on a shared virtual clock. Built-in subsystems resolve
//! skills, cooldowns, status effects and combat.

pub mod combat;
pub mod context;
pub mod coordinator;
pub mod core;
pub mod entity;
pub mod events;
pub mod registry;
pub mod skills;
pub mod status;

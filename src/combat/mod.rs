//! Real-time combat: basic attacks, fleeing and the active-combat set

pub mod damage;
pub mod flee;
pub mod system;

pub use damage::{apply_damage, basic_attack, AttackOutcome};
pub use flee::flee_chance;
pub use system::{Combat, CombatSystem, COMBAT_SYSTEM};

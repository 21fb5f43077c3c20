pub mod actor;
pub mod reward;
pub mod stats;
pub mod world;

pub use actor::{Actor, ActorKind};
pub use reward::grant_reward;
pub use stats::{StatField, Stats};
pub use world::ActorStore;

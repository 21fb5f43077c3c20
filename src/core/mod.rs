pub mod config;
pub mod error;
pub mod scheduler;
pub mod types;

pub use config::{GameConfig, TickDeltaPolicy};
pub use scheduler::{DeferredTask, Scheduler};

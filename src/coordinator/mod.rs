//! Game coordinator: state machine, loop rewards and scene handoff

pub mod game;
pub mod rate_limit;
pub mod rewards;
pub mod scene;
pub mod state;

pub use game::GameCoordinator;
pub use rate_limit::LoopRateLimiter;
pub use rewards::{compose_snapshot, compute_loop_reward, PlayerSnapshot, TransitionSnapshot};
pub use scene::{RecordingScene, SceneHost};
pub use state::GameState;

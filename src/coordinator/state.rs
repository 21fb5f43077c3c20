//! Game-state machine values

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GameState {
    #[default]
    Initializing,
    Playing,
    Paused,
    Defeat,
    Victory,
}

impl GameState {
    /// A run is in progress (pause and speed changes are allowed)
    pub fn is_running(self) -> bool {
        matches!(self, GameState::Playing | GameState::Paused)
    }

    /// The run has ended and only a restart leaves this state
    pub fn is_over(self) -> bool {
        matches!(self, GameState::Defeat | GameState::Victory)
    }
}

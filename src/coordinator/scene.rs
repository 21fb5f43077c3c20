//! Scene-host boundary
//!
//! Rendering and scene choreography live outside the core. The coordinator
//! only tells the host when to enter the base scene and when to restart.

use crate::coordinator::rewards::TransitionSnapshot;

pub trait SceneHost {
    /// Called once per completed loop, after the transition delay
    fn enter_base(&mut self, snapshot: TransitionSnapshot);

    /// Called when a finished run is restarted
    fn restart_scene(&mut self);
}

/// Headless host that records every handoff
#[derive(Debug, Clone, Default)]
pub struct RecordingScene {
    pub entered: Vec<TransitionSnapshot>,
    pub restarts: u32,
}

impl RecordingScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_snapshot(&self) -> Option<&TransitionSnapshot> {
        self.entered.last()
    }
}

impl SceneHost for RecordingScene {
    fn enter_base(&mut self, snapshot: TransitionSnapshot) {
        tracing::debug!("Entering base after loop {}", snapshot.loop_number);
        self.entered.push(snapshot);
    }

    fn restart_scene(&mut self) {
        self.restarts += 1;
    }
}

//! Game configuration with documented constants
//!
//! All tuning numbers for timing, throttling, combat and rewards are
//! collected here. The config is passed explicitly into the
//! [`GameContext`](crate::context::GameContext); there is no global copy.

use crate::core::error::{Result, SimError};
use crate::core::types::Millis;
use crate::skills::SkillKind;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How the registry derives the delta handed to subsystems each tick.
///
/// Exactly one policy is in effect per registry and it is applied once per
/// tick, so every subsystem sees the same value.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum TickDeltaPolicy {
    /// Pass the supplied (speed-scaled) delta through, optionally clamped
    /// to `max_delta_ms` to dampen frame-drop spikes.
    Forward { max_delta_ms: Option<Millis> },
    /// Ignore real elapsed time and always hand out `nominal_ms`.
    ///
    /// Intended for diagnostics and degraded-mode runs only.
    Fixed { nominal_ms: Millis },
}

impl TickDeltaPolicy {
    /// Resolve the per-tick delta from the supplied one
    pub fn apply(&self, delta: Millis) -> Millis {
        match *self {
            TickDeltaPolicy::Forward { max_delta_ms } => {
                let delta = delta.max(0.0);
                match max_delta_ms {
                    Some(max) => delta.min(max),
                    None => delta,
                }
            }
            TickDeltaPolicy::Fixed { nominal_ms } => nominal_ms,
        }
    }
}

impl Default for TickDeltaPolicy {
    fn default() -> Self {
        TickDeltaPolicy::Forward { max_delta_ms: Some(250.0) }
    }
}

/// Configuration for the simulation core
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seed for the context RNG (crits, flee rolls)
    pub seed: u64,

    // === TIMING ===
    /// Raw deltas above this are logged as likely dropped frames
    ///
    /// Not fatal. The tick still runs, subject to the delta policy clamp.
    pub anomaly_threshold_ms: Millis,

    /// Delta policy applied by the registry once per tick
    pub delta_policy: TickDeltaPolicy,

    /// Delay between a loop completing and the base transition firing
    pub loop_transition_delay_ms: Millis,

    // === LOOP RATE LIMITER ===
    /// Length of the rolling window loop completions are counted in
    pub rate_window_ms: Millis,

    /// Completions allowed inside one window before throttling kicks in
    ///
    /// The breach happens on the completion that pushes the count past
    /// this value (101st with the default).
    pub rate_limit_max_loops: usize,

    /// Factor applied to the speed multiplier on a breach (0.8 = -20%)
    pub rate_slowdown_factor: f64,

    /// Throttling never pushes the speed multiplier below this
    pub min_throttled_speed: f64,

    // === COMBAT ===
    /// Basic attack interval at speed 0
    ///
    /// Effective interval is `basic_attack_interval_ms / (1 + speed * 0.1)`.
    pub basic_attack_interval_ms: Millis,

    /// Delay before a defender counter-attacks after a failed flee
    pub counter_attack_delay_ms: Millis,

    /// Flee chance before the speed differential is added
    pub flee_base_chance: f32,

    /// Flee chance gained per point of speed advantage
    pub flee_speed_factor: f32,

    /// Multiplier applied to the flee chance when fleeing a boss
    pub flee_boss_factor: f32,

    /// Lower clamp for the flee chance
    pub flee_min_chance: f32,

    /// Upper clamp for the flee chance
    pub flee_max_chance: f32,

    /// Whether new player combats start in auto mode
    pub auto_combat: bool,

    // === ABILITIES ===
    /// Mana regenerated per second of simulation time
    pub mana_regen_per_sec: f32,

    /// Skills granted to the player on game start
    pub starting_skills: Vec<SkillKind>,

    // === REWARDS ===
    /// Health used by the fallback snapshot when the player cannot be read
    pub fallback_health: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            seed: 42,

            anomaly_threshold_ms: 500.0,
            delta_policy: TickDeltaPolicy::default(),
            loop_transition_delay_ms: 2000.0,

            rate_window_ms: 60_000.0,
            rate_limit_max_loops: 100,
            rate_slowdown_factor: 0.8,
            min_throttled_speed: 0.5,

            basic_attack_interval_ms: 1000.0,
            counter_attack_delay_ms: 200.0,
            flee_base_chance: 0.6,
            flee_speed_factor: 0.1,
            flee_boss_factor: 0.5,
            flee_min_chance: 0.1,
            flee_max_chance: 0.9,
            auto_combat: true,

            mana_regen_per_sec: 1.0,
            starting_skills: SkillKind::all().to_vec(),

            fallback_health: 100.0,
        }
    }
}

impl GameConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a config from TOML; missing keys fall back to defaults
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: GameConfig = toml::from_str(content)?;
        config.validate().map_err(SimError::InvalidConfig)?;
        Ok(config)
    }

    /// Load a config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> std::result::Result<(), String> {
        let policy_ms = match self.delta_policy {
            TickDeltaPolicy::Forward { max_delta_ms } => max_delta_ms.unwrap_or(0.0),
            TickDeltaPolicy::Fixed { nominal_ms } => nominal_ms,
        };
        let floats = [
            ("anomaly_threshold_ms", self.anomaly_threshold_ms),
            ("delta_policy", policy_ms),
            ("loop_transition_delay_ms", self.loop_transition_delay_ms),
            ("rate_window_ms", self.rate_window_ms),
            ("rate_slowdown_factor", self.rate_slowdown_factor),
            ("min_throttled_speed", self.min_throttled_speed),
            ("basic_attack_interval_ms", self.basic_attack_interval_ms),
            ("counter_attack_delay_ms", self.counter_attack_delay_ms),
            ("flee_base_chance", f64::from(self.flee_base_chance)),
            ("flee_speed_factor", f64::from(self.flee_speed_factor)),
            ("flee_boss_factor", f64::from(self.flee_boss_factor)),
            ("mana_regen_per_sec", f64::from(self.mana_regen_per_sec)),
            ("fallback_health", f64::from(self.fallback_health)),
        ];
        if let Some((name, value)) = floats.iter().find(|(_, value)| !value.is_finite()) {
            return Err(format!("{name} ({value}) must be finite"));
        }

        if !(0.0..=1.0).contains(&self.flee_min_chance)
            || !(0.0..=1.0).contains(&self.flee_max_chance)
            || self.flee_min_chance > self.flee_max_chance
        {
            return Err(format!(
                "flee bounds [{}, {}] must be ordered and inside [0, 1]",
                self.flee_min_chance, self.flee_max_chance
            ));
        }

        if self.rate_slowdown_factor <= 0.0 || self.rate_slowdown_factor >= 1.0 {
            return Err(format!(
                "rate_slowdown_factor ({}) must be in (0, 1)",
                self.rate_slowdown_factor
            ));
        }

        if self.min_throttled_speed <= 0.0 {
            return Err("min_throttled_speed must be positive".into());
        }

        if self.rate_window_ms <= 0.0 || self.rate_limit_max_loops == 0 {
            return Err("rate limiter window and limit must be positive".into());
        }

        if self.basic_attack_interval_ms <= 0.0 {
            return Err("basic_attack_interval_ms must be positive".into());
        }

        if let TickDeltaPolicy::Fixed { nominal_ms } = self.delta_policy {
            if nominal_ms <= 0.0 {
                return Err(format!("fixed nominal delta ({nominal_ms}) must be positive"));
            }
        }

        Ok(())
    }
}

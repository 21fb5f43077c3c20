//! Flee probability
//!
//! Base chance plus a bonus per point of speed advantage, halved against
//! bosses, then clamped. The clamp is applied last so no combination of
//! inputs can make escape certain or impossible.

use crate::core::config::GameConfig;

pub fn flee_chance(config: &GameConfig, fleer_speed: f32, opponent_speed: f32, opponent_is_boss: bool) -> f32 {
    let mut chance = config.flee_base_chance + (fleer_speed - opponent_speed) * config.flee_speed_factor;
    if opponent_is_boss {
        chance *= config.flee_boss_factor;
    }
    if chance.is_nan() {
        chance = config.flee_min_chance;
    }
    chance.clamp(config.flee_min_chance, config.flee_max_chance)
}

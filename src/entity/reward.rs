//! Paying rewards into an actor

use crate::core::types::RewardBundle;
use crate::entity::Actor;
use crate::events::{EventLog, GameEvent};

/// Add gold and experience to `actor`, announcing the grant and any
/// level-ups. Items are announced only; inventory lives outside the core.
pub fn grant_reward(actor: &mut Actor, reward: &RewardBundle, events: &mut EventLog) {
    actor.stats.gold = actor.stats.gold.saturating_add(reward.gold);
    let levels = actor.stats.gain_experience(reward.experience);

    events.emit(GameEvent::RewardGranted { reward: reward.clone() });
    for level in levels {
        tracing::info!("{} reached level {}", actor.name, level);
        events.emit(GameEvent::LevelUp { actor: actor.id, level });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Stats;

    #[test]
    fn test_grant_reward_levels_up() {
        let mut actor = Actor::player("Hero", Stats::default());
        let mut events = EventLog::new();

        grant_reward(&mut actor, &RewardBundle::new(25, 120), &mut events);

        assert_eq!(actor.stats.gold, 25);
        assert_eq!(actor.stats.level, 2);
        assert_eq!(actor.stats.experience, 20);
        let drained = events.drain();
        assert!(matches!(drained[0], GameEvent::RewardGranted { .. }));
        assert!(matches!(drained[1], GameEvent::LevelUp { level: 2, .. }));
    }
}

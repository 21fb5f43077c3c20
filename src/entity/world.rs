//! Actor store - every actor the core can reference by id

use crate::core::types::{ActorId, Vec2};
use crate::entity::actor::{Actor, ActorKind};
use ahash::AHashMap;

/// The actors currently in play
#[derive(Debug, Default)]
pub struct ActorStore {
    actors: AHashMap<ActorId, Actor>,
    player: Option<ActorId>,
}

impl ActorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an actor. A player actor becomes the tracked player.
    pub fn spawn(&mut self, actor: Actor) -> ActorId {
        let id = actor.id;
        if actor.kind == ActorKind::Player {
            self.player = Some(id);
        }
        self.actors.insert(id, actor);
        id
    }

    pub fn remove(&mut self, id: ActorId) -> Option<Actor> {
        if self.player == Some(id) {
            self.player = None;
        }
        self.actors.remove(&id)
    }

    pub fn get(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(&id)
    }

    pub fn get_mut(&mut self, id: ActorId) -> Option<&mut Actor> {
        self.actors.get_mut(&id)
    }

    pub fn contains(&self, id: ActorId) -> bool {
        self.actors.contains_key(&id)
    }

    pub fn player_id(&self) -> Option<ActorId> {
        self.player
    }

    pub fn player(&self) -> Option<&Actor> {
        self.player.and_then(|id| self.actors.get(&id))
    }

    pub fn player_mut(&mut self) -> Option<&mut Actor> {
        self.player.and_then(|id| self.actors.get_mut(&id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Actor> {
        self.actors.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Actor> {
        self.actors.values_mut()
    }

    /// Ids of active actors hostile to `kind` within `radius` of `center`,
    /// nearest first
    pub fn hostiles_within(&self, kind: ActorKind, center: Vec2, radius: f32) -> Vec<ActorId> {
        let mut found: Vec<(f32, ActorId)> = self
            .actors
            .values()
            .filter(|a| a.kind.is_hostile_to(kind) && a.can_act())
            .map(|a| (a.position.distance(&center), a.id))
            .filter(|(d, _)| *d <= radius)
            .collect();
        found.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        found.into_iter().map(|(_, id)| id).collect()
    }

    pub fn len(&self) -> usize {
        self.actors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actors.is_empty()
    }

    pub fn clear(&mut self) {
        self.actors.clear();
        self.player = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::Stats;

    #[test]
    fn test_spawn_tracks_player() {
        let mut store = ActorStore::new();
        let id = store.spawn(Actor::player("Hero", Stats::default()));
        assert_eq!(store.player_id(), Some(id));

        store.remove(id);
        assert!(store.player().is_none());
    }

    #[test]
    fn test_hostiles_within_filters_and_sorts() {
        let mut store = ActorStore::new();
        let far = store.spawn(Actor::enemy("Far", 1, Vec2::new(70.0, 0.0)));
        let near = store.spawn(Actor::enemy("Near", 1, Vec2::new(10.0, 0.0)));
        store.spawn(Actor::enemy("Out", 1, Vec2::new(200.0, 0.0)));
        let dead = store.spawn(Actor::enemy("Dead", 1, Vec2::new(5.0, 0.0)));
        store.get_mut(dead).unwrap().stats.health = 0.0;
        store.spawn(Actor::player("Hero", Stats::default()));

        let found = store.hostiles_within(ActorKind::Player, Vec2::default(), 80.0);
        assert_eq!(found, vec![near, far]);
    }
}

//! Game coordinator
//!
//! Owns the game-state machine, the speed multiplier, the loop counter and
//! the registry. Every frame goes through [`GameCoordinator::update`]:
//!
//! 1. deferred tasks due on the virtual clock run (also while paused),
//! 2. subsystems are ticked with the clamped, speed-scaled delta if playing,
//! 3. signals raised by subsystems during the frame are handled.

use crate::combat::CombatSystem;
use crate::context::{GameContext, Signal};
use crate::coordinator::rate_limit::LoopRateLimiter;
use crate::coordinator::rewards::{compose_snapshot, compute_loop_reward, TransitionSnapshot};
use crate::coordinator::scene::{RecordingScene, SceneHost};
use crate::coordinator::state::GameState;
use crate::core::config::GameConfig;
use crate::core::scheduler::DeferredTask;
use crate::core::types::{ActorId, CombatId, Millis, RewardBundle};
use crate::entity::{grant_reward, Actor, ActorKind};
use crate::events::{GameEvent, NoticePosition};
use crate::registry::{InitData, SubsystemHandle, SubsystemRegistry};
use crate::skills::{AbilitySystem, Skill, TargetInfo};
use std::cell::RefCell;
use std::rc::Rc;

/// Orange toast used for throttling notices
const THROTTLE_NOTICE_COLOR: u32 = 0xffaa00;

pub struct GameCoordinator<S: SceneHost = RecordingScene> {
    ctx: GameContext,
    registry: SubsystemRegistry,
    abilities: Rc<RefCell<AbilitySystem>>,
    combat: Rc<RefCell<CombatSystem>>,
    scene: S,
    state: GameState,
    speed_multiplier: f64,
    loop_count: u32,
    transitions: u32,
    limiter: LoopRateLimiter,
}

impl GameCoordinator<RecordingScene> {
    /// Coordinator with the recording scene host
    pub fn headless(config: GameConfig) -> Self {
        Self::new(config, RecordingScene::new())
    }
}

impl<S: SceneHost> GameCoordinator<S> {
    /// Build the context and register the built-in subsystems
    /// (abilities first, then combat).
    pub fn new(config: GameConfig, scene: S) -> Self {
        let limiter = LoopRateLimiter::new(config.rate_window_ms, config.rate_limit_max_loops);
        let mut registry = SubsystemRegistry::new(config.delta_policy);
        let mut ctx = GameContext::new(config);

        let abilities = Rc::new(RefCell::new(AbilitySystem::new()));
        let combat = Rc::new(RefCell::new(CombatSystem::new()));
        registry.register(&mut ctx, AbilitySystem::handle(&abilities));
        registry.register(&mut ctx, CombatSystem::handle(&combat));

        Self {
            ctx,
            registry,
            abilities,
            combat,
            scene,
            state: GameState::Initializing,
            speed_multiplier: 1.0,
            loop_count: 0,
            transitions: 0,
            limiter,
        }
    }

    /// Register an extra subsystem. Late registrants pick up the current
    /// init data, pause flag and speed.
    pub fn register(&mut self, handle: SubsystemHandle) {
        self.registry.register(&mut self.ctx, handle);
        self.registry.sync_system_references();
    }

    // === LIFECYCLE ===

    /// Insert the player and begin a run. Only valid while initializing.
    pub fn start_game(&mut self, player: Actor) -> Option<ActorId> {
        if self.state != GameState::Initializing || player.kind != ActorKind::Player {
            return None;
        }

        let name = player.name.clone();
        let id = self.ctx.actors.spawn(player);
        self.registry.initialize_all(&mut self.ctx, InitData { player: id });
        self.registry.sync_system_references();
        self.state = GameState::Playing;
        tracing::info!("Game started with {}", name);
        Some(id)
    }

    /// Advance one frame. `time` is the absolute virtual time in ms and
    /// `delta` the raw elapsed time since the last frame.
    pub fn update(&mut self, time: Millis, delta: Millis) {
        self.run_deferred(time);

        if self.state == GameState::Playing {
            if delta > self.ctx.config.anomaly_threshold_ms {
                tracing::warn!("Frame delta {:.0}ms exceeds threshold, likely dropped frames", delta);
            }
            self.registry.update_all(&mut self.ctx, time, delta.max(0.0));
        }

        self.process_signals();
    }

    fn run_deferred(&mut self, time: Millis) {
        for task in self.ctx.scheduler.advance_to(time) {
            match task {
                DeferredTask::LoopTransition { loop_number, reward } => {
                    self.complete_transition(loop_number, reward);
                }
                DeferredTask::CounterAttack { combat, attacker, defender } => {
                    self.combat
                        .borrow_mut()
                        .resolve_counter_attack(&mut self.ctx, combat, attacker, defender);
                }
            }
        }
        // Counter-attacks may have killed the player
        self.process_signals();
    }

    /// Loop completions settle before a death raised in the same tick, so
    /// a reward earned on the final step is still paid.
    fn process_signals(&mut self) {
        let mut signals = self.ctx.take_signals();
        signals.sort_by_key(|signal| *signal == Signal::PlayerDied);
        for signal in signals {
            match signal {
                Signal::PlayerDied => {
                    self.notify_player_died();
                }
                Signal::LoopCompleted => {
                    self.handle_loop_completion();
                }
            }
        }
    }

    // === PAUSE & SPEED ===

    /// Pause or resume. False unless a run is in progress.
    pub fn set_paused(&mut self, paused: bool) -> bool {
        if !self.state.is_running() {
            return false;
        }
        let target = if paused { GameState::Paused } else { GameState::Playing };
        if self.state == target {
            return true;
        }

        self.state = target;
        self.registry.set_paused(paused);
        if paused {
            self.ctx.events.emit(GameEvent::GamePaused);
        } else {
            self.ctx.events.emit(GameEvent::GameResumed);
        }
        tracing::info!("Game {}", if paused { "paused" } else { "resumed" });
        true
    }

    pub fn toggle_pause(&mut self) -> bool {
        let paused = self.state == GameState::Paused;
        self.set_paused(!paused)
    }

    /// Set the speed multiplier. Zero pauses; a positive value while
    /// paused resumes first. Negative and non-finite values read as zero.
    pub fn set_game_speed(&mut self, multiplier: f64) -> bool {
        if self.state.is_over() {
            return false;
        }
        let multiplier = if multiplier.is_finite() { multiplier.max(0.0) } else { 0.0 };
        if multiplier == 0.0 {
            return self.set_paused(true);
        }

        if self.state == GameState::Paused {
            self.set_paused(false);
        }
        self.apply_speed(multiplier);
        true
    }

    fn apply_speed(&mut self, multiplier: f64) {
        self.speed_multiplier = multiplier;
        self.registry.set_speed_multiplier(multiplier);
        self.ctx.events.emit(GameEvent::SpeedChanged { multiplier });
        tracing::debug!("Speed multiplier {:.2}x", multiplier);
    }

    // === LOOPS ===

    /// Count a completed loop, pay its reward and queue the transition to
    /// the base scene. Returns the reward, or `None` outside a run.
    pub fn handle_loop_completion(&mut self) -> Option<RewardBundle> {
        if !self.state.is_running() {
            return None;
        }

        self.loop_count += 1;
        let loop_number = self.loop_count;

        if self.limiter.record(self.ctx.scheduler.now()) {
            self.throttle();
        }

        let level = self.ctx.actors.player().map_or(1, |p| p.stats.level.max(1));
        let reward = compute_loop_reward(level, loop_number);
        tracing::info!("Loop {} complete: {} gold, {} xp", loop_number, reward.gold, reward.experience);

        self.ctx.events.emit(GameEvent::LoopCompleted { loop_number, reward: reward.clone() });
        match self.ctx.actors.player_mut() {
            Some(player) => grant_reward(player, &reward, &mut self.ctx.events),
            None => {
                tracing::warn!("Loop {} completed without a player", loop_number);
                self.ctx.events.emit(GameEvent::RewardGranted { reward: reward.clone() });
            }
        }

        let delay = self.ctx.config.loop_transition_delay_ms;
        self.ctx.scheduler.schedule(
            delay,
            DeferredTask::LoopTransition { loop_number, reward: reward.clone() },
        );
        Some(reward)
    }

    fn throttle(&mut self) {
        let config = &self.ctx.config;
        let reduced = (self.speed_multiplier * config.rate_slowdown_factor)
            .max(config.min_throttled_speed)
            .min(self.speed_multiplier);
        tracing::warn!(
            "Loop rate limit exceeded ({} in {:.0}s), speed {:.2}x -> {:.2}x",
            config.rate_limit_max_loops,
            config.rate_window_ms / 1000.0,
            self.speed_multiplier,
            reduced
        );

        self.ctx.events.notice(
            format!("Too many loops! Speed reduced to {:.1}x", reduced),
            THROTTLE_NOTICE_COLOR,
            NoticePosition::Top,
        );
        self.apply_speed(reduced);
    }

    fn complete_transition(&mut self, loop_number: u32, reward: RewardBundle) {
        let snapshot = match compose_snapshot(self.ctx.actors.player(), loop_number, &reward) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                tracing::error!("Snapshot for loop {} failed: {}; using fallback", loop_number, e);
                TransitionSnapshot::fallback(loop_number, reward, self.ctx.config.fallback_health)
            }
        };
        self.transitions += 1;
        self.scene.enter_base(snapshot);
    }

    // === END OF RUN ===

    /// Move to `Defeat`. False if no run is in progress.
    pub fn notify_player_died(&mut self) -> bool {
        if !self.state.is_running() {
            return false;
        }
        self.state = GameState::Defeat;
        self.ctx.events.emit(GameEvent::PlayerDied);
        tracing::info!("Player died after {} loops", self.loop_count);
        true
    }

    pub fn declare_victory(&mut self) -> bool {
        if self.state != GameState::Playing {
            return false;
        }
        self.state = GameState::Victory;
        tracing::info!("Victory after {} loops", self.loop_count);
        true
    }

    /// Tear the run down and return to `Initializing`
    pub fn restart_game(&mut self) -> bool {
        if !self.state.is_over() {
            return false;
        }

        self.registry.reset_all(&mut self.ctx);
        self.ctx.reset();
        self.registry.set_paused(false);
        self.speed_multiplier = 1.0;
        self.registry.set_speed_multiplier(1.0);
        self.loop_count = 0;
        self.transitions = 0;
        self.limiter.reset();
        self.scene.restart_scene();
        self.state = GameState::Initializing;
        tracing::info!("Game restarted");
        true
    }

    // === PLAYER INPUT ===

    pub fn use_skill(&mut self, skill_id: &str, target: &TargetInfo) -> bool {
        match self.ctx.actors.player_id() {
            Some(player) => self.use_skill_as(player, skill_id, target),
            None => false,
        }
    }

    /// Use a skill on behalf of any actor with a catalog
    pub fn use_skill_as(&mut self, actor: ActorId, skill_id: &str, target: &TargetInfo) -> bool {
        if self.state != GameState::Playing {
            return false;
        }
        self.abilities.borrow_mut().use_skill(&mut self.ctx, skill_id, target, actor)
    }

    pub fn add_skill(&mut self, actor: ActorId, skill: Skill) -> bool {
        if !self.ctx.actors.contains(actor) {
            return false;
        }
        self.abilities.borrow_mut().add_skill(actor, skill)
    }

    pub fn start_combat(&mut self, attacker: ActorId, defender: ActorId) -> Option<CombatId> {
        if self.state != GameState::Playing {
            return None;
        }
        self.combat.borrow_mut().start_combat(&mut self.ctx, attacker, defender)
    }

    pub fn attempt_flee(&mut self, combat: CombatId) -> bool {
        if self.state != GameState::Playing {
            return false;
        }
        self.combat.borrow_mut().attempt_flee(&mut self.ctx, combat)
    }

    /// Returns the new auto-combat setting
    pub fn toggle_auto_combat(&mut self) -> bool {
        self.combat.borrow_mut().toggle_auto_combat()
    }

    /// Add a non-player actor to the world
    pub fn spawn(&mut self, actor: Actor) -> ActorId {
        self.ctx.actors.spawn(actor)
    }

    /// Report a completed loop from outside the subsystem tick
    pub fn complete_loop(&mut self) {
        self.ctx.raise(Signal::LoopCompleted);
        self.process_signals();
    }

    // === QUERIES ===

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn speed_multiplier(&self) -> f64 {
        self.speed_multiplier
    }

    pub fn loop_count(&self) -> u32 {
        self.loop_count
    }

    /// Base transitions handed to the scene host so far
    pub fn transitions(&self) -> u32 {
        self.transitions
    }

    pub fn player(&self) -> Option<&Actor> {
        self.ctx.actors.player()
    }

    pub fn context(&self) -> &GameContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut GameContext {
        &mut self.ctx
    }

    pub fn registry(&self) -> &SubsystemRegistry {
        &self.registry
    }

    pub fn abilities(&self) -> std::cell::Ref<'_, AbilitySystem> {
        self.abilities.borrow()
    }

    pub fn combat(&self) -> std::cell::Ref<'_, CombatSystem> {
        self.combat.borrow()
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.ctx.events.drain()
    }
}

impl Default for GameCoordinator<RecordingScene> {
    fn default() -> Self {
        Self::headless(GameConfig::default())
    }
}

//! Subsystem registry
//!
//! Name-keyed, insertion-ordered store of subsystem handles. Every lifecycle
//! broadcast walks the handles in registration order. Global settings
//! (speed multiplier, pause) are retained so a subsystem registered late
//! observes what is currently in effect rather than defaults.

pub mod capability;

pub use capability::{
    HandleBuilder, InitData, Initializable, Pausable, ReferenceSync, Resettable, SpeedScalable,
    SubsystemHandle, Updatable,
};

use crate::context::GameContext;
use crate::core::config::TickDeltaPolicy;
use crate::core::types::Millis;
use ahash::AHashMap;
use std::cell::RefCell;
use std::rc::Rc;

/// Deferred work run once the registry initializes
pub type InitCallback = Box<dyn FnOnce(&mut GameContext)>;

pub struct SubsystemRegistry {
    handles: Vec<SubsystemHandle>,
    index: AHashMap<String, usize>,
    initialized: bool,
    init_data: Option<InitData>,
    init_callbacks: Vec<InitCallback>,
    speed_multiplier: f64,
    paused: bool,
    delta_policy: TickDeltaPolicy,
}

impl SubsystemRegistry {
    pub fn new(delta_policy: TickDeltaPolicy) -> Self {
        Self {
            handles: Vec::new(),
            index: AHashMap::new(),
            initialized: false,
            init_data: None,
            init_callbacks: Vec::new(),
            speed_multiplier: 1.0,
            paused: false,
            delta_policy,
        }
    }

    /// Register `handle` under its name.
    ///
    /// A name already present is overwritten in place, keeping its slot in
    /// the dispatch order. Late registrants are initialized immediately and
    /// receive the speed multiplier and pause state currently in effect.
    pub fn register(&mut self, ctx: &mut GameContext, handle: SubsystemHandle) {
        let slot = match self.index.get(&handle.name) {
            Some(&slot) => {
                tracing::warn!("Subsystem '{}' already registered, overwriting", handle.name);
                self.handles[slot] = handle;
                slot
            }
            None => {
                let slot = self.handles.len();
                self.index.insert(handle.name.clone(), slot);
                self.handles.push(handle);
                slot
            }
        };

        let handle = &self.handles[slot];
        tracing::debug!("Registered subsystem '{}'", handle.name);

        if self.initialized {
            if let (Some(init), Some(data)) = (&handle.init, &self.init_data) {
                init.borrow_mut().initialize(ctx, data);
            }
        }
        if self.speed_multiplier != 1.0 {
            if let Some(speed) = &handle.speed {
                speed.borrow_mut().set_speed_multiplier(self.speed_multiplier);
            }
        }
        if self.paused {
            if let Some(pause) = &handle.pause {
                pause.borrow_mut().set_paused(true);
            }
        }
    }

    /// Initialize every subsystem in registration order, then run the
    /// queued init callbacks in the order they were queued.
    pub fn initialize_all(&mut self, ctx: &mut GameContext, data: InitData) {
        self.initialized = true;
        self.init_data = Some(data);

        for handle in &self.handles {
            if let Some(init) = &handle.init {
                init.borrow_mut().initialize(ctx, &data);
            }
        }

        for callback in std::mem::take(&mut self.init_callbacks) {
            callback(ctx);
        }

        tracing::info!("Initialized {} subsystems", self.handles.len());
    }

    /// Run `callback` now if initialized, otherwise at `initialize_all`
    pub fn register_init_callback(
        &mut self,
        ctx: &mut GameContext,
        callback: impl FnOnce(&mut GameContext) + 'static,
    ) {
        if self.initialized {
            callback(ctx);
        } else {
            self.init_callbacks.push(Box::new(callback));
        }
    }

    /// Dispatch one tick. `delta` is the raw frame delta: the delta policy
    /// bounds it first, then the speed multiplier scales it, and every
    /// subsystem receives the same resulting delta.
    pub fn update_all(&self, ctx: &mut GameContext, time: Millis, delta: Millis) {
        let delta = self.delta_policy.apply(delta) * self.speed_multiplier;
        for handle in &self.handles {
            if let Some(update) = &handle.update {
                update.borrow_mut().update(ctx, time, delta);
            }
        }
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
        for handle in &self.handles {
            if let Some(pause) = &handle.pause {
                pause.borrow_mut().set_paused(paused);
            }
        }
    }

    pub fn set_speed_multiplier(&mut self, multiplier: f64) {
        self.speed_multiplier = multiplier;
        for handle in &self.handles {
            if let Some(speed) = &handle.speed {
                speed.borrow_mut().set_speed_multiplier(multiplier);
            }
        }
    }

    /// Reset every subsystem. The registry must be initialized again
    /// before late registrants are initialized on arrival.
    pub fn reset_all(&mut self, ctx: &mut GameContext) {
        for handle in &self.handles {
            if let Some(reset) = &handle.reset {
                reset.borrow_mut().reset(ctx);
            }
        }
        self.initialized = false;
        self.init_data = None;
    }

    pub fn sync_system_references(&self) {
        for handle in &self.handles {
            if let Some(sync) = &handle.sync {
                sync.borrow_mut().sync_references(self);
            }
        }
    }

    /// Typed lookup of a registered subsystem
    pub fn resolve<T: 'static>(&self, name: &str) -> Option<Rc<RefCell<T>>> {
        let slot = *self.index.get(name)?;
        self.handles[slot].any.clone().downcast::<RefCell<T>>().ok()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Names in dispatch order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.handles.iter().map(|h| h.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn speed_multiplier(&self) -> f64 {
        self.speed_multiplier
    }

    pub fn delta_policy(&self) -> TickDeltaPolicy {
        self.delta_policy
    }
}

impl Default for SubsystemRegistry {
    fn default() -> Self {
        Self::new(TickDeltaPolicy::default())
    }
}

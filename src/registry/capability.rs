//! Typed optional capabilities and the handles that carry them
//!
//! A subsystem opts into each lifecycle hook by implementing the matching
//! trait and enabling it on its [`HandleBuilder`]. The registry only ever
//! dispatches through the slots filled in at build time.

use crate::context::GameContext;
use crate::core::types::{ActorId, Millis};
use crate::registry::SubsystemRegistry;
use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

/// Data handed to `initialize` when a game starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitData {
    pub player: ActorId,
}

pub trait Initializable {
    fn initialize(&mut self, ctx: &mut GameContext, data: &InitData);
}

pub trait Updatable {
    fn update(&mut self, ctx: &mut GameContext, time: Millis, delta: Millis);
}

pub trait Pausable {
    fn set_paused(&mut self, paused: bool);
}

pub trait SpeedScalable {
    fn set_speed_multiplier(&mut self, multiplier: f64);
}

pub trait Resettable {
    fn reset(&mut self, ctx: &mut GameContext);
}

/// Resolve cross-references once every subsystem is registered
pub trait ReferenceSync {
    fn sync_references(&mut self, registry: &SubsystemRegistry);
}

/// A named subsystem plus whichever capabilities it exposes
pub struct SubsystemHandle {
    pub(crate) name: String,
    pub(crate) init: Option<Rc<RefCell<dyn Initializable>>>,
    pub(crate) update: Option<Rc<RefCell<dyn Updatable>>>,
    pub(crate) pause: Option<Rc<RefCell<dyn Pausable>>>,
    pub(crate) speed: Option<Rc<RefCell<dyn SpeedScalable>>>,
    pub(crate) reset: Option<Rc<RefCell<dyn Resettable>>>,
    pub(crate) sync: Option<Rc<RefCell<dyn ReferenceSync>>>,
    pub(crate) any: Rc<dyn Any>,
}

impl SubsystemHandle {
    /// Start building a handle around `subsystem`
    pub fn builder<T: 'static>(name: impl Into<String>, subsystem: Rc<RefCell<T>>) -> HandleBuilder<T> {
        let any: Rc<dyn Any> = subsystem.clone();
        HandleBuilder {
            handle: SubsystemHandle {
                name: name.into(),
                init: None,
                update: None,
                pause: None,
                speed: None,
                reset: None,
                sync: None,
                any,
            },
            subsystem,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn can_update(&self) -> bool {
        self.update.is_some()
    }
}

impl std::fmt::Debug for SubsystemHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SubsystemHandle")
            .field("name", &self.name)
            .field("init", &self.init.is_some())
            .field("update", &self.update.is_some())
            .field("pause", &self.pause.is_some())
            .field("speed", &self.speed.is_some())
            .field("reset", &self.reset.is_some())
            .field("sync", &self.sync.is_some())
            .finish()
    }
}

pub struct HandleBuilder<T: 'static> {
    handle: SubsystemHandle,
    subsystem: Rc<RefCell<T>>,
}

impl<T: 'static> HandleBuilder<T> {
    pub fn initialize(mut self) -> Self
    where
        T: Initializable,
    {
        let cap: Rc<RefCell<dyn Initializable>> = self.subsystem.clone();
        self.handle.init = Some(cap);
        self
    }

    pub fn update(mut self) -> Self
    where
        T: Updatable,
    {
        let cap: Rc<RefCell<dyn Updatable>> = self.subsystem.clone();
        self.handle.update = Some(cap);
        self
    }

    pub fn pause(mut self) -> Self
    where
        T: Pausable,
    {
        let cap: Rc<RefCell<dyn Pausable>> = self.subsystem.clone();
        self.handle.pause = Some(cap);
        self
    }

    pub fn speed(mut self) -> Self
    where
        T: SpeedScalable,
    {
        let cap: Rc<RefCell<dyn SpeedScalable>> = self.subsystem.clone();
        self.handle.speed = Some(cap);
        self
    }

    pub fn reset(mut self) -> Self
    where
        T: Resettable,
    {
        let cap: Rc<RefCell<dyn Resettable>> = self.subsystem.clone();
        self.handle.reset = Some(cap);
        self
    }

    pub fn sync(mut self) -> Self
    where
        T: ReferenceSync,
    {
        let cap: Rc<RefCell<dyn ReferenceSync>> = self.subsystem.clone();
        self.handle.sync = Some(cap);
        self
    }

    pub fn build(self) -> SubsystemHandle {
        self.handle
    }
}

//! The world facade.
//!
//! [`World`] bundles the component store, the mutex policy, the event bus and
//! the system scheduler behind one handle. Systems and event handlers receive
//! it by `&mut` on every call.
//!
//! Mutation is immediate: there is no command buffer. A system that creates
//! or destroys entities while walking a query works from the materialised
//! `Vec` that [`World::query`] returns and re-checks liveness of each entry
//! before touching it.

use arena_component::{Component, ComponentKind, ComponentStore, EcsError, Entity, MutexPolicy, Query};
use tracing::trace;

use crate::events::{EventBus, GameEvent, Handler, HandlerId, Topic};
use crate::scheduler::{System, SystemConfig, SystemScheduler};

/// Shared simulation state.
#[derive(Debug)]
pub struct World {
    store: ComponentStore,
    mutex: MutexPolicy,
    events: EventBus,
    scheduler: SystemScheduler,
    frame: u64,
    elapsed: f64,
    stop_requested: bool,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    /// An empty world with the default mutex groups and one scheduler group
    /// per built-in category.
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: ComponentStore::new(),
            mutex: MutexPolicy::with_defaults(),
            events: EventBus::new(),
            scheduler: SystemScheduler::new(),
            frame: 0,
            elapsed: 0.0,
            stop_requested: false,
        }
    }

    // -- Entities --

    pub fn create_entity(&mut self) -> Entity {
        self.store.create()
    }

    /// Destroy an entity and all its components. Unknown entities are ignored.
    pub fn destroy_entity(&mut self, entity: Entity) -> bool {
        self.store.destroy(entity)
    }

    #[must_use]
    pub fn exists(&self, entity: Entity) -> bool {
        self.store.exists(entity)
    }

    // -- Components --

    /// Attach a component.
    ///
    /// # Errors
    ///
    /// See [`ComponentStore::add`].
    pub fn add_component<T: Component>(&mut self, entity: Entity, component: T) -> Result<(), EcsError> {
        self.store.add(entity, component)
    }

    /// Attach a component only if the mutex policy allows it.
    ///
    /// Returns `Ok(false)` (and drops `component`) on a policy rejection.
    ///
    /// # Errors
    ///
    /// See [`ComponentStore::add`].
    pub fn try_add_component<T: Component>(&mut self, entity: Entity, component: T) -> Result<bool, EcsError> {
        if !self.mutex.can_add(&self.store, entity, T::kind()) {
            trace!(%entity, kind = T::type_name(), "mutex policy rejected component");
            return Ok(false);
        }
        self.store.add(entity, component)?;
        Ok(true)
    }

    pub fn remove_component<T: Component>(&mut self, entity: Entity) -> Option<T> {
        self.store.remove::<T>(entity)
    }

    pub fn remove_kind(&mut self, entity: Entity, kind: ComponentKind) -> bool {
        self.store.remove_kind(entity, kind)
    }

    #[must_use]
    pub fn get_component<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.store.get::<T>(entity)
    }

    #[must_use]
    pub fn get_component_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        self.store.get_mut::<T>(entity)
    }

    #[must_use]
    pub fn has_component<T: Component>(&self, entity: Entity) -> bool {
        self.store.has::<T>(entity)
    }

    /// Resolve a query to a snapshot of matching entities.
    #[must_use]
    pub fn query(&self, query: &Query) -> Vec<Entity> {
        self.store.query(query)
    }

    #[must_use]
    pub fn store(&self) -> &ComponentStore {
        &self.store
    }

    #[must_use]
    pub fn mutex_policy(&self) -> &MutexPolicy {
        &self.mutex
    }

    pub fn mutex_policy_mut(&mut self) -> &mut MutexPolicy {
        &mut self.mutex
    }

    // -- Events --

    #[must_use]
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    /// Subscribe to a topic. Shorthand for `events_mut().on(..)`.
    pub fn on<F>(&mut self, topic: Topic, handler: F) -> HandlerId
    where
        F: FnMut(&mut World, &GameEvent) + 'static,
    {
        self.events.on(topic, handler)
    }

    /// Deliver an event synchronously to every current subscriber.
    ///
    /// A subscriber that is itself mid-call receives the event after the
    /// outermost `emit` has finished with its own subscribers.
    pub fn emit(&mut self, event: &GameEvent) {
        let handlers = self.events.snapshot(event.topic());
        trace!(topic = %event.topic(), handlers = handlers.len(), "emit");
        self.events.enter();
        for handler in &handlers {
            self.deliver(handler, event);
        }
        if !self.events.leave() {
            return;
        }
        while let Some((handler, event)) = self.events.next_deferred() {
            self.events.enter();
            self.deliver(&handler, &event);
            self.events.leave();
        }
    }

    fn deliver(&mut self, handler: &Handler, event: &GameEvent) {
        match handler.try_borrow_mut() {
            Ok(mut guard) => (&mut *guard)(self, event),
            Err(_) => {
                trace!(topic = %event.topic(), "handler busy, deferring");
                self.events.defer(handler, event);
            }
        }
    }

    // -- Systems --

    /// Initialise a system against this world, then register it.
    pub fn add_system(&mut self, config: SystemConfig, mut system: Box<dyn System>) {
        system.init(self);
        self.scheduler.insert(config, system);
    }

    #[must_use]
    pub fn scheduler(&self) -> &SystemScheduler {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut SystemScheduler {
        &mut self.scheduler
    }

    /// Run every enabled system once.
    ///
    /// The run order is fixed when the frame starts. Each system is taken out
    /// of its slot only for its own update, so group and removal changes made
    /// mid-frame apply to the live scheduler: a group disabled mid-frame skips
    /// its remaining systems, and a system added mid-frame first runs on the
    /// next frame.
    ///
    /// # Errors
    ///
    /// The first error returned by a system. Later systems in the frame do
    /// not run.
    pub fn update(&mut self, dt: f32) -> Result<(), EcsError> {
        let mut result = Ok(());
        for name in self.scheduler.frame_plan() {
            let Some(mut system) = self.scheduler.checkout(&name) else {
                continue;
            };
            let outcome = system.update(self, dt);
            self.scheduler.checkin(&name, system);
            if let Err(err) = outcome {
                result = Err(err);
                break;
            }
        }
        self.frame += 1;
        self.elapsed += f64::from(dt);
        result
    }

    /// Number of completed [`World::update`] calls.
    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Simulated seconds accumulated by [`World::update`].
    #[must_use]
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Ask the driving loop to stop after the current tick.
    pub fn request_stop(&mut self) {
        self.stop_requested = true;
    }

    #[must_use]
    pub fn stop_requested(&self) -> bool {
        self.stop_requested
    }
}

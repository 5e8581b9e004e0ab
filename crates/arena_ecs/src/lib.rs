//! # arena_ecs
//!
//! The runtime layer of the arena ECS: the [`World`] facade that systems and
//! collaborators talk to, the priority-group [`SystemScheduler`], the
//! synchronous [`EventBus`], and the fixed-timestep [`TickLoop`].

pub mod events;
pub mod scheduler;
pub mod tick;
pub mod world;

pub use events::{EventBus, GameEvent, HandlerId, Topic};
pub use scheduler::{
    System, SystemConfig, SystemGroup, SystemGroupKind, SystemPriority, SystemScheduler,
};
pub use tick::{RunOutcome, TickConfig, TickLoop};
pub use world::World;

pub use arena_component::{Component, ComponentKind, EcsError, Entity, Query};

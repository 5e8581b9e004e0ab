//! # arena_component
//!
//! Entity identity and component storage for the arena runtime.
//!
//! This crate provides:
//!
//! - [`Entity`] — `u64` handles, never reused.
//! - [`EntityRegistry`] — id issue and liveness tracking.
//! - [`Component`] trait and [`ComponentKind`] discriminant.
//! - [`ComponentStore`] — per-entity component maps plus an inverted index.
//! - [`Query`] — reusable required/excluded kind sets.
//! - [`MutexPolicy`] — advisory mutually exclusive kind groups.

pub mod component;
pub mod entity;
pub mod error;
pub mod mutex;
pub mod query;
pub mod store;

pub use component::{Component, ComponentKind};
pub use entity::{Entity, EntityRegistry};
pub use error::EcsError;
pub use mutex::{DEFAULT_GROUPS, MutexPolicy};
pub use query::Query;
pub use store::ComponentStore;

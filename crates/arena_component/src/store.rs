//! Component storage with an inverted kind index.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │ ComponentStore                                           │
//! │                                                          │
//! │  registry:   EntityRegistry (ids + liveness)             │
//! │  components: Entity -> { ComponentKind -> Slot }         │
//! │  index:      ComponentKind -> BTreeSet<Entity>           │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! The per-entity maps are authoritative. The index is derived and is kept in
//! lock-step on every add, remove and destroy: `index[k].contains(e)` holds
//! exactly when `components[e]` has `k`. Index sets that become empty are
//! dropped so transient kinds do not accumulate entries.

use std::any::Any;
use std::collections::{BTreeSet, HashMap};

use tracing::trace;

use crate::component::{Component, ComponentKind};
use crate::entity::{Entity, EntityRegistry};
use crate::error::EcsError;
use crate::query::Query;

/// A type-erased component instance plus its kind name.
struct Slot {
    name: &'static str,
    value: Box<dyn Any>,
}

/// Owns every entity's components and the kind -> entities index.
#[derive(Default)]
pub struct ComponentStore {
    registry: EntityRegistry,
    components: HashMap<Entity, HashMap<ComponentKind, Slot>>,
    index: HashMap<ComponentKind, BTreeSet<Entity>>,
}

impl std::fmt::Debug for ComponentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ComponentStore")
            .field("entities", &self.registry.len())
            .field("indexed_kinds", &self.index.len())
            .finish()
    }
}

impl ComponentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // -- Entity lifecycle --

    /// Allocate a new entity with an empty component map.
    pub fn create(&mut self) -> Entity {
        let entity = self.registry.create();
        self.components.insert(entity, HashMap::new());
        trace!(%entity, "entity created");
        entity
    }

    /// Destroy an entity, removing each of its components through the same
    /// path as [`ComponentStore::remove_kind`] before releasing the id.
    ///
    /// Returns `false` (and does nothing) if the entity is unknown.
    pub fn destroy(&mut self, entity: Entity) -> bool {
        if !self.registry.exists(entity) {
            return false;
        }
        for kind in self.kinds_of(entity) {
            self.remove_kind(entity, kind);
        }
        self.components.remove(&entity);
        self.registry.release(entity);
        trace!(%entity, "entity destroyed");
        true
    }

    #[must_use]
    pub fn exists(&self, entity: Entity) -> bool {
        self.registry.exists(entity)
    }

    /// Live entities in creation order.
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.registry.iter()
    }

    /// Number of live entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    // -- Component operations --

    /// Attach a component.
    ///
    /// # Errors
    ///
    /// [`EcsError::UnknownEntity`] if the entity does not exist,
    /// [`EcsError::DuplicateComponent`] if it already owns a `T`. The store is
    /// left unchanged on error.
    pub fn add<T: Component>(&mut self, entity: Entity, component: T) -> Result<(), EcsError> {
        let kind = T::kind();
        let map = self
            .components
            .get_mut(&entity)
            .ok_or(EcsError::UnknownEntity(entity))?;
        if map.contains_key(&kind) {
            return Err(EcsError::DuplicateComponent {
                entity,
                kind: T::type_name(),
            });
        }
        map.insert(
            kind,
            Slot {
                name: T::type_name(),
                value: Box::new(component),
            },
        );
        self.index.entry(kind).or_default().insert(entity);
        Ok(())
    }

    /// Detach and return a component. `None` if absent.
    pub fn remove<T: Component>(&mut self, entity: Entity) -> Option<T> {
        let kind = T::kind();
        let slot = self.components.get_mut(&entity)?.remove(&kind)?;
        self.unindex(kind, entity);
        slot.value.downcast::<T>().ok().map(|b| *b)
    }

    /// Detach a component by kind. Returns `false` if there was nothing to
    /// remove.
    pub fn remove_kind(&mut self, entity: Entity, kind: ComponentKind) -> bool {
        let removed = self
            .components
            .get_mut(&entity)
            .and_then(|map| map.remove(&kind))
            .is_some();
        if removed {
            self.unindex(kind, entity);
        }
        removed
    }

    fn unindex(&mut self, kind: ComponentKind, entity: Entity) {
        if let Some(set) = self.index.get_mut(&kind) {
            set.remove(&entity);
            if set.is_empty() {
                self.index.remove(&kind);
            }
        }
    }

    /// Shared access to a component. `None` covers both a missing component
    /// and a missing entity.
    #[must_use]
    pub fn get<T: Component>(&self, entity: Entity) -> Option<&T> {
        self.components
            .get(&entity)?
            .get(&T::kind())?
            .value
            .downcast_ref::<T>()
    }

    /// Mutable access to a component.
    #[must_use]
    pub fn get_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        self.components
            .get_mut(&entity)?
            .get_mut(&T::kind())?
            .value
            .downcast_mut::<T>()
    }

    #[must_use]
    pub fn has<T: Component>(&self, entity: Entity) -> bool {
        self.has_kind(entity, T::kind())
    }

    #[must_use]
    pub fn has_kind(&self, entity: Entity, kind: ComponentKind) -> bool {
        self.components
            .get(&entity)
            .is_some_and(|map| map.contains_key(&kind))
    }

    /// The kinds an entity currently owns (empty for unknown entities).
    #[must_use]
    pub fn kinds_of(&self, entity: Entity) -> Vec<ComponentKind> {
        self.components
            .get(&entity)
            .map(|map| map.keys().copied().collect())
            .unwrap_or_default()
    }

    /// The readable name of a kind currently attached to `entity`.
    #[must_use]
    pub fn kind_name(&self, entity: Entity, kind: ComponentKind) -> Option<&'static str> {
        self.components.get(&entity)?.get(&kind).map(|slot| slot.name)
    }

    /// The inverted-index entry for a kind. `None` once no entity holds it.
    #[must_use]
    pub fn indexed(&self, kind: ComponentKind) -> Option<&BTreeSet<Entity>> {
        self.index.get(&kind)
    }

    /// Kinds with a live index entry.
    pub fn indexed_kinds(&self) -> impl Iterator<Item = ComponentKind> + '_ {
        self.index.keys().copied()
    }

    // -- Query --

    /// Resolve a query to a materialised list of entities.
    ///
    /// An empty requirement list yields every live entity. Otherwise the
    /// smallest index set among the required kinds seeds the scan, and a
    /// required kind with no index entry short-circuits to an empty result.
    /// Order follows the seed set (ascending id, i.e. creation order).
    ///
    /// The result is a snapshot: callers may create or destroy entities while
    /// walking it, but must re-check liveness of later entries.
    #[must_use]
    pub fn query(&self, query: &Query) -> Vec<Entity> {
        if query.required().is_empty() {
            return self
                .registry
                .iter()
                .filter(|&e| query.matches(self, e))
                .collect();
        }

        let mut seed: Option<&BTreeSet<Entity>> = None;
        for kind in query.required() {
            let Some(set) = self.index.get(kind) else {
                return Vec::new();
            };
            if seed.is_none_or(|s| set.len() < s.len()) {
                seed = Some(set);
            }
        }

        seed.map(|set| {
            set.iter()
                .copied()
                .filter(|&e| query.matches(self, e))
                .collect()
        })
        .unwrap_or_default()
    }
}

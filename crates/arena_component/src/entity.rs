//! Entity handles and the registry that issues them.
//!
//! Ids come from a monotonic counter starting at 1 and are never handed out
//! twice in a process, so a stale handle held by a projectile or tornado can
//! only ever miss, never alias a newer unit.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Opaque handle to a world object. Carries no data and no ownership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entity(pub u64);

impl Entity {
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Issues ids and tracks which of them are still live.
///
/// Liveness is a `BTreeSet`, so iteration is in creation order.
#[derive(Debug)]
pub struct EntityRegistry {
    next: u64,
    alive: BTreeSet<Entity>,
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self {
            next: 1,
            alive: BTreeSet::new(),
        }
    }
}

impl EntityRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&mut self) -> Entity {
        let entity = Entity(self.next);
        self.next += 1;
        self.alive.insert(entity);
        entity
    }

    /// Returns `false` if the entity was unknown or already released.
    pub fn release(&mut self, entity: Entity) -> bool {
        self.alive.remove(&entity)
    }

    #[must_use]
    pub fn exists(&self, entity: Entity) -> bool {
        self.alive.contains(&entity)
    }

    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.alive.iter().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.alive.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.alive.is_empty()
    }

    /// Total number of ids ever issued, live or not.
    #[must_use]
    pub fn allocated(&self) -> u64 {
        self.next - 1
    }
}

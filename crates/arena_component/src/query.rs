//! Query descriptors.
//!
//! A [`Query`] declares which component kinds an entity must hold (and,
//! optionally, which it must not). It is immutable once built and carries no
//! per-call state, so systems construct one up front and reuse it every frame.

use serde::{Deserialize, Serialize};

use crate::component::{Component, ComponentKind};
use crate::entity::Entity;
use crate::store::ComponentStore;

/// A reusable component-set requirement.
///
/// Resolution against the live store happens in [`ComponentStore::query`],
/// which seeds iteration from the smallest inverted-index set among the
/// required kinds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Query {
    /// Kinds an entity must hold, all of them.
    with: Vec<ComponentKind>,
    /// Kinds an entity must not hold.
    without: Vec<ComponentKind>,
}

impl Query {
    /// An empty query. Resolves to every live entity.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a query from a list of required kinds.
    #[must_use]
    pub fn from_kinds(kinds: impl IntoIterator<Item = ComponentKind>) -> Self {
        let mut query = Self::new();
        for kind in kinds {
            query = query.with_kind(kind);
        }
        query
    }

    /// Require component type `T`.
    #[must_use]
    pub fn with<T: Component>(self) -> Self {
        self.with_kind(T::kind())
    }

    /// Require a kind by its discriminant.
    #[must_use]
    pub fn with_kind(mut self, kind: ComponentKind) -> Self {
        if !self.with.contains(&kind) {
            self.with.push(kind);
        }
        self
    }

    /// Exclude entities holding component type `T`.
    #[must_use]
    pub fn without<T: Component>(self) -> Self {
        self.without_kind(T::kind())
    }

    /// Exclude entities holding a kind.
    #[must_use]
    pub fn without_kind(mut self, kind: ComponentKind) -> Self {
        if !self.without.contains(&kind) {
            self.without.push(kind);
        }
        self
    }

    /// The required kinds, in declaration order.
    #[must_use]
    pub fn required(&self) -> &[ComponentKind] {
        &self.with
    }

    /// The excluded kinds.
    #[must_use]
    pub fn excluded(&self) -> &[ComponentKind] {
        &self.without
    }

    /// The full match predicate: every required kind present, no excluded
    /// kind present.
    #[must_use]
    pub fn matches(&self, store: &ComponentStore, entity: Entity) -> bool {
        self.with.iter().all(|&kind| store.has_kind(entity, kind))
            && !self.without.iter().any(|&kind| store.has_kind(entity, kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_requirements_collapse() {
        let a = ComponentKind::from_name("a");
        let q = Query::new().with_kind(a).with_kind(a);
        assert_eq!(q.required(), &[a]);
    }

    #[test]
    fn test_from_kinds_preserves_order() {
        let a = ComponentKind::from_name("a");
        let b = ComponentKind::from_name("b");
        let q = Query::from_kinds([b, a]);
        assert_eq!(q.required(), &[b, a]);
        assert!(q.excluded().is_empty());
    }

    #[test]
    fn test_without_is_tracked_separately() {
        let a = ComponentKind::from_name("a");
        let b = ComponentKind::from_name("b");
        let q = Query::new().with_kind(a).without_kind(b);
        assert_eq!(q.required(), &[a]);
        assert_eq!(q.excluded(), &[b]);
    }
}

//! Mutually exclusive component groups.
//!
//! A group is a named set of kinds of which an entity may hold at most one.
//! The policy is advisory: [`ComponentStore::add`] never consults it, callers
//! check [`MutexPolicy::can_add`] first.

use std::collections::{BTreeMap, BTreeSet};

use crate::component::ComponentKind;
use crate::entity::Entity;
use crate::store::ComponentStore;

/// The predefined groups installed by [`MutexPolicy::with_defaults`].
pub const DEFAULT_GROUPS: &[(&str, &[&str])] = &[
    ("motion", &["unit", "projectile", "stationary"]),
    ("target", &["unit", "projectile_effect", "structure"]),
    (
        "control",
        &["player_controlled", "ai_controlled", "script_controlled"],
    ),
    ("collision", &["solid", "trigger", "ghost"]),
    ("lifecycle", &["permanent", "temporary", "timed"]),
];

/// Registry of mutex groups.
#[derive(Debug, Clone, Default)]
pub struct MutexPolicy {
    groups: BTreeMap<String, BTreeSet<ComponentKind>>,
}

impl MutexPolicy {
    /// An empty policy. Every add is allowed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A policy preloaded with [`DEFAULT_GROUPS`].
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut policy = Self::new();
        for (name, kinds) in DEFAULT_GROUPS {
            policy.register_group(name, kinds);
        }
        policy
    }

    /// Register (or replace) a group by kind names.
    pub fn register_group(&mut self, name: &str, kinds: &[&str]) {
        let set = kinds.iter().map(|k| ComponentKind::from_name(k)).collect();
        self.groups.insert(name.to_owned(), set);
    }

    #[must_use]
    pub fn group(&self, name: &str) -> Option<&BTreeSet<ComponentKind>> {
        self.groups.get(name)
    }

    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.keys().map(String::as_str)
    }

    /// Every kind sharing at least one group with `kind`, excluding `kind`.
    #[must_use]
    pub fn exclusive_with(&self, kind: ComponentKind) -> BTreeSet<ComponentKind> {
        self.groups
            .values()
            .filter(|set| set.contains(&kind))
            .flat_map(|set| set.iter().copied())
            .filter(|&other| other != kind)
            .collect()
    }

    /// Whether adding `kind` to `entity` respects every group.
    ///
    /// Re-adding a kind the entity already holds is not a mutex violation
    /// (the store reports that as a duplicate instead).
    #[must_use]
    pub fn can_add(&self, store: &ComponentStore, entity: Entity, kind: ComponentKind) -> bool {
        self.exclusive_with(kind)
            .into_iter()
            .all(|other| !store.has_kind(entity, other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::Component;

    #[derive(Debug)]
    struct Unit;
    impl Component for Unit {
        fn type_name() -> &'static str {
            "unit"
        }
    }

    #[derive(Debug)]
    struct Projectile;
    impl Component for Projectile {
        fn type_name() -> &'static str {
            "projectile"
        }
    }

    #[test]
    fn test_defaults_register_five_groups() {
        let policy = MutexPolicy::with_defaults();
        assert_eq!(
            policy.group_names().collect::<Vec<_>>(),
            vec!["collision", "control", "lifecycle", "motion", "target"]
        );
        assert_eq!(policy.group("motion").unwrap().len(), 3);
    }

    #[test]
    fn test_unit_rejects_projectile() {
        let policy = MutexPolicy::with_defaults();
        let mut store = ComponentStore::new();
        let e = store.create();
        store.add(e, Unit).unwrap();
        assert!(!policy.can_add(&store, e, Projectile::kind()));
        assert!(policy.can_add(&store, e, Unit::kind()));
    }

    #[test]
    fn test_policy_is_advisory() {
        let policy = MutexPolicy::with_defaults();
        let mut store = ComponentStore::new();
        let e = store.create();
        store.add(e, Unit).unwrap();
        assert!(!policy.can_add(&store, e, Projectile::kind()));
        store.add(e, Projectile).unwrap();
        assert!(store.has::<Projectile>(e));
    }

    #[test]
    fn test_exclusive_with_spans_groups() {
        let policy = MutexPolicy::with_defaults();
        let others = policy.exclusive_with(ComponentKind::from_name("unit"));
        for name in ["projectile", "stationary", "projectile_effect", "structure"] {
            assert!(others.contains(&ComponentKind::from_name(name)), "{name}");
        }
        assert!(!others.contains(&ComponentKind::from_name("unit")));
    }

    #[test]
    fn test_empty_policy_allows_everything() {
        let policy = MutexPolicy::new();
        let mut store = ComponentStore::new();
        let e = store.create();
        store.add(e, Unit).unwrap();
        assert!(policy.can_add(&store, e, Projectile::kind()));
    }
}

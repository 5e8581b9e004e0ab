//! System scheduler: named systems in prioritised groups.
//!
//! Each frame the scheduler orders groups by descending priority, skips
//! disabled groups, and within a group runs systems by descending system
//! priority. Ties keep registration order, so a frame is fully deterministic.
//!
//! ```text
//!  core (Highest) ─► combat (High) ─► physics (High) ─► movement (Normal) ─► ...
//!     │                 │
//!     └ sys a (High)    └ combat (High), skills (Normal)
//! ```
//!
//! A system error aborts the frame and is returned to the caller unchanged.

use std::fmt;

use arena_component::EcsError;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::world::World;

/// Ordering weight for groups and systems. Larger runs earlier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemPriority {
    Lowest,
    Low,
    Normal,
    High,
    Highest,
}

/// The built-in group categories plus a user-defined one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SystemGroupKind {
    Core,
    Combat,
    Movement,
    Ai,
    Visual,
    Physics,
    Network,
    Ui,
    Audio,
    Custom,
}

impl SystemGroupKind {
    pub const ALL: [SystemGroupKind; 10] = [
        Self::Core,
        Self::Combat,
        Self::Movement,
        Self::Ai,
        Self::Visual,
        Self::Physics,
        Self::Network,
        Self::Ui,
        Self::Audio,
        Self::Custom,
    ];

    /// The priority a group of this kind starts with.
    #[must_use]
    pub const fn default_priority(self) -> SystemPriority {
        match self {
            Self::Core => SystemPriority::Highest,
            Self::Combat | Self::Physics => SystemPriority::High,
            Self::Movement | Self::Ai | Self::Network | Self::Custom => SystemPriority::Normal,
            Self::Visual | Self::Ui | Self::Audio => SystemPriority::Low,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Core => "core",
            Self::Combat => "combat",
            Self::Movement => "movement",
            Self::Ai => "ai",
            Self::Visual => "visual",
            Self::Physics => "physics",
            Self::Network => "network",
            Self::Ui => "ui",
            Self::Audio => "audio",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for SystemGroupKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A per-frame transformer over the world.
///
/// Systems receive the world explicitly on every call; they hold no world
/// reference of their own.
pub trait System {
    /// Called once when the system is added, before its first update.
    fn init(&mut self, _world: &mut World) {}

    /// Advance one frame.
    ///
    /// # Errors
    ///
    /// Any [`EcsError`] aborts the current frame and propagates out of
    /// [`World::update`].
    fn update(&mut self, world: &mut World, dt: f32) -> Result<(), EcsError>;

    /// Intra-group ordering used when the config does not override it.
    fn priority(&self) -> SystemPriority {
        SystemPriority::Normal
    }
}

/// Registration parameters for [`World::add_system`].
#[derive(Debug, Clone)]
pub struct SystemConfig {
    /// Unique system name (e.g. `"movement"`).
    pub name: String,
    /// Group the system belongs to.
    pub group: SystemGroupKind,
    /// Overrides [`System::priority`] when set.
    pub priority: Option<SystemPriority>,
    /// `false` disables the whole target group.
    pub enabled: bool,
}

impl SystemConfig {
    #[must_use]
    pub fn new(name: impl Into<String>, group: SystemGroupKind) -> Self {
        Self {
            name: name.into(),
            group,
            priority: None,
            enabled: true,
        }
    }

    /// Override the system's own priority.
    #[must_use]
    pub fn with_priority(mut self, priority: SystemPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Register with the target group disabled.
    #[must_use]
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

struct SystemEntry {
    name: String,
    priority: SystemPriority,
    /// `None` while the system is checked out for its update.
    system: Option<Box<dyn System>>,
}

/// A named, prioritised bucket of systems.
pub struct SystemGroup {
    kind: SystemGroupKind,
    priority: SystemPriority,
    enabled: bool,
    systems: Vec<SystemEntry>,
}

impl SystemGroup {
    fn new(kind: SystemGroupKind, priority: SystemPriority) -> Self {
        Self {
            kind,
            priority,
            enabled: true,
            systems: Vec::new(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> SystemGroupKind {
        self.kind
    }

    #[must_use]
    pub fn priority(&self) -> SystemPriority {
        self.priority
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// System names in registration order.
    pub fn system_names(&self) -> impl Iterator<Item = &str> {
        self.systems.iter().map(|s| s.name.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }

    /// Indices of the members in execution order.
    fn execution_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.systems.len()).collect();
        order.sort_by(|&a, &b| self.systems[b].priority.cmp(&self.systems[a].priority));
        order
    }
}

impl fmt::Debug for SystemGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SystemGroup")
            .field("kind", &self.kind)
            .field("priority", &self.priority)
            .field("enabled", &self.enabled)
            .field("systems", &self.system_names().collect::<Vec<_>>())
            .finish()
    }
}

/// Owns every group and drives them once per frame.
#[derive(Debug)]
pub struct SystemScheduler {
    groups: Vec<SystemGroup>,
}

impl SystemScheduler {
    /// A scheduler with one group per [`SystemGroupKind`] at its default
    /// priority.
    #[must_use]
    pub fn new() -> Self {
        let groups = SystemGroupKind::ALL
            .iter()
            .map(|&kind| SystemGroup::new(kind, kind.default_priority()))
            .collect();
        Self { groups }
    }

    /// Create or re-prioritise a group.
    pub fn register_group(&mut self, kind: SystemGroupKind, priority: SystemPriority) {
        match self.group_mut(kind) {
            Some(group) => group.priority = priority,
            None => self.groups.push(SystemGroup::new(kind, priority)),
        }
    }

    #[must_use]
    pub fn group(&self, kind: SystemGroupKind) -> Option<&SystemGroup> {
        self.groups.iter().find(|g| g.kind == kind)
    }

    fn group_mut(&mut self, kind: SystemGroupKind) -> Option<&mut SystemGroup> {
        self.groups.iter_mut().find(|g| g.kind == kind)
    }

    fn group_or_insert(&mut self, kind: SystemGroupKind) -> &mut SystemGroup {
        if self.group(kind).is_none() {
            self.groups
                .push(SystemGroup::new(kind, kind.default_priority()));
        }
        let idx = self
            .groups
            .iter()
            .position(|g| g.kind == kind)
            .unwrap_or(self.groups.len() - 1);
        &mut self.groups[idx]
    }

    /// Store an already-initialised system. A same-named system anywhere in
    /// the scheduler is replaced, with a warning.
    pub(crate) fn insert(&mut self, config: SystemConfig, system: Box<dyn System>) {
        let priority = config.priority.unwrap_or_else(|| system.priority());
        let entry = SystemEntry {
            name: config.name,
            priority,
            system: Some(system),
        };

        let existing = self.groups.iter().enumerate().find_map(|(gi, g)| {
            g.systems
                .iter()
                .position(|s| s.name == entry.name)
                .map(|si| (gi, si))
        });

        if let Some((gi, si)) = existing {
            warn!(
                system = %entry.name,
                group = %self.groups[gi].kind,
                "system already registered, replacing"
            );
            if self.groups[gi].kind == config.group {
                let group = &mut self.groups[gi];
                group.systems[si] = entry;
                if !config.enabled {
                    group.enabled = false;
                }
                return;
            }
            self.groups[gi].systems.remove(si);
        }

        let group = self.group_or_insert(config.group);
        group.systems.push(entry);
        if !config.enabled {
            group.enabled = false;
        }
        debug!(group = %config.group, "system registered");
    }

    /// Remove a system by name from whichever group holds it.
    pub fn remove_system(&mut self, name: &str) -> bool {
        for group in &mut self.groups {
            if let Some(pos) = group.systems.iter().position(|s| s.name == name) {
                group.systems.remove(pos);
                return true;
            }
        }
        false
    }

    #[must_use]
    pub fn contains_system(&self, name: &str) -> bool {
        self.groups
            .iter()
            .any(|g| g.systems.iter().any(|s| s.name == name))
    }

    /// Enable or disable a group. Returns `false` for an unknown group.
    pub fn set_group_enabled(&mut self, kind: SystemGroupKind, enabled: bool) -> bool {
        match self.group_mut(kind) {
            Some(group) => {
                group.enabled = enabled;
                true
            }
            None => false,
        }
    }

    /// Total registered systems.
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.iter().map(SystemGroup::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// System names in the order the next frame would run them.
    #[must_use]
    pub fn execution_order(&self) -> Vec<&str> {
        self.group_order()
            .into_iter()
            .map(|gi| &self.groups[gi])
            .filter(|g| g.enabled)
            .flat_map(|g| {
                g.execution_order()
                    .into_iter()
                    .map(move |si| g.systems[si].name.as_str())
            })
            .collect()
    }

    fn group_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.groups.len()).collect();
        order.sort_by(|&a, &b| self.groups[b].priority.cmp(&self.groups[a].priority));
        order
    }

    /// Names of the systems to run this frame, fixed at frame start.
    pub(crate) fn frame_plan(&self) -> Vec<String> {
        self.execution_order().into_iter().map(str::to_owned).collect()
    }

    /// Take a planned system out of its slot for one update. `None` if it was
    /// removed, its group was disabled, or it is already running.
    pub(crate) fn checkout(&mut self, name: &str) -> Option<Box<dyn System>> {
        self.groups
            .iter_mut()
            .filter(|g| g.enabled)
            .flat_map(|g| g.systems.iter_mut())
            .find(|s| s.name == name)
            .and_then(|s| s.system.take())
    }

    /// Return a checked-out system. It is dropped if its entry was removed or
    /// replaced while it ran.
    pub(crate) fn checkin(&mut self, name: &str, system: Box<dyn System>) {
        let slot = self
            .groups
            .iter_mut()
            .flat_map(|g| g.systems.iter_mut())
            .find(|s| s.name == name && s.system.is_none());
        match slot {
            Some(entry) => entry.system = Some(system),
            None => debug!(system = name, "system removed while running"),
        }
    }
}

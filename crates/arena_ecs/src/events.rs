//! Synchronous publish/subscribe between systems and outside reactors.
//!
//! Handlers receive `&mut World`, so emission happens through
//! [`World::emit`], which snapshots the topic's handler list first. Handlers
//! added or removed during an emission take effect for the next one.
//!
//! A handler is never re-entered. An event that reaches a handler while it is
//! still running is queued and delivered once the outermost emission returns,
//! in the order it was raised.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::rc::Rc;

use arena_component::Entity;
use serde::{Deserialize, Serialize};

use crate::world::World;

/// Event topics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    UnitDied,
    ProjectileHit,
    ProjectileBounce,
    SkillCastStart,
    SkillCastEnd,
    SkillEffectEnd,
    SkillCooldownEnd,
}

impl Topic {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::UnitDied => "unit_died",
            Self::ProjectileHit => "projectile_hit",
            Self::ProjectileBounce => "projectile_bounce",
            Self::SkillCastStart => "skill_cast_start",
            Self::SkillCastEnd => "skill_cast_end",
            Self::SkillEffectEnd => "skill_effect_end",
            Self::SkillCooldownEnd => "skill_cooldown_end",
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Event payloads. Entity fields are non-owning and may already be dead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "topic", rename_all = "snake_case")]
pub enum GameEvent {
    UnitDied {
        unit: Entity,
        killer: Option<Entity>,
    },
    ProjectileHit {
        projectile: Entity,
        target: Entity,
        damage: f32,
        /// Names of the status effects applied with the hit.
        effects: Vec<String>,
    },
    ProjectileBounce {
        projectile: Entity,
        new_target: Entity,
    },
    SkillCastStart {
        entity: Entity,
        skill: String,
    },
    SkillCastEnd {
        entity: Entity,
        skill: String,
    },
    SkillEffectEnd {
        entity: Entity,
        effect: String,
        source: Entity,
    },
    SkillCooldownEnd {
        entity: Entity,
        skill: String,
    },
}

impl GameEvent {
    #[must_use]
    pub fn topic(&self) -> Topic {
        match self {
            Self::UnitDied { .. } => Topic::UnitDied,
            Self::ProjectileHit { .. } => Topic::ProjectileHit,
            Self::ProjectileBounce { .. } => Topic::ProjectileBounce,
            Self::SkillCastStart { .. } => Topic::SkillCastStart,
            Self::SkillCastEnd { .. } => Topic::SkillCastEnd,
            Self::SkillEffectEnd { .. } => Topic::SkillEffectEnd,
            Self::SkillCooldownEnd { .. } => Topic::SkillCooldownEnd,
        }
    }
}

/// Identifies one subscription for [`EventBus::off`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HandlerId(u64);

pub(crate) type Handler = Rc<RefCell<dyn FnMut(&mut World, &GameEvent)>>;

/// Topic -> subscribers.
#[derive(Default)]
pub struct EventBus {
    next_id: u64,
    handlers: HashMap<Topic, Vec<(HandlerId, Handler)>>,
    depth: u32,
    deferred: VecDeque<(Handler, GameEvent)>,
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let counts: HashMap<_, _> = self.handlers.iter().map(|(t, h)| (*t, h.len())).collect();
        f.debug_struct("EventBus")
            .field("handlers", &counts)
            .field("deferred", &self.deferred.len())
            .finish()
    }
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to a topic.
    pub fn on<F>(&mut self, topic: Topic, handler: F) -> HandlerId
    where
        F: FnMut(&mut World, &GameEvent) + 'static,
    {
        self.next_id += 1;
        let id = HandlerId(self.next_id);
        self.handlers
            .entry(topic)
            .or_default()
            .push((id, Rc::new(RefCell::new(handler))));
        id
    }

    /// Unsubscribe. Returns `false` if the id was not subscribed to `topic`.
    pub fn off(&mut self, topic: Topic, id: HandlerId) -> bool {
        let Some(list) = self.handlers.get_mut(&topic) else {
            return false;
        };
        let before = list.len();
        list.retain(|(hid, _)| *hid != id);
        let removed = list.len() != before;
        if list.is_empty() {
            self.handlers.remove(&topic);
        }
        removed
    }

    #[must_use]
    pub fn handler_count(&self, topic: Topic) -> usize {
        self.handlers.get(&topic).map_or(0, Vec::len)
    }

    /// Current subscribers of `topic`, cloned so the caller can invoke them
    /// while the world (and this bus) is mutably borrowed.
    pub(crate) fn snapshot(&self, topic: Topic) -> Vec<Handler> {
        self.handlers
            .get(&topic)
            .map(|list| list.iter().map(|(_, h)| Rc::clone(h)).collect())
            .unwrap_or_default()
    }

    pub(crate) fn enter(&mut self) {
        self.depth += 1;
    }

    /// Returns `true` when the outermost emission has finished.
    pub(crate) fn leave(&mut self) -> bool {
        self.depth = self.depth.saturating_sub(1);
        self.depth == 0
    }

    pub(crate) fn defer(&mut self, handler: &Handler, event: &GameEvent) {
        self.deferred.push_back((Rc::clone(handler), event.clone()));
    }

    pub(crate) fn next_deferred(&mut self) -> Option<(Handler, GameEvent)> {
        self.deferred.pop_front()
    }

    /// Events waiting for a busy handler.
    #[must_use]
    pub fn deferred_count(&self) -> usize {
        self.deferred.len()
    }
}

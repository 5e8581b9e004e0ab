//! Mobile hazard components.

use std::collections::HashSet;

use arena_component::{Component, Entity};
use arena_math::Vec2;
use serde::{Deserialize, Serialize};

use super::unit::Faction;

/// Damage state of a tornado.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tornado {
    pub source: Entity,
    pub source_faction: Faction,
    /// Damage per tick.
    pub damage: f32,
    /// Seconds remaining.
    pub duration: f32,
    pub tick_timer: f32,
    pub tick_interval: f32,
    /// Damage radius.
    pub radius: f32,
    /// Where the tornado is heading, once a target has been found.
    pub target_pos: Option<Vec2>,
    /// Entities damaged during the current tick.
    pub hit_entities: HashSet<Entity>,
}

impl Component for Tornado {
    fn type_name() -> &'static str {
        "tornado"
    }
}

/// Steering state of a tornado.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TornadoMovement {
    pub speed: f32,
    pub search_radius: f32,
    /// Seconds since the last successful target search.
    pub retarget_timer: f32,
    pub retarget_interval: f32,
}

impl TornadoMovement {
    /// Starts due for a search so the first frame picks a target.
    #[must_use]
    pub fn new(speed: f32, search_radius: f32, retarget_interval: f32) -> Self {
        Self {
            speed,
            search_radius,
            retarget_timer: retarget_interval,
            retarget_interval,
        }
    }
}

impl Component for TornadoMovement {
    fn type_name() -> &'static str {
        "tornado_movement"
    }
}

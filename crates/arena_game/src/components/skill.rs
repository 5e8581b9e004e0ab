//! Cast requests and cooldown read-models.

use std::collections::BTreeMap;

use arena_component::{Component, Entity};
use serde::{Deserialize, Serialize};

use crate::config::SkillType;

/// A one-shot cast order, consumed by the skill system on its next update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillRequest {
    pub skill: SkillType,
    pub target: Entity,
}

impl Component for SkillRequest {
    fn type_name() -> &'static str {
        "skill_request"
    }
}

/// Per-skill cooldowns of a caster, published by the skill system each frame
/// so that cast decisions can see which skills are ready.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillCooldowns {
    pub remaining: BTreeMap<SkillType, f32>,
}

impl SkillCooldowns {
    /// Skills absent from the map have never been cast and are ready.
    #[must_use]
    pub fn is_ready(&self, skill: SkillType) -> bool {
        self.remaining.get(&skill).is_none_or(|&cd| cd <= 0.0)
    }
}

impl Component for SkillCooldowns {
    fn type_name() -> &'static str {
        "skill_cooldowns"
    }
}

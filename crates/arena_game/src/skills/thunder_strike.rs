//! Instant area burst at the target point, with a brief lightning visual.

use arena_component::{EcsError, Entity};
use arena_ecs::World;
use arena_math::{Position, Vec2};

use super::{Skill, SkillCore, faction_of};
use crate::combat::{damage_area, position_of};
use crate::components::{Sprite, Trail};
use crate::config::{SkillConfig, SkillType};

const EFFECT_DURATION: f32 = 0.2;
const LIGHTNING_HEIGHT: f32 = 200.0;
const DEFAULT_AOE_RADIUS: f32 = 50.0;
const DEFAULT_DAMAGE: f32 = 40.0;

#[derive(Debug)]
pub struct ThunderStrike {
    core: SkillCore,
}

impl ThunderStrike {
    #[must_use]
    pub fn new(config: SkillConfig) -> Self {
        Self {
            core: SkillCore::new(config),
        }
    }
}

impl Skill for ThunderStrike {
    fn skill_type(&self) -> SkillType {
        SkillType::ThunderStrike
    }

    fn core(&self) -> &SkillCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut SkillCore {
        &mut self.core
    }

    fn perform(&mut self, world: &mut World, source: Entity, target: Entity) -> Result<bool, EcsError> {
        let (Some(center), Some(faction)) = (position_of(world, target), faction_of(world, source))
        else {
            return Ok(false);
        };
        let radius = self.core.config.aoe_radius.unwrap_or(DEFAULT_AOE_RADIUS);
        let damage = self.core.config.damage.unwrap_or(DEFAULT_DAMAGE);

        // Expires on its own countdown whatever the strike resolves to.
        let bolt = world.create_entity();
        world.add_component(bolt, Position(center))?;
        world.add_component(bolt, Sprite::disc(radius, "#4444FF"))?;
        world.add_component(
            bolt,
            Trail::fixed([center - Vec2::new(0.0, LIGHTNING_HEIGHT), center]),
        )?;
        self.core.track(bolt, EFFECT_DURATION);

        damage_area(world, center, radius, faction, damage, source);
        Ok(true)
    }
}

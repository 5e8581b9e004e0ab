//! Tornado: spawns a roaming hazard driven by the tornado system.

use std::collections::HashSet;

use arena_component::{EcsError, Entity};
use arena_ecs::World;
use arena_math::Position;

use super::{Skill, SkillCore, faction_of};
use crate::combat::position_of;
use crate::components::{Sprite, Tornado, TornadoMovement};
use crate::config::{SkillConfig, SkillType};

const DEFAULT_DAMAGE: f32 = 15.0;
const DEFAULT_DURATION: f32 = 8.0;
const DEFAULT_TICK_INTERVAL: f32 = 1.0;
const DEFAULT_RADIUS: f32 = 40.0;
const DEFAULT_SPEED: f32 = 100.0;
const DEFAULT_RETARGET_INTERVAL: f32 = 0.5;

#[derive(Debug)]
pub struct TornadoSkill {
    core: SkillCore,
}

impl TornadoSkill {
    #[must_use]
    pub fn new(config: SkillConfig) -> Self {
        Self {
            core: SkillCore::new(config),
        }
    }
}

impl Skill for TornadoSkill {
    fn skill_type(&self) -> SkillType {
        SkillType::Tornado
    }

    fn core(&self) -> &SkillCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut SkillCore {
        &mut self.core
    }

    /// The tornado starts on the caster and owns its own lifetime.
    fn perform(&mut self, world: &mut World, source: Entity, _target: Entity) -> Result<bool, EcsError> {
        let (Some(origin), Some(faction)) = (position_of(world, source), faction_of(world, source))
        else {
            return Ok(false);
        };
        let config = &self.core.config;
        let radius = config.aoe_radius.unwrap_or(DEFAULT_RADIUS);

        let tornado = world.create_entity();
        world.add_component(tornado, Position(origin))?;
        world.add_component(
            tornado,
            Tornado {
                source,
                source_faction: faction,
                damage: config.damage.unwrap_or(DEFAULT_DAMAGE),
                duration: config.duration.unwrap_or(DEFAULT_DURATION),
                tick_timer: 0.0,
                tick_interval: config.tick_interval.unwrap_or(DEFAULT_TICK_INTERVAL),
                radius,
                target_pos: None,
                hit_entities: HashSet::new(),
            },
        )?;
        world.add_component(
            tornado,
            TornadoMovement::new(
                config.move_speed.unwrap_or(DEFAULT_SPEED),
                config.range,
                config.retarget_interval.unwrap_or(DEFAULT_RETARGET_INTERVAL),
            ),
        )?;
        world.add_component(tornado, Sprite::disc(radius, "#88CCFF"))?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use arena_component::Query;

    use super::*;
    use crate::components::Faction;
    use crate::skills::test_support::spawn_unit;

    #[test]
    fn test_spawns_hazard_at_caster() {
        let mut world = World::new();
        let caster = spawn_unit(&mut world, Faction::Player, 10.0, 20.0, 100.0);
        let target = spawn_unit(&mut world, Faction::Enemy, 200.0, 0.0, 100.0);
        let mut skill = TornadoSkill::new(SkillConfig::default_for(SkillType::Tornado));
        assert!(skill.cast(&mut world, caster, target).unwrap());

        let spawned = world.query(&Query::new().with::<Tornado>().with::<TornadoMovement>());
        assert_eq!(spawned.len(), 1);
        let t = world.get_component::<Tornado>(spawned[0]).unwrap();
        assert_eq!((t.source, t.source_faction), (caster, Faction::Player));
        assert_eq!((t.damage, t.duration, t.radius), (15.0, 8.0, 40.0));
        let m = world.get_component::<TornadoMovement>(spawned[0]).unwrap();
        assert_eq!((m.speed, m.search_radius), (100.0, 300.0));
        assert_eq!(
            world.get_component::<Position>(spawned[0]).unwrap().0,
            arena_math::Vec2::new(10.0, 20.0)
        );
        assert!(!skill.has_active_effects());
        assert!(skill.core().is_on_cooldown());
    }
}

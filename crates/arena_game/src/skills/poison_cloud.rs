//! Poison cloud: a stationary hazard that damages hostiles on a fixed tick.

use arena_component::{EcsError, Entity};
use arena_ecs::World;
use arena_math::{Position, Vec2};
use tracing::trace;

use super::{Skill, SkillCore, faction_of};
use crate::combat::{damage_area, position_of};
use crate::components::{Faction, Sprite};
use crate::config::{SkillConfig, SkillType};

const DEFAULT_DAMAGE: f32 = 10.0;
const DEFAULT_AOE_RADIUS: f32 = 60.0;
const DEFAULT_DURATION: f32 = 5.0;
const DEFAULT_TICK_INTERVAL: f32 = 1.0;

#[derive(Debug, Clone)]
struct Cloud {
    entity: Entity,
    center: Vec2,
    faction: Faction,
    source: Entity,
    tick_timer: f32,
}

#[derive(Debug)]
pub struct PoisonCloud {
    core: SkillCore,
    clouds: Vec<Cloud>,
}

impl PoisonCloud {
    #[must_use]
    pub fn new(config: SkillConfig) -> Self {
        Self {
            core: SkillCore::new(config),
            clouds: Vec::new(),
        }
    }

    fn radius(&self) -> f32 {
        self.core.config.aoe_radius.unwrap_or(DEFAULT_AOE_RADIUS)
    }
}

impl Skill for PoisonCloud {
    fn skill_type(&self) -> SkillType {
        SkillType::PoisonCloud
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
        let entity = world.create_entity();
        world.add_component(entity, Position(center))?;
        world.add_component(entity, Sprite::disc(self.radius(), "#7CFC00"))?;
        self.core
            .track(entity, self.core.config.duration.unwrap_or(DEFAULT_DURATION));
        self.clouds.push(Cloud {
            entity,
            center,
            faction,
            source,
            tick_timer: 0.0,
        });
        Ok(true)
    }

    fn advance(&mut self, world: &mut World, dt: f32) -> Result<(), EcsError> {
        self.clouds.retain(|c| world.exists(c.entity));
        let radius = self.radius();
        let damage = self.core.config.damage.unwrap_or(DEFAULT_DAMAGE);
        let interval = self
            .core
            .config
            .tick_interval
            .unwrap_or(DEFAULT_TICK_INTERVAL)
            .max(f32::EPSILON);

        for cloud in &mut self.clouds {
            cloud.tick_timer += dt;
            while cloud.tick_timer >= interval {
                cloud.tick_timer -= interval;
                let struck = damage_area(world, cloud.center, radius, cloud.faction, damage, cloud.source);
                trace!(cloud = %cloud.entity, struck = struck.len(), "poison tick");
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skills::test_support::{health, spawn_unit};

    #[test]
    fn test_ticks_once_per_interval_for_its_lifetime() {
        let mut world = World::new();
        let caster = spawn_unit(&mut world, Faction::Player, 0.0, 0.0, 100.0);
        let target = spawn_unit(&mut world, Faction::Enemy, 100.0, 0.0, 100.0);
        let bystander = spawn_unit(&mut world, Faction::Enemy, 100.0, 50.0, 100.0);
        let outside = spawn_unit(&mut world, Faction::Enemy, 100.0, 80.0, 100.0);

        let mut skill = PoisonCloud::new(SkillConfig::default_for(SkillType::PoisonCloud));
        assert!(skill.cast(&mut world, caster, target).unwrap());

        for _ in 0..3 {
            skill.update(&mut world, caster, 0.25).unwrap();
        }
        assert_eq!(health(&world, target), Some(100.0));
        skill.update(&mut world, caster, 0.25).unwrap();
        assert_eq!(health(&world, target), Some(90.0));

        for _ in 0..16 {
            skill.update(&mut world, caster, 0.25).unwrap();
        }
        assert_eq!(health(&world, target), Some(50.0));
        assert_eq!(health(&world, bystander), Some(50.0));
        assert_eq!(health(&world, outside), Some(100.0));
        assert!(!skill.has_active_effects());

        for _ in 0..8 {
            skill.update(&mut world, caster, 0.25).unwrap();
        }
        assert_eq!(health(&world, target), Some(50.0));
    }

    #[test]
    fn test_cloud_stays_where_it_was_cast() {
        let mut world = World::new();
        let caster = spawn_unit(&mut world, Faction::Player, 0.0, 0.0, 100.0);
        let target = spawn_unit(&mut world, Faction::Enemy, 100.0, 0.0, 100.0);
        let mut skill = PoisonCloud::new(SkillConfig::default_for(SkillType::PoisonCloud));
        skill.cast(&mut world, caster, target).unwrap();

        world.get_component_mut::<Position>(target).unwrap().0 = Vec2::new(400.0, 0.0);
        skill.update(&mut world, caster, 1.0).unwrap();
        assert_eq!(health(&world, target), Some(100.0));
    }

    #[test]
    fn test_ticks_continue_after_caster_dies() {
        let mut world = World::new();
        let caster = spawn_unit(&mut world, Faction::Player, 0.0, 0.0, 100.0);
        let target = spawn_unit(&mut world, Faction::Enemy, 100.0, 0.0, 100.0);
        let mut skill = PoisonCloud::new(SkillConfig::default_for(SkillType::PoisonCloud));
        skill.cast(&mut world, caster, target).unwrap();
        world.destroy_entity(caster);

        skill.update(&mut world, caster, 1.0).unwrap();
        assert_eq!(health(&world, target), Some(90.0));
    }
}

//! Frost nova: damages and slows every hostile around the caster.

use arena_component::{EcsError, Entity};
use arena_ecs::World;
use arena_math::Position;

use super::{Skill, SkillCore, faction_of};
use crate::combat::{apply_status, damage_area, position_of};
use crate::components::{Sprite, StatusEffect, StatusKind};
use crate::config::{SkillConfig, SkillType};

const RING_DURATION: f32 = 0.3;
const DEFAULT_DAMAGE: f32 = 25.0;
const DEFAULT_AOE_RADIUS: f32 = 100.0;
const DEFAULT_SLOW: f32 = 0.5;
const DEFAULT_SLOW_DURATION: f32 = 2.0;

#[derive(Debug)]
pub struct FrostNova {
    core: SkillCore,
}

impl FrostNova {
    #[must_use]
    pub fn new(config: SkillConfig) -> Self {
        Self {
            core: SkillCore::new(config),
        }
    }
}

impl Skill for FrostNova {
    fn skill_type(&self) -> SkillType {
        SkillType::FrostNova
    }

    fn core(&self) -> &SkillCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut SkillCore {
        &mut self.core
    }

    fn perform(&mut self, world: &mut World, source: Entity, _target: Entity) -> Result<bool, EcsError> {
        let (Some(center), Some(faction)) = (position_of(world, source), faction_of(world, source))
        else {
            return Ok(false);
        };
        let config = &self.core.config;
        let radius = config.aoe_radius.unwrap_or(DEFAULT_AOE_RADIUS);
        let slow = StatusEffect::new(
            StatusKind::Debuff,
            config.status_duration.unwrap_or(DEFAULT_SLOW_DURATION),
            config.status_value.unwrap_or(DEFAULT_SLOW),
            source,
        );

        let struck = damage_area(
            world,
            center,
            radius,
            faction,
            config.damage.unwrap_or(DEFAULT_DAMAGE),
            source,
        );
        for target in struck {
            if world.exists(target) {
                apply_status(world, target, slow.clone())?;
            }
        }

        let ring = world.create_entity();
        world.add_component(ring, Position(center))?;
        world.add_component(ring, Sprite::disc(radius, "#A0E6FF"))?;
        self.core.track(ring, RING_DURATION);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::speed_multiplier;
    use crate::components::{Faction, StatusEffects};
    use crate::skills::test_support::{health, spawn_unit};

    #[test]
    fn test_centred_on_caster_and_slows_survivors() {
        let mut world = World::new();
        let caster = spawn_unit(&mut world, Faction::Player, 0.0, 0.0, 100.0);
        let survivor = spawn_unit(&mut world, Faction::Enemy, 60.0, 0.0, 100.0);
        let victim = spawn_unit(&mut world, Faction::Enemy, -60.0, 0.0, 20.0);
        let far = spawn_unit(&mut world, Faction::Enemy, 500.0, 0.0, 100.0);

        let mut skill = FrostNova::new(SkillConfig::default_for(SkillType::FrostNova));
        // The target is irrelevant; the nova is centred on the caster.
        assert!(skill.cast(&mut world, caster, far).unwrap());

        assert_eq!(health(&world, survivor), Some(75.0));
        assert!(!world.exists(victim));
        assert_eq!(health(&world, far), Some(100.0));
        assert!((speed_multiplier(&world, survivor) - 0.5).abs() < 1e-6);
        assert!(!world.has_component::<StatusEffects>(far));
        assert!(!world.has_component::<StatusEffects>(caster));
    }
}

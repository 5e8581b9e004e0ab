//! Healing aura: a heal-over-time on the caster and allies in range.

use arena_component::{EcsError, Entity};
use arena_ecs::World;
use arena_math::Position;

use super::{Skill, SkillCore, faction_of};
use crate::combat::{apply_status, position_of, units_within};
use crate::components::{Sprite, StatusEffect, StatusKind};
use crate::config::{SkillConfig, SkillType};

const VISUAL_DURATION: f32 = 0.5;
const DEFAULT_HEALING: f32 = 20.0;
const DEFAULT_AOE_RADIUS: f32 = 80.0;
const DEFAULT_DURATION: f32 = 5.0;

/// Heals the caster and nearby allies over time.
#[derive(Debug)]
pub struct HealingAura {
    core: SkillCore,
}

impl HealingAura {
    #[must_use]
    pub fn new(config: SkillConfig) -> Self {
        Self {
            core: SkillCore::new(config),
        }
    }
}

impl Skill for HealingAura {
    fn skill_type(&self) -> SkillType {
        SkillType::HealingAura
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
        let duration = config.duration.unwrap_or(DEFAULT_DURATION).max(f32::EPSILON);
        let per_second = config.healing.unwrap_or(DEFAULT_HEALING) / duration;
        let regen = StatusEffect::new(StatusKind::HealOverTime, duration, per_second, source);

        for ally in units_within(world, center, radius, faction) {
            apply_status(world, ally, regen.clone())?;
        }

        let glow = world.create_entity();
        world.add_component(glow, Position(center))?;
        world.add_component(glow, Sprite::disc(radius, "#98FB98"))?;
        self.core.track(glow, VISUAL_DURATION);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Faction, StatusEffects};
    use crate::skills::test_support::spawn_unit;

    #[test]
    fn test_regen_goes_to_allies_in_radius() {
        let mut world = World::new();
        let caster = spawn_unit(&mut world, Faction::Enemy, 0.0, 0.0, 100.0);
        let ally = spawn_unit(&mut world, Faction::Enemy, 50.0, 0.0, 100.0);
        let distant_ally = spawn_unit(&mut world, Faction::Enemy, 200.0, 0.0, 100.0);
        let foe = spawn_unit(&mut world, Faction::Player, 30.0, 0.0, 100.0);

        let mut skill = HealingAura::new(SkillConfig::default_for(SkillType::HealingAura));
        assert!(skill.cast(&mut world, caster, foe).unwrap());

        for e in [caster, ally] {
            let fx = world.get_component::<StatusEffects>(e).unwrap();
            assert_eq!(fx.len(), 1);
            assert_eq!(fx.effects[0].kind, StatusKind::HealOverTime);
            assert!((fx.effects[0].value - 4.0).abs() < 1e-6);
            assert!((fx.effects[0].duration - 5.0).abs() < 1e-6);
        }
        assert!(!world.has_component::<StatusEffects>(distant_ally));
        assert!(!world.has_component::<StatusEffects>(foe));
    }

    #[test]
    fn test_recast_refreshes_instead_of_stacking() {
        let mut world = World::new();
        let caster = spawn_unit(&mut world, Faction::Player, 0.0, 0.0, 100.0);
        let mut skill = HealingAura::new(SkillConfig::default_for(SkillType::HealingAura));
        skill.cast(&mut world, caster, caster).unwrap();
        skill.core_mut().cooldown = 0.0;
        skill.cast(&mut world, caster, caster).unwrap();
        assert_eq!(world.get_component::<StatusEffects>(caster).unwrap().len(), 1);
    }
}

//! Homing fireball: splashes on impact and leaves a burn.

use arena_component::{EcsError, Entity};
use arena_ecs::World;

use super::{Launch, Skill, SkillCore, faction_of, launch_projectile};
use crate::combat::position_of;
use crate::components::{MotionKind, ProjectileEffect, Sprite, StatusEffect, StatusKind};
use crate::config::{ProjectileTuning, SkillConfig, SkillType};

const DEFAULT_DAMAGE: f32 = 30.0;
const DEFAULT_SPEED: f32 = 200.0;
const DEFAULT_AOE_RADIUS: f32 = 40.0;
const DEFAULT_BURN_DPS: f32 = 5.0;
const DEFAULT_BURN_DURATION: f32 = 3.0;
const BURN_MAX_STACKS: u32 = 3;

#[derive(Debug)]
pub struct Fireball {
    core: SkillCore,
    tuning: ProjectileTuning,
}

impl Fireball {
    #[must_use]
    pub fn new(config: SkillConfig, tuning: &ProjectileTuning) -> Self {
        Self {
            core: SkillCore::new(config),
            tuning: tuning.clone(),
        }
    }
}

impl Skill for Fireball {
    fn skill_type(&self) -> SkillType {
        SkillType::Fireball
    }

    fn core(&self) -> &SkillCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut SkillCore {
        &mut self.core
    }

    fn perform(&mut self, world: &mut World, source: Entity, target: Entity) -> Result<bool, EcsError> {
        let (Some(from), Some(to), Some(faction)) = (
            position_of(world, source),
            position_of(world, target),
            faction_of(world, source),
        ) else {
            return Ok(false);
        };
        let config = &self.core.config;
        let burn = StatusEffect::new(
            StatusKind::DamageOverTime,
            config.status_duration.unwrap_or(DEFAULT_BURN_DURATION),
            config.status_value.unwrap_or(DEFAULT_BURN_DPS),
            source,
        )
        .stacking(BURN_MAX_STACKS);

        launch_projectile(
            world,
            Launch {
                source,
                faction,
                target,
                from,
                to,
                speed: config.projectile_speed.unwrap_or(DEFAULT_SPEED),
                damage: config.damage.unwrap_or(DEFAULT_DAMAGE),
                motion: MotionKind::Homing {
                    turn_speed: self.tuning.homing_turn_speed,
                },
                effect: ProjectileEffect::new(source)
                    .with_aoe(config.aoe_radius.unwrap_or(DEFAULT_AOE_RADIUS))
                    .with_status(burn),
                sprite: Sprite::new(16.0, 16.0, "#FF4500"),
                trail_points: self.tuning.trail_points,
            },
        )?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use arena_component::Query;

    use super::*;
    use crate::components::{Faction, Projectile};
    use crate::skills::test_support::spawn_unit;

    #[test]
    fn test_launches_homing_projectile_with_riders() {
        let mut world = World::new();
        let caster = spawn_unit(&mut world, Faction::Enemy, 0.0, 0.0, 100.0);
        let target = spawn_unit(&mut world, Faction::Player, 150.0, 0.0, 100.0);
        let config = crate::config::ArenaConfig::default();
        let mut skill = Fireball::new(config.skill(SkillType::Fireball), &config.projectile);
        assert!(skill.cast(&mut world, caster, target).unwrap());

        let shots = world.query(&Query::new().with::<Projectile>());
        assert_eq!(shots.len(), 1);
        let fx = world.get_component::<ProjectileEffect>(shots[0]).unwrap();
        assert_eq!(fx.aoe_radius, Some(40.0));
        assert_eq!(fx.bounce_count, 0);
        assert_eq!(fx.status_effects[0].kind, StatusKind::DamageOverTime);
        let p = world.get_component::<Projectile>(shots[0]).unwrap();
        assert_eq!((p.damage, p.speed, p.source_faction), (30.0, 200.0, Faction::Enemy));
    }
}

//! Multi-arrow volley.
//!
//! One arrow flies at the real target, two more at aim points placed
//! `±SPREAD_ANGLE` around the source→target bearing at the same distance.
//! Every arrow arcs, and every arrow can bounce on its own. Side arrows start
//! with the primary target already in their hit set, so a volley strikes each
//! unit at most once per arrow and a lone target takes a single arrow.

use std::f32::consts::PI;

use arena_component::{EcsError, Entity};
use arena_ecs::World;
use arena_math::{Position, Vec2, heading};

use super::{Launch, Skill, SkillCore, faction_of, launch_projectile};
use crate::combat::position_of;
use crate::components::{AimPoint, Faction, MotionKind, ProjectileEffect, Sprite};
use crate::config::{ProjectileTuning, SkillConfig, SkillType};

const SPREAD_ANGLE: f32 = PI / 6.0;
const DEFAULT_DAMAGE: f32 = 20.0;
const DEFAULT_SPEED: f32 = 480.0;
const DEFAULT_BOUNCES: u32 = 2;
const DEFAULT_ARC_HEIGHT: f32 = 30.0;
/// Aim points outlive the projected flight by this much.
const AIM_POINT_GRACE: f32 = 1.0;

#[derive(Debug)]
pub struct MultiArrow {
    core: SkillCore,
    tuning: ProjectileTuning,
}

impl MultiArrow {
    #[must_use]
    pub fn new(config: SkillConfig, tuning: &ProjectileTuning) -> Self {
        Self {
            core: SkillCore::new(config),
            tuning: tuning.clone(),
        }
    }

    fn arrow(&self, source: Entity, faction: Faction, target: Entity, from: Vec2, to: Vec2) -> Launch {
        let config = &self.core.config;
        Launch {
            source,
            faction,
            target,
            from,
            to,
            speed: config.projectile_speed.unwrap_or(DEFAULT_SPEED),
            damage: config.damage.unwrap_or(DEFAULT_DAMAGE),
            motion: MotionKind::Parabolic {
                max_height: config.arc_height.unwrap_or(DEFAULT_ARC_HEIGHT),
            },
            effect: ProjectileEffect::new(source)
                .with_bounces(config.bounce_count.unwrap_or(DEFAULT_BOUNCES)),
            sprite: Sprite::new(30.0, 6.0, "#FFA500"),
            trail_points: self.tuning.trail_points,
        }
    }
}

impl Skill for MultiArrow {
    fn skill_type(&self) -> SkillType {
        SkillType::MultiArrow
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

        let center = self.arrow(source, faction, target, from, to);
        let speed = center.speed;
        launch_projectile(world, center)?;

        let bearing = heading(to - from);
        let distance = from.distance(to);
        let flight = if speed > 0.0 { distance / speed } else { 0.0 };
        let lifetime = flight + AIM_POINT_GRACE;

        for offset in [-SPREAD_ANGLE, SPREAD_ANGLE] {
            let aim_pos = from + Vec2::from_angle(bearing + offset) * distance;
            let aim = world.create_entity();
            world.add_component(aim, Position(aim_pos))?;
            world.add_component(aim, AimPoint { owner: source })?;
            self.core.track(aim, lifetime);

            let mut side = self.arrow(source, faction, aim, from, aim_pos);
            side.effect.hit_entities.insert(target);
            launch_projectile(world, side)?;
        }
        Ok(true)
    }
}

//! Projectile flight and impact.
//!
//! Per frame and per projectile:
//!
//! ```text
//! target gone?         -> destroy
//! move (linear | parabolic | homing), record trail
//! within hit threshold -> damage, hit event, riders, then bounce or destroy
//! past projected impact by MISS_GRACE -> destroy
//! ```

use arena_component::{EcsError, Entity, Query};
use arena_ecs::{GameEvent, System, World};
use arena_math::{Position, Vec2, Velocity, heading, parabolic_height, steer_towards};
use tracing::trace;

use crate::combat::{
    DamageOutcome, apply_damage, apply_status, nearest_enemy, position_of, units_within,
};
use crate::components::{
    MotionKind, Projectile, ProjectileEffect, ProjectileMotion, Sprite, Trail, Unit,
};
use crate::config::ProjectileTuning;

/// Seconds a projectile may fly past its projected impact before it counts
/// as a miss.
const MISS_GRACE: f32 = 1.0;

#[derive(Debug)]
pub struct ProjectileSystem {
    tuning: ProjectileTuning,
    query: Query,
}

impl ProjectileSystem {
    #[must_use]
    pub fn new(tuning: ProjectileTuning) -> Self {
        Self {
            tuning,
            query: Query::new()
                .with::<Projectile>()
                .with::<ProjectileMotion>()
                .with::<ProjectileEffect>()
                .with::<Position>()
                .with::<Velocity>(),
        }
    }

    fn step(&self, world: &mut World, entity: Entity, dt: f32) -> Result<(), EcsError> {
        let Some(projectile) = world.get_component::<Projectile>(entity).cloned() else {
            return Ok(());
        };
        let Some(target_pos) = position_of(world, projectile.target) else {
            trace!(projectile = %entity, target = %projectile.target, "target gone");
            world.destroy_entity(entity);
            return Ok(());
        };
        let (Some(mut motion), Some(mut pos), Some(mut vel)) = (
            world.get_component::<ProjectileMotion>(entity).cloned(),
            position_of(world, entity),
            world.get_component::<Velocity>(entity).map(|v| v.0),
        ) else {
            return Ok(());
        };

        let before = motion.progress();
        motion.flight_time += dt;
        let rotation = match motion.kind {
            MotionKind::Linear => {
                pos += vel * dt;
                heading(vel)
            }
            MotionKind::Homing { turn_speed } => {
                vel = steer_towards(vel, target_pos - pos, turn_speed * dt);
                pos += vel * dt;
                heading(vel)
            }
            MotionKind::Parabolic { max_height } => {
                pos += vel * dt;
                let lift = parabolic_height(motion.progress(), max_height)
                    - parabolic_height(before, max_height);
                pos.y -= lift;
                let climb = if dt > 0.0 { lift / dt } else { 0.0 };
                heading(Vec2::new(vel.x, vel.y - climb))
            }
        };

        if let Some(p) = world.get_component_mut::<Position>(entity) {
            p.0 = pos;
        }
        if let Some(v) = world.get_component_mut::<Velocity>(entity) {
            v.0 = vel;
        }
        if let Some(sprite) = world.get_component_mut::<Sprite>(entity) {
            sprite.rotation = rotation;
        }
        if let Some(trail) = world.get_component_mut::<Trail>(entity) {
            trail.push(pos);
        }
        let overdue = motion.flight_time > motion.total_flight_time + MISS_GRACE;
        if let Some(m) = world.get_component_mut::<ProjectileMotion>(entity) {
            *m = motion;
        }

        if pos.distance(target_pos) < self.tuning.hit_threshold {
            self.hit(world, entity, &projectile, pos)?;
        } else if overdue {
            trace!(projectile = %entity, "missed");
            world.destroy_entity(entity);
        }
        Ok(())
    }

    fn hit(&self, world: &mut World, entity: Entity, projectile: &Projectile, pos: Vec2) -> Result<(), EcsError> {
        let Some(mut effect) = world.get_component::<ProjectileEffect>(entity).cloned() else {
            return Ok(());
        };
        let target = projectile.target;
        effect.hit_entities.insert(target);

        if world.has_component::<Unit>(target) {
            world.emit(&GameEvent::ProjectileHit {
                projectile: entity,
                target,
                damage: projectile.damage,
                effects: effect
                    .status_effects
                    .iter()
                    .map(|e| e.kind.as_str().to_owned())
                    .collect(),
            });
            let outcome = apply_damage(world, target, projectile.damage, Some(projectile.source));
            if let Some(radius) = effect.aoe_radius {
                let splashed: Vec<Entity> =
                    units_within(world, pos, radius, projectile.source_faction.opponent())
                        .into_iter()
                        .filter(|&e| e != target)
                        .collect();
                for &other in &splashed {
                    apply_damage(world, other, projectile.damage, Some(projectile.source));
                }
                trace!(projectile = %entity, splashed = splashed.len(), "splash");
            }
            if outcome != DamageOutcome::Killed && world.exists(target) {
                for status in &effect.status_effects {
                    apply_status(world, target, status.clone())?;
                }
            }
        }

        if effect.bounce_count == 0 {
            world.destroy_entity(entity);
            return Ok(());
        }
        let hit_set = effect.hit_entities.clone();
        let next = nearest_enemy(
            world,
            pos,
            projectile.source_faction,
            self.tuning.bounce_radius,
            |e| hit_set.contains(&e),
        );
        let Some((new_target, distance)) = next else {
            world.destroy_entity(entity);
            return Ok(());
        };
        let Some(new_pos) = position_of(world, new_target) else {
            world.destroy_entity(entity);
            return Ok(());
        };

        effect.bounce_count -= 1;
        if let Some(p) = world.get_component_mut::<Projectile>(entity) {
            p.target = new_target;
        }
        if let Some(m) = world.get_component_mut::<ProjectileMotion>(entity) {
            m.flight_time = 0.0;
            m.total_flight_time = if projectile.speed > 0.0 {
                distance / projectile.speed
            } else {
                0.0
            };
        }
        if let Some(v) = world.get_component_mut::<Velocity>(entity) {
            *v = Velocity::towards(pos, new_pos, projectile.speed);
        }
        if let Some(e) = world.get_component_mut::<ProjectileEffect>(entity) {
            *e = effect;
        }
        trace!(projectile = %entity, %new_target, "bounce");
        world.emit(&GameEvent::ProjectileBounce {
            projectile: entity,
            new_target,
        });
        Ok(())
    }
}

impl System for ProjectileSystem {
    fn update(&mut self, world: &mut World, dt: f32) -> Result<(), EcsError> {
        for entity in world.query(&self.query) {
            if world.exists(entity) {
                self.step(world, entity, dt)?;
            }
        }
        Ok(())
    }
}

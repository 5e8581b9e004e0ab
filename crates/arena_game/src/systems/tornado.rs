//! Tornado hazards: countdown, damage ticks, target search and pursuit.

use arena_component::{EcsError, Entity, Query};
use arena_ecs::{System, World};
use arena_math::Position;
use tracing::trace;

use crate::combat::{apply_damage, nearest_enemy, units_within};
use crate::components::{Tornado, TornadoMovement};

/// A tornado closer than this to its target point stops moving.
const ARRIVAL_DISTANCE: f32 = 5.0;

#[derive(Debug)]
pub struct TornadoSystem {
    query: Query,
}

impl TornadoSystem {
    #[must_use]
    pub fn new() -> Self {
        Self {
            query: Query::new()
                .with::<Position>()
                .with::<Tornado>()
                .with::<TornadoMovement>(),
        }
    }

    fn step(&self, world: &mut World, entity: Entity, dt: f32) -> Result<(), EcsError> {
        let (Some(mut tornado), Some(mut movement), Some(mut pos)) = (
            world.get_component::<Tornado>(entity).cloned(),
            world.get_component::<TornadoMovement>(entity).cloned(),
            world.get_component::<Position>(entity).map(|p| p.0),
        ) else {
            return Ok(());
        };

        tornado.duration -= dt;
        if tornado.duration <= 0.0 {
            trace!(tornado = %entity, "tornado expired");
            world.destroy_entity(entity);
            return Ok(());
        }

        tornado.tick_timer += dt;
        if tornado.tick_timer >= tornado.tick_interval {
            let victims: Vec<Entity> =
                units_within(world, pos, tornado.radius, tornado.source_faction.opponent())
                    .into_iter()
                    .filter(|&e| e != tornado.source && !tornado.hit_entities.contains(&e))
                    .collect();
            for &victim in &victims {
                tornado.hit_entities.insert(victim);
                apply_damage(world, victim, tornado.damage, Some(tornado.source));
            }
            trace!(tornado = %entity, victims = victims.len(), "tornado tick");
            tornado.tick_timer = 0.0;
            tornado.hit_entities.clear();
        }

        movement.retarget_timer += dt;
        if movement.retarget_timer >= movement.retarget_interval {
            let source = tornado.source;
            let found = nearest_enemy(
                world,
                pos,
                tornado.source_faction,
                movement.search_radius,
                |e| e == source,
            )
            .and_then(|(target, _)| world.get_component::<Position>(target).map(|p| p.0));
            if let Some(target_pos) = found {
                tornado.target_pos = Some(target_pos);
                movement.retarget_timer = 0.0;
            }
        }

        if let Some(target_pos) = tornado.target_pos {
            let offset = target_pos - pos;
            if offset.length() > ARRIVAL_DISTANCE {
                pos += offset.normalize_or_zero() * movement.speed * dt;
            }
        }

        if let Some(p) = world.get_component_mut::<Position>(entity) {
            p.0 = pos;
        }
        if let Some(t) = world.get_component_mut::<Tornado>(entity) {
            *t = tornado;
        }
        if let Some(m) = world.get_component_mut::<TornadoMovement>(entity) {
            *m = movement;
        }
        Ok(())
    }
}

impl Default for TornadoSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for TornadoSystem {
    fn update(&mut self, world: &mut World, dt: f32) -> Result<(), EcsError> {
        for entity in world.query(&self.query) {
            if world.exists(entity) {
                self.step(world, entity, dt)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use arena_math::Vec2;

    use super::*;
    use crate::components::Faction;
    use crate::config::{SkillConfig, SkillType};
    use crate::skills::test_support::{health, spawn_unit};
    use crate::skills::{Skill, TornadoSkill};

    fn tornado_heading(world: &World, entity: Entity) -> Option<Vec2> {
        world.get_component::<Tornado>(entity).and_then(|t| t.target_pos)
    }

    fn summon(world: &mut World, caster: Entity) -> Entity {
        let mut skill = TornadoSkill::new(SkillConfig::default_for(SkillType::Tornado));
        assert!(skill.cast(world, caster, caster).unwrap());
        world.query(&Query::new().with::<Tornado>())[0]
    }

    #[test]
    fn test_seeks_nearest_hostile_in_search_radius() {
        let mut world = World::new();
        let caster = spawn_unit(&mut world, Faction::Player, 0.0, 0.0, 100.0);
        let near = spawn_unit(&mut world, Faction::Enemy, 200.0, 0.0, 100.0);
        spawn_unit(&mut world, Faction::Enemy, 0.0, 250.0, 100.0);
        spawn_unit(&mut world, Faction::Player, 50.0, 0.0, 100.0);
        let tornado = summon(&mut world, caster);

        let mut system = TornadoSystem::new();
        system.update(&mut world, 0.1).unwrap();
        let near_pos = world.get_component::<Position>(near).unwrap().0;
        assert_eq!(tornado_heading(&world, tornado), Some(near_pos));
        let p = world.get_component::<Position>(tornado).unwrap().0;
        assert!((p.x - 10.0).abs() < 1e-4);
        assert!(p.y.abs() < 1e-4);
    }

    #[test]
    fn test_ticks_once_per_interval() {
        let mut world = World::new();
        let caster = spawn_unit(&mut world, Faction::Player, 0.0, 0.0, 100.0);
        let victim = spawn_unit(&mut world, Faction::Enemy, 20.0, 0.0, 100.0);
        let ally = spawn_unit(&mut world, Faction::Player, 10.0, 0.0, 100.0);
        let tornado = summon(&mut world, caster);
        // Never retarget, so the tornado stays put.
        world.get_component_mut::<TornadoMovement>(tornado).unwrap().retarget_interval = 100.0;

        let mut system = TornadoSystem::new();
        for _ in 0..4 {
            system.update(&mut world, 0.25).unwrap();
        }
        assert_eq!(health(&world, victim), Some(85.0));
        for _ in 0..4 {
            system.update(&mut world, 0.25).unwrap();
        }
        assert_eq!(health(&world, victim), Some(70.0));
        assert_eq!(health(&world, ally), Some(100.0));
        assert_eq!(health(&world, caster), Some(100.0));
        assert!(world.get_component::<Tornado>(tornado).unwrap().hit_entities.is_empty());
    }

    #[test]
    fn test_expires_after_duration() {
        let mut world = World::new();
        let caster = spawn_unit(&mut world, Faction::Player, 0.0, 0.0, 100.0);
        let tornado = summon(&mut world, caster);
        let mut system = TornadoSystem::new();
        for _ in 0..7 {
            system.update(&mut world, 1.0).unwrap();
        }
        assert!(world.exists(tornado));
        system.update(&mut world, 1.0).unwrap();
        assert!(!world.exists(tornado));
    }

    #[test]
    fn test_keeps_searching_until_a_target_appears() {
        let mut world = World::new();
        let caster = spawn_unit(&mut world, Faction::Player, 0.0, 0.0, 100.0);
        let tornado = summon(&mut world, caster);
        let mut system = TornadoSystem::new();
        system.update(&mut world, 0.1).unwrap();
        assert_eq!(tornado_heading(&world, tornado), None);

        let late = spawn_unit(&mut world, Faction::Enemy, 0.0, 100.0, 100.0);
        system.update(&mut world, 0.1).unwrap();
        assert_eq!(
            tornado_heading(&world, tornado),
            world.get_component::<Position>(late).map(|p| p.0)
        );
    }
}

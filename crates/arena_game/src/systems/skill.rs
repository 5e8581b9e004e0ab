//! Skill execution: consumes cast requests and ticks every caster's skills.

use std::collections::BTreeMap;

use arena_component::{EcsError, Entity, Query};
use arena_ecs::{System, SystemPriority, World};
use tracing::{debug, trace};

use crate::components::{SkillCooldowns, SkillRequest};
use crate::config::ArenaConfig;
use crate::skills::SkillBook;

/// Executes queued casts and advances every caster's skills.
///
/// A caster's [`SkillBook`] is created on its first request and outlives the
/// caster until its lingering effects (clouds, visuals) have expired.
#[derive(Debug)]
pub struct SkillSystem {
    config: ArenaConfig,
    books: BTreeMap<Entity, SkillBook>,
    requests: Query,
}

impl SkillSystem {
    #[must_use]
    pub fn new(config: ArenaConfig) -> Self {
        Self {
            config,
            books: BTreeMap::new(),
            requests: Query::new().with::<SkillRequest>(),
        }
    }

    #[must_use]
    pub fn book(&self, caster: Entity) -> Option<&SkillBook> {
        self.books.get(&caster)
    }

    fn process_requests(&mut self, world: &mut World) -> Result<(), EcsError> {
        for caster in world.query(&self.requests) {
            let Some(request) = world.remove_component::<SkillRequest>(caster) else {
                continue;
            };
            let book = self
                .books
                .entry(caster)
                .or_insert_with(|| SkillBook::new(&self.config));
            let fired = book.cast(world, request.skill, caster, request.target)?;
            trace!(%caster, skill = %request.skill, fired, "skill request");
        }
        Ok(())
    }
}

impl System for SkillSystem {
    fn update(&mut self, world: &mut World, dt: f32) -> Result<(), EcsError> {
        self.process_requests(world)?;

        for (&owner, book) in &mut self.books {
            book.update(world, owner, dt)?;
            let remaining = book.cooldowns();
            let alive = world.exists(owner);
            match world.get_component_mut::<SkillCooldowns>(owner) {
                Some(cooldowns) => cooldowns.remaining = remaining,
                None if alive => {
                    world.add_component(owner, SkillCooldowns { remaining })?;
                }
                None => {}
            }
        }

        self.books.retain(|&owner, book| {
            let keep = world.exists(owner) || book.has_active_effects();
            if !keep {
                debug!(%owner, "skill book dropped");
            }
            keep
        });
        Ok(())
    }

    fn priority(&self) -> SystemPriority {
        SystemPriority::Normal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Faction, Projectile};
    use crate::config::SkillType;
    use crate::skills::test_support::spawn_unit;

    #[test]
    fn test_request_is_consumed_and_cast() {
        let mut world = World::new();
        let caster = spawn_unit(&mut world, Faction::Player, 0.0, 0.0, 100.0);
        let target = spawn_unit(&mut world, Faction::Enemy, 100.0, 0.0, 100.0);
        world
            .add_component(
                caster,
                SkillRequest {
                    skill: SkillType::Fireball,
                    target,
                },
            )
            .unwrap();

        let mut system = SkillSystem::new(ArenaConfig::default());
        system.update(&mut world, 0.1).unwrap();

        assert!(!world.has_component::<SkillRequest>(caster));
        assert_eq!(world.query(&Query::new().with::<Projectile>()).len(), 1);
        let cooldowns = world.get_component::<SkillCooldowns>(caster).unwrap();
        assert!(!cooldowns.is_ready(SkillType::Fireball));
        assert!(cooldowns.is_ready(SkillType::ThunderStrike));
        assert!(!system.book(caster).unwrap().is_ready(SkillType::Fireball));
    }

    #[test]
    fn test_book_outlives_caster_while_effects_linger() {
        let mut world = World::new();
        let caster = spawn_unit(&mut world, Faction::Player, 0.0, 0.0, 100.0);
        let target = spawn_unit(&mut world, Faction::Enemy, 100.0, 0.0, 1000.0);
        world
            .add_component(
                caster,
                SkillRequest {
                    skill: SkillType::PoisonCloud,
                    target,
                },
            )
            .unwrap();
        let mut system = SkillSystem::new(ArenaConfig::default());
        system.update(&mut world, 0.5).unwrap();
        world.destroy_entity(caster);

        system.update(&mut world, 0.5).unwrap();
        assert!(system.book(caster).is_some());
        assert_eq!(world.get_component::<crate::components::Unit>(target).unwrap().health, 990.0);

        for _ in 0..10 {
            system.update(&mut world, 0.5).unwrap();
        }
        assert!(system.book(caster).is_none());
    }

    #[test]
    fn test_cooldown_read_model_is_refreshed_in_place() {
        let mut world = World::new();
        let caster = spawn_unit(&mut world, Faction::Player, 0.0, 0.0, 100.0);
        let target = spawn_unit(&mut world, Faction::Enemy, 100.0, 0.0, 100.0);
        world
            .add_component(
                caster,
                SkillRequest {
                    skill: SkillType::Fireball,
                    target,
                },
            )
            .unwrap();
        let mut system = SkillSystem::new(ArenaConfig::default());
        let remaining = |world: &World| {
            world
                .get_component::<SkillCooldowns>(caster)
                .and_then(|c| c.remaining.get(&SkillType::Fireball).copied())
                .unwrap()
        };

        system.update(&mut world, 0.1).unwrap();
        let first = remaining(&world);
        system.update(&mut world, 0.5).unwrap();
        let second = remaining(&world);
        assert!((first - second - 0.5).abs() < 1e-4);
        assert_eq!(world.query(&Query::new().with::<SkillCooldowns>()), vec![caster]);
    }
}

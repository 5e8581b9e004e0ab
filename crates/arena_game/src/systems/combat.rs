//! Cast decisions.
//!
//! Each unit waits out its attack cooldown, then looks for the nearest
//! hostile in attack range and picks a skill:
//!
//! 1. the rescue skill, when health is below the rescue threshold;
//! 2. the signature skill, for units of the signature faction;
//! 3. otherwise a weighted draw over the remaining candidates.
//!
//! Only skills that are off cooldown and in range of the target are
//! candidates. The choice is queued as a [`SkillRequest`] for the skill system.

use arena_component::{EcsError, Entity};
use arena_ecs::{System, SystemPriority, World};
use rand::SeedableRng;
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use tracing::debug;

use crate::combat::{nearest_enemy, position_of, unit_query};
use crate::components::{Faction, SkillCooldowns, SkillRequest, Unit};
use crate::config::{ArenaConfig, SkillType};

#[derive(Debug)]
pub struct CombatSystem {
    config: ArenaConfig,
    rng: StdRng,
}

impl CombatSystem {
    /// `seed` fixes the weighted draws, so a match replays exactly.
    #[must_use]
    pub fn new(config: ArenaConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn select(
        &mut self,
        cooldowns: &SkillCooldowns,
        faction: Faction,
        health_ratio: f32,
        distance: f32,
    ) -> Option<SkillType> {
        let policy = &self.config.selection;
        let usable = |skill: SkillType| {
            cooldowns.is_ready(skill) && self.config.skill(skill).in_range(distance)
        };

        if health_ratio < policy.rescue_threshold && cooldowns.is_ready(policy.rescue_skill) {
            return Some(policy.rescue_skill);
        }
        if faction == policy.signature_faction {
            if let Some(signature) = policy.signature_skill.filter(|&s| usable(s)) {
                return Some(signature);
            }
        }

        let candidates: Vec<(SkillType, f32)> = SkillType::ALL
            .iter()
            .map(|&s| (s, policy.weight(s)))
            .filter(|&(s, w)| w > 0.0 && usable(s))
            .collect();
        let weights = WeightedIndex::new(candidates.iter().map(|&(_, w)| w)).ok()?;
        Some(candidates[weights.sample(&mut self.rng)].0)
    }

    fn decide(&mut self, world: &mut World, entity: Entity, dt: f32) -> Result<(), EcsError> {
        let Some(unit) = world.get_component_mut::<Unit>(entity) else {
            return Ok(());
        };
        if unit.current_cooldown > 0.0 {
            unit.current_cooldown -= dt;
            return Ok(());
        }
        let (faction, range, ratio) = (unit.faction, unit.attack_range, unit.health_ratio());

        let Some(pos) = position_of(world, entity) else {
            return Ok(());
        };
        let Some((target, distance)) = nearest_enemy(world, pos, faction, range, |e| e == entity)
        else {
            return Ok(());
        };
        if world.has_component::<SkillRequest>(entity) {
            return Ok(());
        }
        let cooldowns = world
            .get_component::<SkillCooldowns>(entity)
            .cloned()
            .unwrap_or_default();
        let Some(skill) = self.select(&cooldowns, faction, ratio, distance) else {
            return Ok(());
        };

        debug!(caster = %entity, %target, %skill, distance, "cast queued");
        world.add_component(entity, SkillRequest { skill, target })?;
        if let Some(unit) = world.get_component_mut::<Unit>(entity) {
            unit.current_cooldown = unit.attack_cooldown;
        }
        Ok(())
    }
}

impl System for CombatSystem {
    fn update(&mut self, world: &mut World, dt: f32) -> Result<(), EcsError> {
        for entity in world.query(&unit_query()) {
            if world.exists(entity) {
                self.decide(world, entity, dt)?;
            }
        }
        Ok(())
    }

    fn priority(&self) -> SystemPriority {
        SystemPriority::High
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use arena_math::Position;

    use super::*;

    fn spawn(world: &mut World, faction: Faction, x: f32) -> Entity {
        let e = world.create_entity();
        world.add_component(e, Position::new(x, 0.0)).unwrap();
        world
            .add_component(e, Unit::new(faction, 100.0).with_attack(200.0, 1.0))
            .unwrap();
        e
    }

    fn request(world: &World, e: Entity) -> Option<SkillRequest> {
        world.get_component::<SkillRequest>(e).copied()
    }

    #[test]
    fn test_signature_skill_for_player_and_cooldown_reset() {
        let mut world = World::new();
        let player = spawn(&mut world, Faction::Player, 0.0);
        let enemy = spawn(&mut world, Faction::Enemy, 50.0);
        world.get_component_mut::<Unit>(enemy).unwrap().current_cooldown = 10.0;

        let mut combat = CombatSystem::new(ArenaConfig::default(), 7);
        combat.update(&mut world, 0.1).unwrap();

        assert_eq!(
            request(&world, player),
            Some(SkillRequest {
                skill: SkillType::MultiArrow,
                target: enemy
            })
        );
        assert_eq!(world.get_component::<Unit>(player).unwrap().current_cooldown, 1.0);
        assert!(request(&world, enemy).is_none());
        assert!((world.get_component::<Unit>(enemy).unwrap().current_cooldown - 9.9).abs() < 1e-5);
    }

    #[test]
    fn test_out_of_range_target_is_ignored() {
        let mut world = World::new();
        let player = spawn(&mut world, Faction::Player, 0.0);
        spawn(&mut world, Faction::Enemy, 250.0);
        CombatSystem::new(ArenaConfig::default(), 7)
            .update(&mut world, 0.1)
            .unwrap();
        assert!(request(&world, player).is_none());
        assert_eq!(world.get_component::<Unit>(player).unwrap().current_cooldown, 0.0);
    }

    #[test]
    fn test_low_health_triggers_rescue() {
        let mut world = World::new();
        let player = spawn(&mut world, Faction::Player, 0.0);
        spawn(&mut world, Faction::Enemy, 50.0);
        world.get_component_mut::<Unit>(player).unwrap().health = 20.0;
        CombatSystem::new(ArenaConfig::default(), 7)
            .update(&mut world, 0.1)
            .unwrap();
        assert_eq!(request(&world, player).map(|r| r.skill), Some(SkillType::HealingAura));
    }

    #[test]
    fn test_weighted_draw_skips_unready_and_out_of_range() {
        let mut config = ArenaConfig::default();
        config.selection.signature_skill = None;
        config.selection.weights = BTreeMap::from([
            (SkillType::ThunderStrike, 1.0),
            (SkillType::Fireball, 1.0),
            (SkillType::FrostNova, 1.0),
        ]);
        let mut combat = CombatSystem::new(config, 42);
        // Fireball is cooling down, frost nova is always in range, thunder
        // strike (range 250) cannot reach 260.
        let cooldowns = SkillCooldowns {
            remaining: BTreeMap::from([(SkillType::Fireball, 1.0)]),
        };
        for _ in 0..50 {
            assert_eq!(
                combat.select(&cooldowns, Faction::Enemy, 1.0, 260.0),
                Some(SkillType::FrostNova)
            );
        }
        assert!(
            combat
                .select(
                    &SkillCooldowns {
                        remaining: BTreeMap::from([
                            (SkillType::Fireball, 1.0),
                            (SkillType::FrostNova, 1.0),
                        ]),
                    },
                    Faction::Enemy,
                    1.0,
                    260.0,
                )
                .is_none()
        );
    }

    #[test]
    fn test_nothing_ready_keeps_unit_armed() {
        let mut world = World::new();
        let enemy = spawn(&mut world, Faction::Enemy, 0.0);
        spawn(&mut world, Faction::Player, 50.0);
        let remaining = SkillType::ALL.iter().map(|&s| (s, 5.0)).collect();
        world
            .add_component(enemy, SkillCooldowns { remaining })
            .unwrap();
        CombatSystem::new(ArenaConfig::default(), 1)
            .update(&mut world, 0.1)
            .unwrap();
        assert!(request(&world, enemy).is_none());
        assert_eq!(world.get_component::<Unit>(enemy).unwrap().current_cooldown, 0.0);
    }

    #[test]
    fn test_same_seed_same_choices() {
        let config = ArenaConfig::default();
        let ready = SkillCooldowns::default();
        let mut a = CombatSystem::new(config.clone(), 99);
        let mut b = CombatSystem::new(config, 99);
        for _ in 0..20 {
            assert_eq!(
                a.select(&ready, Faction::Enemy, 1.0, 100.0),
                b.select(&ready, Faction::Enemy, 1.0, 100.0)
            );
        }
    }
}

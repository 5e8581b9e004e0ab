//! Skill casters.
//!
//! Every skill is a stateful object owning its config, its cooldown, and the
//! short-lived entities it has spawned (visuals, aim points, clouds). Casters
//! get one instance of each skill in a [`SkillBook`], so cooldowns are per
//! caster.
//!
//! ```text
//! cast(source, target)
//!   ├─ on cooldown?           -> Ok(false), nothing happens
//!   ├─ emit skill_cast_start
//!   ├─ perform(..)            -> skill-specific effect
//!   ├─ start cooldown         (only if the effect happened)
//!   └─ emit skill_cast_end
//! ```

mod fireball;
mod frost_nova;
mod healing_aura;
mod multi_arrow;
mod poison_cloud;
mod thunder_strike;
mod tornado;

use std::collections::BTreeMap;

use arena_component::{EcsError, Entity};
use arena_ecs::{GameEvent, World};
use arena_math::{Position, Vec2, Velocity, heading};
use tracing::trace;

use crate::components::{
    Faction, MotionKind, Projectile, ProjectileEffect, ProjectileMotion, Sprite, Trail, Unit,
};
use crate::config::{ArenaConfig, ProjectileTuning, SkillConfig, SkillType};

pub use fireball::Fireball;
pub use frost_nova::FrostNova;
pub use healing_aura::HealingAura;
pub use multi_arrow::MultiArrow;
pub use poison_cloud::PoisonCloud;
pub use thunder_strike::ThunderStrike;
pub use tornado::TornadoSkill;

/// An entity a skill created and must destroy after `remaining` seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transient {
    pub entity: Entity,
    pub remaining: f32,
}

/// State every skill carries.
#[derive(Debug, Clone)]
pub struct SkillCore {
    pub config: SkillConfig,
    /// Seconds until the skill can be cast again.
    pub cooldown: f32,
    pub transients: Vec<Transient>,
}

impl SkillCore {
    #[must_use]
    pub fn new(config: SkillConfig) -> Self {
        Self {
            config,
            cooldown: 0.0,
            transients: Vec::new(),
        }
    }

    #[must_use]
    pub fn is_on_cooldown(&self) -> bool {
        self.cooldown > 0.0
    }

    pub fn start_cooldown(&mut self) {
        self.cooldown = self.config.cooldown;
    }

    /// Track an entity for destruction after `lifetime` seconds.
    pub fn track(&mut self, entity: Entity, lifetime: f32) {
        self.transients.push(Transient {
            entity,
            remaining: lifetime,
        });
    }

    /// Count down transients and destroy the expired ones.
    pub fn expire_transients(&mut self, world: &mut World, dt: f32) {
        self.transients.retain_mut(|t| {
            t.remaining -= dt;
            if t.remaining <= 0.0 {
                world.destroy_entity(t.entity);
                return false;
            }
            true
        });
    }
}

/// The skill contract.
pub trait Skill: std::fmt::Debug {
    fn skill_type(&self) -> SkillType;

    fn core(&self) -> &SkillCore;

    fn core_mut(&mut self) -> &mut SkillCore;

    /// Apply the skill's effect. Returns `false` if nothing could be done
    /// (missing positions), in which case no cooldown starts.
    ///
    /// # Errors
    ///
    /// Store errors while spawning effect entities.
    fn perform(&mut self, world: &mut World, source: Entity, target: Entity) -> Result<bool, EcsError>;

    /// Per-frame work beyond cooldown and transient expiry.
    ///
    /// # Errors
    ///
    /// Store errors while applying lingering effects.
    fn advance(&mut self, _world: &mut World, _dt: f32) -> Result<(), EcsError> {
        Ok(())
    }

    /// Cast unless on cooldown. Returns whether the skill fired.
    ///
    /// # Errors
    ///
    /// See [`Skill::perform`].
    fn cast(&mut self, world: &mut World, source: Entity, target: Entity) -> Result<bool, EcsError> {
        if self.core().is_on_cooldown() {
            return Ok(false);
        }
        let skill = self.skill_type().as_str().to_owned();
        world.emit(&GameEvent::SkillCastStart {
            entity: source,
            skill: skill.clone(),
        });
        let fired = self.perform(world, source, target)?;
        if fired {
            self.core_mut().start_cooldown();
        } else {
            trace!(%source, %target, skill = %skill, "cast fizzled");
        }
        world.emit(&GameEvent::SkillCastEnd {
            entity: source,
            skill,
        });
        Ok(fired)
    }

    /// Tick the cooldown, run [`Skill::advance`], then expire transients.
    /// Emits [`GameEvent::SkillCooldownEnd`] when the cooldown runs out.
    ///
    /// # Errors
    ///
    /// See [`Skill::advance`].
    fn update(&mut self, world: &mut World, owner: Entity, dt: f32) -> Result<(), EcsError> {
        let core = self.core_mut();
        if core.cooldown > 0.0 {
            core.cooldown -= dt;
            if core.cooldown <= 0.0 {
                core.cooldown = 0.0;
                world.emit(&GameEvent::SkillCooldownEnd {
                    entity: owner,
                    skill: self.skill_type().as_str().to_owned(),
                });
            }
        }
        self.advance(world, dt)?;
        self.core_mut().expire_transients(world, dt);
        Ok(())
    }

    /// `true` while the skill still owns live effect entities.
    fn has_active_effects(&self) -> bool {
        !self.core().transients.is_empty()
    }
}

/// Everything needed to put a projectile in flight.
#[derive(Debug, Clone)]
pub struct Launch {
    pub source: Entity,
    pub faction: Faction,
    pub target: Entity,
    pub from: Vec2,
    pub to: Vec2,
    pub speed: f32,
    pub damage: f32,
    pub motion: MotionKind,
    pub effect: ProjectileEffect,
    pub sprite: Sprite,
    pub trail_points: usize,
}

/// Spawn a projectile entity aimed from `from` at `to`.
///
/// # Errors
///
/// Store errors while attaching components.
pub fn launch_projectile(world: &mut World, launch: Launch) -> Result<Entity, EcsError> {
    let distance = launch.from.distance(launch.to);
    let total_flight_time = if launch.speed > 0.0 {
        distance / launch.speed
    } else {
        0.0
    };
    let entity = world.create_entity();
    world.add_component(entity, Position(launch.from))?;
    world.add_component(entity, Velocity::towards(launch.from, launch.to, launch.speed))?;
    world.add_component(
        entity,
        Projectile {
            damage: launch.damage,
            speed: launch.speed,
            source: launch.source,
            source_faction: launch.faction,
            target: launch.target,
        },
    )?;
    world.add_component(entity, ProjectileMotion::new(launch.motion, total_flight_time))?;
    world.add_component(entity, launch.effect)?;
    world.add_component(entity, launch.sprite.rotated(heading(launch.to - launch.from)))?;
    world.add_component(entity, Trail::new(launch.from, launch.trail_points))?;
    trace!(projectile = %entity, source = %launch.source, target = %launch.target, "projectile launched");
    Ok(entity)
}

/// Faction of a caster, if it is still a unit.
#[must_use]
pub fn faction_of(world: &World, entity: Entity) -> Option<Faction> {
    world.get_component::<Unit>(entity).map(|u| u.faction)
}

/// Build a skill from its config.
#[must_use]
pub fn create_skill(skill: SkillType, config: SkillConfig, tuning: &ProjectileTuning) -> Box<dyn Skill> {
    match skill {
        SkillType::MultiArrow => Box::new(MultiArrow::new(config, tuning)),
        SkillType::ThunderStrike => Box::new(ThunderStrike::new(config)),
        SkillType::Fireball => Box::new(Fireball::new(config, tuning)),
        SkillType::FrostNova => Box::new(FrostNova::new(config)),
        SkillType::PoisonCloud => Box::new(PoisonCloud::new(config)),
        SkillType::HealingAura => Box::new(HealingAura::new(config)),
        SkillType::Tornado => Box::new(TornadoSkill::new(config)),
    }
}

/// One caster's instance of every skill.
#[derive(Debug)]
pub struct SkillBook {
    skills: BTreeMap<SkillType, Box<dyn Skill>>,
}

impl SkillBook {
    /// A book with the full roster, tuned by `config`.
    #[must_use]
    pub fn new(config: &ArenaConfig) -> Self {
        let skills = SkillType::ALL
            .iter()
            .map(|&t| (t, create_skill(t, config.skill(t), &config.projectile)))
            .collect();
        Self { skills }
    }

    #[must_use]
    pub fn get(&self, skill: SkillType) -> Option<&dyn Skill> {
        self.skills.get(&skill).map(|s| s.as_ref())
    }

    #[must_use]
    pub fn is_ready(&self, skill: SkillType) -> bool {
        self.get(skill).is_some_and(|s| !s.core().is_on_cooldown())
    }

    /// Cast a skill from this book.
    ///
    /// # Errors
    ///
    /// See [`Skill::cast`].
    pub fn cast(&mut self, world: &mut World, skill: SkillType, source: Entity, target: Entity) -> Result<bool, EcsError> {
        match self.skills.get_mut(&skill) {
            Some(s) => s.cast(world, source, target),
            None => Ok(false),
        }
    }

    /// Update every skill in the book.
    ///
    /// # Errors
    ///
    /// See [`Skill::update`].
    pub fn update(&mut self, world: &mut World, owner: Entity, dt: f32) -> Result<(), EcsError> {
        for skill in self.skills.values_mut() {
            skill.update(world, owner, dt)?;
        }
        Ok(())
    }

    #[must_use]
    pub fn has_active_effects(&self) -> bool {
        self.skills.values().any(|s| s.has_active_effects())
    }

    /// Remaining cooldown of every skill.
    #[must_use]
    pub fn cooldowns(&self) -> BTreeMap<SkillType, f32> {
        self.skills
            .iter()
            .map(|(&t, s)| (t, s.core().cooldown.max(0.0)))
            .collect()
    }
}


#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use arena_ecs::Topic;

    use super::test_support::spawn_unit;
    use super::*;
    use crate::components::Faction;

    #[test]
    fn test_cast_respects_cooldown() {
        let mut world = World::new();
        let a = spawn_unit(&mut world, Faction::Player, 0.0, 0.0, 100.0);
        let b = spawn_unit(&mut world, Faction::Enemy, 30.0, 0.0, 500.0);
        let mut book = SkillBook::new(&ArenaConfig::default());

        assert!(book.cast(&mut world, SkillType::ThunderStrike, a, b).unwrap());
        assert!(!book.is_ready(SkillType::ThunderStrike));
        assert!(!book.cast(&mut world, SkillType::ThunderStrike, a, b).unwrap());
        assert!(book.is_ready(SkillType::FrostNova));

        // Cooldown is 4s.
        for _ in 0..41 {
            book.update(&mut world, a, 0.1).unwrap();
        }
        assert!(book.is_ready(SkillType::ThunderStrike));
    }

    #[test]
    fn test_cast_and_cooldown_events() {
        let mut world = World::new();
        let a = spawn_unit(&mut world, Faction::Player, 0.0, 0.0, 100.0);
        let b = spawn_unit(&mut world, Faction::Enemy, 30.0, 0.0, 500.0);
        let log = Rc::new(RefCell::new(Vec::new()));
        for topic in [Topic::SkillCastStart, Topic::SkillCastEnd, Topic::SkillCooldownEnd] {
            let log = Rc::clone(&log);
            world.on(topic, move |_, e| log.borrow_mut().push(e.topic()));
        }

        let mut book = SkillBook::new(&ArenaConfig::default());
        book.cast(&mut world, SkillType::FrostNova, a, b).unwrap();
        for _ in 0..51 {
            book.update(&mut world, a, 0.1).unwrap();
        }
        assert_eq!(
            *log.borrow(),
            vec![Topic::SkillCastStart, Topic::SkillCastEnd, Topic::SkillCooldownEnd]
        );
    }

    #[test]
    fn test_books_are_independent() {
        let mut world = World::new();
        let a = spawn_unit(&mut world, Faction::Player, 0.0, 0.0, 100.0);
        let b = spawn_unit(&mut world, Faction::Enemy, 30.0, 0.0, 500.0);
        let config = ArenaConfig::default();
        let mut book_a = SkillBook::new(&config);
        let mut book_b = SkillBook::new(&config);
        assert!(book_a.cast(&mut world, SkillType::ThunderStrike, a, b).unwrap());
        assert!(book_b.cast(&mut world, SkillType::ThunderStrike, b, a).unwrap());
    }

    #[test]
    fn test_transients_expire() {
        let mut world = World::new();
        let mut core = SkillCore::new(SkillConfig::default());
        let e = world.create_entity();
        core.track(e, 0.25);
        core.expire_transients(&mut world, 0.1);
        assert!(world.exists(e));
        core.expire_transients(&mut world, 0.2);
        assert!(!world.exists(e));
        assert!(core.transients.is_empty());
    }
}

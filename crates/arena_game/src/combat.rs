//! Damage resolution and target search shared by systems and skills.

use arena_component::{EcsError, Entity, Query};
use arena_ecs::{GameEvent, World};
use arena_math::{Position, Vec2};
use tracing::debug;

use crate::components::{Faction, StatusEffect, StatusEffects, Unit};

/// The query every unit search runs.
#[must_use]
pub fn unit_query() -> Query {
    Query::new().with::<Position>().with::<Unit>()
}

/// What a call to [`apply_damage`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageOutcome {
    /// The target had no [`Unit`] (dead, or never a unit).
    Missed,
    Damaged,
    Killed,
}

/// Subtract health from `target`. A unit brought to zero or below emits
/// [`GameEvent::UnitDied`] and is then destroyed.
pub fn apply_damage(world: &mut World, target: Entity, amount: f32, killer: Option<Entity>) -> DamageOutcome {
    let Some(unit) = world.get_component_mut::<Unit>(target) else {
        return DamageOutcome::Missed;
    };
    unit.damage(amount);
    if unit.is_alive() {
        return DamageOutcome::Damaged;
    }
    debug!(unit = %target, killer = ?killer, "unit died");
    world.emit(&GameEvent::UnitDied { unit: target, killer });
    world.destroy_entity(target);
    DamageOutcome::Killed
}

/// Restore health, clamped to max. Returns `false` if `target` is not a unit.
pub fn apply_healing(world: &mut World, target: Entity, amount: f32) -> bool {
    match world.get_component_mut::<Unit>(target) {
        Some(unit) => {
            unit.heal(amount);
            true
        }
        None => false,
    }
}

/// Attach a status effect, creating the [`StatusEffects`] holder if needed.
///
/// # Errors
///
/// [`EcsError::UnknownEntity`] if `target` no longer exists.
pub fn apply_status(world: &mut World, target: Entity, effect: StatusEffect) -> Result<(), EcsError> {
    if let Some(effects) = world.get_component_mut::<StatusEffects>(target) {
        effects.apply(effect);
        return Ok(());
    }
    let mut effects = StatusEffects::new();
    effects.apply(effect);
    world.add_component(target, effects)
}

/// Movement speed factor from the status effects on `entity`.
#[must_use]
pub fn speed_multiplier(world: &World, entity: Entity) -> f32 {
    world
        .get_component::<StatusEffects>(entity)
        .map_or(1.0, StatusEffects::speed_multiplier)
}

#[must_use]
pub fn position_of(world: &World, entity: Entity) -> Option<Vec2> {
    world.get_component::<Position>(entity).map(|p| p.0)
}

/// Nearest unit hostile to `faction` within `max_range` of `from`, skipping
/// any entity for which `exclude` returns `true`. Ties go to the earlier
/// entity.
#[must_use]
pub fn nearest_enemy<F>(
    world: &World,
    from: Vec2,
    faction: Faction,
    max_range: f32,
    exclude: F,
) -> Option<(Entity, f32)>
where
    F: Fn(Entity) -> bool,
{
    let mut best: Option<(Entity, f32)> = None;
    for entity in world.query(&unit_query()) {
        if exclude(entity) {
            continue;
        }
        let (Some(pos), Some(unit)) = (
            world.get_component::<Position>(entity),
            world.get_component::<Unit>(entity),
        ) else {
            continue;
        };
        if !faction.opposes(unit.faction) {
            continue;
        }
        let distance = pos.0.distance(from);
        if distance <= max_range && best.is_none_or(|(_, d)| distance < d) {
            best = Some((entity, distance));
        }
    }
    best
}

/// Every unit of `faction` within `radius` of `center`, in query order.
#[must_use]
pub fn units_within(world: &World, center: Vec2, radius: f32, faction: Faction) -> Vec<Entity> {
    world
        .query(&unit_query())
        .into_iter()
        .filter(|&e| {
            let in_faction = world
                .get_component::<Unit>(e)
                .is_some_and(|u| u.faction == faction);
            let in_radius = world
                .get_component::<Position>(e)
                .is_some_and(|p| p.0.distance(center) <= radius);
            in_faction && in_radius
        })
        .collect()
}

/// Damage every unit hostile to `faction` within `radius` of `center`.
/// Returns the entities that were struck.
pub fn damage_area(
    world: &mut World,
    center: Vec2,
    radius: f32,
    faction: Faction,
    amount: f32,
    source: Entity,
) -> Vec<Entity> {
    let targets = units_within(world, center, radius, faction.opponent());
    for &target in &targets {
        apply_damage(world, target, amount, Some(source));
    }
    targets
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use arena_ecs::Topic;

    use super::*;
    use crate::components::StatusKind;

    fn spawn(world: &mut World, faction: Faction, x: f32, health: f32) -> Entity {
        let e = world.create_entity();
        world.add_component(e, Position::new(x, 0.0)).unwrap();
        world.add_component(e, Unit::new(faction, health)).unwrap();
        e
    }

    #[test]
    fn test_lethal_damage_emits_then_destroys() {
        let mut world = World::new();
        let killer = spawn(&mut world, Faction::Player, 0.0, 100.0);
        let victim = spawn(&mut world, Faction::Enemy, 10.0, 10.0);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        world.on(Topic::UnitDied, move |world, event| {
            if let GameEvent::UnitDied { unit, killer } = event {
                // The unit is still inspectable while the event is delivered.
                log.borrow_mut().push((*unit, *killer, world.exists(*unit)));
            }
        });

        assert_eq!(apply_damage(&mut world, victim, 4.0, Some(killer)), DamageOutcome::Damaged);
        assert_eq!(apply_damage(&mut world, victim, 6.0, Some(killer)), DamageOutcome::Killed);
        assert!(!world.exists(victim));
        assert_eq!(*seen.borrow(), vec![(victim, Some(killer), true)]);
        assert_eq!(apply_damage(&mut world, victim, 1.0, None), DamageOutcome::Missed);
    }

    #[test]
    fn test_nearest_enemy_respects_range_faction_and_exclusion() {
        let mut world = World::new();
        let me = spawn(&mut world, Faction::Player, 0.0, 100.0);
        let _ally = spawn(&mut world, Faction::Player, 5.0, 100.0);
        let near = spawn(&mut world, Faction::Enemy, 50.0, 100.0);
        let far = spawn(&mut world, Faction::Enemy, 150.0, 100.0);

        let found = nearest_enemy(&world, Vec2::ZERO, Faction::Player, 200.0, |e| e == me);
        assert_eq!(found.map(|(e, _)| e), Some(near));

        let found = nearest_enemy(&world, Vec2::ZERO, Faction::Player, 200.0, |e| e == near);
        assert_eq!(found.map(|(e, _)| e), Some(far));

        assert!(nearest_enemy(&world, Vec2::ZERO, Faction::Player, 40.0, |_| false).is_none());
    }

    #[test]
    fn test_damage_area_hits_only_hostiles_in_radius() {
        let mut world = World::new();
        let caster = spawn(&mut world, Faction::Player, 0.0, 100.0);
        let ally = spawn(&mut world, Faction::Player, 10.0, 100.0);
        let inside = spawn(&mut world, Faction::Enemy, 20.0, 100.0);
        let outside = spawn(&mut world, Faction::Enemy, 80.0, 100.0);

        let hit = damage_area(&mut world, Vec2::new(10.0, 0.0), 30.0, Faction::Player, 25.0, caster);
        assert_eq!(hit, vec![inside]);
        assert_eq!(world.get_component::<Unit>(inside).unwrap().health, 75.0);
        assert_eq!(world.get_component::<Unit>(ally).unwrap().health, 100.0);
        assert_eq!(world.get_component::<Unit>(outside).unwrap().health, 100.0);
    }

    #[test]
    fn test_apply_status_creates_holder() {
        let mut world = World::new();
        let e = spawn(&mut world, Faction::Enemy, 0.0, 100.0);
        let slow = StatusEffect::new(StatusKind::Debuff, 2.0, 0.5, Entity(9));
        apply_status(&mut world, e, slow.clone()).unwrap();
        apply_status(&mut world, e, slow).unwrap();
        assert_eq!(world.get_component::<StatusEffects>(e).unwrap().len(), 1);
        assert!((speed_multiplier(&world, e) - 0.5).abs() < 1e-6);

        let gone = world.create_entity();
        world.destroy_entity(gone);
        let err = apply_status(&mut world, gone, StatusEffect::new(StatusKind::Buff, 1.0, 1.0, e));
        assert!(err.is_err());
    }
}

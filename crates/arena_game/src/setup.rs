//! Match assembly: system registration and unit spawning.

use std::f32::consts::TAU;

use arena_component::{EcsError, Entity};
use arena_ecs::{SystemConfig, SystemGroupKind, SystemPriority, World};
use arena_math::{Position, Vec2, Velocity};
use rand::Rng;
use tracing::info;

use crate::components::{Faction, Sprite, Unit};
use crate::config::{ArenaConfig, SpawnLayout, UnitTemplate};
use crate::systems::{
    AiSystem, CombatSystem, EffectSystem, InputHandle, MovementSystem, PlayerControlSystem,
    ProjectileSystem, SkillSystem, TornadoSystem,
};

/// Register every gameplay system.
///
/// Frame order: core (player control), combat (decisions, skills, status
/// effects), ai, physics (projectiles, tornadoes), movement.
pub fn install_systems(world: &mut World, config: &ArenaConfig, seed: u64, input: InputHandle) {
    world
        .scheduler_mut()
        .register_group(SystemGroupKind::Ai, SystemPriority::High);

    world.add_system(
        SystemConfig::new("player_control", SystemGroupKind::Core),
        Box::new(PlayerControlSystem::new(input)),
    );
    world.add_system(
        SystemConfig::new("combat", SystemGroupKind::Combat),
        Box::new(CombatSystem::new(config.clone(), seed)),
    );
    world.add_system(
        SystemConfig::new("skills", SystemGroupKind::Combat),
        Box::new(SkillSystem::new(config.clone())),
    );
    world.add_system(
        SystemConfig::new("status_effects", SystemGroupKind::Combat),
        Box::new(EffectSystem::new()),
    );
    world.add_system(
        SystemConfig::new("ai", SystemGroupKind::Ai),
        Box::new(AiSystem::new()),
    );
    world.add_system(
        SystemConfig::new("projectiles", SystemGroupKind::Physics),
        Box::new(ProjectileSystem::new(config.projectile.clone())),
    );
    world.add_system(
        SystemConfig::new("tornadoes", SystemGroupKind::Physics),
        Box::new(TornadoSystem::new()),
    );
    world.add_system(
        SystemConfig::new("movement", SystemGroupKind::Movement),
        Box::new(MovementSystem::new()),
    );
    info!(order = ?world.scheduler().execution_order(), "systems installed");
}

/// Spawn a unit from a template.
///
/// # Errors
///
/// Store errors while attaching components.
pub fn spawn_unit(world: &mut World, template: &UnitTemplate, faction: Faction, at: Vec2) -> Result<Entity, EcsError> {
    let entity = world.create_entity();
    let unit = Unit::new(faction, template.max_health)
        .with_attack(template.attack_range, template.attack_cooldown)
        .with_speed(template.speed);
    world.add_component(entity, unit)?;
    world.add_component(entity, Position(at))?;
    world.add_component(entity, Velocity::ZERO)?;
    world.add_component(entity, Sprite::new(template.size, template.size, template.color.clone()))?;
    Ok(entity)
}

/// Spawn the player at the arena centre and `layout.enemy_count` enemies on a
/// jittered ring around it.
///
/// # Errors
///
/// See [`spawn_unit`].
pub fn spawn_match<R: Rng>(world: &mut World, layout: &SpawnLayout, rng: &mut R) -> Result<(Entity, Vec<Entity>), EcsError> {
    let center = Vec2::new(layout.arena_width, layout.arena_height) * 0.5;
    let player = spawn_unit(world, &layout.player, Faction::Player, center)?;

    let ring = layout.arena_width.min(layout.arena_height) * 0.4;
    let step = TAU / layout.enemy_count.max(1) as f32;
    let mut enemies = Vec::with_capacity(layout.enemy_count);
    for i in 0..layout.enemy_count {
        let angle = step * i as f32 + rng.gen_range(-0.25f32..0.25) * step;
        let radius = ring * rng.gen_range(0.8f32..1.0);
        let at = center + Vec2::from_angle(angle) * radius;
        enemies.push(spawn_unit(world, &layout.enemy, Faction::Enemy, at)?);
    }
    info!(%player, enemies = enemies.len(), "match spawned");
    Ok((player, enemies))
}

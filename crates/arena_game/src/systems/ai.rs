//! Enemy steering: close on the nearest hostile unit and hold at engage range.

use arena_component::{EcsError, Query};
use arena_ecs::{System, World};
use arena_math::{Position, Velocity};
use tracing::trace;

use crate::combat::{nearest_enemy, speed_multiplier};
use crate::components::Unit;

/// Units close in to this fraction of their attack range, then hold.
const ENGAGE_FRACTION: f32 = 0.8;

/// Steers non-player units toward the nearest hostile.
///
/// Each unit scans every other unit, so a frame is quadratic in the unit
/// count. That holds up for arena-sized populations only.
#[derive(Debug)]
pub struct AiSystem {
    query: Query,
}

impl AiSystem {
    #[must_use]
    pub fn new() -> Self {
        Self {
            query: Query::new()
                .with::<Position>()
                .with::<Velocity>()
                .with::<Unit>(),
        }
    }
}

impl Default for AiSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for AiSystem {
    fn update(&mut self, world: &mut World, _dt: f32) -> Result<(), EcsError> {
        for entity in world.query(&self.query) {
            let (Some(pos), Some(unit)) = (
                world.get_component::<Position>(entity).map(|p| p.0),
                world.get_component::<Unit>(entity),
            ) else {
                continue;
            };
            if unit.is_player() {
                continue;
            }
            let (faction, range, speed) = (unit.faction, unit.attack_range, unit.speed);

            let chase = nearest_enemy(world, pos, faction, f32::INFINITY, |e| e == entity)
                .filter(|&(_, distance)| distance > range * ENGAGE_FRACTION)
                .and_then(|(target, _)| world.get_component::<Position>(target).map(|p| p.0));

            let velocity = match chase {
                Some(target_pos) => {
                    let speed = speed * speed_multiplier(world, entity);
                    Velocity::towards(pos, target_pos, speed)
                }
                None => Velocity::ZERO,
            };
            trace!(unit = %entity, vx = velocity.0.x, vy = velocity.0.y, "ai steer");
            if let Some(v) = world.get_component_mut::<Velocity>(entity) {
                *v = velocity;
            }
        }
        Ok(())
    }
}

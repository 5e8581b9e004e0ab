//! Velocity integration for units.

use arena_component::{EcsError, Query};
use arena_ecs::{System, SystemPriority, World};
use arena_math::{Position, Velocity};

use crate::components::{ProjectileMotion, Tornado};

/// Euler integration of `position += velocity * dt`.
///
/// Projectiles and tornadoes integrate their own motion and are excluded.
#[derive(Debug)]
pub struct MovementSystem {
    query: Query,
}

impl MovementSystem {
    #[must_use]
    pub fn new() -> Self {
        Self {
            query: Query::new()
                .with::<Position>()
                .with::<Velocity>()
                .without::<ProjectileMotion>()
                .without::<Tornado>(),
        }
    }
}

impl Default for MovementSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl System for MovementSystem {
    fn update(&mut self, world: &mut World, dt: f32) -> Result<(), EcsError> {
        for entity in world.query(&self.query) {
            let Some(velocity) = world.get_component::<Velocity>(entity).map(|v| v.0) else {
                continue;
            };
            if let Some(position) = world.get_component_mut::<Position>(entity) {
                position.0 += velocity * dt;
            }
        }
        Ok(())
    }

    fn priority(&self) -> SystemPriority {
        SystemPriority::Normal
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::MotionKind;

    #[test]
    fn test_integrates_velocity() {
        let mut world = World::new();
        let e = world.create_entity();
        world.add_component(e, Position::new(1.0, 2.0)).unwrap();
        world.add_component(e, Velocity::new(10.0, -4.0)).unwrap();
        let still = world.create_entity();
        world.add_component(still, Position::new(5.0, 5.0)).unwrap();

        let mut system = MovementSystem::new();
        system.update(&mut world, 0.5).unwrap();

        let p = world.get_component::<Position>(e).unwrap().0;
        assert!((p.x - 6.0).abs() < 1e-6);
        assert!(p.y.abs() < 1e-6);
        assert_eq!(world.get_component::<Position>(still).unwrap().0.x, 5.0);
    }

    #[test]
    fn test_skips_entities_with_own_motion() {
        let mut world = World::new();
        let e = world.create_entity();
        world.add_component(e, Position::new(0.0, 0.0)).unwrap();
        world.add_component(e, Velocity::new(10.0, 0.0)).unwrap();
        world
            .add_component(e, ProjectileMotion::new(MotionKind::Linear, 1.0))
            .unwrap();

        MovementSystem::new().update(&mut world, 1.0).unwrap();
        assert_eq!(world.get_component::<Position>(e).unwrap().0.x, 0.0);
    }
}

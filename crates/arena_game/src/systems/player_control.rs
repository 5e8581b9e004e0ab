//! Keyboard-driven player movement.
//!
//! The input collaborator owns an [`InputHandle`] and writes key state into it;
//! this system turns that state into the player's velocity each frame.

use std::cell::Cell;
use std::rc::Rc;

use arena_component::{EcsError, Query};
use arena_ecs::{System, SystemPriority, World};
use arena_math::{Vec2, Velocity};
use serde::{Deserialize, Serialize};

use crate::combat::speed_multiplier;
use crate::components::Unit;

/// Directional key state, written by the input collaborator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl InputState {
    /// Unit-length direction of the pressed keys, zero when none (or only
    /// opposing keys) are held. Screen space: up is negative y.
    #[must_use]
    pub fn direction(self) -> Vec2 {
        let axis = |neg: bool, pos: bool| f32::from(u8::from(pos)) - f32::from(u8::from(neg));
        Vec2::new(axis(self.left, self.right), axis(self.up, self.down)).normalize_or_zero()
    }
}

/// Shared handle to the key state.
pub type InputHandle = Rc<Cell<InputState>>;

/// Drives player units from [`InputState`].
#[derive(Debug)]
pub struct PlayerControlSystem {
    input: InputHandle,
    query: Query,
}

impl PlayerControlSystem {
    #[must_use]
    pub fn new(input: InputHandle) -> Self {
        Self {
            input,
            query: Query::new().with::<Unit>().with::<Velocity>(),
        }
    }
}

impl System for PlayerControlSystem {
    fn update(&mut self, world: &mut World, _dt: f32) -> Result<(), EcsError> {
        let direction = self.input.get().direction();
        for entity in world.query(&self.query) {
            let Some(unit) = world.get_component::<Unit>(entity) else {
                continue;
            };
            if !unit.is_player() {
                continue;
            }
            let speed = unit.speed * speed_multiplier(world, entity);
            if let Some(v) = world.get_component_mut::<Velocity>(entity) {
                v.0 = direction * speed;
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
    use arena_math::Position;

    use super::*;
    use crate::components::Faction;

    #[test]
    fn test_direction_is_normalised() {
        let diagonal = InputState {
            up: true,
            right: true,
            ..InputState::default()
        };
        let d = diagonal.direction();
        assert!((d.length() - 1.0).abs() < 1e-6);
        assert!(d.x > 0.0 && d.y < 0.0);

        let cancelled = InputState {
            left: true,
            right: true,
            ..InputState::default()
        };
        assert_eq!(cancelled.direction(), Vec2::ZERO);
    }

    #[test]
    fn test_only_player_units_follow_input() {
        let mut world = World::new();
        let spawn = |world: &mut World, faction| {
            let e = world.create_entity();
            world.add_component(e, Position::new(0.0, 0.0)).unwrap();
            world.add_component(e, Velocity::ZERO).unwrap();
            world
                .add_component(e, Unit::new(faction, 100.0).with_speed(150.0))
                .unwrap();
            e
        };
        let player = spawn(&mut world, Faction::Player);
        let enemy = spawn(&mut world, Faction::Enemy);

        let input: InputHandle = Rc::new(Cell::new(InputState::default()));
        let mut system = PlayerControlSystem::new(Rc::clone(&input));
        input.set(InputState {
            down: true,
            ..InputState::default()
        });
        system.update(&mut world, 0.1).unwrap();

        assert_eq!(world.get_component::<Velocity>(player).unwrap().0, Vec2::new(0.0, 150.0));
        assert_eq!(world.get_component::<Velocity>(enemy).unwrap().0, Vec2::ZERO);

        input.set(InputState::default());
        system.update(&mut world, 0.1).unwrap();
        assert_eq!(world.get_component::<Velocity>(player).unwrap().0, Vec2::ZERO);
    }
}

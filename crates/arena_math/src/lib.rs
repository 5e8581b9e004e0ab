//! # arena_math
//!
//! Math types for the arena ECS. Re-exports [`glam`] for 2D vectors and
//! defines the kinematic components that implement
//! [`Component`](arena_component::Component), plus the trajectory helpers the
//! projectile motion strategies are built from.

pub mod kinematics;
pub mod trajectory;

// Re-export glam types for convenience.
pub use glam::Vec2;

pub use kinematics::{Position, Velocity};
pub use trajectory::{heading, parabolic_height, steer_towards, wrap_angle};

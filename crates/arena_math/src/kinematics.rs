//! Position and velocity components.
//!
//! Both are thin wrappers around [`Vec2`] so that systems can treat them as
//! vectors (`pos.0 += vel.0 * dt`) while the store still sees two distinct
//! kinds.

use arena_component::Component;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// World-space location in arena units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Position(pub Vec2);

impl Position {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self(Vec2::new(x, y))
    }

    /// Euclidean distance to another position.
    #[must_use]
    pub fn distance(&self, other: &Position) -> f32 {
        self.0.distance(other.0)
    }
}

impl Component for Position {
    fn type_name() -> &'static str {
        "position"
    }
}

/// Linear velocity in arena units per second.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity(pub Vec2);

impl Velocity {
    pub const ZERO: Self = Self(Vec2::ZERO);

    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self(Vec2::new(x, y))
    }

    /// Velocity of magnitude `speed` pointing from `from` to `to`.
    ///
    /// Coincident points yield zero velocity.
    #[must_use]
    pub fn towards(from: Vec2, to: Vec2, speed: f32) -> Self {
        Self((to - from).normalize_or_zero() * speed)
    }

    #[must_use]
    pub fn speed(&self) -> f32 {
        self.0.length()
    }
}

impl Component for Velocity {
    fn type_name() -> &'static str {
        "velocity"
    }
}

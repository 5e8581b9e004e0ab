//! Components read by the rendering collaborator.

use std::collections::VecDeque;

use arena_component::Component;
use arena_math::Vec2;
use serde::{Deserialize, Serialize};

/// A coloured rectangle (or ellipse, for effects) centred on the position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sprite {
    pub width: f32,
    pub height: f32,
    /// CSS-style colour string, e.g. `"#FFA500"`.
    pub color: String,
    /// Facing in radians.
    pub rotation: f32,
}

impl Sprite {
    #[must_use]
    pub fn new(width: f32, height: f32, color: impl Into<String>) -> Self {
        Self {
            width,
            height,
            color: color.into(),
            rotation: 0.0,
        }
    }

    #[must_use]
    pub fn rotated(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    /// A circle of the given radius.
    #[must_use]
    pub fn disc(radius: f32, color: impl Into<String>) -> Self {
        Self::new(radius * 2.0, radius * 2.0, color)
    }
}

impl Component for Sprite {
    fn type_name() -> &'static str {
        "sprite"
    }
}

/// The most recent positions of a moving entity, newest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trail {
    pub points: VecDeque<Vec2>,
    pub max_points: usize,
}

impl Trail {
    #[must_use]
    pub fn new(start: Vec2, max_points: usize) -> Self {
        let mut points = VecDeque::with_capacity(max_points + 1);
        points.push_front(start);
        Self { points, max_points }
    }

    /// A fixed polyline, e.g. a lightning bolt. Points are kept as given.
    #[must_use]
    pub fn fixed(points: impl IntoIterator<Item = Vec2>) -> Self {
        let points: VecDeque<Vec2> = points.into_iter().collect();
        let max_points = points.len();
        Self { points, max_points }
    }

    /// Record a new head point, dropping the oldest beyond `max_points`.
    pub fn push(&mut self, point: Vec2) {
        self.points.push_front(point);
        while self.points.len() > self.max_points {
            self.points.pop_back();
        }
    }
}

impl Component for Trail {
    fn type_name() -> &'static str {
        "trail"
    }
}

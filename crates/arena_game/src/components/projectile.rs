//! Projectile components.
//!
//! A projectile entity carries [`Position`](arena_math::Position) and
//! [`Velocity`](arena_math::Velocity) plus the three components here:
//! what it does on hit ([`Projectile`]), how it flies ([`ProjectileMotion`]),
//! and its chain and rider state ([`ProjectileEffect`]).

use std::collections::HashSet;

use arena_component::{Component, Entity};
use serde::{Deserialize, Serialize};

use super::status::StatusEffect;
use super::unit::Faction;

/// Damage payload and targeting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub damage: f32,
    /// Speed in arena units per second.
    pub speed: f32,
    /// The caster. May already be dead.
    pub source: Entity,
    /// Faction of the caster at launch, used to pick bounce targets.
    pub source_faction: Faction,
    /// Current target. A non-owning handle that may go stale at any time.
    pub target: Entity,
}

impl Component for Projectile {
    fn type_name() -> &'static str {
        "projectile"
    }
}

/// Motion strategy selector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MotionKind {
    Linear,
    Parabolic {
        /// Peak height of the arc at the flight midpoint.
        max_height: f32,
    },
    Homing {
        /// Maximum heading change in radians per second.
        turn_speed: f32,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileMotion {
    pub kind: MotionKind,
    /// Seconds since launch or last bounce.
    pub flight_time: f32,
    /// Projected seconds from launch (or last bounce) to impact.
    pub total_flight_time: f32,
}

impl ProjectileMotion {
    #[must_use]
    pub fn new(kind: MotionKind, total_flight_time: f32) -> Self {
        Self {
            kind,
            flight_time: 0.0,
            total_flight_time,
        }
    }

    /// Fraction of the projected flight completed, `0` at launch.
    #[must_use]
    pub fn progress(&self) -> f32 {
        if self.total_flight_time <= 0.0 {
            return 1.0;
        }
        self.flight_time / self.total_flight_time
    }
}

impl Component for ProjectileMotion {
    fn type_name() -> &'static str {
        "projectile_motion"
    }
}

/// Bounce chain and on-hit riders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileEffect {
    /// Bounces remaining.
    pub bounce_count: u32,
    pub max_bounce_count: u32,
    /// Entities this projectile has already hit (the caster from the start).
    pub hit_entities: HashSet<Entity>,
    /// Splash radius around the struck target, if any.
    pub aoe_radius: Option<f32>,
    /// Applied to the struck target on hit.
    pub status_effects: Vec<StatusEffect>,
}

impl ProjectileEffect {
    /// No bounces, nothing hit yet except `source`.
    #[must_use]
    pub fn new(source: Entity) -> Self {
        Self {
            bounce_count: 0,
            max_bounce_count: 0,
            hit_entities: HashSet::from([source]),
            aoe_radius: None,
            status_effects: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_bounces(mut self, count: u32) -> Self {
        self.bounce_count = count;
        self.max_bounce_count = count;
        self
    }

    #[must_use]
    pub fn with_aoe(mut self, radius: f32) -> Self {
        self.aoe_radius = Some(radius);
        self
    }

    #[must_use]
    pub fn with_status(mut self, effect: StatusEffect) -> Self {
        self.status_effects.push(effect);
        self
    }
}

impl Component for ProjectileEffect {
    fn type_name() -> &'static str {
        "projectile_effect"
    }
}

/// A synthetic target that only gives a projectile somewhere to fly.
///
/// Aim points carry a position but no [`Unit`](super::Unit), so no unit
/// query ever sees them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AimPoint {
    pub owner: Entity,
}

impl Component for AimPoint {
    fn type_name() -> &'static str {
        "aim_point"
    }
}

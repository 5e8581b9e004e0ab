//! Gameplay components.

mod projectile;
mod skill;
mod status;
mod tornado;
mod unit;
mod visual;

pub use projectile::{AimPoint, MotionKind, Projectile, ProjectileEffect, ProjectileMotion};
pub use skill::{SkillCooldowns, SkillRequest};
pub use status::{StatusEffect, StatusEffects, StatusKind};
pub use tornado::{Tornado, TornadoMovement};
pub use unit::{Faction, Unit};
pub use visual::{Sprite, Trail};

pub use arena_math::{Position, Velocity};

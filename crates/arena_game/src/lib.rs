//! # arena_game
//!
//! Gameplay for the arena combat runtime: unit, projectile and effect
//! components, the skill roster, and the systems that run a match on an
//! [`arena_ecs::World`].
//!
//! ```text
//! core     player_control
//! combat   combat ─► skills ─► status_effects
//! ai       ai
//! physics  projectiles, tornadoes
//! movement movement
//! ```
//!
//! Use [`setup::install_systems`] and [`setup::spawn_match`] to assemble a
//! match, then drive the world with [`arena_ecs::TickLoop`].

pub mod combat;
pub mod components;
pub mod config;
pub mod render;
pub mod setup;
pub mod skills;
pub mod systems;

pub use config::{ArenaConfig, ConfigError, SkillConfig, SkillType};
pub use render::{RenderItem, snapshot};
pub use setup::{install_systems, spawn_match, spawn_unit};
pub use skills::{Skill, SkillBook};

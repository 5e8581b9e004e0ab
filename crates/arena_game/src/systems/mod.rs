//! Per-frame gameplay systems.
//!
//! Every system here snapshots its query result before touching the world,
//! so entities created or destroyed mid-iteration never corrupt the pass.
//! Liveness is re-checked per entity after the snapshot.

mod ai;
mod combat;
mod effects;
mod movement;
mod player_control;
mod projectile;
mod skill;
mod tornado;

pub use ai::AiSystem;
pub use combat::CombatSystem;
pub use effects::EffectSystem;
pub use movement::MovementSystem;
pub use player_control::{InputHandle, InputState, PlayerControlSystem};
pub use projectile::ProjectileSystem;
pub use skill::SkillSystem;
pub use tornado::TornadoSystem;

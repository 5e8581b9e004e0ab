//! Status-effect ticking.
//!
//! Damage and healing over time land once per whole second of elapsed effect
//! time; a partial final second never ticks. Expired effects emit
//! `skill_effect_end`, and a holder left with no effects loses the component.

use arena_component::{EcsError, Entity, Query};
use arena_ecs::{GameEvent, System, SystemPriority, World};
use tracing::trace;

use crate::combat::{DamageOutcome, apply_damage, apply_healing};
use crate::components::{StatusEffect, StatusEffects, StatusKind};

const TICK: f32 = 1.0;
const TICK_EPSILON: f32 = 1e-4;

#[derive(Debug)]
pub struct EffectSystem {
    query: Query,
}

impl EffectSystem {
    #[must_use]
    pub fn new() -> Self {
        Self {
            query: Query::new().with::<StatusEffects>(),
        }
    }
}

impl Default for EffectSystem {
    fn default() -> Self {
        Self::new()
    }
}

/// Advance one effect by `dt`. Returns the number of ticks that fell due.
fn advance(effect: &mut StatusEffect, dt: f32) -> u32 {
    let step = dt.min(effect.duration.max(0.0));
    effect.duration -= dt;
    effect.tick_timer += step;
    let mut ticks = 0;
    while effect.tick_timer + TICK_EPSILON >= TICK {
        effect.tick_timer -= TICK;
        ticks += 1;
    }
    ticks
}

impl EffectSystem {
    fn tick_holder(&self, world: &mut World, holder: Entity, dt: f32) -> Result<(), EcsError> {
        let Some(mut effects) = world.get_component::<StatusEffects>(holder).cloned() else {
            return Ok(());
        };

        for effect in &mut effects.effects {
            for _ in 0..advance(effect, dt) {
                match effect.kind {
                    StatusKind::DamageOverTime => {
                        let outcome = apply_damage(world, holder, effect.value, Some(effect.source));
                        if outcome == DamageOutcome::Killed {
                            return Ok(());
                        }
                    }
                    StatusKind::HealOverTime => {
                        apply_healing(world, holder, effect.value);
                    }
                    StatusKind::Buff | StatusKind::Debuff => {}
                }
            }
        }

        let (live, expired): (Vec<_>, Vec<_>) =
            effects.effects.into_iter().partition(|e| e.duration > 0.0);
        for effect in &expired {
            trace!(%holder, effect = effect.kind.as_str(), "status effect expired");
            world.emit(&GameEvent::SkillEffectEnd {
                entity: holder,
                effect: effect.kind.as_str().to_owned(),
                source: effect.source,
            });
        }

        if live.is_empty() {
            world.remove_component::<StatusEffects>(holder);
        } else if let Some(current) = world.get_component_mut::<StatusEffects>(holder) {
            current.effects = live;
        }
        Ok(())
    }
}

impl System for EffectSystem {
    fn update(&mut self, world: &mut World, dt: f32) -> Result<(), EcsError> {
        for holder in world.query(&self.query) {
            self.tick_holder(world, holder, dt)?;
        }
        Ok(())
    }

    fn priority(&self) -> SystemPriority {
        SystemPriority::Low
    }
}

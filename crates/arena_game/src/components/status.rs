//! Timed status effects: buffs, debuffs, damage and healing over time.

use arena_component::{Component, Entity};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusKind {
    /// Speeds the holder up by `value` (0.25 = +25%).
    Buff,
    /// Slows the holder by `value` (0.5 = half speed).
    Debuff,
    /// Deals `value` damage per second.
    DamageOverTime,
    /// Restores `value` health per second.
    HealOverTime,
}

impl StatusKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Buff => "buff",
            Self::Debuff => "debuff",
            Self::DamageOverTime => "dot",
            Self::HealOverTime => "hot",
        }
    }
}

/// One active effect instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEffect {
    pub kind: StatusKind,
    /// Seconds remaining.
    pub duration: f32,
    pub value: f32,
    /// Who applied it. May already be dead.
    pub source: Entity,
    pub stackable: bool,
    pub max_stacks: u32,
    /// Elapsed time toward the next per-second tick.
    #[serde(default)]
    pub tick_timer: f32,
}

impl StatusEffect {
    #[must_use]
    pub fn new(kind: StatusKind, duration: f32, value: f32, source: Entity) -> Self {
        Self {
            kind,
            duration,
            value,
            source,
            stackable: false,
            max_stacks: 1,
            tick_timer: 0.0,
        }
    }

    #[must_use]
    pub fn stacking(mut self, max_stacks: u32) -> Self {
        self.stackable = true;
        self.max_stacks = max_stacks.max(1);
        self
    }

    /// The same effect re-attributed to another source.
    #[must_use]
    pub fn from_source(mut self, source: Entity) -> Self {
        self.source = source;
        self
    }
}

/// Every status effect currently on an entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusEffects {
    pub effects: Vec<StatusEffect>,
}

impl StatusEffects {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an effect.
    ///
    /// Stackable effects are pushed while fewer than `max_stacks` of that kind
    /// from the same source are active; at the cap the oldest stack is
    /// refreshed instead. A non-stackable effect replaces any active effect of
    /// the same kind from the same source.
    pub fn apply(&mut self, effect: StatusEffect) {
        let same = |e: &StatusEffect| e.kind == effect.kind && e.source == effect.source;
        if effect.stackable {
            let stacks = self.effects.iter().filter(|e| same(e)).count();
            if stacks < effect.max_stacks as usize {
                self.effects.push(effect);
            } else if let Some(oldest) = self.effects.iter_mut().find(|e| same(e)) {
                oldest.duration = effect.duration;
            }
            return;
        }
        match self.effects.iter_mut().find(|e| same(e)) {
            Some(existing) => *existing = effect,
            None => self.effects.push(effect),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.effects.len()
    }

    /// Combined movement-speed factor of all buffs and debuffs. Never negative.
    #[must_use]
    pub fn speed_multiplier(&self) -> f32 {
        self.effects
            .iter()
            .map(|e| match e.kind {
                StatusKind::Buff => 1.0 + e.value,
                StatusKind::Debuff => 1.0 - e.value,
                StatusKind::DamageOverTime | StatusKind::HealOverTime => 1.0,
            })
            .product::<f32>()
            .max(0.0)
    }
}

impl Component for StatusEffects {
    fn type_name() -> &'static str {
        "status_effects"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CASTER: Entity = Entity(1);
    const OTHER: Entity = Entity(2);

    #[test]
    fn test_non_stackable_replaces_same_kind_and_source() {
        let mut fx = StatusEffects::new();
        fx.apply(StatusEffect::new(StatusKind::HealOverTime, 5.0, 4.0, CASTER));
        fx.apply(StatusEffect::new(StatusKind::HealOverTime, 2.0, 9.0, CASTER));
        assert_eq!(fx.len(), 1);
        assert_eq!(fx.effects[0].value, 9.0);

        fx.apply(StatusEffect::new(StatusKind::HealOverTime, 2.0, 1.0, OTHER));
        assert_eq!(fx.len(), 2);
    }

    #[test]
    fn test_stackable_caps_at_max_stacks() {
        let mut fx = StatusEffects::new();
        let burn = StatusEffect::new(StatusKind::DamageOverTime, 3.0, 5.0, CASTER).stacking(2);
        fx.apply(burn.clone());
        fx.apply(burn.clone());
        fx.effects[0].duration = 0.5;
        fx.apply(burn);
        assert_eq!(fx.len(), 2);
        assert_eq!(fx.effects[0].duration, 3.0);
    }

    #[test]
    fn test_speed_multiplier() {
        let mut fx = StatusEffects::new();
        assert_eq!(fx.speed_multiplier(), 1.0);
        fx.apply(StatusEffect::new(StatusKind::Debuff, 2.0, 0.5, CASTER));
        assert!((fx.speed_multiplier() - 0.5).abs() < 1e-6);
        fx.apply(StatusEffect::new(StatusKind::Buff, 2.0, 1.0, OTHER));
        assert!((fx.speed_multiplier() - 1.0).abs() < 1e-6);
        fx.apply(StatusEffect::new(StatusKind::Debuff, 2.0, 3.0, OTHER));
        assert_eq!(fx.speed_multiplier(), 0.0);
    }
}

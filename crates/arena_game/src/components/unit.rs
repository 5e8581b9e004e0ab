//! Combatant components.

use arena_component::Component;
use serde::{Deserialize, Serialize};

/// Which side a unit fights for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Faction {
    Player,
    Enemy,
}

impl Faction {
    /// `true` if the two factions are hostile to each other.
    #[must_use]
    pub fn opposes(self, other: Faction) -> bool {
        self != other
    }

    #[must_use]
    pub fn opponent(self) -> Faction {
        match self {
            Self::Player => Self::Enemy,
            Self::Enemy => Self::Player,
        }
    }
}

/// A fighting unit: hit points, attack timing and movement speed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub health: f32,
    pub max_health: f32,
    /// Distance within which the unit will start a cast.
    pub attack_range: f32,
    /// Seconds between cast decisions.
    pub attack_cooldown: f32,
    /// Seconds until the next cast decision. Counts down to zero.
    pub current_cooldown: f32,
    /// Movement speed in arena units per second.
    pub speed: f32,
    pub faction: Faction,
}

impl Unit {
    /// A unit at full health, ready to act.
    #[must_use]
    pub fn new(faction: Faction, max_health: f32) -> Self {
        Self {
            health: max_health,
            max_health,
            attack_range: 0.0,
            attack_cooldown: 0.0,
            current_cooldown: 0.0,
            speed: 0.0,
            faction,
        }
    }

    #[must_use]
    pub fn with_attack(mut self, range: f32, cooldown: f32) -> Self {
        self.attack_range = range;
        self.attack_cooldown = cooldown;
        self
    }

    #[must_use]
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    #[must_use]
    pub fn is_player(&self) -> bool {
        self.faction == Faction::Player
    }

    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    /// Current health as a fraction of max, in `[0, 1]`.
    #[must_use]
    pub fn health_ratio(&self) -> f32 {
        if self.max_health <= 0.0 {
            return 0.0;
        }
        (self.health / self.max_health).clamp(0.0, 1.0)
    }

    /// Subtract hit points. Health may go negative; death is `health <= 0`.
    pub fn damage(&mut self, amount: f32) {
        self.health -= amount;
    }

    /// Heal, clamping to max.
    pub fn heal(&mut self, amount: f32) {
        self.health = (self.health + amount).min(self.max_health);
    }
}

impl Component for Unit {
    fn type_name() -> &'static str {
        "unit"
    }
}

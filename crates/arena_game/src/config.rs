//! Tuning data.
//!
//! Everything numeric about the match lives here: per-skill parameters, the
//! cast-selection policy, projectile constants and the spawn layout. The whole
//! tree deserialises from JSON with every field defaulted, so a config file
//! only needs to name what it overrides.

use std::collections::BTreeMap;
use std::f32::consts::PI;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::components::Faction;

/// Errors raised while loading an [`ArenaConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The config text is not valid JSON for this schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    /// The selection weights cannot produce a choice.
    #[error("invalid selection weights: {0}")]
    InvalidWeights(String),
}

/// The skill roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillType {
    MultiArrow,
    ThunderStrike,
    Fireball,
    FrostNova,
    PoisonCloud,
    HealingAura,
    Tornado,
}

impl SkillType {
    pub const ALL: [SkillType; 7] = [
        Self::MultiArrow,
        Self::ThunderStrike,
        Self::Fireball,
        Self::FrostNova,
        Self::PoisonCloud,
        Self::HealingAura,
        Self::Tornado,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MultiArrow => "multi_arrow",
            Self::ThunderStrike => "thunder_strike",
            Self::Fireball => "fireball",
            Self::FrostNova => "frost_nova",
            Self::PoisonCloud => "poison_cloud",
            Self::HealingAura => "healing_aura",
            Self::Tornado => "tornado",
        }
    }
}

impl fmt::Display for SkillType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters of one skill. Optional fields fall back to per-skill constants.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillConfig {
    /// Seconds between casts.
    pub cooldown: f32,
    /// Maximum cast distance. `0` means centred on the caster.
    pub range: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub damage: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aoe_radius: Option<f32>,
    /// Total healing over `duration`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub healing: Option<f32>,
    /// Lifetime of the effect the skill leaves behind.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projectile_speed: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub move_speed: Option<f32>,
    /// Seconds between damage ticks of a lingering effect.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tick_interval: Option<f32>,
    /// Seconds between target searches of a mobile effect.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retarget_interval: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bounce_count: Option<u32>,
    /// Peak height of a parabolic projectile.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arc_height: Option<f32>,
    /// Strength of the status effect the skill applies (dps, slow fraction).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_value: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_duration: Option<f32>,
}

impl SkillConfig {
    /// The stock tuning for a skill.
    #[must_use]
    pub fn default_for(skill: SkillType) -> Self {
        let base = Self::default();
        match skill {
            SkillType::MultiArrow => Self {
                cooldown: 2.0,
                range: 300.0,
                damage: Some(20.0),
                projectile_speed: Some(480.0),
                bounce_count: Some(2),
                arc_height: Some(30.0),
                ..base
            },
            SkillType::ThunderStrike => Self {
                cooldown: 4.0,
                range: 250.0,
                damage: Some(40.0),
                aoe_radius: Some(50.0),
                ..base
            },
            SkillType::Fireball => Self {
                cooldown: 3.0,
                range: 200.0,
                damage: Some(30.0),
                aoe_radius: Some(40.0),
                projectile_speed: Some(200.0),
                status_value: Some(5.0),
                status_duration: Some(3.0),
                ..base
            },
            SkillType::FrostNova => Self {
                cooldown: 5.0,
                range: 0.0,
                damage: Some(25.0),
                aoe_radius: Some(100.0),
                status_value: Some(0.5),
                status_duration: Some(2.0),
                ..base
            },
            SkillType::PoisonCloud => Self {
                cooldown: 8.0,
                range: 150.0,
                damage: Some(10.0),
                aoe_radius: Some(60.0),
                duration: Some(5.0),
                tick_interval: Some(1.0),
                ..base
            },
            SkillType::HealingAura => Self {
                cooldown: 10.0,
                range: 0.0,
                healing: Some(20.0),
                aoe_radius: Some(80.0),
                duration: Some(5.0),
                ..base
            },
            SkillType::Tornado => Self {
                cooldown: 10.0,
                range: 300.0,
                damage: Some(15.0),
                aoe_radius: Some(40.0),
                duration: Some(8.0),
                move_speed: Some(100.0),
                tick_interval: Some(1.0),
                retarget_interval: Some(0.5),
                ..base
            },
        }
    }

    /// `true` if a target `distance` away can be cast on.
    #[must_use]
    pub fn in_range(&self, distance: f32) -> bool {
        self.range <= 0.0 || distance <= self.range
    }
}

/// How the combat system picks a skill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectionPolicy {
    /// The faction that prefers its signature skill.
    pub signature_faction: Faction,
    /// Cast whenever ready by `signature_faction`.
    pub signature_skill: Option<SkillType>,
    /// Relative odds among the remaining ready skills.
    pub weights: BTreeMap<SkillType, f32>,
    /// Health fraction below which `rescue_skill` overrides everything.
    pub rescue_threshold: f32,
    pub rescue_skill: SkillType,
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        Self {
            signature_faction: Faction::Player,
            signature_skill: Some(SkillType::MultiArrow),
            weights: BTreeMap::from([
                (SkillType::MultiArrow, 2.0),
                (SkillType::ThunderStrike, 3.0),
                (SkillType::Fireball, 3.0),
                (SkillType::FrostNova, 2.0),
                (SkillType::PoisonCloud, 2.0),
                (SkillType::HealingAura, 0.0),
                (SkillType::Tornado, 1.0),
            ]),
            rescue_threshold: 0.3,
            rescue_skill: SkillType::HealingAura,
        }
    }
}

impl SelectionPolicy {
    #[must_use]
    pub fn weight(&self, skill: SkillType) -> f32 {
        self.weights.get(&skill).copied().unwrap_or(0.0)
    }

    /// # Errors
    ///
    /// [`ConfigError::InvalidWeights`] if a weight is negative or not finite,
    /// or if no weight is positive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some((skill, w)) = self
            .weights
            .iter()
            .find(|(_, w)| !w.is_finite() || **w < 0.0)
        {
            return Err(ConfigError::InvalidWeights(format!(
                "{skill} has weight {w}"
            )));
        }
        if !self.weights.values().any(|&w| w > 0.0) {
            return Err(ConfigError::InvalidWeights(
                "at least one weight must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Constants shared by every projectile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileTuning {
    /// A projectile closer than this to its target has hit it.
    pub hit_threshold: f32,
    /// Maximum distance from the struck target to the next bounce target.
    pub bounce_radius: f32,
    /// Length of projectile trails.
    pub trail_points: usize,
    /// Default turn rate of homing projectiles, radians per second.
    pub homing_turn_speed: f32,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            hit_threshold: 20.0,
            bounce_radius: 200.0,
            trail_points: 5,
            homing_turn_speed: PI,
        }
    }
}

/// Stats and looks of a spawned unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UnitTemplate {
    pub max_health: f32,
    pub attack_range: f32,
    pub attack_cooldown: f32,
    pub speed: f32,
    pub size: f32,
    pub color: String,
}

impl Default for UnitTemplate {
    fn default() -> Self {
        Self {
            max_health: 100.0,
            attack_range: 200.0,
            attack_cooldown: 1.0,
            speed: 100.0,
            size: 30.0,
            color: "#FFFFFF".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnLayout {
    pub arena_width: f32,
    pub arena_height: f32,
    pub enemy_count: usize,
    pub player: UnitTemplate,
    pub enemy: UnitTemplate,
}

impl Default for SpawnLayout {
    fn default() -> Self {
        Self {
            arena_width: 800.0,
            arena_height: 600.0,
            enemy_count: 5,
            player: UnitTemplate {
                max_health: 100.0,
                attack_range: 300.0,
                attack_cooldown: 1.0,
                speed: 150.0,
                size: 30.0,
                color: "#4CAF50".into(),
            },
            enemy: UnitTemplate {
                max_health: 50.0,
                attack_range: 150.0,
                attack_cooldown: 2.0,
                speed: 60.0,
                size: 25.0,
                color: "#F44336".into(),
            },
        }
    }
}

/// All tuning data for one match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Per-skill overrides. Skills not listed use [`SkillConfig::default_for`].
    pub skills: BTreeMap<SkillType, SkillConfig>,
    pub selection: SelectionPolicy,
    pub projectile: ProjectileTuning,
    pub spawn: SpawnLayout,
}

impl ArenaConfig {
    /// The effective config of a skill.
    #[must_use]
    pub fn skill(&self, skill: SkillType) -> SkillConfig {
        self.skills
            .get(&skill)
            .cloned()
            .unwrap_or_else(|| SkillConfig::default_for(skill))
    }

    /// Parse and validate a JSON config.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Parse`] on malformed JSON, [`ConfigError::InvalidWeights`]
    /// if the selection policy cannot choose a skill.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.selection.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`ArenaConfig::from_json_str`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded arena config");
        Self::from_json_str(&text)
    }
}

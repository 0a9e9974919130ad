//! Numeric tuning consumed by every system.

use serde::Deserialize;
use thiserror::Error;

/// Root tuning configuration for a run.
///
/// Every section defaults to the authored values so a TOML override may name
/// only the knobs it changes.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Lane geometry and melee combat constants.
    pub combat: CombatConfig,
    /// Projectile culling bounds.
    pub projectiles: ProjectileConfig,
    /// Status effect timing.
    pub status_effects: StatusEffectConfig,
    /// Wave pacing and floor structure.
    pub waves: WaveTuning,
    /// Automatic card player pacing.
    pub ai: AiConfig,
    /// Hand size and draw pacing.
    pub deck: DeckConfig,
    /// Starting resources and regeneration.
    pub resources: ResourceConfig,
    /// Tower durability.
    pub tower: TowerConfig,
    /// Automatic wave continuation.
    pub auto_continue: AutoContinueConfig,
    /// Combat log retention.
    pub log: LogConfig,
    /// Seed for the world random number generator.
    pub rng_seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            combat: CombatConfig::default(),
            projectiles: ProjectileConfig::default(),
            status_effects: StatusEffectConfig::default(),
            waves: WaveTuning::default(),
            ai: AiConfig::default(),
            deck: DeckConfig::default(),
            resources: ResourceConfig::default(),
            tower: TowerConfig::default(),
            auto_continue: AutoContinueConfig::default(),
            log: LogConfig::default(),
            rng_seed: 0x5eed_0f5a_17e5_1e6e,
        }
    }
}

impl GameConfig {
    /// Parses a TOML document and validates the result.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects values that would divide by zero or invert the lane.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.combat.lane_min >= self.combat.lane_max {
            return Err(ConfigError::InvertedLane {
                min: self.combat.lane_min,
                max: self.combat.lane_max,
            });
        }
        if self.combat.min_attack_speed <= 0.0 {
            return Err(ConfigError::NonPositive("combat.min_attack_speed"));
        }
        if self.status_effects.tick_interval <= 0.0 {
            return Err(ConfigError::NonPositive("status_effects.tick_interval"));
        }
        if self.waves.spawn_stagger <= 0.0 {
            return Err(ConfigError::NonPositive("waves.spawn_stagger"));
        }
        if self.deck.draw_speed <= 0.0 {
            return Err(ConfigError::NonPositive("deck.draw_speed"));
        }
        if self.waves.boss_floor_frequency == 0 {
            return Err(ConfigError::Zero("waves.boss_floor_frequency"));
        }
        if self.waves.waves_per_floor == 0 {
            return Err(ConfigError::Zero("waves.waves_per_floor"));
        }
        if self.deck.max_hand_size == 0 {
            return Err(ConfigError::Zero("deck.max_hand_size"));
        }
        if self.log.max_entries == 0 {
            return Err(ConfigError::Zero("log.max_entries"));
        }
        Ok(())
    }
}

/// Lane geometry and melee combat constants.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    /// Tower end of the lane.
    pub lane_min: f64,
    /// Spawn end of the lane.
    pub lane_max: f64,
    /// Lane position of the tower.
    pub tower_position: f64,
    /// Hitbox radius shared by all entities.
    pub entity_radius: f64,
    /// Floor applied to attack speed before computing cooldowns.
    pub min_attack_speed: f64,
    /// Seconds an entity spends dying before it is removed.
    pub death_animation_duration: f64,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            lane_min: 0.0,
            lane_max: 100.0,
            tower_position: 0.0,
            entity_radius: 1.0,
            min_attack_speed: 0.1,
            death_animation_duration: 0.5,
        }
    }
}

/// Projectile culling bounds.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProjectileConfig {
    /// Projectiles below this position are culled.
    pub cull_min: f64,
    /// Projectiles above this position are culled.
    pub cull_max: f64,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            cull_min: -10.0,
            cull_max: 110.0,
        }
    }
}

/// Status effect timing.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct StatusEffectConfig {
    /// Seconds between damage/heal-over-time ticks.
    pub tick_interval: f64,
}

impl Default for StatusEffectConfig {
    fn default() -> Self {
        Self { tick_interval: 1.0 }
    }
}

/// Wave pacing and floor structure.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct WaveTuning {
    /// Seconds between the lane clearing and the wave completing.
    pub clearing_delay: f64,
    /// Seconds between units of the same spawn group.
    pub spawn_stagger: f64,
    /// Every floor divisible by this value is a single-wave boss floor.
    pub boss_floor_frequency: u32,
    /// Number of waves on a regular floor.
    pub waves_per_floor: u32,
}

impl Default for WaveTuning {
    fn default() -> Self {
        Self {
            clearing_delay: 2.0,
            spawn_stagger: 0.5,
            boss_floor_frequency: 10,
            waves_per_floor: 5,
        }
    }
}

/// Automatic card player pacing.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    /// Whether the simulation clock consults the AI.
    pub enabled: bool,
    /// Seconds the AI waits after playing a card.
    pub play_delay: f64,
    /// Seconds a freshly drawn card stays ineligible for play.
    pub card_draw_grace: f64,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            play_delay: 1.5,
            card_draw_grace: 1.0,
        }
    }
}

/// Hand size and draw pacing.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct DeckConfig {
    /// Maximum number of cards held at once.
    pub max_hand_size: usize,
    /// Seconds needed to fill the draw bar.
    pub draw_speed: f64,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            max_hand_size: 5,
            draw_speed: 3.0,
        }
    }
}

/// Starting resources and regeneration.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ResourceConfig {
    /// Mana at the start of a run.
    pub starting_mana: f64,
    /// Mana cap.
    pub max_mana: f64,
    /// Mana regenerated per second.
    pub mana_regen: f64,
    /// Gold at the start of a run.
    pub starting_gold: u32,
    /// Essence at the start of a run.
    pub starting_essence: f64,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            starting_mana: 0.0,
            max_mana: 10.0,
            mana_regen: 1.0,
            starting_gold: 0,
            starting_essence: 0.0,
        }
    }
}

/// Tower durability.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct TowerConfig {
    /// Tower hit points at the start of a run.
    pub max_hp: f64,
}

impl Default for TowerConfig {
    fn default() -> Self {
        Self { max_hp: 100.0 }
    }
}

/// Automatic wave continuation.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct AutoContinueConfig {
    /// Whether completed waves restart on their own.
    pub enabled: bool,
    /// Seconds between completion and the next wave.
    pub delay: f64,
}

impl Default for AutoContinueConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            delay: 3.0,
        }
    }
}

/// Combat log retention.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Entries kept before the oldest is dropped.
    pub max_entries: usize,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { max_entries: 50 }
    }
}

/// Reasons a configuration is rejected.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The TOML document could not be parsed.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
    /// The lane bounds are empty or inverted.
    #[error("lane_min ({min}) must be below lane_max ({max})")]
    InvertedLane {
        /// Configured tower end.
        min: f64,
        /// Configured spawn end.
        max: f64,
    },
    /// A value that divides must be strictly positive.
    #[error("{0} must be positive")]
    NonPositive(&'static str),
    /// A count or modulus must be non-zero.
    #[error("{0} must be non-zero")]
    Zero(&'static str),
}

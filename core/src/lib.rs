#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Spire Siege simulation.
//!
//! This crate defines the vocabulary every other crate speaks: identifiers,
//! entity states, stat blocks, damage events, status effects, the closed card
//! effect taxonomy, authored content tables and the numeric tuning
//! configuration. The authoritative world owns the mutable snapshot, and each
//! system crate mutates it through an exclusive borrow once per fixed tick.

mod config;
mod content;

pub use config::{
    AiConfig, AutoContinueConfig, CombatConfig, ConfigError, DeckConfig, GameConfig, LogConfig,
    ProjectileConfig, ResourceConfig, StatusEffectConfig, TowerConfig, WaveTuning,
};
pub use content::{
    CardDefinition, CardEffect, CardKind, ContentError, ContentTables, EffectKind,
    EntityDefinition, SpawnGroup, StatModifier, WaveConfig, WaveRewards, BASIC_ENEMY,
    BASIC_SUMMON,
};

use serde::{Deserialize, Serialize};

/// Multiplier applied to damage events flagged as critical.
pub const CRITICAL_MULTIPLIER: f64 = 1.5;

/// Unique identifier assigned to an entity living on the lane.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(u32);

impl EntityId {
    /// Identifier reserved for the tower; never handed out by the allocator.
    pub const TOWER: EntityId = EntityId(0);

    /// Creates a new entity identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to a card instance dealt into the deck.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CardInstanceId(u32);

impl CardInstanceId {
    /// Creates a new card instance identifier.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Unique identifier assigned to an applied status effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StatusEffectId(u32);

impl StatusEffectId {
    /// Creates a new status effect identifier.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Broad category of an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityKind {
    /// Hostile unit walking from the spawn end toward the tower.
    Enemy,
    /// Friendly unit created by cards, walking toward the spawn end.
    Summon,
    /// The defended structure at the tower end of the lane.
    Tower,
    /// Short-lived missile that collides with enemies.
    Projectile,
}

/// Finite state of an entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityState {
    /// Moving toward the lane terminus.
    Walking,
    /// Locked onto a target and trading blows.
    Attacking,
    /// Stationary and looking for targets.
    Idle,
    /// Held in place by a stun; neither moves nor attacks.
    Stunned,
    /// Reached zero hit points and is playing its death animation.
    Dying,
    /// Gone; purged from its collection at the end of the tick.
    Dead,
}

impl EntityState {
    /// Reports whether the entity is dead.
    #[must_use]
    pub const fn is_dead(self) -> bool {
        matches!(self, Self::Dead)
    }

    /// Reports whether the entity is dying or dead.
    #[must_use]
    pub const fn is_down(self) -> bool {
        matches!(self, Self::Dying | Self::Dead)
    }
}

/// Numeric stats that card effects can address by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatKind {
    /// Current hit points.
    Hp,
    /// Maximum hit points.
    MaxHp,
    /// Lane units travelled per second.
    Speed,
    /// Reach of melee attacks in lane units.
    Range,
    /// Damage dealt per attack.
    Damage,
    /// Attacks per second.
    AttackSpeed,
    /// Flat physical damage reduction.
    Armor,
    /// Flat magical damage reduction.
    MagicResist,
    /// Outgoing damage amplification fraction.
    DamageAmp,
    /// Incoming damage amplification fraction.
    DamageTakenAmp,
}

/// Mutable stat block carried by every entity.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    /// Current hit points, kept within `[0, max_hp]`.
    pub hp: f64,
    /// Maximum hit points.
    pub max_hp: f64,
    /// Lane units travelled per second.
    pub speed: f64,
    /// Reach of melee attacks in lane units.
    pub range: f64,
    /// Damage dealt per attack.
    pub damage: f64,
    /// Attacks per second.
    pub attack_speed: f64,
    /// Flat physical damage reduction; zero disables mitigation.
    #[serde(default)]
    pub armor: f64,
    /// Flat magical damage reduction; zero disables mitigation.
    #[serde(default)]
    pub magic_resist: f64,
    /// Outgoing damage amplification fraction.
    #[serde(default)]
    pub damage_amp: f64,
    /// Incoming damage amplification fraction.
    #[serde(default)]
    pub damage_taken_amp: f64,
}

impl Stats {
    /// Creates a stat block at full health with no modifiers.
    #[must_use]
    pub const fn new(max_hp: f64, speed: f64, range: f64, damage: f64, attack_speed: f64) -> Self {
        Self {
            hp: max_hp,
            max_hp,
            speed,
            range,
            damage,
            attack_speed,
            armor: 0.0,
            magic_resist: 0.0,
            damage_amp: 0.0,
            damage_taken_amp: 0.0,
        }
    }

    /// Returns the value of the named stat.
    #[must_use]
    pub const fn get(&self, stat: StatKind) -> f64 {
        match stat {
            StatKind::Hp => self.hp,
            StatKind::MaxHp => self.max_hp,
            StatKind::Speed => self.speed,
            StatKind::Range => self.range,
            StatKind::Damage => self.damage,
            StatKind::AttackSpeed => self.attack_speed,
            StatKind::Armor => self.armor,
            StatKind::MagicResist => self.magic_resist,
            StatKind::DamageAmp => self.damage_amp,
            StatKind::DamageTakenAmp => self.damage_taken_amp,
        }
    }

    /// Returns mutable access to the named stat.
    pub fn get_mut(&mut self, stat: StatKind) -> &mut f64 {
        match stat {
            StatKind::Hp => &mut self.hp,
            StatKind::MaxHp => &mut self.max_hp,
            StatKind::Speed => &mut self.speed,
            StatKind::Range => &mut self.range,
            StatKind::Damage => &mut self.damage,
            StatKind::AttackSpeed => &mut self.attack_speed,
            StatKind::Armor => &mut self.armor,
            StatKind::MagicResist => &mut self.magic_resist,
            StatKind::DamageAmp => &mut self.damage_amp,
            StatKind::DamageTakenAmp => &mut self.damage_taken_amp,
        }
    }

    /// Restores the `hp ∈ [0, max_hp]` invariant.
    pub fn clamp_hp(&mut self) {
        self.hp = self.hp.clamp(0.0, self.max_hp.max(0.0));
    }
}

/// Mitigation category of a damage event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DamageType {
    /// Reduced by armor.
    Physical,
    /// Reduced by magic resist.
    #[default]
    Magical,
    /// Ignores all mitigation.
    True,
}

/// Request to deal damage from one entity to another.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DamageEvent {
    /// Entity credited with the damage.
    pub source: EntityId,
    /// Entity receiving the damage.
    pub target: EntityId,
    /// Raw amount before amplification and mitigation.
    pub amount: f64,
    /// Mitigation category.
    pub damage_type: DamageType,
    /// Applies [`CRITICAL_MULTIPLIER`] when set.
    pub is_critical: bool,
}

impl DamageEvent {
    /// Creates a non-critical damage event.
    #[must_use]
    pub const fn new(
        source: EntityId,
        target: EntityId,
        amount: f64,
        damage_type: DamageType,
    ) -> Self {
        Self {
            source,
            target,
            amount,
            damage_type,
            is_critical: false,
        }
    }

    /// Marks the event as a critical hit.
    #[must_use]
    pub const fn critical(mut self) -> Self {
        self.is_critical = true;
        self
    }
}

/// Outgoing modifiers of whatever dealt a damage event.
///
/// Resolving damage needs the source's amplification while the target is
/// mutably borrowed, so callers snapshot the source first.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DamageSource {
    /// Outgoing damage amplification fraction.
    pub damage_amp: f64,
}

impl DamageSource {
    /// Source that contributes no amplification (status ticks, projectiles).
    pub const NEUTRAL: DamageSource = DamageSource { damage_amp: 0.0 };

    /// Captures the outgoing modifiers of the provided stat block.
    #[must_use]
    pub const fn of(stats: &Stats) -> Self {
        Self {
            damage_amp: stats.damage_amp,
        }
    }
}

/// Kinds of status effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusKind {
    /// Reduces speed by `intensity` (strongest slow wins).
    Slow,
    /// Prevents movement and attacking.
    Stun,
    /// Periodic true damage.
    Poison,
    /// Periodic magical damage.
    Burn,
    /// Periodic healing.
    Regen,
}

impl StatusKind {
    /// Reports whether the effect fires on the periodic tick interval.
    #[must_use]
    pub const fn is_periodic(self) -> bool {
        matches!(self, Self::Poison | Self::Burn | Self::Regen)
    }
}

/// Status effect attached to an entity.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatusEffect {
    /// Identifier allocated by the world.
    pub id: StatusEffectId,
    /// Kind of effect.
    pub kind: StatusKind,
    /// Seconds remaining before the effect expires.
    pub duration: f64,
    /// Slow fraction, or damage/heal per periodic tick.
    pub intensity: f64,
    /// Entity credited with applying the effect.
    pub source: Option<EntityId>,
    /// Seconds until the next periodic tick; armed on first update.
    pub tick_timer: Option<f64>,
}

impl StatusEffect {
    /// Creates an effect whose periodic timer is armed lazily.
    #[must_use]
    pub const fn new(
        id: StatusEffectId,
        kind: StatusKind,
        duration: f64,
        intensity: f64,
        source: Option<EntityId>,
    ) -> Self {
        Self {
            id,
            kind,
            duration,
            intensity,
            source,
            tick_timer: None,
        }
    }
}

/// Target selector attached to every card effect.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TargetType {
    /// The front-most enemy, closest to the tower.
    Enemy,
    /// Every enemy on the lane.
    AllEnemies,
    /// The tower.
    Tower,
    /// Every summon on the lane.
    AllSummons,
    /// No entity; the effect acts on world resources.
    #[default]
    #[serde(rename = "SELF")]
    Player,
}

/// Pile a card instance currently lives in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardZone {
    /// Draw pile.
    Draw,
    /// Player hand.
    Hand,
    /// Resolving on the table.
    Play,
    /// Discard pile, reshuffled into the draw pile when it runs dry.
    Discard,
    /// Exhausted; never returns.
    Void,
}

/// Lifecycle phase of the current wave.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WavePhase {
    /// Spawn queue entries are being released.
    Spawning,
    /// Everything spawned; waiting for the lane to clear.
    Active,
    /// Lane cleared; counting down before rewards.
    Clearing,
    /// Rewards granted; waiting for the next start trigger.
    Completed,
}

/// Flight model of a projectile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProjectileMotion {
    /// Travels along the lane at its signed speed.
    Linear,
    /// Chases its target, degrading to linear when the target is lost.
    Homing,
    /// Stationary blast striking everything in its radius.
    Aoe,
}

/// Payload carried by projectile entities.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ProjectileData {
    /// Flight model.
    pub motion: ProjectileMotion,
    /// Damage dealt on hit.
    pub damage: f64,
    /// Mitigation category of the hit.
    pub damage_type: DamageType,
    /// Collision radius added to the entity radius.
    pub hit_radius: f64,
    /// Survives hits when set.
    pub piercing: bool,
    /// Effects cloned onto every struck enemy.
    pub on_hit_effects: Vec<StatusEffect>,
}

/// Category of a combat log entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogKind {
    /// A card left the hand.
    CardPlayed,
    /// A card dealt damage.
    Damage,
    /// The tower was healed.
    Heal,
    /// A status effect was applied by a card.
    Status,
    /// A stat was permanently modified by a card.
    Buff,
    /// A summon entered the lane.
    Summon,
    /// A wave began spawning.
    WaveStart,
    /// A wave finished clearing.
    WaveComplete,
    /// The final wave of a floor finished.
    FloorComplete,
    /// An entity finished dying.
    Death,
    /// The tower fell.
    GameOver,
}

/// Single entry of the bounded combat log.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CombatLogEntry {
    /// Monotonic sequence number.
    pub id: u64,
    /// Simulation time at which the entry was written.
    pub time: f64,
    /// Category of the entry.
    pub kind: LogKind,
    /// Human readable description.
    pub message: String,
}

/// Category of a transient visual effect.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VisualKind {
    /// Floating damage number.
    Damage,
    /// Floating heal number.
    Heal,
    /// Stat increase label.
    Buff,
    /// Status effect label.
    Debuff,
}

/// Transient effect handed to presentation layers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VisualEffect {
    /// Category of the effect.
    pub kind: VisualKind,
    /// Lane position the effect is anchored at.
    pub position: f64,
    /// Numeric payload, when the effect displays a number.
    pub value: Option<u32>,
    /// Text payload, when the effect displays a label.
    pub text: Option<String>,
    /// Simulation time the effect was emitted at.
    pub timestamp: f64,
}

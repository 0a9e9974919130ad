//! Authored content: card, enemy, summon and wave definitions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{DamageType, StatKind, Stats, StatusKind, TargetType};

/// Enemy definition used when a requested id is unknown.
pub const BASIC_ENEMY: &str = "BASIC_ENEMY";
/// Summon definition used when a requested id is unknown.
pub const BASIC_SUMMON: &str = "BASIC_SUMMON";

const FALLBACK_ENEMY_STATS: Stats = Stats::new(10.0, 5.0, 10.0, 2.0, 1.0);
const FALLBACK_SUMMON_STATS: Stats = Stats::new(10.0, 0.0, 10.0, 2.0, 1.0);

/// Presentation category of a card.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardKind {
    /// One-shot effect.
    #[default]
    Spell,
    /// Creates a unit.
    Summon,
    /// Modifies existing units.
    Enchant,
}

/// Stat change carried by buff effects.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct StatModifier {
    /// Stat being modified.
    pub stat: StatKind,
    /// Amount added to the stat.
    pub value: f64,
    /// Authored duration. Buffs are applied permanently and this is not consulted.
    #[serde(default)]
    pub duration: f64,
}

/// Closed set of card effect behaviours.
///
/// Numeric fields omitted by authored content deserialize to zero.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EffectKind {
    /// Deals damage to every resolved target.
    Damage {
        /// Raw damage per target.
        #[serde(default)]
        amount: f64,
        /// Mitigation category.
        #[serde(default)]
        damage_type: DamageType,
    },
    /// Restores tower hit points.
    Heal {
        /// Hit points restored.
        #[serde(default)]
        amount: f64,
    },
    /// Applies a status effect to every resolved target.
    Status {
        /// Kind of effect; nothing happens when absent.
        #[serde(default)]
        status: Option<StatusKind>,
        /// Seconds the effect lasts.
        #[serde(default)]
        duration: f64,
        /// Effect strength.
        #[serde(default)]
        intensity: f64,
    },
    /// Adds to a stat of every resolved target.
    Buff {
        /// Modifier to apply; nothing happens when absent.
        #[serde(default)]
        modifier: Option<StatModifier>,
    },
    /// Creates a summon at the tower.
    Summon {
        /// Summon definition id; nothing happens when absent.
        #[serde(default)]
        summon_def: Option<String>,
    },
    /// Restores mana up to the cap.
    Resource {
        /// Mana gained.
        #[serde(default)]
        mana_gain: f64,
    },
    /// Draws cards, respecting the hand size cap.
    Draw {
        /// Number of draws attempted.
        #[serde(default)]
        count: u32,
    },
    /// Adds essence without a cap.
    Essence {
        /// Essence gained.
        #[serde(default)]
        amount: f64,
    },
}

/// One entry of a card's effect list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardEffect {
    /// Who the effect lands on.
    #[serde(default)]
    pub target: TargetType,
    /// What the effect does.
    #[serde(flatten)]
    pub kind: EffectKind,
}

impl CardEffect {
    /// Creates a card effect aimed at the provided target.
    #[must_use]
    pub const fn new(target: TargetType, kind: EffectKind) -> Self {
        Self { target, kind }
    }
}

/// Static definition of a card.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CardDefinition {
    /// Definition id; filled from the table key when loaded from TOML.
    #[serde(default)]
    pub id: String,
    /// Display name.
    pub name: String,
    /// Mana cost.
    pub cost: f64,
    /// Presentation category.
    #[serde(default)]
    pub kind: CardKind,
    /// Effects executed in order when the card is played.
    #[serde(default)]
    pub effects: Vec<CardEffect>,
    /// Sends the card to the void pile instead of the discard pile.
    #[serde(default)]
    pub exhaust: bool,
}

/// Static definition of an enemy or summon.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntityDefinition {
    /// Definition id; filled from the table key when loaded from TOML.
    #[serde(default)]
    pub id: String,
    /// Display name.
    pub name: String,
    /// Stats copied onto every created entity.
    pub stats: Stats,
}

/// Group of identical enemies released by a wave script.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnGroup {
    /// Enemy definition id.
    pub enemy_def: String,
    /// Lane position the group appears at.
    pub position: f64,
    /// Seconds after the wave starts.
    #[serde(default)]
    pub delay: f64,
    /// Number of enemies; treated as one when absent.
    #[serde(default)]
    pub count: Option<u32>,
}

impl SpawnGroup {
    /// Number of queue entries the group expands into.
    #[must_use]
    pub fn resolved_count(&self) -> u32 {
        self.count.unwrap_or(1)
    }
}

/// Rewards granted when a wave completes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WaveRewards {
    /// Gold granted.
    #[serde(default)]
    pub gold: u32,
    /// Essence granted.
    #[serde(default)]
    pub essence: f64,
}

/// Script describing a single wave.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WaveConfig {
    /// Unique identifier of the script.
    pub wave_id: String,
    /// Floor the script was authored for.
    pub floor: u32,
    /// Wave number within the floor.
    pub wave_number: u32,
    /// Spawn groups released by the wave.
    #[serde(default)]
    pub spawns: Vec<SpawnGroup>,
    /// Scaling multiplier reserved for difficulty curves.
    #[serde(default = "default_difficulty")]
    pub difficulty: f64,
    /// Rewards for completing the wave.
    #[serde(default)]
    pub rewards: WaveRewards,
}

fn default_difficulty() -> f64 {
    1.0
}

/// Reasons content lookups or loading fail.
#[derive(Debug, Error)]
pub enum ContentError {
    /// The TOML document could not be parsed.
    #[error("failed to parse content: {0}")]
    Parse(#[from] toml::de::Error),
    /// No wave script exists even after the looping fallback.
    #[error("no wave script available for floor {floor}, wave {wave}")]
    MissingWave {
        /// Requested floor.
        floor: u32,
        /// Requested wave.
        wave: u32,
    },
    /// The starter deck names a card that is not defined.
    #[error("starter deck references unknown card `{0}`")]
    UnknownCard(String),
}

/// Immutable content injected into the world at construction.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ContentTables {
    #[serde(default)]
    cards: BTreeMap<String, CardDefinition>,
    #[serde(default)]
    enemies: BTreeMap<String, EntityDefinition>,
    #[serde(default)]
    summons: BTreeMap<String, EntityDefinition>,
    #[serde(default)]
    waves: Vec<WaveConfig>,
    #[serde(default)]
    starter_deck: Vec<String>,
}

impl ContentTables {
    /// Creates empty tables.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses content from TOML, keying definitions by their table names.
    pub fn from_toml_str(contents: &str) -> Result<Self, ContentError> {
        let mut tables: Self = toml::from_str(contents)?;
        for (id, card) in &mut tables.cards {
            card.id.clone_from(id);
        }
        for (id, definition) in tables.enemies.iter_mut().chain(tables.summons.iter_mut()) {
            definition.id.clone_from(id);
        }
        if let Some(missing) = tables
            .starter_deck
            .iter()
            .find(|id| !tables.cards.contains_key(id.as_str()))
        {
            return Err(ContentError::UnknownCard(missing.clone()));
        }
        Ok(tables)
    }

    /// Adds or replaces a card definition.
    #[must_use]
    pub fn with_card(mut self, card: CardDefinition) -> Self {
        let _ = self.cards.insert(card.id.clone(), card);
        self
    }

    /// Adds or replaces an enemy definition.
    #[must_use]
    pub fn with_enemy(mut self, definition: EntityDefinition) -> Self {
        let _ = self.enemies.insert(definition.id.clone(), definition);
        self
    }

    /// Adds or replaces a summon definition.
    #[must_use]
    pub fn with_summon(mut self, definition: EntityDefinition) -> Self {
        let _ = self.summons.insert(definition.id.clone(), definition);
        self
    }

    /// Replaces the wave scripts.
    #[must_use]
    pub fn with_waves(mut self, waves: Vec<WaveConfig>) -> Self {
        self.waves = waves;
        self
    }

    /// Replaces the starter deck.
    #[must_use]
    pub fn with_starter_deck(mut self, deck: Vec<String>) -> Self {
        self.starter_deck = deck;
        self
    }

    /// Looks up a card definition.
    #[must_use]
    pub fn card(&self, id: &str) -> Option<&CardDefinition> {
        self.cards.get(id)
    }

    /// Looks up an enemy definition.
    #[must_use]
    pub fn enemy(&self, id: &str) -> Option<&EntityDefinition> {
        self.enemies.get(id)
    }

    /// Looks up a summon definition.
    #[must_use]
    pub fn summon(&self, id: &str) -> Option<&EntityDefinition> {
        self.summons.get(id)
    }

    /// Stats for an enemy, falling back to [`BASIC_ENEMY`] for unknown ids.
    #[must_use]
    pub fn enemy_stats(&self, id: &str) -> Stats {
        self.enemy(id)
            .or_else(|| self.enemy(BASIC_ENEMY))
            .map_or(FALLBACK_ENEMY_STATS, |definition| definition.stats)
    }

    /// Stats for a summon, falling back to [`BASIC_SUMMON`] for unknown ids.
    #[must_use]
    pub fn summon_stats(&self, id: &str) -> Stats {
        self.summon(id)
            .or_else(|| self.summon(BASIC_SUMMON))
            .map_or(FALLBACK_SUMMON_STATS, |definition| definition.stats)
    }

    /// Card ids dealt into the draw pile at the start of a run.
    #[must_use]
    pub fn starter_deck(&self) -> &[String] {
        &self.starter_deck
    }

    /// Authored wave scripts.
    #[must_use]
    pub fn waves(&self) -> &[WaveConfig] {
        &self.waves
    }

    /// Resolves the script for a floor and wave.
    ///
    /// Authored content only covers a handful of waves, so scripts loop by
    /// wave number and the floor is ignored.
    pub fn wave_config(&self, floor: u32, wave: u32) -> Result<&WaveConfig, ContentError> {
        if self.waves.is_empty() {
            return Err(ContentError::MissingWave { floor, wave });
        }
        let index = wave.saturating_sub(1) as usize % self.waves.len();
        self.waves
            .get(index)
            .ok_or(ContentError::MissingWave { floor, wave })
    }

    /// Content shipped with the game.
    #[must_use]
    pub fn builtin() -> Self {
        let tables = Self::new()
            .with_enemy(entity(BASIC_ENEMY, "Basic Enemy", FALLBACK_ENEMY_STATS))
            .with_enemy(entity(
                "SKELETON_GRUNT",
                "Skeleton Grunt",
                Stats::new(20.0, 8.0, 5.0, 3.0, 0.8),
            ))
            .with_enemy(entity(
                "BONE_SHIELD",
                "Bone Shield",
                Stats {
                    armor: 2.0,
                    ..Stats::new(50.0, 3.0, 5.0, 2.0, 0.5)
                },
            ))
            .with_summon(entity(BASIC_SUMMON, "Basic Summon", FALLBACK_SUMMON_STATS))
            .with_summon(entity(
                "skeleton",
                "Skeleton",
                Stats::new(15.0, 4.0, 5.0, 3.0, 1.0),
            ));

        builtin_cards()
            .into_iter()
            .fold(tables, Self::with_card)
            .with_waves(builtin_waves())
            .with_starter_deck(
                [
                    "spell_fireball",
                    "spell_fireball",
                    "spell_fireball",
                    "spell_zap",
                    "spell_zap",
                    "spell_zap",
                    "spell_meteor",
                    "spell_frostbolt",
                    "spell_minor_heal",
                    "summon_skeleton",
                    "spell_mana_potion",
                    "enchant_rage",
                ]
                .iter()
                .map(|id| (*id).to_owned())
                .collect(),
            )
    }
}

fn entity(id: &str, name: &str, stats: Stats) -> EntityDefinition {
    EntityDefinition {
        id: id.to_owned(),
        name: name.to_owned(),
        stats,
    }
}

fn card(
    id: &str,
    name: &str,
    cost: f64,
    kind: CardKind,
    effects: Vec<CardEffect>,
) -> CardDefinition {
    CardDefinition {
        id: id.to_owned(),
        name: name.to_owned(),
        cost,
        kind,
        effects,
        exhaust: false,
    }
}

fn damage(target: TargetType, amount: f64) -> CardEffect {
    CardEffect::new(
        target,
        EffectKind::Damage {
            amount,
            damage_type: DamageType::Magical,
        },
    )
}

fn builtin_cards() -> Vec<CardDefinition> {
    vec![
        card(
            "spell_fireball",
            "Fireball",
            3.0,
            CardKind::Spell,
            vec![damage(TargetType::Enemy, 10.0)],
        ),
        card(
            "spell_zap",
            "Zap",
            1.0,
            CardKind::Spell,
            vec![
                damage(TargetType::Enemy, 3.0),
                CardEffect::new(TargetType::Player, EffectKind::Draw { count: 1 }),
            ],
        ),
        card(
            "spell_meteor",
            "Meteor",
            5.0,
            CardKind::Spell,
            vec![damage(TargetType::AllEnemies, 20.0)],
        ),
        card(
            "spell_minor_heal",
            "Minor Heal",
            2.0,
            CardKind::Spell,
            vec![CardEffect::new(
                TargetType::Tower,
                EffectKind::Heal { amount: 5.0 },
            )],
        ),
        card(
            "spell_frostbolt",
            "Frostbolt",
            2.0,
            CardKind::Spell,
            vec![
                damage(TargetType::Enemy, 5.0),
                CardEffect::new(
                    TargetType::Enemy,
                    EffectKind::Status {
                        status: Some(StatusKind::Slow),
                        duration: 3.0,
                        intensity: 0.5,
                    },
                ),
            ],
        ),
        card(
            "spell_meditate",
            "Meditate",
            1.0,
            CardKind::Spell,
            vec![CardEffect::new(
                TargetType::Player,
                EffectKind::Essence { amount: 2.0 },
            )],
        ),
        card(
            "summon_skeleton",
            "Skeleton",
            3.0,
            CardKind::Summon,
            vec![CardEffect::new(
                TargetType::Player,
                EffectKind::Summon {
                    summon_def: Some("skeleton".to_owned()),
                },
            )],
        ),
        CardDefinition {
            exhaust: true,
            ..card(
                "spell_mana_potion",
                "Mana Potion",
                0.0,
                CardKind::Spell,
                vec![CardEffect::new(
                    TargetType::Player,
                    EffectKind::Resource { mana_gain: 2.0 },
                )],
            )
        },
        card(
            "enchant_rage",
            "Rage",
            2.0,
            CardKind::Enchant,
            vec![CardEffect::new(
                TargetType::AllSummons,
                EffectKind::Buff {
                    modifier: Some(StatModifier {
                        stat: StatKind::Damage,
                        value: 2.0,
                        duration: 5.0,
                    }),
                },
            )],
        ),
        card(
            "spell_study",
            "Study",
            1.0,
            CardKind::Spell,
            vec![CardEffect::new(
                TargetType::Player,
                EffectKind::Draw { count: 2 },
            )],
        ),
    ]
}

fn group(enemy_def: &str, position: f64, delay: f64, count: Option<u32>) -> SpawnGroup {
    SpawnGroup {
        enemy_def: enemy_def.to_owned(),
        position,
        delay,
        count,
    }
}

fn wave(number: u32, spawns: Vec<SpawnGroup>, difficulty: f64, gold: u32) -> WaveConfig {
    WaveConfig {
        wave_id: format!("floor1_wave{number}"),
        floor: 1,
        wave_number: number,
        spawns,
        difficulty,
        rewards: WaveRewards { gold, essence: 0.0 },
    }
}

fn builtin_waves() -> Vec<WaveConfig> {
    vec![
        wave(
            1,
            vec![group("SKELETON_GRUNT", 100.0, 0.0, Some(3))],
            1.0,
            10,
        ),
        wave(
            2,
            vec![
                group("SKELETON_GRUNT", 100.0, 0.0, Some(2)),
                group("SKELETON_GRUNT", 95.0, 2.0, Some(2)),
            ],
            1.0,
            15,
        ),
        wave(
            3,
            vec![
                group("BONE_SHIELD", 100.0, 0.0, None),
                group("SKELETON_GRUNT", 90.0, 3.0, Some(2)),
            ],
            1.1,
            20,
        ),
        wave(
            4,
            vec![
                group("SKELETON_GRUNT", 100.0, 0.0, Some(3)),
                group("BONE_SHIELD", 95.0, 4.0, None),
                group("SKELETON_GRUNT", 90.0, 6.0, Some(2)),
            ],
            1.1,
            25,
        ),
        wave(
            5,
            vec![
                group("BONE_SHIELD", 100.0, 0.0, None),
                group("SKELETON_GRUNT", 90.0, 2.0, Some(2)),
                group("SKELETON_GRUNT", 95.0, 4.0, Some(2)),
            ],
            1.2,
            50,
        ),
    ]
}

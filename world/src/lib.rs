#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for Spire Siege.
//!
//! The [`World`] is the single root aggregate every system mutates during a
//! tick. Systems receive it by exclusive reference and never keep borrows
//! across ticks; presentation layers read it between ticks through [`query`].

mod cards;
mod entity;
mod log;
mod wave;

use std::sync::Arc;

use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;
use spire_siege_core::{
    CardInstanceId, CardZone, ContentTables, EntityId, EntityKind, EntityState, GameConfig,
    LogKind, Stats, StatusEffect, StatusEffectId, StatusKind, VisualEffect, VisualKind,
};

pub use cards::CardInstance;
pub use entity::{nearest, Entity, ProjectileLaunch};
pub use log::CombatLog;
pub use wave::{SpawnQueueEntry, WaveState};

/// Root aggregate holding every piece of mutable simulation state.
#[derive(Clone, Debug)]
pub struct World {
    config: GameConfig,
    content: Arc<ContentTables>,
    next_id: u32,
    /// Gold earned from wave rewards.
    pub gold: u32,
    /// Mana available for card plays.
    pub mana: f64,
    /// Mana cap.
    pub max_mana: f64,
    /// Mana regenerated per second.
    pub mana_regen: f64,
    /// Essence accumulated from cards and rewards.
    pub essence: f64,
    /// The tower defended by the player.
    pub tower: Entity,
    /// Enemies on the lane in spawn order.
    pub enemies: Vec<Entity>,
    /// Summons on the lane in creation order.
    pub summons: Vec<Entity>,
    /// Projectiles in flight in launch order.
    pub projectiles: Vec<Entity>,
    /// Cards in hand.
    pub hand: Vec<CardInstance>,
    /// Draw pile; the last element is the top card.
    pub draw_pile: Vec<CardInstance>,
    /// Discard pile.
    pub discard_pile: Vec<CardInstance>,
    /// Exhausted cards.
    pub void_pile: Vec<CardInstance>,
    /// Progress toward the next draw in `[0, 1]`.
    pub draw_timer: f64,
    /// Seconds needed to fill the draw timer.
    pub draw_speed: f64,
    /// Maximum number of cards held at once.
    pub max_hand_size: usize,
    /// Wave progression.
    pub wave: WaveState,
    /// Whether completed waves restart on their own.
    pub auto_continue: bool,
    /// Seconds between completion and the next automatic wave.
    pub auto_continue_delay: f64,
    /// Countdown to the next automatic wave.
    pub auto_continue_timer: f64,
    /// Seconds before the AI may play again.
    pub ai_play_cooldown: f64,
    /// Bounded ring of recent events.
    pub combat_log: CombatLog,
    /// Transient effects awaiting presentation.
    pub visual_effects: Vec<VisualEffect>,
    /// Whether ticks advance the simulation.
    pub is_running: bool,
    /// Number of ticks advanced so far.
    pub tick_count: u64,
    /// Simulation time in seconds.
    pub time: f64,
    /// Seeded generator for shuffles and AI choices.
    pub rng: ChaCha8Rng,
}

impl World {
    /// Builds the initial snapshot of a run.
    ///
    /// The configuration is taken as given; callers building one in code
    /// should run [`GameConfig::validate`] first.
    #[must_use]
    pub fn new(config: GameConfig, content: Arc<ContentTables>) -> Self {
        let tower = Entity::new(
            EntityId::TOWER,
            EntityKind::Tower,
            "tower",
            config.combat.tower_position,
            Stats::new(config.tower.max_hp, 0.0, 0.0, 0.0, 0.0),
            EntityState::Idle,
        );

        let mut world = Self {
            next_id: 1,
            gold: config.resources.starting_gold,
            mana: config.resources.starting_mana,
            max_mana: config.resources.max_mana,
            mana_regen: config.resources.mana_regen,
            essence: config.resources.starting_essence,
            tower,
            enemies: Vec::new(),
            summons: Vec::new(),
            projectiles: Vec::new(),
            hand: Vec::new(),
            draw_pile: Vec::new(),
            discard_pile: Vec::new(),
            void_pile: Vec::new(),
            draw_timer: 0.0,
            draw_speed: config.deck.draw_speed,
            max_hand_size: config.deck.max_hand_size,
            wave: WaveState::new(config.waves.waves_per_floor),
            auto_continue: config.auto_continue.enabled,
            auto_continue_delay: config.auto_continue.delay,
            auto_continue_timer: 0.0,
            ai_play_cooldown: 0.0,
            combat_log: CombatLog::with_capacity(config.log.max_entries),
            visual_effects: Vec::new(),
            is_running: false,
            tick_count: 0,
            time: 0.0,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
            config,
            content,
        };
        world.deal_starter_deck();
        world
    }

    fn deal_starter_deck(&mut self) {
        let content = Arc::clone(&self.content);
        for def_id in content.starter_deck() {
            let Some(definition) = content.card(def_id) else {
                tracing::warn!(card = %def_id, "starter deck names an unknown card; skipping");
                continue;
            };
            let id = CardInstanceId::new(self.allocate_id());
            self.draw_pile.push(CardInstance {
                id,
                def_id: definition.id.clone(),
                zone: CardZone::Draw,
                current_cost: definition.cost,
                name: definition.name.clone(),
                drawn_at: None,
            });
        }
        self.draw_pile.shuffle(&mut self.rng);
    }

    /// Tuning the world was built with.
    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Content tables shared with the systems.
    #[must_use]
    pub fn content(&self) -> &ContentTables {
        &self.content
    }

    /// Shared handle to the content tables.
    #[must_use]
    pub fn content_handle(&self) -> Arc<ContentTables> {
        Arc::clone(&self.content)
    }

    /// Starts or pauses the simulation.
    pub fn set_running(&mut self, running: bool) {
        self.is_running = running;
    }

    /// Flips the running flag and returns the new value.
    pub fn toggle_running(&mut self) -> bool {
        self.is_running = !self.is_running;
        self.is_running
    }

    fn allocate_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Builds a status effect with a freshly allocated identifier.
    pub fn create_status_effect(
        &mut self,
        kind: StatusKind,
        duration: f64,
        intensity: f64,
        source: Option<EntityId>,
    ) -> StatusEffect {
        let id = StatusEffectId::new(self.allocate_id());
        StatusEffect::new(id, kind, duration, intensity, source)
    }

    /// Allocates a fresh identifier for a status effect copied from a template.
    pub fn next_status_effect_id(&mut self) -> StatusEffectId {
        StatusEffectId::new(self.allocate_id())
    }

    /// Creates an enemy from its definition and appends it to the lane.
    ///
    /// Unknown definitions fall back to the basic enemy.
    pub fn spawn_enemy(&mut self, def_id: &str, position: f64) -> EntityId {
        if self.content.enemy(def_id).is_none() {
            tracing::warn!(enemy = %def_id, "unknown enemy definition; using basic enemy stats");
        }
        let stats = self.content.enemy_stats(def_id);
        let id = EntityId::new(self.allocate_id());
        self.enemies.push(Entity::new(
            id,
            EntityKind::Enemy,
            def_id,
            position,
            stats,
            EntityState::Walking,
        ));
        id
    }

    /// Creates a summon from its definition and appends it to the lane.
    ///
    /// Unknown definitions fall back to the basic summon.
    pub fn spawn_summon(&mut self, def_id: &str, position: f64) -> EntityId {
        if self.content.summon(def_id).is_none() {
            tracing::warn!(summon = %def_id, "unknown summon definition; using basic summon stats");
        }
        let stats = self.content.summon_stats(def_id);
        let id = EntityId::new(self.allocate_id());
        self.summons.push(Entity::new(
            id,
            EntityKind::Summon,
            def_id,
            position,
            stats,
            EntityState::Idle,
        ));
        id
    }

    /// Launches a projectile.
    pub fn spawn_projectile(&mut self, launch: ProjectileLaunch) -> EntityId {
        let id = EntityId::new(self.allocate_id());
        let stats = Stats::new(1.0, launch.speed, 0.0, launch.data.damage, 0.0);
        let mut projectile = Entity::new(
            id,
            EntityKind::Projectile,
            "projectile",
            launch.position,
            stats,
            EntityState::Walking,
        );
        projectile.target = launch.target;
        projectile.projectile = Some(launch.data);
        self.projectiles.push(projectile);
        id
    }

    /// Appends an entry to the combat log stamped with the current time.
    pub fn record(&mut self, kind: LogKind, message: impl Into<String>) {
        self.combat_log.push(self.time, kind, message.into());
    }

    /// Appends a visual effect stamped with the current time.
    pub fn emit_visual(
        &mut self,
        kind: VisualKind,
        position: f64,
        value: Option<u32>,
        text: Option<String>,
    ) {
        self.visual_effects.push(VisualEffect {
            kind,
            position,
            value,
            text,
            timestamp: self.time,
        });
    }

    /// Drops visual effects older than `max_age` seconds.
    pub fn prune_visual_effects(&mut self, max_age: f64) {
        let now = self.time;
        self.visual_effects
            .retain(|effect| now - effect.timestamp <= max_age);
    }

    /// Position of an enemy in the enemy collection.
    #[must_use]
    pub fn enemy_index(&self, id: EntityId) -> Option<usize> {
        self.enemies.iter().position(|enemy| enemy.id == id)
    }

    /// Position of a summon in the summon collection.
    #[must_use]
    pub fn summon_index(&self, id: EntityId) -> Option<usize> {
        self.summons.iter().position(|summon| summon.id == id)
    }

    /// Mutable access to the tower, an enemy or a summon by identifier.
    pub fn combatant_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        if id == EntityId::TOWER {
            return Some(&mut self.tower);
        }
        if let Some(index) = self.enemy_index(id) {
            return Some(&mut self.enemies[index]);
        }
        self.summon_index(id).map(|index| &mut self.summons[index])
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use serde::Serialize;
    use spire_siege_core::{CombatLogEntry, EntityId, WavePhase};

    use super::{Entity, World};

    /// The tower defended by the player.
    #[must_use]
    pub fn tower(world: &World) -> &Entity {
        &world.tower
    }

    /// Looks up any entity, projectiles included, by identifier.
    #[must_use]
    pub fn entity(world: &World, id: EntityId) -> Option<&Entity> {
        if id == EntityId::TOWER {
            return Some(&world.tower);
        }
        world
            .enemies
            .iter()
            .chain(world.summons.iter())
            .chain(world.projectiles.iter())
            .find(|entity| entity.id == id)
    }

    /// Enemies that are neither dying nor dead.
    pub fn live_enemies(world: &World) -> impl Iterator<Item = &Entity> {
        world
            .enemies
            .iter()
            .filter(|enemy| !enemy.state.is_down())
    }

    /// Enemy closest to the tower, dying ones included.
    #[must_use]
    pub fn front_enemy(world: &World) -> Option<&Entity> {
        world
            .enemies
            .iter()
            .fold(None, |front: Option<&Entity>, enemy| match front {
                Some(current) if current.position <= enemy.position => Some(current),
                _ => Some(enemy),
            })
    }

    /// Up to `count` most recent log entries, oldest first.
    #[must_use]
    pub fn recent_log(world: &World, count: usize) -> Vec<&CombatLogEntry> {
        let skip = world.combat_log.len().saturating_sub(count);
        world.combat_log.iter().skip(skip).collect()
    }

    /// Captures the headline numbers of a run.
    #[must_use]
    pub fn summary(world: &World, log_entries: usize) -> RunSummary {
        RunSummary {
            floor: world.wave.floor,
            wave: world.wave.current,
            total_waves: world.wave.total,
            phase: world.wave.phase,
            tower_hp: world.tower.stats.hp,
            tower_max_hp: world.tower.stats.max_hp,
            gold: world.gold,
            essence: world.essence,
            mana: world.mana,
            tick_count: world.tick_count,
            time: world.time,
            is_running: world.is_running,
            enemies: world.enemies.len(),
            summons: world.summons.len(),
            hand: world.hand.len(),
            draw_pile: world.draw_pile.len(),
            discard_pile: world.discard_pile.len(),
            void_pile: world.void_pile.len(),
            recent_log: recent_log(world, log_entries).into_iter().cloned().collect(),
        }
    }

    /// Serializable snapshot of the headline numbers of a run.
    #[derive(Clone, Debug, PartialEq, Serialize)]
    pub struct RunSummary {
        /// Current floor.
        pub floor: u32,
        /// Current wave within the floor.
        pub wave: u32,
        /// Waves on the current floor.
        pub total_waves: u32,
        /// Current wave phase.
        pub phase: WavePhase,
        /// Tower hit points.
        pub tower_hp: f64,
        /// Tower maximum hit points.
        pub tower_max_hp: f64,
        /// Gold earned.
        pub gold: u32,
        /// Essence accumulated.
        pub essence: f64,
        /// Mana available.
        pub mana: f64,
        /// Ticks advanced.
        pub tick_count: u64,
        /// Simulation time in seconds.
        pub time: f64,
        /// Whether the run is still advancing.
        pub is_running: bool,
        /// Enemies on the lane.
        pub enemies: usize,
        /// Summons on the lane.
        pub summons: usize,
        /// Cards in hand.
        pub hand: usize,
        /// Cards in the draw pile.
        pub draw_pile: usize,
        /// Cards in the discard pile.
        pub discard_pile: usize,
        /// Exhausted cards.
        pub void_pile: usize,
        /// Most recent log entries, oldest first.
        pub recent_log: Vec<CombatLogEntry>,
    }
}

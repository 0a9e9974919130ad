#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Wave and floor progression.
//!
//! A wave moves through `Spawning`, `Active`, `Clearing` and `Completed`.
//! Completed waves wait for [`start_wave`] to be called again, either by the
//! player or by [`update_auto_continue`].

use spire_siege_core::{ContentError, EntityState, LogKind, WavePhase};
use spire_siege_world::{SpawnQueueEntry, World};

/// Advances the wave state machine by one tick.
///
/// Fails only when the content tables have no wave script at all.
pub fn update(world: &mut World, dt: f64) -> Result<(), ContentError> {
    match world.wave.phase {
        WavePhase::Spawning => release_spawns(world),
        WavePhase::Active => {
            if world.enemies.is_empty() {
                world.wave.phase = WavePhase::Clearing;
                world.wave.phase_timer = world.config().waves.clearing_delay;
                tracing::debug!(wave = world.wave.current, "lane cleared");
            }
        }
        WavePhase::Clearing => {
            world.wave.phase_timer -= dt;
            if world.wave.phase_timer <= 0.0 {
                complete_wave(world)?;
                world.wave.phase = WavePhase::Completed;
            }
        }
        WavePhase::Completed => {}
    }
    Ok(())
}

fn release_spawns(world: &mut World) {
    for index in 0..world.wave.spawn_queue.len() {
        let entry = &world.wave.spawn_queue[index];
        if entry.spawned || entry.spawn_time > world.time {
            continue;
        }
        let def_id = entry.enemy_def.clone();
        let position = entry.position;
        let _ = world.spawn_enemy(&def_id, position);
        world.wave.spawn_queue[index].spawned = true;
    }

    if world.wave.all_spawned() {
        world.wave.phase = WavePhase::Active;
        tracing::debug!(wave = world.wave.current, "wave fully spawned");
    }
}

fn complete_wave(world: &mut World) -> Result<(), ContentError> {
    let content = world.content_handle();
    let config = content.wave_config(world.wave.floor, world.wave.current)?;
    world.gold += config.rewards.gold;
    world.essence += config.rewards.essence;

    let (floor, wave) = (world.wave.floor, world.wave.current);
    tracing::info!(floor, wave, gold = config.rewards.gold, "wave complete");
    world.record(
        LogKind::WaveComplete,
        format!("Wave {wave} complete (+{} gold)", config.rewards.gold),
    );

    if world.wave.current < world.wave.total {
        world.wave.current += 1;
        return Ok(());
    }

    tracing::info!(floor, "floor complete");
    world.record(LogKind::FloorComplete, format!("Floor {floor} complete"));
    start_next_floor(world)
}

/// Builds the spawn queue for a wave and starts spawning it.
pub fn start_wave(world: &mut World, floor: u32, wave: u32) -> Result<(), ContentError> {
    let content = world.content_handle();
    let config = content.wave_config(floor, wave)?;
    let stagger = world.config().waves.spawn_stagger;
    let now = world.time;

    world.wave.spawn_queue = config
        .spawns
        .iter()
        .flat_map(|group| {
            (0..group.resolved_count()).map(move |index| SpawnQueueEntry {
                enemy_def: group.enemy_def.clone(),
                position: group.position,
                spawn_time: now + group.delay + f64::from(index) * stagger,
                spawned: false,
            })
        })
        .collect();
    world.wave.phase = WavePhase::Spawning;
    world.wave.phase_timer = 0.0;

    tracing::debug!(
        floor,
        wave,
        enemies = world.wave.spawn_queue.len(),
        "wave started"
    );
    world.record(LogKind::WaveStart, format!("Floor {floor}, wave {wave} begins"));
    Ok(())
}

/// Moves to the next floor with a fresh lane and starts its first wave.
///
/// Tower hit points, gold and the deck carry over.
pub fn start_next_floor(world: &mut World) -> Result<(), ContentError> {
    let tuning = &world.config().waves;
    let floor = world.wave.floor + 1;
    let total = if floor.checked_rem(tuning.boss_floor_frequency) == Some(0) {
        1
    } else {
        tuning.waves_per_floor
    };

    world.wave.floor = floor;
    world.wave.current = 1;
    world.wave.total = total;
    world.summons.clear();
    world.projectiles.clear();
    world.enemies.clear();

    start_wave(world, floor, 1)
}

/// Restarts the current wave once the auto-continue countdown elapses.
pub fn update_auto_continue(world: &mut World, dt: f64) -> Result<(), ContentError> {
    if !world.auto_continue || world.wave.phase != WavePhase::Completed {
        return Ok(());
    }

    world.auto_continue_timer -= dt;
    if world.auto_continue_timer <= 0.0 {
        let (floor, wave) = (world.wave.floor, world.wave.current);
        start_wave(world, floor, wave)?;
        world.auto_continue_timer = world.auto_continue_delay;
    }
    Ok(())
}

/// Reports whether the tower has fallen, stopping the run when it has.
///
/// Safe to call every tick; the loss is only announced once.
pub fn check_loss_condition(world: &mut World) -> bool {
    if world.tower.stats.hp > 0.0 {
        return false;
    }

    let newly_lost = world.tower.state != EntityState::Dead;
    world.tower.state = EntityState::Dead;
    world.is_running = false;
    if newly_lost {
        tracing::info!(
            floor = world.wave.floor,
            wave = world.wave.current,
            "tower destroyed"
        );
        world.record(LogKind::GameOver, "The tower has fallen");
    }
    true
}

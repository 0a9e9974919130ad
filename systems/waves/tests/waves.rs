use std::sync::Arc;

use spire_siege_core::{
    ContentError, ContentTables, EntityState, GameConfig, LogKind, SpawnGroup, WaveConfig,
    WavePhase, WaveRewards,
};
use spire_siege_system_waves::{
    check_loss_condition, start_next_floor, start_wave, update, update_auto_continue,
};
use spire_siege_world::World;

fn scripted_wave(number: u32, spawns: Vec<SpawnGroup>) -> WaveConfig {
    WaveConfig {
        wave_id: format!("test_wave{number}"),
        floor: 1,
        wave_number: number,
        spawns,
        difficulty: 1.0,
        rewards: WaveRewards {
            gold: 10 * number,
            essence: 1.0,
        },
    }
}

fn group(enemy_def: &str, delay: f64, count: Option<u32>) -> SpawnGroup {
    SpawnGroup {
        enemy_def: enemy_def.to_owned(),
        position: 100.0,
        delay,
        count,
    }
}

fn world_with(waves: Vec<WaveConfig>) -> World {
    let content = ContentTables::builtin().with_waves(waves);
    World::new(GameConfig::default(), Arc::new(content))
}

fn builtin_world() -> World {
    World::new(GameConfig::default(), Arc::new(ContentTables::builtin()))
}

#[test]
fn spawn_queue_expands_every_group() {
    let mut world = world_with(vec![scripted_wave(
        1,
        vec![
            group("SKELETON_GRUNT", 0.0, Some(3)),
            group("BONE_SHIELD", 2.0, None),
            group("SKELETON_GRUNT", 4.0, Some(2)),
        ],
    )]);
    world.time = 10.0;

    start_wave(&mut world, 1, 1).expect("wave script");

    let queue = &world.wave.spawn_queue;
    assert_eq!(queue.len(), 6);
    assert_eq!(world.wave.phase, WavePhase::Spawning);
    let first_group: Vec<_> = queue[..3].iter().map(|entry| entry.spawn_time).collect();
    assert_eq!(first_group, vec![10.0, 10.5, 11.0]);
    assert_eq!(queue[3].spawn_time, 12.0);
    assert!(queue[4].spawn_time < queue[5].spawn_time);
    assert!(queue.iter().all(|entry| !entry.spawned));
    assert_eq!(
        world.combat_log.latest().map(|entry| entry.kind),
        Some(LogKind::WaveStart)
    );
}

#[test]
fn spawning_releases_due_entries_then_activates() {
    let mut world = world_with(vec![scripted_wave(
        1,
        vec![group("SKELETON_GRUNT", 0.0, Some(2))],
    )]);
    start_wave(&mut world, 1, 1).expect("wave script");

    update(&mut world, 0.25).expect("update");
    assert_eq!(world.enemies.len(), 1);
    assert_eq!(world.wave.phase, WavePhase::Spawning);

    world.time = 0.5;
    update(&mut world, 0.25).expect("update");
    assert_eq!(world.enemies.len(), 2);
    assert_eq!(world.wave.phase, WavePhase::Active);
    assert_eq!(world.enemies[0].position, 100.0);
}

#[test]
fn empty_waves_activate_immediately() {
    let mut world = world_with(vec![scripted_wave(1, Vec::new())]);
    start_wave(&mut world, 1, 1).expect("wave script");

    update(&mut world, 0.05).expect("update");

    assert_eq!(world.wave.phase, WavePhase::Active);
}

#[test]
fn cleared_lane_counts_down_then_rewards() {
    let mut world = world_with(vec![
        scripted_wave(1, Vec::new()),
        scripted_wave(2, Vec::new()),
    ]);
    start_wave(&mut world, 1, 1).expect("wave script");
    update(&mut world, 0.05).expect("spawning");
    update(&mut world, 0.05).expect("active");
    assert_eq!(world.wave.phase, WavePhase::Clearing);
    assert_eq!(world.wave.phase_timer, 2.0);

    update(&mut world, 1.0).expect("clearing");
    assert_eq!(world.wave.phase, WavePhase::Clearing);
    update(&mut world, 1.0).expect("clearing");

    assert_eq!(world.wave.phase, WavePhase::Completed);
    assert_eq!(world.gold, 10);
    assert_eq!(world.essence, 1.0);
    assert_eq!(world.wave.current, 2);
    assert_eq!(world.wave.floor, 1);
}

#[test]
fn large_steps_finish_clearing_in_one_call() {
    let mut world = world_with(vec![scripted_wave(1, Vec::new())]);
    world.wave.phase = WavePhase::Clearing;
    world.wave.phase_timer = 2.0;

    update(&mut world, 60.0).expect("clearing");

    assert_eq!(world.wave.phase, WavePhase::Completed);
}

#[test]
fn final_wave_advances_the_floor() {
    let mut world = builtin_world();
    let _ = world.spawn_summon("skeleton", 0.0);
    world.tower.stats.hp = 40.0;
    world.wave.current = 5;
    world.wave.phase = WavePhase::Clearing;
    world.wave.phase_timer = 0.01;

    update(&mut world, 0.05).expect("clearing");

    assert_eq!(world.wave.floor, 2);
    assert_eq!(world.wave.current, 1);
    assert_eq!(world.wave.total, 5);
    assert_eq!(world.wave.phase, WavePhase::Completed);
    assert!(world.summons.is_empty());
    assert_eq!(world.tower.stats.hp, 40.0);
    assert_eq!(world.gold, 50);
    assert!(world
        .combat_log
        .iter()
        .any(|entry| entry.kind == LogKind::FloorComplete));
}

#[test]
fn boss_floors_have_a_single_wave() {
    let mut world = builtin_world();
    for floor in 2..=30 {
        start_next_floor(&mut world).expect("next floor");
        assert_eq!(world.wave.floor, floor);
        let expected = if floor % 10 == 0 { 1 } else { 5 };
        assert_eq!(world.wave.total, expected, "floor {floor}");
    }
}

#[test]
fn zero_boss_frequency_means_no_boss_floors() {
    let mut config = GameConfig::default();
    config.waves.boss_floor_frequency = 0;
    let mut world = World::new(config, Arc::new(ContentTables::builtin()));

    for _ in 0..12 {
        start_next_floor(&mut world).expect("next floor");
        assert_eq!(world.wave.total, 5);
    }
}

#[test]
fn next_floor_clears_the_lane() {
    let mut world = builtin_world();
    let _ = world.spawn_enemy("SKELETON_GRUNT", 50.0);
    let _ = world.spawn_summon("skeleton", 0.0);
    world.gold = 33;

    start_next_floor(&mut world).expect("next floor");

    assert!(world.enemies.is_empty());
    assert!(world.summons.is_empty());
    assert!(world.projectiles.is_empty());
    assert_eq!(world.gold, 33);
    assert_eq!(world.wave.phase, WavePhase::Spawning);
}

#[test]
fn wave_scripts_loop_beyond_authored_content() {
    let mut world = world_with(vec![
        scripted_wave(1, vec![group("SKELETON_GRUNT", 0.0, Some(1))]),
        scripted_wave(2, vec![group("SKELETON_GRUNT", 0.0, Some(4))]),
    ]);

    start_wave(&mut world, 7, 4).expect("looped script");

    assert_eq!(world.wave.spawn_queue.len(), 4);
}

#[test]
fn missing_wave_scripts_are_fatal() {
    let mut world = world_with(Vec::new());

    let error = start_wave(&mut world, 1, 1).expect_err("no scripts");

    assert!(matches!(
        error,
        ContentError::MissingWave { floor: 1, wave: 1 }
    ));
}

#[test]
fn auto_continue_restarts_completed_waves() {
    let mut world = builtin_world();
    assert_eq!(world.wave.phase, WavePhase::Completed);

    update_auto_continue(&mut world, 0.05).expect("auto continue");

    assert_eq!(world.wave.phase, WavePhase::Spawning);
    assert_eq!(world.auto_continue_timer, 3.0);
    assert_eq!(world.wave.spawn_queue.len(), 3);
}

#[test]
fn auto_continue_waits_for_its_delay() {
    let mut world = builtin_world();
    world.auto_continue_timer = 1.0;

    update_auto_continue(&mut world, 0.5).expect("auto continue");
    assert_eq!(world.wave.phase, WavePhase::Completed);

    update_auto_continue(&mut world, 0.5).expect("auto continue");
    assert_eq!(world.wave.phase, WavePhase::Spawning);
}

#[test]
fn disabled_auto_continue_never_starts_waves() {
    let mut world = builtin_world();
    world.auto_continue = false;

    update_auto_continue(&mut world, 10.0).expect("auto continue");

    assert_eq!(world.wave.phase, WavePhase::Completed);
    assert!(world.wave.spawn_queue.is_empty());
}

#[test]
fn loss_condition_is_idempotent() {
    let mut world = builtin_world();
    world.set_running(true);
    assert!(!check_loss_condition(&mut world));

    world.tower.stats.hp = 0.0;
    for _ in 0..3 {
        assert!(check_loss_condition(&mut world));
        assert_eq!(world.tower.state, EntityState::Dead);
        assert!(!world.is_running);
    }

    let announcements = world
        .combat_log
        .iter()
        .filter(|entry| entry.kind == LogKind::GameOver)
        .count();
    assert_eq!(announcements, 1);
}

use std::{sync::Arc, time::Duration};

use spire_siege_core::{ContentTables, EntityState, GameConfig, WavePhase};
use spire_siege_system_simulation::{advance_tick, FixedStepDriver, SimulationError, TickOutcome};
use spire_siege_world::World;

fn running_world(config: GameConfig) -> World {
    let mut world = World::new(config, Arc::new(ContentTables::builtin()));
    world.set_running(true);
    world
}

#[test]
fn paused_ticks_change_nothing() {
    let mut world = World::new(GameConfig::default(), Arc::new(ContentTables::builtin()));
    let _ = world.spawn_enemy("SKELETON_GRUNT", 50.0);
    let before = format!("{world:?}");

    let outcome = advance_tick(&mut world, 0.05).expect("tick");

    assert_eq!(outcome, TickOutcome::Paused);
    assert_eq!(format!("{world:?}"), before);
}

#[test]
fn mana_regeneration_caps_at_max() {
    let mut config = GameConfig::default();
    config.ai.enabled = false;
    let mut world = running_world(config);
    world.mana = 9.0;
    world.mana_regen = 5.0;

    let _ = advance_tick(&mut world, 1.0).expect("tick");

    assert_eq!(world.mana, 10.0);
}

#[test]
fn first_tick_starts_the_first_wave() {
    let mut world = running_world(GameConfig::default());

    let outcome = advance_tick(&mut world, 0.05).expect("tick");

    assert_eq!(outcome, TickOutcome::Advanced);
    assert_eq!(world.tick_count, 1);
    assert_eq!(world.time, 0.05);
    assert_eq!(world.wave.phase, WavePhase::Spawning);
    assert_eq!(world.wave.spawn_queue.len(), 3);
}

#[test]
fn slows_apply_to_the_same_tick_movement() {
    let mut config = GameConfig::default();
    config.ai.enabled = false;
    config.auto_continue.enabled = false;
    let mut world = running_world(config);
    let _ = world.spawn_enemy("SKELETON_GRUNT", 80.0);
    let slow = world.create_status_effect(spire_siege_core::StatusKind::Slow, 5.0, 0.5, None);
    spire_siege_system_status_effects::apply_status_effect(&mut world.enemies[0], slow);

    let _ = advance_tick(&mut world, 0.5).expect("tick");

    assert_eq!(world.enemies[0].position, 78.0);
}

#[test]
fn tower_loss_stops_the_run() {
    let mut config = GameConfig::default();
    config.ai.enabled = false;
    config.auto_continue.enabled = false;
    let mut world = running_world(config);
    world.tower.stats.hp = 1.0;
    let _ = world.spawn_enemy("SKELETON_GRUNT", 2.0);

    let mut outcome = TickOutcome::Advanced;
    for _ in 0..10 {
        outcome = advance_tick(&mut world, 0.05).expect("tick");
        if outcome != TickOutcome::Advanced {
            break;
        }
    }

    assert_eq!(outcome, TickOutcome::Lost);
    assert_eq!(world.tower.state, EntityState::Dead);
    assert!(!world.is_running);
    assert_eq!(
        advance_tick(&mut world, 0.05).expect("tick"),
        TickOutcome::Paused
    );
}

#[test]
fn dead_entities_are_purged_at_end_of_tick() {
    let mut config = GameConfig::default();
    config.ai.enabled = false;
    config.auto_continue.enabled = false;
    let mut world = running_world(config);
    let _ = world.spawn_enemy("SKELETON_GRUNT", 50.0);
    world.enemies[0].state = EntityState::Dying;
    world.enemies[0].death_timer = Some(0.01);

    let _ = advance_tick(&mut world, 0.05).expect("tick");

    assert!(world.enemies.is_empty());
}

#[test]
fn driver_runs_fixed_steps() {
    let mut world = running_world(GameConfig::default());
    let mut driver = FixedStepDriver::default();

    let ticks = driver
        .advance(&mut world, Duration::from_millis(100))
        .expect("advance");

    assert_eq!(ticks, 2);
    assert_eq!(world.tick_count, 2);
    assert_eq!(driver.accumulator(), 0.0);
}

#[test]
fn driver_banks_partial_frames() {
    let mut world = running_world(GameConfig::default());
    let mut driver = FixedStepDriver::new(0.0625, 0.25).expect("valid step");

    assert_eq!(
        driver
            .advance(&mut world, Duration::from_micros(31_250))
            .expect("advance"),
        0
    );
    assert_eq!(
        driver
            .advance(&mut world, Duration::from_micros(31_250))
            .expect("advance"),
        1
    );
}

#[test]
fn driver_clamps_long_frames() {
    let mut world = running_world(GameConfig::default());
    let mut driver = FixedStepDriver::new(0.0625, 0.25).expect("valid step");

    let ticks = driver
        .advance(&mut world, Duration::from_secs(30))
        .expect("advance");

    assert_eq!(ticks, 4);
}

#[test]
fn paused_driver_drops_banked_time() {
    let mut world = running_world(GameConfig::default());
    let mut driver = FixedStepDriver::new(0.0625, 0.25).expect("valid step");
    let _ = driver
        .advance(&mut world, Duration::from_micros(31_250))
        .expect("advance");

    world.set_running(false);
    let ticks = driver
        .advance(&mut world, Duration::from_millis(100))
        .expect("advance");

    assert_eq!(ticks, 0);
    assert_eq!(driver.accumulator(), 0.0);
    assert_eq!(world.tick_count, 0);
}

#[test]
fn long_runs_preserve_world_invariants() {
    let mut world = running_world(GameConfig::default());
    let deck_size = world.draw_pile.len();

    for _ in 0..2400 {
        if advance_tick(&mut world, 0.05).expect("tick") != TickOutcome::Advanced {
            break;
        }
        let tower = &world.tower.stats;
        assert!(tower.hp >= 0.0 && tower.hp <= tower.max_hp);
        assert!(world.mana <= world.max_mana);
        assert!(world.hand.len() <= world.max_hand_size);
        assert!(world
            .enemies
            .iter()
            .chain(world.summons.iter())
            .chain(world.projectiles.iter())
            .all(|entity| entity.state != EntityState::Dead));
        let cards = world.hand.len()
            + world.draw_pile.len()
            + world.discard_pile.len()
            + world.void_pile.len();
        assert_eq!(cards, deck_size);
    }
}

#[test]
fn driver_rejects_degenerate_steps() {
    for step in [0.0, -0.05, f64::NAN, f64::INFINITY] {
        assert!(
            matches!(
                FixedStepDriver::new(step, 0.25),
                Err(SimulationError::InvalidStep(_))
            ),
            "step {step}"
        );
    }
    assert!(FixedStepDriver::new(0.05, 0.25).is_ok());
}

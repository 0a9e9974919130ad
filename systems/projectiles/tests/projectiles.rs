use std::sync::Arc;

use spire_siege_core::{
    ContentTables, DamageType, EntityId, EntityState, GameConfig, ProjectileData,
    ProjectileMotion, StatusKind,
};
use spire_siege_system_projectiles::update;
use spire_siege_world::{ProjectileLaunch, World};

fn world() -> World {
    World::new(GameConfig::default(), Arc::new(ContentTables::builtin()))
}

fn payload(motion: ProjectileMotion, damage: f64) -> ProjectileData {
    ProjectileData {
        motion,
        damage,
        damage_type: DamageType::True,
        hit_radius: 0.5,
        piercing: false,
        on_hit_effects: Vec::new(),
    }
}

fn launch(world: &mut World, position: f64, speed: f64, data: ProjectileData) -> EntityId {
    world.spawn_projectile(ProjectileLaunch {
        position,
        speed,
        target: None,
        data,
    })
}

#[test]
fn linear_projectiles_travel_at_their_signed_speed() {
    let mut world = world();
    let _ = launch(&mut world, 10.0, 20.0, payload(ProjectileMotion::Linear, 1.0));
    let _ = launch(&mut world, 50.0, -20.0, payload(ProjectileMotion::Linear, 1.0));

    update(&mut world, 0.5);

    assert_eq!(world.projectiles[0].position, 20.0);
    assert_eq!(world.projectiles[1].position, 40.0);
}

#[test]
fn linear_projectile_hits_only_the_closest_enemy() {
    let mut world = world();
    let far = world.spawn_enemy("SKELETON_GRUNT", 31.0);
    let near = world.spawn_enemy("SKELETON_GRUNT", 30.5);
    let _ = launch(&mut world, 20.0, 20.0, payload(ProjectileMotion::Linear, 4.0));

    update(&mut world, 0.5);

    let hp = |id: EntityId, world: &World| {
        world
            .enemies
            .iter()
            .find(|enemy| enemy.id == id)
            .map(|enemy| enemy.stats.hp)
    };
    assert_eq!(hp(near, &world), Some(16.0));
    assert_eq!(hp(far, &world), Some(20.0));
    assert_eq!(world.projectiles[0].state, EntityState::Dead);
}

#[test]
fn equidistant_enemies_resolve_to_the_earliest_spawned() {
    let mut world = world();
    let first = world.spawn_enemy("SKELETON_GRUNT", 29.5);
    let _second = world.spawn_enemy("SKELETON_GRUNT", 30.5);
    let _ = launch(&mut world, 30.0, 0.0, payload(ProjectileMotion::Linear, 4.0));

    update(&mut world, 0.05);

    assert_eq!(world.enemies[0].id, first);
    assert_eq!(world.enemies[0].stats.hp, 16.0);
    assert_eq!(world.enemies[1].stats.hp, 20.0);
}

#[test]
fn aoe_strikes_everything_in_reach() {
    let mut world = world();
    let _ = world.spawn_enemy("SKELETON_GRUNT", 49.0);
    let _ = world.spawn_enemy("SKELETON_GRUNT", 51.5);
    let _ = world.spawn_enemy("SKELETON_GRUNT", 60.0);
    let mut data = payload(ProjectileMotion::Aoe, 5.0);
    data.hit_radius = 2.0;
    let _ = launch(&mut world, 50.0, 0.0, data);

    update(&mut world, 0.05);

    assert_eq!(world.enemies[0].stats.hp, 15.0);
    assert_eq!(world.enemies[1].stats.hp, 15.0);
    assert_eq!(world.enemies[2].stats.hp, 20.0);
    assert_eq!(world.projectiles[0].position, 50.0);
}

#[test]
fn piercing_projectiles_survive_hits() {
    let mut world = world();
    let _ = world.spawn_enemy("SKELETON_GRUNT", 30.0);
    let mut data = payload(ProjectileMotion::Linear, 2.0);
    data.piercing = true;
    let _ = launch(&mut world, 30.0, 0.0, data);

    update(&mut world, 0.05);
    update(&mut world, 0.05);

    assert_eq!(world.projectiles[0].state, EntityState::Walking);
    assert_eq!(world.enemies[0].stats.hp, 16.0);
}

#[test]
fn on_hit_effects_are_cloned_and_sourced_to_the_projectile() {
    let mut world = world();
    let _ = world.spawn_enemy("SKELETON_GRUNT", 30.0);
    let _ = world.spawn_enemy("SKELETON_GRUNT", 30.0);
    let slow = world.create_status_effect(StatusKind::Slow, 2.0, 0.4, None);
    let mut data = payload(ProjectileMotion::Aoe, 1.0);
    data.on_hit_effects.push(slow.clone());
    let projectile = launch(&mut world, 30.0, 0.0, data);

    update(&mut world, 0.05);

    let applied: Vec<_> = world
        .enemies
        .iter()
        .map(|enemy| enemy.status_effects[0].clone())
        .collect();
    assert!(applied.iter().all(|effect| effect.source == Some(projectile)));
    assert!(applied.iter().all(|effect| effect.kind == StatusKind::Slow));
    assert_ne!(applied[0].id, applied[1].id);
    assert_ne!(applied[0].id, slow.id);
}

#[test]
fn homing_projectiles_chase_their_target() {
    let mut world = world();
    let target = world.spawn_enemy("SKELETON_GRUNT", 20.0);
    let _ = world.spawn_projectile(ProjectileLaunch {
        position: 60.0,
        speed: 10.0,
        target: Some(target),
        data: payload(ProjectileMotion::Homing, 1.0),
    });

    update(&mut world, 0.5);

    assert_eq!(world.projectiles[0].position, 55.0);
    assert_eq!(world.projectiles[0].target, Some(target));
}

#[test]
fn homing_projectiles_without_target_fly_straight() {
    let mut world = world();
    let _ = world.spawn_projectile(ProjectileLaunch {
        position: 60.0,
        speed: 10.0,
        target: Some(EntityId::new(4242)),
        data: payload(ProjectileMotion::Homing, 1.0),
    });

    update(&mut world, 0.5);

    assert_eq!(world.projectiles[0].position, 65.0);
    assert_eq!(world.projectiles[0].target, None);
}

#[test]
fn projectiles_leaving_the_lane_are_culled() {
    let mut world = world();
    let _ = launch(&mut world, 105.0, 20.0, payload(ProjectileMotion::Linear, 1.0));
    let _ = launch(&mut world, -5.0, -20.0, payload(ProjectileMotion::Linear, 1.0));

    update(&mut world, 0.5);

    assert!(world
        .projectiles
        .iter()
        .all(|projectile| projectile.state == EntityState::Dead));
}

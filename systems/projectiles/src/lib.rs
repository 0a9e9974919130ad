#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Projectile flight, collision and culling.

use spire_siege_core::{
    DamageEvent, DamageSource, EntityId, EntityState, ProjectileData, ProjectileMotion,
};
use spire_siege_system_damage::resolve;
use spire_siege_system_status_effects::apply_status_effect;
use spire_siege_world::{Entity, World};

/// Moves every live projectile, resolves its hits and culls strays.
pub fn update(world: &mut World, dt: f64) {
    let entity_radius = world.config().combat.entity_radius;
    let cull_min = world.config().projectiles.cull_min;
    let cull_max = world.config().projectiles.cull_max;

    for index in 0..world.projectiles.len() {
        if world.projectiles[index].state.is_dead() {
            continue;
        }
        let Some(data) = world.projectiles[index].projectile.clone() else {
            continue;
        };

        advance(world, index, data.motion, dt);

        let projectile = &world.projectiles[index];
        let struck = collisions(
            projectile.position,
            data.hit_radius + entity_radius,
            data.motion,
            &world.enemies,
        );
        if !struck.is_empty() {
            let source = projectile.id;
            for target in struck {
                hit(world, source, target, &data);
            }
            if !data.piercing {
                world.projectiles[index].state = EntityState::Dead;
            }
        }

        let projectile = &mut world.projectiles[index];
        if projectile.position < cull_min || projectile.position > cull_max {
            projectile.state = EntityState::Dead;
        }
    }
}

fn advance(world: &mut World, index: usize, motion: ProjectileMotion, dt: f64) {
    match motion {
        ProjectileMotion::Linear => {
            let projectile = &mut world.projectiles[index];
            projectile.position += projectile.stats.speed * dt;
        }
        ProjectileMotion::Homing => {
            let chased = world.projectiles[index].target.and_then(|id| {
                world
                    .enemies
                    .iter()
                    .find(|enemy| enemy.id == id && !enemy.state.is_down())
                    .map(|enemy| enemy.position)
            });
            let projectile = &mut world.projectiles[index];
            match chased {
                Some(goal) => {
                    let step = projectile.stats.speed.abs() * dt;
                    if goal > projectile.position {
                        projectile.position += step;
                    } else if goal < projectile.position {
                        projectile.position -= step;
                    }
                }
                None => {
                    projectile.target = None;
                    projectile.position += projectile.stats.speed * dt;
                }
            }
        }
        ProjectileMotion::Aoe => {}
    }
}

/// Indices of the enemies struck by a projectile at `position`.
///
/// Blasts strike every enemy in reach; other projectiles strike only the
/// closest, the earliest spawned winning ties.
fn collisions(
    position: f64,
    reach: f64,
    motion: ProjectileMotion,
    enemies: &[Entity],
) -> Vec<usize> {
    let in_reach = enemies
        .iter()
        .enumerate()
        .filter(|(_, enemy)| !enemy.state.is_dead() && (enemy.position - position).abs() <= reach);

    if motion == ProjectileMotion::Aoe {
        return in_reach.map(|(index, _)| index).collect();
    }

    let mut closest: Option<(usize, f64)> = None;
    for (index, enemy) in in_reach {
        let distance = (enemy.position - position).abs();
        match closest {
            Some((_, best)) if distance >= best => {}
            _ => closest = Some((index, distance)),
        }
    }
    closest.map(|(index, _)| index).into_iter().collect()
}

fn hit(world: &mut World, source: EntityId, target: usize, data: &ProjectileData) {
    let effects: Vec<_> = data
        .on_hit_effects
        .iter()
        .map(|template| {
            let mut effect = template.clone();
            effect.id = world.next_status_effect_id();
            effect.source = Some(source);
            effect.tick_timer = None;
            effect
        })
        .collect();

    let enemy = &mut world.enemies[target];
    let event = DamageEvent::new(source, enemy.id, data.damage, data.damage_type);
    let damage = resolve(&event, DamageSource::NEUTRAL, enemy);
    tracing::debug!(
        projectile = source.get(),
        enemy = enemy.id.get(),
        damage,
        "projectile hit"
    );
    for effect in effects {
        apply_status_effect(enemy, effect);
    }
}

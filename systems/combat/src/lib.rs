#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Lane motion and melee combat for enemies and summons.
//!
//! Enemies walk toward the tower and stop to fight summons in front of them
//! or the tower itself. Summons march toward the spawn end and fight the
//! nearest enemy ahead. Targets are held by identifier and resolved again
//! every tick.

use spire_siege_core::{
    DamageEvent, DamageSource, DamageType, EntityId, EntityState, LogKind, VisualKind,
};
use spire_siege_system_damage::resolve;
use spire_siege_world::{nearest, Entity, World};

/// Outcome of an attacking entity's turn.
enum Strike {
    Lost,
    Waiting,
    Hit { damage: u32, position: f64 },
}

/// Advances every enemy by one tick.
pub fn update_enemies(world: &mut World, dt: f64) {
    let lane_min = world.config().combat.lane_min;
    let min_attack_speed = world.config().combat.min_attack_speed;
    let death_duration = world.config().combat.death_animation_duration;

    for index in 0..world.enemies.len() {
        match world.enemies[index].state {
            EntityState::Dead | EntityState::Stunned => continue,
            EntityState::Dying => {
                if advance_death(&mut world.enemies[index], dt, death_duration) {
                    let def_id = world.enemies[index].def_id.clone();
                    record_death(world, &def_id);
                }
                continue;
            }
            EntityState::Idle => world.enemies[index].state = EntityState::Walking,
            EntityState::Walking | EntityState::Attacking => {}
        }

        world.enemies[index].attack_cooldown -= dt;

        if world.enemies[index].state == EntityState::Attacking {
            let outcome = {
                let attacker = &mut world.enemies[index];
                let target = match attacker.target {
                    Some(id) if id == EntityId::TOWER => Some(&mut world.tower),
                    Some(id) => world.summons.iter_mut().find(|summon| summon.id == id),
                    None => None,
                };
                strike(attacker, target, min_attack_speed)
            };
            match outcome {
                Strike::Lost => disengage(&mut world.enemies[index], EntityState::Walking),
                Strike::Waiting => {}
                Strike::Hit { damage, position } => {
                    world.emit_visual(VisualKind::Damage, position, Some(damage), None);
                }
            }
        }

        if world.enemies[index].state == EntityState::Walking {
            let enemy = &mut world.enemies[index];
            enemy.position = (enemy.position - enemy.stats.speed * dt).max(lane_min);

            let enemy = &world.enemies[index];
            let blocker = nearest(enemy.position, &world.summons, |summon| {
                !summon.state.is_dead() && summon.position <= enemy.position
            })
            .filter(|summon| enemy.in_attack_range(summon))
            .map(|summon| summon.id);
            let target = blocker
                .or_else(|| enemy.in_attack_range(&world.tower).then_some(EntityId::TOWER));

            if let Some(target) = target {
                engage(&mut world.enemies[index], target);
            }
        }
    }
}

/// Advances every summon by one tick.
pub fn update_summons(world: &mut World, dt: f64) {
    let lane_max = world.config().combat.lane_max;
    let min_attack_speed = world.config().combat.min_attack_speed;
    let death_duration = world.config().combat.death_animation_duration;

    for index in 0..world.summons.len() {
        match world.summons[index].state {
            EntityState::Dead | EntityState::Stunned => continue,
            EntityState::Dying => {
                if advance_death(&mut world.summons[index], dt, death_duration) {
                    let def_id = world.summons[index].def_id.clone();
                    record_death(world, &def_id);
                }
                continue;
            }
            EntityState::Idle | EntityState::Walking | EntityState::Attacking => {}
        }

        world.summons[index].attack_cooldown -= dt;

        if world.summons[index].state == EntityState::Attacking {
            let fallback = if world.summons[index].stats.speed > 0.0 {
                EntityState::Walking
            } else {
                EntityState::Idle
            };
            let outcome = {
                let attacker = &mut world.summons[index];
                let target = match attacker.target {
                    Some(id) => world.enemies.iter_mut().find(|enemy| enemy.id == id),
                    None => None,
                };
                strike(attacker, target, min_attack_speed)
            };
            match outcome {
                Strike::Lost => disengage(&mut world.summons[index], fallback),
                Strike::Waiting => {}
                Strike::Hit { damage, position } => {
                    world.emit_visual(VisualKind::Damage, position, Some(damage), None);
                }
            }
        }

        if matches!(
            world.summons[index].state,
            EntityState::Walking | EntityState::Idle
        ) {
            let summon = &mut world.summons[index];
            let mobile = summon.stats.speed > 0.0;
            if mobile && summon.state == EntityState::Walking {
                summon.position = (summon.position + summon.stats.speed * dt).min(lane_max);
            }

            let summon = &world.summons[index];
            let target = nearest(summon.position, &world.enemies, |enemy| {
                !enemy.state.is_dead() && enemy.position >= summon.position
            })
            .filter(|enemy| summon.in_attack_range(enemy))
            .map(|enemy| enemy.id);

            let summon = &mut world.summons[index];
            match target {
                Some(target) => engage(summon, target),
                None if mobile => summon.state = EntityState::Walking,
                None => summon.state = EntityState::Idle,
            }
        }
    }
}

/// Removes every dead enemy, summon and projectile.
pub fn cleanup_dead_entities(world: &mut World) {
    world.enemies.retain(|enemy| !enemy.state.is_dead());
    world.summons.retain(|summon| !summon.state.is_dead());
    world
        .projectiles
        .retain(|projectile| !projectile.state.is_dead());
}

fn strike(attacker: &mut Entity, target: Option<&mut Entity>, min_attack_speed: f64) -> Strike {
    let Some(target) =
        target.filter(|target| !target.state.is_dead() && attacker.in_attack_range(target))
    else {
        return Strike::Lost;
    };
    if attacker.attack_cooldown > 0.0 {
        return Strike::Waiting;
    }

    let event = DamageEvent::new(
        attacker.id,
        target.id,
        attacker.stats.damage,
        DamageType::Physical,
    );
    let damage = resolve(&event, DamageSource::of(&attacker.stats), target);
    attacker.attack_cooldown = 1.0 / attacker.stats.attack_speed.max(min_attack_speed);
    Strike::Hit {
        damage,
        position: target.position,
    }
}

fn disengage(entity: &mut Entity, fallback: EntityState) {
    entity.state = fallback;
    entity.target = None;
}

fn engage(entity: &mut Entity, target: EntityId) {
    entity.state = EntityState::Attacking;
    entity.target = Some(target);
}

fn advance_death(entity: &mut Entity, dt: f64, duration: f64) -> bool {
    let timer = entity.death_timer.get_or_insert(duration);
    *timer -= dt;
    if *timer <= 0.0 {
        entity.state = EntityState::Dead;
        tracing::debug!(entity = entity.id.get(), "entity died");
        return true;
    }
    false
}

fn record_death(world: &mut World, def_id: &str) {
    world.record(LogKind::Death, format!("{def_id} was defeated"));
}

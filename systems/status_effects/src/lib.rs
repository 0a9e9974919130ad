#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Status effect bookkeeping: expiry, periodic ticks and derived stats.

use spire_siege_core::{
    DamageEvent, DamageSource, DamageType, EntityState, StatusEffect, StatusKind,
};
use spire_siege_system_damage::resolve;
use spire_siege_world::{Entity, World};

/// Advances the status effects of the tower, every enemy and every summon.
///
/// Projectiles never carry effects and are left alone.
pub fn update(world: &mut World, dt: f64) {
    let tick_interval = world.config().status_effects.tick_interval;

    for enemy in &mut world.enemies {
        update_entity(enemy, dt, tick_interval);
    }
    for summon in &mut world.summons {
        update_entity(summon, dt, tick_interval);
    }
    update_entity(&mut world.tower, dt, tick_interval);
}

/// Attaches an effect to `entity` following the stacking rules.
///
/// Stuns merge into an existing stun by extending its duration. Every other
/// kind stacks as an independent entry.
pub fn apply_status_effect(entity: &mut Entity, effect: StatusEffect) {
    if effect.kind == StatusKind::Stun {
        if let Some(existing) = entity
            .status_effects
            .iter_mut()
            .find(|existing| existing.kind == StatusKind::Stun)
        {
            existing.duration += effect.duration;
            return;
        }
    }
    entity.status_effects.push(effect);
}

/// Strongest slow currently affecting the entity, or zero.
#[must_use]
pub fn max_slow(entity: &Entity) -> f64 {
    entity
        .status_effects
        .iter()
        .filter(|effect| effect.kind == StatusKind::Slow)
        .fold(0.0, |max, effect| f64::max(max, effect.intensity))
}

fn update_entity(entity: &mut Entity, dt: f64, tick_interval: f64) {
    if entity.state.is_dead() {
        return;
    }
    let base = *entity.base_stats.get_or_insert(entity.stats);

    let mut effects = std::mem::take(&mut entity.status_effects);
    effects.retain_mut(|effect| {
        effect.duration -= dt;
        if effect.kind.is_periodic() {
            let timer = effect.tick_timer.get_or_insert(tick_interval);
            *timer -= dt;
            if *timer <= 0.0 {
                *timer = tick_interval;
                fire_periodic(entity, effect);
            }
        }
        effect.duration > 0.0
    });
    entity.status_effects = effects;

    entity.stats.speed = base.speed * (1.0 - max_slow(entity));

    let stunned = entity
        .status_effects
        .iter()
        .any(|effect| effect.kind == StatusKind::Stun);
    if stunned {
        if entity.state != EntityState::Stunned && !entity.state.is_down() {
            tracing::debug!(entity = entity.id.get(), "entity stunned");
            entity.state = EntityState::Stunned;
        }
    } else if entity.state == EntityState::Stunned {
        entity.state = EntityState::Idle;
    }
}

fn fire_periodic(entity: &mut Entity, effect: &StatusEffect) {
    let damage_type = match effect.kind {
        StatusKind::Poison => DamageType::True,
        StatusKind::Burn => DamageType::Magical,
        StatusKind::Regen => {
            entity.stats.hp = (entity.stats.hp + effect.intensity).min(entity.stats.max_hp);
            return;
        }
        StatusKind::Slow | StatusKind::Stun => return,
    };
    let event = DamageEvent::new(
        effect.source.unwrap_or(entity.id),
        entity.id,
        effect.intensity,
        damage_type,
    );
    let _ = resolve(&event, DamageSource::NEUTRAL, entity);
}

#[cfg(test)]
mod tests {
    use super::*;
    use spire_siege_core::{EntityId, EntityKind, StatusEffectId, Stats};

    fn effect(id: u32, kind: StatusKind, duration: f64, intensity: f64) -> StatusEffect {
        StatusEffect::new(StatusEffectId::new(id), kind, duration, intensity, None)
    }

    fn walker() -> Entity {
        Entity::new(
            EntityId::new(1),
            EntityKind::Enemy,
            "walker",
            50.0,
            Stats::new(20.0, 10.0, 5.0, 1.0, 1.0),
            EntityState::Walking,
        )
    }

    #[test]
    fn stuns_merge_by_extending_duration() {
        let mut entity = walker();
        apply_status_effect(&mut entity, effect(1, StatusKind::Stun, 1.0, 0.0));
        apply_status_effect(&mut entity, effect(2, StatusKind::Stun, 2.0, 0.0));

        assert_eq!(entity.status_effects.len(), 1);
        assert_eq!(entity.status_effects[0].duration, 3.0);
    }

    #[test]
    fn damage_over_time_stacks_independently() {
        let mut entity = walker();
        apply_status_effect(&mut entity, effect(1, StatusKind::Poison, 3.0, 2.0));
        apply_status_effect(&mut entity, effect(2, StatusKind::Poison, 5.0, 1.0));
        apply_status_effect(&mut entity, effect(3, StatusKind::Slow, 5.0, 0.3));

        assert_eq!(entity.status_effects.len(), 3);
    }

    #[test]
    fn regen_heals_up_to_max_hp() {
        let mut entity = walker();
        entity.stats.hp = 18.0;
        apply_status_effect(&mut entity, effect(1, StatusKind::Regen, 5.0, 4.0));
        update_entity(&mut entity, 1.0, 1.0);

        assert_eq!(entity.stats.hp, 20.0);
    }

    #[test]
    fn dying_entities_keep_ticking_without_being_stunned() {
        let mut entity = walker();
        entity.state = EntityState::Dying;
        apply_status_effect(&mut entity, effect(1, StatusKind::Stun, 2.0, 0.0));
        apply_status_effect(&mut entity, effect(2, StatusKind::Poison, 3.0, 2.0));
        update_entity(&mut entity, 1.0, 1.0);

        assert_eq!(entity.state, EntityState::Dying);
        assert_eq!(entity.status_effects.len(), 2);
        assert_eq!(entity.status_effects[1].duration, 2.0);
        assert_eq!(entity.stats.hp, 18.0);
    }

    #[test]
    fn dead_entities_are_not_processed() {
        let mut entity = walker();
        entity.state = EntityState::Dead;
        apply_status_effect(&mut entity, effect(1, StatusKind::Stun, 1.0, 0.0));
        update_entity(&mut entity, 0.5, 1.0);

        assert_eq!(entity.state, EntityState::Dead);
        assert_eq!(entity.status_effects[0].duration, 1.0);
        assert!(entity.base_stats.is_none());
    }
}

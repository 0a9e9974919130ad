#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure damage resolution shared by melee, projectiles, cards and status ticks.

use spire_siege_core::{DamageEvent, DamageSource, DamageType, EntityState, CRITICAL_MULTIPLIER};
use spire_siege_world::Entity;

/// Resolves a damage event against `target` and returns the damage applied.
///
/// Amplification is applied outgoing first, then incoming, then the critical
/// multiplier. Physical and magical hits are reduced by armor and magic resist
/// respectively but never below 1 while a mitigation stat is present. The
/// result is floored, subtracted from the target's hit points and, when the
/// target drops to zero, the target starts dying.
pub fn resolve(event: &DamageEvent, source: DamageSource, target: &mut Entity) -> u32 {
    let mut amount = event.amount;
    amount *= 1.0 + source.damage_amp;
    amount *= 1.0 + target.stats.damage_taken_amp;
    if event.is_critical {
        amount *= CRITICAL_MULTIPLIER;
    }

    let mitigation = match event.damage_type {
        DamageType::True => 0.0,
        DamageType::Physical => target.stats.armor,
        DamageType::Magical => target.stats.magic_resist,
    };
    if mitigation != 0.0 {
        amount = (amount - mitigation).max(1.0);
    }

    let damage = amount.floor().max(0.0);
    target.stats.hp = (target.stats.hp - damage).max(0.0);
    if target.stats.hp <= 0.0 && !target.state.is_dead() && target.state != EntityState::Dying {
        target.state = EntityState::Dying;
        tracing::debug!(entity = target.id.get(), "entity started dying");
    }

    damage as u32
}

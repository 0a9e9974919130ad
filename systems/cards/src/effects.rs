use spire_siege_core::{
    CardEffect, CardInstanceId, DamageEvent, DamageSource, EffectKind, EntityId, LogKind,
    StatKind, StatusKind, TargetType, VisualKind,
};
use spire_siege_system_damage::resolve;
use spire_siege_system_status_effects::apply_status_effect;
use spire_siege_world::{query, World};

use crate::deck::perform_draw;

/// Resolves the entities a card effect acts on.
///
/// `Enemy` picks the front-most enemy, the one nearest the tower. `Player`
/// never resolves to entities; such effects act on world resources.
#[must_use]
pub fn get_targets(world: &World, target: TargetType) -> Vec<EntityId> {
    match target {
        TargetType::Enemy => query::front_enemy(world)
            .map(|enemy| enemy.id)
            .into_iter()
            .collect(),
        TargetType::AllEnemies => world.enemies.iter().map(|enemy| enemy.id).collect(),
        TargetType::Tower => vec![EntityId::TOWER],
        TargetType::AllSummons => world.summons.iter().map(|summon| summon.id).collect(),
        TargetType::Player => Vec::new(),
    }
}

/// Applies a single card effect to the world.
///
/// Effects never fail; a missing payload or target simply does nothing.
pub fn execute_effect(world: &mut World, effect: &CardEffect, source_card: CardInstanceId) {
    tracing::trace!(card = source_card.get(), effect = ?effect.kind, "executing card effect");

    match &effect.kind {
        EffectKind::Damage {
            amount,
            damage_type,
        } => {
            let source = DamageSource::of(&world.tower.stats);
            for id in get_targets(world, effect.target) {
                let Some(target) = world.combatant_mut(id) else {
                    continue;
                };
                let event = DamageEvent::new(EntityId::TOWER, id, *amount, *damage_type);
                let damage = resolve(&event, source, target);
                let position = target.position;
                let name = target.def_id.clone();
                world.emit_visual(VisualKind::Damage, position, Some(damage), None);
                world.record(LogKind::Damage, format!("{name} takes {damage} damage"));
            }
        }
        EffectKind::Heal { amount } => {
            if effect.target != TargetType::Tower {
                return;
            }
            let tower = &mut world.tower;
            let healed = (tower.stats.max_hp - tower.stats.hp).min(*amount);
            tower.stats.hp = (tower.stats.hp + amount).min(tower.stats.max_hp);
            if healed > 0.0 {
                let position = tower.position;
                world.emit_visual(VisualKind::Heal, position, Some(healed as u32), None);
                world.record(LogKind::Heal, format!("Tower heals {healed}"));
            }
        }
        EffectKind::Status {
            status,
            duration,
            intensity,
        } => {
            let Some(kind) = *status else {
                return;
            };
            for id in get_targets(world, effect.target) {
                let status_effect =
                    world.create_status_effect(kind, *duration, *intensity, Some(EntityId::TOWER));
                let Some(target) = world.combatant_mut(id) else {
                    continue;
                };
                apply_status_effect(target, status_effect);
                let position = target.position;
                let name = target.def_id.clone();
                let label = status_label(kind);
                world.emit_visual(VisualKind::Debuff, position, None, Some(label.to_owned()));
                world.record(LogKind::Status, format!("{name} is afflicted by {label}"));
            }
        }
        EffectKind::Buff { modifier } => {
            let Some(modifier) = modifier else {
                return;
            };
            for id in get_targets(world, effect.target) {
                let Some(target) = world.combatant_mut(id) else {
                    continue;
                };
                *target.stats.get_mut(modifier.stat) += modifier.value;
                target.stats.clamp_hp();
                let position = target.position;
                let name = target.def_id.clone();
                let text = format!("+{} {}", modifier.value, stat_label(modifier.stat));
                world.record(LogKind::Buff, format!("{name} gains {text}"));
                world.emit_visual(VisualKind::Buff, position, None, Some(text));
            }
        }
        EffectKind::Summon { summon_def } => {
            let Some(def_id) = summon_def else {
                return;
            };
            let position = world.tower.position;
            let _ = world.spawn_summon(def_id, position);
            world.record(LogKind::Summon, format!("Summoned {def_id}"));
        }
        EffectKind::Resource { mana_gain } => {
            world.mana = (world.mana + mana_gain).min(world.max_mana);
        }
        EffectKind::Draw { count } => {
            for _ in 0..*count {
                if world.hand.len() >= world.max_hand_size || !perform_draw(world) {
                    break;
                }
            }
        }
        EffectKind::Essence { amount } => {
            world.essence += amount;
        }
    }
}

fn status_label(kind: StatusKind) -> &'static str {
    match kind {
        StatusKind::Slow => "SLOW",
        StatusKind::Stun => "STUN",
        StatusKind::Poison => "POISON",
        StatusKind::Burn => "BURN",
        StatusKind::Regen => "REGEN",
    }
}

fn stat_label(stat: StatKind) -> &'static str {
    match stat {
        StatKind::Hp => "hp",
        StatKind::MaxHp => "max_hp",
        StatKind::Speed => "speed",
        StatKind::Range => "range",
        StatKind::Damage => "damage",
        StatKind::AttackSpeed => "attack_speed",
        StatKind::Armor => "armor",
        StatKind::MagicResist => "magic_resist",
        StatKind::DamageAmp => "damage_amp",
        StatKind::DamageTakenAmp => "damage_taken_amp",
    }
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Automatic card player that picks a random playable card.

use rand::Rng;
use spire_siege_core::{CardEffect, CardInstanceId, TargetType};
use spire_siege_system_cards::perform_play;
use spire_siege_world::{query, CardInstance, World};

/// Plays one random playable card once the play cooldown has elapsed.
///
/// Returns the card played this tick. The cooldown only restarts after an
/// actual play, so the AI keeps looking every tick while nothing is playable.
pub fn update_ai(world: &mut World, dt: f64) -> Option<CardInstanceId> {
    if world.ai_play_cooldown > 0.0 {
        world.ai_play_cooldown = (world.ai_play_cooldown - dt).max(0.0);
        return None;
    }

    let playable: Vec<CardInstanceId> = world
        .hand
        .iter()
        .filter(|card| is_card_playable(world, card))
        .map(|card| card.id)
        .collect();
    if playable.is_empty() {
        return None;
    }

    let choice = playable[world.rng.gen_range(0..playable.len())];
    if !perform_play(world, choice) {
        return None;
    }
    tracing::debug!(card = choice.get(), "ai played card");
    world.ai_play_cooldown = world.config().ai.play_delay;
    Some(choice)
}

/// Reports whether the AI may play `card` right now.
///
/// Freshly drawn cards are held back for a grace period, the card must be
/// affordable, and every effect needs something to land on.
#[must_use]
pub fn is_card_playable(world: &World, card: &CardInstance) -> bool {
    if let Some(drawn_at) = card.drawn_at {
        if world.time - drawn_at < world.config().ai.card_draw_grace {
            return false;
        }
    }
    if world.mana < card.current_cost {
        return false;
    }
    let Some(definition) = world.content().card(&card.def_id) else {
        return false;
    };
    definition
        .effects
        .iter()
        .all(|effect| has_valid_targets(world, effect))
}

fn has_valid_targets(world: &World, effect: &CardEffect) -> bool {
    match effect.target {
        TargetType::Enemy | TargetType::AllEnemies => query::live_enemies(world).next().is_some(),
        TargetType::Tower | TargetType::AllSummons | TargetType::Player => true,
    }
}

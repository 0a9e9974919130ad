use rand::seq::SliceRandom;
use spire_siege_core::{CardInstanceId, CardZone, LogKind};
use spire_siege_world::World;

use crate::effects::execute_effect;

/// Fills the draw timer and draws a card when it completes.
///
/// A full hand holds the timer at 1.0 until a slot frees up.
pub fn advance_draw_timer(world: &mut World, dt: f64) {
    let progress = dt / world.draw_speed;
    if world.hand.len() < world.max_hand_size {
        world.draw_timer += progress;
        if world.draw_timer >= 1.0 {
            world.draw_timer = 0.0;
            let _ = perform_draw(world);
        }
    } else {
        world.draw_timer = (world.draw_timer + progress).min(1.0);
    }
}

/// Moves the top card of the draw pile into the hand.
///
/// An empty draw pile is refilled from the discard pile first. Returns
/// `false` when both piles are empty. Hand size is the caller's concern.
pub fn perform_draw(world: &mut World) -> bool {
    if world.draw_pile.is_empty() {
        if world.discard_pile.is_empty() {
            return false;
        }
        reshuffle_discard(world);
    }

    let Some(mut card) = world.draw_pile.pop() else {
        return false;
    };
    card.zone = CardZone::Hand;
    card.drawn_at = Some(world.time);
    world.hand.push(card);
    true
}

/// Shuffles the whole discard pile into the draw pile.
pub fn reshuffle_discard(world: &mut World) {
    let mut cards = std::mem::take(&mut world.discard_pile);
    for card in &mut cards {
        card.zone = CardZone::Draw;
    }
    cards.shuffle(&mut world.rng);
    tracing::debug!(cards = cards.len(), "reshuffled discard pile");
    world.draw_pile.append(&mut cards);
}

/// Plays a card from the hand and resolves its effects.
///
/// Returns `false`, leaving the world untouched, when the card is not in the
/// hand, has no definition or costs more mana than is available.
pub fn perform_play(world: &mut World, card_id: CardInstanceId) -> bool {
    let Some(index) = world.hand.iter().position(|card| card.id == card_id) else {
        return false;
    };
    let content = world.content_handle();
    let Some(definition) = content.card(&world.hand[index].def_id) else {
        return false;
    };
    if world.mana < world.hand[index].current_cost {
        return false;
    }

    let mut card = world.hand.remove(index);
    world.mana -= card.current_cost;
    let name = card.name.clone();
    if definition.exhaust {
        card.zone = CardZone::Void;
        world.void_pile.push(card);
    } else {
        card.zone = CardZone::Discard;
        world.discard_pile.push(card);
    }

    tracing::debug!(card = %definition.id, "card played");
    world.record(LogKind::CardPlayed, format!("Played {name}"));

    for effect in &definition.effects {
        execute_effect(world, effect, card_id);
    }
    true
}

#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Card effects and the draw, play and reshuffle cycle of the deck.
//!
//! The two halves live together because drawing is itself a card effect and
//! playing a card runs its effects.

mod deck;
mod effects;

pub use deck::{advance_draw_timer, perform_draw, perform_play, reshuffle_discard};
pub use effects::{execute_effect, get_targets};

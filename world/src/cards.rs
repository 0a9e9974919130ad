//! Card instances moving between piles.

use serde::Serialize;
use spire_siege_core::{CardInstanceId, CardZone};

/// A physical copy of a card definition dealt into the deck.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CardInstance {
    /// Identifier allocated by the world.
    pub id: CardInstanceId,
    /// Definition the card plays.
    pub def_id: String,
    /// Pile the card currently lives in.
    pub zone: CardZone,
    /// Mana paid to play the card.
    pub current_cost: f64,
    /// Display name.
    pub name: String,
    /// Simulation time of the most recent draw.
    pub drawn_at: Option<f64>,
}

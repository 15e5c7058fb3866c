//! Trick context: what the local player must answer, if anything.

use super::cards_types::Card;

/// The in-progress trick as seen by a responder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrickContext {
    pub leader_id: String,
    /// Player currently winning the trick.
    pub owner_id: String,
    /// Cards the owner played; a responder must beat each with a distinct card.
    pub owner_cards: Vec<Card>,
    /// Exact number of cards a responder must put down.
    pub required_count: usize,
    pub trick_index: u32,
}

/// Whether the local hand opens a trick or answers one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayMode {
    Leader,
    Responder {
        owner_cards: Vec<Card>,
        required: usize,
    },
}

impl PlayMode {
    pub fn from_trick(trick: Option<&TrickContext>) -> Self {
        match trick {
            Some(t) => PlayMode::Responder {
                owner_cards: t.owner_cards.clone(),
                required: t.required_count,
            },
            None => PlayMode::Leader,
        }
    }

    pub fn is_leader(&self) -> bool {
        matches!(self, PlayMode::Leader)
    }
}

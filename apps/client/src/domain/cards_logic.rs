//! Card game logic: rank strength, the beat relation, four-card combo legality

use super::cards_types::{Card, Rank, Suit};

/// Largest number of cards a single play may contain.
pub const MAX_PLAY_SIZE: usize = 4;

/// Ace/ten distributions accepted for a mixed-suit four-card combo, as (aces, tens).
const ACE_TEN_PATTERNS: [(usize, usize); 4] = [(4, 0), (3, 1), (2, 2), (1, 3)];

/// Total order over ranks, weakest six = 0 up to ace = 8.
pub fn rank_strength(rank: Rank) -> u8 {
    match rank {
        Rank::Six => 0,
        Rank::Seven => 1,
        Rank::Eight => 2,
        Rank::Nine => 3,
        Rank::Ten => 4,
        Rank::Jack => 5,
        Rank::Queen => 6,
        Rank::King => 7,
        Rank::Ace => 8,
    }
}

pub fn hand_has_suit(hand: &[Card], suit: Suit) -> bool {
    hand.iter().any(|c| c.suit == suit)
}

/// Returns true when `challenger` beats `defender`.
///
/// Same suit compares rank strength; otherwise only a trump challenger
/// against a non-trump defender wins.
pub fn card_beats(challenger: Card, defender: Card, trump: Suit) -> bool {
    if challenger.suit == defender.suit {
        return rank_strength(challenger.rank) > rank_strength(defender.rank);
    }
    challenger.suit == trump && defender.suit != trump
}

/// The single suit shared by every card, if any. Empty input has no suit.
pub fn same_suit(cards: &[Card]) -> Option<Suit> {
    let first = cards.first()?.suit;
    cards.iter().all(|c| c.suit == first).then_some(first)
}

/// (aces, tens) counts among the cards.
pub fn ace_ten_counts(cards: &[Card]) -> (usize, usize) {
    cards.iter().fold((0, 0), |(aces, tens), c| match c.rank {
        Rank::Ace => (aces + 1, tens),
        Rank::Ten => (aces, tens + 1),
        _ => (aces, tens),
    })
}

/// Four-card throw legality: one suit, or only aces and tens in an accepted distribution.
pub fn is_allowed_four_combo(cards: &[Card]) -> bool {
    if cards.len() != MAX_PLAY_SIZE {
        return false;
    }
    if same_suit(cards).is_some() {
        return true;
    }
    if cards.iter().any(|c| !c.is_ace() && !c.is_ten()) {
        return false;
    }
    ACE_TEN_PATTERNS.contains(&ace_ten_counts(cards))
}

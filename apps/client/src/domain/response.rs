//! Counter-play search for a responder facing the trick owner's cards.
//!
//! Hands are small (at most a dozen cards) and plays are at most four cards,
//! so every candidate subset is scored with an exact backtracking search.

use tracing::warn;

use super::cards_logic::{card_beats, rank_strength, MAX_PLAY_SIZE};
use super::cards_types::{Card, Suit};
use super::subsets::IndexSubsets;

/// Owner sets deeper than this are not searched.
pub const MAX_SEARCH_DEPTH: usize = 8;

const TRUMP_COST: u32 = 100;

/// How a response would land against the owner's cards, as the server resolves it.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ResponseOutcome {
    /// Every owner card is beaten by a distinct response card; the responder takes ownership.
    Beat,
    /// Some but not all owner cards are beaten.
    Partial,
    /// Nothing is beaten.
    Discard,
}

/// Maximum number of owner cards that distinct challenger cards can beat.
///
/// Owner cards are processed in order; at each step the search either skips the
/// owner card or pairs it with any unused challenger card that beats it.
pub fn max_beat_count(challenger: &[Card], owner_cards: &[Card], trump: Suit) -> usize {
    if owner_cards.len() > MAX_SEARCH_DEPTH {
        warn!(
            owner_cards = owner_cards.len(),
            max_depth = MAX_SEARCH_DEPTH,
            "[RESPONSE] owner set too large to search"
        );
        return 0;
    }
    let mut used = vec![false; challenger.len()];
    best_from(0, challenger, owner_cards, trump, &mut used)
}

fn best_from(
    owner_idx: usize,
    challenger: &[Card],
    owner_cards: &[Card],
    trump: Suit,
    used: &mut [bool],
) -> usize {
    let Some(&owner_card) = owner_cards.get(owner_idx) else {
        return 0;
    };
    let mut best = best_from(owner_idx + 1, challenger, owner_cards, trump, used);
    for (idx, &card) in challenger.iter().enumerate() {
        if used[idx] || !card_beats(card, owner_card, trump) {
            continue;
        }
        used[idx] = true;
        best = best.max(1 + best_from(owner_idx + 1, challenger, owner_cards, trump, used));
        used[idx] = false;
    }
    best
}

/// Classify a response the way the server will: beat, partial, or discard.
pub fn classify_response(response: &[Card], owner_cards: &[Card], trump: Suit) -> ResponseOutcome {
    let beaten = max_beat_count(response, owner_cards, trump);
    if beaten == owner_cards.len() && !owner_cards.is_empty() && response.len() == owner_cards.len() {
        ResponseOutcome::Beat
    } else if beaten > 0 {
        ResponseOutcome::Partial
    } else {
        ResponseOutcome::Discard
    }
}

/// Spending cost of a set of cards: trumps are expensive, strong ranks slightly so.
pub fn play_cost(cards: &[Card], trump: Suit) -> u32 {
    cards
        .iter()
        .map(|c| {
            let trump_cost = if c.suit == trump { TRUMP_COST } else { 0 };
            trump_cost + u32::from(rank_strength(c.rank))
        })
        .sum()
}

fn trump_count(cards: &[Card], trump: Suit) -> usize {
    cards.iter().filter(|c| c.suit == trump).count()
}

/// Suggest a `required`-card response from `hand` against `owner_cards`.
///
/// Prefers the cheapest full cover of the owner's cards; without one, the
/// cheapest surrender (fewest trumps, then lowest cost). Ties keep the first
/// candidate in lexicographic subset order. Returns `None` when the hand
/// cannot supply `required` cards.
pub fn suggest_response(
    hand: &[Card],
    owner_cards: &[Card],
    required: usize,
    trump: Suit,
) -> Option<Vec<Card>> {
    if required == 0 || required > hand.len() || required > MAX_PLAY_SIZE {
        return None;
    }

    let mut best_win: Option<(u32, Vec<Card>)> = None;
    let mut best_loss: Option<((usize, u32), Vec<Card>)> = None;

    for indices in IndexSubsets::new(hand.len(), required) {
        let candidate: Vec<Card> = indices.iter().map(|&i| hand[i]).collect();
        let beaten = max_beat_count(&candidate, owner_cards, trump);
        let cost = play_cost(&candidate, trump);

        if beaten == owner_cards.len() && owner_cards.len() == required {
            if best_win.as_ref().map_or(true, |(c, _)| cost < *c) {
                best_win = Some((cost, candidate));
            }
            continue;
        }

        let key = (trump_count(&candidate, trump), cost);
        if best_loss.as_ref().map_or(true, |(k, _)| key < *k) {
            best_loss = Some((key, candidate));
        }
    }

    best_win
        .map(|(_, cards)| cards)
        .or_else(|| best_loss.map(|(_, cards)| cards))
}

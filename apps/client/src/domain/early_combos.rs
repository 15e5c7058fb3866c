//! Early-move combos: four-card sets that let a player ask to lead out of turn.

use std::cmp::Ordering;
use std::collections::HashSet;

use super::cards_logic::{ace_ten_counts, is_allowed_four_combo, rank_strength, same_suit};
use super::cards_types::{Card, Suit};
use super::subsets::subsets_of;
use crate::ws::protocol::ClientMsg;

const COMBO_SIZE: usize = 4;
const SUMMARY_SEPARATOR: &str = " · ";
const EARLY_TURN_MIN_ACES: usize = 1;
const EARLY_TURN_MIN_HIGH: usize = 3;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ComboPattern {
    SameSuit,
    AcesTens,
}

/// A legal four-card combo found in the hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EarlyCombo {
    /// In hand order.
    pub cards: Vec<Card>,
    pub pattern: ComboPattern,
    /// Set for same-suit combos only.
    pub suit: Option<Suit>,
    pub aces: usize,
    pub tens: usize,
    pub label: String,
    /// Ranks strongest first, e.g. `A · 10 · 9 · 6`.
    pub summary: String,
}

impl EarlyCombo {
    fn describe(cards: Vec<Card>) -> Self {
        let (aces, tens) = ace_ten_counts(&cards);
        let summary = summarize(&cards);
        match same_suit(&cards) {
            Some(suit) => Self {
                label: format!("{suit}×4"),
                pattern: ComboPattern::SameSuit,
                suit: Some(suit),
                cards,
                aces,
                tens,
                summary,
            },
            None => Self {
                label: ace_ten_label(aces, tens),
                pattern: ComboPattern::AcesTens,
                suit: None,
                cards,
                aces,
                tens,
                summary,
            },
        }
    }

    /// The `request_early_turn` action for this combo, if the server would grant it.
    ///
    /// Early turns are granted by suit: the hand must hold exactly four cards of
    /// the combo's suit, with at least one ace and at least three aces or tens.
    pub fn request_message(
        &self,
        hand: &[Card],
        player_id: &str,
        round_id: Option<&str>,
    ) -> Option<ClientMsg> {
        let suit = self.suit?;
        if !early_turn_eligible(hand, suit) {
            return None;
        }
        Some(ClientMsg::RequestEarlyTurn {
            player_id: player_id.to_string(),
            suit,
            round_id: round_id.map(str::to_string),
        })
    }

    fn canonical_key(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.cards.iter().map(Card::id).collect();
        ids.sort();
        ids
    }
}

/// Whether the server grants an early turn for `suit` given the whole hand.
pub fn early_turn_eligible(hand: &[Card], suit: Suit) -> bool {
    let suited: Vec<Card> = hand.iter().copied().filter(|c| c.suit == suit).collect();
    if suited.len() != COMBO_SIZE {
        return false;
    }
    let (aces, tens) = ace_ten_counts(&suited);
    aces >= EARLY_TURN_MIN_ACES && aces + tens >= EARLY_TURN_MIN_HIGH
}

fn ace_ten_label(aces: usize, tens: usize) -> String {
    match (aces, tens) {
        (4, 0) => "Four aces".to_string(),
        (3, 1) => "Three aces and a ten".to_string(),
        (2, 2) => "Two aces and two tens".to_string(),
        (1, 3) => "Ace and three tens".to_string(),
        _ => "Aces and tens".to_string(),
    }
}

/// Ranks of `cards` strongest first, joined with a middle dot.
pub fn summarize(cards: &[Card]) -> String {
    let mut ranks: Vec<_> = cards.iter().map(|c| c.rank).collect();
    ranks.sort_by(|a, b| rank_strength(*b).cmp(&rank_strength(*a)));
    ranks
        .iter()
        .map(|r| r.label())
        .collect::<Vec<_>>()
        .join(SUMMARY_SEPARATOR)
}

fn display_order(a: &EarlyCombo, b: &EarlyCombo) -> Ordering {
    match (a.pattern, b.pattern) {
        (ComboPattern::SameSuit, ComboPattern::AcesTens) => Ordering::Less,
        (ComboPattern::AcesTens, ComboPattern::SameSuit) => Ordering::Greater,
        (ComboPattern::SameSuit, ComboPattern::SameSuit) => a.suit.cmp(&b.suit),
        (ComboPattern::AcesTens, ComboPattern::AcesTens) => b
            .aces
            .cmp(&a.aces)
            .then_with(|| b.tens.cmp(&a.tens))
            .then_with(|| a.summary.cmp(&b.summary)),
    }
}

/// Every legal four-card combo in `hand`, deduplicated and in display order.
///
/// Same-suit combos come first by suit priority (keeping enumeration order
/// within a suit), then ace/ten combos by aces, tens, and summary.
pub fn enumerate_early_combos(hand: &[Card]) -> Vec<EarlyCombo> {
    let mut seen = HashSet::new();
    let mut combos: Vec<EarlyCombo> = subsets_of(hand, COMBO_SIZE)
        .filter(|cards| is_allowed_four_combo(cards))
        .map(EarlyCombo::describe)
        .filter(|combo| seen.insert(combo.canonical_key()))
        .collect();
    // sort_by is stable
    combos.sort_by(display_order);
    combos
}

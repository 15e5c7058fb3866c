//! Combination declarations made before the first trick of a round.
//!
//! The server owns scoring and re-checks every declaration; these helpers
//! predict which declarations the local hand supports so the UI can offer them.

use serde::{Deserialize, Serialize};

use super::cards_types::{Card, Rank, Suit};

const COMBO_CARDS: usize = 4;
const MOSCOW_ACES: usize = 3;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComboKind {
    /// Four trumps.
    Bura,
    /// Four cards of one suit.
    Molodka,
    /// Three aces including the trump ace.
    Moscow,
    /// Four tens or four aces.
    FourEnds,
}

impl ComboKind {
    pub const ALL: [ComboKind; 4] = [
        ComboKind::Bura,
        ComboKind::Molodka,
        ComboKind::Moscow,
        ComboKind::FourEnds,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            ComboKind::Bura => "Bura",
            ComboKind::Molodka => "Molodka",
            ComboKind::Moscow => "Moscow",
            ComboKind::FourEnds => "Four ends",
        }
    }
}

fn of_rank(hand: &[Card], rank: Rank) -> Vec<Card> {
    hand.iter().copied().filter(|c| c.rank == rank).collect()
}

fn of_suit(hand: &[Card], suit: Suit) -> Vec<Card> {
    hand.iter().copied().filter(|c| c.suit == suit).collect()
}

/// Cards backing a declaration of `kind`, in hand order, or `None` when the hand lacks it.
pub fn declaration_cards(hand: &[Card], kind: ComboKind, trump: Option<Suit>) -> Option<Vec<Card>> {
    let mut cards = match kind {
        ComboKind::Bura => of_suit(hand, trump?),
        ComboKind::Molodka => Suit::ALL
            .iter()
            .map(|&suit| of_suit(hand, suit))
            .find(|cards| cards.len() >= COMBO_CARDS)?,
        ComboKind::Moscow => {
            let aces = of_rank(hand, Rank::Ace);
            let has_trump_ace = trump.is_some_and(|t| aces.iter().any(|c| c.suit == t));
            if aces.len() < MOSCOW_ACES || !has_trump_ace {
                return None;
            }
            return Some(aces.into_iter().take(MOSCOW_ACES).collect());
        }
        ComboKind::FourEnds => [Rank::Ten, Rank::Ace]
            .iter()
            .map(|&rank| of_rank(hand, rank))
            .find(|cards| cards.len() == COMBO_CARDS)?,
    };
    if cards.len() < COMBO_CARDS {
        return None;
    }
    cards.truncate(COMBO_CARDS);
    Some(cards)
}

/// Declarations the hand supports. `four_ends_enabled` mirrors the table option.
pub fn available_declarations(
    hand: &[Card],
    trump: Option<Suit>,
    four_ends_enabled: bool,
) -> Vec<ComboKind> {
    ComboKind::ALL
        .into_iter()
        .filter(|&kind| kind != ComboKind::FourEnds || four_ends_enabled)
        .filter(|&kind| declaration_cards(hand, kind, trump).is_some())
        .collect()
}

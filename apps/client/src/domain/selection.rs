//! Validation and editing of the cards a player is composing into a play.

use thiserror::Error;

use super::cards_logic::{is_allowed_four_combo, same_suit, MAX_PLAY_SIZE};
use super::cards_types::Card;
use super::leader::MAX_LEAD_CARDS;
use super::trick_context::PlayMode;

/// Why a selection cannot be sent. `Display` is the text shown next to the hand.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("{hint}")]
    Empty { hint: String },
    #[error("At most {max} cards can be played at once", max = MAX_PLAY_SIZE)]
    TooMany { selected: usize },
    #[error("Selected card is no longer in your hand")]
    StaleIndex { index: usize },
    #[error("The same card is selected twice")]
    Duplicate { index: usize },
    #[error("Leading cards must share one suit")]
    MixedSuits,
    #[error("These four cards are not an allowed combo")]
    IllegalCombo,
    #[error("You must play exactly {required} {noun}", noun = card_noun(*.required))]
    WrongCount { required: usize, selected: usize },
}

fn card_noun(n: usize) -> &'static str {
    if n == 1 {
        "card"
    } else {
        "cards"
    }
}

/// Prompt shown when nothing is selected yet.
pub fn selection_hint(mode: &PlayMode) -> String {
    match mode {
        PlayMode::Leader => {
            "Select up to three cards of one suit, or four cards for a combo".to_string()
        }
        PlayMode::Responder { required, .. } => {
            format!("Select {required} {} to answer", card_noun(*required))
        }
    }
}

/// Check a selection of hand indices against the current mode.
///
/// On success returns the selected cards in selection order, ready to send.
pub fn evaluate_selection(
    hand: &[Card],
    selected: &[usize],
    mode: &PlayMode,
) -> Result<Vec<Card>, SelectionError> {
    if selected.is_empty() {
        return Err(SelectionError::Empty {
            hint: selection_hint(mode),
        });
    }
    if selected.len() > MAX_PLAY_SIZE {
        return Err(SelectionError::TooMany {
            selected: selected.len(),
        });
    }

    let mut cards = Vec::with_capacity(selected.len());
    for (pos, &index) in selected.iter().enumerate() {
        if selected[..pos].contains(&index) {
            return Err(SelectionError::Duplicate { index });
        }
        let card = hand
            .get(index)
            .copied()
            .ok_or(SelectionError::StaleIndex { index })?;
        cards.push(card);
    }

    match mode {
        PlayMode::Leader if cards.len() == MAX_PLAY_SIZE => {
            if !is_allowed_four_combo(&cards) {
                return Err(SelectionError::IllegalCombo);
            }
        }
        PlayMode::Leader => {
            if same_suit(&cards).is_none() {
                return Err(SelectionError::MixedSuits);
            }
        }
        PlayMode::Responder { required, .. } => {
            if cards.len() != *required {
                return Err(SelectionError::WrongCount {
                    required: *required,
                    selected: cards.len(),
                });
            }
        }
    }

    Ok(cards)
}

/// Hand indices the user has picked, in pick order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    indices: Vec<usize>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }

    pub fn clear(&mut self) {
        self.indices.clear();
    }

    /// Drop indices that fall outside a hand of `hand_len` cards.
    pub fn retain_within(&mut self, hand_len: usize) {
        self.indices.retain(|&i| i < hand_len);
    }

    pub fn cards(&self, hand: &[Card]) -> Vec<Card> {
        self.indices.iter().filter_map(|&i| hand.get(i).copied()).collect()
    }

    /// Toggle a card in or out. Returns whether the selection changed.
    ///
    /// Responders cannot exceed the required count. Leaders restart the
    /// selection when it is full or when the new card could never form a
    /// valid play with the cards already picked.
    pub fn toggle(&mut self, index: usize, hand: &[Card], mode: &PlayMode) -> bool {
        let Some(&card) = hand.get(index) else {
            return false;
        };
        if let Some(pos) = self.indices.iter().position(|&i| i == index) {
            self.indices.remove(pos);
            return true;
        }

        match mode {
            PlayMode::Responder { required, .. } => {
                if self.indices.len() >= *required {
                    return false;
                }
                self.indices.push(index);
            }
            PlayMode::Leader => {
                let current = self.cards(hand);
                let full = current.len() >= MAX_PLAY_SIZE;
                let suit_break = current.first().is_some_and(|first| first.suit != card.suit);
                // Mixed suits only work as an ace/ten combo.
                let ace_ten_path = current
                    .iter()
                    .chain(std::iter::once(&card))
                    .all(|c| c.is_ace() || c.is_ten());
                let single_suit_full = same_suit(&current).is_some()
                    && current.len() >= MAX_LEAD_CARDS
                    && card.suit != current[0].suit;

                if full || (suit_break && !ace_ten_path) || single_suit_full {
                    self.indices.clear();
                }
                self.indices.push(index);
            }
        }
        true
    }
}

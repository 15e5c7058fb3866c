//! Wire model of the room snapshot the server pushes and serves over HTTP.
//!
//! Every field is lenient: missing fields take defaults and unknown fields are
//! ignored, so older or newer servers still decode.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::{Card, ComboKind, Rank, Suit};
use crate::errors::domain::{DomainError, ValidationKind};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameState {
    pub room_id: String,
    pub room_name: String,
    pub started: bool,
    pub config: Option<TableConfig>,
    pub players: Vec<Player>,
    pub me: Option<Player>,
    pub trump: Option<Suit>,
    pub trump_card: Option<HandCard>,
    pub table_cards: Vec<PublicCard>,
    pub deck_count: u32,
    /// The viewer's own hand; absent for spectators.
    pub hands: Option<Vec<HandCard>>,
    pub hand_counts: HashMap<String, u32>,
    pub turn_player_id: Option<String>,
    pub winner_id: Option<String>,
    pub scores: HashMap<String, i32>,
    pub trick: Option<TrickState>,
    /// Tricks started this round; zero until the first play.
    pub trick_index: u32,
    pub discard_count: u32,
    pub taken_counts: HashMap<String, u32>,
    pub round_points: HashMap<String, i32>,
    pub announcements: Vec<Announcement>,
    pub turn_deadline_ts: Option<f64>,
    pub round_number: u32,
    pub round_id: Option<String>,
    pub match_over: bool,
    pub winners: Vec<String>,
    pub losers: Vec<String>,
    pub last_trick_winner_id: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TableConfig {
    pub max_players: u8,
    pub discard_visibility: String,
    pub enable_four_ends: bool,
    pub turn_timeout_sec: u32,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            max_players: 3,
            discard_visibility: "open".to_string(),
            enable_four_ends: true,
            turn_timeout_sec: 40,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seat: Option<u32>,
}

/// A card in the viewer's hand, with the server's display metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HandCard {
    #[serde(default)]
    pub id: String,
    pub suit: Suit,
    pub rank: Rank,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl HandCard {
    pub fn card(&self) -> Card {
        Card::new(self.rank, self.suit)
    }
}

impl From<Card> for HandCard {
    fn from(card: Card) -> Self {
        Self {
            id: card.id(),
            suit: card.suit,
            rank: card.rank,
            color: Some(if card.suit.is_red() { "red" } else { "black" }.to_string()),
            image_url: None,
        }
    }
}

/// A card on the table; face-down cards carry no suit or rank.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PublicCard {
    pub card_id: Option<String>,
    pub face_up: Option<bool>,
    pub suit: Option<Suit>,
    pub rank: Option<Rank>,
    pub hidden: bool,
}

impl PublicCard {
    pub fn face_up(card: Card) -> Self {
        Self {
            card_id: Some(card.id()),
            face_up: Some(true),
            suit: Some(card.suit),
            rank: Some(card.rank),
            hidden: false,
        }
    }

    pub fn hidden() -> Self {
        Self {
            face_up: Some(false),
            hidden: true,
            ..Self::default()
        }
    }
}

impl TryFrom<&PublicCard> for Card {
    type Error = DomainError;

    fn try_from(value: &PublicCard) -> Result<Self, Self::Error> {
        match (value.hidden, value.suit, value.rank) {
            (false, Some(suit), Some(rank)) => Ok(Card::new(rank, suit)),
            _ => Err(DomainError::validation(
                ValidationKind::HiddenCard,
                format!(
                    "card {} is face down",
                    value.card_id.as_deref().unwrap_or("?")
                ),
            )),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlayOutcome {
    #[default]
    Lead,
    Beat,
    Partial,
    Discard,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrickPlay {
    pub player_id: String,
    #[serde(default)]
    pub seat: u32,
    #[serde(default)]
    pub cards: Vec<PublicCard>,
    #[serde(default)]
    pub outcome: PlayOutcome,
    #[serde(default)]
    pub owner: bool,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrickState {
    pub leader_id: String,
    #[serde(default)]
    pub leader_seat: u32,
    pub owner_id: String,
    #[serde(default)]
    pub owner_seat: u32,
    pub required_count: usize,
    #[serde(default)]
    pub trick_index: u32,
    #[serde(default)]
    pub plays: Vec<TrickPlay>,
}

impl TrickState {
    /// Face-up cards of the current owner's play.
    ///
    /// Falls back to the last play by `owner_id` when no play is flagged as owner.
    pub fn owner_cards(&self) -> Vec<Card> {
        let play = self
            .plays
            .iter()
            .find(|p| p.owner)
            .or_else(|| self.plays.iter().rev().find(|p| p.player_id == self.owner_id));
        play.map(|p| p.cards.iter().filter_map(|c| Card::try_from(c).ok()).collect())
            .unwrap_or_default()
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Announcement {
    pub player_id: String,
    pub combo: ComboKind,
    #[serde(default)]
    pub cards: Vec<Card>,
}

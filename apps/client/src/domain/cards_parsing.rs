//! Card parsing from short text tokens (e.g., "AS", "TD", "6♥")

use std::str::FromStr;

use super::cards_types::{Card, Rank, Suit};
use crate::errors::domain::{DomainError, ValidationKind};

impl FromStr for Suit {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "♠" | "S" => Ok(Suit::Spades),
            "♥" | "H" => Ok(Suit::Hearts),
            "♦" | "D" => Ok(Suit::Diamonds),
            "♣" | "C" => Ok(Suit::Clubs),
            _ => Err(DomainError::validation(
                ValidationKind::ParseSuit,
                format!("Invalid suit: {s}"),
            )),
        }
    }
}

impl FromStr for Rank {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "6" => Ok(Rank::Six),
            "7" => Ok(Rank::Seven),
            "8" => Ok(Rank::Eight),
            "9" => Ok(Rank::Nine),
            "T" | "10" => Ok(Rank::Ten),
            "J" => Ok(Rank::Jack),
            "Q" => Ok(Rank::Queen),
            "K" => Ok(Rank::King),
            "A" => Ok(Rank::Ace),
            _ => Err(DomainError::validation(
                ValidationKind::ParseRank,
                format!("Invalid rank: {s}"),
            )),
        }
    }
}

impl FromStr for Card {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_err =
            || DomainError::validation(ValidationKind::ParseCard, format!("Parse card: {s}"));

        // Suit is always the last character; it may be a multi-byte symbol.
        let (split, suit_ch) = s.char_indices().next_back().ok_or_else(parse_err)?;
        let rank_part = &s[..split];
        if rank_part.is_empty() {
            return Err(parse_err());
        }
        let mut buf = [0u8; 4];
        let suit = suit_ch
            .encode_utf8(&mut buf)
            .parse::<Suit>()
            .map_err(|_| parse_err())?;
        let rank = rank_part.parse::<Rank>().map_err(|_| parse_err())?;
        Ok(Card { suit, rank })
    }
}

/// Non-panicking helper to parse card tokens (e.g., "AS", "6C") into Card instances.
/// Returns Result<Vec<Card>, DomainError> if any token is invalid.
pub fn try_parse_cards<I, S>(tokens: I) -> Result<Vec<Card>, DomainError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tokens
        .into_iter()
        .map(|s| s.as_ref().parse::<Card>())
        .collect()
}

/// Test helper: parse tokens that are known to be valid.
#[cfg(test)]
pub fn parse_cards(tokens: &[&str]) -> Vec<Card> {
    try_parse_cards(tokens).expect("valid card tokens")
}

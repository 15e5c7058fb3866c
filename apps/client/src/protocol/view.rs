//! Player-relative view of a snapshot: what the engines need and nothing else.

use crate::domain::{
    available_declarations, enumerate_early_combos, suggest_leader_open, suggest_response, Card,
    ComboKind, EarlyCombo, PlayMode, Suit, TrickContext,
};
use crate::protocol::game_state::{GameState, HandCard};
use crate::ws::protocol::ClientMsg;

#[derive(Debug, Clone, PartialEq)]
pub struct TableView {
    pub player_id: Option<String>,
    pub hand: Vec<Card>,
    pub trump: Option<Suit>,
    /// Set when another player owns the current trick and we must answer.
    pub trick: Option<TrickContext>,
    pub my_turn: bool,
    pub started: bool,
    pub round_id: Option<String>,
    pub trick_index: Option<u32>,
    /// Tricks started this round, in progress or finished.
    pub round_tricks: u32,
    /// Combos this player already announced this round.
    pub announced: Vec<ComboKind>,
    pub four_ends_enabled: bool,
}

impl TableView {
    pub fn from_snapshot(state: &GameState) -> Self {
        let player_id = state.me.as_ref().map(|p| p.id.clone());
        let hand = state
            .hands
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(HandCard::card)
            .collect();
        let trick = state.trick.as_ref().and_then(|t| {
            if player_id.as_deref() == Some(t.owner_id.as_str()) {
                return None;
            }
            Some(TrickContext {
                leader_id: t.leader_id.clone(),
                owner_id: t.owner_id.clone(),
                owner_cards: t.owner_cards(),
                required_count: t.required_count,
                trick_index: t.trick_index,
            })
        });
        let announced = state
            .announcements
            .iter()
            .filter(|a| Some(a.player_id.as_str()) == player_id.as_deref())
            .map(|a| a.combo)
            .collect();
        let my_turn = match (&player_id, &state.turn_player_id) {
            (Some(me), Some(turn)) => me == turn,
            _ => false,
        };

        Self {
            player_id,
            hand,
            trump: state.trump,
            trick,
            my_turn,
            started: state.started,
            round_id: state.round_id.clone(),
            trick_index: state.trick.as_ref().map(|t| t.trick_index),
            round_tricks: state.trick_index,
            announced,
            four_ends_enabled: state
                .config
                .as_ref()
                .map_or(true, |c| c.enable_four_ends),
        }
    }

    pub fn play_mode(&self) -> PlayMode {
        PlayMode::from_trick(self.trick.as_ref())
    }

    /// Suggested play for the current mode. `seed` only matters when leading.
    pub fn suggested_play(&self, seed: Option<Card>) -> Option<Vec<Card>> {
        let trump = self.trump?;
        match self.play_mode() {
            PlayMode::Leader => suggest_leader_open(&self.hand, seed, trump),
            PlayMode::Responder {
                owner_cards,
                required,
            } => suggest_response(&self.hand, &owner_cards, required, trump),
        }
    }

    /// Early-turn combos, offered only while waiting between tricks.
    pub fn early_combos(&self) -> Vec<EarlyCombo> {
        if !self.started || self.my_turn || self.trick_index.is_some() {
            return Vec::new();
        }
        enumerate_early_combos(&self.hand)
    }

    /// Declarations the server would accept now: before the round's first
    /// trick, and each kind once.
    pub fn declarations(&self) -> Vec<ComboKind> {
        if !self.started || self.trick_index.is_some() || self.round_tricks > 0 {
            return Vec::new();
        }
        available_declarations(&self.hand, self.trump, self.four_ends_enabled)
            .into_iter()
            .filter(|kind| !self.announced.contains(kind))
            .collect()
    }

    pub fn play_message(&self, cards: Vec<Card>) -> Option<ClientMsg> {
        Some(ClientMsg::PlayCards {
            player_id: self.player_id.clone()?,
            cards,
            round_id: self.round_id.clone(),
            trick_index: self.trick_index,
        })
    }

    pub fn declare_message(&self, combo: ComboKind) -> Option<ClientMsg> {
        Some(ClientMsg::Declare {
            player_id: self.player_id.clone()?,
            combo,
        })
    }

    pub fn early_turn_message(&self, combo: &EarlyCombo) -> Option<ClientMsg> {
        let player_id = self.player_id.as_deref()?;
        combo.request_message(&self.hand, player_id, self.round_id.as_deref())
    }
}

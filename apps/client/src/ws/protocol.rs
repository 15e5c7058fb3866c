use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{Card, ComboKind, Rank, Suit};
use crate::protocol::game_state::GameState;

/// Actions sent from the client to the room socket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMsg {
    Ping,
    PlayCards {
        player_id: String,
        cards: Vec<Card>,
        /// Round and trick ids let the server drop stale or replayed plays.
        #[serde(rename = "roundId", default, skip_serializing_if = "Option::is_none")]
        round_id: Option<String>,
        #[serde(rename = "trickIndex", default, skip_serializing_if = "Option::is_none")]
        trick_index: Option<u32>,
    },
    Declare {
        player_id: String,
        combo: ComboKind,
    },
    RequestEarlyTurn {
        player_id: String,
        suit: Suit,
        #[serde(rename = "roundId", default, skip_serializing_if = "Option::is_none")]
        round_id: Option<String>,
    },
}

impl ClientMsg {
    pub fn to_text(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Typed room events other than state snapshots.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerEvent {
    /// The server rejected the last action.
    Error { error: String },
    EarlyTurnGranted {
        player_id: String,
        suit: Option<Suit>,
        card_ids: Vec<String>,
        ranks: Vec<Rank>,
    },
    /// Any other typed message, passed through untouched.
    Other { kind: String, body: Value },
}

impl ServerEvent {
    pub fn kind(&self) -> &str {
        match self {
            ServerEvent::Error { .. } => "error",
            ServerEvent::EarlyTurnGranted { .. } => EARLY_TURN_GRANTED,
            ServerEvent::Other { kind, .. } => kind,
        }
    }
}

/// A decoded inbound frame.
#[allow(clippy::large_enum_variant)]
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    State(Box<GameState>),
    Event(ServerEvent),
}

const STATE: &str = "state";
const EARLY_TURN_GRANTED: &str = "EARLY_TURN_GRANTED";

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct EarlyTurnBody {
    #[serde(default)]
    player_id: String,
    #[serde(default)]
    suit: Option<Suit>,
    #[serde(default)]
    card_ids: Vec<String>,
    #[serde(default)]
    ranks: Vec<Rank>,
}

/// Decode one text frame.
///
/// Returns `None` for frames that are not JSON objects with a string `type`,
/// and for `state` frames whose payload does not decode. A `state` frame
/// without a payload is passed through as an event.
pub fn decode_inbound(text: &str) -> Option<Inbound> {
    let value: Value = serde_json::from_str(text).ok()?;
    let kind = value.get("type")?.as_str()?.to_string();

    match kind.as_str() {
        STATE => match value.get("payload") {
            None | Some(Value::Null) => {
                Some(Inbound::Event(ServerEvent::Other { kind, body: value }))
            }
            Some(payload) => {
                let state: GameState = serde_json::from_value(payload.clone()).ok()?;
                Some(Inbound::State(Box::new(state)))
            }
        },
        "error" => {
            let error = value
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            Some(Inbound::Event(ServerEvent::Error { error }))
        }
        EARLY_TURN_GRANTED => match serde_json::from_value::<EarlyTurnBody>(value.clone()) {
            Ok(body) => Some(Inbound::Event(ServerEvent::EarlyTurnGranted {
                player_id: body.player_id,
                suit: body.suit,
                card_ids: body.card_ids,
                ranks: body.ranks,
            })),
            Err(_) => Some(Inbound::Event(ServerEvent::Other { kind, body: value })),
        },
        _ => Some(Inbound::Event(ServerEvent::Other { kind, body: value })),
    }
}

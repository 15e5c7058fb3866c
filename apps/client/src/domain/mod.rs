//! Domain layer: card types and the pure combination engines.

pub mod cards_logic;
pub mod cards_parsing;
pub mod cards_serde;
pub mod cards_types;
pub mod declarations;
pub mod early_combos;
pub mod leader;
pub mod response;
pub mod selection;
pub mod subsets;
pub mod trick_context;

#[cfg(test)]
mod tests_props_response;

// Re-exports for ergonomics
pub use cards_logic::{card_beats, hand_has_suit, is_allowed_four_combo, rank_strength, MAX_PLAY_SIZE};
pub use cards_types::{Card, Rank, Suit};
pub use declarations::{available_declarations, declaration_cards, ComboKind};
pub use early_combos::{enumerate_early_combos, ComboPattern, EarlyCombo};
pub use leader::suggest_leader_open;
pub use response::{classify_response, suggest_response, ResponseOutcome};
pub use selection::{evaluate_selection, Selection, SelectionError};
pub use trick_context::{PlayMode, TrickContext};

pub mod game_state;
pub mod view;

pub use game_state::{GameState, HandCard, Player, PublicCard, TrickPlay, TrickState};
pub use view::TableView;

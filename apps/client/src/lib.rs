#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod config;
pub mod domain;
pub mod error;
pub mod errors;
pub mod http;
pub mod protocol;
pub mod telemetry;
pub mod ws;


// Re-exports for public API
pub use config::{ChannelTimings, ClientConfig};
pub use domain::{
    enumerate_early_combos, evaluate_selection, suggest_leader_open, suggest_response, Card,
    PlayMode, Rank, Suit,
};
pub use error::ClientError;
pub use http::{HttpStateClient, StateFetcher};
pub use protocol::{GameState, TableView};
pub use ws::{
    ChannelListener, ClientMsg, ConnectionStatus, RoomChannel, RoomController, RoomIdentity,
    ServerEvent, Transport, WebSocketTransport,
};

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    test_bootstrap::logging::init();
}

pub mod state_client;

pub use state_client::{HttpStateClient, StateFetcher};

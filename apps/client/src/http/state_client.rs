//! HTTP pulls of the room snapshot.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use tracing::debug;

use crate::error::ClientError;
use crate::protocol::game_state::GameState;

/// Header the server reads the viewer's player id from.
pub const USER_ID_HEADER: &str = "x-user-id";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[async_trait]
pub trait StateFetcher: Send + Sync {
    async fn fetch_state(&self, room_id: &str, player_id: &str) -> Result<GameState, ClientError>;
}

#[derive(Debug, Clone)]
pub struct HttpStateClient {
    http: reqwest::Client,
    api_base: Url,
}

impl HttpStateClient {
    pub fn new(api_base: &str) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Self::with_client(http, api_base)
    }

    pub fn with_client(http: reqwest::Client, api_base: &str) -> Result<Self, ClientError> {
        let api_base = Url::parse(api_base.trim_end_matches('/'))
            .map_err(|e| ClientError::config(format!("invalid API base '{api_base}': {e}")))?;
        if api_base.cannot_be_a_base() {
            return Err(ClientError::config(format!(
                "API base '{api_base}' cannot carry a path"
            )));
        }
        Ok(Self { http, api_base })
    }

    /// `{api}/api/game/state/{room_id}` with the room id as one escaped segment.
    pub fn state_url(&self, room_id: &str) -> Url {
        let mut url = self.api_base.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments
                .pop_if_empty()
                .extend(["api", "game", "state", room_id]);
        }
        url
    }
}

#[async_trait]
impl StateFetcher for HttpStateClient {
    async fn fetch_state(&self, room_id: &str, player_id: &str) -> Result<GameState, ClientError> {
        let url = self.state_url(room_id);
        debug!(room_id, url = %url, "[STATE] pulling snapshot");
        let state = self
            .http
            .get(url)
            .header(USER_ID_HEADER, player_id)
            .send()
            .await?
            .error_for_status()?
            .json::<GameState>()
            .await?;
        Ok(state)
    }
}

use thiserror::Error;

use crate::errors::domain::DomainError;

/// Errors surfaced by configuration, transports, and state pulls.
///
/// Channel internals log these and fold them into status changes; only
/// setup paths (config loading, CLI) return them to callers.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Configuration error: {detail}")]
    Config { detail: String },
    #[error("Transport error: {detail}")]
    Transport { detail: String },
    #[error("HTTP error: {detail}")]
    Http {
        detail: String,
        status: Option<u16>,
    },
    #[error("Protocol error: {detail}")]
    Protocol { detail: String },
    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),
}

impl ClientError {
    pub fn config(detail: String) -> Self {
        Self::Config { detail }
    }

    pub fn transport(detail: String) -> Self {
        Self::Transport { detail }
    }

    pub fn http(detail: String, status: Option<u16>) -> Self {
        Self::Http { detail, status }
    }

    pub fn protocol(detail: String) -> Self {
        Self::Protocol { detail }
    }

    /// Short machine-readable code, used as a log field.
    pub fn code(&self) -> &'static str {
        match self {
            ClientError::Config { .. } => "CONFIG_ERROR",
            ClientError::Transport { .. } => "TRANSPORT_ERROR",
            ClientError::Http { .. } => "HTTP_ERROR",
            ClientError::Protocol { .. } => "PROTOCOL_ERROR",
            ClientError::Domain(_) => "DOMAIN_ERROR",
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        let status = e.status().map(|s| s.as_u16());
        Self::http(e.to_string(), status)
    }
}

impl From<tokio_tungstenite::tungstenite::Error> for ClientError {
    fn from(e: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::transport(e.to_string())
    }
}

impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        Self::protocol(e.to_string())
    }
}

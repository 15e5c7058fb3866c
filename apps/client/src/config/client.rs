use std::env;
use std::time::Duration;

use crate::error::ClientError;

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 3_000;
pub const DEFAULT_KEEPALIVE_INTERVAL_MS: u64 = 20_000;
pub const DEFAULT_RECONNECT_BASE_MS: u64 = 500;
pub const DEFAULT_RECONNECT_CAP_MS: u64 = 8_000;

/// Timer settings for one room channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelTimings {
    pub poll_interval: Duration,
    pub keepalive_interval: Duration,
    pub reconnect_base: Duration,
    pub reconnect_cap: Duration,
}

impl ChannelTimings {
    /// Every interval must be non-zero and the reconnect cap at least the base.
    pub fn validate(&self) -> Result<(), ClientError> {
        for (name, value) in [
            ("poll_interval", self.poll_interval),
            ("keepalive_interval", self.keepalive_interval),
            ("reconnect_base", self.reconnect_base),
            ("reconnect_cap", self.reconnect_cap),
        ] {
            if value.is_zero() {
                return Err(ClientError::config(format!("{name} must be greater than zero")));
            }
        }
        if self.reconnect_cap < self.reconnect_base {
            return Err(ClientError::config(format!(
                "reconnect_cap ({}ms) must not be below reconnect_base ({}ms)",
                self.reconnect_cap.as_millis(),
                self.reconnect_base.as_millis()
            )));
        }
        Ok(())
    }
}

impl Default for ChannelTimings {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            keepalive_interval: Duration::from_millis(DEFAULT_KEEPALIVE_INTERVAL_MS),
            reconnect_base: Duration::from_millis(DEFAULT_RECONNECT_BASE_MS),
            reconnect_cap: Duration::from_millis(DEFAULT_RECONNECT_CAP_MS),
        }
    }
}

/// Server endpoints plus channel timings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Websocket origin, e.g. `wss://bura.example.com`.
    pub ws_base: String,
    /// HTTP origin for state pulls.
    pub api_base: String,
    pub timings: ChannelTimings,
}

impl ClientConfig {
    pub fn new(ws_base: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            ws_base: ws_base.into(),
            api_base: api_base.into(),
            timings: ChannelTimings::default(),
        }
    }

    /// Load from `BURA_*` environment variables.
    pub fn from_env() -> Result<Self, ClientError> {
        let ws_base = must_var("BURA_WS_BASE")?;
        let api_base = must_var("BURA_API_BASE")?;

        let timings = ChannelTimings {
            poll_interval: millis_var("BURA_POLL_INTERVAL_MS", DEFAULT_POLL_INTERVAL_MS)?,
            keepalive_interval: millis_var(
                "BURA_KEEPALIVE_INTERVAL_MS",
                DEFAULT_KEEPALIVE_INTERVAL_MS,
            )?,
            reconnect_base: millis_var("BURA_RECONNECT_BASE_MS", DEFAULT_RECONNECT_BASE_MS)?,
            reconnect_cap: millis_var("BURA_RECONNECT_CAP_MS", DEFAULT_RECONNECT_CAP_MS)?,
        };
        if timings.reconnect_cap < timings.reconnect_base {
            return Err(ClientError::config(format!(
                "BURA_RECONNECT_CAP_MS ({}) must not be below BURA_RECONNECT_BASE_MS ({})",
                timings.reconnect_cap.as_millis(),
                timings.reconnect_base.as_millis()
            )));
        }

        Ok(Self {
            ws_base,
            api_base,
            timings,
        })
    }
}

/// Get required environment variable or return error
fn must_var(name: &str) -> Result<String, ClientError> {
    let value = env::var(name).map_err(|_| {
        ClientError::config(format!("Required environment variable '{name}' is not set"))
    })?;
    if value.trim().is_empty() {
        return Err(ClientError::config(format!(
            "Environment variable '{name}' is empty"
        )));
    }
    Ok(value)
}

/// Positive millisecond duration from the environment, or the default when unset.
fn millis_var(name: &str, default: u64) -> Result<Duration, ClientError> {
    let ms = match env::var(name) {
        Ok(raw) => raw.trim().parse::<u64>().map_err(|_| {
            ClientError::config(format!("'{name}' must be a number of milliseconds, got '{raw}'"))
        })?,
        Err(_) => default,
    };
    if ms == 0 {
        return Err(ClientError::config(format!("'{name}' must be greater than zero")));
    }
    Ok(Duration::from_millis(ms))
}

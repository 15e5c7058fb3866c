#![allow(dead_code)]


use std::time::Duration;

use bura_client::{ChannelTimings, ClientConfig};

pub const WS_BASE: &str = "ws://bura.test/";
pub const API_BASE: &str = "http://bura.test";

pub fn test_config() -> ClientConfig {
    ClientConfig::new(WS_BASE, API_BASE)
}

/// Config whose reconnects are far enough out not to interfere with poll timing.
pub fn slow_reconnect_config() -> ClientConfig {
    ClientConfig {
        timings: ChannelTimings {
            reconnect_base: Duration::from_secs(600),
            reconnect_cap: Duration::from_secs(600),
            ..ChannelTimings::default()
        },
        ..test_config()
    }
}

/// Let the driver task drain its queue. With paused time this advances the clock by 1ms.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}

pub async fn advance(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

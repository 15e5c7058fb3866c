//! Connection state machine for a room channel.
//!
//! The machine owns no sockets or timers. The driver feeds it events and
//! carries out the effects it returns, in order. This keeps every transition
//! testable without a network.

use std::fmt;
use std::time::Duration;

use tracing::{debug, warn};

use crate::config::ChannelTimings;
use crate::protocol::game_state::GameState;
use crate::ws::protocol::{decode_inbound, ClientMsg, Inbound, ServerEvent};

/// Exponent cap for the reconnect backoff; keeps the shift far from overflow.
const MAX_BACKOFF_EXPONENT: u32 = 13;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Disconnected,
    Connecting,
    Connected,
}

impl ConnectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionStatus::Disconnected => "disconnected",
            ConnectionStatus::Connecting => "connecting",
            ConnectionStatus::Connected => "connected",
        }
    }
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Not started.
    Idle,
    /// A connect attempt is in flight.
    Connecting,
    /// The push link is open.
    Open,
    /// Link lost; a reconnect is scheduled.
    Waiting,
    /// Torn down. Terminal.
    Closed,
}

/// Exponential reconnect delay: `min(cap, base * 2^min(attempts, 13))`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    pub base: Duration,
    pub cap: Duration,
}

impl Backoff {
    pub fn delay(&self, attempts: u32) -> Duration {
        let factor = 1u32 << attempts.min(MAX_BACKOFF_EXPONENT);
        self.base.saturating_mul(factor).min(self.cap)
    }
}

impl From<&ChannelTimings> for Backoff {
    fn from(t: &ChannelTimings) -> Self {
        Self {
            base: t.reconnect_base,
            cap: t.reconnect_cap,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChannelEvent {
    Start,
    /// The push link finished its handshake.
    Opened,
    /// The push link closed cleanly.
    Closed,
    /// Connecting failed or the link errored.
    Failed,
    ReconnectDue,
    KeepaliveTick,
    PollTick,
    Inbound(String),
    Fetched(Box<GameState>),
    SendFailed,
    Close,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    Connect,
    FetchState,
    /// (Re)start the poll loop; any previous loop is replaced.
    StartPolling,
    StopPolling,
    StartKeepalive,
    StopKeepalive,
    ScheduleReconnect(Duration),
    CancelReconnect,
    Transmit(String),
    EmitState(Box<GameState>),
    EmitEvent(ServerEvent),
    EmitStatus(ConnectionStatus),
    CloseTransport,
}

#[derive(Debug)]
pub struct ChannelMachine {
    backoff: Backoff,
    phase: Phase,
    status: ConnectionStatus,
    attempts: u32,
    polling: bool,
    keepalive: bool,
    reconnect_pending: bool,
}

impl ChannelMachine {
    pub fn new(backoff: Backoff) -> Self {
        Self {
            backoff,
            phase: Phase::Idle,
            status: ConnectionStatus::Disconnected,
            attempts: 0,
            polling: false,
            keepalive: false,
            reconnect_pending: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn status(&self) -> ConnectionStatus {
        self.status
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    pub fn is_polling(&self) -> bool {
        self.polling
    }

    pub fn handle(&mut self, event: ChannelEvent) -> Vec<Effect> {
        let mut fx = Vec::new();
        if self.phase == Phase::Closed {
            debug!(?event, "[CHANNEL] event after close ignored");
            return fx;
        }

        match event {
            ChannelEvent::Start => {
                if self.phase != Phase::Idle {
                    return fx;
                }
                self.begin_connect(&mut fx);
                // The first pull runs whether or not the push link comes up.
                fx.push(Effect::FetchState);
            }
            ChannelEvent::Opened => {
                if self.phase != Phase::Connecting {
                    return fx;
                }
                self.phase = Phase::Open;
                self.attempts = 0;
                if self.polling {
                    self.polling = false;
                    fx.push(Effect::StopPolling);
                }
                self.keepalive = true;
                fx.push(Effect::StartKeepalive);
                self.set_status(ConnectionStatus::Connected, &mut fx);
            }
            ChannelEvent::Closed => {
                if self.link_lost(&mut fx) {
                    self.set_status(ConnectionStatus::Connecting, &mut fx);
                    self.schedule_reconnect(&mut fx);
                }
            }
            ChannelEvent::Failed => {
                // A live link that errors is dropped like a close; only a
                // connect attempt that never opened reports Disconnected.
                let was_open = self.phase == Phase::Open;
                if self.link_lost(&mut fx) {
                    let status = if was_open {
                        ConnectionStatus::Connecting
                    } else {
                        ConnectionStatus::Disconnected
                    };
                    self.set_status(status, &mut fx);
                    self.schedule_reconnect(&mut fx);
                }
            }
            ChannelEvent::ReconnectDue => {
                if self.phase != Phase::Waiting {
                    return fx;
                }
                self.reconnect_pending = false;
                self.begin_connect(&mut fx);
            }
            ChannelEvent::KeepaliveTick => {
                if self.phase == Phase::Open {
                    match ClientMsg::Ping.to_text() {
                        Ok(text) => fx.push(Effect::Transmit(text)),
                        Err(e) => warn!(error = %e, "[CHANNEL] failed to encode ping"),
                    }
                }
            }
            ChannelEvent::PollTick => {
                if self.polling {
                    fx.push(Effect::FetchState);
                }
            }
            ChannelEvent::Inbound(text) => match decode_inbound(&text) {
                Some(Inbound::State(state)) => fx.push(Effect::EmitState(state)),
                Some(Inbound::Event(event)) => fx.push(Effect::EmitEvent(event)),
                None => warn!(len = text.len(), "[CHANNEL] dropping undecodable frame"),
            },
            ChannelEvent::Fetched(state) => fx.push(Effect::EmitState(state)),
            ChannelEvent::SendFailed => {
                self.polling = true;
                fx.push(Effect::StartPolling);
            }
            ChannelEvent::Close => {
                self.phase = Phase::Closed;
                if self.polling {
                    self.polling = false;
                    fx.push(Effect::StopPolling);
                }
                if self.keepalive {
                    self.keepalive = false;
                    fx.push(Effect::StopKeepalive);
                }
                if self.reconnect_pending {
                    self.reconnect_pending = false;
                    fx.push(Effect::CancelReconnect);
                }
                fx.push(Effect::CloseTransport);
            }
        }
        fx
    }

    fn begin_connect(&mut self, fx: &mut Vec<Effect>) {
        self.phase = Phase::Connecting;
        self.set_status(ConnectionStatus::Connecting, fx);
        fx.push(Effect::Connect);
    }

    /// Shared teardown for a lost link. Returns false when no link attempt was live,
    /// so a close that follows an error schedules only one reconnect.
    fn link_lost(&mut self, fx: &mut Vec<Effect>) -> bool {
        if !matches!(self.phase, Phase::Connecting | Phase::Open) {
            return false;
        }
        self.phase = Phase::Waiting;
        if self.keepalive {
            self.keepalive = false;
            fx.push(Effect::StopKeepalive);
        }
        self.polling = true;
        fx.push(Effect::StartPolling);
        true
    }

    fn schedule_reconnect(&mut self, fx: &mut Vec<Effect>) {
        self.attempts = self.attempts.saturating_add(1);
        let delay = self.backoff.delay(self.attempts);
        self.reconnect_pending = true;
        fx.push(Effect::ScheduleReconnect(delay));
    }

    fn set_status(&mut self, status: ConnectionStatus, fx: &mut Vec<Effect>) {
        if self.status != status {
            self.status = status;
            fx.push(Effect::EmitStatus(status));
        }
    }
}

//! Resilient room channel: websocket push with HTTP polling fallback.
//!
//! One driver task per channel owns the state machine, every timer, at most
//! one transport link, and the in-flight state pulls. The public handle only
//! talks to it through a command queue and a shared outbound sender.

use std::cell::Cell;
use std::future::pending;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use futures::stream::FuturesUnordered;
use futures_util::StreamExt;
use parking_lot::{Mutex, ReentrantMutex};
use reqwest::Url;
use tokio::sync::mpsc;
use tokio::time::{interval_at, sleep, Instant, Interval, MissedTickBehavior, Sleep};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::config::{ChannelTimings, ClientConfig};
use crate::error::ClientError;
use crate::http::state_client::StateFetcher;
use crate::protocol::game_state::GameState;
use crate::ws::machine::{Backoff, ChannelEvent, ChannelMachine, ConnectionStatus, Effect};
use crate::ws::protocol::{ClientMsg, ServerEvent};
use crate::ws::transport::{Transport, TransportFrame, TransportLink};

/// Receives everything a channel delivers. Called from the driver task.
///
/// States arrive in arrival order, push and pull interleaved; each one
/// replaces the last. Callbacks should return quickly.
pub trait ChannelListener: Send + Sync + 'static {
    fn on_state(&self, state: GameState);

    fn on_event(&self, _event: ServerEvent) {}

    fn on_status_change(&self, _status: ConnectionStatus) {}
}

/// The room and player a channel is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RoomIdentity {
    pub room_id: String,
    pub player_id: String,
}

impl RoomIdentity {
    pub fn new(room_id: impl Into<String>, player_id: impl Into<String>) -> Self {
        Self {
            room_id: room_id.into(),
            player_id: player_id.into(),
        }
    }

    /// `{ws_base}/ws/{room_id}?player_id={player_id}`, trailing slash on the base ignored.
    pub fn ws_url(&self, ws_base: &str) -> Result<String, ClientError> {
        let mut url = Url::parse(ws_base.trim_end_matches('/'))
            .map_err(|e| ClientError::config(format!("invalid websocket base '{ws_base}': {e}")))?;
        url.path_segments_mut()
            .map_err(|_| ClientError::config(format!("websocket base '{ws_base}' cannot carry a path")))?
            .pop_if_empty()
            .extend(["ws", self.room_id.as_str()]);
        url.query_pairs_mut().append_pair("player_id", &self.player_id);
        Ok(url.into())
    }
}

enum Command {
    SendFailed,
    Refresh,
}

struct Shared {
    /// Outbound half of the open link; `None` while disconnected.
    link: Mutex<Option<mpsc::UnboundedSender<String>>>,
    status: Mutex<ConnectionStatus>,
    /// `true` until close. Held while a callback runs so close waits it out.
    gate: ReentrantMutex<Cell<bool>>,
}

/// Handle to a running channel. Dropping it closes the channel.
pub struct RoomChannel {
    identity: RoomIdentity,
    shared: Arc<Shared>,
    commands: mpsc::UnboundedSender<Command>,
    cancel: CancellationToken,
}

impl RoomChannel {
    /// Start a channel. Must be called inside a tokio runtime.
    ///
    /// Connection and the first state pull begin immediately. Fails with
    /// [`ClientError::Config`] for a zero interval or a bad websocket base.
    pub fn open(
        config: &ClientConfig,
        identity: RoomIdentity,
        transport: Arc<dyn Transport>,
        fetcher: Arc<dyn StateFetcher>,
        listener: Arc<dyn ChannelListener>,
    ) -> Result<Self, ClientError> {
        config.timings.validate()?;
        let url = identity.ws_url(&config.ws_base)?;
        let shared = Arc::new(Shared {
            link: Mutex::new(None),
            status: Mutex::new(ConnectionStatus::Disconnected),
            gate: ReentrantMutex::new(Cell::new(true)),
        });
        let (commands, command_rx) = mpsc::unbounded_channel();
        let cancel = CancellationToken::new();

        let driver = Driver {
            url,
            identity: identity.clone(),
            timings: config.timings,
            machine: ChannelMachine::new(Backoff::from(&config.timings)),
            transport,
            fetcher,
            listener,
            shared: shared.clone(),
            commands: command_rx,
            cancel: cancel.clone(),
            connecting: None,
            link_rx: None,
            fetches: FuturesUnordered::new(),
            poll: None,
            keepalive: None,
            reconnect: None,
        };
        info!(
            room_id = %identity.room_id,
            player_id = %identity.player_id,
            "[CHANNEL] opening"
        );
        tokio::spawn(driver.run());

        Ok(Self {
            identity,
            shared,
            commands,
            cancel,
        })
    }

    pub fn identity(&self) -> &RoomIdentity {
        &self.identity
    }

    /// Serialize and send an action. See [`RoomChannel::send_text`].
    pub fn send(&self, message: &ClientMsg) -> bool {
        match message.to_text() {
            Ok(text) => self.send_text(&text),
            Err(e) => {
                warn!(error = %e, "[CHANNEL] failed to encode message");
                false
            }
        }
    }

    /// Hand a frame to the open link.
    ///
    /// Returns `true` only if a link is open and took the frame. On `false`
    /// the channel restarts polling; it does not retry, so the caller should
    /// request a corrective [`refresh`](RoomChannel::refresh) if it needs one.
    pub fn send_text(&self, text: &str) -> bool {
        if self.is_closed() {
            return false;
        }
        let sent = self
            .shared
            .link
            .lock()
            .as_ref()
            .is_some_and(|tx| tx.send(text.to_owned()).is_ok());
        if !sent {
            debug!(room_id = %self.identity.room_id, "[CHANNEL] send with no open link");
            let _ = self.commands.send(Command::SendFailed);
        }
        sent
    }

    /// Pull a fresh snapshot now, outside the poll schedule.
    pub fn refresh(&self) {
        if !self.is_closed() {
            let _ = self.commands.send(Command::Refresh);
        }
    }

    /// Last status published to the listener.
    pub fn status(&self) -> ConnectionStatus {
        *self.shared.status.lock()
    }

    pub fn is_closed(&self) -> bool {
        !self.shared.gate.lock().get()
    }

    /// Tear the channel down. Idempotent.
    ///
    /// Once this returns no listener callback will start. A callback already
    /// running on another thread finishes first.
    pub fn close(&self) {
        {
            let gate = self.shared.gate.lock();
            if !gate.replace(false) {
                return;
            }
        }
        self.shared.link.lock().take();
        self.cancel.cancel();
        info!(room_id = %self.identity.room_id, "[CHANNEL] closed");
    }
}

impl Drop for RoomChannel {
    fn drop(&mut self) {
        self.close();
    }
}

/// What woke the driver loop.
enum Wake {
    Cancelled,
    Connected(Result<TransportLink, ClientError>),
    Frame(Option<TransportFrame>),
    Fetched(Result<GameState, ClientError>),
    Keepalive,
    Poll,
    Reconnect,
    Command(Option<Command>),
}

struct Driver {
    url: String,
    identity: RoomIdentity,
    timings: ChannelTimings,
    machine: ChannelMachine,
    transport: Arc<dyn Transport>,
    fetcher: Arc<dyn StateFetcher>,
    listener: Arc<dyn ChannelListener>,
    shared: Arc<Shared>,
    commands: mpsc::UnboundedReceiver<Command>,
    cancel: CancellationToken,
    connecting: Option<BoxFuture<'static, Result<TransportLink, ClientError>>>,
    link_rx: Option<mpsc::UnboundedReceiver<TransportFrame>>,
    fetches: FuturesUnordered<BoxFuture<'static, Result<GameState, ClientError>>>,
    poll: Option<Interval>,
    keepalive: Option<Interval>,
    reconnect: Option<Pin<Box<Sleep>>>,
}

impl Driver {
    async fn run(mut self) {
        self.step(ChannelEvent::Start);

        loop {
            let wake = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => Wake::Cancelled,
                cmd = self.commands.recv() => Wake::Command(cmd),
                res = poll_connect(&mut self.connecting) => Wake::Connected(res),
                frame = recv_frame(&mut self.link_rx) => Wake::Frame(frame),
                res = next_fetch(&mut self.fetches) => Wake::Fetched(res),
                _ = wait_reconnect(&mut self.reconnect) => Wake::Reconnect,
                _ = tick(&mut self.keepalive) => Wake::Keepalive,
                _ = tick(&mut self.poll) => Wake::Poll,
            };

            let event = match wake {
                Wake::Cancelled | Wake::Command(None) => break,
                Wake::Command(Some(Command::SendFailed)) => ChannelEvent::SendFailed,
                Wake::Command(Some(Command::Refresh)) => {
                    self.start_fetch();
                    continue;
                }
                Wake::Connected(Ok(link)) => {
                    self.connecting = None;
                    *self.shared.link.lock() = Some(link.outbound);
                    self.link_rx = Some(link.inbound);
                    debug!(room_id = %self.identity.room_id, "[CHANNEL] link open");
                    ChannelEvent::Opened
                }
                Wake::Connected(Err(e)) => {
                    self.connecting = None;
                    warn!(
                        room_id = %self.identity.room_id,
                        error = %e,
                        code = e.code(),
                        "[CHANNEL] connect failed"
                    );
                    ChannelEvent::Failed
                }
                Wake::Frame(Some(TransportFrame::Text(text))) => ChannelEvent::Inbound(text),
                Wake::Frame(Some(TransportFrame::Failed(reason))) => {
                    self.drop_link();
                    warn!(room_id = %self.identity.room_id, reason = %reason, "[CHANNEL] link failed");
                    ChannelEvent::Failed
                }
                Wake::Frame(Some(TransportFrame::Closed) | None) => {
                    self.drop_link();
                    info!(room_id = %self.identity.room_id, "[CHANNEL] link closed");
                    ChannelEvent::Closed
                }
                Wake::Fetched(Ok(state)) => ChannelEvent::Fetched(Box::new(state)),
                Wake::Fetched(Err(e)) => {
                    warn!(
                        room_id = %self.identity.room_id,
                        error = %e,
                        code = e.code(),
                        "[CHANNEL] state pull failed"
                    );
                    continue;
                }
                Wake::Reconnect => {
                    self.reconnect = None;
                    ChannelEvent::ReconnectDue
                }
                Wake::Keepalive => ChannelEvent::KeepaliveTick,
                Wake::Poll => ChannelEvent::PollTick,
            };
            self.step(event);
        }

        self.step(ChannelEvent::Close);
        debug!(room_id = %self.identity.room_id, "[CHANNEL] driver stopped");
    }

    fn step(&mut self, event: ChannelEvent) {
        for effect in self.machine.handle(event) {
            self.apply(effect);
        }
    }

    fn apply(&mut self, effect: Effect) {
        match effect {
            Effect::Connect => {
                self.drop_link();
                let transport = self.transport.clone();
                let url = self.url.clone();
                debug!(url = %self.url, "[CHANNEL] connecting");
                self.connecting = Some(Box::pin(async move { transport.connect(&url).await }));
            }
            Effect::FetchState => self.start_fetch(),
            Effect::StartPolling => self.poll = Some(periodic(self.timings.poll_interval)),
            Effect::StopPolling => self.poll = None,
            Effect::StartKeepalive => {
                self.keepalive = Some(periodic(self.timings.keepalive_interval))
            }
            Effect::StopKeepalive => self.keepalive = None,
            Effect::ScheduleReconnect(delay) => {
                debug!(
                    room_id = %self.identity.room_id,
                    attempt = self.machine.attempts(),
                    retry_delay_ms = delay.as_millis() as u64,
                    "[CHANNEL] reconnect scheduled"
                );
                self.reconnect = Some(Box::pin(sleep(delay)));
            }
            Effect::CancelReconnect => self.reconnect = None,
            Effect::Transmit(text) => {
                let sent = self
                    .shared
                    .link
                    .lock()
                    .as_ref()
                    .is_some_and(|tx| tx.send(text).is_ok());
                if !sent {
                    warn!(room_id = %self.identity.room_id, "[CHANNEL] keepalive not sent");
                }
            }
            Effect::EmitState(state) => self.emit(|l| l.on_state(*state)),
            Effect::EmitEvent(event) => self.emit(|l| l.on_event(event)),
            Effect::EmitStatus(status) => {
                *self.shared.status.lock() = status;
                info!(room_id = %self.identity.room_id, %status, "[CHANNEL] status");
                self.emit(|l| l.on_status_change(status));
            }
            Effect::CloseTransport => {
                self.drop_link();
                self.connecting = None;
                self.fetches = FuturesUnordered::new();
            }
        }
    }

    fn start_fetch(&mut self) {
        let fetcher = self.fetcher.clone();
        let room_id = self.identity.room_id.clone();
        let player_id = self.identity.player_id.clone();
        self.fetches.push(Box::pin(async move {
            fetcher.fetch_state(&room_id, &player_id).await
        }));
    }

    fn drop_link(&mut self) {
        self.shared.link.lock().take();
        self.link_rx = None;
    }

    fn emit(&self, f: impl FnOnce(&dyn ChannelListener)) {
        let gate = self.shared.gate.lock();
        if gate.get() {
            f(self.listener.as_ref());
        }
    }
}

/// Interval whose first tick is one full period away.
fn periodic(period: Duration) -> Interval {
    let mut iv = interval_at(Instant::now() + period, period);
    iv.set_missed_tick_behavior(MissedTickBehavior::Delay);
    iv
}

async fn tick(iv: &mut Option<Interval>) {
    match iv {
        Some(iv) => {
            iv.tick().await;
        }
        None => pending().await,
    }
}

async fn wait_reconnect(timer: &mut Option<Pin<Box<Sleep>>>) {
    match timer {
        Some(t) => t.as_mut().await,
        None => pending().await,
    }
}

async fn poll_connect(
    fut: &mut Option<BoxFuture<'static, Result<TransportLink, ClientError>>>,
) -> Result<TransportLink, ClientError> {
    match fut {
        Some(f) => f.as_mut().await,
        None => pending().await,
    }
}

async fn recv_frame(rx: &mut Option<mpsc::UnboundedReceiver<TransportFrame>>) -> Option<TransportFrame> {
    match rx {
        Some(rx) => rx.recv().await,
        None => pending().await,
    }
}

async fn next_fetch(
    fetches: &mut FuturesUnordered<BoxFuture<'static, Result<GameState, ClientError>>>,
) -> Result<GameState, ClientError> {
    match fetches.next().await {
        Some(res) => res,
        None => pending().await,
    }
}

/// Owns the channel for whichever room/player is current.
///
/// Switching identity closes the old channel before the new one opens, so two
/// channels never deliver into the same listener at once.
pub struct RoomController {
    config: ClientConfig,
    transport: Arc<dyn Transport>,
    fetcher: Arc<dyn StateFetcher>,
    listener: Arc<dyn ChannelListener>,
    current: Option<RoomChannel>,
}

impl RoomController {
    pub fn new(
        config: ClientConfig,
        transport: Arc<dyn Transport>,
        fetcher: Arc<dyn StateFetcher>,
        listener: Arc<dyn ChannelListener>,
    ) -> Self {
        Self {
            config,
            transport,
            fetcher,
            listener,
            current: None,
        }
    }

    /// Bind to `identity`. A no-op when already bound to it.
    pub fn switch_identity(&mut self, identity: RoomIdentity) -> Result<(), ClientError> {
        if self.current.as_ref().map(RoomChannel::identity) == Some(&identity) {
            return Ok(());
        }
        self.leave();
        let channel = RoomChannel::open(
            &self.config,
            identity,
            self.transport.clone(),
            self.fetcher.clone(),
            self.listener.clone(),
        )?;
        self.current = Some(channel);
        Ok(())
    }

    pub fn leave(&mut self) {
        if let Some(old) = self.current.take() {
            old.close();
        }
    }

    pub fn channel(&self) -> Option<&RoomChannel> {
        self.current.as_ref()
    }
}

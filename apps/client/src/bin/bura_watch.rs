//! bura-watch: follow a room from the terminal.
//!
//! Connects like a player would, logs every state change, and prints what the
//! engines would suggest for the local hand.

use std::sync::Arc;
use std::time::Duration;

use bura_client::domain::EarlyCombo;
use bura_client::telemetry;
use bura_client::{
    ChannelListener, ClientConfig, ClientError, ConnectionStatus, GameState, HttpStateClient,
    RoomChannel, RoomIdentity, ServerEvent, TableView, WebSocketTransport,
};
use clap::Parser;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "bura-watch")]
#[command(about = "Watch a Bura room and print suggested plays")]
struct Args {
    /// Room to join
    #[arg(short, long)]
    room: String,

    /// Player id to act as (sent as x-user-id and in the socket query)
    #[arg(short, long)]
    player: String,

    /// Websocket origin; defaults to BURA_WS_BASE
    #[arg(long)]
    ws_base: Option<String>,

    /// HTTP origin; defaults to BURA_API_BASE
    #[arg(long)]
    api_base: Option<String>,

    /// Stop after this many seconds instead of waiting for Ctrl-C
    #[arg(long)]
    duration_secs: Option<u64>,
}

struct Printer;

impl Printer {
    fn describe(view: &TableView) -> String {
        let hand: Vec<String> = view.hand.iter().map(ToString::to_string).collect();
        format!(
            "hand [{}] trump {}",
            hand.join(" "),
            view.trump.map_or("-".to_string(), |t| t.to_string())
        )
    }

    fn combo_line(combo: &EarlyCombo) -> String {
        format!("{} ({})", combo.label, combo.summary)
    }
}

impl ChannelListener for Printer {
    fn on_state(&self, state: GameState) {
        let view = TableView::from_snapshot(&state);
        info!(
            room_id = %state.room_id,
            round = state.round_number,
            my_turn = view.my_turn,
            "{}",
            Printer::describe(&view)
        );
        if view.my_turn {
            match view.suggested_play(None) {
                Some(cards) => {
                    let cards: Vec<String> = cards.iter().map(ToString::to_string).collect();
                    info!(mode = ?view.play_mode(), "suggested play: {}", cards.join(" "));
                }
                None => info!("no suggestion for this hand"),
            }
        }
        for combo in view.early_combos() {
            info!("early combo available: {}", Printer::combo_line(&combo));
        }
        for kind in view.declarations() {
            info!("declaration available: {}", kind.label());
        }
    }

    fn on_event(&self, event: ServerEvent) {
        match event {
            ServerEvent::Error { error } => warn!(%error, "server rejected action"),
            other => info!(kind = other.kind(), "room event"),
        }
    }

    fn on_status_change(&self, status: ConnectionStatus) {
        info!(%status, "connection");
    }
}

fn load_config(args: &Args) -> Result<ClientConfig, ClientError> {
    if let (Some(ws), Some(api)) = (&args.ws_base, &args.api_base) {
        return Ok(ClientConfig::new(ws, api));
    }
    let mut config = ClientConfig::from_env()?;
    if let Some(ws) = &args.ws_base {
        config.ws_base = ws.clone();
    }
    if let Some(api) = &args.api_base {
        config.api_base = api.clone();
    }
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    telemetry::init_tracing();
    let args = Args::parse();

    let config = load_config(&args)?;
    let fetcher = Arc::new(HttpStateClient::new(&config.api_base)?);
    let channel = RoomChannel::open(
        &config,
        RoomIdentity::new(&args.room, &args.player),
        Arc::new(WebSocketTransport::new()),
        fetcher,
        Arc::new(Printer),
    )?;

    match args.duration_secs {
        Some(secs) => tokio::time::sleep(Duration::from_secs(secs)).await,
        None => tokio::signal::ctrl_c().await?,
    }

    channel.close();
    Ok(())
}

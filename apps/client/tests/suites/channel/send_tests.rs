use std::sync::Arc;

use bura_client::{Card, ClientMsg, ConnectionStatus, Rank, RoomChannel, RoomIdentity, Suit};
use serde_json::Value;

use crate::support::fake_fetcher::FakeFetcher;
use crate::support::fake_transport::{FakeTransport, ServerEnd};
use crate::support::recorder::Recorder;
use crate::support::{advance, settle, slow_reconnect_config, test_config};

fn play() -> ClientMsg {
    ClientMsg::PlayCards {
        player_id: "p1".into(),
        cards: vec![Card::new(Rank::Ace, Suit::Spades), Card::new(Rank::Ten, Suit::Spades)],
        round_id: Some("r_1".into()),
        trick_index: Some(0),
    }
}

#[tokio::test(start_paused = true)]
async fn send_on_open_link_reaches_server() -> Result<(), Box<dyn std::error::Error>> {
    let (transport, mut accepted) = FakeTransport::new();
    let channel = RoomChannel::open(
        &test_config(),
        RoomIdentity::new("r1", "p1"),
        transport,
        Arc::new(FakeFetcher::default()),
        Arc::new(Recorder::default()),
    )?;
    settle().await;
    let mut server = accepted.try_recv()?;

    assert!(channel.send(&play()));

    let sent = server.drain_sent();
    assert_eq!(sent.len(), 1);
    let v: Value = serde_json::from_str(&sent[0])?;
    assert_eq!(v["type"], "play_cards");
    assert_eq!(v["player_id"], "p1");
    assert_eq!(v["roundId"], "r_1");
    assert_eq!(v["cards"].as_array().map(Vec::len), Some(2));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn send_without_link_returns_false() -> Result<(), Box<dyn std::error::Error>> {
    let (transport, _accepted) = FakeTransport::new();
    transport.refuse_all();
    let channel = RoomChannel::open(
        &slow_reconnect_config(),
        RoomIdentity::new("r1", "p1"),
        transport,
        Arc::new(FakeFetcher::default()),
        Arc::new(Recorder::default()),
    )?;
    settle().await;

    assert_eq!(channel.status(), ConnectionStatus::Disconnected);
    assert!(!channel.send(&play()));
    assert!(!channel.send_text("{\"type\":\"ping\"}"));
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn rejected_send_restarts_polling() -> Result<(), Box<dyn std::error::Error>> {
    let (transport, mut accepted) = FakeTransport::new();
    let fetcher = Arc::new(FakeFetcher::default());
    let channel = RoomChannel::open(
        &test_config(),
        RoomIdentity::new("r1", "p1"),
        transport,
        fetcher.clone(),
        Arc::new(Recorder::default()),
    )?;
    settle().await;

    // The server stops reading but the link is not reported closed.
    let ServerEnd {
        to_client: _to_client,
        from_client,
    } = accepted.try_recv()?;
    drop(from_client);

    advance(5_000).await;
    assert_eq!(fetcher.calls(), 1);

    assert!(!channel.send(&play()));
    settle().await;
    advance(3_100).await;
    assert_eq!(fetcher.calls(), 2);
    assert_eq!(channel.status(), ConnectionStatus::Connected);
    Ok(())
}

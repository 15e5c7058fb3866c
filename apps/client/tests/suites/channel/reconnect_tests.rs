use std::sync::Arc;
use std::time::Duration;

use bura_client::{ConnectionStatus, RoomChannel, RoomIdentity};

use crate::support::fake_fetcher::FakeFetcher;
use crate::support::fake_transport::{FakeTransport, Plan};
use crate::support::recorder::Recorder;
use crate::support::{advance, settle, slow_reconnect_config, test_config};

#[tokio::test(start_paused = true)]
async fn lost_link_polls_every_three_seconds() -> Result<(), Box<dyn std::error::Error>> {
    let (transport, mut accepted) = FakeTransport::new();
    let fetcher = Arc::new(FakeFetcher::default());
    let recorder = Arc::new(Recorder::default());
    let channel = RoomChannel::open(
        &slow_reconnect_config(),
        RoomIdentity::new("r1", "p1"),
        transport,
        fetcher.clone(),
        recorder.clone(),
    )?;
    settle().await;
    let server = accepted.try_recv()?;

    server.close();
    settle().await;
    assert_eq!(channel.status(), ConnectionStatus::Connecting);
    assert_eq!(fetcher.calls(), 1);

    advance(9_500).await;
    assert_eq!(fetcher.calls(), 4);
    assert_eq!(recorder.states().len(), 4);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn reconnect_stops_polling_and_restores_status() -> Result<(), Box<dyn std::error::Error>> {
    let (transport, mut accepted) = FakeTransport::new();
    let fetcher = Arc::new(FakeFetcher::default());
    let recorder = Arc::new(Recorder::default());
    let channel = RoomChannel::open(
        &test_config(),
        RoomIdentity::new("r1", "p1"),
        transport.clone(),
        fetcher.clone(),
        recorder.clone(),
    )?;
    settle().await;
    let first = accepted.try_recv()?;

    first.close();
    settle().await;
    // First retry is one second out.
    advance(1_000).await;

    assert_eq!(transport.connect_count(), 2);
    // Held so the new link stays up.
    let _second = accepted.try_recv()?;
    assert_eq!(channel.status(), ConnectionStatus::Connected);
    assert_eq!(
        recorder.statuses(),
        vec![
            ConnectionStatus::Connecting,
            ConnectionStatus::Connected,
            ConnectionStatus::Connecting,
            ConnectionStatus::Connected,
        ]
    );

    advance(10_000).await;
    assert_eq!(fetcher.calls(), 1);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn failed_connects_back_off_exponentially_up_to_cap() -> Result<(), Box<dyn std::error::Error>>
{
    let (transport, _accepted) = FakeTransport::new();
    transport.refuse_all();
    let fetcher = Arc::new(FakeFetcher::default());
    let recorder = Arc::new(Recorder::default());
    let channel = RoomChannel::open(
        &test_config(),
        RoomIdentity::new("r1", "p1"),
        transport.clone(),
        fetcher,
        recorder.clone(),
    )?;
    settle().await;
    assert_eq!(channel.status(), ConnectionStatus::Disconnected);

    advance(31_500).await;

    let times = transport.connect_times();
    assert!(times.len() >= 6, "only {} connect attempts", times.len());
    let gaps: Vec<Duration> = times.windows(2).map(|w| w[1] - w[0]).collect();
    let expected_ms = [1_000u64, 2_000, 4_000, 8_000, 8_000];
    for (gap, want) in gaps.iter().zip(expected_ms) {
        let want = Duration::from_millis(want);
        assert!(
            *gap >= want && *gap < want + Duration::from_millis(5),
            "gap {gap:?}, expected {want:?}"
        );
    }

    // Status flips between attempts; never stuck.
    let statuses = recorder.statuses();
    assert_eq!(statuses[0], ConnectionStatus::Connecting);
    assert_eq!(statuses[1], ConnectionStatus::Disconnected);
    assert_eq!(statuses[2], ConnectionStatus::Connecting);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn backoff_resets_after_a_successful_open() -> Result<(), Box<dyn std::error::Error>> {
    let (transport, mut accepted) = FakeTransport::new();
    transport.script(&[Plan::Refuse, Plan::Refuse, Plan::Accept]);
    let fetcher = Arc::new(FakeFetcher::default());
    let _channel = RoomChannel::open(
        &test_config(),
        RoomIdentity::new("r1", "p1"),
        transport.clone(),
        fetcher,
        Arc::new(Recorder::default()),
    )?;
    settle().await;

    // Refused at 0 and 1s, accepted at 3s.
    advance(3_100).await;
    assert_eq!(transport.connect_count(), 3);
    let server = accepted.try_recv()?;

    server.close();
    settle().await;
    advance(1_000).await;
    assert_eq!(transport.connect_count(), 4);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn error_then_close_schedules_one_reconnect() -> Result<(), Box<dyn std::error::Error>> {
    let (transport, mut accepted) = FakeTransport::new();
    let fetcher = Arc::new(FakeFetcher::default());
    let recorder = Arc::new(Recorder::default());
    let channel = RoomChannel::open(
        &test_config(),
        RoomIdentity::new("r1", "p1"),
        transport.clone(),
        fetcher,
        recorder.clone(),
    )?;
    settle().await;
    let server = accepted.try_recv()?;

    server.fail();
    server.close();
    settle().await;
    assert_eq!(channel.status(), ConnectionStatus::Connecting);

    advance(1_000).await;
    assert_eq!(transport.connect_count(), 2);
    advance(30_000).await;
    assert_eq!(transport.connect_count(), 2);
    assert_eq!(channel.status(), ConnectionStatus::Connected);
    Ok(())
}

#[tokio::test(start_paused = true)]
async fn erroring_open_link_reports_connecting() -> Result<(), Box<dyn std::error::Error>> {
    let (transport, mut accepted) = FakeTransport::new();
    let recorder = Arc::new(Recorder::default());
    let channel = RoomChannel::open(
        &slow_reconnect_config(),
        RoomIdentity::new("r1", "p1"),
        transport,
        Arc::new(FakeFetcher::default()),
        recorder.clone(),
    )?;
    settle().await;
    let server = accepted.try_recv()?;

    server.fail();
    settle().await;
    advance(500).await;

    assert_eq!(channel.status(), ConnectionStatus::Connecting);
    assert_eq!(
        recorder.statuses(),
        vec![
            ConnectionStatus::Connecting,
            ConnectionStatus::Connected,
            ConnectionStatus::Connecting,
        ]
    );
    Ok(())
}

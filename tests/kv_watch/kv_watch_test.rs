use std::time::Duration;
use std::time::Instant;

use kvwatch::ClientError;
use kvwatch::KvWatchClient;
use kvwatch::ServerConfig;
use kvwatch::WatchConfig;

use crate::common::TestServer;
use crate::common::WATCH_WINDOW_IN_MS;

#[tokio::test]
async fn test_get_and_set_round_trip_through_grpc() {
    let server = TestServer::start(WATCH_WINDOW_IN_MS).await;
    let client = server.client().await;

    assert_eq!(client.get("missing").await.unwrap(), "");
    assert_eq!(client.set("a", "1").await.unwrap(), 1);
    assert_eq!(client.set("b", "2").await.unwrap(), 2);
    assert_eq!(client.set("a", "3").await.unwrap(), 2);
    assert_eq!(client.get("a").await.unwrap(), "3");

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_end_to_end_scenario() {
    let server = TestServer::start(WATCH_WINDOW_IN_MS).await;
    let client = server.client().await;

    assert_eq!(client.set("a", "1").await.unwrap(), 1);
    assert_eq!(client.set("b", "2").await.unwrap(), 2);
    assert_eq!(client.get("a").await.unwrap(), "1");

    // Same value: the watch runs out its window with nothing to report
    let started = Instant::now();
    let watcher = {
        let client = client.clone();
        tokio::spawn(async move { client.watch_raw("a").await })
    };
    server.wait_for_watchers(1).await;
    assert_eq!(client.set("a", "1").await.unwrap(), 2);
    assert_eq!(watcher.await.unwrap().unwrap(), "");
    assert!(started.elapsed() >= Duration::from_millis(WATCH_WINDOW_IN_MS));
    server.wait_for_watchers(0).await;

    // Different value: reported once
    let watcher = {
        let client = client.clone();
        tokio::spawn(async move { client.watch_raw("a").await })
    };
    server.wait_for_watchers(1).await;
    assert_eq!(client.set("a", "2").await.unwrap(), 2);
    let changed = watcher.await.unwrap().unwrap();
    assert!(changed.contains("a,"));
    assert_eq!(changed, "a,");

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_watch_reports_changes_to_any_key_in_order() {
    let server = TestServer::start(WATCH_WINDOW_IN_MS).await;
    let client = server.client().await;

    let watcher = {
        let client = client.clone();
        tokio::spawn(async move { client.watch("x").await })
    };
    server.wait_for_watchers(1).await;

    client.set("a", "1").await.unwrap();
    client.set("b", "1").await.unwrap();
    client.set("a", "2").await.unwrap();

    assert_eq!(watcher.await.unwrap().unwrap(), vec!["a", "b", "a"]);
    server.wait_for_watchers(0).await;

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_concurrent_watchers_from_separate_clients() {
    let server = TestServer::start(WATCH_WINDOW_IN_MS).await;
    let writer = server.client().await;

    let mut watchers = Vec::new();
    for _ in 0..3 {
        let client = server.client().await;
        watchers.push(tokio::spawn(async move { client.watch("").await }));
    }
    server.wait_for_watchers(3).await;

    writer.set("k", "v").await.unwrap();

    for watcher in watchers {
        assert_eq!(watcher.await.unwrap().unwrap(), vec!["k"]);
    }
    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_overflowing_watcher_receives_queue_capacity_keys() {
    let server = TestServer::start_with(
        WatchConfig {
            watcher_queue_capacity: 3,
            timeout_in_ms: WATCH_WINDOW_IN_MS,
        },
        ServerConfig::default(),
    )
    .await;
    let client = server.client().await;

    let watcher = {
        let client = client.clone();
        tokio::spawn(async move { client.watch("").await })
    };
    server.wait_for_watchers(1).await;

    // Writes go straight to the store with no await in between, so the
    // current-thread runtime cannot run the collector until all ten are queued
    for i in 0..10 {
        server.store.set(format!("k{i}"), "v");
    }

    let changed = watcher.await.unwrap().unwrap();
    assert_eq!(changed, vec!["k0", "k1", "k2"]);

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_dropped_watch_call_deregisters_watcher() {
    let server = TestServer::start(10_000).await;
    let client = server.client().await;

    let watcher = {
        let client = client.clone();
        tokio::spawn(async move { client.watch("").await })
    };
    server.wait_for_watchers(1).await;

    // Cancelling the client call resets the stream; the server drops the watcher
    watcher.abort();
    server.wait_for_watchers(0).await;

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_compressed_transport() {
    let server = TestServer::start_with(
        WatchConfig {
            timeout_in_ms: WATCH_WINDOW_IN_MS,
            ..WatchConfig::default()
        },
        ServerConfig {
            enable_compression: true,
            ..ServerConfig::default()
        },
    )
    .await;
    let client = KvWatchClient::connect_with(server.endpoint(), true).await.unwrap();

    let value = "v".repeat(4096);
    assert_eq!(client.set("big", value.clone()).await.unwrap(), 1);
    assert_eq!(client.get("big").await.unwrap(), value);

    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_connect_rejects_malformed_endpoint() {
    let e = KvWatchClient::connect("not a uri").await.unwrap_err();
    assert!(matches!(e, ClientError::InvalidEndpoint { .. }), "{e:?}");
}

#[tokio::test]
async fn test_connect_to_closed_port_fails() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let address = listener.local_addr().unwrap();
    drop(listener);

    let e = KvWatchClient::connect(format!("http://{address}"))
        .await
        .unwrap_err();
    assert!(matches!(e, ClientError::Transport(_)), "{e:?}");
}

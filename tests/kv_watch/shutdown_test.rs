use std::time::Duration;
use std::time::Instant;

use crate::common::TestServer;
use crate::common::SETTLE_TIMEOUT_IN_MS;

#[tokio::test]
async fn test_shutdown_ends_pending_watch_with_collected_keys() {
    let server = TestServer::start(30_000).await;
    let client = server.client().await;

    let started = Instant::now();
    let watcher = {
        let client = client.clone();
        tokio::spawn(async move { client.watch("").await })
    };
    server.wait_for_watchers(1).await;
    client.set("a", "1").await.unwrap();

    server.trigger_shutdown();

    let changed = tokio::time::timeout(Duration::from_millis(SETTLE_TIMEOUT_IN_MS), watcher)
        .await
        .expect("watch was not released by shutdown")
        .unwrap()
        .unwrap();
    assert_eq!(changed, vec!["a"]);
    assert!(started.elapsed() < Duration::from_secs(30));
    assert_eq!(server.store.watcher_count(), 0);

    drop(client);
    server.stop().await.unwrap();
}

#[tokio::test]
async fn test_idle_server_stops_on_signal() {
    let server = TestServer::start(1_000).await;
    let client = server.client().await;
    client.set("a", "1").await.unwrap();
    drop(client);

    server.stop().await.unwrap();
}

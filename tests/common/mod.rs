use std::net::SocketAddr;
use std::sync::Once;
use std::time::Duration;

use kvwatch::KvStore;
use kvwatch::KvWatchClient;
use kvwatch::ServerConfig;
use kvwatch::WatchConfig;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;

pub const WATCH_WINDOW_IN_MS: u64 = 400;

// upper bound for anything that should finish well inside one watch window
pub const SETTLE_TIMEOUT_IN_MS: u64 = 5_000;

static LOGGER_INIT: Once = Once::new();

pub fn enable_logger() {
    LOGGER_INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// A server bound to an ephemeral port
pub struct TestServer {
    pub address: SocketAddr,
    /// Shares state with the served store
    pub store: KvStore,
    shutdown_tx: watch::Sender<()>,
    handle: JoinHandle<kvwatch::Result<()>>,
}

impl TestServer {
    pub async fn start(timeout_in_ms: u64) -> Self {
        Self::start_with(
            WatchConfig {
                timeout_in_ms,
                ..WatchConfig::default()
            },
            ServerConfig::default(),
        )
        .await
    }

    pub async fn start_with(
        watch_config: WatchConfig,
        server_config: ServerConfig,
    ) -> Self {
        enable_logger();
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();

        let store = KvStore::new(&watch_config);
        let (shutdown_tx, shutdown_rx) = watch::channel(());
        let handle = {
            let store = store.clone();
            tokio::spawn(async move {
                kvwatch::serve_with_listener(store, listener, &server_config, shutdown_rx).await
            })
        };

        Self {
            address,
            store,
            shutdown_tx,
            handle,
        }
    }

    pub fn endpoint(&self) -> String {
        format!("http://{}", self.address)
    }

    pub async fn client(&self) -> KvWatchClient {
        KvWatchClient::connect(self.endpoint()).await.unwrap()
    }

    /// Waits until the store holds `expected` watchers
    pub async fn wait_for_watchers(
        &self,
        expected: usize,
    ) {
        tokio::time::timeout(Duration::from_millis(SETTLE_TIMEOUT_IN_MS), async {
            while self.store.watcher_count() != expected {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        })
        .await
        .unwrap_or_else(|_| {
            panic!(
                "expected {} watchers, found {}",
                expected,
                self.store.watcher_count()
            )
        });
    }

    /// Signals shutdown and waits for the server task to finish
    pub async fn stop(self) -> kvwatch::Result<()> {
        let _ = self.shutdown_tx.send(());
        tokio::time::timeout(Duration::from_millis(SETTLE_TIMEOUT_IN_MS), self.handle)
            .await
            .expect("server did not stop in time")
            .expect("server task panicked")
    }

    pub fn trigger_shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }
}

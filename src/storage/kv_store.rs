use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use parking_lot::MutexGuard;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing::error;
use tracing::trace;

use crate::collect_changes;
use crate::constants::STATE_LOCK_DEADLOCK_TIMEOUT_MS;
use crate::fan_out;
use crate::metrics::ACTIVE_WATCHERS;
use crate::metrics::CHANGE_EVENTS;
use crate::WatchConfig;
use crate::WatchOutcome;
use crate::WatchRegistry;
use crate::WatcherDeregister;
use crate::WatcherHandle;
use crate::WatcherId;

/// Everything guarded by the store lock
#[derive(Debug)]
struct StoreState {
    data: HashMap<String, String>,
    watchers: WatchRegistry,
}

#[derive(Debug)]
struct KvStoreInner {
    state: Mutex<StoreState>,
    watch_window: Duration,
    /// Longest wait for `state` before assuming a deadlock
    lock_timeout: Duration,
}

impl KvStoreInner {
    /// # Panics
    /// Panics when the lock cannot be taken within `lock_timeout`
    /// (`STATE_LOCK_DEADLOCK_TIMEOUT_MS`). No holder blocks or awaits, so this only
    /// happens on recursive acquisition or a fan-out/registration deadlock, and
    /// continuing would risk a corrupted watcher set.
    fn lock_state(&self) -> MutexGuard<'_, StoreState> {
        match self.state.try_lock_for(self.lock_timeout) {
            Some(guard) => guard,
            None => {
                error!(
                    "store lock not acquired within {:?}, treating as deadlock",
                    self.lock_timeout
                );
                panic!("kv store lock deadlock detected");
            }
        }
    }
}

impl WatcherDeregister for KvStoreInner {
    fn deregister_watcher(
        &self,
        id: WatcherId,
    ) {
        if self.lock_state().watchers.deregister(id) {
            ACTIVE_WATCHERS.dec();
        }
    }
}

/// In-memory key-value store with change notification
///
/// Cloning is cheap and every clone shares the same data and watchers. The map
/// and the watcher registry sit behind one lock; the lock is never held while
/// delivering notifications or while a Watch call waits.
///
/// # Example
///
/// ```no_run
/// use kvwatch::KvStore;
/// use kvwatch::WatchConfig;
/// use tokio_util::sync::CancellationToken;
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let store = KvStore::new(&WatchConfig::default());
///     assert_eq!(store.set("a", "1"), 1);
///     assert_eq!(store.get("a"), "1");
///
///     // Blocks for the configured watch window
///     let outcome = store.watch("a", &CancellationToken::new()).await;
///     println!("changed: {}", outcome.encode());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct KvStore {
    inner: Arc<KvStoreInner>,
}

impl KvStore {
    /// # Panics
    /// Panics if `config.watcher_queue_capacity` is 0. Use a configuration
    /// that passed [`WatchConfig::validate`].
    pub fn new(config: &WatchConfig) -> Self {
        Self::with_lock_timeout(
            config,
            Duration::from_millis(STATE_LOCK_DEADLOCK_TIMEOUT_MS),
        )
    }

    fn with_lock_timeout(
        config: &WatchConfig,
        lock_timeout: Duration,
    ) -> Self {
        Self {
            inner: Arc::new(KvStoreInner {
                state: Mutex::new(StoreState {
                    data: HashMap::new(),
                    watchers: WatchRegistry::new(config.watcher_queue_capacity),
                }),
                watch_window: config.timeout(),
                lock_timeout,
            }),
        }
    }

    /// Value stored under `key`, or the empty string if it was never set
    pub fn get(
        &self,
        key: &str,
    ) -> String {
        self.inner.lock_state().data.get(key).cloned().unwrap_or_default()
    }

    /// Stores `value` under `key` and returns the number of distinct keys.
    ///
    /// When `value` differs from the current value (the empty string for an
    /// absent key), every watcher registered before this call took the lock is
    /// notified of `key`. Notification happens after the lock is released and
    /// never blocks.
    pub fn set(
        &self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> usize {
        let key = key.into();
        let value = value.into();

        let (count, targets) = {
            let mut state = self.inner.lock_state();
            let current = state.data.get(&key).map(String::as_str).unwrap_or_default();
            let changed = current != value;
            let targets = changed.then(|| state.watchers.slots());

            state.data.insert(key.clone(), value);
            (state.data.len(), targets)
        };

        match targets {
            Some(slots) => {
                CHANGE_EVENTS.inc();
                let report = fan_out(&slots, &key);
                debug!(key = %key, count, watchers = slots.len(), ?report, "Set changed value");
            }
            None => trace!(key = %key, count, "Set kept value unchanged"),
        }

        count
    }

    /// Registers a watcher that receives every changed key from now on.
    ///
    /// The watcher is deregistered when the handle is dropped.
    pub fn register_watcher(&self) -> WatcherHandle {
        let (id, receiver) = self.inner.lock_state().watchers.register();
        ACTIVE_WATCHERS.inc();
        debug!(watcher_id = %id, "Watcher registered");

        let registry: Arc<dyn WatcherDeregister> = self.inner.clone();
        WatcherHandle::new(id, receiver, registry)
    }

    /// Collects changed keys for the configured watch window.
    ///
    /// `key` does not filter: changes to any key are reported. The call ends
    /// early, with whatever was collected, when `cancel` fires.
    pub async fn watch(
        &self,
        key: &str,
        cancel: &CancellationToken,
    ) -> WatchOutcome {
        let handle = self.register_watcher();
        debug!(
            watcher_id = %handle.id(),
            requested_key = key,
            "Watch started; key filter is not applied"
        );
        collect_changes(handle, self.inner.watch_window, cancel).await
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.inner.lock_state().data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of currently registered watchers
    pub fn watcher_count(&self) -> usize {
        self.inner.lock_state().watchers.len()
    }

    /// Whether `id` is still registered
    pub fn is_watching(
        &self,
        id: WatcherId,
    ) -> bool {
        self.inner.lock_state().watchers.contains(id)
    }

    /// Capacity of each watcher queue
    pub fn watcher_queue_capacity(&self) -> usize {
        self.inner.lock_state().watchers.queue_capacity()
    }

    pub fn watch_window(&self) -> Duration {
        self.inner.watch_window
    }
}

use std::fmt;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::trace;

use super::WatcherId;

/// Removes a watcher from wherever it was registered.
///
/// Implemented by the store, which owns the registry behind its lock.
pub(crate) trait WatcherDeregister: Send + Sync {
    fn deregister_watcher(
        &self,
        id: WatcherId,
    );
}

/// Handle for a registered watcher
///
/// When dropped, the watcher is automatically deregistered, whichever way the
/// owning Watch call ends (timeout, cancellation, or the future being dropped).
pub struct WatcherHandle {
    id: WatcherId,
    receiver: mpsc::Receiver<String>,
    registry: Arc<dyn WatcherDeregister>,
}

impl WatcherHandle {
    pub(crate) fn new(
        id: WatcherId,
        receiver: mpsc::Receiver<String>,
        registry: Arc<dyn WatcherDeregister>,
    ) -> Self {
        Self {
            id,
            receiver,
            registry,
        }
    }

    /// Get the unique identifier for this watcher
    pub fn id(&self) -> WatcherId {
        self.id
    }

    /// Waits for the next changed key.
    ///
    /// Returns `None` only if the watcher was deregistered out from under the handle.
    pub async fn recv(&mut self) -> Option<String> {
        self.receiver.recv().await
    }

    /// Non-blocking variant of [`WatcherHandle::recv`]
    pub fn try_recv(&mut self) -> Option<String> {
        self.receiver.try_recv().ok()
    }
}

impl fmt::Debug for WatcherHandle {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.debug_struct("WatcherHandle").field("id", &self.id).finish_non_exhaustive()
    }
}

impl Drop for WatcherHandle {
    fn drop(&mut self) {
        self.registry.deregister_watcher(self.id);
        trace!(watcher_id = %self.id, "Watcher deregistered");
    }
}

use std::time::Duration;

use tokio::time::sleep_until;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::debug;
use tracing::trace;

use super::WatchEnd;
use super::WatchOutcome;
use super::WatcherHandle;
use crate::metrics::WATCH_CALLS;

/// Accumulates every key delivered to `handle` until `window` elapses or
/// `cancel` fires.
///
/// The deadline is computed once on entry; deliveries do not extend it. The
/// handle is consumed, so the watcher is deregistered when this returns, and
/// also if the returned future is dropped mid-wait.
pub async fn collect_changes(
    mut handle: WatcherHandle,
    window: Duration,
    cancel: &CancellationToken,
) -> WatchOutcome {
    let watcher_id = handle.id();
    let deadline = sleep_until(Instant::now() + window);
    tokio::pin!(deadline);

    let mut changed_keys = Vec::new();
    let end = loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break WatchEnd::Cancelled,
            _ = &mut deadline => break WatchEnd::TimedOut,
            Some(key) = handle.recv() => {
                trace!(watcher_id = %watcher_id, key = %key, "Watcher received change");
                changed_keys.push(key);
            }
        }
    };
    // Keys already queued when the wait ended changed inside the window.
    while let Some(key) = handle.try_recv() {
        changed_keys.push(key);
    }
    drop(handle);

    WATCH_CALLS.with_label_values(&[end.as_str()]).inc();
    debug!(
        watcher_id = %watcher_id,
        changes = changed_keys.len(),
        end = end.as_str(),
        "Watch finished"
    );

    WatchOutcome {
        watcher_id,
        changed_keys,
        end,
    }
}

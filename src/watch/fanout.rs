use tokio::sync::mpsc::error::TrySendError;
use tracing::trace;

use super::WatcherSlot;
use crate::metrics::NOTIFICATIONS_DELIVERED;
use crate::metrics::NOTIFICATIONS_DROPPED;

/// Per-call delivery counts of one fan-out
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FanOutReport {
    /// Key enqueued
    pub delivered: usize,
    /// Queue was full, notification discarded
    pub dropped: usize,
    /// Watcher already finishing, nothing to do
    pub closed: usize,
}

/// Enqueues `key` onto every watcher queue in `slots`.
///
/// Never blocks: a full queue drops the notification for that watcher only.
/// Must be called without the store lock held.
pub(crate) fn fan_out(
    slots: &[WatcherSlot],
    key: &str,
) -> FanOutReport {
    let mut report = FanOutReport::default();

    for slot in slots {
        match slot.sender.try_send(key.to_string()) {
            Ok(()) => report.delivered += 1,
            Err(TrySendError::Full(_)) => {
                trace!(watcher_id = %slot.id, key, "Watcher queue full, notification dropped");
                report.dropped += 1;
            }
            Err(TrySendError::Closed(_)) => report.closed += 1,
        }
    }

    NOTIFICATIONS_DELIVERED.inc_by(report.delivered as u64);
    NOTIFICATIONS_DROPPED.inc_by(report.dropped as u64);

    trace!(
        key,
        delivered = report.delivered,
        dropped = report.dropped,
        closed = report.closed,
        "Change fanned out"
    );

    report
}

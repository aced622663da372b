//! Registry of active watchers.
//!
//! The registry is plain data: it lives inside the store state and is only
//! touched while the store lock is held. Fan-out works on a [`Vec`] of
//! [`WatcherSlot`]s copied out under that lock, so delivery never needs it.

use std::collections::HashMap;
use std::fmt;

use tokio::sync::mpsc;

/// Identifier of one registered watcher.
///
/// Allocated from a monotonic counter and never reused by the same registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WatcherId(u64);

impl WatcherId {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for WatcherId {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "watcher-{}", self.0)
    }
}

/// Delivery end of a watcher's queue, as seen by fan-out
#[derive(Debug, Clone)]
pub(crate) struct WatcherSlot {
    pub(crate) id: WatcherId,
    pub(crate) sender: mpsc::Sender<String>,
}

#[derive(Debug)]
pub(crate) struct WatchRegistry {
    watchers: HashMap<WatcherId, mpsc::Sender<String>>,
    next_id: u64,
    queue_capacity: usize,
}

impl WatchRegistry {
    /// # Panics
    /// Panics if `queue_capacity` is 0; configuration validation rejects it earlier.
    pub(crate) fn new(queue_capacity: usize) -> Self {
        assert!(queue_capacity > 0, "watcher queue capacity must be greater than 0");
        Self {
            watchers: HashMap::new(),
            next_id: 1,
            queue_capacity,
        }
    }

    /// Allocates a fresh id and bounded queue, returning the receiving end.
    pub(crate) fn register(&mut self) -> (WatcherId, mpsc::Receiver<String>) {
        let id = WatcherId(self.next_id);
        self.next_id += 1;

        let (sender, receiver) = mpsc::channel(self.queue_capacity);
        let previous = self.watchers.insert(id, sender);
        debug_assert!(previous.is_none(), "watcher id {id} allocated twice");

        (id, receiver)
    }

    /// Returns false when `id` was not registered.
    pub(crate) fn deregister(
        &mut self,
        id: WatcherId,
    ) -> bool {
        self.watchers.remove(&id).is_some()
    }

    /// Copies out every delivery handle.
    pub(crate) fn slots(&self) -> Vec<WatcherSlot> {
        self.watchers
            .iter()
            .map(|(id, sender)| WatcherSlot {
                id: *id,
                sender: sender.clone(),
            })
            .collect()
    }

    pub(crate) fn contains(
        &self,
        id: WatcherId,
    ) -> bool {
        self.watchers.contains_key(&id)
    }

    pub(crate) fn len(&self) -> usize {
        self.watchers.len()
    }

    pub(crate) fn queue_capacity(&self) -> usize {
        self.queue_capacity
    }
}

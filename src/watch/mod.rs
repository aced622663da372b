//! Watch mechanism for monitoring key changes
//!
//! A Watch call registers a watcher, waits for a fixed window while collecting
//! every changed key delivered to it, then deregisters and returns the keys.
//!
//! ```text
//! Set(k, v) [store lock held]
//!   compare with current value -> changed? -> snapshot WatcherSlots
//! [lock released]
//!   fan_out(slots, k) -> try_send per watcher queue (bounded, drop if full)
//!                              |
//!                              v
//! Watch [no lock held]
//!   collect_changes(handle, window) -> "k1,k2,"
//!   WatcherHandle dropped -> deregistered under the store lock
//! ```
//!
//! # Delivery policy
//!
//! `Set` is never blocked by a watcher. When a watcher's queue is full the
//! notification for that watcher is dropped and counted in
//! `kvwatch_notifications_dropped_total`; other watchers are unaffected.
//!
//! # Key filter
//!
//! Watch accepts a key argument but watches every key. The argument is logged
//! and otherwise ignored.

mod collector;
mod fanout;
mod handle;
mod outcome;
mod registry;


pub use collector::collect_changes;
pub use fanout::FanOutReport;
pub(crate) use fanout::fan_out;
pub(crate) use handle::WatcherDeregister;
pub use handle::WatcherHandle;
pub use outcome::{decode_changed_keys, encode_changed_keys, WatchEnd, WatchOutcome};
pub(crate) use registry::{WatchRegistry, WatcherSlot};
pub use registry::WatcherId;

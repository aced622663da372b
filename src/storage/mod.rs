//! Key-value storage with change notification.
//!
//! [`KvStore`] is the authoritative key→value map. It owns the watcher
//! registry so that a value change and the set of watchers to notify are
//! decided under the same lock.

mod kv_store;


pub use kv_store::*;

//! In-memory key-value store with change notification, served over gRPC.
//!
//! - [`KvStore`] - string map plus the watcher registry
//! - [`collect_changes`] / [`WatcherHandle`] - the watch mechanism
//! - [`start_rpc_server`] - the `kvwatch.KvStorage` gRPC service
//! - [`KvWatchClient`] - client for that service
//! - [`KvWatchConfig`] - layered configuration

mod client;
mod config;
mod constants;
mod errors;
mod metrics;
mod network;
mod storage;
mod watch;

pub mod proto;
pub mod utils;

pub use client::*;
pub use config::*;
pub use errors::*;
pub use metrics::*;
pub use network::*;
pub use storage::*;
pub use utils::*;
pub use watch::*;

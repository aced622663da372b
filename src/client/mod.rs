//! Client for the `kvwatch` gRPC service
//!
//! # Basic Usage
//! ```no_run
//! use kvwatch::KvWatchClient;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let client = KvWatchClient::connect("http://127.0.0.1:1234").await.unwrap();
//!
//!     let count = client.set("user:1001", "Alice").await.unwrap();
//!     let value = client.get("user:1001").await.unwrap();
//!     println!("{count} keys, user:1001 = {value}");
//!
//!     // Blocks for the server's watch window
//!     let changed = client.watch("user:1001").await.unwrap();
//!     println!("changed: {changed:?}");
//! }
//! ```

mod error;
mod kv_client;

#[cfg(test)]
mod kv_client_test;

pub use error::*;
pub use kv_client::KvWatchClient;

use std::time::Duration;

use config::ConfigError;
use serde::Deserialize;
use serde::Serialize;
use tracing::warn;

use crate::Error;
use crate::Result;

/// Configuration for the Watch mechanism
///
/// # Configuration Example
///
/// ```toml
/// [watch]
/// watcher_queue_capacity = 10
/// timeout_in_ms = 10000
/// ```
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct WatchConfig {
    /// Capacity of each watcher's notification queue
    ///
    /// Notifications arriving while the queue is full are dropped for that
    /// watcher; `Set` is never blocked by a slow watcher.
    ///
    /// **Default**: 10
    #[serde(default = "default_watcher_queue_capacity")]
    pub watcher_queue_capacity: usize,

    /// How long one Watch call accumulates changes before returning
    ///
    /// Measured once when the call starts.
    ///
    /// **Default**: 10000 (10 seconds)
    #[serde(default = "default_timeout_in_ms")]
    pub timeout_in_ms: u64,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            watcher_queue_capacity: default_watcher_queue_capacity(),
            timeout_in_ms: default_timeout_in_ms(),
        }
    }
}

impl WatchConfig {
    /// Validates watch configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.watcher_queue_capacity == 0 {
            return Err(Error::Config(ConfigError::Message(
                "watch.watcher_queue_capacity must be greater than 0".into(),
            )));
        }

        if self.watcher_queue_capacity > 1000 {
            warn!(
                "watch.watcher_queue_capacity ({}) is very large; every Set fans out to each queue",
                self.watcher_queue_capacity
            );
        }

        if self.timeout_in_ms == 0 {
            return Err(Error::Config(ConfigError::Message(
                "watch.timeout_in_ms must be greater than 0".into(),
            )));
        }

        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_in_ms)
    }
}

const fn default_watcher_queue_capacity() -> usize {
    10
}

const fn default_timeout_in_ms() -> u64 {
    10_000
}

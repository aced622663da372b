use std::net::SocketAddr;
use std::path::PathBuf;

use config::ConfigError;
use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::NetworkError;
use crate::Result;

/// gRPC listener parameters
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerConfig {
    /// Socket address the KvStorage service binds to
    #[serde(default = "default_listen_address")]
    pub listen_address: String,

    /// Directory receiving `kvwatch.log`
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,

    /// Max concurrent requests per connection.
    ///
    /// Each in-flight Watch holds one slot for the whole watch window.
    #[serde(default = "default_concurrency_limit")]
    pub concurrency_limit_per_connection: usize,

    /// TCP keepalive in seconds (0 to disable)
    #[serde(default = "default_tcp_keepalive")]
    pub tcp_keepalive_in_secs: u64,

    #[serde(default = "default_tcp_nodelay")]
    pub tcp_nodelay: bool,

    /// Accept and send gzip-compressed messages
    #[serde(default = "default_enable_compression")]
    pub enable_compression: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: default_listen_address(),
            log_dir: default_log_dir(),
            concurrency_limit_per_connection: default_concurrency_limit(),
            tcp_keepalive_in_secs: default_tcp_keepalive(),
            tcp_nodelay: default_tcp_nodelay(),
            enable_compression: default_enable_compression(),
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> Result<()> {
        self.socket_addr()?;

        if self.log_dir.as_os_str().is_empty() {
            return Err(Error::Config(ConfigError::Message(
                "server.log_dir cannot be empty".into(),
            )));
        }

        if self.concurrency_limit_per_connection == 0 {
            return Err(Error::Config(ConfigError::Message(
                "server.concurrency_limit_per_connection must be greater than 0".into(),
            )));
        }

        Ok(())
    }

    /// Parsed `listen_address`
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        self.listen_address.parse().map_err(|e| {
            NetworkError::InvalidAddress(format!(
                "server.listen_address {:?} is not a socket address: {}",
                self.listen_address, e
            ))
            .into()
        })
    }
}

fn default_listen_address() -> String {
    "127.0.0.1:1234".to_string()
}
fn default_log_dir() -> PathBuf {
    PathBuf::from("./logs")
}
fn default_concurrency_limit() -> usize {
    256
}
fn default_tcp_keepalive() -> u64 {
    60
}
fn default_tcp_nodelay() -> bool {
    true
}
fn default_enable_compression() -> bool {
    false
}

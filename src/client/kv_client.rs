use std::time::Duration;

use tonic::codec::CompressionEncoding;
use tonic::transport::Channel;
use tonic::transport::Endpoint;
use tracing::debug;
use tracing::error;

use super::ClientError;
use crate::constants::DEFAULT_CLIENT_CONNECT_TIMEOUT_MS;
use crate::decode_changed_keys;
use crate::proto::kv_storage_client::KvStorageClient;
use crate::proto::GetRequest;
use crate::proto::SetRequest;
use crate::proto::WatchRequest;

/// Client for a `kvwatch` server
///
/// Cloning shares the underlying channel.
#[derive(Debug, Clone)]
pub struct KvWatchClient {
    inner: KvStorageClient<Channel>,
}

impl KvWatchClient {
    /// Connects to `endpoint`, e.g. `http://127.0.0.1:1234`
    pub async fn connect(endpoint: impl Into<String>) -> Result<Self, ClientError> {
        Self::connect_with(endpoint, false).await
    }

    /// Connects with gzip request/response compression turned on or off.
    /// The server must be started with `enable_compression` to match.
    pub async fn connect_with(
        endpoint: impl Into<String>,
        enable_compression: bool,
    ) -> Result<Self, ClientError> {
        let endpoint = endpoint.into();
        let channel = Endpoint::from_shared(endpoint.clone())
            .map_err(|source| ClientError::InvalidEndpoint {
                endpoint: endpoint.clone(),
                source,
            })?
            .connect_timeout(Duration::from_millis(DEFAULT_CLIENT_CONNECT_TIMEOUT_MS))
            .tcp_nodelay(true)
            .connect()
            .await
            .map_err(|e| {
                error!("connect to {} failed: {:?}", endpoint, e);
                ClientError::Transport(e)
            })?;
        debug!("connected to {}", endpoint);

        let mut inner = KvStorageClient::new(channel);
        if enable_compression {
            inner = inner
                .send_compressed(CompressionEncoding::Gzip)
                .accept_compressed(CompressionEncoding::Gzip);
        }
        Ok(Self { inner })
    }

    /// Value stored under `key`; the empty string when it was never set
    pub async fn get(
        &self,
        key: impl Into<String>,
    ) -> Result<String, ClientError> {
        let mut client = self.inner.clone();
        let response = client.get(GetRequest { key: key.into() }).await?;
        Ok(response.into_inner().value)
    }

    /// Stores `value` under `key` and returns the number of distinct keys
    pub async fn set(
        &self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<u64, ClientError> {
        let mut client = self.inner.clone();
        let response = client
            .set(SetRequest {
                key: key.into(),
                value: value.into(),
            })
            .await?;
        parse_count(&response.into_inner().count)
    }

    /// Blocks for the server's watch window and returns every key changed in
    /// it, in delivery order. `key` is sent but the server does not filter on it.
    pub async fn watch(
        &self,
        key: impl Into<String>,
    ) -> Result<Vec<String>, ClientError> {
        let mut client = self.inner.clone();
        let response = client.watch(WatchRequest { key: key.into() }).await?;
        Ok(decode_changed_keys(&response.into_inner().changed_keys))
    }

    /// Same as [`watch`](Self::watch) but returns the raw comma-terminated list
    pub async fn watch_raw(
        &self,
        key: impl Into<String>,
    ) -> Result<String, ClientError> {
        let mut client = self.inner.clone();
        let response = client.watch(WatchRequest { key: key.into() }).await?;
        Ok(response.into_inner().changed_keys)
    }
}

pub(super) fn parse_count(count: &str) -> Result<u64, ClientError> {
    count
        .parse::<u64>()
        .map_err(|_| ClientError::InvalidCount(count.to_string()))
}

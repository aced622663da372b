//! gRPC adapter carrying Get, Set and Watch calls into a [`KvStore`].
//!
//! The adapter adds no semantics: every request maps to one store call and
//! none of them produce an error status.

use tokio_util::sync::CancellationToken;
use tonic::Request;
use tonic::Response;
use tonic::Status;
use tracing::debug;

use crate::proto::kv_storage_server::KvStorage;
use crate::proto::GetRequest;
use crate::proto::GetResponse;
use crate::proto::SetRequest;
use crate::proto::SetResponse;
use crate::proto::WatchRequest;
use crate::proto::WatchResponse;
use crate::KvStore;

#[derive(Debug, Clone)]
pub struct KvStorageService {
    store: KvStore,
    /// Fired on server shutdown so in-flight Watch calls return early
    shutdown: CancellationToken,
}

impl KvStorageService {
    pub fn new(
        store: KvStore,
        shutdown: CancellationToken,
    ) -> Self {
        Self { store, shutdown }
    }

    pub fn store(&self) -> &KvStore {
        &self.store
    }
}

#[tonic::async_trait]
impl KvStorage for KvStorageService {
    #[tracing::instrument(skip_all)]
    async fn get(
        &self,
        request: Request<GetRequest>,
    ) -> std::result::Result<Response<GetResponse>, Status> {
        let GetRequest { key } = request.into_inner();
        let value = self.store.get(&key);
        Ok(Response::new(GetResponse { value }))
    }

    #[tracing::instrument(skip_all)]
    async fn set(
        &self,
        request: Request<SetRequest>,
    ) -> std::result::Result<Response<SetResponse>, Status> {
        let SetRequest { key, value } = request.into_inner();
        let count = self.store.set(key, value);
        Ok(Response::new(SetResponse {
            count: count.to_string(),
        }))
    }

    /// Blocks for the configured watch window, then returns every key that
    /// changed, comma-terminated. A client disconnect drops this future, which
    /// deregisters the watcher.
    #[tracing::instrument(skip_all)]
    async fn watch(
        &self,
        request: Request<WatchRequest>,
    ) -> std::result::Result<Response<WatchResponse>, Status> {
        let WatchRequest { key } = request.into_inner();
        let outcome = self.store.watch(&key, &self.shutdown).await;
        debug!(
            watcher_id = %outcome.watcher_id,
            end = outcome.end.as_str(),
            "[rpc|watch] responding with {} changes",
            outcome.changed_keys.len()
        );
        Ok(Response::new(WatchResponse {
            changed_keys: outcome.encode(),
        }))
    }
}

//! gRPC server hosting the `KvStorage` service
//!
//! The server is the remote-call collaborator of the store: it accepts
//! connections, decodes requests, and hands them to [`KvStorageService`].

mod kv_storage_service;
pub use kv_storage_service::*;


//-------------------------------------------------------------------------------
// Start RPC Server
use std::time::Duration;

use futures::FutureExt;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tonic::codec::CompressionEncoding;
use tonic::transport::server::TcpIncoming;
use tonic_health::server::health_reporter;
use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::warn;

use crate::proto::kv_storage_server::KvStorageServer;
use crate::KvStore;
use crate::NetworkError;
use crate::Result;
use crate::ServerConfig;

/// Binds `config.listen_address` and serves until `shutdown_signal` fires.
pub async fn start_rpc_server(
    store: KvStore,
    config: &ServerConfig,
    shutdown_signal: watch::Receiver<()>,
) -> Result<()> {
    let listen_address = config.socket_addr()?;
    let listener = TcpListener::bind(listen_address).await?;
    info!("KvStorage gRPC server listening on {}", listen_address);

    serve_with_listener(store, listener, config, shutdown_signal).await
}

/// Serves the `KvStorage` and health services on an already bound listener.
///
/// When `shutdown_signal` fires, in-flight Watch calls are cancelled so they
/// return what they collected and the server can drain.
pub async fn serve_with_listener(
    store: KvStore,
    listener: TcpListener,
    config: &ServerConfig,
    mut shutdown_signal: watch::Receiver<()>,
) -> Result<()> {
    let local_address = listener.local_addr()?;

    // Create a HealthReporter to manage the health status
    let (mut health_reporter, health_service) = health_reporter();
    health_reporter
        .set_serving::<KvStorageServer<KvStorageService>>()
        .await;

    let watch_shutdown = CancellationToken::new();
    let mut kv_storage = KvStorageServer::new(KvStorageService::new(store, watch_shutdown.clone()));
    if config.enable_compression {
        kv_storage = kv_storage
            .accept_compressed(CompressionEncoding::Gzip)
            .send_compressed(CompressionEncoding::Gzip);
    }

    let keepalive = (config.tcp_keepalive_in_secs > 0)
        .then(|| Duration::from_secs(config.tcp_keepalive_in_secs));
    let incoming = TcpIncoming::from_listener(listener, config.tcp_nodelay, keepalive)
        .map_err(|e| NetworkError::Incoming(e.to_string()))?;

    if let Err(e) = tonic::transport::Server::builder()
        .concurrency_limit_per_connection(config.concurrency_limit_per_connection)
        .add_service(health_service)
        .add_service(kv_storage)
        .serve_with_incoming_shutdown(
            incoming,
            shutdown_signal.changed().map(move |_s| {
                warn!("Stopping RPC server. {}", local_address);
                watch_shutdown.cancel();
            }),
        )
        .await
    {
        error!("error to start rpc server :{:?}.", e);
        return Err(NetworkError::Transport(e).into());
    }
    debug!("rpc service finished!");
    Ok(())
}

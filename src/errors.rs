//! Error hierarchy for the kvwatch server.
//!
//! Store and watch operations never fail; errors only arise while loading
//! configuration and running the transport around the store.

use config::ConfigError;

#[doc(hidden)]
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Configuration loading or validation failures
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// gRPC server and listener failures
    #[error(transparent)]
    Network(#[from] NetworkError),

    /// Log file and socket I/O failures
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum NetworkError {
    /// Malformed listen address in configuration
    #[error("Invalid listen address: {0}")]
    InvalidAddress(String),

    /// gRPC transport layer errors
    #[error(transparent)]
    Transport(#[from] tonic::transport::Error),

    /// Failure to wrap the bound listener for tonic
    #[error("Failed to set up incoming connections: {0}")]
    Incoming(String),

    #[error("{0}")]
    SignalSendFailed(String),
}

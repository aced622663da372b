use thiserror::Error;

/// Errors surfaced by [`KvWatchClient`](super::KvWatchClient)
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid endpoint {endpoint}: {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: tonic::transport::Error,
    },

    #[error("Failed to connect: {0}")]
    Transport(#[from] tonic::transport::Error),

    #[error("Server returned status {}: {}", .0.code(), .0.message())]
    Status(Box<tonic::Status>),

    #[error("Server returned malformed key count {0:?}")]
    InvalidCount(String),
}

impl From<tonic::Status> for ClientError {
    fn from(status: tonic::Status) -> Self {
        ClientError::Status(Box::new(status))
    }
}

//! Network layer: the gRPC server that carries remote calls into the store.
pub mod grpc;

pub use grpc::serve_with_listener;
pub use grpc::start_rpc_server;
pub use grpc::KvStorageService;

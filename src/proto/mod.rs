//! Protocol Buffer messages and generated gRPC glue for the `KvStorage` service.
//!
//! Messages are declared directly with `prost` derives. The service and client
//! modules (`kv_storage_server`, `kv_storage_client`) are generated by
//! [`tonic-build`] from `build.rs`.

/// Read the value stored under `key`.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetRequest {
    #[prost(string, tag = "1")]
    pub key: ::prost::alloc::string::String,
}

/// Value for the requested key, empty when the key was never set.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct GetResponse {
    #[prost(string, tag = "1")]
    pub value: ::prost::alloc::string::String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SetRequest {
    #[prost(string, tag = "1")]
    pub key: ::prost::alloc::string::String,
    #[prost(string, tag = "2")]
    pub value: ::prost::alloc::string::String,
}

/// Number of distinct keys after the write, as a decimal string.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SetResponse {
    #[prost(string, tag = "1")]
    pub count: ::prost::alloc::string::String,
}

/// `key` is accepted for compatibility but does not filter notifications.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct WatchRequest {
    #[prost(string, tag = "1")]
    pub key: ::prost::alloc::string::String,
}

/// Comma-terminated list of keys that changed during the watch window.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct WatchResponse {
    #[prost(string, tag = "1")]
    pub changed_keys: ::prost::alloc::string::String,
}

include!(concat!(env!("OUT_DIR"), "/kvwatch.KvStorage.rs"));

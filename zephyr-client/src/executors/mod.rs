//! Chain RPC executor implementations.
//!
//! Executors implement [`crate::rpc::ChainRpc`] against a concrete
//! endpoint. The HTTP executor requires the `http-executor` feature; without
//! it, constructors still exist and calls return a `NetworkFailure`
//! explaining the missing feature.

pub mod http;

pub use http::HttpRpcClient;

//! System Launcher Client Library
//!
//! JSON-RPC client for the launcher daemon over HTTP.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod protocol;
pub mod retry;
pub mod transport;

pub use api::ClientApi;
pub use client::{BatchOperation, BatchResult, RpcClient};
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use retry::{connect_with_retry, RetryPolicy};
pub use transport::{HttpTransport, Transport};

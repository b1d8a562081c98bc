//! JSON-RPC over HTTP transport

pub mod protocol;
pub mod server;

pub use protocol::{JsonRpcError, Request, Response};
pub use server::{dispatch, router, ListenerState, RpcServer, RpcServerError};

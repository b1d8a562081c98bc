//! System Launcher Server Library
//!
//! Method registry, JSON-RPC transport and handlers, exposed as a library for testing.

pub mod api;
pub mod registry;
pub mod rpc;
pub mod service;

pub use api::{build_registry, ApiError};
pub use registry::{Handler, MethodRegistry};
pub use rpc::{ListenerState, RpcServer, RpcServerError};
pub use service::{LauncherServer, ServiceError};

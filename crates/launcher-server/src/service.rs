//! Launcher service: a [`Core`] plus the RPC server that exposes it

use launcher_core::models::LauncherConfig;
use launcher_core::Core;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info};

use crate::api;
use crate::rpc::{RpcServer, RpcServerError};

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Core(#[from] launcher_core::Error),

    #[error(transparent)]
    Rpc(#[from] RpcServerError),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, ServiceError>;

pub struct LauncherServer {
    core: Arc<Core>,
    rpc: RpcServer,
}

impl LauncherServer {
    pub fn new(config: LauncherConfig) -> Self {
        let host = config.server.host.clone();
        let port = config.server.rpc_port;
        let core = Arc::new(Core::new(config));
        let registry = Arc::new(api::build_registry(&core));

        Self {
            rpc: RpcServer::new(host, port, registry),
            core,
        }
    }

    pub fn core(&self) -> &Arc<Core> {
        &self.core
    }

    pub fn rpc(&self) -> &RpcServer {
        &self.rpc
    }

    /// Initialize the core, then start listening.
    pub async fn start(&self) -> Result<SocketAddr> {
        info!("Starting launcher service");

        let core = Arc::clone(&self.core);
        tokio::task::spawn_blocking(move || core.initialize()).await??;

        let addr = match self.rpc.start().await {
            Ok(addr) => addr,
            Err(e) => {
                error!("RPC server failed to start: {}", e);
                self.core.destroy();
                return Err(e.into());
            }
        };
        info!("Launcher service ready on {}", addr);
        Ok(addr)
    }

    /// Stop listening, then tear the core down.
    pub async fn stop(&self) {
        info!("Stopping launcher service");
        self.rpc.stop().await;
        self.core.destroy();
        info!("Launcher service stopped");
    }

    pub async fn status(&self) -> Value {
        json!({
            "server": self.rpc.status().await,
            "core": self.core.status(),
        })
    }
}

//! API handlers

pub mod components;
pub mod fs;
pub mod system;
pub mod trigger_api;

use launcher_core::Core;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use tracing::info;

use crate::registry::MethodRegistry;

/// API error
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Method not found: {0}")]
    MethodNotFound(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error(transparent)]
    Core(#[from] launcher_core::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, ApiError>;

pub(crate) fn parse_params<T: DeserializeOwned>(params: Value) -> Result<T> {
    serde_json::from_value(params).map_err(|e| ApiError::InvalidParams(e.to_string()))
}

/// Adapt `f(core, params)` to the registry's handler shape.
fn bind<F, Fut>(core: &Arc<Core>, f: F) -> impl Fn(Value) -> Fut + Send + Sync + 'static
where
    F: Fn(Arc<Core>, Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value>> + Send + 'static,
{
    let core = Arc::clone(core);
    move |params| f(Arc::clone(&core), params)
}

/// Register every launcher method against `core`.
pub fn register_all(registry: &mut MethodRegistry, core: &Arc<Core>) {
    // File systems
    registry.register("fs.create", bind(core, fs::create));
    registry.register("fs.read", bind(core, fs::read));
    registry.register("fs.update", bind(core, fs::update));
    registry.register("fs.delete", bind(core, fs::delete));
    registry.register("fs.exists", bind(core, fs::exists));
    registry.register("fs.list", bind(core, fs::list));
    registry.register("fs.getInfo", bind(core, fs::get_info));
    registry.register("fs.stats", bind(core, fs::stats));
    registry.register("fs.search", bind(core, fs::search));
    registry.register("fs.clear", bind(core, fs::clear));
    registry.register("fs.history", bind(core, fs::history));
    registry.register("fs.gitStatus", bind(core, fs::git_status));

    // Components
    registry.register("container.create", bind(core, components::container_create));
    registry.register("container.start", bind(core, components::container_start));
    registry.register("container.stop", bind(core, components::container_stop));
    registry.register("container.remove", bind(core, components::container_remove));
    registry.register("container.list", bind(core, components::container_list));

    registry.register("script.execute", bind(core, components::script_execute));
    registry.register("script.list", bind(core, components::script_list));
    registry.register("script.getStatus", bind(core, components::script_get_status));

    registry.register("trigger.create", bind(core, components::trigger_create));
    registry.register("trigger.start", bind(core, components::trigger_start));
    registry.register("trigger.stop", bind(core, components::trigger_stop));
    registry.register("trigger.list", bind(core, components::trigger_list));

    trigger_api::register(registry, core);

    registry.register("workflow.create", bind(core, components::workflow_create));
    registry.register("workflow.start", bind(core, components::workflow_start));
    registry.register("workflow.stop", bind(core, components::workflow_stop));
    registry.register("workflow.list", bind(core, components::workflow_list));

    registry.register("persistence.save", bind(core, components::persistence_save));
    registry.register("persistence.load", bind(core, components::persistence_load));
    registry.register("persistence.delete", bind(core, components::persistence_delete));

    // System
    registry.register("system.getStatus", bind(core, system::get_status));
    registry.register("system.getFSList", bind(core, system::get_fs_list));
    registry.register("system.getComponents", bind(core, system::get_components));

    info!("Registered {} RPC methods", registry.len());
}

/// Build a registry with every launcher method registered.
pub fn build_registry(core: &Arc<Core>) -> MethodRegistry {
    let mut registry = MethodRegistry::new();
    register_all(&mut registry, core);
    registry
}

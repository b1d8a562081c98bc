use launcher_core::Core;
use serde_json::Value;
use std::sync::Arc;

use super::Result;

pub async fn get_status(core: Arc<Core>, _params: Value) -> Result<Value> {
    Ok(core.status())
}

pub async fn get_fs_list(core: Arc<Core>, _params: Value) -> Result<Value> {
    Ok(serde_json::to_value(core.fs_list())?)
}

pub async fn get_components(core: Arc<Core>, _params: Value) -> Result<Value> {
    Ok(serde_json::to_value(core.component_names())?)
}

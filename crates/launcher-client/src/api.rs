//! Typed helpers over [`RpcClient`] for every launcher namespace

use serde_json::{json, Map, Value};
use std::sync::Arc;

use crate::client::{BatchOperation, BatchResult, RpcClient};
use crate::error::Result;

fn with_fs(mut params: Value, fs_name: Option<&str>) -> Value {
    if let (Some(name), Some(fields)) = (fs_name, params.as_object_mut()) {
        fields.insert("fsName".to_string(), Value::String(name.to_string()));
    }
    params
}

/// Launcher API client. Omitted `fs_name` arguments use the server default (`local`).
#[derive(Clone)]
pub struct ClientApi {
    client: Arc<RpcClient>,
}

impl ClientApi {
    pub fn new(client: Arc<RpcClient>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Arc<RpcClient> {
        &self.client
    }

    pub async fn connect(&self) -> Result<()> {
        self.client.connect().await
    }

    pub fn disconnect(&self) {
        self.client.disconnect()
    }

    pub async fn call(&self, method: &str, params: Value) -> Result<Value> {
        self.client.call(method, params).await
    }

    pub async fn batch(&self, operations: &[BatchOperation]) -> Vec<BatchResult> {
        self.client.batch(operations).await
    }

    // File system methods

    pub async fn create_file(
        &self,
        path: &str,
        data: &str,
        fs_name: Option<&str>,
    ) -> Result<Value> {
        let params = with_fs(json!({ "path": path, "data": data }), fs_name);
        self.call("fs.create", params).await
    }

    /// `Value::Null` when the file does not exist.
    pub async fn read_file(&self, path: &str, fs_name: Option<&str>) -> Result<Value> {
        self.call("fs.read", with_fs(json!({ "path": path }), fs_name))
            .await
    }

    pub async fn update_file(
        &self,
        path: &str,
        data: &str,
        fs_name: Option<&str>,
    ) -> Result<Value> {
        let params = with_fs(json!({ "path": path, "data": data }), fs_name);
        self.call("fs.update", params).await
    }

    pub async fn delete_file(&self, path: &str, fs_name: Option<&str>) -> Result<Value> {
        self.call("fs.delete", with_fs(json!({ "path": path }), fs_name))
            .await
    }

    pub async fn file_exists(&self, path: &str, fs_name: Option<&str>) -> Result<Value> {
        self.call("fs.exists", with_fs(json!({ "path": path }), fs_name))
            .await
    }

    pub async fn list_files(&self, fs_name: Option<&str>) -> Result<Value> {
        self.call("fs.list", with_fs(json!({}), fs_name)).await
    }

    pub async fn file_info(&self, path: &str, fs_name: Option<&str>) -> Result<Value> {
        self.call("fs.getInfo", with_fs(json!({ "path": path }), fs_name))
            .await
    }

    pub async fn fs_stats(&self, fs_name: Option<&str>) -> Result<Value> {
        self.call("fs.stats", with_fs(json!({}), fs_name)).await
    }

    pub async fn search_files(&self, pattern: &str, fs_name: Option<&str>) -> Result<Value> {
        self.call("fs.search", with_fs(json!({ "pattern": pattern }), fs_name))
            .await
    }

    pub async fn clear_fs(&self, fs_name: Option<&str>) -> Result<Value> {
        self.call("fs.clear", with_fs(json!({}), fs_name)).await
    }

    pub async fn fs_history(&self, limit: Option<usize>, fs_name: Option<&str>) -> Result<Value> {
        self.call("fs.history", with_fs(json!({ "limit": limit }), fs_name))
            .await
    }

    pub async fn fs_git_status(&self, fs_name: Option<&str>) -> Result<Value> {
        self.call("fs.gitStatus", with_fs(json!({}), fs_name)).await
    }

    // Container methods

    pub async fn container_create(&self, config: Value) -> Result<Value> {
        self.call("container.create", config).await
    }

    pub async fn container_start(&self, container_id: &str) -> Result<Value> {
        self.call("container.start", json!({ "containerId": container_id }))
            .await
    }

    pub async fn container_stop(&self, container_id: &str) -> Result<Value> {
        self.call("container.stop", json!({ "containerId": container_id }))
            .await
    }

    pub async fn container_remove(&self, container_id: &str) -> Result<Value> {
        self.call("container.remove", json!({ "containerId": container_id }))
            .await
    }

    pub async fn container_list(&self) -> Result<Value> {
        self.call("container.list", json!({})).await
    }

    // Script methods

    pub async fn script_execute(&self, script_path: &str, args: Value) -> Result<Value> {
        self.call(
            "script.execute",
            json!({ "scriptPath": script_path, "args": args }),
        )
        .await
    }

    pub async fn script_list(&self) -> Result<Value> {
        self.call("script.list", json!({})).await
    }

    pub async fn script_status(&self, script_id: &str) -> Result<Value> {
        self.call("script.getStatus", json!({ "scriptId": script_id }))
            .await
    }

    // Trigger methods

    pub async fn trigger_create(&self, config: Value) -> Result<Value> {
        self.call("trigger.create", config).await
    }

    pub async fn trigger_start(&self, trigger_id: &str) -> Result<Value> {
        self.call("trigger.start", json!({ "triggerId": trigger_id }))
            .await
    }

    pub async fn trigger_stop(&self, trigger_id: &str) -> Result<Value> {
        self.call("trigger.stop", json!({ "triggerId": trigger_id }))
            .await
    }

    pub async fn trigger_list(&self) -> Result<Value> {
        self.call("trigger.list", json!({})).await
    }

    /// Call `trigger_api.<family>.<method>`.
    pub async fn trigger_api(&self, family: &str, method: &str, params: Value) -> Result<Value> {
        self.call(&format!("trigger_api.{}.{}", family, method), params)
            .await
    }

    // Workflow methods

    pub async fn workflow_create(&self, config: Value) -> Result<Value> {
        self.call("workflow.create", config).await
    }

    pub async fn workflow_start(&self, workflow_id: &str) -> Result<Value> {
        self.call("workflow.start", json!({ "workflowId": workflow_id }))
            .await
    }

    pub async fn workflow_stop(&self, workflow_id: &str) -> Result<Value> {
        self.call("workflow.stop", json!({ "workflowId": workflow_id }))
            .await
    }

    pub async fn workflow_list(&self) -> Result<Value> {
        self.call("workflow.list", json!({})).await
    }

    // Persistence methods

    pub async fn persistence_save(&self, key: &str, data: Value) -> Result<Value> {
        self.call("persistence.save", json!({ "key": key, "data": data }))
            .await
    }

    pub async fn persistence_load(&self, key: &str) -> Result<Value> {
        self.call("persistence.load", json!({ "key": key })).await
    }

    pub async fn persistence_delete(&self, key: &str) -> Result<Value> {
        self.call("persistence.delete", json!({ "key": key })).await
    }

    // System methods

    pub async fn system_status(&self) -> Result<Value> {
        self.call("system.getStatus", json!({})).await
    }

    pub async fn fs_list(&self) -> Result<Value> {
        self.call("system.getFSList", json!({})).await
    }

    pub async fn components(&self) -> Result<Value> {
        self.call("system.getComponents", json!({})).await
    }

    /// Server status, file systems and components, plus this client's connection.
    pub async fn server_info(&self) -> Result<Value> {
        let mut info = Map::new();
        info.insert("status".to_string(), self.system_status().await?);
        info.insert("fsList".to_string(), self.fs_list().await?);
        info.insert("components".to_string(), self.components().await?);
        info.insert(
            "client".to_string(),
            json!({
                "endpoint": self.client.endpoint(),
                "connected": self.client.is_connected(),
                "requestCount": self.client.request_count(),
            }),
        );
        Ok(Value::Object(info))
    }
}

use super::{id_label, millis_id, timestamp, ComponentKind, Lifecycle};
use crate::models::WorkflowConfig;
use serde_json::{json, Value};
use tracing::info;

#[derive(Debug)]
pub struct Workflow {
    config: WorkflowConfig,
    lifecycle: Lifecycle,
}

impl Workflow {
    pub fn new(config: WorkflowConfig) -> Self {
        Self {
            config,
            lifecycle: Lifecycle::new(ComponentKind::Workflow),
        }
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    pub fn initialize(&self) {
        self.lifecycle.start();
    }

    pub fn destroy(&self) {
        self.lifecycle.stop();
    }

    pub fn is_initialized(&self) -> bool {
        self.lifecycle.is_initialized()
    }

    pub fn create(&self, params: &Value) -> Value {
        let name = params.get("name").cloned().unwrap_or(Value::Null);
        info!("Creating workflow {}", id_label(&name));
        json!({
            "id": millis_id(),
            "name": name,
            "config": params.get("config").cloned().unwrap_or_else(|| json!({})),
            "status": "created",
            "createdAt": timestamp(),
        })
    }

    pub fn start(&self, id: Value) -> Value {
        info!("Starting workflow {}", id_label(&id));
        json!({
            "id": id,
            "executionId": millis_id(),
            "status": "running",
            "startedAt": timestamp(),
        })
    }

    pub fn stop(&self, id: Value) -> Value {
        info!("Stopping workflow {}", id_label(&id));
        json!({ "id": id, "status": "stopped", "stoppedAt": timestamp() })
    }

    pub fn list(&self) -> Value {
        json!({ "workflows": [], "count": 0 })
    }
}

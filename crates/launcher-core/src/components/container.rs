use super::{id_label, millis_id, timestamp, ComponentKind, Lifecycle};
use crate::models::ContainerConfig;
use serde_json::{json, Value};
use tracing::info;

#[derive(Debug)]
pub struct Container {
    config: ContainerConfig,
    lifecycle: Lifecycle,
}

impl Container {
    pub fn new(config: ContainerConfig) -> Self {
        Self {
            config,
            lifecycle: Lifecycle::new(ComponentKind::Container),
        }
    }

    pub fn config(&self) -> &ContainerConfig {
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

    /// `params` may carry `name`, `image` and `config`.
    pub fn create(&self, params: &Value) -> Value {
        let name = params.get("name").cloned().unwrap_or(Value::Null);
        let image = params
            .get("image")
            .cloned()
            .unwrap_or_else(|| Value::String(self.config.default_image.clone()));
        let config = params.get("config").cloned().unwrap_or_else(|| json!({}));

        info!("Creating container {}", id_label(&name));
        json!({
            "id": millis_id(),
            "name": name,
            "image": image,
            "config": config,
            "status": "created",
            "createdAt": timestamp(),
        })
    }

    pub fn start(&self, id: Value) -> Value {
        info!("Starting container {}", id_label(&id));
        json!({ "id": id, "status": "running", "startedAt": timestamp() })
    }

    pub fn stop(&self, id: Value) -> Value {
        info!("Stopping container {}", id_label(&id));
        json!({ "id": id, "status": "stopped", "stoppedAt": timestamp() })
    }

    pub fn remove(&self, id: Value) -> Value {
        let label = id_label(&id);
        info!("Removing container {}", label);
        json!({ "success": true, "message": format!("Container {} removed", label) })
    }

    pub fn list(&self) -> Value {
        json!({ "containers": [], "count": 0 })
    }
}

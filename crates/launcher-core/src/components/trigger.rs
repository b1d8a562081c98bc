use super::{id_label, millis_id, timestamp, ComponentKind, Lifecycle};
use crate::models::TriggerConfig;
use serde_json::{json, Value};
use tracing::info;

/// Trigger manager. The event, manual, schedule and webhook families live in
/// [`super::trigger_api`].
#[derive(Debug)]
pub struct Trigger {
    config: TriggerConfig,
    lifecycle: Lifecycle,
}

impl Trigger {
    pub fn new(config: TriggerConfig) -> Self {
        Self {
            config,
            lifecycle: Lifecycle::new(ComponentKind::Trigger),
        }
    }

    pub fn config(&self) -> &TriggerConfig {
        &self.config
    }

    pub fn initialize(&self) {
        if self.lifecycle.start() {
            info!(
                "Trigger limits: max {} triggers, {} ms timeout",
                self.config.max_triggers, self.config.trigger_timeout_ms
            );
        }
    }

    pub fn destroy(&self) {
        self.lifecycle.stop();
    }

    pub fn is_initialized(&self) -> bool {
        self.lifecycle.is_initialized()
    }

    pub fn create(&self, params: &Value) -> Value {
        let kind = params.get("type").cloned().unwrap_or_else(|| json!("event"));
        info!("Creating {} trigger", id_label(&kind));
        json!({
            "id": millis_id(),
            "type": kind,
            "config": params.get("config").cloned().unwrap_or_else(|| json!({})),
            "status": "created",
            "createdAt": timestamp(),
        })
    }

    pub fn start(&self, id: Value) -> Value {
        info!("Starting trigger {}", id_label(&id));
        json!({ "id": id, "status": "active", "startedAt": timestamp() })
    }

    pub fn stop(&self, id: Value) -> Value {
        info!("Stopping trigger {}", id_label(&id));
        json!({ "id": id, "status": "stopped", "stoppedAt": timestamp() })
    }

    pub fn list(&self) -> Value {
        json!({ "triggers": [], "count": 0 })
    }
}

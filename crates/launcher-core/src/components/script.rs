use super::{millis_id, timestamp, ComponentKind, Lifecycle};
use crate::models::ScriptConfig;
use serde_json::{json, Value};
use tracing::info;

#[derive(Debug)]
pub struct Script {
    config: ScriptConfig,
    lifecycle: Lifecycle,
}

impl Script {
    pub fn new(config: ScriptConfig) -> Self {
        Self {
            config,
            lifecycle: Lifecycle::new(ComponentKind::Script),
        }
    }

    pub fn config(&self) -> &ScriptConfig {
        &self.config
    }

    pub fn initialize(&self) {
        if self.lifecycle.start() {
            info!("Script directory: {}", self.config.script_path.display());
        }
    }

    pub fn destroy(&self) {
        self.lifecycle.stop();
    }

    pub fn is_initialized(&self) -> bool {
        self.lifecycle.is_initialized()
    }

    pub fn execute(&self, script_path: &str, args: Value) -> Value {
        info!("Executing script {}", script_path);
        json!({
            "executionId": millis_id(),
            "scriptPath": script_path,
            "args": args,
            "status": "queued",
            "timeoutMs": self.config.timeout_ms,
            "startedAt": timestamp(),
        })
    }

    pub fn list(&self) -> Value {
        json!({ "scripts": [], "count": 0 })
    }

    pub fn status(&self, script_id: Value) -> Value {
        json!({ "scriptId": script_id, "status": "idle", "checkedAt": timestamp() })
    }
}

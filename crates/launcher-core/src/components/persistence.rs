use super::{ComponentKind, Lifecycle};
use crate::models::PersistenceConfig;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;

/// In-process key/value store.
#[derive(Debug)]
pub struct Persistence {
    config: PersistenceConfig,
    lifecycle: Lifecycle,
    store: Mutex<HashMap<String, Value>>,
}

impl Persistence {
    pub fn new(config: PersistenceConfig) -> Self {
        Self {
            config,
            lifecycle: Lifecycle::new(ComponentKind::Persistence),
            store: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &PersistenceConfig {
        &self.config
    }

    fn store(&self) -> MutexGuard<'_, HashMap<String, Value>> {
        self.store.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn initialize(&self) {
        self.lifecycle.start();
    }

    pub fn destroy(&self) {
        if self.lifecycle.stop() {
            let mut store = self.store();
            debug!("Dropping {} persisted keys", store.len());
            store.clear();
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.lifecycle.is_initialized()
    }

    pub fn save(&self, key: &str, data: Value) -> bool {
        self.store().insert(key.to_string(), data);
        true
    }

    pub fn load(&self, key: &str) -> Option<Value> {
        self.store().get(key).cloned()
    }

    pub fn delete(&self, key: &str) -> bool {
        self.store().remove(key).is_some()
    }
}

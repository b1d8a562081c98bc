//! Lifecycle-managed launcher components
//!
//! Components are registered on [`crate::Core`] at start-up and torn down in
//! registration order. Their operations return JSON documents stamped with a
//! millisecond id and an ISO-8601 timestamp.

pub mod cli;
pub mod container;
pub mod persistence;
pub mod script;
pub mod trigger;
pub mod trigger_api;
pub mod workflow;

pub use cli::Cli;
pub use container::Container;
pub use persistence::Persistence;
pub use script::Script;
pub use trigger::Trigger;
pub use workflow::Workflow;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComponentKind {
    Container,
    Persistence,
    Script,
    Trigger,
    Workflow,
    Cli,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 6] = [
        ComponentKind::Container,
        ComponentKind::Persistence,
        ComponentKind::Script,
        ComponentKind::Trigger,
        ComponentKind::Workflow,
        ComponentKind::Cli,
    ];

    /// Registry key, e.g. `"container"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentKind::Container => "container",
            ComponentKind::Persistence => "persistence",
            ComponentKind::Script => "script",
            ComponentKind::Trigger => "trigger",
            ComponentKind::Workflow => "workflow",
            ComponentKind::Cli => "cli",
        }
    }
}

/// Human-readable name used in error messages.
impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ComponentKind::Container => "Container",
            ComponentKind::Persistence => "Persistence",
            ComponentKind::Script => "Script",
            ComponentKind::Trigger => "Trigger",
            ComponentKind::Workflow => "Workflow",
            ComponentKind::Cli => "CLI",
        };
        f.write_str(name)
    }
}

/// ISO-8601 UTC timestamp with millisecond precision.
pub(crate) fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub(crate) fn millis_id() -> i64 {
    Utc::now().timestamp_millis()
}

/// Render an id the caller supplied, without quotes for string ids.
pub(crate) fn id_label(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// `{ id, ...updates, updatedAt }`
pub(crate) fn merge_updates(id: Value, updates: Value) -> Value {
    let mut doc = Map::new();
    doc.insert("id".to_string(), id);
    if let Value::Object(fields) = updates {
        doc.extend(fields);
    }
    doc.insert("updatedAt".to_string(), Value::String(timestamp()));
    Value::Object(doc)
}

/// Shared initialized flag with start/stop logging.
#[derive(Debug)]
pub struct Lifecycle {
    kind: ComponentKind,
    initialized: AtomicBool,
}

impl Lifecycle {
    pub fn new(kind: ComponentKind) -> Self {
        Self {
            kind,
            initialized: AtomicBool::new(false),
        }
    }

    /// Returns `false` when the component was already initialized.
    pub fn start(&self) -> bool {
        let first = !self.initialized.swap(true, Ordering::SeqCst);
        if first {
            info!("{} component initialized", self.kind);
        } else {
            debug!("{} component already initialized", self.kind);
        }
        first
    }

    /// Returns `false` when the component was not running.
    pub fn stop(&self) -> bool {
        let was_running = self.initialized.swap(false, Ordering::SeqCst);
        if was_running {
            info!("{} component destroyed", self.kind);
        }
        was_running
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone)]
pub enum Component {
    Container(Arc<Container>),
    Persistence(Arc<Persistence>),
    Script(Arc<Script>),
    Trigger(Arc<Trigger>),
    Workflow(Arc<Workflow>),
    Cli(Arc<Cli>),
}

impl Component {
    pub fn kind(&self) -> ComponentKind {
        match self {
            Component::Container(_) => ComponentKind::Container,
            Component::Persistence(_) => ComponentKind::Persistence,
            Component::Script(_) => ComponentKind::Script,
            Component::Trigger(_) => ComponentKind::Trigger,
            Component::Workflow(_) => ComponentKind::Workflow,
            Component::Cli(_) => ComponentKind::Cli,
        }
    }

    pub fn initialize(&self) {
        match self {
            Component::Container(c) => c.initialize(),
            Component::Persistence(c) => c.initialize(),
            Component::Script(c) => c.initialize(),
            Component::Trigger(c) => c.initialize(),
            Component::Workflow(c) => c.initialize(),
            Component::Cli(c) => c.initialize(),
        }
    }

    pub fn destroy(&self) {
        match self {
            Component::Container(c) => c.destroy(),
            Component::Persistence(c) => c.destroy(),
            Component::Script(c) => c.destroy(),
            Component::Trigger(c) => c.destroy(),
            Component::Workflow(c) => c.destroy(),
            Component::Cli(c) => c.destroy(),
        }
    }

    pub fn is_initialized(&self) -> bool {
        match self {
            Component::Container(c) => c.is_initialized(),
            Component::Persistence(c) => c.is_initialized(),
            Component::Script(c) => c.is_initialized(),
            Component::Trigger(c) => c.is_initialized(),
            Component::Workflow(c) => c.is_initialized(),
            Component::Cli(c) => c.is_initialized(),
        }
    }
}

/// Components keyed by kind, in registration order.
#[derive(Debug, Default)]
pub struct ComponentRegistry {
    entries: Vec<Component>,
}

impl ComponentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, component: Component) {
        let kind = component.kind();
        match self.entries.iter_mut().find(|c| c.kind() == kind) {
            Some(existing) => {
                warn!("{} component already registered, replacing it", kind);
                *existing = component;
            }
            None => {
                debug!("Registered {} component", kind);
                self.entries.push(component);
            }
        }
    }

    pub fn get(&self, kind: ComponentKind) -> Option<&Component> {
        self.entries.iter().find(|c| c.kind() == kind)
    }

    pub fn names(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|c| c.kind().as_str().to_string())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Component> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ComponentsConfig;
    use serde_json::json;

    #[test]
    fn test_kind_names() {
        assert_eq!(ComponentKind::Trigger.as_str(), "trigger");
        assert_eq!(ComponentKind::Trigger.to_string(), "Trigger");
        assert_eq!(ComponentKind::ALL.len(), 6);
    }

    #[test]
    fn test_merge_updates() {
        let doc = merge_updates(json!(7), json!({"name": "nightly", "enabled": false}));
        assert_eq!(doc["id"], 7);
        assert_eq!(doc["name"], "nightly");
        assert_eq!(doc["enabled"], false);
        assert!(doc["updatedAt"].is_string());
    }

    #[test]
    fn test_id_label() {
        assert_eq!(id_label(&json!("abc")), "abc");
        assert_eq!(id_label(&json!(42)), "42");
    }

    #[test]
    fn test_lifecycle_flags() {
        let lifecycle = Lifecycle::new(ComponentKind::Script);
        assert!(!lifecycle.is_initialized());
        assert!(lifecycle.start());
        assert!(!lifecycle.start());
        assert!(lifecycle.stop());
        assert!(!lifecycle.stop());
    }

    #[test]
    fn test_registry_replaces_by_kind() {
        let config = ComponentsConfig::default();
        let mut registry = ComponentRegistry::new();
        registry.register(Component::Script(Arc::new(Script::new(config.script.clone()))));
        registry.register(Component::Cli(Arc::new(Cli::new(config.cli.clone()))));
        registry.register(Component::Script(Arc::new(Script::new(config.script))));

        assert_eq!(registry.names(), vec!["script", "cli"]);
        assert!(registry.get(ComponentKind::Container).is_none());
    }
}

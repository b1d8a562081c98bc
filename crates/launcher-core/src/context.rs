//! The launcher context shared by the RPC server and every handler

use crate::components::{
    Cli, Component, ComponentKind, ComponentRegistry, Container, Persistence, Script, Trigger,
    Workflow,
};
use crate::fs::{FileSystem, FsDescriptor, FsRegistry};
use crate::models::LauncherConfig;
use crate::{Error, Result};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::info;

/// Registered file systems and components plus the configuration they were built from.
///
/// Construct one per server (or per test) and share it as `Arc<Core>`.
pub struct Core {
    config: LauncherConfig,
    fs: RwLock<FsRegistry>,
    components: RwLock<ComponentRegistry>,
    initialized: AtomicBool,
}

macro_rules! component_accessor {
    ($name:ident, $variant:ident, $ty:ty) => {
        pub fn $name(&self) -> Result<Arc<$ty>> {
            match self.components().get(ComponentKind::$variant) {
                Some(Component::$variant(c)) => Ok(Arc::clone(c)),
                _ => Err(Error::ComponentUnavailable(ComponentKind::$variant)),
            }
        }
    };
}

impl Core {
    pub fn new(config: LauncherConfig) -> Self {
        Self {
            config,
            fs: RwLock::new(FsRegistry::new()),
            components: RwLock::new(ComponentRegistry::new()),
            initialized: AtomicBool::new(false),
        }
    }

    pub fn config(&self) -> &LauncherConfig {
        &self.config
    }

    fn fs_registry(&self) -> RwLockReadGuard<'_, FsRegistry> {
        self.fs.read().unwrap_or_else(|e| e.into_inner())
    }

    fn fs_registry_mut(&self) -> RwLockWriteGuard<'_, FsRegistry> {
        self.fs.write().unwrap_or_else(|e| e.into_inner())
    }

    fn components(&self) -> RwLockReadGuard<'_, ComponentRegistry> {
        self.components.read().unwrap_or_else(|e| e.into_inner())
    }

    fn components_mut(&self) -> RwLockWriteGuard<'_, ComponentRegistry> {
        self.components.write().unwrap_or_else(|e| e.into_inner())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    /// Register the default file systems and every component, then start them.
    pub fn initialize(&self) -> Result<()> {
        self.initialize_with(&ComponentKind::ALL)
    }

    /// Like [`Core::initialize`] but only registers the listed components.
    pub fn initialize_with(&self, kinds: &[ComponentKind]) -> Result<()> {
        if self.is_initialized() {
            info!("Core already initialized");
            return Ok(());
        }

        info!("Initializing core");
        self.fs_registry_mut()
            .register_defaults(&self.config.filesystems)?;

        for kind in kinds {
            self.register_component(self.build_component(*kind));
        }

        for component in self.components().iter() {
            component.initialize();
        }

        self.initialized.store(true, Ordering::SeqCst);
        info!(
            "Core initialized with {} file systems and {} components",
            self.fs_registry().len(),
            self.components().len()
        );
        Ok(())
    }

    fn build_component(&self, kind: ComponentKind) -> Component {
        let config = &self.config.components;
        match kind {
            ComponentKind::Container => {
                Component::Container(Arc::new(Container::new(config.container.clone())))
            }
            ComponentKind::Persistence => {
                Component::Persistence(Arc::new(Persistence::new(config.persistence.clone())))
            }
            ComponentKind::Script => {
                Component::Script(Arc::new(Script::new(config.script.clone())))
            }
            ComponentKind::Trigger => {
                Component::Trigger(Arc::new(Trigger::new(config.trigger.clone())))
            }
            ComponentKind::Workflow => {
                Component::Workflow(Arc::new(Workflow::new(config.workflow.clone())))
            }
            ComponentKind::Cli => Component::Cli(Arc::new(Cli::new(config.cli.clone()))),
        }
    }

    /// Tear components down in registration order.
    pub fn destroy(&self) {
        info!("Destroying core");
        for component in self.components().iter() {
            component.destroy();
        }
        self.initialized.store(false, Ordering::SeqCst);
    }

    pub fn register_fs(&self, name: impl Into<String>, fs: FileSystem, config: Value) {
        self.fs_registry_mut().register(name, fs, config);
    }

    pub fn register_component(&self, component: Component) {
        self.components_mut().register(component);
    }

    /// Look up a file system by name.
    pub fn fs(&self, name: &str) -> Result<Arc<FileSystem>> {
        self.fs_registry().require(name)
    }

    pub fn default_fs(&self) -> Option<Arc<FileSystem>> {
        self.fs_registry().default_fs()
    }

    pub fn fs_list(&self) -> Vec<FsDescriptor> {
        self.fs_registry().descriptors()
    }

    pub fn component_names(&self) -> Vec<String> {
        self.components().names()
    }

    component_accessor!(container, Container, Container);
    component_accessor!(persistence, Persistence, Persistence);
    component_accessor!(script, Script, Script);
    component_accessor!(trigger, Trigger, Trigger);
    component_accessor!(workflow, Workflow, Workflow);
    component_accessor!(cli, Cli, Cli);

    pub fn status(&self) -> Value {
        let initialized = self.is_initialized();
        let fs_services = self.fs_list();
        let components = self.component_names();

        json!({
            "initialized": initialized,
            "config": self.config,
            "api": {
                "initialized": initialized,
                "fsServices": fs_services,
                "components": components,
                "totalServices": fs_services.len(),
                "totalComponents": components.len(),
            },
            "fsServices": fs_services,
            "components": components,
        })
    }
}

use super::{FileSystem, FsKind, GitFs, LocalFs, MemoryFs};
use crate::models::FileSystemsConfig;
use crate::{Error, Result};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{info, warn};

/// Lookup order used when a caller does not name a back end.
const DEFAULT_PRIORITY: [&str; 3] = ["local", "git", "memory"];

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FsDescriptor {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FsKind,
    pub config: Value,
}

struct FsEntry {
    name: String,
    kind: FsKind,
    config: Value,
    fs: Arc<FileSystem>,
}

/// Named file systems in registration order.
#[derive(Default)]
pub struct FsRegistry {
    entries: Vec<FsEntry>,
}

impl FsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `fs` under `name`. An existing entry keeps its position and is replaced.
    pub fn register(&mut self, name: impl Into<String>, fs: FileSystem, config: Value) {
        let name = name.into();
        let entry = FsEntry {
            kind: fs.kind(),
            name: name.clone(),
            config,
            fs: Arc::new(fs),
        };

        match self.entries.iter_mut().find(|e| e.name == name) {
            Some(existing) => {
                warn!("File system '{}' already registered, replacing it", name);
                *existing = entry;
            }
            None => {
                info!("Registered {} file system '{}'", entry.kind, name);
                self.entries.push(entry);
            }
        }
    }

    /// Register the local, git and memory back ends described by `config`.
    pub fn register_defaults(&mut self, config: &FileSystemsConfig) -> Result<()> {
        let local = LocalFs::new(&config.local)?;
        self.register("local", FileSystem::Local(local), serde_json::to_value(&config.local)?);

        let git = GitFs::new(&config.git)?;
        self.register("git", FileSystem::Git(git), serde_json::to_value(&config.git)?);

        if config.memory.enabled {
            self.register(
                "memory",
                FileSystem::Memory(MemoryFs::new()),
                serde_json::to_value(&config.memory)?,
            );
        }

        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<Arc<FileSystem>> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| Arc::clone(&e.fs))
    }

    pub fn require(&self, name: &str) -> Result<Arc<FileSystem>> {
        self.get(name)
            .ok_or_else(|| Error::FileSystemNotFound(name.to_string()))
    }

    pub fn default_fs(&self) -> Option<Arc<FileSystem>> {
        DEFAULT_PRIORITY.iter().find_map(|name| self.get(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    pub fn names(&self) -> Vec<String> {
        self.entries.iter().map(|e| e.name.clone()).collect()
    }

    pub fn descriptors(&self) -> Vec<FsDescriptor> {
        self.entries
            .iter()
            .map(|e| FsDescriptor {
                name: e.name.clone(),
                kind: e.kind,
                config: e.config.clone(),
            })
            .collect()
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

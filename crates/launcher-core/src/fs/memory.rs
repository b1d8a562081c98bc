use crate::models::{FileInfo, FileRecord, FsStats};
use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// Volatile file store keyed by path.
#[derive(Debug, Default)]
pub struct MemoryFs {
    files: RwLock<BTreeMap<String, FileRecord>>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    fn files(&self) -> RwLockReadGuard<'_, BTreeMap<String, FileRecord>> {
        self.files.read().unwrap_or_else(|e| e.into_inner())
    }

    fn files_mut(&self) -> RwLockWriteGuard<'_, BTreeMap<String, FileRecord>> {
        self.files.write().unwrap_or_else(|e| e.into_inner())
    }

    pub fn create(&self, path: &str, data: &str) -> bool {
        self.files_mut()
            .insert(path.to_string(), FileRecord::new(data.to_string()));
        true
    }

    pub fn read(&self, path: &str) -> Option<String> {
        self.files().get(path).map(|file| file.data.clone())
    }

    pub fn update(&self, path: &str, data: &str) -> bool {
        match self.files_mut().get_mut(path) {
            Some(file) => {
                file.replace(data.to_string());
                true
            }
            None => false,
        }
    }

    pub fn delete(&self, path: &str) -> bool {
        self.files_mut().remove(path).is_some()
    }

    pub fn exists(&self, path: &str) -> bool {
        self.files().contains_key(path)
    }

    pub fn list(&self) -> Vec<String> {
        self.files().keys().cloned().collect()
    }

    pub fn get_info(&self, path: &str) -> Option<FileInfo> {
        self.files().get(path).map(|file| file.info(path))
    }

    pub fn stats(&self) -> FsStats {
        FsStats::from_sizes(self.files().values().map(|file| file.size as u64))
    }

    pub fn clear(&self) {
        self.files_mut().clear();
    }
}

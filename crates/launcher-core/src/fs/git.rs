use super::local::LocalFs;
use crate::git::GitRepo;
use crate::models::{FileInfo, FsStats, GitFsConfig, LocalFsConfig};
use crate::Result;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

/// Local file storage versioned by a git repository at the same base path.
///
/// Writes are serialized so that each one is committed on its own.
pub struct GitFs {
    local: LocalFs,
    repo: GitRepo,
    auto_commit: bool,
    commit_message: String,
    write_lock: Mutex<()>,
}

impl GitFs {
    pub fn new(config: &GitFsConfig) -> Result<Self> {
        let local = LocalFs::new(&LocalFsConfig {
            base_path: config.base_path.clone(),
            auto_create_dir: true,
        })?;
        let repo = GitRepo::new(config.base_path.clone());

        if config.auto_init {
            repo.init()?;
        }

        Ok(Self {
            local,
            repo,
            auto_commit: config.auto_commit,
            commit_message: config.commit_message.clone(),
            write_lock: Mutex::new(()),
        })
    }

    pub fn repo(&self) -> &GitRepo {
        &self.repo
    }

    /// Held across a work tree change and its commit.
    fn write_guard(&self) -> MutexGuard<'_, ()> {
        self.write_lock.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Record the work tree after a successful write.
    ///
    /// A failed commit never fails the write that triggered it.
    fn record(&self, op: &str, path: &str) {
        if !self.auto_commit {
            return;
        }

        match self.repo.commit_all(&self.commit_message) {
            Ok(Some(oid)) => debug!("Committed {} {} as {}", op, path, oid),
            Ok(None) => debug!("Nothing to commit after {} {}", op, path),
            Err(e) => warn!("Auto commit after {} {} failed: {}", op, path, e),
        }
    }

    pub fn create(&self, path: &str, data: &str) -> Result<bool> {
        let _guard = self.write_guard();
        let created = self.local.create(path, data)?;
        if created {
            self.record("create", path);
        }
        Ok(created)
    }

    pub fn read(&self, path: &str) -> Result<Option<String>> {
        self.local.read(path)
    }

    pub fn update(&self, path: &str, data: &str) -> Result<bool> {
        let _guard = self.write_guard();
        let updated = self.local.update(path, data)?;
        if updated {
            self.record("update", path);
        }
        Ok(updated)
    }

    pub fn delete(&self, path: &str) -> Result<bool> {
        let _guard = self.write_guard();
        let deleted = self.local.delete(path)?;
        if deleted {
            self.record("delete", path);
        }
        Ok(deleted)
    }

    pub fn exists(&self, path: &str) -> Result<bool> {
        self.local.exists(path)
    }

    pub fn list(&self) -> Result<Vec<String>> {
        self.local.list()
    }

    pub fn get_info(&self, path: &str) -> Result<Option<FileInfo>> {
        self.local.get_info(path)
    }

    pub fn stats(&self) -> Result<FsStats> {
        self.local.stats()
    }

    pub fn clear(&self) -> Result<()> {
        let _guard = self.write_guard();
        self.local.clear()?;
        self.record("clear", "*");
        Ok(())
    }

    pub fn history(&self, limit: usize) -> Result<Vec<String>> {
        self.repo.log(limit)
    }

    pub fn status(&self) -> Result<Vec<String>> {
        self.repo.status()
    }
}

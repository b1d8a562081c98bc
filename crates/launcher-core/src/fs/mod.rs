//! File-system back ends
//!
//! Every back end answers the same set of path-keyed operations. Paths are
//! opaque strings for the memory back end; the on-disk back ends resolve them
//! under their base directory.

pub mod git;
pub mod local;
pub mod memory;
pub mod registry;

pub use git::GitFs;
pub use local::LocalFs;
pub use memory::MemoryFs;
pub use registry::{FsDescriptor, FsRegistry};

use crate::models::{FileInfo, FsStats};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FsKind {
    Memory,
    Local,
    Git,
}

impl FsKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FsKind::Memory => "memory",
            FsKind::Local => "local",
            FsKind::Git => "git",
        }
    }
}

impl fmt::Display for FsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub enum FileSystem {
    Memory(MemoryFs),
    Local(LocalFs),
    Git(GitFs),
}

impl FileSystem {
    pub fn kind(&self) -> FsKind {
        match self {
            FileSystem::Memory(_) => FsKind::Memory,
            FileSystem::Local(_) => FsKind::Local,
            FileSystem::Git(_) => FsKind::Git,
        }
    }

    /// Store `data` at `path`, replacing any existing file.
    pub fn create(&self, path: &str, data: &str) -> Result<bool> {
        match self {
            FileSystem::Memory(fs) => Ok(fs.create(path, data)),
            FileSystem::Local(fs) => fs.create(path, data),
            FileSystem::Git(fs) => fs.create(path, data),
        }
    }

    /// `None` when nothing is stored at `path`.
    pub fn read(&self, path: &str) -> Result<Option<String>> {
        match self {
            FileSystem::Memory(fs) => Ok(fs.read(path)),
            FileSystem::Local(fs) => fs.read(path),
            FileSystem::Git(fs) => fs.read(path),
        }
    }

    /// Replace an existing file. Returns `false` when `path` is missing.
    pub fn update(&self, path: &str, data: &str) -> Result<bool> {
        match self {
            FileSystem::Memory(fs) => Ok(fs.update(path, data)),
            FileSystem::Local(fs) => fs.update(path, data),
            FileSystem::Git(fs) => fs.update(path, data),
        }
    }

    pub fn delete(&self, path: &str) -> Result<bool> {
        match self {
            FileSystem::Memory(fs) => Ok(fs.delete(path)),
            FileSystem::Local(fs) => fs.delete(path),
            FileSystem::Git(fs) => fs.delete(path),
        }
    }

    pub fn exists(&self, path: &str) -> Result<bool> {
        match self {
            FileSystem::Memory(fs) => Ok(fs.exists(path)),
            FileSystem::Local(fs) => fs.exists(path),
            FileSystem::Git(fs) => fs.exists(path),
        }
    }

    pub fn list(&self) -> Result<Vec<String>> {
        match self {
            FileSystem::Memory(fs) => Ok(fs.list()),
            FileSystem::Local(fs) => fs.list(),
            FileSystem::Git(fs) => fs.list(),
        }
    }

    pub fn get_info(&self, path: &str) -> Result<Option<FileInfo>> {
        match self {
            FileSystem::Memory(fs) => Ok(fs.get_info(path)),
            FileSystem::Local(fs) => fs.get_info(path),
            FileSystem::Git(fs) => fs.get_info(path),
        }
    }

    pub fn stats(&self) -> Result<FsStats> {
        match self {
            FileSystem::Memory(fs) => Ok(fs.stats()),
            FileSystem::Local(fs) => fs.stats(),
            FileSystem::Git(fs) => fs.stats(),
        }
    }

    /// Paths containing `pattern` as a substring.
    pub fn search(&self, pattern: &str) -> Result<Vec<String>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|path| path.contains(pattern))
            .collect())
    }

    pub fn clear(&self) -> Result<()> {
        match self {
            FileSystem::Memory(fs) => {
                fs.clear();
                Ok(())
            }
            FileSystem::Local(fs) => fs.clear(),
            FileSystem::Git(fs) => fs.clear(),
        }
    }
}

impl fmt::Debug for FileSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FileSystem").field(&self.kind()).finish()
    }
}

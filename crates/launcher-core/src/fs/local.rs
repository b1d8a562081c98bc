use crate::models::{FileInfo, FsStats, LocalFsConfig};
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

/// Files stored on disk under a base directory.
#[derive(Debug)]
pub struct LocalFs {
    base_path: PathBuf,
    auto_create_dir: bool,
}

impl LocalFs {
    pub fn new(config: &LocalFsConfig) -> Result<Self> {
        if config.auto_create_dir {
            std::fs::create_dir_all(&config.base_path)?;
        }

        Ok(Self {
            base_path: config.base_path.clone(),
            auto_create_dir: config.auto_create_dir,
        })
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Map a request path onto the base directory.
    ///
    /// A leading `/` is ignored, so `/notes/a.txt` and `notes/a.txt` name the
    /// same file. Paths that climb out of the base directory are rejected.
    fn resolve(&self, path: &str) -> Result<PathBuf> {
        let relative = Path::new(path.trim_start_matches('/'));

        let mut resolved = self.base_path.clone();
        for component in relative.components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir => {}
                _ => {
                    return Err(Error::Validation(format!(
                        "Path escapes the file system root: {}",
                        path
                    )))
                }
            }
        }

        if resolved == self.base_path {
            return Err(Error::Validation("Path cannot be empty".to_string()));
        }

        Ok(resolved)
    }

    pub fn create(&self, path: &str, data: &str) -> Result<bool> {
        let target = self.resolve(path)?;

        if self.auto_create_dir {
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)?;
            }
        }

        std::fs::write(&target, data)?;
        Ok(true)
    }

    pub fn read(&self, path: &str) -> Result<Option<String>> {
        let target = self.resolve(path)?;
        match std::fs::read_to_string(&target) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    pub fn update(&self, path: &str, data: &str) -> Result<bool> {
        let target = self.resolve(path)?;
        if !target.is_file() {
            return Ok(false);
        }

        std::fs::write(&target, data)?;
        Ok(true)
    }

    pub fn delete(&self, path: &str) -> Result<bool> {
        let target = self.resolve(path)?;
        match std::fs::remove_file(&target) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    pub fn exists(&self, path: &str) -> Result<bool> {
        Ok(self.resolve(path)?.is_file())
    }

    pub fn get_info(&self, path: &str) -> Result<Option<FileInfo>> {
        let target = self.resolve(path)?;
        let metadata = match std::fs::metadata(&target) {
            Ok(metadata) if metadata.is_file() => metadata,
            Ok(_) => return Ok(None),
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let modified: DateTime<Utc> = metadata.modified()?.into();
        let created = metadata
            .created()
            .map(DateTime::<Utc>::from)
            .unwrap_or(modified);

        Ok(Some(FileInfo {
            path: path.to_string(),
            size: metadata.len(),
            created,
            modified,
        }))
    }

    /// Every file under the base directory as a sorted `/`-separated relative path.
    pub fn list(&self) -> Result<Vec<String>> {
        let mut files = Vec::new();
        if self.base_path.is_dir() {
            self.scan(&self.base_path, &mut files)?;
        }
        files.sort();
        Ok(files)
    }

    fn scan(&self, dir: &Path, files: &mut Vec<String>) -> Result<()> {
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            if entry.file_name() == ".git" {
                continue;
            }

            let path = entry.path();
            if entry.file_type()?.is_dir() {
                self.scan(&path, files)?;
            } else if let Ok(relative) = path.strip_prefix(&self.base_path) {
                let parts: Vec<String> = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect();
                files.push(parts.join("/"));
            }
        }
        Ok(())
    }

    pub fn stats(&self) -> Result<FsStats> {
        let mut sizes = Vec::new();
        for path in self.list()? {
            sizes.push(std::fs::metadata(self.base_path.join(&path))?.len());
        }
        Ok(FsStats::from_sizes(sizes))
    }

    pub fn clear(&self) -> Result<()> {
        if !self.base_path.is_dir() {
            return Ok(());
        }

        for entry in std::fs::read_dir(&self.base_path)? {
            let entry = entry?;
            if entry.file_name() == ".git" {
                continue;
            }

            if entry.file_type()?.is_dir() {
                std::fs::remove_dir_all(entry.path())?;
            } else {
                std::fs::remove_file(entry.path())?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn local_fs(temp_dir: &TempDir) -> LocalFs {
        LocalFs::new(&LocalFsConfig {
            base_path: temp_dir.path().join("data"),
            auto_create_dir: true,
        })
        .unwrap()
    }

    #[test]
    fn test_create_strips_leading_slash() {
        let temp_dir = TempDir::new().unwrap();
        let fs = local_fs(&temp_dir);

        assert!(fs.create("/notes/a.txt", "hi").unwrap());
        let on_disk = temp_dir.path().join("data/notes/a.txt");
        assert_eq!(std::fs::read_to_string(on_disk).unwrap(), "hi");
        assert_eq!(fs.read("notes/a.txt").unwrap(), Some("hi".to_string()));
    }

    #[test]
    fn test_parent_dir_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let fs = local_fs(&temp_dir);

        let result = fs.create("../escape.txt", "x");
        assert!(matches!(result, Err(Error::Validation(_))));
        assert!(!temp_dir.path().join("escape.txt").exists());
    }

    #[test]
    fn test_missing_file_semantics() {
        let temp_dir = TempDir::new().unwrap();
        let fs = local_fs(&temp_dir);

        assert_eq!(fs.read("/missing.txt").unwrap(), None);
        assert!(!fs.update("/missing.txt", "x").unwrap());
        assert!(!fs.delete("/missing.txt").unwrap());
        assert!(!fs.exists("/missing.txt").unwrap());
        assert!(fs.get_info("/missing.txt").unwrap().is_none());
    }

    #[test]
    fn test_list_is_recursive_and_sorted() {
        let temp_dir = TempDir::new().unwrap();
        let fs = local_fs(&temp_dir);

        fs.create("/b.txt", "b").unwrap();
        fs.create("/a/z.txt", "z").unwrap();
        fs.create("/a/c.txt", "c").unwrap();

        assert_eq!(fs.list().unwrap(), vec!["a/c.txt", "a/z.txt", "b.txt"]);
    }

    #[test]
    fn test_info_and_stats() {
        let temp_dir = TempDir::new().unwrap();
        let fs = local_fs(&temp_dir);

        fs.create("/a.txt", "hello").unwrap();
        fs.create("/b.txt", "x").unwrap();

        let info = fs.get_info("/a.txt").unwrap().unwrap();
        assert_eq!(info.path, "/a.txt");
        assert_eq!(info.size, 5);

        let stats = fs.stats().unwrap();
        assert_eq!(stats.file_count, 2);
        assert_eq!(stats.total_size, 6);
    }

    #[test]
    fn test_clear_keeps_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let fs = local_fs(&temp_dir);

        fs.create("/a/b.txt", "x").unwrap();
        fs.clear().unwrap();

        assert!(fs.list().unwrap().is_empty());
        assert!(fs.base_path().is_dir());
    }
}

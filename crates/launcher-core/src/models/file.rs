//! File records and metadata shared by every file-system back end

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A stored file as the in-memory back end keeps it.
#[derive(Debug, Clone, PartialEq)]
pub struct FileRecord {
    pub data: String,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
    pub size: usize,
}

impl FileRecord {
    pub fn new(data: String) -> Self {
        let now = Utc::now();
        let size = data.len();
        Self {
            data,
            created: now,
            modified: now,
            size,
        }
    }

    /// Replace the contents and bump the modification time
    pub fn replace(&mut self, data: String) {
        self.size = data.len();
        self.data = data;
        self.modified = Utc::now();
    }

    pub fn info(&self, path: &str) -> FileInfo {
        FileInfo {
            path: path.to_string(),
            size: self.size as u64,
            created: self.created,
            modified: self.modified,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FileInfo {
    pub path: String,
    pub size: u64,
    pub created: DateTime<Utc>,
    pub modified: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FsStats {
    pub file_count: usize,
    pub total_size: u64,
    pub average_size: f64,
}

impl FsStats {
    pub fn from_sizes(sizes: impl IntoIterator<Item = u64>) -> Self {
        let (file_count, total_size) = sizes
            .into_iter()
            .fold((0usize, 0u64), |(count, total), size| (count + 1, total + size));

        let average_size = if file_count > 0 {
            total_size as f64 / file_count as f64
        } else {
            0.0
        };

        Self {
            file_count,
            total_size,
            average_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_from_sizes() {
        let stats = FsStats::from_sizes([2, 4]);
        assert_eq!(stats.file_count, 2);
        assert_eq!(stats.total_size, 6);
        assert_eq!(stats.average_size, 3.0);
    }

    #[test]
    fn test_stats_empty() {
        let stats = FsStats::from_sizes(std::iter::empty());
        assert_eq!(stats.file_count, 0);
        assert_eq!(stats.average_size, 0.0);
    }

    #[test]
    fn test_stats_serialize_camel_case() {
        let json = serde_json::to_value(FsStats::from_sizes([1])).unwrap();
        assert_eq!(json["fileCount"], 1);
        assert_eq!(json["totalSize"], 1);
        assert!(json.get("averageSize").is_some());
    }

    #[test]
    fn test_replace_updates_size() {
        let mut record = FileRecord::new("hi".to_string());
        record.replace("hello".to_string());
        assert_eq!(record.size, 5);
        assert_eq!(record.data, "hello");
        assert!(record.modified >= record.created);
    }
}

use launcher_core::{Core, FileSystem};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use super::{parse_params, ApiError, Result};

const DEFAULT_FS: &str = "local";
const DEFAULT_HISTORY_LIMIT: usize = 10;

fn default_fs() -> String {
    DEFAULT_FS.to_string()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FsParams {
    #[serde(default = "default_fs")]
    fs_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PathParams {
    #[serde(default = "default_fs")]
    fs_name: String,
    path: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WriteParams {
    #[serde(default = "default_fs")]
    fs_name: String,
    path: String,
    data: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchParams {
    #[serde(default = "default_fs")]
    fs_name: String,
    pattern: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HistoryParams {
    #[serde(default = "default_fs")]
    fs_name: String,
    limit: Option<usize>,
}

/// Run a file-system operation on the blocking pool.
async fn with_fs<T, F>(core: &Core, fs_name: &str, op: F) -> Result<Value>
where
    F: FnOnce(&FileSystem) -> launcher_core::Result<T> + Send + 'static,
    T: Serialize + Send + 'static,
{
    let fs = core.fs(fs_name)?;
    let output = tokio::task::spawn_blocking(move || op(&fs)).await??;
    Ok(serde_json::to_value(output)?)
}

pub async fn create(core: Arc<Core>, params: Value) -> Result<Value> {
    let WriteParams {
        fs_name,
        path,
        data,
    } = parse_params(params)?;
    with_fs(&core, &fs_name, move |fs| fs.create(&path, &data)).await
}

pub async fn read(core: Arc<Core>, params: Value) -> Result<Value> {
    let PathParams { fs_name, path } = parse_params(params)?;
    with_fs(&core, &fs_name, move |fs| fs.read(&path)).await
}

pub async fn update(core: Arc<Core>, params: Value) -> Result<Value> {
    let WriteParams {
        fs_name,
        path,
        data,
    } = parse_params(params)?;
    with_fs(&core, &fs_name, move |fs| fs.update(&path, &data)).await
}

pub async fn delete(core: Arc<Core>, params: Value) -> Result<Value> {
    let PathParams { fs_name, path } = parse_params(params)?;
    with_fs(&core, &fs_name, move |fs| fs.delete(&path)).await
}

pub async fn exists(core: Arc<Core>, params: Value) -> Result<Value> {
    let PathParams { fs_name, path } = parse_params(params)?;
    with_fs(&core, &fs_name, move |fs| fs.exists(&path)).await
}

pub async fn list(core: Arc<Core>, params: Value) -> Result<Value> {
    let FsParams { fs_name } = parse_params(params)?;
    with_fs(&core, &fs_name, |fs| fs.list()).await
}

pub async fn get_info(core: Arc<Core>, params: Value) -> Result<Value> {
    let PathParams { fs_name, path } = parse_params(params)?;
    with_fs(&core, &fs_name, move |fs| fs.get_info(&path)).await
}

pub async fn stats(core: Arc<Core>, params: Value) -> Result<Value> {
    let FsParams { fs_name } = parse_params(params)?;
    with_fs(&core, &fs_name, |fs| fs.stats()).await
}

pub async fn search(core: Arc<Core>, params: Value) -> Result<Value> {
    let SearchParams { fs_name, pattern } = parse_params(params)?;
    with_fs(&core, &fs_name, move |fs| fs.search(&pattern)).await
}

pub async fn clear(core: Arc<Core>, params: Value) -> Result<Value> {
    let FsParams { fs_name } = parse_params(params)?;
    with_fs(&core, &fs_name, |fs| fs.clear().map(|()| true)).await
}

fn not_git(fs_name: &str) -> ApiError {
    ApiError::InvalidParams(format!("File system '{}' is not git-backed", fs_name))
}

pub async fn history(core: Arc<Core>, params: Value) -> Result<Value> {
    let HistoryParams { fs_name, limit } = parse_params(params)?;
    let limit = limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
    let fs = core.fs(&fs_name)?;

    let output = tokio::task::spawn_blocking(move || match fs.as_ref() {
        FileSystem::Git(git) => git.history(limit).map_err(ApiError::from),
        _ => Err(not_git(&fs_name)),
    })
    .await??;

    Ok(serde_json::to_value(output)?)
}

pub async fn git_status(core: Arc<Core>, params: Value) -> Result<Value> {
    let FsParams { fs_name } = parse_params(params)?;
    let fs = core.fs(&fs_name)?;

    let output = tokio::task::spawn_blocking(move || match fs.as_ref() {
        FileSystem::Git(git) => git.status().map_err(ApiError::from),
        _ => Err(not_git(&fs_name)),
    })
    .await??;

    Ok(serde_json::to_value(output)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use launcher_core::fs::MemoryFs;
    use launcher_core::models::LauncherConfig;
    use serde_json::json;
    use tempfile::TempDir;

    fn memory_core() -> Arc<Core> {
        let core = Core::new(LauncherConfig::default());
        core.register_fs("memory", FileSystem::Memory(MemoryFs::new()), json!({}));
        Arc::new(core)
    }

    #[tokio::test]
    async fn test_create_then_read() {
        let core = memory_core();
        let created = create(
            core.clone(),
            json!({"fsName": "memory", "path": "/a.txt", "data": "hi"}),
        )
        .await
        .unwrap();
        assert_eq!(created, json!(true));

        let data = read(core, json!({"fsName": "memory", "path": "/a.txt"}))
            .await
            .unwrap();
        assert_eq!(data, json!("hi"));
    }

    #[tokio::test]
    async fn test_missing_file_is_null() {
        let core = memory_core();
        let data = read(core.clone(), json!({"fsName": "memory", "path": "/missing.txt"}))
            .await
            .unwrap();
        assert_eq!(data, Value::Null);

        let info = get_info(core, json!({"fsName": "memory", "path": "/missing.txt"}))
            .await
            .unwrap();
        assert_eq!(info, Value::Null);
    }

    #[tokio::test]
    async fn test_default_fs_is_local() {
        let core = memory_core();
        let err = list(core, json!({})).await.unwrap_err();
        assert_eq!(err.to_string(), "File system not found: local");
    }

    #[tokio::test]
    async fn test_missing_path_is_invalid_params() {
        let core = memory_core();
        let err = read(core, json!({"fsName": "memory"})).await.unwrap_err();
        assert!(matches!(err, ApiError::InvalidParams(_)));
    }

    #[tokio::test]
    async fn test_stats_search_clear() {
        let core = memory_core();
        for (path, data) in [("/logs/a.log", "12"), ("/b.txt", "1234")] {
            create(
                core.clone(),
                json!({"fsName": "memory", "path": path, "data": data}),
            )
            .await
            .unwrap();
        }

        let stats = stats(core.clone(), json!({"fsName": "memory"})).await.unwrap();
        assert_eq!(stats, json!({"fileCount": 2, "totalSize": 6, "averageSize": 3.0}));

        let found = search(core.clone(), json!({"fsName": "memory", "pattern": "logs"}))
            .await
            .unwrap();
        assert_eq!(found, json!(["/logs/a.log"]));

        clear(core.clone(), json!({"fsName": "memory"})).await.unwrap();
        assert_eq!(list(core, json!({"fsName": "memory"})).await.unwrap(), json!([]));
    }

    #[tokio::test]
    async fn test_history_on_git_fs() {
        let temp_dir = TempDir::new().unwrap();
        let core = Arc::new(Core::new(
            LauncherConfig::default().with_data_dir(temp_dir.path()),
        ));
        core.initialize_with(&[]).unwrap();

        create(
            core.clone(),
            json!({"fsName": "git", "path": "/a.txt", "data": "hi"}),
        )
        .await
        .unwrap();

        let log = history(core.clone(), json!({"fsName": "git", "limit": 5}))
            .await
            .unwrap();
        assert_eq!(log.as_array().unwrap().len(), 1);

        let err = history(core, json!({"fsName": "memory"})).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid params: File system 'memory' is not git-backed"
        );
    }
}

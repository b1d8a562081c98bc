//! Launcher configuration

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LauncherConfig {
    pub version: String,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub filesystems: FileSystemsConfig,
    #[serde(default)]
    pub components: ComponentsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub rpc_port: u16,
    pub log_level: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FileSystemsConfig {
    #[serde(default)]
    pub local: LocalFsConfig,
    #[serde(default)]
    pub git: GitFsConfig,
    #[serde(default)]
    pub memory: MemoryFsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LocalFsConfig {
    pub base_path: PathBuf,
    pub auto_create_dir: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GitFsConfig {
    pub base_path: PathBuf,
    pub auto_commit: bool,
    pub commit_message: String,
    pub auto_init: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MemoryFsConfig {
    pub enabled: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ComponentsConfig {
    #[serde(default)]
    pub container: ContainerConfig,
    #[serde(default)]
    pub persistence: PersistenceConfig,
    #[serde(default)]
    pub script: ScriptConfig,
    #[serde(default)]
    pub trigger: TriggerConfig,
    #[serde(default)]
    pub workflow: WorkflowConfig,
    #[serde(default)]
    pub cli: CliConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContainerConfig {
    pub docker_endpoint: String,
    pub default_image: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PersistenceConfig {
    pub storage_path: PathBuf,
    pub backup_path: PathBuf,
    pub max_backups: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScriptConfig {
    pub script_path: PathBuf,
    pub timeout_ms: u64,
    pub max_concurrent: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TriggerConfig {
    pub max_triggers: u32,
    pub trigger_timeout_ms: u64,
    pub retry_attempts: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WorkflowConfig {
    pub max_workflows: u32,
    pub execution_timeout_ms: u64,
    pub retry_attempts: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CliConfig {
    pub host: String,
    pub port: u16,
}

impl LauncherConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.server.validate()?;
        self.filesystems.validate()?;
        self.components.validate()?;
        Ok(())
    }

    /// Point every on-disk back end at `data_dir`.
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        self.filesystems.local.base_path = data_dir.clone();
        self.filesystems.git.base_path = data_dir;
        self
    }
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            version: "1.0.0".to_string(),
            server: ServerConfig::default(),
            filesystems: FileSystemsConfig::default(),
            components: ComponentsConfig::default(),
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(Error::Validation("Server host cannot be empty".to_string()));
        }

        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.log_level.as_str()) {
            return Err(Error::Validation(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.log_level,
                valid_log_levels.join(", ")
            )));
        }

        Ok(())
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            rpc_port: 8081,
            log_level: "info".to_string(),
        }
    }
}

impl FileSystemsConfig {
    pub fn validate(&self) -> Result<()> {
        if self.local.base_path.as_os_str().is_empty() {
            return Err(Error::Validation(
                "Local file system base path cannot be empty".to_string(),
            ));
        }

        if self.git.base_path.as_os_str().is_empty() {
            return Err(Error::Validation(
                "Git file system base path cannot be empty".to_string(),
            ));
        }

        if self.git.auto_commit && self.git.commit_message.trim().is_empty() {
            return Err(Error::Validation(
                "Commit message cannot be empty when auto_commit is enabled".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for LocalFsConfig {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from("./data"),
            auto_create_dir: true,
        }
    }
}

impl Default for GitFsConfig {
    fn default() -> Self {
        Self {
            base_path: PathBuf::from("./data"),
            auto_commit: true,
            commit_message: "Auto commit by system-launcher".to_string(),
            auto_init: true,
        }
    }
}

impl Default for MemoryFsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl ComponentsConfig {
    pub fn validate(&self) -> Result<()> {
        if self.script.max_concurrent == 0 {
            return Err(Error::Validation(
                "Script max_concurrent must be greater than 0".to_string(),
            ));
        }

        if self.trigger.max_triggers == 0 {
            return Err(Error::Validation(
                "Trigger max_triggers must be greater than 0".to_string(),
            ));
        }

        if self.workflow.max_workflows == 0 {
            return Err(Error::Validation(
                "Workflow max_workflows must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            docker_endpoint: "unix:///var/run/docker.sock".to_string(),
            default_image: "alpine:latest".to_string(),
        }
    }
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self {
            storage_path: PathBuf::from("./data"),
            backup_path: PathBuf::from("./backups"),
            max_backups: 10,
        }
    }
}

impl Default for ScriptConfig {
    fn default() -> Self {
        Self {
            script_path: PathBuf::from("./scripts"),
            timeout_ms: 30_000,
            max_concurrent: 5,
        }
    }
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            max_triggers: 100,
            trigger_timeout_ms: 5_000,
            retry_attempts: 3,
        }
    }
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            max_workflows: 50,
            execution_timeout_ms: 300_000,
            retry_attempts: 3,
        }
    }
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 3000,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = LauncherConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.rpc_port, 8081);
        assert_eq!(config.server.host, "localhost");
    }

    #[test]
    fn test_invalid_log_level() {
        let mut config = LauncherConfig::default();
        config.server.log_level = "verbose".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_commit_message_rejected() {
        let mut config = LauncherConfig::default();
        config.filesystems.git.commit_message = "  ".to_string();
        assert!(config.validate().is_err());

        config.filesystems.git.auto_commit = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_with_data_dir() {
        let config = LauncherConfig::default().with_data_dir("/tmp/launcher");
        assert_eq!(
            config.filesystems.local.base_path,
            PathBuf::from("/tmp/launcher")
        );
        assert_eq!(
            config.filesystems.git.base_path,
            PathBuf::from("/tmp/launcher")
        );
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let json = r#"{
            "version": "1.0.0",
            "server": { "host": "0.0.0.0", "rpc_port": 9000, "log_level": "debug" }
        }"#;
        let config: LauncherConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.server.rpc_port, 9000);
        assert_eq!(config.components, ComponentsConfig::default());
        assert!(config.filesystems.memory.enabled);
    }
}

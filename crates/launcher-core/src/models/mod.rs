pub mod config;
pub mod file;

pub use config::{
    CliConfig, ComponentsConfig, ContainerConfig, FileSystemsConfig, GitFsConfig, LauncherConfig,
    LocalFsConfig, MemoryFsConfig, PersistenceConfig, ScriptConfig, ServerConfig, TriggerConfig,
    WorkflowConfig,
};
pub use file::{FileInfo, FileRecord, FsStats};

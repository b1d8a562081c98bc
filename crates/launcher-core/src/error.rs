use crate::components::ComponentKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Git error: {0}")]
    Git(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("File system not found: {0}")]
    FileSystemNotFound(String),

    #[error("{0} component not available")]
    ComponentUnavailable(ComponentKind),
}

pub type Result<T> = std::result::Result<T, Error>;

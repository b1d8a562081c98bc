//! Client error types

use serde_json::Value;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Request timed out after {0} ms")]
    Timeout(u64),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Not connected to server")]
    NotConnected,

    /// The server answered with a JSON-RPC `error` object.
    #[error("{message}")]
    Rpc {
        code: i64,
        message: String,
        data: Option<Value>,
    },

    #[error("Ping failed: {0}")]
    Connection(String),

    #[error("Failed to connect after {attempts} attempts")]
    RetriesExhausted { attempts: u32 },
}

impl ClientError {
    /// Server-side detail for an RPC error, when it sent one.
    pub fn details(&self) -> Option<String> {
        match self {
            ClientError::Rpc {
                data: Some(Value::String(details)),
                ..
            } => Some(details.clone()),
            ClientError::Rpc {
                data: Some(data), ..
            } => Some(data.to_string()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

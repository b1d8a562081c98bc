//! Request transports

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};

/// Sends one encoded request and returns the decoded reply body.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, body: Value) -> Result<Value>;

    /// Where requests go, for diagnostics.
    fn endpoint(&self) -> String;
}

/// One HTTP POST per request, each with its own timeout.
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
    timeout_ms: u64,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| ClientError::Transport(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: config.url(),
            timeout_ms: config.timeout_ms,
        })
    }

    fn map_error(&self, e: reqwest::Error) -> ClientError {
        if e.is_timeout() {
            ClientError::Timeout(self.timeout_ms)
        } else {
            ClientError::Transport(e.to_string())
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, body: Value) -> Result<Value> {
        debug!("POST {}", self.url);
        let response = self
            .client
            .post(&self.url)
            .json(&body)
            .send()
            .await
            .map_err(|e| self.map_error(e))?;

        let text = response.text().await.map_err(|e| self.map_error(e))?;
        serde_json::from_str(&text).map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }

    fn endpoint(&self) -> String {
        self.url.clone()
    }
}

#[cfg(test)]
pub(crate) mod mock {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    /// Records every request and replays canned replies in order.
    #[derive(Default)]
    pub struct MockTransport {
        sent: Mutex<Vec<Value>>,
        replies: Mutex<VecDeque<Result<Value>>>,
    }

    impl MockTransport {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn reply(&self, reply: Result<Value>) {
            self.replies.lock().unwrap().push_back(reply);
        }

        pub fn sent(&self) -> Vec<Value> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn send(&self, body: Value) -> Result<Value> {
            self.sent.lock().unwrap().push(body);
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(ClientError::Transport("no reply queued".to_string())))
        }

        fn endpoint(&self) -> String {
            "mock://".to_string()
        }
    }
}

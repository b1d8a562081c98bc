//! Connect-with-retry policy layered over [`RpcClient::connect`]

use std::time::Duration;
use tracing::{info, warn};

use crate::client::RpcClient;
use crate::error::{ClientError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 10,
            retry_delay: Duration::from_millis(2000),
        }
    }
}

/// Try to connect up to `policy.max_retries` times, sleeping between attempts.
pub async fn connect_with_retry(client: &RpcClient, policy: &RetryPolicy) -> Result<()> {
    for attempt in 1..=policy.max_retries {
        match client.connect().await {
            Ok(()) => {
                if attempt > 1 {
                    info!("Connected on attempt {}", attempt);
                }
                return Ok(());
            }
            Err(e) => {
                warn!(
                    "Connection attempt {}/{} failed: {}",
                    attempt, policy.max_retries, e
                );
                if attempt < policy.max_retries {
                    tokio::time::sleep(policy.retry_delay).await;
                }
            }
        }
    }

    Err(ClientError::RetriesExhausted {
        attempts: policy.max_retries,
    })
}

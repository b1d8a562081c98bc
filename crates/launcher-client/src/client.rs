use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::protocol::{Request, Response};
use crate::transport::{HttpTransport, Transport};

/// Method used to probe the server before marking the client connected.
pub const PREFLIGHT_METHOD: &str = "system.getStatus";

/// The preflight always uses this id; it does not advance the request counter.
pub const PREFLIGHT_ID: u64 = 1;

/// One entry of a [`RpcClient::batch`] call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchOperation {
    pub method: String,
    #[serde(default)]
    pub params: Value,
}

impl BatchOperation {
    pub fn new(method: impl Into<String>, params: Value) -> Self {
        Self {
            method: method.into(),
            params,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// JSON-RPC client. Each call is an independent request on the transport.
pub struct RpcClient {
    transport: Arc<dyn Transport>,
    connected: AtomicBool,
    request_counter: AtomicU64,
}

impl RpcClient {
    /// Client over HTTP using `config`.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self::with_transport(Arc::new(HttpTransport::new(config)?)))
    }

    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self {
            transport,
            connected: AtomicBool::new(false),
            request_counter: AtomicU64::new(0),
        }
    }

    pub fn endpoint(&self) -> String {
        self.transport.endpoint()
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Number of ids handed out by [`RpcClient::call`] so far.
    pub fn request_count(&self) -> u64 {
        self.request_counter.load(Ordering::SeqCst)
    }

    fn next_id(&self) -> u64 {
        self.request_counter.fetch_add(1, Ordering::SeqCst) + 1
    }

    async fn send(&self, request: &Request) -> Result<Response> {
        let body = serde_json::to_value(request)
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;
        let reply = self.transport.send(body).await?;
        serde_json::from_value(reply).map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }

    /// Probe the server and mark the client connected. No-op when already connected.
    pub async fn connect(&self) -> Result<()> {
        if self.is_connected() {
            info!("Already connected to {}", self.endpoint());
            return Ok(());
        }

        let request = Request::new(PREFLIGHT_METHOD, json!({}), PREFLIGHT_ID);
        let response = self
            .send(&request)
            .await
            .map_err(|e| ClientError::Connection(e.to_string()))?;

        if let Some(error) = response.error {
            return Err(ClientError::Connection(error.message));
        }

        self.connected.store(true, Ordering::SeqCst);
        info!("Connected to {}", self.endpoint());
        Ok(())
    }

    pub fn disconnect(&self) {
        self.connected.store(false, Ordering::SeqCst);
        debug!("Disconnected from {}", self.endpoint());
    }

    /// Invoke `method`. Fails with [`ClientError::NotConnected`] before any I/O when disconnected.
    pub async fn call(&self, method: &str, params: Value) -> Result<Value> {
        if !self.is_connected() {
            return Err(ClientError::NotConnected);
        }

        let params = if params.is_null() { json!({}) } else { params };
        let request = Request::new(method, params, self.next_id());
        debug!("RPC call {} (id {})", method, request.id);

        let response = self.send(&request).await?;
        match response.error {
            Some(error) => Err(ClientError::Rpc {
                code: error.code,
                message: error.message,
                data: error.data,
            }),
            None => Ok(response.result.unwrap_or(Value::Null)),
        }
    }

    /// Run each operation in order. A failure is recorded and the batch carries on.
    pub async fn batch(&self, operations: &[BatchOperation]) -> Vec<BatchResult> {
        let mut results = Vec::with_capacity(operations.len());

        for op in operations {
            let entry = match self.call(&op.method, op.params.clone()).await {
                Ok(result) => BatchResult {
                    success: true,
                    result: Some(result),
                    error: None,
                },
                Err(e) => BatchResult {
                    success: false,
                    result: None,
                    error: Some(e.to_string()),
                },
            };
            results.push(entry);
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::mock::MockTransport;

    fn ok(id: u64, result: Value) -> Result<Value> {
        Ok(json!({"jsonrpc": "2.0", "result": result, "id": id}))
    }

    fn rpc_err(id: u64, data: &str) -> Result<Value> {
        Ok(json!({
            "jsonrpc": "2.0",
            "error": {"code": -32603, "message": "Internal error", "data": data},
            "id": id
        }))
    }

    async fn connected(mock: &Arc<MockTransport>) -> RpcClient {
        mock.reply(ok(PREFLIGHT_ID, json!({"initialized": true})));
        let client = RpcClient::with_transport(mock.clone());
        client.connect().await.unwrap();
        client
    }

    #[tokio::test]
    async fn test_call_when_disconnected_sends_nothing() {
        let mock = Arc::new(MockTransport::new());
        let client = RpcClient::with_transport(mock.clone());

        let err = client.call("fs.list", json!({})).await.unwrap_err();
        assert!(matches!(err, ClientError::NotConnected));
        assert!(mock.sent().is_empty());
    }

    #[tokio::test]
    async fn test_preflight_uses_fixed_id() {
        let mock = Arc::new(MockTransport::new());
        let client = connected(&mock).await;

        let sent = mock.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0]["method"], PREFLIGHT_METHOD);
        assert_eq!(sent[0]["id"], 1);
        assert_eq!(client.request_count(), 0);
        assert!(client.is_connected());
    }

    #[tokio::test]
    async fn test_connect_twice_is_noop() {
        let mock = Arc::new(MockTransport::new());
        let client = connected(&mock).await;

        client.connect().await.unwrap();
        assert_eq!(mock.sent().len(), 1);
    }

    #[tokio::test]
    async fn test_connect_failure_reports_cause() {
        let mock = Arc::new(MockTransport::new());
        mock.reply(Err(ClientError::Transport("connection refused".to_string())));
        let client = RpcClient::with_transport(mock.clone());

        let err = client.connect().await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "Ping failed: Transport error: connection refused"
        );
        assert!(!client.is_connected());
    }

    #[tokio::test]
    async fn test_connect_rejects_error_reply() {
        let mock = Arc::new(MockTransport::new());
        mock.reply(rpc_err(1, "Core not ready"));
        let client = RpcClient::with_transport(mock.clone());

        let err = client.connect().await.unwrap_err();
        assert_eq!(err.to_string(), "Ping failed: Internal error");
    }

    #[tokio::test]
    async fn test_call_increments_ids() {
        let mock = Arc::new(MockTransport::new());
        let client = connected(&mock).await;
        mock.reply(ok(1, json!("a")));
        mock.reply(ok(2, json!("b")));

        assert_eq!(client.call("x", json!({})).await.unwrap(), json!("a"));
        assert_eq!(client.call("y", Value::Null).await.unwrap(), json!("b"));

        let sent = mock.sent();
        assert_eq!(sent[1]["id"], 1);
        assert_eq!(sent[2]["id"], 2);
        assert_eq!(sent[2]["params"], json!({}));
        assert_eq!(sent[2]["jsonrpc"], "2.0");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_calls_get_distinct_ids() {
        let mock = Arc::new(MockTransport::new());
        let client = Arc::new(connected(&mock).await);
        for i in 1..=8 {
            mock.reply(ok(i, json!(i)));
        }

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let client = Arc::clone(&client);
                tokio::spawn(async move { client.call("fs.list", json!({})).await })
            })
            .collect();
        for task in tasks {
            assert!(task.await.unwrap().is_ok());
        }

        let mut ids: Vec<u64> = mock.sent()[1..]
            .iter()
            .map(|request| request["id"].as_u64().unwrap())
            .collect();
        ids.sort_unstable();
        assert_eq!(ids, (1..=8).collect::<Vec<u64>>());
        assert_eq!(client.request_count(), 8);
    }

    #[tokio::test]
    async fn test_call_surfaces_rpc_error() {
        let mock = Arc::new(MockTransport::new());
        let client = connected(&mock).await;
        mock.reply(rpc_err(1, "Method not found: no.such.method"));

        let err = client.call("no.such.method", json!({})).await.unwrap_err();
        assert_eq!(err.to_string(), "Internal error");
        assert_eq!(
            err.details().as_deref(),
            Some("Method not found: no.such.method")
        );
    }

    #[tokio::test]
    async fn test_call_after_failure_is_not_retried() {
        let mock = Arc::new(MockTransport::new());
        let client = connected(&mock).await;
        mock.reply(Err(ClientError::Timeout(30_000)));

        let err = client.call("fs.list", json!({})).await.unwrap_err();
        assert!(matches!(err, ClientError::Timeout(30_000)));
        assert_eq!(mock.sent().len(), 2);
    }

    #[tokio::test]
    async fn test_disconnect_is_idempotent() {
        let mock = Arc::new(MockTransport::new());
        let client = connected(&mock).await;

        client.disconnect();
        client.disconnect();
        assert!(!client.is_connected());
        assert!(matches!(
            client.call("fs.list", json!({})).await,
            Err(ClientError::NotConnected)
        ));
    }

    #[tokio::test]
    async fn test_batch_keeps_order_and_failures() {
        let mock = Arc::new(MockTransport::new());
        let client = connected(&mock).await;
        mock.reply(ok(1, json!(true)));
        mock.reply(rpc_err(2, "boom"));
        mock.reply(ok(3, json!("hi")));

        let results = client
            .batch(&[
                BatchOperation::new("fs.create", json!({"path": "/a"})),
                BatchOperation::new("fs.fail", json!({})),
                BatchOperation::new("fs.read", json!({"path": "/a"})),
            ])
            .await;

        assert_eq!(results.len(), 3);
        assert!(results[0].success);
        assert!(!results[1].success);
        assert_eq!(results[1].error.as_deref(), Some("Internal error"));
        assert_eq!(results[2].result, Some(json!("hi")));
    }

    #[test]
    fn test_batch_result_shape() {
        let success = BatchResult {
            success: true,
            result: Some(json!(1)),
            error: None,
        };
        assert_eq!(
            serde_json::to_value(&success).unwrap(),
            json!({"success": true, "result": 1})
        );
    }
}

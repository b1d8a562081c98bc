use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{DefaultBodyLimit, State};
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
};
use axum::http::{HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response as HttpResponse};
use axum::{Json, Router};
use futures::FutureExt;
use serde::Serialize;
use serde_json::{json, Value};
use std::any::Any;
use std::fmt;
use std::net::SocketAddr;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::{oneshot, Mutex};
use tokio::task::JoinHandle;
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::{debug, error, info, warn};

use super::protocol::{transport_error, Request, Response, INVALID_METHOD};
use crate::registry::MethodRegistry;

#[derive(Debug, thiserror::Error)]
pub enum RpcServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Server is {0}, try again once it settles")]
    Busy(ListenerState),
}

pub type Result<T> = std::result::Result<T, RpcServerError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ListenerState {
    Stopped,
    Starting,
    Listening,
    Stopping,
}

impl fmt::Display for ListenerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ListenerState::Stopped => "stopped",
            ListenerState::Starting => "starting",
            ListenerState::Listening => "listening",
            ListenerState::Stopping => "stopping",
        };
        f.write_str(name)
    }
}

struct Listener {
    state: ListenerState,
    local_addr: Option<SocketAddr>,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

/// JSON-RPC over HTTP POST.
pub struct RpcServer {
    host: String,
    port: u16,
    registry: Arc<MethodRegistry>,
    listener: Mutex<Listener>,
}

impl RpcServer {
    pub fn new(host: impl Into<String>, port: u16, registry: Arc<MethodRegistry>) -> Self {
        Self {
            host: host.into(),
            port,
            registry,
            listener: Mutex::new(Listener {
                state: ListenerState::Stopped,
                local_addr: None,
                shutdown: None,
                task: None,
            }),
        }
    }

    pub fn registry(&self) -> &Arc<MethodRegistry> {
        &self.registry
    }

    /// Bind and start serving. Returns the bound address, so port `0` picks a free port.
    ///
    /// Starting a server that is already listening is a no-op.
    pub async fn start(&self) -> Result<SocketAddr> {
        let mut listener = self.listener.lock().await;

        match (listener.state, listener.local_addr) {
            (ListenerState::Listening, Some(addr)) => {
                info!("RPC server already listening on {}", addr);
                return Ok(addr);
            }
            (ListenerState::Stopped, _) => {}
            (state, _) => return Err(RpcServerError::Busy(state)),
        }

        listener.state = ListenerState::Starting;
        let tcp = match TcpListener::bind((self.host.as_str(), self.port)).await {
            Ok(tcp) => tcp,
            Err(e) => {
                error!("Failed to bind {}:{}: {}", self.host, self.port, e);
                listener.state = ListenerState::Stopped;
                return Err(e.into());
            }
        };
        let addr = tcp.local_addr()?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
        let app = router(Arc::clone(&self.registry));
        let task = tokio::spawn(async move {
            let serve = axum::serve(tcp, app).with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            });
            if let Err(e) = serve.await {
                error!("RPC server error: {}", e);
            }
        });

        listener.state = ListenerState::Listening;
        listener.local_addr = Some(addr);
        listener.shutdown = Some(shutdown_tx);
        listener.task = Some(task);

        info!(
            "RPC server listening on {} with {} methods",
            addr,
            self.registry.len()
        );
        Ok(addr)
    }

    /// Stop accepting connections and wait for in-flight requests. No-op unless listening.
    pub async fn stop(&self) {
        let mut listener = self.listener.lock().await;
        if listener.state != ListenerState::Listening {
            debug!("RPC server not listening, nothing to stop");
            return;
        }

        listener.state = ListenerState::Stopping;
        if let Some(shutdown) = listener.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(task) = listener.task.take() {
            if let Err(e) = task.await {
                warn!("RPC server task ended abnormally: {}", e);
            }
        }

        listener.state = ListenerState::Stopped;
        listener.local_addr = None;
        info!("RPC server stopped");
    }

    pub async fn state(&self) -> ListenerState {
        self.listener.lock().await.state
    }

    pub async fn local_addr(&self) -> Option<SocketAddr> {
        self.listener.lock().await.local_addr
    }

    pub async fn status(&self) -> Value {
        let listener = self.listener.lock().await;
        let port = listener.local_addr.map_or(self.port, |addr| addr.port());

        json!({
            "state": listener.state,
            "host": self.host,
            "port": port,
            "listening": listener.state == ListenerState::Listening,
            "methods": self.registry.list(),
        })
    }
}

/// Every path and method goes through [`handle_http`].
///
/// CORS headers are set by layers so that extractor rejections carry them too.
/// Request bodies are not size-limited.
pub fn router(registry: Arc<MethodRegistry>) -> Router {
    Router::new()
        .fallback(handle_http)
        .layer(DefaultBodyLimit::disable())
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_ORIGIN,
            HeaderValue::from_static("*"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET, POST, PUT, DELETE, OPTIONS"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static("Content-Type, Authorization"),
        ))
        .with_state(registry)
}

fn internal_server_error(details: String) -> HttpResponse {
    error!("Failed to handle request: {}", details);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(transport_error(500, "Internal Server Error", Some(details))),
    )
        .into_response()
}

async fn handle_http(
    State(registry): State<Arc<MethodRegistry>>,
    method: Method,
    body: std::result::Result<Bytes, BytesRejection>,
) -> HttpResponse {
    if method == Method::OPTIONS {
        return StatusCode::OK.into_response();
    }
    if method != Method::POST {
        return (
            StatusCode::METHOD_NOT_ALLOWED,
            Json(transport_error(405, "Method Not Allowed", None)),
        )
            .into_response();
    }

    let body = match body {
        Ok(body) => body,
        Err(rejection) => return internal_server_error(rejection.body_text()),
    };

    match handle_post(&registry, &body).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(details) => internal_server_error(details),
    }
}

/// Decode and dispatch one POST body. `Err` is a transport-level failure.
async fn handle_post(
    registry: &MethodRegistry,
    body: &[u8],
) -> std::result::Result<Response, String> {
    let body: Value = serde_json::from_slice(body).map_err(|e| e.to_string())?;

    AssertUnwindSafe(dispatch(registry, body))
        .catch_unwind()
        .await
        .map_err(|panic| panic_message(panic.as_ref()))
}

/// Run one JSON-RPC request against the registry.
///
/// Handler failures become a `-32603` envelope; they never surface as HTTP errors.
pub async fn dispatch(registry: &MethodRegistry, body: Value) -> Response {
    let request = match Request::from_value(body) {
        Ok(request) => request,
        Err(id) => {
            debug!("Rejected request without a method");
            return Response::internal_error(INVALID_METHOD, id);
        }
    };

    debug!("RPC call: {}", request.method);
    match registry.call(&request.method, request.params).await {
        Ok(result) => Response::success(result, request.id),
        Err(e) => {
            warn!("RPC method {} failed: {}", request.method, e);
            Response::internal_error(e.to_string(), request.id)
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "handler panicked".to_string()
    }
}

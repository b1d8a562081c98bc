//! Method name to handler mapping

use futures::future::{BoxFuture, FutureExt};
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::api::{ApiError, Result};

pub type HandlerFuture = BoxFuture<'static, Result<Value>>;

/// A registered RPC operation: params in, result or error out.
pub type Handler = Arc<dyn Fn(Value) -> HandlerFuture + Send + Sync>;

/// Exact-match registry of RPC methods.
///
/// Names are kept in the order they were first registered. Registering a name
/// again replaces its handler but keeps its position.
#[derive(Default)]
pub struct MethodRegistry {
    handlers: HashMap<String, Handler>,
    order: Vec<String>,
}

impl MethodRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F, Fut>(&mut self, name: impl Into<String>, handler: F)
    where
        F: Fn(Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Value>> + Send + 'static,
    {
        let name = name.into();
        let handler: Handler = Arc::new(move |params| handler(params).boxed());

        if self.handlers.insert(name.clone(), handler).is_some() {
            warn!("Method {} already registered, replacing handler", name);
        } else {
            debug!("Registered method {}", name);
            self.order.push(name);
        }
    }

    pub fn resolve(&self, name: &str) -> Result<Handler> {
        self.handlers
            .get(name)
            .cloned()
            .ok_or_else(|| ApiError::MethodNotFound(name.to_string()))
    }

    /// Resolve `name` and run its handler.
    pub async fn call(&self, name: &str, params: Value) -> Result<Value> {
        let handler = self.resolve(name)?;
        handler(params).await
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Registered names in insertion order.
    pub fn list(&self) -> &[String] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

pub const JSONRPC_VERSION: &str = "2.0";

/// Code used for every handler failure.
pub const INTERNAL_ERROR: i32 = -32603;
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal error";

/// `data` reported when a request has no usable method name.
pub const INVALID_METHOD: &str = "Invalid method";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub jsonrpc: String,
    pub method: String,
    pub params: Value,
    pub id: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
    pub id: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Request {
    pub fn new(method: impl Into<String>, params: Value, id: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            method: method.into(),
            params,
            id,
        }
    }

    /// Interpret a decoded request body.
    ///
    /// Missing or `null` params become `{}`. A body that is not an object, or
    /// whose `method` is not a non-empty string, is rejected; the error carries
    /// whatever `id` could be recovered so the reply can echo it.
    pub fn from_value(body: Value) -> std::result::Result<Self, Value> {
        let mut fields = match body {
            Value::Object(fields) => fields,
            _ => return Err(Value::Null),
        };

        let id = fields.remove("id").unwrap_or(Value::Null);
        let method = match fields.remove("method") {
            Some(Value::String(method)) if !method.is_empty() => method,
            _ => return Err(id),
        };
        let params = match fields.remove("params") {
            None | Some(Value::Null) => Value::Object(Map::new()),
            Some(params) => params,
        };
        let jsonrpc = match fields.remove("jsonrpc") {
            Some(Value::String(version)) => version,
            _ => JSONRPC_VERSION.to_string(),
        };

        Ok(Self {
            jsonrpc,
            method,
            params,
            id,
        })
    }
}

impl Response {
    pub fn success(result: Value, id: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: Some(result),
            error: None,
            id,
        }
    }

    /// The `-32603` envelope with `data` set to the failure text.
    pub fn internal_error(data: impl Into<String>, id: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result: None,
            error: Some(JsonRpcError {
                code: INTERNAL_ERROR,
                message: INTERNAL_ERROR_MESSAGE.to_string(),
                data: Some(Value::String(data.into())),
            }),
            id,
        }
    }
}

/// Body for HTTP-level failures that never reached a handler.
pub fn transport_error(status: u16, message: &str, details: Option<String>) -> Value {
    let mut error = json!({ "code": status, "message": message });
    if let Some(details) = details {
        error["details"] = Value::String(details);
    }
    json!({ "error": error })
}

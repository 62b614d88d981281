//! JSON-RPC 2.0 message types for the MCP protocol.
//!
//! Envelope structs declare `result`/`error` before `id` so that serialized
//! responses read `jsonrpc`, payload, `id`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// JSON-RPC 2.0 protocol version.
pub const JSONRPC_VERSION: &str = "2.0";

fn default_jsonrpc() -> String {
    JSONRPC_VERSION.to_string()
}

/// Request identifier. Any JSON scalar is echoed back as received; an absent
/// id is treated as `null`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    String(String),
    Number(serde_json::Number),
    Bool(bool),
    #[default]
    Null,
}

impl RequestId {
    /// Recover an id from a JSON value; non-scalars yield `None`.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(RequestId::String(s.clone())),
            Value::Number(n) => Some(RequestId::Number(n.clone())),
            Value::Bool(b) => Some(RequestId::Bool(*b)),
            Value::Null => Some(RequestId::Null),
            Value::Array(_) | Value::Object(_) => None,
        }
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RequestId::String(s) => write!(f, "{s}"),
            RequestId::Number(n) => write!(f, "{n}"),
            RequestId::Bool(b) => write!(f, "{b}"),
            RequestId::Null => write!(f, "null"),
        }
    }
}

/// A JSON-RPC 2.0 request message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    #[serde(default = "default_jsonrpc")]
    pub jsonrpc: String,
    #[serde(default)]
    pub id: RequestId,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

/// A JSON-RPC 2.0 success response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub result: Value,
    pub id: RequestId,
}

/// A JSON-RPC 2.0 error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub jsonrpc: String,
    pub error: JsonRpcErrorObject,
    pub id: RequestId,
}

/// Error object within a JSON-RPC error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcErrorObject {
    pub code: i32,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Either kind of reply; serializes as the inner envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JsonRpcReply {
    Response(JsonRpcResponse),
    Error(JsonRpcError),
}

impl JsonRpcResponse {
    pub fn new(id: RequestId, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            result,
            id,
        }
    }
}

impl JsonRpcError {
    pub fn new(id: RequestId, code: i32, message: String) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            error: JsonRpcErrorObject {
                code,
                message,
                data: None,
            },
            id,
        }
    }
}

impl JsonRpcReply {
    pub fn is_error(&self) -> bool {
        matches!(self, JsonRpcReply::Error(_))
    }
}

impl From<JsonRpcResponse> for JsonRpcReply {
    fn from(r: JsonRpcResponse) -> Self {
        JsonRpcReply::Response(r)
    }
}

impl From<JsonRpcError> for JsonRpcReply {
    fn from(e: JsonRpcError) -> Self {
        JsonRpcReply::Error(e)
    }
}

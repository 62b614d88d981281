//! Error types and JSON-RPC error codes for the MCP server.

use browser_bridge::BridgeError;

use super::message::{JsonRpcError, JsonRpcErrorObject, RequestId, JSONRPC_VERSION};

/// Standard JSON-RPC 2.0 error codes.
pub mod error_codes {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;
}

/// All errors that can occur in the MCP server.
///
/// Everything raised after a method has been routed shares the internal
/// error code on the wire; the variants keep the distinction for logs.
#[derive(thiserror::Error, Debug)]
pub enum McpError {
    /// Carries the decoder message for logging; the wire message is fixed.
    #[error("Parse error")]
    ParseError(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Method not found: {0}")]
    MethodNotFound(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error("Unknown tool: {0}")]
    ToolNotFound(String),

    #[error(transparent)]
    Browser(#[from] BridgeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl McpError {
    pub fn code(&self) -> i32 {
        use error_codes::*;
        match self {
            McpError::ParseError(_) => PARSE_ERROR,
            McpError::InvalidRequest(_) => INVALID_REQUEST,
            McpError::MethodNotFound(_) => METHOD_NOT_FOUND,
            McpError::InvalidParams(_)
            | McpError::ToolNotFound(_)
            | McpError::Browser(_)
            | McpError::Io(_)
            | McpError::Json(_) => INTERNAL_ERROR,
        }
    }

    /// Message as it appears in the error object.
    pub fn wire_message(&self) -> String {
        if self.code() == error_codes::INTERNAL_ERROR {
            format!("Internal error: {self}")
        } else {
            self.to_string()
        }
    }

    pub fn to_json_rpc_error(&self, id: RequestId) -> JsonRpcError {
        JsonRpcError {
            jsonrpc: JSONRPC_VERSION.to_string(),
            error: JsonRpcErrorObject {
                code: self.code(),
                message: self.wire_message(),
                data: None,
            },
            id,
        }
    }
}

pub type McpResult<T> = Result<T, McpError>;

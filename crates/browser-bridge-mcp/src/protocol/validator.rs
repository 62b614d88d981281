//! JSON-RPC message validation.
//!
//! Input is decoded to a generic JSON value first so that the id can be
//! recovered even when the rest of the envelope is unusable.

use serde_json::Value;

use crate::types::{JsonRpcRequest, McpError, RequestId, JSONRPC_VERSION};

/// Turn a decoded JSON value into a request.
///
/// On failure the recovered id (or `null`) is returned with the error so the
/// caller can still address the reply.
pub fn parse_request(value: Value) -> Result<JsonRpcRequest, (RequestId, McpError)> {
    let Value::Object(mut obj) = value else {
        return Err((
            RequestId::Null,
            McpError::InvalidRequest("Request must be a JSON object".to_string()),
        ));
    };

    let id = match obj.get("id") {
        None => RequestId::Null,
        Some(raw) => RequestId::from_value(raw).ok_or_else(|| {
            (
                RequestId::Null,
                McpError::InvalidRequest("id must be a string, number, boolean or null".to_string()),
            )
        })?,
    };

    let jsonrpc = match obj.get("jsonrpc") {
        None => JSONRPC_VERSION.to_string(),
        Some(Value::String(v)) if v == JSONRPC_VERSION => v.clone(),
        Some(other) => {
            return Err((
                id,
                McpError::InvalidRequest(format!(
                    "Expected jsonrpc version \"{JSONRPC_VERSION}\", got {other}"
                )),
            ))
        }
    };

    let method = match obj.get("method") {
        Some(Value::String(m)) if !m.is_empty() => m.clone(),
        Some(Value::String(_)) => {
            return Err((
                id,
                McpError::InvalidRequest("Method name must not be empty".to_string()),
            ))
        }
        Some(_) => {
            return Err((
                id,
                McpError::InvalidRequest("Method must be a string".to_string()),
            ))
        }
        None => {
            return Err((
                id,
                McpError::InvalidRequest("Missing method".to_string()),
            ))
        }
    };

    Ok(JsonRpcRequest {
        jsonrpc,
        id,
        method,
        params: obj.remove("params"),
    })
}

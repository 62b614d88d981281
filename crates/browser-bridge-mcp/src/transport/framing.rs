//! Message framing for newline-delimited JSON.

use serde::Serialize;

use crate::types::{McpError, McpResult};

/// Serialize a message to a JSON line (with trailing newline).
pub fn frame_message(message: &impl Serialize) -> McpResult<String> {
    let mut json = serde_json::to_string(message).map_err(McpError::Json)?;
    json.push('\n');
    Ok(json)
}

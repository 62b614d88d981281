//! MCP response types for tools.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Payload of every `tools/call` result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCallResult {
    pub success: bool,
    pub result: Value,
}

impl ToolCallResult {
    pub fn ok(result: impl Into<Value>) -> Self {
        Self {
            success: true,
            result: result.into(),
        }
    }

    pub fn failed(result: impl Into<Value>) -> Self {
        Self {
            success: false,
            result: result.into(),
        }
    }

    pub fn json(value: &impl Serialize) -> Self {
        match serde_json::to_value(value) {
            Ok(v) => Self::ok(v),
            Err(e) => Self::failed(e.to_string()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolListResult {
    pub tools: Vec<ToolDefinition>,
}

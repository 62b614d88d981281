//! Tool `fill_form`: Fill form fields and optionally submit.

use std::sync::Arc;
use tokio::sync::Mutex;

use serde::Deserialize;
use serde_json::{json, Map, Value};

use crate::session::BrowserSessionManager;
use crate::types::{McpError, McpResult, ToolCallResult, ToolDefinition};

#[derive(Debug, Deserialize)]
struct FillParams {
    fields: Map<String, Value>,
    #[serde(default)]
    submit_button: Option<String>,
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "fill_form".to_string(),
        description: "Fill and submit a form with provided values".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "fields": {
                    "type": "object",
                    "description": "Dictionary of selector: value pairs",
                    "additionalProperties": { "type": "string" }
                },
                "submit_button": {
                    "type": "string",
                    "description": "CSS selector for submit button (optional)",
                    "default": null
                }
            },
            "required": ["fields"]
        }),
    }
}

pub async fn execute(
    args: Value,
    session: &Arc<Mutex<BrowserSessionManager>>,
) -> McpResult<ToolCallResult> {
    let params: FillParams =
        serde_json::from_value(args).map_err(|e| McpError::InvalidParams(e.to_string()))?;
    let fields = field_pairs(params.fields)?;

    let mut session = session.lock().await;
    session
        .client_mut()
        .fill_form(&fields, params.submit_button.as_deref())
        .await?;

    Ok(ToolCallResult::ok("Form submitted"))
}

/// Selector/value pairs in the order the caller wrote them.
fn field_pairs(fields: Map<String, Value>) -> McpResult<Vec<(String, String)>> {
    fields
        .into_iter()
        .map(|(selector, value)| match value {
            Value::String(value) => Ok((selector, value)),
            other => Err(McpError::InvalidParams(format!(
                "field '{selector}' must be a string, got {other}"
            ))),
        })
        .collect()
}

//! Tool `extract_content`: Extract the page (or one element) as Markdown.

use std::sync::Arc;
use tokio::sync::Mutex;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::session::BrowserSessionManager;
use crate::types::{McpError, McpResult, ToolCallResult, ToolDefinition};

#[derive(Debug, Deserialize)]
struct ExtractParams {
    #[serde(default)]
    selector: Option<String>,
    #[serde(default)]
    include_metadata: Option<bool>,
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "extract_content".to_string(),
        description: "Extract page content and convert to Markdown".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "selector": {
                    "type": "string",
                    "description": "CSS selector for content to extract (optional, extracts all if not provided)",
                    "default": null
                },
                "include_metadata": {
                    "type": "boolean",
                    "description": "Include page title and URL in output",
                    "default": true
                }
            }
        }),
    }
}

pub async fn execute(
    args: Value,
    session: &Arc<Mutex<BrowserSessionManager>>,
) -> McpResult<ToolCallResult> {
    let params: ExtractParams =
        serde_json::from_value(args).map_err(|e| McpError::InvalidParams(e.to_string()))?;

    let session = session.lock().await;
    let content = session
        .client()
        .extract_content(
            params.selector.as_deref(),
            params.include_metadata.unwrap_or(true),
        )
        .await?;

    Ok(ToolCallResult::ok(content))
}

//! Tool `navigate_to`: Navigate the persistent browser to a URL.

use std::sync::Arc;
use tokio::sync::Mutex;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::session::BrowserSessionManager;
use crate::types::{McpError, McpResult, ToolCallResult, ToolDefinition};

#[derive(Debug, Deserialize)]
struct NavigateParams {
    url: String,
    #[serde(default)]
    wait_for: Option<String>,
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "navigate_to".to_string(),
        description: "Navigate to a URL in the persistent browser".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "url": { "type": "string", "description": "The URL to navigate to" },
                "wait_for": {
                    "type": "string",
                    "description": "Wait for selector before returning (optional)",
                    "default": null
                }
            },
            "required": ["url"]
        }),
    }
}

pub async fn execute(
    args: Value,
    session: &Arc<Mutex<BrowserSessionManager>>,
) -> McpResult<ToolCallResult> {
    let params: NavigateParams =
        serde_json::from_value(args).map_err(|e| McpError::InvalidParams(e.to_string()))?;

    let mut session = session.lock().await;
    let current_url = session
        .client_mut()
        .navigate_to(&params.url, params.wait_for.as_deref())
        .await?;

    Ok(ToolCallResult::ok(current_url))
}

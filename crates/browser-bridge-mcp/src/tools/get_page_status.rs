//! Tool `get_page_status`: Report the current URL, title and connection state.

use std::sync::Arc;
use tokio::sync::Mutex;

use serde_json::{json, Value};

use crate::session::BrowserSessionManager;
use crate::types::{McpResult, ToolCallResult, ToolDefinition};

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "get_page_status".to_string(),
        description: "Get current page URL and connection status".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {}
        }),
    }
}

/// Arguments are ignored.
pub async fn execute(
    _args: Value,
    session: &Arc<Mutex<BrowserSessionManager>>,
) -> McpResult<ToolCallResult> {
    let session = session.lock().await;
    let status = session.client().page_status().await;
    Ok(ToolCallResult::json(&status))
}

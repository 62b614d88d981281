//! Tool `wait_for_login`: Pause until the user has logged in manually.

use std::sync::Arc;
use tokio::sync::Mutex;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::session::BrowserSessionManager;
use crate::types::{McpError, McpResult, ToolCallResult, ToolDefinition};

const DEFAULT_TIMEOUT_SECONDS: u64 = 300;

#[derive(Debug, Deserialize)]
struct LoginParams {
    #[serde(default)]
    timeout_seconds: Option<u64>,
    #[serde(default)]
    success_indicator: Option<String>,
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "wait_for_login".to_string(),
        description: "Pause and wait for manual authentication in the browser".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "timeout_seconds": {
                    "type": "integer",
                    "description": "Maximum wait time in seconds",
                    "default": DEFAULT_TIMEOUT_SECONDS
                },
                "success_indicator": {
                    "type": "string",
                    "description": "URL pattern or selector indicating successful login",
                    "default": null
                }
            }
        }),
    }
}

pub async fn execute(
    args: Value,
    session: &Arc<Mutex<BrowserSessionManager>>,
) -> McpResult<ToolCallResult> {
    let params: LoginParams =
        serde_json::from_value(args).map_err(|e| McpError::InvalidParams(e.to_string()))?;

    let session = session.lock().await;
    let logged_in = session
        .client()
        .wait_for_login(
            params.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS),
            params.success_indicator.as_deref(),
        )
        .await?;

    if logged_in {
        Ok(ToolCallResult::ok("Login detected"))
    } else {
        Ok(ToolCallResult::failed("Timeout"))
    }
}

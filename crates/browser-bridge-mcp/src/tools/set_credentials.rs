//! Tool `set_credentials`: Keep a username/password pair in memory.

use std::sync::Arc;
use tokio::sync::Mutex;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::session::BrowserSessionManager;
use crate::types::{McpError, McpResult, ToolCallResult, ToolDefinition};

#[derive(Deserialize)]
struct CredentialParams {
    username: String,
    password: String,
}

pub fn definition() -> ToolDefinition {
    ToolDefinition {
        name: "set_credentials".to_string(),
        description: "Set username and password for automatic login".to_string(),
        input_schema: json!({
            "type": "object",
            "properties": {
                "username": { "type": "string", "description": "Username for authentication" },
                "password": { "type": "string", "description": "Password for authentication" }
            },
            "required": ["username", "password"]
        }),
    }
}

pub async fn execute(
    args: Value,
    session: &Arc<Mutex<BrowserSessionManager>>,
) -> McpResult<ToolCallResult> {
    let params: CredentialParams =
        serde_json::from_value(args).map_err(|e| McpError::InvalidParams(e.to_string()))?;

    let mut session = session.lock().await;
    session
        .client_mut()
        .set_credentials(&params.username, &params.password);

    Ok(ToolCallResult::ok("Credentials stored"))
}

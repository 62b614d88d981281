//! Tool registration and dispatch.

use std::sync::Arc;
use tokio::sync::Mutex;

use serde_json::Value;

use crate::session::BrowserSessionManager;
use crate::types::{McpError, McpResult, ToolCallResult, ToolDefinition};

use super::{
    extract_content, fill_form, get_page_status, navigate_to, set_credentials, wait_for_login,
};

pub struct ToolRegistry;

impl ToolRegistry {
    /// All tools, in catalog order.
    pub fn list_tools() -> Vec<ToolDefinition> {
        vec![
            navigate_to::definition(),
            extract_content::definition(),
            set_credentials::definition(),
            wait_for_login::definition(),
            fill_form::definition(),
            get_page_status::definition(),
        ]
    }

    pub fn definition(name: &str) -> Option<ToolDefinition> {
        Self::list_tools().into_iter().find(|t| t.name == name)
    }

    pub async fn call(
        name: &str,
        arguments: Option<Value>,
        session: &Arc<Mutex<BrowserSessionManager>>,
    ) -> McpResult<ToolCallResult> {
        let args = match arguments {
            None | Some(Value::Null) => Value::Object(serde_json::Map::new()),
            Some(args) => args,
        };

        match name {
            "navigate_to" => navigate_to::execute(args, session).await,
            "extract_content" => extract_content::execute(args, session).await,
            "set_credentials" => set_credentials::execute(args, session).await,
            "wait_for_login" => wait_for_login::execute(args, session).await,
            "fill_form" => fill_form::execute(args, session).await,
            "get_page_status" => get_page_status::execute(args, session).await,
            _ => Err(McpError::ToolNotFound(name.to_string())),
        }
    }
}

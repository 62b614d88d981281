//! Main request dispatcher: receives JSON-RPC lines, routes to handlers.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

use serde_json::Value;

use crate::session::BrowserSessionManager;
use crate::tools::ToolRegistry;
use crate::types::*;

use super::validator::parse_request;

/// The protocol handler that turns each inbound line into exactly one reply.
pub struct ProtocolHandler {
    session: Arc<Mutex<BrowserSessionManager>>,
    running: AtomicBool,
}

impl ProtocolHandler {
    pub fn new(session: Arc<Mutex<BrowserSessionManager>>) -> Self {
        Self {
            session,
            running: AtomicBool::new(true),
        }
    }

    pub fn session(&self) -> &Arc<Mutex<BrowserSessionManager>> {
        &self.session
    }

    /// False once `shutdown` has been handled or `finish` has run.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Decode and dispatch one input line. A blank line is a parse error.
    pub async fn handle_line(&self, line: &str) -> JsonRpcReply {
        let value: Value = match serde_json::from_str(line.trim()) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("Invalid JSON: {e}");
                let err = McpError::ParseError(e.to_string());
                return err.to_json_rpc_error(RequestId::Null).into();
            }
        };

        self.handle_value(value).await
    }

    /// Dispatch an already decoded JSON value.
    pub async fn handle_value(&self, value: Value) -> JsonRpcReply {
        match parse_request(value) {
            Ok(request) => self.handle_request(request).await,
            Err((id, e)) => {
                tracing::warn!("Rejected request: {e}");
                e.to_json_rpc_error(id).into()
            }
        }
    }

    pub async fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcReply {
        tracing::info!("Received request: {} (id: {})", request.method, request.id);

        let id = request.id.clone();
        match self.dispatch_request(request).await {
            Ok(value) => JsonRpcResponse::new(id, value).into(),
            Err(e) => {
                match &e {
                    McpError::MethodNotFound(_) => tracing::warn!("{e}"),
                    _ => tracing::error!("Error handling request: {e}"),
                }
                e.to_json_rpc_error(id).into()
            }
        }
    }

    async fn dispatch_request(&self, request: JsonRpcRequest) -> McpResult<Value> {
        match request.method.as_str() {
            "initialize" => self.handle_initialize(),
            "tools/list" => self.handle_tools_list(),
            "tools/call" => self.handle_tools_call(request.params).await,
            "shutdown" => self.handle_shutdown().await,
            _ => Err(McpError::MethodNotFound(request.method)),
        }
    }

    fn handle_initialize(&self) -> McpResult<Value> {
        tracing::info!("Server initialized");
        Ok(serde_json::to_value(InitializeResult::default_result())?)
    }

    fn handle_tools_list(&self) -> McpResult<Value> {
        let result = ToolListResult {
            tools: ToolRegistry::list_tools(),
        };
        Ok(serde_json::to_value(result)?)
    }

    async fn handle_tools_call(&self, params: Option<Value>) -> McpResult<Value> {
        let call_params: ToolCallParams = params
            .map(serde_json::from_value)
            .transpose()
            .map_err(|e| McpError::InvalidParams(e.to_string()))?
            .ok_or_else(|| McpError::InvalidParams("Tool call params required".to_string()))?;

        tracing::info!("Calling tool: {}", call_params.name);
        let result =
            ToolRegistry::call(&call_params.name, call_params.arguments, &self.session).await?;

        Ok(serde_json::to_value(result)?)
    }

    async fn handle_shutdown(&self) -> McpResult<Value> {
        tracing::info!("Shutdown requested");
        self.finish().await;
        Ok(serde_json::json!({ "status": "shutdown" }))
    }

    /// Stop accepting input and tear the browser down. Safe to call repeatedly.
    pub async fn finish(&self) {
        self.running.store(false, Ordering::SeqCst);
        self.session.lock().await.close().await;
    }
}

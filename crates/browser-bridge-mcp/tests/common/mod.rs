//! Shared helpers: an in-memory browser driver and request builders.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::Mutex;

use browser_bridge::{BridgeError, BridgeResult, BrowserClient, BrowserDriver, BrowserSettings, LoadState};
use browser_bridge_mcp::protocol::ProtocolHandler;
use browser_bridge_mcp::session::BrowserSessionManager;

/// What the stub page looks like, plus a record of everything done to it.
#[derive(Debug, Default)]
pub struct StubPage {
    pub url: String,
    pub title: String,
    pub html: String,
    /// selector -> inner HTML
    pub elements: HashMap<String, String>,
    pub filled: Vec<(String, String)>,
    pub clicked: Vec<String>,
    pub visits: Vec<String>,
    pub closes: usize,
    /// When set, `current_url` fails with this message.
    pub broken: Option<String>,
}

#[derive(Clone, Default)]
pub struct StubDriver(pub Arc<StdMutex<StubPage>>);

impl StubDriver {
    pub fn page(&self) -> std::sync::MutexGuard<'_, StubPage> {
        self.0.lock().unwrap()
    }
}

#[async_trait]
impl BrowserDriver for StubDriver {
    async fn goto(&mut self, url: &str, _load_state: LoadState, _timeout: Duration) -> BridgeResult<()> {
        let mut page = self.page();
        page.url = url.to_string();
        page.visits.push(url.to_string());
        Ok(())
    }

    async fn wait_for_load(&mut self, _load_state: LoadState, _timeout: Duration) -> BridgeResult<()> {
        Ok(())
    }

    async fn current_url(&self) -> BridgeResult<String> {
        let page = self.page();
        match &page.broken {
            Some(msg) => Err(BridgeError::Cdp(msg.clone())),
            None => Ok(page.url.clone()),
        }
    }

    async fn title(&self) -> BridgeResult<String> {
        Ok(self.page().title.clone())
    }

    async fn content(&self) -> BridgeResult<String> {
        Ok(self.page().html.clone())
    }

    async fn inner_html(&self, selector: &str) -> BridgeResult<Option<String>> {
        Ok(self.page().elements.get(selector).cloned())
    }

    async fn has_element(&self, selector: &str) -> BridgeResult<bool> {
        Ok(self.page().elements.contains_key(selector))
    }

    async fn fill(&mut self, selector: &str, value: &str) -> BridgeResult<()> {
        let mut page = self.page();
        if !page.elements.contains_key(selector) {
            return Err(BridgeError::ElementNotFound(selector.to_string()));
        }
        page.filled.push((selector.to_string(), value.to_string()));
        Ok(())
    }

    async fn click(&mut self, selector: &str) -> BridgeResult<()> {
        let mut page = self.page();
        if !page.elements.contains_key(selector) {
            return Err(BridgeError::ElementNotFound(selector.to_string()));
        }
        page.clicked.push(selector.to_string());
        Ok(())
    }

    async fn close(&mut self) -> BridgeResult<()> {
        self.page().closes += 1;
        Ok(())
    }
}

/// A handler over a stub page that starts out on `about:blank`.
pub fn stub_handler() -> (ProtocolHandler, StubDriver) {
    let driver = StubDriver::default();
    {
        let mut page = driver.page();
        page.url = "about:blank".to_string();
        page.title = "Example Domain".to_string();
        page.html = "<html><body><h1>Example Domain</h1><p>For use in examples.</p></body></html>"
            .to_string();
    }

    let mut settings = BrowserSettings::new(std::env::temp_dir().join("browser-bridge-test"));
    settings.slow_mo_ms = 0;

    let client = BrowserClient::new(Box::new(driver.clone()), settings);
    let session = Arc::new(Mutex::new(BrowserSessionManager::from_client(client)));
    (ProtocolHandler::new(session), driver)
}

/// Build a JSON-RPC request line.
pub fn mcp_request(id: Value, method: &str, params: Value) -> String {
    json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": method,
        "params": params
    })
    .to_string()
}

/// Build a `tools/call` request line.
pub fn tool_call(id: i64, name: &str, arguments: Value) -> String {
    mcp_request(json!(id), "tools/call", json!({ "name": name, "arguments": arguments }))
}

/// Send one line through the handler and return the reply as JSON.
pub async fn send(handler: &ProtocolHandler, line: &str) -> Value {
    let reply = handler.handle_line(line).await;
    serde_json::to_value(reply).unwrap()
}

/// Send one line and return the raw serialized reply.
pub async fn send_raw(handler: &ProtocolHandler, line: &str) -> String {
    let reply = handler.handle_line(line).await;
    serde_json::to_string(&reply).unwrap()
}

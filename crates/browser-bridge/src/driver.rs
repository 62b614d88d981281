//! Browser engine abstraction.
//!
//! `BrowserDriver` is the seam between the operations the bridge exposes and
//! the engine that performs them (Chromium via chromiumoxide in production,
//! in-memory stubs in tests). Drivers own exactly one page.

use std::time::Duration;

use async_trait::async_trait;

use crate::types::{BridgeResult, LoadState};

#[async_trait]
pub trait BrowserDriver: Send + Sync {
    /// Navigate the page and wait until `load_state` is reached.
    async fn goto(&mut self, url: &str, load_state: LoadState, timeout: Duration) -> BridgeResult<()>;

    /// Wait until the current document reaches `load_state`.
    async fn wait_for_load(&mut self, load_state: LoadState, timeout: Duration) -> BridgeResult<()>;

    async fn current_url(&self) -> BridgeResult<String>;

    async fn title(&self) -> BridgeResult<String>;

    /// Serialized HTML of the whole document.
    async fn content(&self) -> BridgeResult<String>;

    /// Inner HTML of the first element matching `selector`, `None` if absent.
    async fn inner_html(&self, selector: &str) -> BridgeResult<Option<String>>;

    async fn has_element(&self, selector: &str) -> BridgeResult<bool>;

    /// Replace the value of the field matching `selector`.
    async fn fill(&mut self, selector: &str, value: &str) -> BridgeResult<()>;

    async fn click(&mut self, selector: &str) -> BridgeResult<()>;

    /// Release the page and the engine. Called at most once.
    async fn close(&mut self) -> BridgeResult<()>;
}

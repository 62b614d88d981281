//! Chromium driver using chromiumoxide.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::js_protocol::runtime::EvaluateParams;
use chromiumoxide::page::Page;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::driver::BrowserDriver;
use crate::settings::BrowserSettings;
use crate::types::{BridgeError, BridgeResult, LoadState};
use crate::wait::{poll_until, time_left};

/// Quiet period after `complete` before `networkidle` is considered reached.
const NETWORK_IDLE_SETTLE: Duration = Duration::from_millis(500);

/// Find a Chromium binary when none is configured explicitly.
pub fn find_chromium() -> Option<PathBuf> {
    if let Ok(p) = std::env::var("BROWSER_BRIDGE_CHROME") {
        let path = PathBuf::from(&p);
        if path.exists() {
            return Some(path);
        }
    }

    if let Some(home) = dirs::home_dir() {
        let candidates = [
            home.join(".browser-bridge/chromium/chrome-linux64/chrome"),
            home.join(".browser-bridge/chromium/chrome"),
        ];
        for c in candidates {
            if c.exists() {
                return Some(c);
            }
        }
    }

    for name in ["google-chrome", "chromium", "chromium-browser"] {
        if let Ok(path) = which::which(name) {
            return Some(path);
        }
    }

    if cfg!(target_os = "macos") {
        let common = PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome");
        if common.exists() {
            return Some(common);
        }
    }

    None
}

/// A single-page Chromium session on a persistent profile.
pub struct ChromiumDriver {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
    slow_mo: Duration,
}

impl ChromiumDriver {
    /// Launch Chromium with the configured profile and open the working page.
    pub async fn launch(settings: &BrowserSettings) -> BridgeResult<Self> {
        std::fs::create_dir_all(&settings.profile_dir)?;

        let mut builder = BrowserConfig::builder()
            .user_data_dir(&settings.profile_dir)
            .request_timeout(settings.navigation_timeout());

        if !settings.headless {
            builder = builder.with_head().window_size(1280, 900);
        }

        if let Some(path) = settings.executable.clone().or_else(find_chromium) {
            builder = builder.chrome_executable(path);
        }

        for arg in &settings.args {
            builder = builder.arg(arg.as_str());
        }

        let config = builder
            .build()
            .map_err(|e| BridgeError::Launch(format!("invalid browser config: {e}")))?;

        tracing::info!(
            profile = %settings.profile_dir.display(),
            headless = settings.headless,
            "Launching Chromium"
        );

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| BridgeError::Launch(e.to_string()))?;

        let handler_task = tokio::spawn(async move { while handler.next().await.is_some() {} });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                handler_task.abort();
                return Err(BridgeError::Launch(format!("failed to open page: {e}")));
            }
        };

        tracing::info!("Browser started");

        Ok(Self {
            browser,
            page,
            handler_task,
            slow_mo: settings.slow_mo(),
        })
    }

    async fn evaluate<T: DeserializeOwned>(&self, expression: String) -> BridgeResult<T> {
        let params = EvaluateParams::builder()
            .expression(expression)
            .return_by_value(true)
            .build()
            .map_err(BridgeError::Script)?;

        let result = self.page.evaluate_expression(params).await?;
        result
            .into_value()
            .map_err(|e| BridgeError::Script(format!("unexpected script result: {e}")))
    }

    async fn ready_state(&self) -> BridgeResult<String> {
        self.evaluate("document.readyState".to_string()).await
    }

    async fn pause(&self) {
        if !self.slow_mo.is_zero() {
            tokio::time::sleep(self.slow_mo).await;
        }
    }
}

/// Quote a Rust string as a JavaScript string literal.
fn js_string(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| "\"\"".to_string())
}

#[async_trait]
impl BrowserDriver for ChromiumDriver {
    async fn goto(&mut self, url: &str, load_state: LoadState, timeout: Duration) -> BridgeResult<()> {
        self.pause().await;
        let deadline = Instant::now() + timeout;

        match tokio::time::timeout(timeout, self.page.goto(url)).await {
            Ok(Ok(_)) => {}
            Ok(Err(e)) => return Err(BridgeError::Navigation(format!("{url}: {e}"))),
            Err(_) => {
                return Err(BridgeError::Timeout {
                    waited_ms: timeout.as_millis() as u64,
                    what: format!("navigation to {url}"),
                })
            }
        }

        // Navigation and readiness share one budget.
        self.wait_for_load(load_state, time_left(deadline)).await
    }

    async fn wait_for_load(&mut self, load_state: LoadState, timeout: Duration) -> BridgeResult<()> {
        let deadline = Instant::now() + timeout;
        let what = format!("load state '{load_state}'");
        let this: &Self = self;
        poll_until(timeout, &what, || async move {
            let state = this.ready_state().await?;
            Ok::<_, BridgeError>(load_state.is_reached_by(&state))
        })
        .await?;

        if load_state == LoadState::NetworkIdle {
            tokio::time::sleep(NETWORK_IDLE_SETTLE.min(time_left(deadline))).await;
        }
        Ok(())
    }

    async fn current_url(&self) -> BridgeResult<String> {
        Ok(self.page.url().await?.unwrap_or_default())
    }

    async fn title(&self) -> BridgeResult<String> {
        Ok(self.page.get_title().await?.unwrap_or_default())
    }

    async fn content(&self) -> BridgeResult<String> {
        Ok(self.page.content().await?)
    }

    async fn inner_html(&self, selector: &str) -> BridgeResult<Option<String>> {
        let script = format!(
            "(function() {{ const el = document.querySelector({}); return el ? el.innerHTML : null; }})()",
            js_string(selector)
        );
        self.evaluate(script).await
    }

    async fn has_element(&self, selector: &str) -> BridgeResult<bool> {
        let script = format!("document.querySelector({}) !== null", js_string(selector));
        self.evaluate(script).await
    }

    async fn fill(&mut self, selector: &str, value: &str) -> BridgeResult<()> {
        self.pause().await;

        let script = format!(
            "(function() {{ \
                const el = document.querySelector({sel}); \
                if (!el) return false; \
                el.focus(); \
                el.value = {val}; \
                el.dispatchEvent(new Event('input', {{ bubbles: true }})); \
                el.dispatchEvent(new Event('change', {{ bubbles: true }})); \
                return true; \
            }})()",
            sel = js_string(selector),
            val = js_string(value),
        );

        let filled: bool = self.evaluate(script).await?;
        if !filled {
            return Err(BridgeError::ElementNotFound(selector.to_string()));
        }
        Ok(())
    }

    async fn click(&mut self, selector: &str) -> BridgeResult<()> {
        self.pause().await;

        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|e| BridgeError::ElementNotFound(format!("{selector} ({e})")))?;
        element.click().await?;
        Ok(())
    }

    async fn close(&mut self) -> BridgeResult<()> {
        let closed = self.browser.close().await;
        if let Err(e) = self.browser.wait().await {
            tracing::warn!("Browser process did not exit cleanly: {e}");
        }
        self.handler_task.abort();
        closed?;
        Ok(())
    }
}

//! Browser operations exposed to agents, implemented over any `BrowserDriver`.

use std::time::Duration;

use crate::chromium::ChromiumDriver;
use crate::driver::BrowserDriver;
use crate::extract::{html_to_markdown, metadata_header, truncate_content};
use crate::settings::BrowserSettings;
use crate::types::{BridgeError, BridgeResult, Credentials, PageStatus};
use crate::wait::poll_until;

/// One browser session: the driver, its settings and in-memory credentials.
pub struct BrowserClient {
    driver: Option<Box<dyn BrowserDriver>>,
    settings: BrowserSettings,
    credentials: Option<Credentials>,
}

impl BrowserClient {
    /// Wrap an already started driver.
    pub fn new(driver: Box<dyn BrowserDriver>, settings: BrowserSettings) -> Self {
        Self {
            driver: Some(driver),
            settings,
            credentials: None,
        }
    }

    /// Launch Chromium on the configured profile.
    pub async fn launch(settings: BrowserSettings) -> BridgeResult<Self> {
        let driver = ChromiumDriver::launch(&settings).await?;
        Ok(Self::new(Box::new(driver), settings))
    }

    pub fn settings(&self) -> &BrowserSettings {
        &self.settings
    }

    pub fn is_started(&self) -> bool {
        self.driver.is_some()
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    fn driver(&self) -> BridgeResult<&dyn BrowserDriver> {
        self.driver.as_deref().ok_or(BridgeError::NotStarted)
    }

    fn driver_mut(&mut self) -> BridgeResult<&mut Box<dyn BrowserDriver>> {
        self.driver.as_mut().ok_or(BridgeError::NotStarted)
    }

    /// Navigate to `url`, optionally wait for `wait_for`, return the final URL.
    pub async fn navigate_to(&mut self, url: &str, wait_for: Option<&str>) -> BridgeResult<String> {
        let load_state = self.settings.load_state;
        let nav_timeout = self.settings.navigation_timeout();
        let element_timeout = self.settings.element_timeout();

        tracing::info!("Navigating to {url}");
        self.driver_mut()?.goto(url, load_state, nav_timeout).await?;

        let driver = self.driver()?;
        if let Some(selector) = wait_for.filter(|s| !s.is_empty()) {
            tracing::info!("Waiting for selector: {selector}");
            wait_for_selector(driver, selector, element_timeout).await?;
        }

        let current_url = driver.current_url().await?;
        tracing::info!("Navigation complete. Current URL: {current_url}");
        Ok(current_url)
    }

    /// Extract the page, or the element matching `selector`, as Markdown.
    ///
    /// A selector that matches nothing is not an error: the returned text says
    /// so, letting the agent adjust its selector.
    pub async fn extract_content(
        &self,
        selector: Option<&str>,
        include_metadata: bool,
    ) -> BridgeResult<String> {
        let driver = self.driver()?;
        tracing::info!("Extracting content with selector: {selector:?}");

        let html = match selector.filter(|s| !s.is_empty()) {
            Some(selector) => match driver.inner_html(selector).await? {
                Some(html) => html,
                None => {
                    tracing::warn!("Selector not found: {selector}");
                    return Ok(format!("Error: Selector '{selector}' not found on page"));
                }
            },
            None => driver.content().await?,
        };

        let mut content = html_to_markdown(&html);

        if include_metadata {
            let title = driver.title().await?;
            let url = driver.current_url().await?;
            content.insert_str(0, &metadata_header(&title, &url));
        }

        let content = truncate_content(content, self.settings.max_content_length);
        tracing::info!("Content extracted: {} chars", content.chars().count());
        Ok(content)
    }

    /// Set each field in order, then optionally click `submit_button` and wait
    /// for load. Every element gets the element timeout to appear first.
    pub async fn fill_form(
        &mut self,
        fields: &[(String, String)],
        submit_button: Option<&str>,
    ) -> BridgeResult<()> {
        let load_state = self.settings.load_state;
        let nav_timeout = self.settings.navigation_timeout();
        let element_timeout = self.settings.element_timeout();
        let driver = self.driver_mut()?;

        tracing::info!("Filling form with {} fields", fields.len());
        for (selector, value) in fields {
            tracing::debug!("Filling {selector}");
            wait_for_selector(&**driver, selector, element_timeout).await?;
            driver.fill(selector, value).await?;
        }

        if let Some(button) = submit_button.filter(|s| !s.is_empty()) {
            tracing::info!("Clicking submit button: {button}");
            wait_for_selector(&**driver, button, element_timeout).await?;
            driver.click(button).await?;
            driver.wait_for_load(load_state, nav_timeout).await?;
        }

        tracing::info!("Form filled");
        Ok(())
    }

    /// Keep credentials in memory for the rest of the process lifetime.
    pub fn set_credentials(&mut self, username: &str, password: &str) {
        self.credentials = Some(Credentials {
            username: username.to_string(),
            password: password.to_string(),
        });
        tracing::info!("Credentials set for user: {username}");
    }

    /// Wait for the user to authenticate manually in the browser window.
    ///
    /// An indicator starting with `http` is matched as a URL substring, any
    /// other indicator as a selector. Without an indicator the full timeout is
    /// slept and success is reported, since nothing can be observed. Timeouts
    /// and failed checks yield `Ok(false)`.
    pub async fn wait_for_login(
        &self,
        timeout_seconds: u64,
        success_indicator: Option<&str>,
    ) -> BridgeResult<bool> {
        let driver = self.driver()?;
        let timeout = Duration::from_secs(timeout_seconds);

        tracing::warn!(
            "Manual login required: authenticate in the browser window (waiting up to {timeout_seconds}s)"
        );

        let outcome = match success_indicator.filter(|s| !s.is_empty()) {
            Some(indicator) if indicator.starts_with("http") => {
                tracing::info!("Waiting for URL containing: {indicator}");
                wait_for_url_containing(driver, indicator, timeout).await
            }
            Some(selector) => {
                tracing::info!("Waiting for selector: {selector}");
                wait_for_selector(driver, selector, timeout).await
            }
            None => {
                tracing::info!("No success indicator, waiting for the full timeout");
                tokio::time::sleep(timeout).await;
                Ok(())
            }
        };

        match outcome {
            Ok(()) => {
                tracing::info!("Login successful");
                Ok(true)
            }
            Err(e) if e.is_timeout() => {
                tracing::error!("Login timeout");
                Ok(false)
            }
            Err(e) => {
                tracing::error!("Login wait error: {e}");
                Ok(false)
            }
        }
    }

    /// Report URL, title and connection state. Never fails.
    pub async fn page_status(&self) -> PageStatus {
        let Some(driver) = self.driver.as_deref() else {
            return PageStatus::not_started();
        };

        let lookup = async {
            let url = driver.current_url().await?;
            let title = driver.title().await?;
            Ok::<_, BridgeError>((url, title))
        };

        match lookup.await {
            Ok((url, title)) => PageStatus::connected(url, title),
            Err(e) => {
                tracing::error!("Status check error: {e}");
                PageStatus::failed(e.to_string())
            }
        }
    }

    /// Tear down the driver. Later calls are no-ops.
    pub async fn close(&mut self) {
        if let Some(mut driver) = self.driver.take() {
            match driver.close().await {
                Ok(()) => tracing::info!("Browser closed"),
                Err(e) => tracing::error!("Error closing browser: {e}"),
            }
        }
    }
}

async fn wait_for_selector(
    driver: &dyn BrowserDriver,
    selector: &str,
    timeout: Duration,
) -> BridgeResult<()> {
    let what = format!("selector '{selector}'");
    poll_until(timeout, &what, move || driver.has_element(selector)).await
}

async fn wait_for_url_containing(
    driver: &dyn BrowserDriver,
    fragment: &str,
    timeout: Duration,
) -> BridgeResult<()> {
    let what = format!("URL containing '{fragment}'");
    poll_until(timeout, &what, move || async move {
        let url = driver.current_url().await?;
        Ok::<_, BridgeError>(url.contains(fragment))
    })
    .await
}

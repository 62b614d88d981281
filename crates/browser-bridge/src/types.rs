//! Core data types for browser sessions and page state.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Readiness condition applied after navigation and form submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadState {
    Load,
    #[serde(rename = "domcontentloaded")]
    DomContentLoaded,
    #[default]
    #[serde(rename = "networkidle")]
    NetworkIdle,
}

impl LoadState {
    /// Whether a `document.readyState` value satisfies this condition.
    pub fn is_reached_by(&self, ready_state: &str) -> bool {
        match self {
            LoadState::DomContentLoaded => matches!(ready_state, "interactive" | "complete"),
            LoadState::Load | LoadState::NetworkIdle => ready_state == "complete",
        }
    }
}

impl fmt::Display for LoadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadState::Load => write!(f, "load"),
            LoadState::DomContentLoaded => write!(f, "domcontentloaded"),
            LoadState::NetworkIdle => write!(f, "networkidle"),
        }
    }
}

impl FromStr for LoadState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "load" => Ok(LoadState::Load),
            "domcontentloaded" => Ok(LoadState::DomContentLoaded),
            "networkidle" => Ok(LoadState::NetworkIdle),
            other => Err(format!(
                "unknown load state '{other}' (expected load, domcontentloaded or networkidle)"
            )),
        }
    }
}

/// Connection state reported by `get_page_status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageState {
    NotStarted,
    Connected,
    Error,
}

/// Snapshot of the current page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageStatus {
    pub status: PageState,
    pub url: Option<String>,
    pub title: Option<String>,
    pub error: Option<String>,
}

impl PageStatus {
    pub fn not_started() -> Self {
        Self {
            status: PageState::NotStarted,
            url: None,
            title: None,
            error: Some("Browser not started".to_string()),
        }
    }

    pub fn connected(url: String, title: String) -> Self {
        Self {
            status: PageState::Connected,
            url: Some(url),
            title: Some(title),
            error: None,
        }
    }

    pub fn failed(error: String) -> Self {
        Self {
            status: PageState::Error,
            url: None,
            title: None,
            error: Some(error),
        }
    }
}

/// Username/password pair held in process memory.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Errors that can occur while driving the browser.
#[derive(thiserror::Error, Debug)]
pub enum BridgeError {
    #[error("Failed to launch browser: {0}")]
    Launch(String),

    #[error("Browser not started")]
    NotStarted,

    #[error("Navigation failed: {0}")]
    Navigation(String),

    #[error("Timed out after {waited_ms}ms waiting for {what}")]
    Timeout { waited_ms: u64, what: String },

    #[error("Element not found: {0}")]
    ElementNotFound(String),

    #[error("Script error: {0}")]
    Script(String),

    #[error("CDP error: {0}")]
    Cdp(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl BridgeError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, BridgeError::Timeout { .. })
    }
}

impl From<chromiumoxide::error::CdpError> for BridgeError {
    fn from(e: chromiumoxide::error::CdpError) -> Self {
        BridgeError::Cdp(e.to_string())
    }
}

pub type BridgeResult<T> = Result<T, BridgeError>;

//! Browser launch and extraction settings.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::types::LoadState;

pub const DEFAULT_SLOW_MO_MS: u64 = 100;
pub const DEFAULT_NAVIGATION_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_ELEMENT_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_MAX_CONTENT_LENGTH: usize = 1_000_000;

/// Extra Chromium flags passed on every launch.
pub const DEFAULT_ARGS: &[&str] = &[
    "--disable-blink-features=AutomationControlled",
    "--disable-dev-shm-usage",
    "--no-sandbox",
];

/// Everything the browser layer needs to launch and operate a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserSettings {
    /// Persistent user-data directory (cookies, local storage, logins).
    pub profile_dir: PathBuf,
    /// Explicit Chromium executable. `None` lets the engine locate one.
    pub executable: Option<PathBuf>,
    /// Run without a visible window. Manual logins need a headed browser.
    pub headless: bool,
    /// Delay inserted before each page interaction.
    pub slow_mo_ms: u64,
    pub args: Vec<String>,
    pub navigation_timeout_ms: u64,
    pub element_timeout_ms: u64,
    pub load_state: LoadState,
    /// Maximum extracted content length, in characters.
    pub max_content_length: usize,
}

impl BrowserSettings {
    pub fn new(profile_dir: impl Into<PathBuf>) -> Self {
        Self {
            profile_dir: profile_dir.into(),
            ..Self::default()
        }
    }

    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }

    pub fn element_timeout(&self) -> Duration {
        Duration::from_millis(self.element_timeout_ms)
    }

    pub fn slow_mo(&self) -> Duration {
        Duration::from_millis(self.slow_mo_ms)
    }
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            profile_dir: PathBuf::from("chrome_profile"),
            executable: None,
            headless: false,
            slow_mo_ms: DEFAULT_SLOW_MO_MS,
            args: DEFAULT_ARGS.iter().map(|a| a.to_string()).collect(),
            navigation_timeout_ms: DEFAULT_NAVIGATION_TIMEOUT_MS,
            element_timeout_ms: DEFAULT_ELEMENT_TIMEOUT_MS,
            load_state: LoadState::NetworkIdle,
            max_content_length: DEFAULT_MAX_CONTENT_LENGTH,
        }
    }
}

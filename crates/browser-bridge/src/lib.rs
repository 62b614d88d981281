//! browser-bridge: persistent browser sessions for AI agents: navigation,
//! Markdown extraction, form filling and manual-login waits.

pub mod chromium;
pub mod client;
pub mod driver;
pub mod extract;
pub mod settings;
pub mod types;
pub mod wait;

pub use chromium::{find_chromium, ChromiumDriver};
pub use client::BrowserClient;
pub use driver::BrowserDriver;
pub use extract::{html_to_markdown, truncate_content, TRUNCATION_MARKER};
pub use settings::BrowserSettings;
pub use types::*;

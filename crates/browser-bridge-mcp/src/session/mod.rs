//! Browser session management.

pub mod manager;

pub use manager::BrowserSessionManager;

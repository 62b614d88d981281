//! browser-bridge MCP server: persistent browser control for AI agents over stdio.

pub mod config;
pub mod protocol;
pub mod session;
pub mod tools;
pub mod transport;
pub mod types;

pub use config::{resolve_log_file, resolve_profile_dir, BrowserOptions};
pub use protocol::ProtocolHandler;
pub use session::BrowserSessionManager;
pub use transport::StdioTransport;

//! MCP tool implementations.

pub mod extract_content;
pub mod fill_form;
pub mod get_page_status;
pub mod navigate_to;
pub mod registry;
pub mod set_credentials;
pub mod wait_for_login;

pub use registry::ToolRegistry;

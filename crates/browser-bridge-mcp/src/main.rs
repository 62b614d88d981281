//! browser-bridge MCP server: entry point.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use browser_bridge::LoadState;
use browser_bridge_mcp::config::{resolve_log_file, BrowserOptions};
use browser_bridge_mcp::protocol::ProtocolHandler;
use browser_bridge_mcp::session::BrowserSessionManager;
use browser_bridge_mcp::tools::ToolRegistry;
use browser_bridge_mcp::transport::StdioTransport;
use browser_bridge_mcp::types::{InitializeResult, ToolListResult, SERVER_NAME, SERVER_VERSION};

#[derive(Parser)]
#[command(
    name = "browser-bridge-mcp",
    about = "MCP server for browser-bridge: persistent browser control for AI agents",
    version
)]
struct Cli {
    /// Chromium profile directory (cookies and logins persist here).
    #[arg(long, global = true)]
    profile: Option<PathBuf>,

    /// Path to the Chromium/Chrome executable.
    #[arg(long, global = true)]
    chrome: Option<PathBuf>,

    /// Run the browser without a window. Manual logins need a visible browser.
    #[arg(long, global = true)]
    headless: bool,

    /// Delay before each page interaction, in milliseconds.
    #[arg(long, global = true)]
    slow_mo_ms: Option<u64>,

    /// Navigation and page-load timeout, in milliseconds.
    #[arg(long, global = true)]
    nav_timeout_ms: Option<u64>,

    /// Timeout for `wait_for` selectors, in milliseconds.
    #[arg(long, global = true)]
    element_timeout_ms: Option<u64>,

    /// Readiness condition after navigation (load, domcontentloaded, networkidle).
    #[arg(long, global = true)]
    load_state: Option<LoadState>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Append logs to this file instead of stderr.
    /// Also reads from BROWSER_BRIDGE_LOG_FILE.
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start MCP server over stdio (default).
    Serve,

    /// Print server capabilities and resolved settings as JSON.
    Info,

    /// Print the tool catalog as JSON.
    Tools,

    /// Generate shell completion scripts.
    ///
    /// Examples:
    ///   browser-bridge-mcp completions bash > ~/.local/share/bash-completion/completions/browser-bridge-mcp
    ///   browser-bridge-mcp completions zsh > ~/.zfunc/_browser-bridge-mcp
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

impl Cli {
    fn browser_options(&self) -> BrowserOptions {
        BrowserOptions {
            profile: self.profile.clone(),
            chrome: self.chrome.clone(),
            headless: self.headless,
            slow_mo_ms: self.slow_mo_ms,
            nav_timeout_ms: self.nav_timeout_ms,
            element_timeout_ms: self.element_timeout_ms,
            load_state: self.load_state,
        }
    }
}

fn init_tracing(log_level: &str, log_file: Option<&Path>) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    match log_file {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create log directory {}", parent.display()))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::sync::Mutex::new(file))
                .with_ansi(false)
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_file = resolve_log_file(cli.log_file.as_deref());
    init_tracing(&cli.log_level, log_file.as_deref())?;

    match cli.command.as_ref().unwrap_or(&Commands::Serve) {
        Commands::Serve => {
            let settings = cli.browser_options().into_settings();
            tracing::info!("Starting browser-bridge MCP server");
            tracing::info!("Profile: {}", settings.profile_dir.display());

            let session = BrowserSessionManager::start(settings)
                .await
                .context("Failed to start browser")?;
            let session = Arc::new(Mutex::new(session));
            let handler = ProtocolHandler::new(session);
            let transport = StdioTransport::new(handler);

            let interrupted = tokio::select! {
                result = transport.run() => {
                    result?;
                    false
                }
                _ = tokio::signal::ctrl_c() => true,
            };

            if interrupted {
                tracing::info!("Interrupted, shutting down");
                transport.handler().finish().await;
            }
            tracing::info!("Server stopped");
        }

        Commands::Info => {
            let settings = cli.browser_options().into_settings();
            let tools = ToolRegistry::list_tools();
            let info = serde_json::json!({
                "server": { "name": SERVER_NAME, "version": SERVER_VERSION },
                "capabilities": InitializeResult::default_result().capabilities,
                "tools": tools.iter().map(|t| &t.name).collect::<Vec<_>>(),
                "tool_count": tools.len(),
                "settings": settings,
            });
            println!("{}", serde_json::to_string_pretty(&info)?);
        }

        Commands::Tools => {
            let catalog = ToolListResult {
                tools: ToolRegistry::list_tools(),
            };
            println!("{}", serde_json::to_string_pretty(&catalog)?);
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(
                *shell,
                &mut cmd,
                "browser-bridge-mcp",
                &mut std::io::stdout(),
            );
        }
    }

    Ok(())
}

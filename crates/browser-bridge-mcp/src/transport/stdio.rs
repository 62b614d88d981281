//! Stdio transport: reads JSON-RPC from stdin, writes to stdout.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::protocol::ProtocolHandler;
use crate::types::{McpError, McpResult};

use super::framing;

/// Stdio transport for desktop MCP clients.
pub struct StdioTransport {
    handler: ProtocolHandler,
}

impl StdioTransport {
    pub fn new(handler: ProtocolHandler) -> Self {
        Self { handler }
    }

    pub fn handler(&self) -> &ProtocolHandler {
        &self.handler
    }

    /// Run the transport loop: reads from stdin, writes to stdout.
    pub async fn run(&self) -> McpResult<()> {
        let stdin = BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        self.serve(stdin, stdout).await
    }

    /// Serve requests from `reader` until EOF or `shutdown`, one reply line
    /// per request. The browser is torn down on every exit path.
    pub async fn serve<R, W>(&self, reader: R, writer: W) -> McpResult<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        tracing::info!("Stdio transport started");
        let result = self.serve_lines(reader, writer).await;
        if let Err(e) = &result {
            tracing::error!("Transport error: {e}");
        }
        self.handler.finish().await;
        tracing::info!("Stdio transport stopped");
        result
    }

    async fn serve_lines<R, W>(&self, mut reader: R, mut writer: W) -> McpResult<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut line = String::new();

        while self.handler.is_running() {
            line.clear();
            let bytes_read = reader.read_line(&mut line).await.map_err(McpError::Io)?;

            if bytes_read == 0 {
                tracing::info!("EOF on stdin, shutting down");
                break;
            }

            let reply = self.handler.handle_line(&line).await;

            let framed = framing::frame_message(&reply)?;
            writer
                .write_all(framed.as_bytes())
                .await
                .map_err(McpError::Io)?;
            writer.flush().await.map_err(McpError::Io)?;
        }

        Ok(())
    }
}

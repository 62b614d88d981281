//! Browser session lifecycle: startup, the single client handle, teardown.

use browser_bridge::{BrowserClient, BrowserSettings};

use crate::types::McpResult;

/// Owns the one browser session the server drives.
pub struct BrowserSessionManager {
    client: BrowserClient,
    closed: bool,
}

impl BrowserSessionManager {
    /// Launch the browser. Failure here is fatal for the server.
    pub async fn start(settings: BrowserSettings) -> McpResult<Self> {
        tracing::info!("Starting browser session");
        let client = BrowserClient::launch(settings).await?;
        Ok(Self::from_client(client))
    }

    /// Adopt an already started client.
    pub fn from_client(client: BrowserClient) -> Self {
        Self {
            client,
            closed: false,
        }
    }

    pub fn client(&self) -> &BrowserClient {
        &self.client
    }

    pub fn client_mut(&mut self) -> &mut BrowserClient {
        &mut self.client
    }

    /// Tear the browser down. Only the first call has any effect.
    pub async fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        tracing::info!("Cleaning up browser session");
        self.client.close().await;
    }
}

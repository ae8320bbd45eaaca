//! Transport service - runs the configured transport and owns its shutdown.
//!
//! Listener transports (TCP, HTTP) stop accepting once the service's
//! [`ShutdownHandle`] fires. [`TransportService::run`] wires that handle to
//! Ctrl-C; callers can also fire it themselves. STDIO ends when stdin closes
//! and keeps the default Ctrl-C behaviour.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::info;

use super::{TransportConfig, TransportResult};
use crate::core::McpServer;

#[cfg(feature = "stdio")]
use super::stdio::StdioTransport;

#[cfg(feature = "tcp")]
use super::tcp::TcpTransport;

#[cfg(feature = "http")]
use super::http::HttpTransport;

/// Fires shutdown for a running [`TransportService`].
#[derive(Clone)]
pub struct ShutdownHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl ShutdownHandle {
    fn new() -> Self {
        let (tx, _) = watch::channel(false);
        Self { tx: Arc::new(tx) }
    }

    /// Ask the transport to stop. Idempotent.
    pub fn trigger(&self) {
        self.tx.send_replace(true);
    }

    /// Whether shutdown has been requested.
    pub fn is_triggered(&self) -> bool {
        *self.tx.borrow()
    }

    /// A future-side view of this handle.
    pub fn subscribe(&self) -> Shutdown {
        Shutdown {
            rx: self.tx.subscribe(),
        }
    }
}

/// Resolves once the matching [`ShutdownHandle`] fires.
pub struct Shutdown {
    rx: watch::Receiver<bool>,
}

impl Shutdown {
    /// Wait for shutdown. Returns at once if it was already requested.
    pub async fn wait(mut self) {
        let fired = self.rx.wait_for(|stopped| *stopped).await.is_ok();
        if !fired {
            // Every handle is gone, so nothing can fire any more.
            std::future::pending::<()>().await;
        }
    }
}

/// Transport service - manages the transport layer for the MCP server.
pub struct TransportService {
    config: TransportConfig,
    shutdown: ShutdownHandle,
}

impl TransportService {
    /// Create a new transport service with the given configuration.
    pub fn new(config: TransportConfig) -> Self {
        Self {
            config,
            shutdown: ShutdownHandle::new(),
        }
    }

    /// Get the transport configuration.
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Handle that stops the transport once [`run`](Self::run) is going.
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        self.shutdown.clone()
    }

    /// Start the transport with the given MCP server.
    ///
    /// This method blocks until the transport is shut down.
    pub async fn run(self, server: McpServer) -> TransportResult<()> {
        info!("Starting transport: {}", self.config.description());

        match self.config {
            #[cfg(feature = "stdio")]
            TransportConfig::Stdio => StdioTransport::run(server).await,
            #[cfg(feature = "tcp")]
            TransportConfig::Tcp(cfg) => {
                let shutdown = on_ctrl_c(self.shutdown);
                TcpTransport::new(cfg).run(server, shutdown).await
            }
            #[cfg(feature = "http")]
            TransportConfig::Http(cfg) => {
                let shutdown = on_ctrl_c(self.shutdown);
                HttpTransport::new(cfg).run(server, shutdown).await
            }
        }
    }
}

/// Fire `handle` on Ctrl-C and return the matching [`Shutdown`].
#[cfg(any(feature = "tcp", feature = "http"))]
fn on_ctrl_c(handle: ShutdownHandle) -> Shutdown {
    let shutdown = handle.subscribe();
    tokio::spawn(async move {
        super::shutdown_signal().await;
        handle.trigger();
    });
    shutdown
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_wait_returns_after_trigger() {
        let handle = ShutdownHandle::new();
        let shutdown = handle.subscribe();
        assert!(!handle.is_triggered());

        handle.trigger();
        assert!(handle.is_triggered());
        tokio::time::timeout(Duration::from_secs(1), shutdown.wait())
            .await
            .expect("shutdown observed");
    }

    #[tokio::test]
    async fn test_late_subscriber_sees_earlier_trigger() {
        let handle = ShutdownHandle::new();
        handle.trigger();

        tokio::time::timeout(Duration::from_secs(1), handle.subscribe().wait())
            .await
            .expect("shutdown observed");
    }

    #[tokio::test]
    async fn test_wait_pends_without_trigger() {
        let handle = ShutdownHandle::new();
        let waited = tokio::time::timeout(Duration::from_millis(50), handle.subscribe().wait()).await;
        assert!(waited.is_err());
    }

    #[cfg(feature = "http")]
    #[tokio::test]
    async fn test_http_transport_stops_on_shutdown() {
        use crate::core::config::Config;
        use crate::core::transport::HttpConfig;
        use crate::domains::tools::testing::test_context;

        let service = TransportService::new(TransportConfig::Http(HttpConfig {
            port: 0,
            host: "127.0.0.1".to_string(),
            ..Default::default()
        }));
        let handle = service.shutdown_handle();
        let server = McpServer::new(Config::default(), test_context()).unwrap();

        let running = tokio::spawn(service.run(server));
        handle.trigger();

        let result = tokio::time::timeout(Duration::from_secs(5), running)
            .await
            .expect("transport stopped")
            .unwrap();
        assert!(result.is_ok());
    }
}

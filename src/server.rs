//! HTTP server.
//!
//! Binds the listener and serves the gateway router until Ctrl-C (or SIGTERM
//! on Unix), then closes the database.

use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use crate::config::Config;
use crate::db::DatabaseClient;
use crate::error::{GatewayError, Result};
use crate::gateway::{self, GatewayState};

/// HTTP server for the gateway.
pub struct Server {
    addr: String,
    db: Arc<dyn DatabaseClient>,
    router: Router,
}

impl Server {
    /// Creates a server bound to the configured address and database.
    pub fn new(config: &Config, db: Arc<dyn DatabaseClient>) -> Self {
        let state = Arc::new(GatewayState::new(
            db.clone(),
            &config.server.service,
            config.database.display_name(),
        ));

        Self {
            addr: config.server.socket_addr(),
            db,
            router: gateway::router(state),
        }
    }

    /// Get the socket address
    pub fn socket_addr(&self) -> &str {
        &self.addr
    }

    /// Serves requests until a shutdown signal arrives.
    pub async fn run(self) -> Result<()> {
        let listener = TcpListener::bind(self.addr.as_str())
            .await
            .map_err(|e| GatewayError::internal(format!("Failed to bind {}: {e}", self.addr)))?;

        match listener.local_addr() {
            Ok(addr) => info!("Listening on http://{}", addr),
            Err(_) => info!("Listening on http://{}", self.addr),
        }
        info!("Endpoints: GET /health, POST /query, POST /batch");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| GatewayError::internal(format!("Server error: {e}")))?;

        info!("Shutting down, closing database");
        self.db.close().await
    }
}

/// Resolves when Ctrl-C or SIGTERM is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

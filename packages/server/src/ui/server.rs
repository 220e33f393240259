//! Server execution logic.

use std::sync::Arc;

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::usecase::RelayHandle;

use super::{
    handler::{get_presence, health_check, root, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// WebSocket chat relay server
///
/// This struct encapsulates the server configuration and provides methods to run the server.
///
/// # Example
///
/// ```ignore
/// let (relay, _task) = Relay::new(repository, message_pusher, clock).spawn();
/// let server = Server::new(relay);
/// server.run("0.0.0.0".to_string(), 3001).await?;
/// ```
pub struct Server {
    /// Handle to the running relay
    relay: RelayHandle,
}

impl Server {
    /// Create a new Server instance
    ///
    /// # Arguments
    ///
    /// * `relay` - Handle to the relay task that processes every connection's events
    pub fn new(relay: RelayHandle) -> Self {
        Self { relay }
    }

    /// Build the router with all endpoints.
    ///
    /// Cross-origin access is permissive: there is no authentication layer to protect.
    pub fn router(&self) -> Router {
        let app_state = Arc::new(AppState {
            relay: self.relay.clone(),
        });

        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/", get(root))
            .route("/api/health", get(health_check))
            .route("/api/presence", get(get_presence))
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
            .with_state(app_state)
    }

    /// Run the WebSocket chat relay server
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "0.0.0.0")
    /// * `port` - The port number to bind to (e.g., 3001)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        // Bind the server to the host and port
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;

        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener).await
    }

    /// Serve on an already-bound listener until a shutdown signal arrives
    pub async fn serve(self, listener: TcpListener) -> Result<(), Box<dyn std::error::Error>> {
        let app = self.router();

        tracing::info!(
            "WebSocket chat relay listening on {}",
            listener.local_addr()?
        );

        // Set up graceful shutdown signal handler
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }
}

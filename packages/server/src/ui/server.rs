//! Server execution logic.

use std::{sync::Arc, time::Duration};

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

use crate::usecase::SweepExpiredGamesUseCase;

use super::{
    handler::{health_check, list_games, websocket_handler},
    signal::shutdown_signal,
    state::AppState,
};

/// Doodle Duel game server
///
/// Serves the WebSocket game endpoint and the HTTP API, and runs the
/// background sweep of expired games.
///
/// # Example
///
/// ```ignore
/// let state = AppState::new(&config, classifier, clock);
/// let server = Server::new(state, Duration::from_secs(config.sweep_interval_secs));
/// server.run("127.0.0.1".to_string(), 8080).await?;
/// ```
pub struct Server {
    app_state: Arc<AppState>,
    /// Interval of the expired game sweep
    sweep_interval: Duration,
}

impl Server {
    /// Create a new Server instance
    ///
    /// # Arguments
    ///
    /// * `app_state` - Wired usecases shared by every handler
    /// * `sweep_interval` - How often expired games are removed
    pub fn new(app_state: AppState, sweep_interval: Duration) -> Self {
        Self {
            app_state: Arc::new(app_state),
            sweep_interval,
        }
    }

    /// Build the router with every endpoint
    pub fn router(&self) -> Router {
        Router::new()
            // WebSocket エンドポイント
            .route("/ws", get(websocket_handler))
            // HTTP エンドポイント
            .route("/api/health", get(health_check))
            .route("/api/games", get(list_games))
            .layer(TraceLayer::new_for_http())
            .with_state(self.app_state.clone())
    }

    /// Run the game server
    ///
    /// # Arguments
    ///
    /// * `host` - The host address to bind to (e.g., "127.0.0.1")
    /// * `port` - The port number to bind to (e.g., 8080)
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address or
    /// if there's an error during server execution.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        // Bind the server to the host and port
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;

        tracing::info!("Game server listening on {}", listener.local_addr()?);
        tracing::info!("Connect to: ws://{}/ws", bind_addr);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener).await?;

        tracing::info!("Server shutdown complete");

        Ok(())
    }

    /// Serve on an already bound listener until a shutdown signal arrives
    pub async fn serve(self, listener: TcpListener) -> std::io::Result<()> {
        let app = self.router();
        let sweeper = spawn_sweeper(
            self.app_state.sweep_expired_games_usecase.clone(),
            self.sweep_interval,
        );

        let result = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await;

        sweeper.abort();
        result
    }
}

/// Periodically removes games older than their time to live.
fn spawn_sweeper(
    usecase: Arc<SweepExpiredGamesUseCase>,
    interval: Duration,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        // The first tick completes immediately.
        ticker.tick().await;
        loop {
            ticker.tick().await;
            usecase.execute().await;
        }
    })
}

//! HTTP server for the document gateway

pub mod routes;
pub mod state;

use axum::{routing::get, Router};
use std::net::SocketAddr;
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::Settings;
use crate::error::{Error, Result};
use state::AppState;

/// Document gateway HTTP server
pub struct ApiServer {
    settings: Settings,
    state: AppState,
}

impl ApiServer {
    /// Create a server wired to real Elasticsearch clients
    pub fn new(settings: Settings) -> Result<Self> {
        let state = AppState::new(settings.clone())?;
        Ok(Self { settings, state })
    }

    /// Create a server around existing state (tests build routers this way)
    pub fn with_state(settings: Settings, state: AppState) -> Self {
        Self { settings, state }
    }

    /// Build the router with all routes
    pub fn build_router(&self) -> Router {
        let mut router = Router::new()
            // Health check
            .route("/health", get(health_check))
            .merge(routes::api_routes(self.settings.server.max_upload_size))
            .with_state(self.state.clone())
            // Middleware layers (order matters - applied bottom to top)
            .layer(TraceLayer::new_for_http())
            .layer(CompressionLayer::new());

        if self.settings.server.enable_cors {
            let cors = CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any);
            router = router.layer(cors);
        }

        router
    }

    /// Start the server
    pub async fn start(self) -> Result<()> {
        let addr: SocketAddr = format!("{}:{}", self.settings.server.host, self.settings.server.port)
            .parse()
            .map_err(|e| Error::Config(format!("Invalid address: {}", e)))?;

        let router = self.build_router();

        tracing::info!("Starting document gateway on http://{}", addr);

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| Error::Config(format!("Failed to bind: {}", e)))?;

        axum::serve(listener, router)
            .await
            .map_err(|e| Error::Internal(format!("Server error: {}", e)))?;

        Ok(())
    }

    /// Get the server address
    pub fn address(&self) -> String {
        format!("{}:{}", self.settings.server.host, self.settings.server.port)
    }
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

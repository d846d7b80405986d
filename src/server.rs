//! HTTP endpoint serving freshly generated datasets

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tower_http::trace::TraceLayer;

use crate::categories::CategoryRegistry;
use crate::config::ServerConfig;
use crate::error::Result;
use crate::types::GraphData;

/// Shared state handed to every request
#[derive(Clone)]
pub struct AppState {
    registry: Arc<CategoryRegistry>,
    config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(registry: CategoryRegistry, config: ServerConfig) -> Self {
        Self {
            registry: Arc::new(registry),
            config: Arc::new(config),
        }
    }

    /// Generate one snapshot with the configured size and seed
    pub fn generate(&self) -> Result<GraphData> {
        let generation = &self.config.generation;
        let mut rng = generation.rng();
        GraphData::generate(&self.registry, generation, &mut rng)
    }
}

/// HTTP server for `/api/events`
pub struct ApiServer {
    state: AppState,
    addr: SocketAddr,
}

impl ApiServer {
    pub fn new(registry: CategoryRegistry, config: ServerConfig) -> Self {
        let addr = config.addr();
        Self {
            state: AppState::new(registry, config),
            addr,
        }
    }

    /// Build the router
    pub fn router(state: AppState) -> Router {
        Router::new()
            .route("/api/events", get(events_handler))
            .route("/health", get(health_handler))
            .layer(TraceLayer::new_for_http())
            .with_state(state)
    }

    /// Start the server
    pub async fn start(self) -> std::io::Result<()> {
        let app = Self::router(self.state);

        tracing::info!("CauseMap API listening on {}", self.addr);

        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}

/// Health check endpoint
async fn health_handler() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// A new `{nodes, links}` snapshot per request
async fn events_handler(State(state): State<AppState>) -> Response {
    match state.generate() {
        Ok(graph) => {
            tracing::debug!(
                "Serving {} events and {} links",
                graph.nodes.len(),
                graph.links.len()
            );
            (StatusCode::OK, Json(graph)).into_response()
        }
        Err(e) => {
            tracing::error!("Failed to generate events: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to generate events" })),
            )
                .into_response()
        }
    }
}

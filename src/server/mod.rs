//! HTTP surface: direct search endpoints plus the MCP transports.

pub mod routes;
pub mod sse;

use crate::agent::McpHandler;
use crate::search::EventAggregator;
use anyhow::{Context, Result};
use axum::{
    routing::{get, post},
    Router,
};
use sse::SessionRegistry;
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::info;

/// State shared across all routes.
#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<EventAggregator>,
    pub mcp: Arc<McpHandler>,
    pub sessions: SessionRegistry,
}

impl AppState {
    pub fn new(aggregator: EventAggregator) -> Self {
        let aggregator = Arc::new(aggregator);
        Self {
            mcp: Arc::new(McpHandler::new(aggregator.clone())),
            aggregator,
            sessions: SessionRegistry::default(),
        }
    }
}

/// Build the application router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(routes::root))
        .route("/health", get(routes::health))
        .route("/test-events", get(routes::test_events))
        .route("/events", get(routes::events))
        .route("/mcp", post(routes::mcp))
        .route("/sse", get(routes::sse))
        .route(routes::MESSAGES_PATH, post(routes::messages))
        .fallback(routes::not_found)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Bind and serve until the process is stopped.
pub async fn serve(addr: &str, state: AppState) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Listening on {}", addr);
    info!("MCP endpoints: POST /mcp, GET /sse");

    axum::serve(listener, build_router(state))
        .await
        .context("Server error")?;

    Ok(())
}

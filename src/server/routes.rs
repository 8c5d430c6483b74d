//! Route handlers for the search endpoints and the MCP transports.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{sse::KeepAlive, IntoResponse, Response, Sse},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use uuid::Uuid;

use super::AppState;
use crate::agent::json_rpc::{JsonRpcRequest, JsonRpcResponse, INVALID_REQUEST, PARSE_ERROR};
use crate::error::ServerError;
use crate::models::{Record, SearchRequest, SearchResponse};

pub const MESSAGES_PATH: &str = "/messages";

#[derive(Serialize)]
pub struct StatusResponse {
    status: &'static str,
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    eventbrite_enabled: bool,
}

/// Query parameters for the search endpoints.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub city: String,
    pub genre: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl From<SearchQuery> for SearchRequest {
    fn from(query: SearchQuery) -> Self {
        SearchRequest::new(query.city, query.genre, query.start_date, query.end_date)
    }
}

#[derive(Debug, Deserialize)]
pub struct SessionQuery {
    pub session_id: Uuid,
}

/// GET / - liveness banner
pub async fn root() -> Json<StatusResponse> {
    Json(StatusResponse {
        status: "FestivalRadar online!",
    })
}

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        eventbrite_enabled: state.aggregator.eventbrite_enabled(),
    })
}

/// GET /test-events - flat ordered list of events and error notices
pub async fn test_events(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Json<Vec<Record>> {
    let response = state.aggregator.search(&query.into()).await;
    Json(response.records())
}

/// GET /events - per-provider tagged results
pub async fn events(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Json<SearchResponse> {
    Json(state.aggregator.search(&query.into()).await)
}

/// POST /mcp - request/response JSON-RPC
pub async fn mcp(State(state): State<AppState>, body: String) -> Response {
    let request = match decode_request(body) {
        Ok(request) => request,
        Err(response) => return (StatusCode::BAD_REQUEST, Json(response)).into_response(),
    };

    match state.mcp.handle(request).await {
        Some(response) => Json(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

/// GET /sse - open a streaming MCP session
pub async fn sse(State(state): State<AppState>) -> Result<impl IntoResponse, ServerError> {
    let (_id, stream) = state.sessions.open(MESSAGES_PATH)?;

    Ok(Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    ))
}

/// POST /messages?session_id= - request for a streaming session
///
/// The response is delivered on the session's event stream.
pub async fn messages(
    State(state): State<AppState>,
    Query(query): Query<SessionQuery>,
    body: String,
) -> Result<StatusCode, ServerError> {
    if !state.sessions.contains(query.session_id) {
        return Err(ServerError::SessionNotFound(query.session_id.to_string()));
    }

    let response = match decode_request(body) {
        Ok(request) => state.mcp.handle(request).await,
        Err(response) => Some(response),
    };

    if let Some(response) = response {
        state.sessions.send(query.session_id, response).await?;
    }

    Ok(StatusCode::ACCEPTED)
}

fn decode_request(body: String) -> Result<JsonRpcRequest, JsonRpcResponse> {
    let value: Value = serde_json::from_str(&body)
        .map_err(|e| JsonRpcResponse::error(None, PARSE_ERROR, format!("Parse error: {}", e)))?;

    serde_json::from_value(value).map_err(|e| {
        JsonRpcResponse::error(None, INVALID_REQUEST, format!("Invalid request: {}", e))
    })
}

/// Fallback for unknown routes.
pub async fn not_found() -> (StatusCode, Json<Value>) {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" })))
}

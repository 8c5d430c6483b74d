//! Upstream event providers.
//!
//! Each provider client builds its query, calls the remote API once (first
//! page only) and maps the response into [`NormalizedEvent`]s.
//!
//! [`NormalizedEvent`]: crate::models::NormalizedEvent

pub mod eventbrite;
pub mod normalize;
pub mod ticketmaster;

pub use eventbrite::EventbriteClient;
pub use ticketmaster::TicketmasterClient;

use crate::error::ProviderError;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Build an HTTP client with the given per-request timeout.
fn http_client(timeout_seconds: u64) -> Result<reqwest::Client, ProviderError> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .user_agent(concat!("festivalradar/", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

/// Send a prepared request and parse the body as JSON.
///
/// Non-2xx statuses and unparseable bodies are errors.
async fn fetch_json(
    request: reqwest::RequestBuilder,
    base_url: &str,
    timeout_seconds: u64,
) -> Result<Value, ProviderError> {
    let response = request
        .send()
        .await
        .map_err(|e| ProviderError::from_transport(e, base_url, timeout_seconds))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| ProviderError::from_transport(e, base_url, timeout_seconds))?;

    if !status.is_success() {
        return Err(ProviderError::Status { status, body });
    }

    debug!("Received {} bytes from {}", body.len(), base_url);

    serde_json::from_str(&body).map_err(|e| ProviderError::Decode(e.to_string()))
}

/// Pull the event array out of a response body.
///
/// A missing container means no results; anything that is present but not
/// an array is a shape error.
fn event_array<'a>(body: &'a Value, pointer: &str) -> Result<&'a [Value], ProviderError> {
    match body.pointer(pointer) {
        None | Some(Value::Null) => Ok(&[][..]),
        Some(Value::Array(events)) => Ok(events.as_slice()),
        Some(_) => Err(ProviderError::UnexpectedShape("events is not an array")),
    }
}

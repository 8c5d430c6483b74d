//! Streaming MCP transport over server-sent events.
//!
//! A client opens `GET /sse` and receives an `endpoint` event naming its
//! private POST URL. Requests POSTed there are answered on the stream as
//! `message` events.

use crate::agent::json_rpc::JsonRpcResponse;
use crate::error::ServerError;
use axum::response::sse::Event;
use futures::stream::{self, Stream, StreamExt};
use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;
use tracing::{debug, info};
use uuid::Uuid;

const CHANNEL_CAPACITY: usize = 32;

/// Open SSE sessions, keyed by session id.
#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<Mutex<HashMap<Uuid, mpsc::Sender<JsonRpcResponse>>>>,
}

impl SessionRegistry {
    /// Register a new session and return its id with the event stream.
    ///
    /// The session is removed once the stream is dropped.
    pub fn open(
        &self,
        messages_path: &str,
    ) -> Result<(Uuid, impl Stream<Item = Result<Event, Infallible>>), ServerError> {
        let id = Uuid::new_v4();
        let (tx, rx) = mpsc::channel(CHANNEL_CAPACITY);

        self.sessions
            .lock()
            .map_err(|e| ServerError::Internal(e.to_string()))?
            .insert(id, tx);
        info!(session_id = %id, "MCP session opened");

        let guard = SessionGuard {
            id,
            registry: self.clone(),
        };

        let endpoint = Event::default()
            .event("endpoint")
            .data(format!("{}?session_id={}", messages_path, id));

        let messages = stream::unfold((rx, guard), |(mut rx, guard)| async move {
            let response = rx.recv().await?;
            let data = serde_json::to_string(&response).unwrap_or_default();
            Some((Ok(Event::default().event("message").data(data)), (rx, guard)))
        });

        Ok((id, stream::once(async move { Ok(endpoint) }).chain(messages)))
    }

    /// Deliver a response to an open session.
    pub async fn send(&self, id: Uuid, response: JsonRpcResponse) -> Result<(), ServerError> {
        let sender = self
            .sessions
            .lock()
            .map_err(|e| ServerError::Internal(e.to_string()))?
            .get(&id)
            .cloned()
            .ok_or_else(|| ServerError::SessionNotFound(id.to_string()))?;

        sender
            .send(response)
            .await
            .map_err(|_| ServerError::SessionClosed(id.to_string()))
    }

    /// Whether a session is currently open.
    pub fn contains(&self, id: Uuid) -> bool {
        self.sessions
            .lock()
            .map(|sessions| sessions.contains_key(&id))
            .unwrap_or(false)
    }

    fn remove(&self, id: Uuid) {
        if let Ok(mut sessions) = self.sessions.lock() {
            sessions.remove(&id);
        }
    }
}

/// Removes its session from the registry when the stream goes away.
struct SessionGuard {
    id: Uuid,
    registry: SessionRegistry,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.registry.remove(self.id);
        debug!(session_id = %self.id, "MCP session closed");
    }
}

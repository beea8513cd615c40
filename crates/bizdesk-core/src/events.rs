//! Push events flowing from the service layer to the realtime engine.
//!
//! Mutations publish a [`PushEvent`] onto a bounded [`EventBus`]; the
//! realtime engine drains the receiving end and forwards each event to the
//! originating user's websocket channel. Delivery is fire-and-forget: a
//! full queue drops the event rather than blocking the request.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use uuid::Uuid;

/// A mutation event destined for one user's websocket channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushEvent {
    /// The user whose `user:{id}` channel receives the event.
    pub user_id: Uuid,
    /// Event name, e.g. `user:created` or `role:deleted`.
    pub event: String,
    /// Event payload.
    pub data: serde_json::Value,
}

impl PushEvent {
    /// Creates a new push event.
    pub fn new(user_id: Uuid, event: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            user_id,
            event: event.into(),
            data,
        }
    }
}

/// Sending half of the push-event queue, cloned into every service.
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: mpsc::Sender<PushEvent>,
}

impl EventBus {
    /// Creates a bounded event bus, returning the bus and its drain side.
    pub fn bounded(capacity: usize) -> (Self, mpsc::Receiver<PushEvent>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx }, rx)
    }

    /// Publishes an event without waiting. Dropped when the queue is full
    /// or the realtime engine has shut down.
    pub fn publish(&self, event: PushEvent) {
        match self.tx.try_send(event) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(ev)) => {
                tracing::warn!(event = %ev.event, user_id = %ev.user_id, "Push queue full, dropping event");
            }
            Err(mpsc::error::TrySendError::Closed(ev)) => {
                tracing::debug!(event = %ev.event, "Push queue closed, dropping event");
            }
        }
    }
}

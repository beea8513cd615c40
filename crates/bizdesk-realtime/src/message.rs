//! Outbound wire messages.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use bizdesk_core::error::AppError;
use bizdesk_core::events::PushEvent;

/// A message on its way to a connected client.
#[derive(Debug, Clone)]
pub enum OutboundMessage {
    /// A mutation event envelope.
    Event(EventEnvelope),
    /// Heartbeat reply to a client `ping`.
    Pong,
    /// Tells the writer task to close the socket and stop. Sent when
    /// the connection is evicted server-side.
    Close,
}

/// The JSON envelope for pushed mutation events.
#[derive(Debug, Clone, Serialize)]
pub struct EventEnvelope {
    /// Event name, e.g. `user:created`.
    pub event: String,
    /// Event payload.
    pub data: Value,
    /// When the event was pushed.
    pub timestamp: DateTime<Utc>,
}

impl OutboundMessage {
    /// Wrap a service-layer event, stamping it now.
    pub fn from_push(event: PushEvent) -> Self {
        Self::Event(EventEnvelope {
            event: event.event,
            data: event.data,
            timestamp: Utc::now(),
        })
    }

    /// The websocket text frame for this message.
    ///
    /// `pong` goes out as a bare string, matching the bare `ping` the
    /// client sends.
    pub fn to_text(&self) -> Result<String, AppError> {
        match self {
            Self::Event(envelope) => Ok(serde_json::to_string(envelope)?),
            Self::Pong => Ok("pong".to_string()),
            Self::Close => Err(AppError::internal("Close carries no text body")),
        }
    }
}

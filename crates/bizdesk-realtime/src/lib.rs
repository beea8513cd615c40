//! # bizdesk-realtime
//!
//! Real-time WebSocket engine for BizDesk. Provides:
//!
//! - connection handles and a pool indexed by user
//! - a pub/sub channel registry (`default` plus `user:{id}`)
//! - the pump that drains the service-layer event bus into sockets
//! - `ping`/`pong` heartbeat echo

pub mod channel;
pub mod connection;
pub mod message;
pub mod server;

pub use channel::ChannelRegistry;
pub use connection::{ConnectionHandle, ConnectionId, ConnectionPool};
pub use message::OutboundMessage;
pub use server::RealtimeEngine;

/// The channel every connection joins on connect.
pub const DEFAULT_CHANNEL: &str = "default";

/// The private channel name for a user.
pub fn user_channel(user_id: uuid::Uuid) -> String {
    format!("user:{user_id}")
}

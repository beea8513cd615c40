//! Top-level real-time engine: connection lifecycle plus the pump that
//! drains the service-layer event bus into per-user channels.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use bizdesk_core::config::RealtimeConfig;
use bizdesk_core::events::PushEvent;

use crate::channel::ChannelRegistry;
use crate::connection::{ConnectionHandle, ConnectionId, ConnectionPool};
use crate::message::OutboundMessage;
use crate::{DEFAULT_CHANNEL, user_channel};

/// Central real-time engine shared by the websocket handlers.
#[derive(Debug, Clone)]
pub struct RealtimeEngine {
    pool: Arc<ConnectionPool>,
    channels: Arc<ChannelRegistry>,
    config: RealtimeConfig,
}

impl RealtimeEngine {
    /// Creates a new real-time engine.
    pub fn new(config: RealtimeConfig) -> Self {
        Self {
            pool: Arc::new(ConnectionPool::new()),
            channels: Arc::new(ChannelRegistry::new()),
            config,
        }
    }

    /// Registers an authenticated connection.
    ///
    /// The connection is auto-subscribed to `default` and its own
    /// `user:{id}` channel. When the user is at their connection limit
    /// the oldest connection is evicted first.
    ///
    /// Returns the handle and the receiver the socket writer drains.
    pub fn register(
        &self,
        user_id: Uuid,
        business_id: Uuid,
    ) -> (Arc<ConnectionHandle>, mpsc::Receiver<OutboundMessage>) {
        let existing = self.pool.user_connections(&user_id);
        if existing.len() >= self.config.max_connections_per_user {
            if let Some(oldest) = existing.iter().min_by_key(|c| c.connected_at) {
                warn!(
                    %user_id,
                    count = existing.len(),
                    "User at connection limit, evicting oldest"
                );
                // Close before mark_dead: send() refuses on dead handles.
                oldest.send(OutboundMessage::Close);
                oldest.mark_dead();
                self.unregister(&oldest.id);
            }
        }

        let (tx, rx) = mpsc::channel(self.config.channel_buffer_size);
        let handle = Arc::new(ConnectionHandle::new(user_id, business_id, tx));

        self.pool.add(handle.clone());
        self.channels.subscribe(DEFAULT_CHANNEL, handle.id);
        self.channels.subscribe(&user_channel(user_id), handle.id);

        info!(%user_id, connection_id = %handle.id, "WebSocket connection registered");
        (handle, rx)
    }

    /// Removes a connection and all its subscriptions.
    pub fn unregister(&self, conn_id: &ConnectionId) {
        self.channels.unsubscribe_all(*conn_id);
        if let Some(handle) = self.pool.remove(conn_id) {
            handle.mark_dead();
            debug!(connection_id = %conn_id, user_id = %handle.user_id, "WebSocket connection removed");
        }
    }

    /// Sends a message to every live subscriber of a channel.
    pub fn publish(&self, channel: &str, msg: &OutboundMessage) {
        for conn_id in self.channels.subscribers(channel) {
            if let Some(handle) = self.pool.get(&conn_id) {
                handle.send(msg.clone());
            }
        }
    }

    /// Number of live connections.
    pub fn connection_count(&self) -> usize {
        self.pool.connection_count()
    }

    /// Spawns the pump that forwards service-layer events to the
    /// originating user's channel. Runs until the bus is dropped.
    pub fn spawn_event_pump(&self, mut rx: mpsc::Receiver<PushEvent>) -> tokio::task::JoinHandle<()> {
        let engine = self.clone();
        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                let channel = user_channel(event.user_id);
                engine.publish(&channel, &OutboundMessage::from_push(event));
            }
            debug!("Event bus closed, stopping pump");
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bizdesk_core::events::EventBus;

    fn engine() -> RealtimeEngine {
        RealtimeEngine::new(RealtimeConfig {
            channel_buffer_size: 8,
            event_queue_size: 16,
            max_connections_per_user: 2,
        })
    }

    #[tokio::test]
    async fn pump_routes_events_to_owner_only() {
        let engine = engine();
        let user_a = Uuid::new_v4();
        let user_b = Uuid::new_v4();
        let business = Uuid::new_v4();

        let (_handle_a, mut rx_a) = engine.register(user_a, business);
        let (_handle_b, mut rx_b) = engine.register(user_b, business);

        let (bus, bus_rx) = EventBus::bounded(8);
        let pump = engine.spawn_event_pump(bus_rx);

        bus.publish(PushEvent::new(
            user_a,
            "user:created",
            serde_json::json!({ "id": 1 }),
        ));
        drop(bus);
        pump.await.unwrap();

        let msg = rx_a.recv().await.expect("owner receives the event");
        match msg {
            OutboundMessage::Event(env) => assert_eq!(env.event, "user:created"),
            other => panic!("unexpected message: {other:?}"),
        }
        assert!(rx_b.try_recv().is_err());
    }

    #[tokio::test]
    async fn connection_limit_evicts_oldest() {
        let engine = engine();
        let user = Uuid::new_v4();
        let business = Uuid::new_v4();

        let (first, mut rx1) = engine.register(user, business);
        let (_second, _rx2) = engine.register(user, business);
        assert_eq!(engine.connection_count(), 2);

        let (_third, _rx3) = engine.register(user, business);
        assert_eq!(engine.connection_count(), 2);
        assert!(!first.is_alive());

        // The evicted socket's writer is told to shut down, so the
        // underlying connection actually tears down.
        let msg = rx1.recv().await.expect("evicted connection gets a close");
        assert!(matches!(msg, OutboundMessage::Close));
    }

    #[tokio::test]
    async fn unregister_cleans_subscriptions() {
        let engine = engine();
        let user = Uuid::new_v4();
        let (handle, mut rx) = engine.register(user, Uuid::new_v4());

        engine.unregister(&handle.id);
        engine.publish(&user_channel(user), &OutboundMessage::Pong);
        assert!(rx.try_recv().is_err());
    }
}

//! Channel registry — maps channel names to subscribed connections.

use std::collections::HashSet;

use dashmap::DashMap;

use crate::connection::ConnectionId;

/// Registry of all active pub/sub channels.
///
/// Channels are created on first subscribe and dropped when their last
/// subscriber leaves.
#[derive(Debug, Default)]
pub struct ChannelRegistry {
    /// Channel name → subscriber connection ids.
    channels: DashMap<String, HashSet<ConnectionId>>,
    /// Reverse index for fast disconnect cleanup.
    subscriptions: DashMap<ConnectionId, Vec<String>>,
}

impl ChannelRegistry {
    /// Creates a new channel registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes a connection to a channel.
    pub fn subscribe(&self, channel: &str, conn_id: ConnectionId) {
        self.channels
            .entry(channel.to_string())
            .or_default()
            .insert(conn_id);
        self.subscriptions
            .entry(conn_id)
            .or_default()
            .push(channel.to_string());
    }

    /// Unsubscribes a connection from all its channels.
    pub fn unsubscribe_all(&self, conn_id: ConnectionId) {
        let Some((_, channels)) = self.subscriptions.remove(&conn_id) else {
            return;
        };
        for name in &channels {
            if let Some(mut subscribers) = self.channels.get_mut(name) {
                subscribers.remove(&conn_id);
                if subscribers.is_empty() {
                    drop(subscribers);
                    self.channels.remove(name);
                }
            }
        }
    }

    /// Returns all subscriber connection IDs for a channel.
    pub fn subscribers(&self, channel: &str) -> Vec<ConnectionId> {
        self.channels
            .get(channel)
            .map(|set| set.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Returns total number of active channels.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }
}

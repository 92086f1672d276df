//! Broadcast channel for gateway notifications.
//!
//! [`EventBus`] wraps a [`tokio::sync::broadcast`] channel. Every attach,
//! detach, fee forward and absorbed guest failure publishes a
//! [`GatewayEvent`]; WebSocket connections and the event-log writer
//! subscribe to it.

use tokio::sync::broadcast;

use super::GatewayEvent;

/// Broadcast bus for [`GatewayEvent`]s.
///
/// Capacity comes from `EVENT_BUS_CAPACITY`. A receiver that falls more
/// than `capacity` events behind skips the oldest ones.
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<GatewayEvent>,
}

impl EventBus {
    /// Creates a bus buffering up to `capacity` events per receiver.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Publishes `event`, returning how many receivers got it. With no
    /// receivers the event is dropped.
    pub fn publish(&self, event: GatewayEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    /// Receiver for every event published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<GatewayEvent> {
        self.sender.subscribe()
    }
}

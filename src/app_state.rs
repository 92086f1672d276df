//! Shared application state injected into all Axum handlers.

use std::sync::Arc;
use std::time::Duration;

use crate::domain::EventBus;
use crate::persistence::postgres::PostgresPersistence;
use crate::service::HookGateway;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The gateway holding every guest slot.
    pub gateway: Arc<HookGateway>,
    /// Event bus for WebSocket subscriptions.
    pub event_bus: EventBus,
    /// Event log, present when persistence is enabled.
    pub persistence: Option<PostgresPersistence>,
}

impl AppState {
    /// State without an event log.
    #[must_use]
    pub fn new(gateway: Arc<HookGateway>) -> Self {
        let event_bus = gateway.event_bus().clone();
        Self {
            gateway,
            event_bus,
            persistence: None,
        }
    }

    /// Attaches the event log.
    #[must_use]
    pub fn with_persistence(mut self, persistence: PostgresPersistence) -> Self {
        self.persistence = Some(persistence);
        self
    }

    /// Budget applied to remote guests attached over HTTP.
    #[must_use]
    pub fn guest_call_timeout(&self) -> Duration {
        self.gateway.settings().guest_call_timeout
    }
}

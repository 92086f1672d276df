//! Background task copying bus events into the event log.

use tokio::sync::broadcast;
use tokio::task::JoinHandle;

use super::postgres::PostgresPersistence;
use crate::domain::EventBus;

/// Spawns a task that appends every [`crate::domain::GatewayEvent`]
/// published on `event_bus` to `persistence`.
///
/// Write failures are logged and skipped. The task ends when the bus is
/// dropped.
pub fn spawn_event_log(persistence: PostgresPersistence, event_bus: &EventBus) -> JoinHandle<()> {
    let mut rx = event_bus.subscribe();
    tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(event) => {
                    if let Err(e) = persistence.record(&event).await {
                        tracing::error!(
                            pool_id = %event.pool_id(),
                            event_type = event.event_type_str(),
                            error = %e,
                            "failed to persist gateway event"
                        );
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(lagged = n, "event log lagged behind event bus");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
        tracing::debug!("event log writer stopped");
    })
}

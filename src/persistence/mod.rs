//! Persistence layer: PostgreSQL event log.
//!
//! Every [`crate::domain::GatewayEvent`] can be appended to the
//! `gateway_events` table by the writer spawned with
//! [`event_log::spawn_event_log`]. Guest slots themselves are never
//! persisted; they live only as long as the gateway.

pub mod event_log;
pub mod models;
pub mod postgres;

pub use event_log::spawn_event_log;
pub use models::StoredEvent;
pub use postgres::PostgresPersistence;

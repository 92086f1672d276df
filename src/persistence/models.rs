//! Database models for the event log.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A stored row from the `gateway_events` table.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StoredEvent {
    /// Auto-increment row ID.
    pub id: i64,
    /// Pool the event concerns, as `0x` hex.
    pub pool_id: String,
    /// Event type discriminator (e.g. `"guest_failed_reported"`).
    pub event_type: String,
    /// JSONB payload with the serialized event.
    #[schema(value_type = Object)]
    pub payload: serde_json::Value,
    /// Server-side creation timestamp.
    pub created_at: DateTime<Utc>,
}

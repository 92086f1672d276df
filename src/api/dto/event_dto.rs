//! Event log DTOs.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::persistence::StoredEvent;

/// Query parameters for `GET /events`.
#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct EventQuery {
    /// Restrict to one pool (`0x` hex pool id).
    #[serde(default)]
    pub pool_id: Option<String>,
    /// Maximum rows, newest first. Defaults to 100.
    #[serde(default = "default_limit")]
    pub limit: i64,
}

fn default_limit() -> i64 {
    100
}

/// Response body for `GET /events`.
#[derive(Debug, Serialize, ToSchema)]
pub struct EventListResponse {
    /// Stored events, newest first.
    pub data: Vec<StoredEvent>,
}

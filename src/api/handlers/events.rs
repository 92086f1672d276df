//! Event log handler.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use super::guest::parse_pool_id;
use crate::api::dto::{EventListResponse, EventQuery};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, GatewayError};

/// `GET /events` — Read the persisted event log.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] when persistence is disabled or
/// `pool_id` is malformed, and [`GatewayError::PersistenceError`] on
/// database failure.
#[utoipa::path(
    get,
    path = "/api/v1/events",
    tag = "Events",
    summary = "List stored events",
    description = "Returns the most recent gateway events, newest first. Requires PERSISTENCE_ENABLED.",
    params(EventQuery),
    responses(
        (status = 200, description = "Stored events", body = EventListResponse),
        (status = 400, description = "Persistence disabled or bad query", body = ErrorResponse),
    )
)]
pub async fn list_events(
    State(state): State<AppState>,
    Query(query): Query<EventQuery>,
) -> Result<impl IntoResponse, GatewayError> {
    let Some(persistence) = state.persistence.as_ref() else {
        return Err(GatewayError::InvalidRequest(
            "event log is disabled".to_string(),
        ));
    };
    let pool_id = query.pool_id.as_deref().map(parse_pool_id).transpose()?;
    let data = persistence.load_events(pool_id, query.limit).await?;
    Ok(Json(EventListResponse { data }))
}

/// Event log routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/events", get(list_events))
}

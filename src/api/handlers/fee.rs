//! Dynamic fee handler.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::caller;
use crate::api::dto::{UpdateFeeRequest, UpdateFeeResponse};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, GatewayError};

/// `POST /fees` — Change a pool's dynamic fee.
///
/// # Errors
///
/// Returns [`GatewayError::NotGuestHook`] unless the caller is the guest
/// attached to the pool, or [`GatewayError::Orchestrator`] if the pool
/// manager rejects the fee.
#[utoipa::path(
    post,
    path = "/api/v1/fees",
    tag = "Fees",
    summary = "Update the dynamic fee",
    description = "Attached guest only. Forwards a new LP fee for the pool to the pool manager.",
    params(("x-caller" = String, Header, description = "Caller address")),
    request_body = UpdateFeeRequest,
    responses(
        (status = 200, description = "Fee forwarded", body = UpdateFeeResponse),
        (status = 403, description = "Caller is not the pool's guest", body = ErrorResponse),
        (status = 502, description = "Pool manager rejected the fee", body = ErrorResponse),
    )
)]
pub async fn update_fee(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<UpdateFeeRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let caller = caller(&headers)?;
    state
        .gateway
        .update_dynamic_fee(caller, &req.pool_key, req.fee)
        .await?;
    Ok(Json(UpdateFeeResponse {
        pool_id: req.pool_key.to_id(),
        fee: req.fee,
    }))
}

/// Fee routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/fees", post(update_fee))
}

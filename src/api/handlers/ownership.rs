//! Ownership handlers: inspect, propose, accept.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::caller;
use crate::api::dto::{OwnershipResponse, TransferOwnershipRequest};
use crate::app_state::AppState;
use crate::error::{ErrorResponse, GatewayError};

/// `GET /ownership` — Current and pending owner.
#[utoipa::path(
    get,
    path = "/api/v1/ownership",
    tag = "Ownership",
    summary = "Get ownership",
    responses(
        (status = 200, description = "Ownership state", body = OwnershipResponse),
    )
)]
pub async fn get_ownership(State(state): State<AppState>) -> impl IntoResponse {
    Json(OwnershipResponse::from(state.gateway.ownership().await))
}

/// `POST /ownership/transfer` — Propose a new owner.
///
/// # Errors
///
/// Returns [`GatewayError::NotOwner`] if the caller is not the owner.
#[utoipa::path(
    post,
    path = "/api/v1/ownership/transfer",
    tag = "Ownership",
    summary = "Start an ownership transfer",
    description = "Owner only. Replaces any earlier proposal.",
    params(("x-caller" = String, Header, description = "Caller address")),
    request_body = TransferOwnershipRequest,
    responses(
        (status = 200, description = "Transfer pending", body = OwnershipResponse),
        (status = 403, description = "Caller is not the owner", body = ErrorResponse),
    )
)]
pub async fn transfer_ownership(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<TransferOwnershipRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let caller = caller(&headers)?;
    state
        .gateway
        .transfer_ownership(caller, req.new_owner)
        .await?;
    Ok(Json(OwnershipResponse::from(state.gateway.ownership().await)))
}

/// `POST /ownership/accept` — Complete a pending transfer.
///
/// # Errors
///
/// Returns [`GatewayError::NotPendingOwner`] if the caller is not the
/// pending owner.
#[utoipa::path(
    post,
    path = "/api/v1/ownership/accept",
    tag = "Ownership",
    summary = "Accept ownership",
    description = "Pending owner only.",
    params(("x-caller" = String, Header, description = "Caller address")),
    responses(
        (status = 200, description = "Ownership transferred", body = OwnershipResponse),
        (status = 403, description = "Caller is not the pending owner", body = ErrorResponse),
    )
)]
pub async fn accept_ownership(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, GatewayError> {
    let caller = caller(&headers)?;
    state.gateway.accept_ownership(caller).await?;
    Ok(Json(OwnershipResponse::from(state.gateway.ownership().await)))
}

/// Ownership routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/ownership", get(get_ownership))
        .route("/ownership/transfer", post(transfer_ownership))
        .route("/ownership/accept", post(accept_ownership))
}

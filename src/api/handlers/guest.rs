//! Guest slot handlers: attach, detach, lookup, list.

use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};

use crate::api::caller;
use crate::api::dto::{
    AttachGuestRequest, DetachGuestRequest, GuestDto, GuestListResponse, GuestSlotResponse,
    PaginationParams,
};
use crate::app_state::AppState;
use crate::domain::{GuestHandle, PoolId};
use crate::error::{ErrorResponse, GatewayError};
use crate::remote_guest::RemoteGuest;

/// `POST /guests` — Attach a remote guest to a pool.
///
/// # Errors
///
/// Returns [`GatewayError`] if the caller is not the owner, the pool key or
/// guest identity is invalid, the slot is occupied, or the fee forward fails.
#[utoipa::path(
    post,
    path = "/api/v1/guests",
    tag = "Guests",
    summary = "Attach a guest",
    description = "Owner only. Places a guest reachable over HTTP in the pool's single slot. A fixed fee hint is forwarded once to the pool manager.",
    params(("x-caller" = String, Header, description = "Caller address")),
    request_body = AttachGuestRequest,
    responses(
        (status = 201, description = "Guest attached", body = GuestSlotResponse),
        (status = 400, description = "Invalid pool key or guest identity", body = ErrorResponse),
        (status = 403, description = "Caller is not the owner", body = ErrorResponse),
        (status = 409, description = "Pool already has a guest", body = ErrorResponse),
    )
)]
pub async fn attach_guest(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<AttachGuestRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let caller = caller(&headers)?;
    if req.guest.endpoint.is_empty() {
        return Err(GatewayError::InvalidRequest(
            "guest endpoint is required".to_string(),
        ));
    }
    let remote = RemoteGuest::new(
        req.guest.address,
        req.guest.capabilities,
        &req.guest.endpoint,
        state.guest_call_timeout(),
    )?;
    let handle = GuestHandle::new(Arc::new(remote));
    let info = handle.info();

    let pool_id = state
        .gateway
        .attach(caller, &req.pool_key, handle, req.fee_hint)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(GuestSlotResponse {
            pool_id,
            guest: Some(info.into()),
        }),
    ))
}

/// `POST /guests/detach` — Clear a pool's slot.
///
/// # Errors
///
/// Returns [`GatewayError`] if the caller is not the owner or the fee reset
/// fails.
#[utoipa::path(
    post,
    path = "/api/v1/guests/detach",
    tag = "Guests",
    summary = "Detach a guest",
    description = "Owner only. Clears the slot (succeeds when already empty) and resets the pool's dynamic fee to zero.",
    params(("x-caller" = String, Header, description = "Caller address")),
    request_body = DetachGuestRequest,
    responses(
        (status = 200, description = "Slot cleared; `guest` is the previous occupant", body = GuestSlotResponse),
        (status = 403, description = "Caller is not the owner", body = ErrorResponse),
        (status = 502, description = "Pool manager rejected the fee reset", body = ErrorResponse),
    )
)]
pub async fn detach_guest(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<DetachGuestRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let caller = caller(&headers)?;
    let previous = state.gateway.detach(caller, &req.pool_key).await?;
    Ok(Json(GuestSlotResponse {
        pool_id: req.pool_key.to_id(),
        guest: previous.map(GuestDto::from),
    }))
}

/// `GET /pools/{pool_id}/guest` — Look up a pool's guest.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] if `pool_id` is not a 32-byte
/// hex string.
#[utoipa::path(
    get,
    path = "/api/v1/pools/{pool_id}/guest",
    tag = "Guests",
    summary = "Get the guest of a pool",
    description = "Returns the guest currently attached to the pool, or `null` when the slot is empty.",
    params(("pool_id" = String, Path, description = "Pool id (0x hex)")),
    responses(
        (status = 200, description = "Slot contents", body = GuestSlotResponse),
        (status = 400, description = "Malformed pool id", body = ErrorResponse),
    )
)]
pub async fn get_guest(
    State(state): State<AppState>,
    Path(pool_id): Path<String>,
) -> Result<impl IntoResponse, GatewayError> {
    let pool_id = parse_pool_id(&pool_id)?;
    let guest = state.gateway.guest_of(pool_id).await;
    Ok(Json(GuestSlotResponse {
        pool_id,
        guest: guest.map(|handle| handle.info().into()),
    }))
}

/// `GET /guests` — List occupied slots.
///
/// # Errors
///
/// Never fails; the `Result` keeps the handler signature uniform.
#[utoipa::path(
    get,
    path = "/api/v1/guests",
    tag = "Guests",
    summary = "List attached guests",
    description = "Returns a paginated list of every occupied slot, ordered by pool id.",
    params(PaginationParams),
    responses(
        (status = 200, description = "Occupied slots", body = GuestListResponse),
    )
)]
pub async fn list_guests(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<impl IntoResponse, GatewayError> {
    let mut slots = state.gateway.attachments().await;
    slots.sort_by_key(|(pool_id, _)| *pool_id);
    let slots: Vec<GuestSlotResponse> = slots
        .into_iter()
        .map(|(pool_id, info)| GuestSlotResponse {
            pool_id,
            guest: Some(info.into()),
        })
        .collect();
    let (data, pagination) = params.paginate(slots);
    Ok(Json(GuestListResponse { data, pagination }))
}

/// Parses a path segment as a [`PoolId`].
pub(crate) fn parse_pool_id(raw: &str) -> Result<PoolId, GatewayError> {
    raw.parse()
        .map_err(|e| GatewayError::InvalidRequest(format!("invalid pool id '{raw}': {e}")))
}

/// Guest slot routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/guests", post(attach_guest).get(list_guests))
        .route("/guests/detach", post(detach_guest))
        .route("/pools/{pool_id}/guest", get(get_guest))
}

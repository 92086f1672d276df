//! Orchestrator callback handler.

use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::caller;
use crate::app_state::AppState;
use crate::domain::{Callback, CallbackResponse};
use crate::error::{ErrorResponse, GatewayError};

/// `POST /callbacks` — Deliver one lifecycle callback.
///
/// The body is a callback tagged by `"callback"`, e.g.
/// `{"callback": "before_swap", "sender": "0x…", "key": {…}, "params": {…}, "hook_data": "0x"}`.
///
/// # Errors
///
/// Returns [`GatewayError::NotPoolManager`] for any caller but the
/// orchestrator, and whatever the routed callback returns.
#[utoipa::path(
    post,
    path = "/api/v1/callbacks",
    tag = "Callbacks",
    summary = "Invoke a lifecycle callback",
    description = "Orchestrator only. Forwards the callback to the pool's guest when it declares the matching capability, otherwise returns the default response. Guest failures on before_swap/after_swap are absorbed.",
    params(("x-caller" = String, Header, description = "Caller address")),
    responses(
        (status = 200, description = "Acknowledgment and sanitized return values", body = CallbackResponse),
        (status = 400, description = "Invalid pool key", body = ErrorResponse),
        (status = 403, description = "Caller is not the orchestrator", body = ErrorResponse),
        (status = 422, description = "Guest returned an unauthorized delta", body = ErrorResponse),
        (status = 424, description = "Guest failed", body = ErrorResponse),
    )
)]
pub async fn invoke_callback(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(callback): Json<Callback>,
) -> Result<impl IntoResponse, GatewayError> {
    let caller = caller(&headers)?;
    let response = state.gateway.dispatch(caller, &callback).await?;
    Ok(Json(response))
}

/// Callback routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/callbacks", post(invoke_callback))
}

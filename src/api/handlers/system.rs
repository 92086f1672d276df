//! System endpoints: health check and capability catalog.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde::Serialize;
use utoipa::ToSchema;

use crate::app_state::AppState;
use crate::domain::{CallbackKind, CapabilityMask};

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    status: String,
    timestamp: String,
    version: String,
    gateway: String,
    attached_guests: usize,
}

/// `GET /health` — Service health status.
#[utoipa::path(
    get,
    path = "/health",
    tag = "System",
    summary = "Health check",
    description = "Returns service health status, version, gateway identity, and the number of occupied slots.",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
    )
)]
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: "healthy".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            gateway: state.gateway.address().to_string(),
            attached_guests: state.gateway.attachments().await.len(),
        }),
    )
}

/// One capability bit.
#[derive(Debug, Serialize, ToSchema)]
pub struct CapabilityInfo {
    name: &'static str,
    bit: u16,
    callback: Option<CallbackKind>,
    returns_delta: bool,
}

/// `GET /config/capabilities` — List capability bits.
#[utoipa::path(
    get,
    path = "/config/capabilities",
    tag = "System",
    summary = "List capability bits",
    description = "Returns every capability bit with the callback it gates. A principal's capabilities are the low 14 bits of its address.",
    responses(
        (status = 200, description = "Capability catalog", body = Vec<CapabilityInfo>),
    )
)]
pub async fn capabilities_handler() -> impl IntoResponse {
    let catalog: Vec<CapabilityInfo> = CapabilityMask::NAMED
        .iter()
        .map(|&(name, bit)| {
            let gated = CallbackKind::ALL
                .into_iter()
                .find(|kind| kind.capability() == bit);
            let delta_of = CallbackKind::ALL
                .into_iter()
                .find(|kind| kind.returns_delta_capability() == Some(bit));
            CapabilityInfo {
                name,
                bit: bit.bits(),
                callback: gated.or(delta_of),
                returns_delta: delta_of.is_some(),
            }
        })
        .collect();
    (StatusCode::OK, Json(catalog))
}

/// System routes mounted at the root level (not under /api/v1).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health_handler))
        .route("/config/capabilities", get(capabilities_handler))
}

//! OpenAPI document and optional Swagger UI.

use axum::Router;
use utoipa::OpenApi;

use super::dto::{
    AttachGuestRequest, DetachGuestRequest, EventListResponse, GuestDto, GuestListResponse,
    GuestSlotResponse, OwnershipResponse, PaginationMeta, RemoteGuestDto, TransferOwnershipRequest,
    UpdateFeeRequest, UpdateFeeResponse,
};
use super::handlers;
use crate::app_state::AppState;
use crate::domain::{
    BalanceDelta, BeforeSwapDelta, Callback, CallbackKind, CallbackResponse, DonateCall,
    InitializeCall, InitializedCall, LiquidityCall, LiquiditySettledCall, ModifyLiquidityParams,
    PoolKey, SwapCall, SwapParams, SwapSettledCall,
};
use crate::error::{ErrorBody, ErrorResponse};
use crate::persistence::StoredEvent;

/// OpenAPI description of the REST surface.
#[derive(Debug, OpenApi)]
#[openapi(
    info(
        title = "hydra-hook-gateway",
        description = "Single-slot hook gateway forwarding pool lifecycle callbacks to guest modules."
    ),
    paths(
        handlers::system::health_handler,
        handlers::system::capabilities_handler,
        handlers::guest::attach_guest,
        handlers::guest::detach_guest,
        handlers::guest::get_guest,
        handlers::guest::list_guests,
        handlers::fee::update_fee,
        handlers::ownership::get_ownership,
        handlers::ownership::transfer_ownership,
        handlers::ownership::accept_ownership,
        handlers::callback::invoke_callback,
        handlers::events::list_events,
    ),
    components(schemas(
        AttachGuestRequest,
        DetachGuestRequest,
        RemoteGuestDto,
        GuestDto,
        GuestSlotResponse,
        GuestListResponse,
        PaginationMeta,
        UpdateFeeRequest,
        UpdateFeeResponse,
        OwnershipResponse,
        TransferOwnershipRequest,
        EventListResponse,
        StoredEvent,
        Callback,
        InitializeCall,
        InitializedCall,
        LiquidityCall,
        LiquiditySettledCall,
        SwapCall,
        SwapSettledCall,
        DonateCall,
        CallbackKind,
        CallbackResponse,
        BalanceDelta,
        BeforeSwapDelta,
        ModifyLiquidityParams,
        SwapParams,
        PoolKey,
        ErrorResponse,
        ErrorBody,
    ))
)]
pub struct ApiDoc;

/// Serves Swagger UI at `/swagger-ui` and the document at
/// `/api-docs/openapi.json`.
#[cfg(feature = "swagger-ui")]
pub fn mount(router: Router<AppState>) -> Router<AppState> {
    router.merge(
        utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
            .url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
}

/// Swagger UI is compiled out; the router is returned unchanged.
#[cfg(not(feature = "swagger-ui"))]
pub fn mount(router: Router<AppState>) -> Router<AppState> {
    router
}

//! REST endpoint handlers organized by resource.

pub mod callback;
pub mod events;
pub mod fee;
pub mod guest;
pub mod ownership;
pub mod system;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(guest::routes())
        .merge(fee::routes())
        .merge(ownership::routes())
        .merge(callback::routes())
        .merge(events::routes())
}

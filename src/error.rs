//! Gateway error types with HTTP status code mapping.
//!
//! [`GatewayError`] is the central error type for the gateway. Each variant
//! maps to a specific HTTP status code and structured JSON error response.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{Address, CallbackKind, GuestRevert, PoolId};
use crate::orchestrator::OrchestratorError;

/// Structured JSON error response body.
///
/// All error responses follow this shape:
/// ```json
/// {
///   "error": {
///     "code": 2001,
///     "message": "pool 0x… already has a guest attached",
///     "details": null
///   }
/// }
/// ```
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Structured error payload.
    pub error: ErrorBody,
}

/// Inner error body with numeric code and human-readable message.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    /// Numeric error code (see code ranges on [`GatewayError`]).
    pub code: u32,
    /// Human-readable error message.
    pub message: String,
    /// Optional additional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Server-side error enum with HTTP status code mapping.
///
/// # Error Code Ranges
///
/// | Range     | Category                 | HTTP Status                   |
/// |-----------|--------------------------|-------------------------------|
/// | 1000–1999 | Validation               | 400 Bad Request               |
/// | 2000–2999 | State                    | 409 Conflict                  |
/// | 3000–3999 | Configuration / Server   | 500 Internal Server Error     |
/// | 4000–4999 | Authorization            | 403 Forbidden                 |
/// | 5000–5999 | Guest / Orchestrator     | 422 / 424 / 502               |
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// The gateway identity does not encode every capability.
    #[error("gateway identity {0} does not encode the full capability mask")]
    InvalidGatewayIdentity(Address),

    /// Caller is not the current owner.
    #[error("caller {0} is not the owner")]
    NotOwner(Address),

    /// Caller is not the pending owner.
    #[error("caller {0} is not the pending owner")]
    NotPendingOwner(Address),

    /// Caller of a callback entry point is not the orchestrator.
    #[error("caller {0} is not the pool manager")]
    NotPoolManager(Address),

    /// Caller is not the guest attached to the pool.
    #[error("caller {0} is not the guest hook of this pool")]
    NotGuestHook(Address),

    /// The pool already has a guest attached.
    #[error("pool {0} already has a guest attached")]
    PoolOccupied(PoolId),

    /// The pool descriptor is not acceptable for this operation.
    #[error("invalid pool key: {0}")]
    InvalidPoolKey(String),

    /// The guest's identity is inconsistent with the requested fee marker.
    #[error("invalid guest identity {0}: {1}")]
    InvalidGuestIdentity(Address, String),

    /// The guest returned a delta the caller did not consent to.
    #[error("guest returned an unauthorized delta on {0}")]
    InvalidHookDelta(CallbackKind),

    /// A guest failed on a callback whose failures propagate.
    #[error("guest {guest} failed on {callback}: {revert}")]
    GuestReverted {
        /// Failing guest.
        guest: Address,
        /// Callback that failed.
        callback: CallbackKind,
        /// Raw failure payload.
        revert: GuestRevert,
    },

    /// The orchestrator rejected or did not answer a forwarded request.
    #[error("orchestrator error: {0}")]
    Orchestrator(#[from] OrchestratorError),

    /// Request validation failed.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Persistence layer failure.
    #[error("persistence error: {0}")]
    PersistenceError(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidRequest(_) => 1001,
            Self::InvalidPoolKey(_) => 1002,
            Self::InvalidGuestIdentity(..) => 1003,
            Self::PoolOccupied(_) => 2001,
            Self::Internal(_) => 3000,
            Self::PersistenceError(_) => 3001,
            Self::InvalidGatewayIdentity(_) => 3002,
            Self::NotOwner(_) => 4001,
            Self::NotPendingOwner(_) => 4002,
            Self::NotPoolManager(_) => 4003,
            Self::NotGuestHook(_) => 4004,
            Self::InvalidHookDelta(_) => 5001,
            Self::GuestReverted { .. } => 5002,
            Self::Orchestrator(_) => 5003,
        }
    }

    /// Returns the HTTP status code for this variant.
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequest(_) | Self::InvalidPoolKey(_) | Self::InvalidGuestIdentity(..) => {
                StatusCode::BAD_REQUEST
            }
            Self::PoolOccupied(_) => StatusCode::CONFLICT,
            Self::NotOwner(_)
            | Self::NotPendingOwner(_)
            | Self::NotPoolManager(_)
            | Self::NotGuestHook(_) => StatusCode::FORBIDDEN,
            Self::InvalidHookDelta(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::GuestReverted { .. } => StatusCode::FAILED_DEPENDENCY,
            Self::Orchestrator(_) => StatusCode::BAD_GATEWAY,
            Self::InvalidGatewayIdentity(_) | Self::PersistenceError(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Raw guest revert payload, for errors that carry one.
    fn details(&self) -> Option<String> {
        match self {
            Self::GuestReverted { revert, .. } => {
                Some(format!("0x{}", hex::encode(revert.payload())))
            }
            _ => None,
        }
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            error: ErrorBody {
                code: self.error_code(),
                message: self.to_string(),
                details: self.details(),
            },
        };
        let mut response = axum::Json(body).into_response();
        *response.status_mut() = status;
        response
    }
}

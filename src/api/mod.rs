//! REST API layer: route handlers, DTOs, and router composition.
//!
//! All endpoints except the system ones are mounted under `/api/v1`.
//! Callers identify themselves with the [`CALLER_HEADER`] header; the
//! deployment is expected to authenticate it upstream.

pub mod dto;
pub mod handlers;
pub mod openapi;

use axum::Router;
use axum::http::HeaderMap;

use crate::app_state::AppState;
use crate::domain::Address;
use crate::error::GatewayError;

/// Header carrying the caller's address.
pub const CALLER_HEADER: &str = "x-caller";

/// Reads the caller's address from [`CALLER_HEADER`].
///
/// # Errors
///
/// Returns [`GatewayError::InvalidRequest`] if the header is missing or is
/// not a 20-byte hex address.
pub fn caller(headers: &HeaderMap) -> Result<Address, GatewayError> {
    let raw = headers
        .get(CALLER_HEADER)
        .ok_or_else(|| GatewayError::InvalidRequest(format!("missing {CALLER_HEADER} header")))?;
    let raw = raw
        .to_str()
        .map_err(|_| GatewayError::InvalidRequest(format!("{CALLER_HEADER} is not ASCII")))?;
    raw.trim()
        .parse()
        .map_err(|e| GatewayError::InvalidRequest(format!("{CALLER_HEADER}: {e}")))
}

/// Builds the complete API router with all REST endpoints.
pub fn build_router() -> Router<AppState> {
    let router = Router::new()
        .nest("/api/v1", handlers::routes())
        .merge(handlers::system::routes());
    openapi::mount(router)
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn caller_parses_hex_header() {
        let mut headers = HeaderMap::new();
        headers.insert(
            CALLER_HEADER,
            HeaderValue::from_static("0x00000000000000000000000000000000000000aa"),
        );
        let Ok(addr) = caller(&headers) else {
            panic!("header should parse");
        };
        assert_eq!(addr.to_string(), "0x00000000000000000000000000000000000000aa");
    }

    #[test]
    fn caller_rejects_missing_or_malformed_header() {
        assert!(matches!(
            caller(&HeaderMap::new()),
            Err(GatewayError::InvalidRequest(_))
        ));
        let mut headers = HeaderMap::new();
        headers.insert(CALLER_HEADER, HeaderValue::from_static("owner"));
        assert!(matches!(
            caller(&headers),
            Err(GatewayError::InvalidRequest(_))
        ));
    }
}

//! Service layer: the hook gateway itself.
//!
//! [`HookGateway`] owns the guest slots and ownership state, forwards the
//! ten lifecycle callbacks ([`router`]), sanitizes returned deltas
//! ([`sanitizer`]) and emits events through the
//! [`super::domain::EventBus`].

pub mod gateway_service;
pub mod router;
pub mod sanitizer;

pub use gateway_service::{DEFAULT_GUEST_CALL_TIMEOUT, GatewaySettings, HookGateway};
pub use sanitizer::DeltaPolicy;

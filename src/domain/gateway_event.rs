//! Notifications emitted by the gateway.
//!
//! Every registry mutation, fee forward and isolated guest failure emits a
//! [`GatewayEvent`] through the [`super::EventBus`]. Events are broadcast to
//! WebSocket subscribers and optionally persisted to the PostgreSQL event log.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{Address, CallbackKind, CapabilityMask, FailureClass, FeeMarker, PoolId};

/// Domain event emitted after a state change or an isolated failure.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum GatewayEvent {
    /// A guest was attached to a pool.
    GuestAttached {
        /// Pool identifier.
        pool_id: PoolId,
        /// Identity of the attached guest.
        guest: Address,
        /// Capabilities the guest declared.
        capabilities: CapabilityMask,
        /// Fee hint supplied with the attachment.
        fee_hint: FeeMarker,
        /// Attachment timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A pool's slot was cleared.
    GuestDetached {
        /// Pool identifier.
        pool_id: PoolId,
        /// Guest that occupied the slot, if any.
        guest: Option<Address>,
        /// Detachment timestamp.
        timestamp: DateTime<Utc>,
    },

    /// The attached guest changed its pool's dynamic fee.
    DynamicFeeUpdated {
        /// Pool identifier.
        pool_id: PoolId,
        /// Guest that requested the change.
        guest: Address,
        /// New LP fee in hundredths of a basis point.
        fee: u32,
        /// Update timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A guest failed on the exchange path and the failure was absorbed.
    GuestFailed {
        /// Pool identifier.
        pool_id: PoolId,
        /// Identity of the failing guest.
        guest: Address,
        /// Callback that failed.
        callback: CallbackKind,
        /// Classified failure payload.
        failure: FailureClass,
        /// Failure timestamp.
        timestamp: DateTime<Utc>,
    },
}

impl GatewayEvent {
    /// Returns the pool ID associated with this event.
    #[must_use]
    pub fn pool_id(&self) -> PoolId {
        match self {
            Self::GuestAttached { pool_id, .. }
            | Self::GuestDetached { pool_id, .. }
            | Self::DynamicFeeUpdated { pool_id, .. }
            | Self::GuestFailed { pool_id, .. } => *pool_id,
        }
    }

    /// Returns the event type as a static string slice.
    ///
    /// Failures are qualified by their classification.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::GuestAttached { .. } => "guest_attached",
            Self::GuestDetached { .. } => "guest_detached",
            Self::DynamicFeeUpdated { .. } => "dynamic_fee_updated",
            Self::GuestFailed { failure, .. } => match failure {
                FailureClass::Panic { .. } => "guest_failed_panic",
                FailureClass::Reported { .. } => "guest_failed_reported",
                FailureClass::Custom { .. } => "guest_failed_custom",
                FailureClass::Empty => "guest_failed_empty",
            },
        }
    }
}

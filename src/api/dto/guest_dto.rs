//! Guest slot DTOs: attach, detach, lookup and listing.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::common_dto::PaginationMeta;
use crate::domain::{Address, CapabilityMask, FeeMarker, GuestInfo, PoolId, PoolKey};

/// A guest reachable over HTTP.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RemoteGuestDto {
    /// Guest identity; its low bits encode the default capabilities.
    #[schema(value_type = String)]
    pub address: Address,
    /// Base URL receiving `POST /callbacks`.
    pub endpoint: String,
    /// Capability names overriding those encoded in `address`.
    #[serde(default)]
    #[schema(value_type = Option<Vec<String>>)]
    pub capabilities: Option<CapabilityMask>,
}

/// Request body for `POST /guests`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AttachGuestRequest {
    /// Pool receiving the guest.
    pub pool_key: PoolKey,
    /// Guest to attach.
    pub guest: RemoteGuestDto,
    /// `"dynamic"` or a fixed fee forwarded once on attachment.
    #[schema(value_type = Object)]
    pub fee_hint: FeeMarker,
}

/// Request body for `POST /guests/detach`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct DetachGuestRequest {
    /// Pool whose slot is cleared.
    pub pool_key: PoolKey,
}

/// Occupant of a guest slot.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GuestDto {
    /// Guest identity.
    #[schema(value_type = String)]
    pub address: Address,
    /// Capability names captured at attachment.
    #[schema(value_type = Vec<String>)]
    pub capabilities: CapabilityMask,
}

impl From<GuestInfo> for GuestDto {
    fn from(info: GuestInfo) -> Self {
        Self {
            address: info.address,
            capabilities: info.capabilities,
        }
    }
}

/// A pool's slot: the attached guest, if any.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct GuestSlotResponse {
    /// Pool identifier.
    #[schema(value_type = String)]
    pub pool_id: PoolId,
    /// Attached guest, `null` when the slot is empty.
    pub guest: Option<GuestDto>,
}

/// Response body for `GET /guests`.
#[derive(Debug, Serialize, ToSchema)]
pub struct GuestListResponse {
    /// Occupied slots on this page.
    pub data: Vec<GuestSlotResponse>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}

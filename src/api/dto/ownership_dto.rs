//! Ownership DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Address, Ownership};

/// Response body for the ownership endpoints.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct OwnershipResponse {
    /// Current owner.
    #[schema(value_type = String)]
    pub owner: Address,
    /// Proposed next owner, if a transfer is pending.
    #[schema(value_type = Option<String>)]
    pub pending_owner: Option<Address>,
}

impl From<Ownership> for OwnershipResponse {
    fn from(ownership: Ownership) -> Self {
        Self {
            owner: ownership.owner(),
            pending_owner: ownership.pending_owner(),
        }
    }
}

/// Request body for `POST /ownership/transfer`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct TransferOwnershipRequest {
    /// Proposed next owner.
    #[schema(value_type = String)]
    pub new_owner: Address,
}

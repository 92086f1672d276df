//! Dynamic fee DTOs.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{PoolId, PoolKey};

/// Request body for `POST /fees`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct UpdateFeeRequest {
    /// Pool whose fee changes.
    pub pool_key: PoolKey,
    /// New LP fee in hundredths of a basis point.
    pub fee: u32,
}

/// Response body for `POST /fees`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct UpdateFeeResponse {
    /// Pool identifier.
    #[schema(value_type = String)]
    pub pool_id: PoolId,
    /// Fee forwarded to the pool manager.
    pub fee: u32,
}

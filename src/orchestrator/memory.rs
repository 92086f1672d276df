//! In-process pool manager that records fee overrides.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{OrchestratorError, PoolManager};
use crate::domain::{MAX_LP_FEE, PoolId, PoolKey};

/// Pool manager keeping dynamic fees in memory.
///
/// Applies the same checks a real pool manager would: the pool must carry
/// the dynamic fee marker and the fee must not exceed [`MAX_LP_FEE`].
#[derive(Debug, Default)]
pub struct InMemoryPoolManager {
    fees: RwLock<HashMap<PoolId, u32>>,
}

impl InMemoryPoolManager {
    /// Creates a manager with no recorded fees.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the dynamic fee last set for `pool_id`.
    pub async fn fee_of(&self, pool_id: PoolId) -> Option<u32> {
        self.fees.read().await.get(&pool_id).copied()
    }
}

#[async_trait]
impl PoolManager for InMemoryPoolManager {
    async fn update_dynamic_lp_fee(&self, key: &PoolKey, fee: u32) -> Result<(), OrchestratorError> {
        if !key.fee.is_dynamic() {
            return Err(OrchestratorError::NotDynamicFee);
        }
        if fee > MAX_LP_FEE {
            return Err(OrchestratorError::FeeTooLarge(fee));
        }
        self.fees.write().await.insert(key.to_id(), fee);
        tracing::debug!(pool_id = %key.to_id(), fee, "dynamic lp fee recorded");
        Ok(())
    }
}

//! Single-guest-per-pool slot table.
//!
//! [`GuestRegistry`] maps each [`PoolId`] to at most one [`GuestHandle`].
//! A pool without an entry is an empty slot. Occupation is a single
//! check-and-insert under the write lock, so two concurrent attachments to
//! the same pool cannot both succeed.

use std::collections::HashMap;

use tokio::sync::RwLock;

use super::{Address, GuestHandle, GuestInfo, PoolId};
use crate::error::GatewayError;

/// Central store of guest slots.
///
/// # Concurrency
///
/// - Lookups from callback entry points take a read lock and clone the
///   handle out; no lock is held while a guest runs.
/// - Occupy and vacate take the write lock.
#[derive(Debug)]
pub struct GuestRegistry {
    slots: RwLock<HashMap<PoolId, GuestHandle>>,
}

impl GuestRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
        }
    }

    /// Places `guest` in the slot of `pool_id`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::PoolOccupied`] if the slot already holds a
    /// guest; the slot is left unchanged.
    pub async fn occupy(&self, pool_id: PoolId, guest: GuestHandle) -> Result<(), GatewayError> {
        let mut slots = self.slots.write().await;
        if slots.contains_key(&pool_id) {
            return Err(GatewayError::PoolOccupied(pool_id));
        }
        slots.insert(pool_id, guest);
        Ok(())
    }

    /// Clears the slot of `pool_id`, returning the guest it held.
    pub async fn vacate(&self, pool_id: PoolId) -> Option<GuestHandle> {
        self.slots.write().await.remove(&pool_id)
    }

    /// Clears the slot of `pool_id` only while it still holds `guest`.
    ///
    /// Compare and remove happen under one write lock, so a guest attached
    /// after `guest` left is never evicted.
    pub async fn vacate_if(&self, pool_id: PoolId, guest: Address) -> Option<GuestHandle> {
        let mut slots = self.slots.write().await;
        if slots.get(&pool_id).is_some_and(|held| held.id() == guest) {
            slots.remove(&pool_id)
        } else {
            None
        }
    }

    /// Returns the guest currently attached to `pool_id`.
    pub async fn get(&self, pool_id: PoolId) -> Option<GuestHandle> {
        self.slots.read().await.get(&pool_id).cloned()
    }

    /// Returns every occupied slot.
    pub async fn list(&self) -> Vec<(PoolId, GuestInfo)> {
        self.slots
            .read()
            .await
            .iter()
            .map(|(pool_id, handle)| (*pool_id, handle.info()))
            .collect()
    }

}

impl Default for GuestRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::*;
    use crate::domain::{CapabilityMask, Guest};

    #[derive(Debug)]
    struct Stub(Address);

    #[async_trait]
    impl Guest for Stub {
        fn identity(&self) -> Address {
            self.0
        }
    }

    fn handle(seed: u8) -> GuestHandle {
        GuestHandle::new(Arc::new(Stub(Address::with_capabilities(
            seed,
            CapabilityMask::BEFORE_SWAP,
        ))))
    }

    fn pool(seed: u8) -> PoolId {
        PoolId::from_bytes([seed; 32])
    }

    #[tokio::test]
    async fn occupy_and_get() {
        let registry = GuestRegistry::new();
        let guest = handle(1);

        assert!(registry.occupy(pool(1), guest.clone()).await.is_ok());

        let Some(found) = registry.get(pool(1)).await else {
            panic!("slot should be occupied");
        };
        assert_eq!(found.id(), guest.id());
    }

    #[tokio::test]
    async fn occupied_slot_rejects_second_guest() {
        let registry = GuestRegistry::new();
        let first = handle(1);
        let _ = registry.occupy(pool(1), first.clone()).await;

        let result = registry.occupy(pool(1), handle(2)).await;
        assert!(matches!(result, Err(GatewayError::PoolOccupied(_))));

        let Some(still) = registry.get(pool(1)).await else {
            panic!("slot should still be occupied");
        };
        assert_eq!(still.id(), first.id());
    }

    #[tokio::test]
    async fn vacate_clears_slot() {
        let registry = GuestRegistry::new();
        let _ = registry.occupy(pool(1), handle(1)).await;

        assert!(registry.vacate(pool(1)).await.is_some());
        assert!(registry.get(pool(1)).await.is_none());
        assert!(registry.vacate(pool(1)).await.is_none());
    }

    #[tokio::test]
    async fn list_reports_every_occupied_slot() {
        let registry = GuestRegistry::new();
        assert!(registry.list().await.is_empty());

        let _ = registry.occupy(pool(1), handle(1)).await;
        let _ = registry.occupy(pool(2), handle(1)).await;

        let mut pools: Vec<PoolId> = registry.list().await.into_iter().map(|(id, _)| id).collect();
        pools.sort();
        assert_eq!(pools, vec![pool(1), pool(2)]);
    }

    #[tokio::test]
    async fn vacate_if_spares_a_different_guest() {
        let registry = GuestRegistry::new();
        let first = handle(1);
        let second = handle(2);
        let _ = registry.occupy(pool(1), second.clone()).await;

        assert!(registry.vacate_if(pool(1), first.id()).await.is_none());
        let Some(still) = registry.get(pool(1)).await else {
            panic!("other guest must stay attached");
        };
        assert_eq!(still.id(), second.id());

        assert!(registry.vacate_if(pool(1), second.id()).await.is_some());
        assert!(registry.get(pool(1)).await.is_none());
    }
}

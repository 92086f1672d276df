//! Which gateway events a WebSocket client wants to see.

use std::collections::HashSet;

use crate::domain::{GatewayEvent, PoolId};

/// Event filter of one WebSocket connection.
///
/// A client either names individual pools or subscribes to every pool
/// with `"*"`. Named pools survive toggling the wildcard.
#[derive(Debug, Default)]
pub struct SubscriptionManager {
    pools: HashSet<PoolId>,
    wildcard: bool,
}

impl SubscriptionManager {
    /// A filter that lets nothing through.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `ids`; `wildcard` switches on every pool.
    pub fn subscribe(&mut self, ids: &[PoolId], wildcard: bool) {
        self.wildcard |= wildcard;
        self.pools.extend(ids.iter().copied());
    }

    /// Drops `ids`; `wildcard` switches the all-pools subscription off.
    pub fn unsubscribe(&mut self, ids: &[PoolId], wildcard: bool) {
        if wildcard {
            self.wildcard = false;
        }
        self.pools.retain(|id| !ids.contains(id));
    }

    /// Whether events of `pool_id` pass the filter.
    #[must_use]
    pub fn matches(&self, pool_id: PoolId) -> bool {
        self.wildcard || self.pools.contains(&pool_id)
    }

    /// Whether `event` should be pushed to the client.
    #[must_use]
    pub fn wants(&self, event: &GatewayEvent) -> bool {
        self.matches(event.pool_id())
    }

    /// Number of individually named pools.
    #[must_use]
    pub fn count(&self) -> usize {
        self.pools.len()
    }

    /// Whether the wildcard is on.
    #[must_use]
    pub fn is_subscribed_all(&self) -> bool {
        self.wildcard
    }
}

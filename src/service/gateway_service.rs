//! Hook gateway: registry mutation, access control and the guest boundary.

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use futures_util::FutureExt;
use tokio::sync::RwLock;

use super::sanitizer::DeltaPolicy;
use crate::domain::failure::PANIC_GENERIC;
use crate::domain::{
    Address, CallbackKind, CapabilityMask, EventBus, FeeMarker, GatewayEvent, GuestHandle,
    GuestInfo, GuestRegistry, GuestResult, GuestRevert, Ownership, PoolId, PoolKey,
};
use crate::error::GatewayError;
use crate::orchestrator::PoolManager;

/// Default budget for a single guest callback.
pub const DEFAULT_GUEST_CALL_TIMEOUT: Duration = Duration::from_millis(2_000);

/// Principals and policies fixed at construction.
#[derive(Debug, Clone, Copy)]
pub struct GatewaySettings {
    /// Identity of the gateway; must encode [`CapabilityMask::ALL`].
    pub address: Address,
    /// Initial owner.
    pub owner: Address,
    /// The only principal allowed to invoke callbacks.
    pub orchestrator: Address,
    /// Budget for a single guest callback.
    pub guest_call_timeout: Duration,
    /// Handling of unconsented positive deltas on the liquidity path.
    pub liquidity_delta_policy: DeltaPolicy,
}

impl GatewaySettings {
    /// Settings with default timeout and delta policy.
    #[must_use]
    pub fn new(address: Address, owner: Address, orchestrator: Address) -> Self {
        Self {
            address,
            owner,
            orchestrator,
            guest_call_timeout: DEFAULT_GUEST_CALL_TIMEOUT,
            liquidity_delta_policy: DeltaPolicy::default(),
        }
    }
}

/// Single-slot callback-forwarding gateway.
///
/// Holds one [`GuestRegistry`] slot per pool and forwards the ten
/// lifecycle callbacks from the orchestrator to whichever guest occupies
/// it. The callback entry points live in [`super::router`].
///
/// # Concurrency
///
/// Shared behind `Arc`. Registry and ownership each sit behind their own
/// lock; neither is held while a guest or the pool manager runs.
#[derive(Debug)]
pub struct HookGateway {
    settings: GatewaySettings,
    ownership: RwLock<Ownership>,
    registry: GuestRegistry,
    pool_manager: Arc<dyn PoolManager>,
    event_bus: EventBus,
}

impl HookGateway {
    /// Creates a gateway after checking its own identity.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidGatewayIdentity`] if
    /// `settings.address` does not encode every capability bit.
    pub fn new(
        settings: GatewaySettings,
        pool_manager: Arc<dyn PoolManager>,
        event_bus: EventBus,
    ) -> Result<Self, GatewayError> {
        if settings.address.capabilities() != CapabilityMask::ALL {
            return Err(GatewayError::InvalidGatewayIdentity(settings.address));
        }
        tracing::info!(
            gateway = %settings.address,
            owner = %settings.owner,
            orchestrator = %settings.orchestrator,
            "hook gateway constructed"
        );
        Ok(Self {
            ownership: RwLock::new(Ownership::new(settings.owner)),
            settings,
            registry: GuestRegistry::new(),
            pool_manager,
            event_bus,
        })
    }

    /// Identity of this gateway.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.settings.address
    }

    /// Identity of the orchestrator.
    #[must_use]
    pub const fn orchestrator(&self) -> Address {
        self.settings.orchestrator
    }

    /// Settings the gateway was built with.
    #[must_use]
    pub const fn settings(&self) -> &GatewaySettings {
        &self.settings
    }

    /// Returns a reference to the inner [`EventBus`].
    #[must_use]
    pub const fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Current ownership state.
    pub async fn ownership(&self) -> Ownership {
        *self.ownership.read().await
    }

    /// Attaches `guest` to the pool described by `key`.
    ///
    /// With a fixed `fee_hint` the fee is forwarded once to the pool
    /// manager; if that fails the slot is vacated again.
    ///
    /// # Errors
    ///
    /// - [`GatewayError::NotOwner`] if `caller` is not the owner.
    /// - [`GatewayError::InvalidPoolKey`] if the key does not target this
    ///   gateway, its currencies are unordered, or its fee is not dynamic.
    /// - [`GatewayError::InvalidGuestIdentity`] if the guest's capabilities
    ///   are inconsistent with `fee_hint`.
    /// - [`GatewayError::PoolOccupied`] if a guest is already attached.
    /// - [`GatewayError::Orchestrator`] if the fee forward fails.
    pub async fn attach(
        &self,
        caller: Address,
        key: &PoolKey,
        guest: GuestHandle,
        fee_hint: FeeMarker,
    ) -> Result<PoolId, GatewayError> {
        self.ensure_owner(caller).await?;
        self.check_key(key)?;
        check_guest(&guest, fee_hint)?;

        let pool_id = key.to_id();
        let guest_id = guest.id();
        let capabilities = guest.capabilities();
        self.registry.occupy(pool_id, guest).await?;

        if let FeeMarker::Fixed(fee) = fee_hint {
            if let Err(e) = self.pool_manager.update_dynamic_lp_fee(key, fee).await {
                if self.registry.vacate_if(pool_id, guest_id).await.is_some() {
                    tracing::warn!(%pool_id, guest = %guest_id, error = %e, "fee forward failed, attachment rolled back");
                } else {
                    tracing::warn!(%pool_id, guest = %guest_id, error = %e, "fee forward failed after the slot changed hands");
                }
                return Err(e.into());
            }
        }

        let _ = self.event_bus.publish(GatewayEvent::GuestAttached {
            pool_id,
            guest: guest_id,
            capabilities,
            fee_hint,
            timestamp: Utc::now(),
        });
        tracing::info!(%pool_id, guest = %guest_id, %capabilities, "guest attached");
        Ok(pool_id)
    }

    /// Clears the slot of the pool described by `key` and resets its
    /// dynamic fee to zero.
    ///
    /// The slot is cleared even if the fee reset fails. A key that could
    /// never have been attached is a no-op: nothing is reset or published.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::NotOwner`] if `caller` is not the owner, or
    /// [`GatewayError::Orchestrator`] if the fee reset fails.
    pub async fn detach(
        &self,
        caller: Address,
        key: &PoolKey,
    ) -> Result<Option<GuestInfo>, GatewayError> {
        self.ensure_owner(caller).await?;
        if let Err(e) = self.check_key(key) {
            tracing::debug!(pool_id = %key.to_id(), reason = %e, "detach of a key without a slot ignored");
            return Ok(None);
        }

        let pool_id = key.to_id();
        let previous = self.registry.vacate(pool_id).await.map(|h| h.info());
        let _ = self.event_bus.publish(GatewayEvent::GuestDetached {
            pool_id,
            guest: previous.map(|info| info.address),
            timestamp: Utc::now(),
        });
        tracing::info!(%pool_id, guest = ?previous.map(|info| info.address), "guest detached");

        self.pool_manager.update_dynamic_lp_fee(key, 0).await?;
        Ok(previous)
    }

    /// Returns the guest attached to `pool_id`.
    pub async fn guest_of(&self, pool_id: PoolId) -> Option<GuestHandle> {
        self.registry.get(pool_id).await
    }

    /// Returns every occupied slot.
    pub async fn attachments(&self) -> Vec<(PoolId, GuestInfo)> {
        self.registry.list().await
    }

    /// Forwards a dynamic fee change requested by the attached guest.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::NotGuestHook`] unless `caller` is the guest
    /// attached to this exact pool, or [`GatewayError::Orchestrator`] if
    /// the pool manager rejects the fee.
    pub async fn update_dynamic_fee(
        &self,
        caller: Address,
        key: &PoolKey,
        fee: u32,
    ) -> Result<(), GatewayError> {
        let pool_id = key.to_id();
        let attached = self.registry.get(pool_id).await.map(|h| h.id());
        if attached != Some(caller) {
            return Err(GatewayError::NotGuestHook(caller));
        }

        self.pool_manager.update_dynamic_lp_fee(key, fee).await?;
        let _ = self.event_bus.publish(GatewayEvent::DynamicFeeUpdated {
            pool_id,
            guest: caller,
            fee,
            timestamp: Utc::now(),
        });
        tracing::info!(%pool_id, guest = %caller, fee, "dynamic fee updated");
        Ok(())
    }

    /// Proposes `new_owner` as the next owner.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::NotOwner`] if `caller` is not the owner.
    pub async fn transfer_ownership(
        &self,
        caller: Address,
        new_owner: Address,
    ) -> Result<(), GatewayError> {
        self.ownership.write().await.transfer(caller, new_owner)?;
        tracing::info!(previous_owner = %caller, %new_owner, "OwnershipTransferStarted");
        Ok(())
    }

    /// Completes a pending ownership transfer.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::NotPendingOwner`] if `caller` is not the
    /// pending owner.
    pub async fn accept_ownership(&self, caller: Address) -> Result<(), GatewayError> {
        let previous = self.ownership.write().await.accept(caller)?;
        tracing::info!(previous_owner = %previous, new_owner = %caller, "OwnershipTransferred");
        Ok(())
    }

    async fn ensure_owner(&self, caller: Address) -> Result<(), GatewayError> {
        self.ownership.read().await.ensure_owner(caller)
    }

    /// Fails unless `caller` is the orchestrator.
    pub(crate) fn ensure_orchestrator(&self, caller: Address) -> Result<(), GatewayError> {
        if caller == self.settings.orchestrator {
            Ok(())
        } else {
            Err(GatewayError::NotPoolManager(caller))
        }
    }

    fn check_key(&self, key: &PoolKey) -> Result<(), GatewayError> {
        if key.hooks != self.settings.address {
            return Err(GatewayError::InvalidPoolKey(format!(
                "pool targets {} instead of this gateway",
                key.hooks
            )));
        }
        if key.currency0 >= key.currency1 {
            return Err(GatewayError::InvalidPoolKey(
                "currencies must be strictly ordered".to_string(),
            ));
        }
        if !key.fee.is_dynamic() {
            return Err(GatewayError::InvalidPoolKey(
                "gateway pools must use the dynamic fee marker".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns the guest of `key`'s pool if it declares `kind`'s bit.
    ///
    /// Reads the slot once; "no guest" and "lacks the bit" both yield
    /// `None`.
    pub(crate) async fn capable_guest(
        &self,
        key: &PoolKey,
        kind: CallbackKind,
    ) -> Option<GuestHandle> {
        self.registry
            .get(key.to_id())
            .await
            .filter(|guest| guest.can(kind.capability()))
    }

    /// Runs one guest callback inside the failure boundary.
    ///
    /// A panic inside the guest becomes a generic panic revert; exceeding
    /// the call budget becomes an empty revert.
    pub(crate) async fn invoke<T, F>(
        &self,
        guest: &GuestHandle,
        kind: CallbackKind,
        call: F,
    ) -> GuestResult<T>
    where
        F: Future<Output = GuestResult<T>> + Send,
    {
        let guarded = AssertUnwindSafe(call).catch_unwind();
        match tokio::time::timeout(self.settings.guest_call_timeout, guarded).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => {
                tracing::error!(guest = %guest.id(), callback = %kind, "guest panicked");
                Err(GuestRevert::panic(PANIC_GENERIC))
            }
            Err(_) => {
                tracing::warn!(
                    guest = %guest.id(),
                    callback = %kind,
                    budget = ?self.settings.guest_call_timeout,
                    "guest exceeded call budget"
                );
                Err(GuestRevert::empty())
            }
        }
    }

    /// Turns a guest failure on a propagating callback into an error.
    pub(crate) fn propagate(
        guest: &GuestHandle,
        kind: CallbackKind,
        revert: GuestRevert,
    ) -> GatewayError {
        tracing::warn!(guest = %guest.id(), callback = %kind, failure = %revert.classify(), "guest failure propagated");
        GatewayError::GuestReverted {
            guest: guest.id(),
            callback: kind,
            revert,
        }
    }

    /// Records an absorbed exchange-path failure.
    pub(crate) fn absorb(
        &self,
        pool_id: PoolId,
        guest: &GuestHandle,
        kind: CallbackKind,
        revert: &GuestRevert,
    ) {
        let failure = revert.classify();
        tracing::warn!(%pool_id, guest = %guest.id(), callback = %kind, %failure, "guest failure isolated");
        let _ = self.event_bus.publish(GatewayEvent::GuestFailed {
            pool_id,
            guest: guest.id(),
            callback: kind,
            failure,
            timestamp: Utc::now(),
        });
    }
}

/// Checks a guest's declared capabilities against the fee hint.
fn check_guest(guest: &GuestHandle, fee_hint: FeeMarker) -> Result<(), GatewayError> {
    let id = guest.id();
    if id.is_zero() {
        return Err(GatewayError::InvalidGuestIdentity(
            id,
            "guest identity is zero".to_string(),
        ));
    }
    for kind in CallbackKind::ALL {
        let claims_delta = kind
            .returns_delta_capability()
            .is_some_and(|bit| guest.can(bit));
        if claims_delta && !guest.can(kind.capability()) {
            return Err(GatewayError::InvalidGuestIdentity(
                id,
                format!("returns-delta bit of {kind} set without the callback bit"),
            ));
        }
    }
    if guest.capabilities().is_empty() && !fee_hint.is_dynamic() {
        return Err(GatewayError::InvalidGuestIdentity(
            id,
            "a guest without capabilities can only serve a dynamic fee".to_string(),
        ));
    }
    Ok(())
}

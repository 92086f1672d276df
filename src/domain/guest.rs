//! Guest extension modules.
//!
//! A [`Guest`] is untrusted code attached to at most one pool at a time. It
//! implements any subset of the ten callbacks; the subset it declares is its
//! [`CapabilityMask`], which by default is the mask encoded in its identity.
//! Unimplemented callbacks revert with `HookNotImplemented()`.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;

use super::{
    Address, AfterSwapReturn, BalanceDelta, BeforeSwapReturn, CapabilityMask, DonateCall,
    GuestRevert, InitializeCall, InitializedCall, LiquidityCall, LiquiditySettledCall, SwapCall,
    SwapSettledCall,
};

/// Result of a guest callback.
pub type GuestResult<T> = Result<T, GuestRevert>;

/// Callback contract implemented by guest modules.
#[async_trait]
pub trait Guest: Send + Sync + fmt::Debug {
    /// Identity of the guest.
    fn identity(&self) -> Address;

    /// Capabilities the guest declares.
    fn capabilities(&self) -> CapabilityMask {
        self.identity().capabilities()
    }

    /// Called before a pool is initialized.
    async fn before_initialize(&self, _call: &InitializeCall) -> GuestResult<()> {
        Err(GuestRevert::not_implemented())
    }

    /// Called after a pool is initialized.
    async fn after_initialize(&self, _call: &InitializedCall) -> GuestResult<()> {
        Err(GuestRevert::not_implemented())
    }

    /// Called before liquidity is added.
    async fn before_add_liquidity(&self, _call: &LiquidityCall) -> GuestResult<()> {
        Err(GuestRevert::not_implemented())
    }

    /// Called after liquidity is added; may return a delta.
    async fn after_add_liquidity(&self, _call: &LiquiditySettledCall) -> GuestResult<BalanceDelta> {
        Err(GuestRevert::not_implemented())
    }

    /// Called before liquidity is removed.
    async fn before_remove_liquidity(&self, _call: &LiquidityCall) -> GuestResult<()> {
        Err(GuestRevert::not_implemented())
    }

    /// Called after liquidity is removed; may return a delta.
    async fn after_remove_liquidity(
        &self,
        _call: &LiquiditySettledCall,
    ) -> GuestResult<BalanceDelta> {
        Err(GuestRevert::not_implemented())
    }

    /// Called before a swap; may return a delta and a fee override.
    async fn before_swap(&self, _call: &SwapCall) -> GuestResult<BeforeSwapReturn> {
        Err(GuestRevert::not_implemented())
    }

    /// Called after a swap; may return an unspecified-currency delta.
    async fn after_swap(&self, _call: &SwapSettledCall) -> GuestResult<AfterSwapReturn> {
        Err(GuestRevert::not_implemented())
    }

    /// Called before a donation.
    async fn before_donate(&self, _call: &DonateCall) -> GuestResult<()> {
        Err(GuestRevert::not_implemented())
    }

    /// Called after a donation.
    async fn after_donate(&self, _call: &DonateCall) -> GuestResult<()> {
        Err(GuestRevert::not_implemented())
    }
}

/// A guest as held in a pool's slot.
///
/// Identity and capabilities are captured once, at attachment, and never
/// re-read from the guest.
#[derive(Debug, Clone)]
pub struct GuestHandle {
    id: Address,
    capabilities: CapabilityMask,
    guest: Arc<dyn Guest>,
}

impl GuestHandle {
    /// Captures the identity and capabilities of `guest`.
    #[must_use]
    pub fn new(guest: Arc<dyn Guest>) -> Self {
        Self {
            id: guest.identity(),
            capabilities: guest.capabilities(),
            guest,
        }
    }

    /// Identity of the guest.
    #[must_use]
    pub const fn id(&self) -> Address {
        self.id
    }

    /// Capabilities captured at attachment.
    #[must_use]
    pub const fn capabilities(&self) -> CapabilityMask {
        self.capabilities
    }

    /// Returns `true` if the guest declares the given capability.
    #[must_use]
    pub const fn can(&self, capability: CapabilityMask) -> bool {
        self.capabilities.contains(capability)
    }

    /// The guest implementation.
    #[must_use]
    pub fn guest(&self) -> &dyn Guest {
        self.guest.as_ref()
    }

    /// Serializable summary of this handle.
    #[must_use]
    pub fn info(&self) -> GuestInfo {
        GuestInfo {
            address: self.id,
            capabilities: self.capabilities,
        }
    }
}

/// Serializable summary of an attached guest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GuestInfo {
    /// Guest identity.
    pub address: Address,
    /// Declared capabilities.
    pub capabilities: CapabilityMask,
}

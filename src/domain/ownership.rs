//! Two-phase ownership handoff.

use serde::Serialize;

use super::Address;
use crate::error::GatewayError;

/// Current owner plus an optional pending owner.
///
/// Ownership moves only when the pending owner accepts a transfer the
/// current owner proposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Ownership {
    owner: Address,
    pending_owner: Option<Address>,
}

impl Ownership {
    /// Creates ownership held by `owner` with no transfer pending.
    #[must_use]
    pub const fn new(owner: Address) -> Self {
        Self {
            owner,
            pending_owner: None,
        }
    }

    /// The current owner.
    #[must_use]
    pub const fn owner(&self) -> Address {
        self.owner
    }

    /// The proposed next owner, if a transfer is pending.
    #[must_use]
    pub const fn pending_owner(&self) -> Option<Address> {
        self.pending_owner
    }

    /// Fails unless `caller` is the current owner.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::NotOwner`].
    pub fn ensure_owner(&self, caller: Address) -> Result<(), GatewayError> {
        if caller == self.owner {
            Ok(())
        } else {
            Err(GatewayError::NotOwner(caller))
        }
    }

    /// Proposes `new_owner`; replaces any earlier proposal.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::NotOwner`] if `caller` is not the owner.
    pub fn transfer(&mut self, caller: Address, new_owner: Address) -> Result<(), GatewayError> {
        self.ensure_owner(caller)?;
        self.pending_owner = Some(new_owner);
        Ok(())
    }

    /// Completes a pending transfer, returning the previous owner.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::NotPendingOwner`] if `caller` is not the
    /// pending owner.
    pub fn accept(&mut self, caller: Address) -> Result<Address, GatewayError> {
        if self.pending_owner != Some(caller) {
            return Err(GatewayError::NotPendingOwner(caller));
        }
        let previous = self.owner;
        self.owner = caller;
        self.pending_owner = None;
        Ok(previous)
    }
}

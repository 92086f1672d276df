//! The ten orchestrator-facing callback entry points.
//!
//! Every entry point checks the caller, reads the pool's slot once and
//! either returns the default response or forwards to the guest. Deltas
//! pass through [`super::sanitizer`]. Guest failures on `before_swap` and
//! `after_swap` are absorbed and reported; on every other callback they
//! propagate.

use std::future::Future;

use super::HookGateway;
use super::sanitizer::{DeltaPolicy, sanitize};
use crate::domain::{
    Address, BalanceDelta, BeforeSwapDelta, Callback, CallbackKind, CallbackResponse, DonateCall,
    GuestHandle, GuestResult, InitializeCall, InitializedCall, LiquidityCall,
    LiquiditySettledCall, SwapCall, SwapSettledCall,
};
use crate::error::GatewayError;

impl HookGateway {
    /// Forwards `before_initialize`.
    ///
    /// # Errors
    ///
    /// [`GatewayError::NotPoolManager`] for any caller but the orchestrator,
    /// [`GatewayError::InvalidPoolKey`] if the pool's fee is not dynamic,
    /// [`GatewayError::GuestReverted`] if the guest fails.
    pub async fn before_initialize(
        &self,
        caller: Address,
        call: &InitializeCall,
    ) -> Result<CallbackKind, GatewayError> {
        const KIND: CallbackKind = CallbackKind::BeforeInitialize;
        self.ensure_orchestrator(caller)?;
        if !call.key.fee.is_dynamic() {
            return Err(GatewayError::InvalidPoolKey(
                "gateway pools must be initialized with the dynamic fee marker".to_string(),
            ));
        }
        let Some(guest) = self.capable_guest(&call.key, KIND).await else {
            return Ok(KIND);
        };
        self.forward(&guest, KIND, guest.guest().before_initialize(call))
            .await?;
        Ok(KIND)
    }

    /// Forwards `after_initialize`.
    ///
    /// # Errors
    ///
    /// [`GatewayError::NotPoolManager`] or [`GatewayError::GuestReverted`].
    pub async fn after_initialize(
        &self,
        caller: Address,
        call: &InitializedCall,
    ) -> Result<CallbackKind, GatewayError> {
        const KIND: CallbackKind = CallbackKind::AfterInitialize;
        self.ensure_orchestrator(caller)?;
        let Some(guest) = self.capable_guest(&call.key, KIND).await else {
            return Ok(KIND);
        };
        self.forward(&guest, KIND, guest.guest().after_initialize(call))
            .await?;
        Ok(KIND)
    }

    /// Forwards `before_add_liquidity`.
    ///
    /// # Errors
    ///
    /// [`GatewayError::NotPoolManager`] or [`GatewayError::GuestReverted`].
    pub async fn before_add_liquidity(
        &self,
        caller: Address,
        call: &LiquidityCall,
    ) -> Result<CallbackKind, GatewayError> {
        const KIND: CallbackKind = CallbackKind::BeforeAddLiquidity;
        self.ensure_orchestrator(caller)?;
        let Some(guest) = self.capable_guest(&call.key, KIND).await else {
            return Ok(KIND);
        };
        self.forward(&guest, KIND, guest.guest().before_add_liquidity(call))
            .await?;
        Ok(KIND)
    }

    /// Forwards `after_add_liquidity` and sanitizes the returned delta.
    ///
    /// # Errors
    ///
    /// [`GatewayError::NotPoolManager`], [`GatewayError::GuestReverted`], or
    /// [`GatewayError::InvalidHookDelta`] under [`DeltaPolicy::Reject`].
    pub async fn after_add_liquidity(
        &self,
        caller: Address,
        call: &LiquiditySettledCall,
    ) -> Result<(CallbackKind, BalanceDelta), GatewayError> {
        const KIND: CallbackKind = CallbackKind::AfterAddLiquidity;
        self.ensure_orchestrator(caller)?;
        let Some(guest) = self.capable_guest(&call.key, KIND).await else {
            return Ok((KIND, BalanceDelta::ZERO));
        };
        let delta = self
            .forward(&guest, KIND, guest.guest().after_add_liquidity(call))
            .await?;
        let delta = sanitize(
            KIND,
            delta,
            &call.hook_data,
            self.settings().liquidity_delta_policy,
        )?;
        Ok((KIND, delta))
    }

    /// Forwards `before_remove_liquidity`.
    ///
    /// # Errors
    ///
    /// [`GatewayError::NotPoolManager`] or [`GatewayError::GuestReverted`].
    pub async fn before_remove_liquidity(
        &self,
        caller: Address,
        call: &LiquidityCall,
    ) -> Result<CallbackKind, GatewayError> {
        const KIND: CallbackKind = CallbackKind::BeforeRemoveLiquidity;
        self.ensure_orchestrator(caller)?;
        let Some(guest) = self.capable_guest(&call.key, KIND).await else {
            return Ok(KIND);
        };
        self.forward(&guest, KIND, guest.guest().before_remove_liquidity(call))
            .await?;
        Ok(KIND)
    }

    /// Forwards `after_remove_liquidity` and sanitizes the returned delta.
    ///
    /// # Errors
    ///
    /// [`GatewayError::NotPoolManager`], [`GatewayError::GuestReverted`], or
    /// [`GatewayError::InvalidHookDelta`] under [`DeltaPolicy::Reject`].
    pub async fn after_remove_liquidity(
        &self,
        caller: Address,
        call: &LiquiditySettledCall,
    ) -> Result<(CallbackKind, BalanceDelta), GatewayError> {
        const KIND: CallbackKind = CallbackKind::AfterRemoveLiquidity;
        self.ensure_orchestrator(caller)?;
        let Some(guest) = self.capable_guest(&call.key, KIND).await else {
            return Ok((KIND, BalanceDelta::ZERO));
        };
        let delta = self
            .forward(&guest, KIND, guest.guest().after_remove_liquidity(call))
            .await?;
        let delta = sanitize(
            KIND,
            delta,
            &call.hook_data,
            self.settings().liquidity_delta_policy,
        )?;
        Ok((KIND, delta))
    }

    /// Forwards `before_swap`, absorbing any guest failure.
    ///
    /// Returns the ack, the sanitized delta and the LP fee override.
    ///
    /// # Errors
    ///
    /// [`GatewayError::NotPoolManager`] only.
    pub async fn before_swap(
        &self,
        caller: Address,
        call: &SwapCall,
    ) -> Result<(CallbackKind, BeforeSwapDelta, u32), GatewayError> {
        const KIND: CallbackKind = CallbackKind::BeforeSwap;
        self.ensure_orchestrator(caller)?;
        let Some(guest) = self.capable_guest(&call.key, KIND).await else {
            return Ok((KIND, BeforeSwapDelta::ZERO, 0));
        };
        match self.invoke(&guest, KIND, guest.guest().before_swap(call)).await {
            Ok(ret) => {
                let delta = sanitize(KIND, ret.delta, &call.hook_data, DeltaPolicy::Neutralize)?;
                Ok((KIND, delta, ret.fee_override))
            }
            Err(revert) => {
                self.absorb(call.key.to_id(), &guest, KIND, &revert);
                Ok((KIND, BeforeSwapDelta::ZERO, 0))
            }
        }
    }

    /// Forwards `after_swap`, absorbing any guest failure.
    ///
    /// # Errors
    ///
    /// [`GatewayError::NotPoolManager`] only.
    pub async fn after_swap(
        &self,
        caller: Address,
        call: &SwapSettledCall,
    ) -> Result<(CallbackKind, i128), GatewayError> {
        const KIND: CallbackKind = CallbackKind::AfterSwap;
        self.ensure_orchestrator(caller)?;
        let Some(guest) = self.capable_guest(&call.key, KIND).await else {
            return Ok((KIND, 0));
        };
        match self.invoke(&guest, KIND, guest.guest().after_swap(call)).await {
            Ok(ret) => {
                let delta = sanitize(KIND, ret.delta, &call.hook_data, DeltaPolicy::Neutralize)?;
                Ok((KIND, delta))
            }
            Err(revert) => {
                self.absorb(call.key.to_id(), &guest, KIND, &revert);
                Ok((KIND, 0))
            }
        }
    }

    /// Forwards `before_donate`.
    ///
    /// # Errors
    ///
    /// [`GatewayError::NotPoolManager`] or [`GatewayError::GuestReverted`].
    pub async fn before_donate(
        &self,
        caller: Address,
        call: &DonateCall,
    ) -> Result<CallbackKind, GatewayError> {
        const KIND: CallbackKind = CallbackKind::BeforeDonate;
        self.ensure_orchestrator(caller)?;
        let Some(guest) = self.capable_guest(&call.key, KIND).await else {
            return Ok(KIND);
        };
        self.forward(&guest, KIND, guest.guest().before_donate(call))
            .await?;
        Ok(KIND)
    }

    /// Forwards `after_donate`.
    ///
    /// # Errors
    ///
    /// [`GatewayError::NotPoolManager`] or [`GatewayError::GuestReverted`].
    pub async fn after_donate(
        &self,
        caller: Address,
        call: &DonateCall,
    ) -> Result<CallbackKind, GatewayError> {
        const KIND: CallbackKind = CallbackKind::AfterDonate;
        self.ensure_orchestrator(caller)?;
        let Some(guest) = self.capable_guest(&call.key, KIND).await else {
            return Ok(KIND);
        };
        self.forward(&guest, KIND, guest.guest().after_donate(call))
            .await?;
        Ok(KIND)
    }

    /// Routes a tagged [`Callback`] to its entry point.
    ///
    /// # Errors
    ///
    /// Whatever the selected entry point returns.
    pub async fn dispatch(
        &self,
        caller: Address,
        callback: &Callback,
    ) -> Result<CallbackResponse, GatewayError> {
        let response = match callback {
            Callback::BeforeInitialize(call) => CallbackResponse::Ack {
                ack: self.before_initialize(caller, call).await?,
            },
            Callback::AfterInitialize(call) => CallbackResponse::Ack {
                ack: self.after_initialize(caller, call).await?,
            },
            Callback::BeforeAddLiquidity(call) => CallbackResponse::Ack {
                ack: self.before_add_liquidity(caller, call).await?,
            },
            Callback::AfterAddLiquidity(call) => {
                let (ack, delta) = self.after_add_liquidity(caller, call).await?;
                CallbackResponse::Delta { ack, delta }
            }
            Callback::BeforeRemoveLiquidity(call) => CallbackResponse::Ack {
                ack: self.before_remove_liquidity(caller, call).await?,
            },
            Callback::AfterRemoveLiquidity(call) => {
                let (ack, delta) = self.after_remove_liquidity(caller, call).await?;
                CallbackResponse::Delta { ack, delta }
            }
            Callback::BeforeSwap(call) => {
                let (ack, delta, fee_override) = self.before_swap(caller, call).await?;
                CallbackResponse::BeforeSwap {
                    ack,
                    delta,
                    fee_override,
                }
            }
            Callback::AfterSwap(call) => {
                let (ack, delta) = self.after_swap(caller, call).await?;
                CallbackResponse::AfterSwap { ack, delta }
            }
            Callback::BeforeDonate(call) => CallbackResponse::Ack {
                ack: self.before_donate(caller, call).await?,
            },
            Callback::AfterDonate(call) => CallbackResponse::Ack {
                ack: self.after_donate(caller, call).await?,
            },
        };
        tracing::debug!(callback = %callback.kind(), pool_id = %callback.key().to_id(), "callback dispatched");
        Ok(response)
    }

    /// Invokes a guest on a callback whose failures propagate.
    async fn forward<T, F>(
        &self,
        guest: &GuestHandle,
        kind: CallbackKind,
        call: F,
    ) -> Result<T, GatewayError>
    where
        F: Future<Output = GuestResult<T>> + Send,
    {
        self.invoke(guest, kind, call)
            .await
            .map_err(|revert| Self::propagate(guest, kind, revert))
    }
}

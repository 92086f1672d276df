//! Callback kinds, their arguments, and their responses.
//!
//! The ten lifecycle callbacks are modelled three ways: [`CallbackKind`]
//! names one, the `*Call` structs carry its arguments, and [`Callback`] /
//! [`CallbackResponse`] are the tagged forms used on the wire.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::delta::as_string;
use super::{Address, BalanceDelta, BeforeSwapDelta, CapabilityMask, PoolKey};

/// One of the ten lifecycle callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CallbackKind {
    /// Before a pool is initialized.
    BeforeInitialize,
    /// After a pool is initialized.
    AfterInitialize,
    /// Before liquidity is added.
    BeforeAddLiquidity,
    /// After liquidity is added.
    AfterAddLiquidity,
    /// Before liquidity is removed.
    BeforeRemoveLiquidity,
    /// After liquidity is removed.
    AfterRemoveLiquidity,
    /// Before a swap.
    BeforeSwap,
    /// After a swap.
    AfterSwap,
    /// Before a donation.
    BeforeDonate,
    /// After a donation.
    AfterDonate,
}

impl CallbackKind {
    /// Every callback kind in lifecycle order.
    pub const ALL: [Self; 10] = [
        Self::BeforeInitialize,
        Self::AfterInitialize,
        Self::BeforeAddLiquidity,
        Self::AfterAddLiquidity,
        Self::BeforeRemoveLiquidity,
        Self::AfterRemoveLiquidity,
        Self::BeforeSwap,
        Self::AfterSwap,
        Self::BeforeDonate,
        Self::AfterDonate,
    ];

    /// Capability bit gating this callback.
    #[must_use]
    pub const fn capability(&self) -> CapabilityMask {
        match self {
            Self::BeforeInitialize => CapabilityMask::BEFORE_INITIALIZE,
            Self::AfterInitialize => CapabilityMask::AFTER_INITIALIZE,
            Self::BeforeAddLiquidity => CapabilityMask::BEFORE_ADD_LIQUIDITY,
            Self::AfterAddLiquidity => CapabilityMask::AFTER_ADD_LIQUIDITY,
            Self::BeforeRemoveLiquidity => CapabilityMask::BEFORE_REMOVE_LIQUIDITY,
            Self::AfterRemoveLiquidity => CapabilityMask::AFTER_REMOVE_LIQUIDITY,
            Self::BeforeSwap => CapabilityMask::BEFORE_SWAP,
            Self::AfterSwap => CapabilityMask::AFTER_SWAP,
            Self::BeforeDonate => CapabilityMask::BEFORE_DONATE,
            Self::AfterDonate => CapabilityMask::AFTER_DONATE,
        }
    }

    /// Returns-delta bit for the four callbacks that may return a delta.
    #[must_use]
    pub const fn returns_delta_capability(&self) -> Option<CapabilityMask> {
        match self {
            Self::AfterAddLiquidity => Some(CapabilityMask::AFTER_ADD_LIQUIDITY_RETURNS_DELTA),
            Self::AfterRemoveLiquidity => {
                Some(CapabilityMask::AFTER_REMOVE_LIQUIDITY_RETURNS_DELTA)
            }
            Self::BeforeSwap => Some(CapabilityMask::BEFORE_SWAP_RETURNS_DELTA),
            Self::AfterSwap => Some(CapabilityMask::AFTER_SWAP_RETURNS_DELTA),
            _ => None,
        }
    }

    /// Whether this callback runs on the exchange path.
    #[must_use]
    pub const fn is_exchange(&self) -> bool {
        matches!(self, Self::BeforeSwap | Self::AfterSwap)
    }

    /// Returns the callback name as a static string slice.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::BeforeInitialize => "before_initialize",
            Self::AfterInitialize => "after_initialize",
            Self::BeforeAddLiquidity => "before_add_liquidity",
            Self::AfterAddLiquidity => "after_add_liquidity",
            Self::BeforeRemoveLiquidity => "before_remove_liquidity",
            Self::AfterRemoveLiquidity => "after_remove_liquidity",
            Self::BeforeSwap => "before_swap",
            Self::AfterSwap => "after_swap",
            Self::BeforeDonate => "before_donate",
            Self::AfterDonate => "after_donate",
        }
    }
}

impl fmt::Display for CallbackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Opaque trailing payload supplied by the original caller.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HookData(#[serde(with = "super::hex_bytes")] Vec<u8>);

impl HookData {
    /// Wraps raw bytes.
    #[must_use]
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Hook data naming `principal`, i.e. consenting to its capabilities.
    #[must_use]
    pub fn consenting(principal: Address) -> Self {
        Self(principal.as_bytes().to_vec())
    }

    /// Returns the raw bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Capabilities the caller consents to.
    ///
    /// The payload is read as an address whose low bits name the granted
    /// capabilities; payloads shorter than an address grant nothing.
    #[must_use]
    pub fn consent(&self) -> CapabilityMask {
        Address::from_prefix(&self.0)
            .map(|addr| addr.capabilities())
            .unwrap_or(CapabilityMask::NONE)
    }
}

/// Position change requested on a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub struct ModifyLiquidityParams {
    /// Lower tick of the position.
    pub tick_lower: i32,
    /// Upper tick of the position.
    pub tick_upper: i32,
    /// Signed liquidity change (string-encoded i128).
    #[serde(with = "as_string")]
    #[schema(value_type = String)]
    pub liquidity_delta: i128,
}

/// Swap request on a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub struct SwapParams {
    /// Direction: currency0 in for currency1 out.
    pub zero_for_one: bool,
    /// Negative for exact-in, positive for exact-out (string-encoded i128).
    #[serde(with = "as_string")]
    #[schema(value_type = String)]
    pub amount_specified: i128,
    /// Price limit as a Q64.96 square root (string-encoded u128).
    #[serde(with = "as_string")]
    #[schema(value_type = String)]
    pub sqrt_price_limit_x96: u128,
}

/// Arguments of `before_initialize`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct InitializeCall {
    /// Principal that initiated the operation.
    #[schema(value_type = String)]
    pub sender: Address,
    /// Pool being initialized.
    pub key: PoolKey,
    /// Starting price as a Q64.96 square root.
    #[serde(with = "as_string")]
    #[schema(value_type = String)]
    pub sqrt_price_x96: u128,
}

/// Arguments of `after_initialize`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct InitializedCall {
    /// Principal that initiated the operation.
    #[schema(value_type = String)]
    pub sender: Address,
    /// Pool that was initialized.
    pub key: PoolKey,
    /// Starting price as a Q64.96 square root.
    #[serde(with = "as_string")]
    #[schema(value_type = String)]
    pub sqrt_price_x96: u128,
    /// Tick matching the starting price.
    pub tick: i32,
}

/// Arguments of `before_add_liquidity` and `before_remove_liquidity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LiquidityCall {
    /// Principal that initiated the operation.
    #[schema(value_type = String)]
    pub sender: Address,
    /// Target pool.
    pub key: PoolKey,
    /// Requested position change.
    pub params: ModifyLiquidityParams,
    /// Trailing caller payload.
    #[serde(default)]
    #[schema(value_type = String)]
    pub hook_data: HookData,
}

/// Arguments of `after_add_liquidity` and `after_remove_liquidity`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct LiquiditySettledCall {
    /// Principal that initiated the operation.
    #[schema(value_type = String)]
    pub sender: Address,
    /// Target pool.
    pub key: PoolKey,
    /// Applied position change.
    pub params: ModifyLiquidityParams,
    /// Caller delta of the operation.
    pub delta: BalanceDelta,
    /// Fees accrued by the position.
    pub fees_accrued: BalanceDelta,
    /// Trailing caller payload.
    #[serde(default)]
    #[schema(value_type = String)]
    pub hook_data: HookData,
}

/// Arguments of `before_swap`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SwapCall {
    /// Principal that initiated the operation.
    #[schema(value_type = String)]
    pub sender: Address,
    /// Target pool.
    pub key: PoolKey,
    /// Requested swap.
    pub params: SwapParams,
    /// Trailing caller payload.
    #[serde(default)]
    #[schema(value_type = String)]
    pub hook_data: HookData,
}

/// Arguments of `after_swap`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SwapSettledCall {
    /// Principal that initiated the operation.
    #[schema(value_type = String)]
    pub sender: Address,
    /// Target pool.
    pub key: PoolKey,
    /// Executed swap.
    pub params: SwapParams,
    /// Caller delta of the swap.
    pub delta: BalanceDelta,
    /// Trailing caller payload.
    #[serde(default)]
    #[schema(value_type = String)]
    pub hook_data: HookData,
}

/// Arguments of `before_donate` and `after_donate`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DonateCall {
    /// Principal that initiated the operation.
    #[schema(value_type = String)]
    pub sender: Address,
    /// Target pool.
    pub key: PoolKey,
    /// Donated amount of currency0 (string-encoded u128).
    #[serde(with = "as_string")]
    #[schema(value_type = String)]
    pub amount0: u128,
    /// Donated amount of currency1 (string-encoded u128).
    #[serde(with = "as_string")]
    #[schema(value_type = String)]
    pub amount1: u128,
    /// Trailing caller payload.
    #[serde(default)]
    #[schema(value_type = String)]
    pub hook_data: HookData,
}

/// What a guest returns from `before_swap`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BeforeSwapReturn {
    /// Delta the guest applies ahead of the swap.
    pub delta: BeforeSwapDelta,
    /// LP fee override for this swap; zero keeps the pool fee.
    #[serde(default)]
    pub fee_override: u32,
}

/// What a guest returns from `after_swap`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AfterSwapReturn {
    /// Delta of the unspecified currency (string-encoded i128).
    #[serde(with = "as_string")]
    pub delta: i128,
}

/// A callback together with its arguments, tagged by kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "callback", rename_all = "snake_case")]
pub enum Callback {
    /// See [`CallbackKind::BeforeInitialize`].
    BeforeInitialize(InitializeCall),
    /// See [`CallbackKind::AfterInitialize`].
    AfterInitialize(InitializedCall),
    /// See [`CallbackKind::BeforeAddLiquidity`].
    BeforeAddLiquidity(LiquidityCall),
    /// See [`CallbackKind::AfterAddLiquidity`].
    AfterAddLiquidity(LiquiditySettledCall),
    /// See [`CallbackKind::BeforeRemoveLiquidity`].
    BeforeRemoveLiquidity(LiquidityCall),
    /// See [`CallbackKind::AfterRemoveLiquidity`].
    AfterRemoveLiquidity(LiquiditySettledCall),
    /// See [`CallbackKind::BeforeSwap`].
    BeforeSwap(SwapCall),
    /// See [`CallbackKind::AfterSwap`].
    AfterSwap(SwapSettledCall),
    /// See [`CallbackKind::BeforeDonate`].
    BeforeDonate(DonateCall),
    /// See [`CallbackKind::AfterDonate`].
    AfterDonate(DonateCall),
}

impl Callback {
    /// Returns the kind of this callback.
    #[must_use]
    pub const fn kind(&self) -> CallbackKind {
        match self {
            Self::BeforeInitialize(_) => CallbackKind::BeforeInitialize,
            Self::AfterInitialize(_) => CallbackKind::AfterInitialize,
            Self::BeforeAddLiquidity(_) => CallbackKind::BeforeAddLiquidity,
            Self::AfterAddLiquidity(_) => CallbackKind::AfterAddLiquidity,
            Self::BeforeRemoveLiquidity(_) => CallbackKind::BeforeRemoveLiquidity,
            Self::AfterRemoveLiquidity(_) => CallbackKind::AfterRemoveLiquidity,
            Self::BeforeSwap(_) => CallbackKind::BeforeSwap,
            Self::AfterSwap(_) => CallbackKind::AfterSwap,
            Self::BeforeDonate(_) => CallbackKind::BeforeDonate,
            Self::AfterDonate(_) => CallbackKind::AfterDonate,
        }
    }

    /// Returns the pool this callback targets.
    #[must_use]
    pub const fn key(&self) -> &PoolKey {
        match self {
            Self::BeforeInitialize(call) => &call.key,
            Self::AfterInitialize(call) => &call.key,
            Self::BeforeAddLiquidity(call) | Self::BeforeRemoveLiquidity(call) => &call.key,
            Self::AfterAddLiquidity(call) | Self::AfterRemoveLiquidity(call) => &call.key,
            Self::BeforeSwap(call) => &call.key,
            Self::AfterSwap(call) => &call.key,
            Self::BeforeDonate(call) | Self::AfterDonate(call) => &call.key,
        }
    }
}

/// Response relayed to the orchestrator, tagged by shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum CallbackResponse {
    /// Plain acknowledgment.
    Ack {
        /// Acknowledged callback.
        ack: CallbackKind,
    },
    /// Acknowledgment plus a balance delta.
    Delta {
        /// Acknowledged callback.
        ack: CallbackKind,
        /// Sanitized delta.
        delta: BalanceDelta,
    },
    /// Acknowledgment of `before_swap`.
    BeforeSwap {
        /// Acknowledged callback.
        ack: CallbackKind,
        /// Sanitized delta.
        delta: BeforeSwapDelta,
        /// LP fee override; zero keeps the pool fee.
        fee_override: u32,
    },
    /// Acknowledgment of `after_swap`.
    AfterSwap {
        /// Acknowledged callback.
        ack: CallbackKind,
        /// Sanitized unspecified-currency delta (string-encoded i128).
        #[serde(with = "as_string")]
        #[schema(value_type = String)]
        delta: i128,
    },
}

impl CallbackResponse {
    /// Returns the acknowledged callback.
    #[must_use]
    pub const fn ack(&self) -> CallbackKind {
        match self {
            Self::Ack { ack }
            | Self::Delta { ack, .. }
            | Self::BeforeSwap { ack, .. }
            | Self::AfterSwap { ack, .. } => *ack,
        }
    }
}

//! Explicit-consent handling of guest-returned deltas.
//!
//! A guest may always give value back (zero or negative components). It may
//! keep a positive component only when the caller's [`HookData`] names the
//! callback's returns-delta capability. Anything else is neutralized or
//! rejected according to the [`DeltaPolicy`] of the callback family.

use std::str::FromStr;

use serde::Serialize;

use crate::domain::{BalanceDelta, BeforeSwapDelta, CallbackKind, HookData};
use crate::error::GatewayError;

/// What to do with a positive delta the caller did not consent to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DeltaPolicy {
    /// Zero the positive components and continue.
    #[default]
    Neutralize,
    /// Fail the call with [`GatewayError::InvalidHookDelta`].
    Reject,
}

impl FromStr for DeltaPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "neutralize" => Ok(Self::Neutralize),
            "reject" => Ok(Self::Reject),
            other => Err(format!("expected 'neutralize' or 'reject', got '{other}'")),
        }
    }
}

/// A delta whose positive components can be detected and dropped.
pub trait Sanitizable: Copy {
    /// Returns `true` if any component extracts value.
    fn has_positive(&self) -> bool;

    /// Returns a copy with every positive component set to zero.
    #[must_use]
    fn without_positive(&self) -> Self;
}

impl Sanitizable for BalanceDelta {
    fn has_positive(&self) -> bool {
        BalanceDelta::has_positive(self)
    }

    fn without_positive(&self) -> Self {
        BalanceDelta::without_positive(self)
    }
}

impl Sanitizable for BeforeSwapDelta {
    fn has_positive(&self) -> bool {
        BeforeSwapDelta::has_positive(self)
    }

    fn without_positive(&self) -> Self {
        BeforeSwapDelta::without_positive(self)
    }
}

impl Sanitizable for i128 {
    fn has_positive(&self) -> bool {
        *self > 0
    }

    fn without_positive(&self) -> Self {
        (*self).min(0)
    }
}

/// Returns `true` if `hook_data` consents to `kind` returning a delta.
#[must_use]
pub fn consented(kind: CallbackKind, hook_data: &HookData) -> bool {
    kind.returns_delta_capability()
        .is_some_and(|bit| hook_data.consent().contains(bit))
}

/// Applies the consent rule to a delta returned from `kind`.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidHookDelta`] when the delta has an
/// unconsented positive component and `policy` is [`DeltaPolicy::Reject`].
pub fn sanitize<D: Sanitizable>(
    kind: CallbackKind,
    delta: D,
    hook_data: &HookData,
    policy: DeltaPolicy,
) -> Result<D, GatewayError> {
    if !delta.has_positive() || consented(kind, hook_data) {
        return Ok(delta);
    }
    match policy {
        DeltaPolicy::Neutralize => {
            tracing::warn!(callback = %kind, "positive guest delta neutralized without caller consent");
            Ok(delta.without_positive())
        }
        DeltaPolicy::Reject => {
            tracing::warn!(callback = %kind, "positive guest delta rejected without caller consent");
            Err(GatewayError::InvalidHookDelta(kind))
        }
    }
}

//! Signed value deltas a callback may return.
//!
//! Deltas are expressed from the guest's point of view: a positive component
//! is value the guest takes out of the operation, a negative component is
//! value the guest gives back. All 128-bit amounts serialize as decimal
//! strings to preserve precision in JSON.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Serde adapter encoding a number as its decimal string.
pub mod as_string {
    use std::fmt::Display;
    use std::str::FromStr;

    use serde::{Deserialize, Deserializer, Serializer};

    /// Serializes `value` with its `Display` implementation.
    ///
    /// # Errors
    ///
    /// Propagates serializer errors.
    pub fn serialize<T: Display, S: Serializer>(value: &T, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(value)
    }

    /// Parses a value from a decimal string.
    ///
    /// # Errors
    ///
    /// Fails when the input is not a string or does not parse as `T`.
    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
    where
        T: FromStr,
        T::Err: Display,
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Per-currency delta of a pool operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub struct BalanceDelta {
    /// Delta of `currency0` (string-encoded i128).
    #[serde(with = "as_string")]
    #[schema(value_type = String)]
    pub amount0: i128,
    /// Delta of `currency1` (string-encoded i128).
    #[serde(with = "as_string")]
    #[schema(value_type = String)]
    pub amount1: i128,
}

impl BalanceDelta {
    /// The zero delta.
    pub const ZERO: Self = Self {
        amount0: 0,
        amount1: 0,
    };

    /// Creates a delta from its two components.
    #[must_use]
    pub const fn new(amount0: i128, amount1: i128) -> Self {
        Self { amount0, amount1 }
    }

    /// Returns `true` if any component extracts value.
    #[must_use]
    pub const fn has_positive(&self) -> bool {
        self.amount0 > 0 || self.amount1 > 0
    }

    /// Returns a copy with every positive component set to zero.
    #[must_use]
    pub fn without_positive(&self) -> Self {
        Self {
            amount0: self.amount0.min(0),
            amount1: self.amount1.min(0),
        }
    }
}

/// Delta returned before a swap, split by the swap's specified and
/// unspecified currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
pub struct BeforeSwapDelta {
    /// Delta of the specified currency (string-encoded i128).
    #[serde(with = "as_string")]
    #[schema(value_type = String)]
    pub specified: i128,
    /// Delta of the unspecified currency (string-encoded i128).
    #[serde(with = "as_string")]
    #[schema(value_type = String)]
    pub unspecified: i128,
}

impl BeforeSwapDelta {
    /// The zero delta.
    pub const ZERO: Self = Self {
        specified: 0,
        unspecified: 0,
    };

    /// Creates a delta from its two components.
    #[must_use]
    pub const fn new(specified: i128, unspecified: i128) -> Self {
        Self {
            specified,
            unspecified,
        }
    }

    /// Returns `true` if any component extracts value.
    #[must_use]
    pub const fn has_positive(&self) -> bool {
        self.specified > 0 || self.unspecified > 0
    }

    /// Returns a copy with every positive component set to zero.
    #[must_use]
    pub fn without_positive(&self) -> Self {
        Self {
            specified: self.specified.min(0),
            unspecified: self.unspecified.min(0),
        }
    }
}

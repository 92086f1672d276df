//! Principal identity.
//!
//! [`Address`] is a 20-byte opaque identifier used for every principal the
//! gateway deals with: its own identity, the owner, the orchestrator, guest
//! modules, and pool currencies. The low-order bits of an address encode the
//! principal's capability mask (see [`super::CapabilityMask`]).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::CapabilityMask;

/// Length of an address in bytes.
pub const ADDRESS_LEN: usize = 20;

/// A 20-byte principal identity rendered as `0x`-prefixed hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    /// The all-zero address.
    pub const ZERO: Self = Self([0u8; ADDRESS_LEN]);

    /// Creates an address from raw bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Reads an address from the first 20 bytes of `data`.
    ///
    /// Returns `None` when fewer than 20 bytes are available.
    #[must_use]
    pub fn from_prefix(data: &[u8]) -> Option<Self> {
        let prefix = data.get(..ADDRESS_LEN)?;
        let bytes: [u8; ADDRESS_LEN] = prefix.try_into().ok()?;
        Some(Self(bytes))
    }

    /// Returns the raw bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// Returns `true` for the all-zero address.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Builds an address filled with `seed` whose low-order bits encode
    /// exactly `mask`.
    #[must_use]
    pub fn with_capabilities(seed: u8, mask: CapabilityMask) -> Self {
        let mut bytes = [seed; ADDRESS_LEN];
        let [hi, lo] = mask.bits().to_be_bytes();
        if let Some(tail) = bytes.get_mut(ADDRESS_LEN - 2..) {
            tail.copy_from_slice(&[hi, lo]);
        }
        Self(bytes)
    }

    /// Returns the capability mask encoded in the low-order bits.
    #[must_use]
    pub fn capabilities(&self) -> CapabilityMask {
        let [.., hi, lo] = self.0;
        CapabilityMask::from_bits_truncate(u16::from_be_bytes([hi, lo]))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// Error returned when parsing an [`Address`] from text fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid address '{0}': expected 0x followed by 40 hex digits")]
pub struct ParseAddressError(pub String);

impl FromStr for Address {
    type Err = ParseAddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let mut bytes = [0u8; ADDRESS_LEN];
        hex::decode_to_slice(digits, &mut bytes).map_err(|_| ParseAddressError(s.to_string()))?;
        Ok(Self(bytes))
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

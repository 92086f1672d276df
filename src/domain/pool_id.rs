//! Type-safe pool identifier.
//!
//! [`PoolId`] is a newtype wrapper around a 32-byte SHA-256 digest of a
//! [`PoolKey`]'s canonical encoding, so identifiers cannot be confused with
//! other hashes or addresses.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

use super::PoolKey;

/// Deterministic identifier of a pool.
///
/// Derived once from the immutable [`PoolKey`] and never mutated. Used as the
/// dictionary key in [`super::GuestRegistry`], event discriminator, and
/// WebSocket subscription target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PoolId([u8; 32]);

impl PoolId {
    /// Computes the identifier of the given pool descriptor.
    #[must_use]
    pub fn from_key(key: &PoolKey) -> Self {
        Self(Sha256::digest(key.encode()).into())
    }

    /// Creates a `PoolId` from raw digest bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    /// Returns the raw digest bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for PoolId {
    type Err = hex::FromHexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut bytes = [0u8; 32];
        hex::decode_to_slice(s.strip_prefix("0x").unwrap_or(s), &mut bytes)?;
        Ok(Self(bytes))
    }
}

impl Serialize for PoolId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PoolId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

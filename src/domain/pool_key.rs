//! Immutable pool descriptor and fee marker.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use utoipa::ToSchema;

use super::{Address, PoolId};

/// Raw fee value marking a pool whose LP fee is set at runtime.
pub const DYNAMIC_FEE_FLAG: u32 = 0x80_0000;

/// Largest LP fee, in hundredths of a basis point (100%).
pub const MAX_LP_FEE: u32 = 1_000_000;

/// Fee marker of a pool: a concrete fee or the dynamic sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeeMarker {
    /// Fixed LP fee in hundredths of a basis point.
    Fixed(u32),
    /// LP fee is managed at runtime through the gateway.
    Dynamic,
}

impl FeeMarker {
    /// Decodes the raw on-wire fee value.
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        if raw == DYNAMIC_FEE_FLAG {
            Self::Dynamic
        } else {
            Self::Fixed(raw)
        }
    }

    /// Encodes the marker as its raw fee value.
    #[must_use]
    pub const fn raw(&self) -> u32 {
        match self {
            Self::Fixed(fee) => *fee,
            Self::Dynamic => DYNAMIC_FEE_FLAG,
        }
    }

    /// Returns `true` for the dynamic sentinel.
    #[must_use]
    pub const fn is_dynamic(&self) -> bool {
        matches!(self, Self::Dynamic)
    }
}

impl Serialize for FeeMarker {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Fixed(fee) => serializer.serialize_u32(*fee),
            Self::Dynamic => serializer.serialize_str("dynamic"),
        }
    }
}

impl<'de> Deserialize<'de> for FeeMarker {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Fee(u32),
            Name(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Fee(fee) => Ok(Self::from_raw(fee)),
            Raw::Name(name) if name == "dynamic" => Ok(Self::Dynamic),
            Raw::Name(other) => Err(serde::de::Error::custom(format!(
                "invalid fee marker '{other}': expected a number or \"dynamic\""
            ))),
        }
    }
}

/// Immutable descriptor identifying a pool.
///
/// Owned by the orchestrator; the gateway only reads it to derive the
/// [`PoolId`] and to check that it names this gateway as its callback
/// target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct PoolKey {
    /// Lower-ordered currency of the pair.
    #[schema(value_type = String)]
    pub currency0: Address,
    /// Higher-ordered currency of the pair.
    #[schema(value_type = String)]
    pub currency1: Address,
    /// Fixed fee or the dynamic sentinel.
    #[schema(value_type = Object)]
    pub fee: FeeMarker,
    /// Tick granularity.
    pub tick_spacing: i32,
    /// Callback target of the pool; must be this gateway.
    #[schema(value_type = String)]
    pub hooks: Address,
}

impl PoolKey {
    /// Canonical byte encoding hashed into the [`PoolId`].
    #[must_use]
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(68);
        out.extend_from_slice(self.currency0.as_bytes());
        out.extend_from_slice(self.currency1.as_bytes());
        out.extend_from_slice(&self.fee.raw().to_be_bytes());
        out.extend_from_slice(&self.tick_spacing.to_be_bytes());
        out.extend_from_slice(self.hooks.as_bytes());
        out
    }

    /// Derives the pool identifier.
    #[must_use]
    pub fn to_id(&self) -> PoolId {
        PoolId::from_key(self)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn key_with(fee: FeeMarker, hooks: Address) -> PoolKey {
        PoolKey {
            currency0: Address::from_bytes([1u8; 20]),
            currency1: Address::from_bytes([2u8; 20]),
            fee,
            tick_spacing: 60,
            hooks,
        }
    }

    #[test]
    fn raw_round_trip() {
        assert_eq!(FeeMarker::from_raw(DYNAMIC_FEE_FLAG), FeeMarker::Dynamic);
        assert_eq!(FeeMarker::from_raw(3000), FeeMarker::Fixed(3000));
        assert_eq!(FeeMarker::Dynamic.raw(), DYNAMIC_FEE_FLAG);
    }

    #[test]
    fn fee_marker_serde_accepts_name_and_number() {
        let dynamic: Result<FeeMarker, _> = serde_json::from_str("\"dynamic\"");
        assert_eq!(dynamic.ok(), Some(FeeMarker::Dynamic));
        let fixed: Result<FeeMarker, _> = serde_json::from_str("500");
        assert_eq!(fixed.ok(), Some(FeeMarker::Fixed(500)));
        let raw_flag: Result<FeeMarker, _> = serde_json::from_str("8388608");
        assert_eq!(raw_flag.ok(), Some(FeeMarker::Dynamic));
        let bad: Result<FeeMarker, _> = serde_json::from_str("\"static\"");
        assert!(bad.is_err());
    }

    #[test]
    fn encoding_is_sixty_eight_bytes() {
        let key = key_with(FeeMarker::Dynamic, Address::ZERO);
        assert_eq!(key.encode().len(), 68);
    }

    #[test]
    fn id_depends_on_every_field() {
        let base = key_with(FeeMarker::Dynamic, Address::ZERO);
        let mut other = base;
        other.tick_spacing = 10;
        assert_ne!(base.to_id(), other.to_id());

        let mut other = base;
        other.fee = FeeMarker::Fixed(3000);
        assert_ne!(base.to_id(), other.to_id());

        assert_eq!(base.to_id(), base.to_id());
    }
}

//! Capability bit set.
//!
//! Ten bits name the lifecycle callbacks a principal implements; four more
//! name the callbacks whose returned value delta a principal may ask to keep.
//! Both the gateway and every guest carry a mask, normally the one encoded in
//! the low 14 bits of their [`super::Address`].

use std::fmt;
use std::ops::BitOr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Fixed-width set over the fourteen capability bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CapabilityMask(u16);

impl CapabilityMask {
    /// Forwarded before a pool is initialized.
    pub const BEFORE_INITIALIZE: Self = Self(1 << 13);
    /// Forwarded after a pool is initialized.
    pub const AFTER_INITIALIZE: Self = Self(1 << 12);
    /// Forwarded before liquidity is added.
    pub const BEFORE_ADD_LIQUIDITY: Self = Self(1 << 11);
    /// Forwarded after liquidity is added.
    pub const AFTER_ADD_LIQUIDITY: Self = Self(1 << 10);
    /// Forwarded before liquidity is removed.
    pub const BEFORE_REMOVE_LIQUIDITY: Self = Self(1 << 9);
    /// Forwarded after liquidity is removed.
    pub const AFTER_REMOVE_LIQUIDITY: Self = Self(1 << 8);
    /// Forwarded before a swap.
    pub const BEFORE_SWAP: Self = Self(1 << 7);
    /// Forwarded after a swap.
    pub const AFTER_SWAP: Self = Self(1 << 6);
    /// Forwarded before a donation.
    pub const BEFORE_DONATE: Self = Self(1 << 5);
    /// Forwarded after a donation.
    pub const AFTER_DONATE: Self = Self(1 << 4);
    /// The before-swap delta may be kept.
    pub const BEFORE_SWAP_RETURNS_DELTA: Self = Self(1 << 3);
    /// The after-swap delta may be kept.
    pub const AFTER_SWAP_RETURNS_DELTA: Self = Self(1 << 2);
    /// The after-add-liquidity delta may be kept.
    pub const AFTER_ADD_LIQUIDITY_RETURNS_DELTA: Self = Self(1 << 1);
    /// The after-remove-liquidity delta may be kept.
    pub const AFTER_REMOVE_LIQUIDITY_RETURNS_DELTA: Self = Self(1);

    /// The empty set.
    pub const NONE: Self = Self(0);
    /// Every capability bit.
    pub const ALL: Self = Self((1 << 14) - 1);

    /// Canonical names for every bit, highest bit first.
    pub const NAMED: [(&'static str, Self); 14] = [
        ("before_initialize", Self::BEFORE_INITIALIZE),
        ("after_initialize", Self::AFTER_INITIALIZE),
        ("before_add_liquidity", Self::BEFORE_ADD_LIQUIDITY),
        ("after_add_liquidity", Self::AFTER_ADD_LIQUIDITY),
        ("before_remove_liquidity", Self::BEFORE_REMOVE_LIQUIDITY),
        ("after_remove_liquidity", Self::AFTER_REMOVE_LIQUIDITY),
        ("before_swap", Self::BEFORE_SWAP),
        ("after_swap", Self::AFTER_SWAP),
        ("before_donate", Self::BEFORE_DONATE),
        ("after_donate", Self::AFTER_DONATE),
        ("before_swap_returns_delta", Self::BEFORE_SWAP_RETURNS_DELTA),
        ("after_swap_returns_delta", Self::AFTER_SWAP_RETURNS_DELTA),
        (
            "after_add_liquidity_returns_delta",
            Self::AFTER_ADD_LIQUIDITY_RETURNS_DELTA,
        ),
        (
            "after_remove_liquidity_returns_delta",
            Self::AFTER_REMOVE_LIQUIDITY_RETURNS_DELTA,
        ),
    ];

    /// Builds a mask from raw bits, dropping anything above bit 13.
    #[must_use]
    pub const fn from_bits_truncate(bits: u16) -> Self {
        Self(bits & Self::ALL.0)
    }

    /// Returns the raw bits.
    #[must_use]
    pub const fn bits(&self) -> u16 {
        self.0
    }

    /// Returns `true` if every bit of `other` is set in `self`.
    #[must_use]
    pub const fn contains(&self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns `true` if no bit is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Looks a bit up by its canonical name.
    #[must_use]
    pub fn by_name(name: &str) -> Option<Self> {
        Self::NAMED
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, bit)| *bit)
    }

    /// Iterates over the names of the set bits.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        Self::NAMED
            .iter()
            .filter(|(_, bit)| self.contains(*bit))
            .map(|(name, _)| *name)
    }
}

impl BitOr for CapabilityMask {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl fmt::Display for CapabilityMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#06x}", self.0)
    }
}

impl Serialize for CapabilityMask {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.names())
    }
}

impl<'de> Deserialize<'de> for CapabilityMask {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let names = Vec::<String>::deserialize(deserializer)?;
        names.iter().try_fold(Self::NONE, |mask, name| {
            Self::by_name(name)
                .map(|bit| mask | bit)
                .ok_or_else(|| serde::de::Error::custom(format!("unknown capability '{name}'")))
        })
    }
}

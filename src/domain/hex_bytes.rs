//! Serde adapter encoding byte strings as `0x`-prefixed hex.

use serde::{Deserialize, Deserializer, Serializer};

/// Serializes bytes as `0x`-prefixed lowercase hex.
///
/// # Errors
///
/// Propagates serializer errors.
pub fn serialize<T: AsRef<[u8]>, S: Serializer>(value: &T, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("0x{}", hex::encode(value)))
}

/// Parses bytes from hex, with or without the `0x` prefix.
///
/// # Errors
///
/// Fails on invalid hex or when the decoded length does not fit `T`.
pub fn deserialize<'de, T, D>(deserializer: D) -> Result<T, D::Error>
where
    T: TryFrom<Vec<u8>>,
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    let bytes = hex::decode(s.strip_prefix("0x").unwrap_or(&s)).map_err(serde::de::Error::custom)?;
    let len = bytes.len();
    T::try_from(bytes)
        .map_err(|_| serde::de::Error::custom(format!("unexpected byte length {len}")))
}

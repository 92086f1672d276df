//! Guest failures and their classification.
//!
//! A guest signals failure with a [`GuestRevert`] carrying a raw revert
//! payload. The payload is classified by shape into exactly one
//! [`FailureClass`]:
//!
//! | Payload                               | Class      |
//! |---------------------------------------|------------|
//! | `0x4e487b71` + 32-byte code           | `Panic`    |
//! | `0x08c379a0` + ABI-encoded string     | `Reported` |
//! | any other payload of >= 4 bytes       | `Custom`   |
//! | fewer than 4 bytes                    | `Empty`    |

use std::fmt;

use serde::{Deserialize, Serialize};

/// Selector of `Error(string)`.
pub const REPORTED_SELECTOR: [u8; 4] = [0x08, 0xc3, 0x79, 0xa0];

/// Selector of `Panic(uint256)`.
pub const PANIC_SELECTOR: [u8; 4] = [0x4e, 0x48, 0x7b, 0x71];

/// Selector of `HookNotImplemented()`.
pub const HOOK_NOT_IMPLEMENTED_SELECTOR: [u8; 4] = [0x0a, 0x85, 0xdc, 0x29];

/// Panic code used when a guest aborts without a specific code.
pub const PANIC_GENERIC: u64 = 0x00;

const WORD: usize = 32;

/// Raw failure payload returned by a guest.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GuestRevert(#[serde(with = "super::hex_bytes")] Vec<u8>);

impl GuestRevert {
    /// Wraps an arbitrary payload.
    #[must_use]
    pub fn from_payload(payload: Vec<u8>) -> Self {
        Self(payload)
    }

    /// A revert with no data, as produced by exhausted budgets.
    #[must_use]
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// A revert carrying a human-readable message.
    #[must_use]
    pub fn reported(message: &str) -> Self {
        let data = message.as_bytes();
        let padded = data.len().div_ceil(WORD) * WORD;
        let mut payload = Vec::with_capacity(4 + 2 * WORD + padded);
        payload.extend_from_slice(&REPORTED_SELECTOR);
        payload.extend_from_slice(&word(WORD as u64));
        payload.extend_from_slice(&word(data.len() as u64));
        payload.extend_from_slice(data);
        payload.resize(4 + 2 * WORD + padded, 0);
        Self(payload)
    }

    /// A revert carrying a runtime-fault code.
    #[must_use]
    pub fn panic(code: u64) -> Self {
        let mut payload = Vec::with_capacity(4 + WORD);
        payload.extend_from_slice(&PANIC_SELECTOR);
        payload.extend_from_slice(&word(code));
        Self(payload)
    }

    /// A structured error identified by `selector`.
    #[must_use]
    pub fn custom(selector: [u8; 4], data: &[u8]) -> Self {
        let mut payload = Vec::with_capacity(4 + data.len());
        payload.extend_from_slice(&selector);
        payload.extend_from_slice(data);
        Self(payload)
    }

    /// The revert used by callbacks a guest does not implement.
    #[must_use]
    pub fn not_implemented() -> Self {
        Self::custom(HOOK_NOT_IMPLEMENTED_SELECTOR, &[])
    }

    /// Returns the raw payload.
    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.0
    }

    /// Classifies the payload by shape.
    #[must_use]
    pub fn classify(&self) -> FailureClass {
        let Some((selector, body)) = self.0.split_first_chunk::<4>() else {
            return FailureClass::Empty;
        };
        match *selector {
            PANIC_SELECTOR => {
                if let Some(code) = decode_panic(body) {
                    return FailureClass::Panic { code };
                }
            }
            REPORTED_SELECTOR => {
                if let Some(message) = decode_string(body) {
                    return FailureClass::Reported { message };
                }
            }
            _ => {}
        }
        FailureClass::Custom {
            selector: *selector,
            data: body.to_vec(),
        }
    }
}

impl fmt::Display for GuestRevert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.classify())
    }
}

/// Classification of a guest failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureClass {
    /// A well-known runtime-fault code.
    Panic {
        /// Fault code.
        code: u64,
    },
    /// A human-readable message.
    Reported {
        /// The reported message.
        message: String,
    },
    /// A structured error with an identifying tag and payload.
    Custom {
        /// 4-byte error selector.
        #[serde(with = "super::hex_bytes")]
        selector: [u8; 4],
        /// Encoded error arguments.
        #[serde(with = "super::hex_bytes")]
        data: Vec<u8>,
    },
    /// No decodable information.
    Empty,
}

impl FailureClass {
    /// Returns the classification as a static string slice.
    #[must_use]
    pub const fn kind_str(&self) -> &'static str {
        match self {
            Self::Panic { .. } => "panic",
            Self::Reported { .. } => "reported",
            Self::Custom { .. } => "custom",
            Self::Empty => "empty",
        }
    }
}

impl fmt::Display for FailureClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Panic { code } => write!(f, "panic code {code:#04x}"),
            Self::Reported { message } => write!(f, "reverted: {message}"),
            Self::Custom { selector, data } => write!(
                f,
                "custom error 0x{} ({} bytes)",
                hex::encode(selector),
                data.len()
            ),
            Self::Empty => f.write_str("empty revert"),
        }
    }
}

fn word(value: u64) -> [u8; WORD] {
    let mut out = [0u8; WORD];
    if let Some(tail) = out.get_mut(WORD - 8..) {
        tail.copy_from_slice(&value.to_be_bytes());
    }
    out
}

/// Reads a 32-byte big-endian word that must fit in a `u64`.
fn read_word(data: &[u8], at: usize) -> Option<u64> {
    let word = data.get(at..at.checked_add(WORD)?)?;
    let (high, low) = word.split_at(WORD - 8);
    if high.iter().any(|b| *b != 0) {
        return None;
    }
    Some(u64::from_be_bytes(low.try_into().ok()?))
}

fn decode_panic(body: &[u8]) -> Option<u64> {
    if body.len() != WORD {
        return None;
    }
    read_word(body, 0)
}

fn decode_string(body: &[u8]) -> Option<String> {
    let offset = usize::try_from(read_word(body, 0)?).ok()?;
    let len = usize::try_from(read_word(body, offset)?).ok()?;
    let start = offset.checked_add(WORD)?;
    let bytes = body.get(start..start.checked_add(len)?)?;
    String::from_utf8(bytes.to_vec()).ok()
}

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TypeError;
use crate::value::Value;

/// Domain tag prepended to every value fingerprint.
const VALUE_DOMAIN: &str = "vdiff-value-v1";

/// Content fingerprint of a [`Value`].
///
/// A `Fingerprint` is the domain-separated BLAKE3 hash of a value's canonical
/// JSON. Equal content always produces the same fingerprint, and the byte-wise
/// ordering gives a total order over values that are not otherwise
/// comparable.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// Fingerprint a value through its canonical JSON serialization.
    pub fn of_value(value: &Value) -> Result<Self, TypeError> {
        let json = value.to_canonical_json()?;
        Ok(Self::of_canonical_json(&json))
    }

    /// Fingerprint already-serialized canonical JSON text.
    pub fn of_canonical_json(json: &str) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(VALUE_DOMAIN.as_bytes());
        hasher.update(b":");
        hasher.update(json.as_bytes());
        Self(*hasher.finalize().as_bytes())
    }

    /// Create a `Fingerprint` from a pre-computed hash.
    pub fn from_hash(hash: [u8; 32]) -> Self {
        Self(hash)
    }

    /// The raw 32-byte hash.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Hex-encoded string representation.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Short hex representation (first 8 characters).
    pub fn short_hex(&self) -> String {
        hex::encode(&self.0[..4])
    }

    /// Parse from a hex string.
    pub fn from_hex(s: &str) -> Result<Self, TypeError> {
        let bytes = hex::decode(s).map_err(|e| TypeError::InvalidHex(e.to_string()))?;
        let arr: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| TypeError::InvalidLength {
                expected: 32,
                actual: bytes.len(),
            })?;
        Ok(Self(arr))
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self.short_hex())
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

//! 32-byte hash values used for leaves, internal nodes and roots.

use std::fmt;
use std::str::FromStr;

use serde_with::{DeserializeFromStr, SerializeDisplay};
use thiserror::Error;

/// Size of a Keccak-256 digest in bytes.
pub const HASH_SIZE: usize = 32;

/// A Keccak-256 digest.
///
/// Ordering is byte-wise lexicographic, which is the ordering used when combining
/// sibling pairs.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    SerializeDisplay,
    DeserializeFromStr,
)]
pub struct Hash256([u8; HASH_SIZE]);

impl Hash256 {
    /// Create a hash from raw bytes.
    #[must_use]
    pub const fn new(bytes: [u8; HASH_SIZE]) -> Self {
        Self(bytes)
    }

    /// Get the underlying bytes.
    #[must_use]
    pub const fn to_bytes(&self) -> [u8; HASH_SIZE] {
        self.0
    }
}

/// Hash arbitrary bytes with Keccak-256.
#[must_use]
pub fn keccak256(data: impl AsRef<[u8]>) -> Hash256 {
    Hash256(alloy_primitives::keccak256(data).0)
}

impl AsRef<[u8]> for Hash256 {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; HASH_SIZE]> for Hash256 {
    fn from(bytes: [u8; HASH_SIZE]) -> Self {
        Self(bytes)
    }
}

impl From<Hash256> for [u8; HASH_SIZE] {
    fn from(hash: Hash256) -> Self {
        hash.0
    }
}

impl fmt::Display for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

/// Error returned when a hash cannot be parsed from hex text.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid 32-byte hex hash `{0}`")]
pub struct ParseHashError(String);

impl FromStr for Hash256 {
    type Err = ParseHashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let body = trimmed.strip_prefix("0x").unwrap_or(trimmed);
        let mut bytes = [0_u8; HASH_SIZE];
        hex::decode_to_slice(body, &mut bytes).map_err(|_| ParseHashError(s.to_owned()))?;
        Ok(Self(bytes))
    }
}

//! Allowlist records and their leaf encoding.

use alloy_primitives::{Address, U256};
use thiserror::Error;

use super::hash::{Hash256, keccak256};

/// Width of the big-endian amount encoding in bytes (`uint256`).
pub const AMOUNT_SIZE: usize = 32;

const ADDRESS_HEX_LEN: usize = 40;

/// Reasons a row cannot be turned into a [`Record`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidRecord {
    /// The row does not have the requested column.
    #[error("Missing column {column} (row has {width} columns)")]
    MissingField {
        /// Zero-based column that was requested.
        column: usize,
        /// Number of columns in the row.
        width: usize,
    },

    /// The address is not 20 bytes of hex.
    #[error("Malformed address `{0}`")]
    MalformedAddress(String),

    /// The address is mixed-case but the EIP-55 checksum does not match.
    #[error("Address checksum mismatch for `{0}`")]
    BadChecksum(String),

    /// The amount is not a non-negative integer that fits in 256 bits.
    #[error("Malformed amount `{0}`")]
    MalformedAmount(String),
}

/// A single allowlist entitlement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Record {
    address: Address,
    amount: U256,
}

impl Record {
    /// Create a record from already-validated parts.
    #[must_use]
    pub const fn new(address: Address, amount: U256) -> Self {
        Self { address, amount }
    }

    /// Parse a record from its textual address and amount fields.
    ///
    /// The address is 40 hex digits with an optional `0x` prefix. Mixed-case addresses must
    /// carry a valid EIP-55 checksum. The amount is either decimal or `0x`-prefixed hex.
    ///
    /// # Errors
    /// Returns [`InvalidRecord`] if either field is malformed.
    pub fn parse(address: &str, amount: &str) -> Result<Self, InvalidRecord> {
        Ok(Self {
            address: parse_address(address)?,
            amount: parse_amount(amount)?,
        })
    }

    /// The recipient address.
    #[must_use]
    pub const fn address(&self) -> Address {
        self.address
    }

    /// The entitled amount.
    #[must_use]
    pub const fn amount(&self) -> U256 {
        self.amount
    }

    /// Tight packing of the record: the 20 address bytes followed by the amount as a
    /// 32-byte big-endian integer.
    #[must_use]
    pub fn encode_packed(&self) -> Vec<u8> {
        [
            self.address.as_slice(),
            self.amount.to_be_bytes::<AMOUNT_SIZE>().as_slice(),
        ]
        .concat()
    }

    /// The Merkle leaf committed for this record.
    #[must_use]
    pub fn leaf(&self) -> Hash256 {
        keccak256(self.encode_packed())
    }
}

fn parse_address(text: &str) -> Result<Address, InvalidRecord> {
    let trimmed = text.trim();
    let body = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    if body.len() != ADDRESS_HEX_LEN {
        return Err(InvalidRecord::MalformedAddress(text.to_owned()));
    }

    let mut bytes = [0_u8; 20];
    hex::decode_to_slice(body, &mut bytes)
        .map_err(|_| InvalidRecord::MalformedAddress(text.to_owned()))?;
    let address = Address::from(bytes);

    let has_lower = body.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = body.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper && address.to_checksum(None) != format!("0x{body}") {
        return Err(InvalidRecord::BadChecksum(text.to_owned()));
    }

    Ok(address)
}

fn parse_amount(text: &str) -> Result<U256, InvalidRecord> {
    let trimmed = text.trim();
    let malformed = || InvalidRecord::MalformedAmount(text.to_owned());

    let (digits, radix) = match trimmed.strip_prefix("0x") {
        Some(hex_digits) => (hex_digits, 16),
        None => (trimmed, 10),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
        return Err(malformed());
    }

    U256::from_str_radix(digits, u64::from(radix)).map_err(|_| malformed())
}

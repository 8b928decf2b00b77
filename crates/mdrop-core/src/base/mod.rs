//! Foundational primitive types: hashes and allowlist records.

mod hash;
mod record;

pub use hash::{HASH_SIZE, Hash256, ParseHashError, keccak256};
pub use record::{AMOUNT_SIZE, InvalidRecord, Record};

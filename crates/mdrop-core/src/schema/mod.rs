//! Serialized schema/data contracts.

/// Published commitment schema types.
pub mod commitment;

//! Mdrop base primitives and schemas.

/// Foundational primitive types and helpers shared across crates.
pub mod base;
/// Serialized/public schema models used across the workspace.
pub mod schema;

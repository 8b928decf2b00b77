use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::base::Hash256;

/// Published commitment over an allowlist.
///
/// This is the artifact an operator publishes (e.g. on-chain) and claimants verify their
/// proofs against.
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub struct Commitment {
    /// Merkle root over all valid records, as `0x`-prefixed hex.
    #[schemars(with = "String")]
    pub root: Hash256,
    /// Number of leaves committed.
    pub leaf_count: usize,
    /// Number of input rows skipped because they were malformed.
    #[serde(default)]
    pub skipped_rows: usize,
    /// Number of leaves whose value repeats an earlier leaf.
    #[serde(default)]
    pub duplicate_leaves: usize,
}

impl Commitment {
    /// Create a new commitment.
    #[must_use]
    pub const fn new(
        root: Hash256,
        leaf_count: usize,
        skipped_rows: usize,
        duplicate_leaves: usize,
    ) -> Self {
        Self {
            root,
            leaf_count,
            skipped_rows,
            duplicate_leaves,
        }
    }
}

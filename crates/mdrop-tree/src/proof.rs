//! Inclusion proofs and their verification.

use std::fmt;
use std::str::FromStr;

use mdrop_core::base::{Hash256, ParseHashError};

use crate::node::hash_pair;

/// Ordered sibling hashes from a leaf up to the root.
///
/// Entries are kept in the order they were met on the way up; ordering within each pair is
/// applied only when recombining.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MerkleProof {
    siblings: Vec<Hash256>,
}

impl MerkleProof {
    /// Create a proof from its sibling hashes.
    #[must_use]
    pub const fn new(siblings: Vec<Hash256>) -> Self {
        Self { siblings }
    }

    /// The sibling hashes, leaf level first.
    #[must_use]
    pub fn siblings(&self) -> &[Hash256] {
        &self.siblings
    }

    /// Number of sibling hashes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.siblings.len()
    }

    /// Whether the proof has no siblings (single-leaf tree).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.siblings.is_empty()
    }

    /// Recompute the root implied by `leaf` and this proof.
    #[must_use]
    pub fn compute_root(&self, leaf: &Hash256) -> Hash256 {
        self.siblings
            .iter()
            .fold(*leaf, |node, sibling| hash_pair(&node, sibling))
    }

    /// Check that `leaf` combined with this proof reproduces `root`.
    #[must_use]
    pub fn verify(&self, leaf: &Hash256, root: &Hash256) -> bool {
        self.compute_root(leaf) == *root
    }
}

/// Space-separated `0x` hex, the format of the proof column in output files.
impl fmt::Display for MerkleProof {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, sibling) in self.siblings.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{sibling}")?;
        }
        Ok(())
    }
}

impl FromStr for MerkleProof {
    type Err = ParseHashError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split_whitespace()
            .map(str::parse)
            .collect::<Result<Vec<Hash256>, _>>()
            .map(Self::new)
    }
}

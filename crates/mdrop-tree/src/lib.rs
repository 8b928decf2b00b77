//! Allowlist Merkle tree: construction, inclusion proofs and verification.
//!
//! Internal nodes use sorted-pair Keccak-256 hashing and unpaired nodes are carried up a
//! level unchanged, so proofs only contain real siblings.

mod core;
mod node;
mod proof;
mod tree;

pub use core::{TreeError, should_report_progress};

pub use node::hash_pair;
pub use proof::MerkleProof;
pub use tree::MerkleTree;

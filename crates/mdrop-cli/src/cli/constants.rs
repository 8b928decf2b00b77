//! Shared constants for CLI.

// -------------------------
// Environment variables
// -------------------------

// Input
pub const MDROP_INPUT_FILE: &str = "MDROP_INPUT_FILE";
pub const MDROP_ADDRESS_COLUMN: &str = "MDROP_ADDRESS_COLUMN";
pub const MDROP_AMOUNT_COLUMN: &str = "MDROP_AMOUNT_COLUMN";
pub const MDROP_NO_HEADER: &str = "MDROP_NO_HEADER";

// Commitment
pub const MDROP_COMMITMENT_FILE: &str = "MDROP_COMMITMENT_FILE";
pub const MDROP_ROOT: &str = "MDROP_ROOT";

// Proofs
pub const MDROP_WORKERS: &str = "MDROP_WORKERS";
pub const MDROP_OUTPUT_DIR: &str = "MDROP_OUTPUT_DIR";
pub const MDROP_OUTPUT_PREFIX: &str = "MDROP_OUTPUT_PREFIX";

// Verify
pub const MDROP_CLAIM_ADDRESS: &str = "MDROP_CLAIM_ADDRESS";
pub const MDROP_CLAIM_AMOUNT: &str = "MDROP_CLAIM_AMOUNT";
pub const MDROP_CLAIM_PROOF: &str = "MDROP_CLAIM_PROOF";
pub const MDROP_PROOFS_IN: &str = "MDROP_PROOFS_IN";

// -------------------------
// Default values
// -------------------------

// File paths
pub const DEFAULT_INPUT_FILE: &str = "airdrop.csv";
pub const DEFAULT_COMMITMENT_FILE: &str = "commitment.json";
pub const DEFAULT_OUTPUT_DIR: &str = ".";

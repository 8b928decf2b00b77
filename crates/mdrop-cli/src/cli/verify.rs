//! Verify subcommands.

use std::path::PathBuf;

use super::constants::{MDROP_CLAIM_ADDRESS, MDROP_CLAIM_AMOUNT, MDROP_CLAIM_PROOF, MDROP_PROOFS_IN};
use super::{ColumnArgs, RootSourceArgs};

/// Arguments for `verify claim`.
#[derive(Debug, clap::Args)]
pub struct VerifyClaimArgs {
    /// Recipient address, `0x`-prefixed hex.
    #[arg(long, env = MDROP_CLAIM_ADDRESS)]
    pub address: String,
    /// Claimed amount, decimal or `0x`-prefixed hex.
    #[arg(long, env = MDROP_CLAIM_AMOUNT)]
    pub amount: String,
    /// Space-separated sibling hashes, as found in the proof column.
    #[arg(long, env = MDROP_CLAIM_PROOF, allow_hyphen_values = true)]
    pub proof: String,
    /// Root to verify against.
    #[command(flatten)]
    pub root: RootSourceArgs,
}

/// Arguments for `verify file`.
#[derive(Debug, clap::Args)]
pub struct VerifyFileArgs {
    /// Proof file written by `proofs`.
    #[arg(long, env = MDROP_PROOFS_IN)]
    pub proofs_in: PathBuf,
    /// Column layout of the rows in the proof file.
    #[command(flatten)]
    pub columns: ColumnArgs,
    /// Root to verify against.
    #[command(flatten)]
    pub root: RootSourceArgs,
}

/// Verify command group.
#[derive(Debug, clap::Subcommand)]
pub enum VerifyCommands {
    /// Verify a single claim against the root.
    Claim {
        #[command(flatten)]
        args: VerifyClaimArgs,
    },
    /// Verify every line of a per-worker proof file.
    File {
        #[command(flatten)]
        args: VerifyFileArgs,
    },
}

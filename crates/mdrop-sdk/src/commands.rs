//! Application command implementations.
//!
//! This module contains the core logic for each CLI subcommand.

mod commitment;
mod dispatch;
mod output;
mod rows;
mod verify;

pub use commitment::{build_commitment, generate_proofs};
pub use dispatch::{
    DispatchError, WorkerBatch, WorkerInput, WorkerReport, WorkerSummary, dispatch, partition,
    run_worker,
};
pub use output::{CsvFileSink, ProofSink};
pub use rows::{AllowlistRow, RowSet, parse_rows, read_rows};
pub use verify::{RootSource, verify_claim, verify_proof_file};

/// Generates and prints the JSON schema for the `Commitment` struct.
///
/// # Errors
/// Returns an error if serialization to JSON fails.
#[allow(clippy::print_stdout, reason = "Prints schema to stdout")]
pub fn commitment_schema() -> eyre::Result<()> {
    let schema = schemars::schema_for!(mdrop_core::schema::commitment::Commitment);
    let schema_str = serde_json::to_string_pretty(&schema)?;
    println!("Commitment JSON Schema:\n{schema_str}");
    Ok(())
}

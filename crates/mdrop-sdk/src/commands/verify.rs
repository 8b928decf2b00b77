use std::path::PathBuf;

use eyre::{Context as _, ContextCompat as _, ensure};
use mdrop_core::base::{Hash256, Record};
use mdrop_core::schema::commitment::Commitment;
use mdrop_tree::MerkleProof;
use tracing::{info, instrument, warn};

use super::rows::record_from_fields;
use crate::common::ColumnLayout;

/// Where the root to verify against comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RootSource {
    /// A root given directly.
    Hex(Hash256),
    /// The `root` field of a commitment file.
    Commitment(PathBuf),
}

impl RootSource {
    async fn resolve(self) -> eyre::Result<Hash256> {
        match self {
            Self::Hex(root) => Ok(root),
            Self::Commitment(path) => {
                let json = tokio::fs::read_to_string(&path)
                    .await
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                let commitment: Commitment =
                    serde_json::from_str(&json).context("Failed to parse commitment JSON")?;
                Ok(commitment.root)
            }
        }
    }
}

/// Verify one claim: the record's leaf combined with `proof` must reproduce the root.
///
/// # Errors
/// Returns an error if the record or proof is malformed, the root cannot be loaded, or the
/// proof does not verify.
#[instrument(skip_all, fields(address = %address))]
pub async fn verify_claim(
    address: &str,
    amount: &str,
    proof: &str,
    root: RootSource,
) -> eyre::Result<()> {
    let record = Record::parse(address, amount)?;
    let proof: MerkleProof = proof.parse().context("Failed to parse proof")?;
    let root = root.resolve().await?;

    let computed = proof.compute_root(&record.leaf());
    ensure!(
        computed == root,
        "Proof INVALID: computed root {computed}, expected {root}"
    );

    info!(leaf = %record.leaf(), %root, "Proof VALID");
    Ok(())
}

fn check_line(line: &str, layout: &ColumnLayout, root: &Hash256) -> eyre::Result<()> {
    let (row, proof) = line
        .rsplit_once(',')
        .context("Line has no proof column")?;
    let fields: Vec<String> = row.split(',').map(str::to_owned).collect();
    let record = record_from_fields(&fields, layout)?;
    let proof: MerkleProof = proof.parse()?;
    ensure!(proof.verify(&record.leaf(), root), "Proof does not match the root");
    Ok(())
}

/// Verify every line of a per-worker proof file.
///
/// # Errors
/// Returns an error if the file or root cannot be loaded, or any line fails to verify.
#[instrument(skip_all, fields(file = %proofs_file.display()))]
pub async fn verify_proof_file(
    proofs_file: PathBuf,
    layout: ColumnLayout,
    root: RootSource,
) -> eyre::Result<()> {
    let root = root.resolve().await?;
    let text = tokio::fs::read_to_string(&proofs_file)
        .await
        .with_context(|| format!("Failed to read {}", proofs_file.display()))?;

    let (valid_count, invalid_count) = tokio::task::spawn_blocking(move || {
        let mut valid_count = 0_usize;
        let mut invalid_count = 0_usize;

        let skip = usize::from(layout.has_header);
        for (index, line) in text.lines().enumerate().skip(skip) {
            if line.trim().is_empty() {
                continue;
            }
            match check_line(line, &layout, &root) {
                Ok(()) => valid_count = valid_count.saturating_add(1),
                Err(e) => {
                    warn!(line = index.saturating_add(1), error = %e, "Proof INVALID");
                    invalid_count = invalid_count.saturating_add(1);
                }
            }
        }
        (valid_count, invalid_count)
    })
    .await?;

    info!(
        valid = valid_count,
        invalid = invalid_count,
        %root,
        "Verification complete"
    );
    ensure!(invalid_count == 0, "{invalid_count} proofs failed verification");
    Ok(())
}

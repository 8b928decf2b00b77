use std::path::{Path, PathBuf};
use std::sync::Arc;

use eyre::{Context as _, ensure};
use mdrop_core::base::Hash256;
use mdrop_core::schema::commitment::Commitment;
use mdrop_tree::MerkleTree;
use tracing::{error, info, instrument, warn};

use super::dispatch::dispatch;
use super::output::CsvFileSink;
use super::rows::{RowSet, read_rows};
use crate::common::{ColumnLayout, DispatchConfig};

/// Rows and tree of one allowlist, built once before anything is published.
struct Allowlist {
    rows: RowSet,
    leaves: Arc<[Hash256]>,
    commitment: Commitment,
}

async fn load_allowlist(input: &Path, layout: &ColumnLayout) -> eyre::Result<Allowlist> {
    let rows = read_rows(input, layout).await?;
    let leaves: Arc<[Hash256]> = rows.leaves().into();

    let tree = tokio::task::spawn_blocking({
        let leaves = Arc::clone(&leaves);
        move || MerkleTree::from_leaves(&leaves)
    })
    .await?
    .context("No valid allowlist rows to commit to")?;

    let commitment = Commitment::new(
        tree.root(),
        tree.leaf_count(),
        rows.skipped,
        tree.duplicate_leaf_count(),
    );

    info!(
        root = %commitment.root,
        leaves = commitment.leaf_count,
        depth = tree.depth(),
        "Computed Merkle root"
    );
    if commitment.duplicate_leaves > 0 {
        warn!(
            duplicates = commitment.duplicate_leaves,
            "Allowlist contains repeated records; proofs resolve to their first occurrence"
        );
    }

    Ok(Allowlist {
        rows,
        leaves,
        commitment,
    })
}

async fn write_commitment(commitment: &Commitment, commitment_out: &Path) -> eyre::Result<()> {
    let json = serde_json::to_string_pretty(commitment)?;
    tokio::fs::write(commitment_out, json)
        .await
        .with_context(|| format!("Failed to write {}", commitment_out.display()))?;

    info!(file = ?commitment_out, "Exported commitment");
    Ok(())
}

/// Build the Merkle tree over an allowlist and export its commitment.
///
/// # Errors
/// Returns an error if the input cannot be read, has no valid rows, or the commitment file
/// cannot be written.
#[instrument(skip_all, fields(input = %input.display()))]
pub async fn build_commitment(
    input: PathBuf,
    layout: ColumnLayout,
    commitment_out: PathBuf,
) -> eyre::Result<Commitment> {
    let allowlist = load_allowlist(&input, &layout).await?;
    write_commitment(&allowlist.commitment, &commitment_out).await?;
    Ok(allowlist.commitment)
}

/// Build and export the commitment, then generate per-worker proof files.
///
/// # Errors
/// Returns an error if building the commitment fails, the output directory cannot be
/// created, or any worker fails.
#[instrument(skip_all, fields(input = %input.display(), workers = config.worker_count))]
pub async fn generate_proofs(
    input: PathBuf,
    layout: ColumnLayout,
    commitment_out: PathBuf,
    config: DispatchConfig,
) -> eyre::Result<Commitment> {
    let Allowlist {
        rows,
        leaves,
        commitment,
    } = load_allowlist(&input, &layout).await?;
    write_commitment(&commitment, &commitment_out).await?;

    tokio::fs::create_dir_all(&config.output_dir)
        .await
        .with_context(|| format!("Failed to create {}", config.output_dir.display()))?;

    let mut sink = CsvFileSink::new(&config.output_dir, config.output_prefix);
    if let Some(header) = &rows.header {
        sink = sink.with_header(header);
    }

    let fields = rows.into_fields();
    let reports = dispatch(
        leaves,
        fields,
        config.worker_count,
        commitment.root,
        Arc::new(sink),
    )
    .await?;

    let mut failed_workers = 0_usize;
    for report in &reports {
        match &report.outcome {
            Ok(summary) => info!(
                worker = report.worker_id,
                written = summary.written,
                dropped = summary.failed,
                "Worker finished"
            ),
            Err(e) => {
                error!(worker = report.worker_id, error = %e, "Worker failed");
                failed_workers = failed_workers.saturating_add(1);
            }
        }
    }
    ensure!(
        failed_workers == 0,
        "{failed_workers} of {} workers failed",
        reports.len()
    );

    info!(dir = ?config.output_dir, "Exported proofs");
    Ok(commitment)
}

#[cfg(test)]
mod tests {
    use mdrop_tree::MerkleProof;
    use test_utils::{allowlist_csv, leaves, record_fields};

    use super::*;

    async fn write_input(dir: &Path, count: u8) -> PathBuf {
        let fields = record_fields(count);
        let pairs: Vec<(&str, &str)> = fields
            .iter()
            .map(|(a, b)| (a.as_str(), b.as_str()))
            .collect();
        let path = dir.join("airdrop.csv");
        tokio::fs::write(&path, allowlist_csv(&pairs))
            .await
            .expect("Failed to write input");
        path
    }

    #[tokio::test]
    async fn commitment_matches_tree() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let input = write_input(dir.path(), 5).await;
        let out = dir.path().join("commitment.json");

        let commitment = build_commitment(input, ColumnLayout::default(), out.clone())
            .await
            .expect("commitment should build");

        let expected = MerkleTree::from_leaves(&leaves(5)).expect("tree should build");
        assert_eq!(commitment.root, expected.root());
        assert_eq!(commitment.leaf_count, 5);

        let json = tokio::fs::read_to_string(&out)
            .await
            .expect("Failed to read commitment");
        let written: Commitment = serde_json::from_str(&json).expect("valid commitment JSON");
        assert_eq!(written, commitment);
    }

    #[tokio::test]
    async fn header_only_input_is_fatal() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let input = write_input(dir.path(), 0).await;
        let out = dir.path().join("commitment.json");

        assert!(
            build_commitment(input, ColumnLayout::default(), out.clone())
                .await
                .is_err()
        );
        assert!(!out.exists());
    }

    #[tokio::test]
    async fn proofs_are_written_per_worker() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let input = write_input(dir.path(), 10).await;
        let config = DispatchConfig {
            worker_count: 4,
            output_dir: dir.path().join("proofs"),
            output_prefix: "batch".to_owned(),
        };

        let commitment = generate_proofs(
            input,
            ColumnLayout::default(),
            dir.path().join("commitment.json"),
            config,
        )
        .await
        .expect("proofs should be generated");

        let mut proved = 0_usize;
        for worker_id in 0..4 {
            let path = dir.path().join("proofs").join(format!("batch_{worker_id}.csv"));
            let text = tokio::fs::read_to_string(&path)
                .await
                .expect("Failed to read proof file");
            let mut lines = text.lines();
            assert_eq!(lines.next(), Some("id,address,a,b,c,d,e,amount,proof"));

            for line in lines {
                let (row, proof) = line.rsplit_once(',').expect("line should carry a proof");
                let fields: Vec<&str> = row.split(',').collect();
                let record = mdrop_core::base::Record::parse(
                    fields.get(1).copied().unwrap_or_default(),
                    fields.get(7).copied().unwrap_or_default(),
                )
                .expect("row should parse");
                let proof: MerkleProof = proof.parse().expect("proof should parse");
                assert!(proof.verify(&record.leaf(), &commitment.root));
                proved = proved.saturating_add(1);
            }
        }
        assert_eq!(proved, 10);
    }
}

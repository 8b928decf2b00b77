//! Batch proof generation across parallel workers.
//!
//! Entries are dealt round-robin to a fixed number of workers. Every worker rebuilds the
//! tree from the shared leaf sequence, proves its own entries and hands the result lines to
//! a [`ProofSink`]. Workers share nothing mutable and never see each other's output.

use std::sync::Arc;

use mdrop_core::base::Hash256;
use mdrop_tree::{MerkleTree, should_report_progress};
use thiserror::Error;
use tokio::task::JoinSet;
use tracing::{info, instrument, warn};

use super::output::ProofSink;

/// Errors raised by the dispatcher.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// Dispatch was asked to run with zero workers.
    #[error("Worker count must be at least 1")]
    NoWorkers,

    /// Rows and leaves are not index-aligned.
    #[error("Got {rows} rows for {leaves} leaves")]
    LengthMismatch {
        /// Number of rows supplied.
        rows: usize,
        /// Number of leaves supplied.
        leaves: usize,
    },

    /// One worker could not complete its batch. Other workers are unaffected.
    #[error("Worker {worker_id} failed: {reason}")]
    WorkerFailure {
        /// Failing worker.
        worker_id: usize,
        /// What went wrong.
        reason: String,
    },
}

/// Everything a worker receives: its own partition and a read-only handle to all leaves.
#[derive(Debug, Clone)]
pub struct WorkerInput {
    /// Worker id, also the key of its output destination.
    pub worker_id: usize,
    /// Raw fields of the partition's rows.
    pub rows: Vec<Vec<String>>,
    /// Leaves of the partition's rows, index-aligned with `rows`.
    pub leaves: Vec<Hash256>,
    /// The entire leaf sequence the tree is built from.
    pub all_leaves: Arc<[Hash256]>,
}

/// Result lines produced by one worker, in partition order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerBatch {
    /// Producing worker.
    pub worker_id: usize,
    /// One line per proved entry: the row fields, then the space-joined proof.
    pub lines: Vec<String>,
    /// Entries dropped because no proof could be derived.
    pub failed: usize,
}

/// Counts for a worker that finished its batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerSummary {
    /// Lines handed to the sink.
    pub written: usize,
    /// Entries dropped from the batch.
    pub failed: usize,
}

/// Supervision record for one worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerReport {
    /// Reporting worker.
    pub worker_id: usize,
    /// Summary, or the reason the worker failed.
    pub outcome: Result<WorkerSummary, DispatchError>,
}

impl WorkerReport {
    /// Whether the worker completed its batch.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }
}

/// Entry indices handled by each worker: entry `i` goes to worker `i mod worker_count`.
///
/// Returns no partitions when `worker_count` is zero.
#[must_use]
pub fn partition(count: usize, worker_count: usize) -> Vec<Vec<usize>> {
    if worker_count == 0 {
        return Vec::new();
    }
    (0..worker_count)
        .map(|worker_id| (worker_id..count).step_by(worker_count).collect())
        .collect()
}

fn split_inputs(
    rows: Vec<Vec<String>>,
    all_leaves: &Arc<[Hash256]>,
    worker_count: usize,
) -> Vec<WorkerInput> {
    let mut rows: Vec<Option<Vec<String>>> = rows.into_iter().map(Some).collect();

    partition(rows.len(), worker_count)
        .into_iter()
        .enumerate()
        .map(|(worker_id, indices)| {
            let mut input = WorkerInput {
                worker_id,
                rows: Vec::with_capacity(indices.len()),
                leaves: Vec::with_capacity(indices.len()),
                all_leaves: Arc::clone(all_leaves),
            };
            for index in indices {
                let row = rows.get_mut(index).and_then(Option::take);
                if let (Some(row), Some(leaf)) = (row, all_leaves.get(index)) {
                    input.rows.push(row);
                    input.leaves.push(*leaf);
                }
            }
            input
        })
        .collect()
}

/// Prove one worker's partition.
///
/// The tree is rebuilt from `input.all_leaves` and must reproduce `expected_root`. An entry
/// whose leaf is not in the tree is dropped and counted; the rest of the batch continues.
///
/// # Errors
/// Returns [`DispatchError::WorkerFailure`] if the tree cannot be built or its root differs
/// from `expected_root`.
pub fn run_worker(input: &WorkerInput, expected_root: Hash256) -> Result<WorkerBatch, DispatchError> {
    let worker_id = input.worker_id;
    let failure = |reason: String| DispatchError::WorkerFailure { worker_id, reason };

    let tree = MerkleTree::from_leaves(&input.all_leaves).map_err(|e| failure(e.to_string()))?;
    if tree.root() != expected_root {
        return Err(failure(format!(
            "rebuilt root {} does not match published root {expected_root}",
            tree.root()
        )));
    }

    let total = input.leaves.len();
    let mut lines = Vec::with_capacity(total);
    let mut failed = 0_usize;
    let mut last_pct = 0_usize;
    for (done, (row, leaf)) in input.rows.iter().zip(&input.leaves).enumerate() {
        match tree.proof_for_leaf(leaf) {
            Ok(proof) => lines.push(format!("{},{proof}", row.join(","))),
            Err(e) => {
                warn!(worker = worker_id, error = %e, "Dropping entry without proof");
                failed = failed.saturating_add(1);
            }
        }

        let done = done.saturating_add(1);
        if should_report_progress(done, total, &mut last_pct) {
            info!(worker = worker_id, done, total, "Proof progress: {last_pct}%");
        }
    }

    Ok(WorkerBatch {
        worker_id,
        lines,
        failed,
    })
}

async fn prove_and_write<S: ProofSink>(
    input: WorkerInput,
    expected_root: Hash256,
    sink: Arc<S>,
) -> Result<WorkerSummary, DispatchError> {
    let worker_id = input.worker_id;

    let batch = tokio::task::spawn_blocking(move || run_worker(&input, expected_root))
        .await
        .map_err(|e| DispatchError::WorkerFailure {
            worker_id,
            reason: format!("proof task failed: {e}"),
        })??;

    sink.write_batch(&batch)
        .await
        .map_err(|e| DispatchError::WorkerFailure {
            worker_id,
            reason: format!("sink write failed: {e}"),
        })?;

    Ok(WorkerSummary {
        written: batch.lines.len(),
        failed: batch.failed,
    })
}

/// Partition the entries, run one worker per partition and wait for all of them.
///
/// `rows` and `leaves` must be index-aligned. Returns one report per worker, ordered by
/// worker id. Outputs are never merged; each worker writes to its own sink destination.
///
/// # Errors
/// Returns [`DispatchError::NoWorkers`] or [`DispatchError::LengthMismatch`] before any
/// worker is spawned. Worker failures are reported per worker, not as an error.
#[instrument(skip_all, fields(workers = worker_count, entries = leaves.len()))]
pub async fn dispatch<S: ProofSink>(
    leaves: Arc<[Hash256]>,
    rows: Vec<Vec<String>>,
    worker_count: usize,
    expected_root: Hash256,
    sink: Arc<S>,
) -> Result<Vec<WorkerReport>, DispatchError> {
    if worker_count == 0 {
        return Err(DispatchError::NoWorkers);
    }
    if rows.len() != leaves.len() {
        return Err(DispatchError::LengthMismatch {
            rows: rows.len(),
            leaves: leaves.len(),
        });
    }

    let mut join_set = JoinSet::new();
    for input in split_inputs(rows, &leaves, worker_count) {
        let worker_id = input.worker_id;
        let sink = Arc::clone(&sink);
        join_set.spawn(async move {
            let outcome = prove_and_write(input, expected_root, sink).await;
            WorkerReport { worker_id, outcome }
        });
    }
    info!("Spawned {worker_count} workers");

    let mut reports = Vec::with_capacity(worker_count);
    while let Some(result) = join_set.join_next().await {
        match result {
            Ok(report) => reports.push(report),
            Err(e) => warn!(error = %e, "Worker task did not complete"),
        }
    }

    // A task lost outside its blocking section has no report of its own.
    for worker_id in 0..worker_count {
        if !reports.iter().any(|report| report.worker_id == worker_id) {
            reports.push(WorkerReport {
                worker_id,
                outcome: Err(DispatchError::WorkerFailure {
                    worker_id,
                    reason: "worker task panicked".to_owned(),
                }),
            });
        }
    }
    reports.sort_by_key(|report| report.worker_id);

    Ok(reports)
}

//! Per-worker proof destinations.

use std::future::Future;
use std::path::PathBuf;

use tokio::io::{AsyncWriteExt as _, BufWriter};
use tracing::debug;

use super::dispatch::WorkerBatch;

/// 1 MiB buffer for file I/O.
const FILE_BUF_SIZE: usize = 1024 * 1024;

/// Destination for the result lines of one worker.
///
/// Each worker writes exactly one batch, keyed by its worker id. Implementations must keep
/// the destinations of different workers apart; nothing is merged.
pub trait ProofSink: Send + Sync + 'static {
    /// Persist one worker's batch.
    fn write_batch(&self, batch: &WorkerBatch) -> impl Future<Output = std::io::Result<()>> + Send;
}

/// Writes each worker's batch to `<dir>/<prefix>_<worker_id>.csv`.
#[derive(Debug, Clone)]
pub struct CsvFileSink {
    dir: PathBuf,
    prefix: String,
    header: Option<String>,
}

impl CsvFileSink {
    /// Sink writing into `dir` with the given file name prefix and no header line.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
            header: None,
        }
    }

    /// Start every file with the input header plus a trailing `proof` column.
    #[must_use]
    pub fn with_header(mut self, header: &[String]) -> Self {
        let mut line = header.join(",");
        line.push_str(",proof");
        self.header = Some(line);
        self
    }

    /// Output path for a worker.
    #[must_use]
    pub fn path_for(&self, worker_id: usize) -> PathBuf {
        self.dir.join(format!("{}_{worker_id}.csv", self.prefix))
    }
}

impl ProofSink for CsvFileSink {
    async fn write_batch(&self, batch: &WorkerBatch) -> std::io::Result<()> {
        let path = self.path_for(batch.worker_id);
        let file = tokio::fs::File::create(&path).await?;
        let mut writer = BufWriter::with_capacity(FILE_BUF_SIZE, file);

        if let Some(header) = &self.header {
            writer.write_all(header.as_bytes()).await?;
            writer.write_all(b"\n").await?;
        }
        for line in &batch.lines {
            writer.write_all(line.as_bytes()).await?;
            writer.write_all(b"\n").await?;
        }
        writer.flush().await?;

        debug!(
            worker = batch.worker_id,
            path = %path.display(),
            lines = batch.lines.len(),
            "Batch written"
        );
        Ok(())
    }
}

//! CLI-independent configuration types.

use std::path::PathBuf;

/// Default zero-based column holding the recipient address.
pub const DEFAULT_ADDRESS_COLUMN: usize = 1;
/// Default zero-based column holding the amount.
pub const DEFAULT_AMOUNT_COLUMN: usize = 7;
/// Default number of proof workers.
pub const DEFAULT_WORKER_COUNT: usize = 16;
/// Default file name prefix for per-worker proof files.
pub const DEFAULT_OUTPUT_PREFIX: &str = "airdrop_processed";

/// Where the record fields live in each input row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    /// Zero-based column of the address.
    pub address_column: usize,
    /// Zero-based column of the amount.
    pub amount_column: usize,
    /// Whether the first line is a header.
    pub has_header: bool,
}

impl Default for ColumnLayout {
    fn default() -> Self {
        Self {
            address_column: DEFAULT_ADDRESS_COLUMN,
            amount_column: DEFAULT_AMOUNT_COLUMN,
            has_header: true,
        }
    }
}

/// Configuration for batch proof generation.
#[derive(Debug, Clone)]
pub struct DispatchConfig {
    /// Number of parallel workers.
    pub worker_count: usize,
    /// Directory receiving one proof file per worker.
    pub output_dir: PathBuf,
    /// File name prefix; worker `i` writes `<prefix>_<i>.csv`.
    pub output_prefix: String,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            worker_count: DEFAULT_WORKER_COUNT,
            output_dir: PathBuf::from("."),
            output_prefix: DEFAULT_OUTPUT_PREFIX.to_owned(),
        }
    }
}

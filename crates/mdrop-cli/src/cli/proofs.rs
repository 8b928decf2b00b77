//! Root and proofs subcommands.

use std::path::PathBuf;

use mdrop_sdk::common::{DEFAULT_OUTPUT_PREFIX, DEFAULT_WORKER_COUNT, DispatchConfig};

use super::constants::{
    DEFAULT_COMMITMENT_FILE, DEFAULT_OUTPUT_DIR, MDROP_COMMITMENT_FILE, MDROP_OUTPUT_DIR,
    MDROP_OUTPUT_PREFIX, MDROP_WORKERS,
};
use super::{InputArgs, parse_worker_count};

/// Arguments for `root`.
#[derive(Debug, clap::Args)]
pub struct RootArgs {
    /// Allowlist input.
    #[command(flatten)]
    pub input: InputArgs,
    /// Commitment output file.
    #[arg(long, env = MDROP_COMMITMENT_FILE, default_value = DEFAULT_COMMITMENT_FILE)]
    pub commitment_out: PathBuf,
}

/// Arguments for `proofs`.
#[derive(Debug, clap::Args)]
pub struct ProofsArgs {
    /// Input and commitment arguments shared with `root`.
    #[command(flatten)]
    pub commit: RootArgs,
    /// Number of parallel proof workers.
    #[arg(
        long,
        env = MDROP_WORKERS,
        default_value_t = DEFAULT_WORKER_COUNT,
        value_parser = parse_worker_count
    )]
    pub workers: usize,
    /// Directory receiving one proof file per worker.
    #[arg(long, env = MDROP_OUTPUT_DIR, default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,
    /// File name prefix; worker `i` writes `<prefix>_<i>.csv`.
    #[arg(long, env = MDROP_OUTPUT_PREFIX, default_value = DEFAULT_OUTPUT_PREFIX)]
    pub output_prefix: String,
}

impl ProofsArgs {
    /// Dispatch settings for the proof workers.
    #[must_use]
    pub fn dispatch_config(&self) -> DispatchConfig {
        DispatchConfig {
            worker_count: self.workers,
            output_dir: self.output_dir.clone(),
            output_prefix: self.output_prefix.clone(),
        }
    }
}

//! Command-line interface for the `mdrop` CLI application.

pub mod constants;
mod proofs;
mod verify;

use std::path::PathBuf;

use clap::Parser;
use eyre::{Result, ensure};
use mdrop_core::base::Hash256;
use mdrop_sdk::commands::RootSource;
use mdrop_sdk::common::{ColumnLayout, DEFAULT_ADDRESS_COLUMN, DEFAULT_AMOUNT_COLUMN};

pub use self::proofs::{ProofsArgs, RootArgs};
use self::constants::{
    DEFAULT_COMMITMENT_FILE, DEFAULT_INPUT_FILE, MDROP_ADDRESS_COLUMN, MDROP_AMOUNT_COLUMN,
    MDROP_COMMITMENT_FILE, MDROP_INPUT_FILE, MDROP_NO_HEADER, MDROP_ROOT,
};
pub use self::verify::VerifyCommands;

/// Command-line interface definition.
#[derive(Debug, Parser)]
#[command(name = "mdrop")]
#[command(about = "Merkle airdrop allowlist tools")]
pub struct Cli {
    /// CLI top-level command.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands.
#[derive(Debug, clap::Subcommand)]
pub enum Commands {
    /// Build the Merkle tree over an allowlist and export its commitment.
    Root {
        /// Root subcommand arguments.
        #[command(flatten)]
        args: RootArgs,
    },
    /// Build the commitment, then write per-worker proof files.
    Proofs {
        /// Proofs subcommand arguments.
        #[command(flatten)]
        args: ProofsArgs,
    },
    /// Verification commands.
    Verify {
        /// Verify subcommands.
        #[command(subcommand)]
        command: VerifyCommands,
    },
    /// Print the JSON schema of the commitment file.
    Schema,
}

/// Where the address and amount live in each CSV row.
#[derive(Debug, clap::Args)]
pub struct ColumnArgs {
    /// Zero-based column holding the recipient address.
    #[arg(long, env = MDROP_ADDRESS_COLUMN, default_value_t = DEFAULT_ADDRESS_COLUMN)]
    pub address_column: usize,
    /// Zero-based column holding the amount.
    #[arg(long, env = MDROP_AMOUNT_COLUMN, default_value_t = DEFAULT_AMOUNT_COLUMN)]
    pub amount_column: usize,
    /// The first line is a data row, not a header.
    #[arg(long, env = MDROP_NO_HEADER, default_value_t = false)]
    pub no_header: bool,
}

impl From<ColumnArgs> for ColumnLayout {
    fn from(args: ColumnArgs) -> Self {
        Self {
            address_column: args.address_column,
            amount_column: args.amount_column,
            has_header: !args.no_header,
        }
    }
}

/// Allowlist input arguments.
#[derive(Debug, clap::Args)]
pub struct InputArgs {
    /// Allowlist CSV file.
    #[arg(long, env = MDROP_INPUT_FILE, default_value = DEFAULT_INPUT_FILE)]
    pub input: PathBuf,
    /// Column layout of the allowlist.
    #[command(flatten)]
    pub columns: ColumnArgs,
}

/// The root proofs are checked against.
#[derive(Debug, clap::Args)]
pub struct RootSourceArgs {
    /// Merkle root as hex. Takes precedence over `--commitment`.
    #[arg(long, env = MDROP_ROOT, value_parser = parse_root)]
    pub root: Option<Hash256>,
    /// Commitment file to read the root from.
    #[arg(long, env = MDROP_COMMITMENT_FILE, default_value = DEFAULT_COMMITMENT_FILE)]
    pub commitment: PathBuf,
}

impl From<RootSourceArgs> for RootSource {
    fn from(args: RootSourceArgs) -> Self {
        args.root
            .map_or_else(|| Self::Commitment(args.commitment), Self::Hex)
    }
}

pub fn parse_root(s: &str) -> Result<Hash256> {
    Ok(s.parse()?)
}

pub fn parse_worker_count(s: &str) -> Result<usize> {
    let workers: usize = s.parse()?;
    ensure!(workers > 0, "Worker count must be at least 1");
    Ok(workers)
}

#[cfg(test)]
mod tests {
    use clap::Parser as _;

    use super::*;

    #[test]
    fn worker_count_parse() {
        assert_eq!(parse_worker_count("4").expect("4 should parse"), 4);
        assert!(parse_worker_count("0").is_err());
        assert!(parse_worker_count("-1").is_err());
        assert!(parse_worker_count("many").is_err());
    }

    #[test]
    fn root_parse() {
        let root = format!("0x{}", "ab".repeat(32));
        assert_eq!(
            parse_root(&root).expect("root should parse"),
            Hash256::new([0xab; 32])
        );
        assert!(parse_root("0x1234").is_err());
    }

    #[test]
    fn proofs_defaults() {
        let cli = Cli::try_parse_from(["mdrop", "proofs"]).expect("defaults should parse");
        let Commands::Proofs { args } = cli.command else {
            panic!("expected proofs command");
        };

        assert_eq!(args.workers, mdrop_sdk::common::DEFAULT_WORKER_COUNT);
        assert_eq!(
            ColumnLayout::from(args.commit.input.columns),
            ColumnLayout::default()
        );
        assert_eq!(
            args.output_prefix,
            mdrop_sdk::common::DEFAULT_OUTPUT_PREFIX
        );
    }

    #[test]
    fn headerless_input_flag() {
        let cli = Cli::try_parse_from([
            "mdrop",
            "root",
            "--no-header",
            "--address-column",
            "0",
            "--amount-column",
            "1",
        ])
        .expect("flags should parse");
        let Commands::Root { args } = cli.command else {
            panic!("expected root command");
        };

        assert_eq!(
            ColumnLayout::from(args.input.columns),
            ColumnLayout {
                address_column: 0,
                amount_column: 1,
                has_header: false,
            }
        );
    }

    #[test]
    fn verify_claim_root_source() {
        let root = format!("0x{}", "01".repeat(32));
        let cli = Cli::try_parse_from([
            "mdrop", "verify", "claim", "--address", "0x00", "--amount", "1", "--proof", "",
            "--root", &root,
        ])
        .expect("claim should parse");
        let Commands::Verify {
            command: VerifyCommands::Claim { args },
        } = cli.command
        else {
            panic!("expected verify claim command");
        };
        assert_eq!(
            RootSource::from(args.root),
            RootSource::Hex(Hash256::new([1; 32]))
        );

        let cli = Cli::try_parse_from(["mdrop", "verify", "claim", "--address", "0x00"]);
        assert!(cli.is_err());
    }

    #[test]
    fn verify_file_defaults_to_commitment() {
        let cli = Cli::try_parse_from(["mdrop", "verify", "file", "--proofs-in", "out_0.csv"])
            .expect("file verification should parse");
        let Commands::Verify {
            command: VerifyCommands::File { args },
        } = cli.command
        else {
            panic!("expected verify file command");
        };
        assert_eq!(
            RootSource::from(args.root),
            RootSource::Commitment(PathBuf::from(DEFAULT_COMMITMENT_FILE))
        );
    }
}

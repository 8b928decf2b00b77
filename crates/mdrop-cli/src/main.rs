//! MDROP CLI Application

mod cli;

use clap::Parser as _;
use cli::{Cli, Commands, VerifyCommands};
use mdrop_sdk::commands::{
    build_commitment, commitment_schema, generate_proofs, verify_claim, verify_proof_file,
};

fn init_tracing() -> eyre::Result<()> {
    #[cfg(feature = "tokio-console")]
    {
        // tokio-console: layers the console subscriber with fmt
        use tracing_subscriber::prelude::*;
        tracing_subscriber::registry()
            .with(console_subscriber::spawn())
            .with(
                tracing_subscriber::fmt::layer().with_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
                ),
            )
            .try_init()
            .map_err(|e| eyre::eyre!("Failed to initialize tracing: {:?}", e))?;
    }

    #[cfg(not(feature = "tokio-console"))]
    {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
            )
            .with_timer(tracing_subscriber::fmt::time::uptime())
            .with_target(false)
            .try_init()
            .map_err(|e| eyre::eyre!("Failed to initialize tracing: {:?}", e))?;
    }

    Ok(())
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> eyre::Result<()> {
    // Load .env file (fails silently if not found)
    let _ = dotenvy::dotenv();

    init_tracing()?;

    let cli = Cli::parse();

    let res = match cli.command {
        Commands::Root { args } => build_commitment(
            args.input.input,
            args.input.columns.into(),
            args.commitment_out,
        )
        .await
        .map(|_| ()),
        Commands::Proofs { args } => {
            let config = args.dispatch_config();
            generate_proofs(
                args.commit.input.input,
                args.commit.input.columns.into(),
                args.commit.commitment_out,
                config,
            )
            .await
            .map(|_| ())
        }
        Commands::Verify { command } => match command {
            VerifyCommands::Claim { args } => {
                verify_claim(&args.address, &args.amount, &args.proof, args.root.into()).await
            }
            VerifyCommands::File { args } => {
                verify_proof_file(args.proofs_in, args.columns.into(), args.root.into()).await
            }
        },
        Commands::Schema => commitment_schema(),
    };

    if let Err(e) = res {
        tracing::error!("Error: {:?}", e);
        std::process::exit(1);
    }

    Ok(())
}

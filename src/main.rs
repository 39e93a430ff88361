//! fraudprep - Main Entry Point

use clap::Parser;
use fraudprep::cli::{cmd_clean, cmd_info, Cli, Commands};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fraudprep=info".into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Clean(args) => cmd_clean(&args)?,
        Commands::Info { data, infer_schema_length } => cmd_info(&data, infer_schema_length)?,
    }

    Ok(())
}

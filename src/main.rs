use clap::Parser;
use miette::Result;
use tracing_subscriber::EnvFilter;

use aliscan::cli::{Cli, Commands};
use aliscan::commands;

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "aliscan=debug" } else { "aliscan=warn" };

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    match cli.command {
        Commands::Agent(args) => commands::agent::run(args).await,
        Commands::Snapshot(args) => commands::snapshot::run(args).await,
        Commands::Backup(args) => commands::backup::run(args).await,
    }
}

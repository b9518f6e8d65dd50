//! stepwise CLI entry point.
//!
//! Binary name: `stepwise`
//!
//! Read-only inspection of checkpointed workflow runs and their artifacts.
//! Workflows themselves are built and executed by library drivers.

mod cli;
mod state;

use clap::Parser;

use cli::{Cli, Commands};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,stepwise_core=debug,stepwise_infra=debug",
        _ => "trace",
    };
    if let Err(e) = stepwise_observe::tracing_setup::init_tracing(false, filter) {
        eprintln!("Warning: failed to initialize tracing: {e}");
    }

    let state = AppState::init(cli.data_dir.clone()).await?;

    let result = match cli.command {
        Commands::Runs { status, limit } => {
            cli::runs::list_runs(&state, status, limit, cli.json).await
        }
        Commands::Show { run_id } => cli::runs::show_run(&state, &run_id, cli.json).await,
        Commands::Artifact { run_id, out } => {
            cli::artifact::export_artifact(&state, &run_id, &out, cli.json, cli.quiet).await
        }
    };

    stepwise_observe::tracing_setup::shutdown_tracing();
    result
}

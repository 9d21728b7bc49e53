use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod cli;
mod config;
mod discovery;
mod error;
mod report;
mod runner;

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing - debug output only with --verbose
    let filter = if cli.verbose {
        EnvFilter::new("tfpr=debug")
    } else {
        EnvFilter::new("tfpr=info")
    };

    fmt().with_env_filter(filter).with_target(false).init();

    match cli.command {
        Commands::Plan(args) => cli::plan::execute(args).await,
        Commands::Report(args) => cli::report::execute(args),
    }
}

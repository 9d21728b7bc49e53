pub mod plan;
pub mod report;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tfpr")]
#[command(
    author,
    version,
    about = "Parallel terraform plan orchestrator that renders PR-ready reports"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose/debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run plans for a module and render the PR report
    Plan(PlanArgs),

    /// Re-render the PR report from existing plan artifacts
    Report(ReportArgs),
}

#[derive(Parser, Clone)]
pub struct PlanArgs {
    /// Terragrunt module name (without the terragrunt_ prefix)
    pub module: String,

    /// Plan only the affected states reported by affected-modules.sh
    #[arg(short, long)]
    pub targeted: bool,

    /// Custom output directory (default: pr-plans-TIMESTAMP)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Plan command binary
    #[arg(long, default_value = "kitman", env = "TFPR_PLAN_BIN")]
    pub plan_bin: PathBuf,
}

#[derive(Parser, Clone)]
pub struct ReportArgs {
    /// Output directory holding the plan artifacts
    pub output_dir: PathBuf,

    /// Module name (default: read from the run manifest)
    #[arg(short, long)]
    pub module: Option<String>,
}

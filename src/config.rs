use chrono::Local;
use std::path::PathBuf;

/// Run configuration handed to every component at construction.
/// Built once from CLI arguments; no process-wide mutable state.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Name of the terragrunt module being planned (without the
    /// `terragrunt_` prefix).
    pub module: String,

    /// Directory receiving the raw plan artifacts and the rendered report.
    pub output_dir: PathBuf,

    /// Binary used to run plans. Looked up on PATH unless it contains a
    /// path separator.
    pub plan_bin: PathBuf,
}

/// Default output directory name, e.g. `pr-plans-20260823-143015`.
pub fn default_output_dir() -> PathBuf {
    PathBuf::from(format!(
        "pr-plans-{}",
        Local::now().format("%Y%m%d-%H%M%S")
    ))
}

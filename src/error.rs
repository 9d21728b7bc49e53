use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("module terragrunt_{0} not found in current directory.\nMake sure you're running this from the modules repository root")]
    ModuleNotFound(String),

    #[error("affected-modules.sh not found in current directory")]
    ScriptMissing,

    #[error("affected-modules.sh failed: {0}")]
    ScriptFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("plan for {target} failed: {source}")]
    PlanFailed {
        target: String,
        #[source]
        source: Box<ExecutionError>,
    },

    #[error("process failed with exit code {code}: {stderr}")]
    NonZeroExit { code: i32, stderr: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to write plan artifact '{path}': {source}")]
    WriteArtifact {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("failed to build marker pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("failed to read plan artifact '{path}': {source}")]
    ReadArtifact {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write report: {0}")]
    WriteReport(std::io::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

use crate::error::ReportError;
use crate::runner::{GroupStatus, RunReport};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const MANIFEST_FILE: &str = "manifest.json";

/// Record of one plan run, written next to the artifacts so a later
/// `tfpr report` pass knows what produced them.
#[derive(Debug, Serialize, Deserialize)]
pub struct RunManifest {
    pub module: String,
    pub mode: String,
    pub generated_at: String,
    pub duration_sec: f64,
    pub groups: Vec<GroupEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GroupEntry {
    pub group: String,
    pub artifact: String,
    pub status: String,
    pub bytes_captured: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RunManifest {
    pub fn from_run(module: &str, mode: &str, run: &RunReport) -> Self {
        let groups = run
            .groups
            .iter()
            .map(|g| {
                let (status, error) = match &g.status {
                    GroupStatus::Completed => ("completed".to_string(), None),
                    GroupStatus::NoWork => ("no_work".to_string(), None),
                    GroupStatus::Failed { error } => ("failed".to_string(), Some(error.clone())),
                };
                GroupEntry {
                    group: g.kind.to_string(),
                    artifact: g.kind.artifact_name().to_string(),
                    status,
                    bytes_captured: g.bytes_captured,
                    error,
                }
            })
            .collect();

        Self {
            module: module.to_string(),
            mode: mode.to_string(),
            generated_at: Utc::now().to_rfc3339(),
            duration_sec: run.total_duration.as_secs_f64(),
            groups,
        }
    }

    pub fn write(&self, output_dir: &Path) -> Result<(), ReportError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(output_dir.join(MANIFEST_FILE), json).map_err(ReportError::WriteReport)
    }

    pub fn load(output_dir: &Path) -> Result<Self, ReportError> {
        let path = output_dir.join(MANIFEST_FILE);
        let content = fs::read_to_string(&path).map_err(|e| ReportError::ReadArtifact {
            path: path.clone(),
            source: e,
        })?;
        Ok(serde_json::from_str(&content)?)
    }
}

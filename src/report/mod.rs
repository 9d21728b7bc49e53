mod assembler;
mod manifest;
mod scanner;

pub use assembler::ReportAssembler;
pub use manifest::RunManifest;
pub use scanner::{ActionRecord, PlanScanner};

use crate::error::ReportError;
use crate::runner::GroupKind;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

pub const REPORT_FILE: &str = "pr-ready.md";

/// Build the PR report purely from the plan artifacts in the output
/// directory. Missing, empty, or no-work artifacts contribute nothing;
/// commercial records are folded before GovCloud ones.
pub fn generate(output_dir: &Path, module: &str) -> Result<PathBuf, ReportError> {
    let mut assembler = ReportAssembler::new(module);

    for kind in GroupKind::ALL {
        let path = output_dir.join(kind.artifact_name());
        let content = match fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("no {} artifact, skipping", kind);
                continue;
            }
            Err(e) => return Err(ReportError::ReadArtifact { path, source: e }),
        };

        if content.is_empty() || content.contains(kind.no_work_message()) {
            debug!("{} artifact has no plans, skipping", kind);
            continue;
        }

        let mut scanner = PlanScanner::new(kind)?;
        let records = scanner.scan(&content);
        debug!("{} artifact yielded {} plan sections", kind, records.len());
        assembler.extend(records);
    }

    let report_path = output_dir.join(REPORT_FILE);
    fs::write(&report_path, assembler.render()).map_err(ReportError::WriteReport)?;
    Ok(report_path)
}

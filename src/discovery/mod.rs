use crate::error::DiscoveryError;
use std::path::Path;
use std::process::Command;
use tracing::debug;

const AFFECTED_SCRIPT: &str = "./affected-modules.sh";

/// Check that the unit of work exists as a terragrunt module directory in
/// the current working directory.
pub fn validate_module(module: &str) -> Result<(), DiscoveryError> {
    let module_dir = format!("terragrunt_{}", module);
    if !Path::new(&module_dir).is_dir() {
        return Err(DiscoveryError::ModuleNotFound(module.to_string()));
    }
    Ok(())
}

/// Run the affected-modules script and extract the terragrunt working
/// directories it would plan. An empty result is not an error here; the
/// caller decides whether to fall back to batch planning.
pub fn find_affected_targets(module: &str) -> Result<Vec<String>, DiscoveryError> {
    if !Path::new(AFFECTED_SCRIPT).exists() {
        return Err(DiscoveryError::ScriptMissing);
    }

    let output = Command::new(AFFECTED_SCRIPT).args([module, "."]).output()?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(DiscoveryError::ScriptFailed(stderr.to_string()));
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    let targets = parse_affected_output(&stdout);
    debug!("affected-modules.sh reported {} targets", targets.len());
    Ok(targets)
}

/// Extract target working directories from the script's plan-command lines.
/// Lines look like `... kitman tg plan ... -w <dir>/terragrunt.hcl ...`.
fn parse_affected_output(stdout: &str) -> Vec<String> {
    let mut targets = Vec::new();

    for line in stdout.lines() {
        let line = line.trim();
        if !line.contains("kitman tg plan") {
            continue;
        }

        let parts: Vec<&str> = line.split_whitespace().collect();
        for (i, part) in parts.iter().enumerate() {
            if *part == "-w" && i + 1 < parts.len() {
                let target = parts[i + 1].replacen("/terragrunt.hcl", "", 1);
                targets.push(target);
                break;
            }
        }
    }

    targets
}

use crate::cli::PlanArgs;
use crate::config::{default_output_dir, Settings};
use crate::discovery;
use crate::report::{self, RunManifest};
use crate::runner::{partition_targets, KitmanExecutor, Orchestrator, RunPlan};
use anyhow::{bail, Context};
use std::sync::Arc;
use tracing::{info, warn};

pub async fn execute(args: PlanArgs) -> anyhow::Result<()> {
    let settings = Settings {
        module: args.module.clone(),
        output_dir: args.output.unwrap_or_else(default_output_dir),
        plan_bin: args.plan_bin,
    };

    discovery::validate_module(&settings.module)?;

    std::fs::create_dir_all(&settings.output_dir)
        .with_context(|| format!("failed to create output directory {:?}", settings.output_dir))?;

    info!(
        "Generating terraform plans for module {} into {:?}",
        settings.module, settings.output_dir
    );

    let (plan, mode) = build_run_plan(&settings.module, args.targeted);

    let executor = Arc::new(KitmanExecutor::new(settings.plan_bin.clone()));
    let orchestrator = Orchestrator::new(settings.clone(), executor);
    let run = orchestrator.run(plan).await;

    if let Err(e) = RunManifest::from_run(&settings.module, mode, &run).write(&settings.output_dir)
    {
        warn!("Failed to write run manifest: {}", e);
    }

    let failures = run.failures();

    if run.all_failed() {
        bail!(format_failures(&failures));
    }

    // Render from whatever artifacts survived, even on partial failure
    let report_path = report::generate(&settings.output_dir, &settings.module)
        .context("failed to generate PR report")?;

    if !failures.is_empty() {
        warn!("Partial report written to {:?}", report_path);
        bail!(format_failures(&failures));
    }

    info!(
        "Plan generation complete in {:.1}s, PR-ready report: {:?}",
        run.total_duration.as_secs_f64(),
        report_path
    );
    Ok(())
}

/// Decide between targeted and batch planning. Discovery failures and empty
/// discovery results fall back to batch mode rather than aborting.
fn build_run_plan(module: &str, targeted: bool) -> (RunPlan, &'static str) {
    if !targeted {
        return (RunPlan::batch(), "batch");
    }

    match discovery::find_affected_targets(module) {
        Ok(targets) if !targets.is_empty() => {
            info!("Found {} affected terraform states", targets.len());
            let (commercial, govcloud) = partition_targets(&targets);
            (RunPlan::targeted(commercial, govcloud), "targeted")
        }
        Ok(_) => {
            warn!("Targeted planning found no affected states, falling back to plan_all");
            (RunPlan::batch(), "batch")
        }
        Err(e) => {
            warn!("Targeted planning unavailable ({}), falling back to plan_all", e);
            (RunPlan::batch(), "batch")
        }
    }
}

fn format_failures(failures: &[(crate::runner::GroupKind, String)]) -> String {
    failures
        .iter()
        .map(|(kind, error)| format!("{} plans failed: {}", kind, error))
        .collect::<Vec<_>>()
        .join("; ")
}

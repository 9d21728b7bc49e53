use crate::cli::ReportArgs;
use crate::report::{self, RunManifest};
use anyhow::Context;
use tracing::info;

pub fn execute(args: ReportArgs) -> anyhow::Result<()> {
    let module = match args.module {
        Some(module) => module,
        None => {
            RunManifest::load(&args.output_dir)
                .context("no --module given and no run manifest found in the output directory")?
                .module
        }
    };

    let report_path = report::generate(&args.output_dir, &module)
        .context("failed to generate PR report")?;

    info!("PR-ready report: {:?}", report_path);
    Ok(())
}

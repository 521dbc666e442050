//! `webrig build`.

use std::sync::Arc;

use tracing::debug;
use webrig_bundler::RolldownBundler;

use crate::build::BuildOrchestrator;
use crate::build::checks::{DEFAULT_CHECKERS, run_checks};
use crate::cli::BuildArgs;
use crate::commands::utils::load_synthesizer;
use crate::error::Result;
use crate::ui;

/// Execute the build command.
///
/// # Process Flow
///
/// 1. Load options and resolve the configuration
/// 2. Run format and lint checks, unless `--mode fast`
/// 3. Build once and print the emitted files
///
/// # Errors
///
/// Configuration errors, failed checks, bundler invocation failures and any
/// compile error or warning.
pub async fn execute(args: BuildArgs, verbose: bool) -> Result<()> {
    let flags = args.flags();
    let synthesizer = load_synthesizer(&args.project, &flags, &args.overrides(verbose))?;

    if flags.fast_mode() {
        debug!("fast mode: skipping checks");
    } else {
        run_checks(synthesizer.project_dir(), DEFAULT_CHECKERS).await?;
    }

    BuildOrchestrator::new(&synthesizer, Arc::new(RolldownBundler::new()))
        .run(|report| {
            ui::success(&format!(
                "Compiled to {} ({} static file(s) copied)",
                report.output_dir.display(),
                report.static_files
            ));
            ui::print_build_summary(&report.assets, report.duration);
        })
        .await?;

    Ok(())
}

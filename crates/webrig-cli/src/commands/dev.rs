//! `webrig dev`.

use std::sync::Arc;

use webrig_bundler::RolldownBundler;

use crate::cli::DevArgs;
use crate::commands::utils::load_synthesizer;
use crate::dev::{DevOptions, SessionOrchestrator};
use crate::error::Result;

/// Execute the dev command. Runs until interrupted.
///
/// # Errors
///
/// Any startup failure: configuration, proxy target, the initial bundler
/// invocation or binding the address.
pub async fn execute(args: DevArgs, verbose: bool) -> Result<()> {
    let options = DevOptions::from_args(&args)?;
    let synthesizer = load_synthesizer(&args.project, &args.flags(), &args.overrides(verbose))?;

    SessionOrchestrator::new(&synthesizer, Arc::new(RolldownBundler::new()), options)
        .run()
        .await
}

//! Conversion of CLI errors into miette reports.

use miette::Report;
use webrig_config::ErrorKind;

use crate::error::{BuildError, CliError};

pub fn cli_error_to_miette(err: CliError) -> Report {
    match err {
        CliError::Bundler(e) => Report::new(e),
        CliError::Build(e) => build_error_to_miette(e),
        CliError::Config(e) => {
            let help = match e.kind() {
                ErrorKind::Construction => "Check webrig.config.json and the project layout",
                ErrorKind::Resolution => {
                    "Every dynamic alias must resolve for this env, or none of them"
                }
            };
            miette::miette!(help = help, "{}", e)
        }
        CliError::Server(msg) => miette::miette!(
            help = "Is another process already listening on this port?",
            "Failed to start dev server: {}",
            msg
        ),
        other => miette::miette!("{}", other),
    }
}

fn build_error_to_miette(err: BuildError) -> Report {
    match err.hint() {
        Some(hint) => miette::miette!(help = hint, "{}", err),
        None => miette::miette!("{}", err),
    }
}

//! webrig CLI entry point.
//!
//! Parses arguments, installs logging and dispatches to the command. Any
//! error returned by a command becomes a miette report and exit status 1.

use clap::Parser;
use miette::Result;
use webrig_cli::{cli, commands, error, logger, ui};

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Cli::parse();

    logger::init_logger(args.verbose, args.quiet, args.no_color);
    ui::init_colors(args.no_color);

    let result = match args.command {
        cli::Command::Build(build_args) => commands::build_execute(build_args, args.verbose).await,
        cli::Command::Dev(dev_args) => commands::dev_execute(dev_args, args.verbose).await,
    };

    result.map_err(error::cli_error_to_miette)
}
